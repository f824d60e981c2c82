//! Heading classification into semantic groups.

use crate::groups::KeywordIndex;
use crate::normalize::normalize;

/// Minimum character count (exclusive) for a token to be used in a fallback label.
const FALLBACK_MIN_TOKEN_CHARS: usize = 3;
/// Maximum number of tokens joined into a fallback label.
const FALLBACK_MAX_TOKENS: usize = 3;
/// Character budget of the last-resort label taken from the raw heading.
const RAW_LABEL_CHARS: usize = 25;

/// Assigns exactly one group name to a heading.
///
/// The classifier borrows a [`KeywordIndex`]; the canonical one is shared
/// process-wide so a classifier is cheap to create and copy.
///
/// # Example
///
/// ```rust
/// use blockmap_core::GroupClassifier;
///
/// let classifier = GroupClassifier::canonical();
/// assert_eq!(classifier.classify("Our pricing plans"), "Pricing");
/// assert_eq!(classifier.classify("Zzqx Wobble Init Panel"), "zzqx wobble init");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GroupClassifier<'a> {
    index: &'a KeywordIndex,
}

impl GroupClassifier<'static> {
    /// Classifier over the built-in dictionary.
    pub fn canonical() -> Self {
        Self { index: KeywordIndex::canonical() }
    }
}

impl Default for GroupClassifier<'static> {
    fn default() -> Self {
        Self::canonical()
    }
}

impl<'a> GroupClassifier<'a> {
    pub fn new(index: &'a KeywordIndex) -> Self {
        Self { index }
    }

    /// The index this classifier matches against.
    pub fn index(&self) -> &'a KeywordIndex {
        self.index
    }

    /// Classifies a heading.
    ///
    /// Keywords are tried longest first against the normalized heading; the
    /// first one found as a substring decides the group. Without a match the
    /// label is built from up to three normalized tokens longer than three
    /// characters, or, failing that, the first 25 characters of the raw heading.
    pub fn classify(&self, heading: &str) -> String {
        let norm = normalize(heading);

        if let Some((_, group)) = self.index.keywords_longest_first().find(|(kw, _)| norm.contains(kw)) {
            return group.to_string();
        }

        let tokens: Vec<&str> = norm
            .split(' ')
            .filter(|token| token.chars().count() > FALLBACK_MIN_TOKEN_CHARS)
            .take(FALLBACK_MAX_TOKENS)
            .collect();

        if tokens.is_empty() {
            heading.chars().take(RAW_LABEL_CHARS).collect()
        } else {
            tokens.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::SemanticGroup;
    use rstest::rstest;

    #[rstest]
    #[case("Pricing", "Pricing")]
    #[case("Наши тарифы", "Pricing")]
    #[case("What our clients say about us", "Testimonials")]
    #[case("Frequently Asked Questions", "FAQ")]
    #[case("Get started today", "CTA / Lead form")]
    #[case("Как мы работаем", "Process / Steps")]
    #[case("Свяжитесь с нами!", "Contacts")]
    fn test_classify_canonical(#[case] heading: &str, #[case] expected: &str) {
        assert_eq!(GroupClassifier::canonical().classify(heading), expected);
    }

    #[test]
    fn test_longest_keyword_wins() {
        static TABLE: &[SemanticGroup] = &[
            SemanticGroup { name: "Short", keywords: &["team"] },
            SemanticGroup { name: "Long", keywords: &["team members"] },
        ];
        let index = KeywordIndex::from_table(TABLE);
        let classifier = GroupClassifier::new(&index);
        assert_eq!(classifier.classify("Meet our team members"), "Long");
        assert_eq!(classifier.classify("The team"), "Short");
    }

    #[test]
    fn test_canonical_phrase_outranks_word() {
        // "our clients" alone belongs to Partners / Clients
        let classifier = GroupClassifier::canonical();
        assert_eq!(classifier.classify("What our clients say"), "Testimonials");
        assert_eq!(classifier.classify("Our clients"), "Partners / Clients");
    }

    #[test]
    fn test_fallback_tokens() {
        let classifier = GroupClassifier::canonical();
        assert_eq!(classifier.classify("Zzqx Wobble Init Panel"), "zzqx wobble init");
        assert_eq!(classifier.classify("Zz, Wobble-Init!"), "wobble init");
    }

    #[test]
    fn test_fallback_raw_heading() {
        let classifier = GroupClassifier::canonical();
        assert_eq!(classifier.classify("Hi!"), "Hi!");
        assert_eq!(classifier.classify("A b c d e f g h i j k l m n o p"), "A b c d e f g h i j k l m");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = GroupClassifier::canonical();
        for heading in ["Why choose us", "Xylo Quark", "??", "Отзывы"] {
            let first = classifier.classify(heading);
            assert!(!first.is_empty());
            for _ in 0..5 {
                assert_eq!(classifier.classify(heading), first);
            }
        }
    }
}

//! The canonical table of semantic groups and the keyword index built from it.
//!
//! Every group carries a list of synonyms in Russian and English so headings
//! are classified the same way regardless of the page language. The order of
//! [`CANONICAL_GROUPS`] is significant: comparison rows for canonical groups
//! are emitted in exactly this order.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A named semantic group and its keyword synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticGroup {
    /// Display name used as the group label.
    pub name: &'static str,
    /// Lowercase keywords and phrases, Russian first then English.
    pub keywords: &'static [&'static str],
}

/// Built-in dictionary of semantic groups, in canonical order.
pub static CANONICAL_GROUPS: &[SemanticGroup] = &[
    SemanticGroup {
        name: "Hero",
        keywords: &[
            "герой", "главный", "первый экран", "обложка", "баннер", "слайдер", "слайд",
            "добро пожаловать", "мы помогаем", "мы создаём", "мы делаем",
            "hero", "welcome", "banner", "slider", "above the fold", "headline",
            "we help", "we create", "we build", "get started",
        ],
    },
    SemanticGroup {
        name: "Benefits",
        keywords: &[
            "преимущество", "выгода", "польза", "плюс", "достоинство", "особенность",
            "почему мы", "почему нас", "зачем", "чем мы лучше", "наши преимущества",
            "why us", "why choose", "benefits", "advantages", "features", "what makes",
        ],
    },
    SemanticGroup {
        name: "Services / Products",
        keywords: &[
            "услуга", "сервис", "решение", "продукт", "предложение", "направление",
            "что мы делаем", "что мы предлагаем", "наши услуги", "наши продукты",
            "services", "products", "solutions", "offerings", "what we do",
        ],
    },
    SemanticGroup {
        name: "Pricing",
        keywords: &[
            "цена", "стоимость", "тариф", "прайс", "расценка", "сколько стоит",
            "пакет", "тарифный план", "оплата", "стоить",
            "price", "pricing", "plans", "packages", "cost", "rates", "tariff",
        ],
    },
    SemanticGroup {
        name: "Testimonials",
        keywords: &[
            "отзыв", "мнение", "оценка", "рецензия", "рекомендация", "что говорят",
            "наши клиенты", "нам доверяют",
            "testimonials", "reviews", "feedback", "what our clients say", "what people say",
        ],
    },
    SemanticGroup {
        name: "FAQ",
        keywords: &[
            "faq", "вопрос", "ответ", "частый вопрос", "часто задают",
            "frequently asked", "questions", "q&a", "answers",
        ],
    },
    SemanticGroup {
        name: "Team",
        keywords: &[
            "команда", "сотрудник", "специалист", "эксперт", "мастер", "профессионал",
            "наша команда", "познакомьтесь",
            "team", "our team", "meet", "staff", "experts", "specialists",
        ],
    },
    SemanticGroup {
        name: "About",
        keywords: &[
            "компания", "организация", "студия", "агентство", "кто мы", "о нас",
            "история", "миссия", "ценности", "о компании",
            "about", "about us", "our story", "mission", "vision", "who we are",
        ],
    },
    SemanticGroup {
        name: "Contacts",
        keywords: &[
            "контакт", "связь", "адрес", "телефон", "написать", "позвонить",
            "обратная связь", "свяжитесь", "форма связи",
            "contact", "contacts", "get in touch", "reach us", "write to us",
        ],
    },
    SemanticGroup {
        name: "Portfolio / Cases",
        keywords: &[
            "портфолио", "кейс", "проект", "наши работы", "пример работ",
            "portfolio", "case studies", "our work", "projects", "examples",
        ],
    },
    SemanticGroup {
        name: "Partners / Clients",
        keywords: &[
            "партнёр", "партнер", "клиент", "логотип", "бренд", "нам доверяют",
            "с нами работают", "наши клиенты",
            "partners", "clients", "trusted by", "brands", "our clients",
        ],
    },
    SemanticGroup {
        name: "Guarantees",
        keywords: &[
            "гарантия", "гарантировать", "обязательство", "уверенность", "надёжность",
            "guarantee", "guarantees", "warranty", "commitment", "reliability",
        ],
    },
    SemanticGroup {
        name: "Process / Steps",
        keywords: &[
            "процесс", "этап", "шаг", "как мы работаем", "порядок работы",
            "схема", "как это работает",
            "process", "how it works", "steps", "our process", "workflow",
        ],
    },
    SemanticGroup {
        name: "Statistics",
        keywords: &[
            "статистика", "цифра", "факт", "достижение", "результат", "показатель",
            "нас выбрали", "доверяют",
            "stats", "statistics", "numbers", "achievements", "results", "facts",
        ],
    },
    SemanticGroup {
        name: "Blog / Articles",
        keywords: &[
            "блог", "статья", "новость", "публикация", "пост", "материал",
            "blog", "articles", "news", "posts", "latest", "insights",
        ],
    },
    SemanticGroup {
        name: "Video",
        keywords: &["видео", "ролик", "презентация", "демо", "смотреть", "video", "watch", "demo", "presentation"],
    },
    SemanticGroup {
        name: "CTA / Lead form",
        keywords: &[
            "заявка", "записаться", "получить", "заказать", "попробовать",
            "начать", "купить", "оставить заявку", "бесплатно",
            "cta", "call to action", "sign up", "get started", "try free",
            "book", "order", "buy", "request",
        ],
    },
];

static CANONICAL_INDEX: LazyLock<KeywordIndex> = LazyLock::new(|| KeywordIndex::from_table(CANONICAL_GROUPS));

/// A keyword registered under more than one group.
///
/// The later registration owns the keyword; `shadowed` lists the groups that
/// lost it, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyword {
    pub keyword: String,
    pub owner: String,
    pub shadowed: Vec<String>,
}

/// Read-only mapping from lowercase keyword to group name.
#[derive(Debug, Clone)]
pub struct KeywordIndex {
    groups: Vec<String>,
    owners: HashMap<String, usize>,
    /// Distinct keywords, longest first. Ties keep first-registration order.
    by_length: Vec<String>,
    duplicates: Vec<DuplicateKeyword>,
}

impl KeywordIndex {
    /// Returns the process-wide index over [`CANONICAL_GROUPS`].
    ///
    /// Built on first use and never mutated afterwards.
    pub fn canonical() -> &'static KeywordIndex {
        &CANONICAL_INDEX
    }

    /// Builds an index from a table of groups.
    ///
    /// Every `(group, keyword)` pair registers `keyword.to_lowercase() -> group`.
    /// When a keyword appears under several groups the last registration wins.
    pub fn from_table(table: &[SemanticGroup]) -> Self {
        let mut groups = Vec::with_capacity(table.len());
        let mut owners: HashMap<String, usize> = HashMap::new();
        let mut registration_order = Vec::new();
        let mut history: HashMap<String, Vec<usize>> = HashMap::new();

        for group in table {
            let group_idx = match groups.iter().position(|name: &String| name == group.name) {
                Some(idx) => idx,
                None => {
                    groups.push(group.name.to_string());
                    groups.len() - 1
                }
            };

            for keyword in group.keywords {
                let keyword = keyword.to_lowercase();
                if owners.insert(keyword.clone(), group_idx).is_none() {
                    registration_order.push(keyword.clone());
                }
                history.entry(keyword).or_default().push(group_idx);
            }
        }

        let mut by_length = registration_order;
        by_length.sort_by_key(|kw| std::cmp::Reverse(kw.chars().count()));

        let mut duplicates: Vec<DuplicateKeyword> = by_length
            .iter()
            .filter_map(|kw| {
                let owner = owners[kw];
                let mut shadowed: Vec<String> = Vec::new();
                for idx in &history[kw] {
                    if *idx != owner && !shadowed.contains(&groups[*idx]) {
                        shadowed.push(groups[*idx].clone());
                    }
                }
                (!shadowed.is_empty()).then(|| DuplicateKeyword {
                    keyword: kw.clone(),
                    owner: groups[owner].clone(),
                    shadowed,
                })
            })
            .collect();
        duplicates.sort_by(|a, b| a.keyword.cmp(&b.keyword));

        Self { groups, owners, by_length, duplicates }
    }

    /// Looks up the group owning an exact keyword.
    pub fn lookup(&self, keyword: &str) -> Option<&str> {
        self.owners.get(keyword).map(|idx| self.groups[*idx].as_str())
    }

    /// Iterates over `(keyword, group)` pairs, longest keyword first.
    pub fn keywords_longest_first(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_length
            .iter()
            .map(|kw| (kw.as_str(), self.groups[self.owners[kw]].as_str()))
    }

    /// Group names in table definition order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Whether `name` is one of the table's groups.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g == name)
    }

    /// Keywords claimed by more than one group, sorted by keyword.
    pub fn duplicate_keywords(&self) -> &[DuplicateKeyword] {
        &self.duplicates
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.by_length.len()
    }

    /// Whether the index holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.by_length.is_empty()
    }
}

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("blockmap")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Blockmap Contributors")
        .about("Compare the section structure of a page against its competitors")
        .arg(clap::arg!(-t --target <URL> "Page under analysis"))
        .arg(clap::arg!(-c --competitor <URL> "Competitor page (repeat 4 to 10 times)").action(clap::ArgAction::Append))
        .arg(
            clap::arg!(--"competitors-file" <FILE> "File with competitor URLs, one per line")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-m --mode <MODE> "Parsing mode (full, content-only)")
                .default_value("full")
                .value_parser(["full", "content-only"]),
        )
        .arg(clap::arg!(--timeout <SECS> "Per-page timeout in seconds (15-60)").default_value("30"))
        .arg(clap::arg!(--"api-key" <KEY> "API key of the rendering service").env("BLOCKMAP_API_KEY"))
        .arg(clap::arg!(--"render-endpoint" <URL> "Endpoint of the rendering service"))
        .arg(clap::arg!(--direct "Fetch pages with plain HTTP instead of the rendering service"))
        .arg(
            clap::arg!(--"pages-dir" <DIR> "Read saved pages from DIR/<host>.html instead of fetching")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Report format (markdown, json, csv)")
                .default_value("markdown")
                .value_parser(["markdown", "json", "csv"]),
        )
        .arg(
            clap::arg!(-o --output <PATH> "Output file, or directory for csv (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--"list-groups" "Print the built-in semantic groups and exit"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "blockmap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "blockmap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "blockmap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "blockmap", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}

//! Wombat CLI
//!
//! Runs a selector against an HTML document and lists the matching elements.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wombat_dom::{DomTree, NodeId};
use wombat_html::{dump_tree, format_start_tag, parse_document};
use wombat_select::{AdapterConfig, DomAdapter, MatchSet, Selector, SelectorError};

/// Wombat — query HTML documents with CSS-like selectors
#[derive(Parser, Debug)]
#[command(name = "wombat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Elements with a class inside the element with id "main"
    wombat '#main .item' page.html

    # Inline HTML
    wombat 'input[disabled]' --html '<div><input disabled></div>'

    # JSON output, searching only below the first <ul>
    wombat li --within ul --json page.html

    # Indexed id and class lookups
    wombat '.item' --config wombat.json page.html
"#)]
struct Cli {
    /// Selector to run, e.g. "div#main .item[data-id=3]"
    #[arg(value_name = "SELECTOR")]
    selector: String,

    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Only search below the first element matching this selector
    #[arg(long, value_name = "SELECTOR")]
    within: Option<String>,

    /// Print matches as JSON
    #[arg(long)]
    json: bool,

    /// Print the parsed DOM tree before the matches
    #[arg(long)]
    tree: bool,

    /// Adapter configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One matched element in `--json` output.
#[derive(Serialize)]
struct MatchReport<'a> {
    node: usize,
    tag: &'a str,
    attributes: BTreeMap<&'a str, &'a str>,
}

#[derive(Serialize)]
struct Report<'a> {
    selector: String,
    matches: Vec<MatchReport<'a>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => AdapterConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AdapterConfig::default(),
    };

    let selector = compile(&cli.selector)?;
    let within = cli.within.as_deref().map(compile).transpose()?;

    let html = load_html(&cli)?;
    let tree = parse_document(&html);
    debug!(nodes = tree.len(), "parsed document");

    if cli.tree {
        println!("{}", "=== DOM Tree ===".bold());
        print!("{}", dump_tree(&tree, tree.root()));
        println!();
    }

    let adapter = DomAdapter::with_config(&tree, config);
    let context = match &within {
        Some(scope) => match scope.query(&adapter, None).iter().next() {
            Some(&node) => Some(node),
            None => bail!("no element matches --within selector \"{scope}\""),
        },
        None => None,
    };

    let matches = selector.query(&adapter, context);
    if cli.json {
        print_json(&tree, &selector, &matches)?;
    } else {
        print_matches(&tree, &matches);
    }
    Ok(())
}

/// Compile a selector, pointing at the offending input on failure.
fn compile(source: &str) -> Result<Selector> {
    Selector::compile(source).map_err(|err| {
        let SelectorError::Syntax { offset, .. } = &err;
        let caret = format!("{}^", " ".repeat(*offset));
        anyhow::anyhow!("{err}\n  {source}\n  {}", caret.red())
    })
}

fn load_html(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        Ok(html.clone())
    } else if let Some(path) = &cli.path {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    } else {
        bail!("an HTML file or --html is required")
    }
}

fn print_matches(tree: &DomTree, matches: &MatchSet<NodeId>) {
    for &node in matches {
        let Some(element) = tree.as_element(node) else {
            continue;
        };
        println!(
            "{} {}",
            format!("{:>5}", node.0).dimmed(),
            format_start_tag(element).cyan()
        );
    }
    let noun = if matches.len() == 1 { "match" } else { "matches" };
    println!("{}", format!("{} {noun}", matches.len()).green());
}

fn print_json(tree: &DomTree, selector: &Selector, matches: &MatchSet<NodeId>) -> Result<()> {
    let report = Report {
        selector: selector.to_string(),
        matches: matches
            .iter()
            .filter_map(|&node| {
                let element = tree.as_element(node)?;
                Some(MatchReport {
                    node: node.0,
                    tag: &element.tag_name,
                    attributes: element
                        .attrs
                        .iter()
                        .map(|(name, value)| (name.as_str(), value.as_str()))
                        .collect(),
                })
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serializing matches")?
    );
    Ok(())
}

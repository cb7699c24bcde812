//! Sable CLI
//!
//! Runs one operation of the selector algebra and prints the result. There
//! is no selector parser here: selectors are passed as their JSON form,
//! either inline or as `@path` to a file holding the JSON.
//!
//! A selector list is an array of complex selectors, each an object with a
//! `components` array of compounds (arrays of simple selectors) and
//! combinators:
//!
//! ```text
//! [{"components": [{"Compound": [{"Class": "a"}]}, {"Comb": "Child"}, {"Compound": [{"Class": "b"}]}]}]
//! ```
//!
//! is `.a > .b`.

use std::fs;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use owo_colors::OwoColorize;
use sable_common::{SourceSpan, TerminalLogger};
use sable_selector::bogus::report_bogus_selectors;
use sable_selector::{SelectorList, extend, replace};
use tracing_subscriber::EnvFilter;

/// Sable: debugging front end for the selector algebra
#[derive(Parser, Debug)]
#[command(name = "sable")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Is `.a` a superselector of `.a.b`?
    sable superselector '[{"components":[{"Compound":[{"Class":"a"}]}]}]' @a-b.json

    # Extend a selector read from a file, printing JSON
    sable --json extend @rule.json @source.json @target.json

    # Watch the extension engine work
    sable -vv replace @rule.json @source.json @target.json
"#)]
struct Cli {
    /// Print results as JSON instead of selector text
    #[arg(long, global = true)]
    json: bool,

    /// Log what the extension engine does (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the [min, max] specificity range of a selector
    Specificity {
        /// Selector list JSON, or @FILE
        selector: String,
    },

    /// Check whether SUPER matches every element SUB matches
    Superselector {
        /// Candidate superselector JSON, or @FILE
        #[arg(value_name = "SUPER")]
        super_selector: String,
        /// Candidate subselector JSON, or @FILE
        #[arg(value_name = "SUB")]
        sub_selector: String,
    },

    /// Print a selector matching exactly the elements both selectors match
    Unify {
        /// First selector list JSON, or @FILE
        selector1: String,
        /// Second selector list JSON, or @FILE
        selector2: String,
    },

    /// Extend SELECTOR as though `SOURCE {@extend TARGETS}` were written
    Extend {
        /// Selector to extend, JSON or @FILE
        selector: String,
        /// Extending selector, JSON or @FILE
        source: String,
        /// Compound selectors to extend, JSON or @FILE
        targets: String,
    },

    /// Replace TARGETS in SELECTOR with SOURCE
    Replace {
        /// Selector to rewrite, JSON or @FILE
        selector: String,
        /// Replacement selector, JSON or @FILE
        source: String,
        /// Compound selectors to replace, JSON or @FILE
        targets: String,
    },

    /// Resolve `&` in SELECTOR against a parent selector
    Resolve {
        /// Nested selector JSON, or @FILE
        selector: String,
        /// Parent selector JSON, or @FILE (omit for a top-level rule)
        #[arg(long, value_name = "PARENT")]
        parent: Option<String>,
        /// Don't nest selectors without `&` under the parent
        #[arg(long)]
        no_implicit_parent: bool,
    },

    /// Warn about combinators that aren't valid CSS
    Bogus {
        /// Selector list JSON, or @FILE
        selector: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let span = SourceSpan::synthetic("cli");
    match cli.command {
        Command::Specificity { selector } => {
            let specificity = read_selector(&selector)?.specificity();
            if cli.json {
                let value = serde_json::json!({
                    "min": specificity.min,
                    "max": specificity.max,
                });
                println!("{value}");
            } else if specificity.min == specificity.max {
                println!("{}", specificity.min.bold());
            } else {
                println!("{}..{}", specificity.min.bold(), specificity.max.bold());
            }
        }
        Command::Superselector {
            super_selector,
            sub_selector,
        } => {
            let super_selector = read_selector(&super_selector)?;
            let sub_selector = read_selector(&sub_selector)?;
            let result = super_selector.is_superselector(&sub_selector);
            if cli.json {
                println!("{result}");
            } else if result {
                println!("{}", "true".green());
            } else {
                println!("{}", "false".red());
            }
        }
        Command::Unify {
            selector1,
            selector2,
        } => {
            let selector1 = read_selector(&selector1)?;
            let selector2 = read_selector(&selector2)?;
            match selector1.unify(&selector2) {
                Some(unified) => print_selector(&unified, cli.json)?,
                None if cli.json => println!("null"),
                None => println!("{}", "no element matches both selectors".dimmed()),
            }
        }
        Command::Extend {
            selector,
            source,
            targets,
        } => {
            let extended = extend(
                &read_selector(&selector)?,
                &read_selector(&source)?,
                &read_selector(&targets)?,
                &span,
            )?;
            print_selector(&extended, cli.json)?;
        }
        Command::Replace {
            selector,
            source,
            targets,
        } => {
            let replaced = replace(
                &read_selector(&selector)?,
                &read_selector(&source)?,
                &read_selector(&targets)?,
                &span,
            )?;
            print_selector(&replaced, cli.json)?;
        }
        Command::Resolve {
            selector,
            parent,
            no_implicit_parent,
        } => {
            let parent = parent.as_deref().map(read_selector).transpose()?;
            let resolved = read_selector(&selector)?
                .resolve_parent_selectors(parent.as_ref(), !no_implicit_parent)?;
            print_selector(&resolved, cli.json)?;
        }
        Command::Bogus { selector } => {
            let selector = read_selector(&selector)?;
            let count = report_bogus_selectors(&selector, &span, &TerminalLogger::new());
            if cli.json {
                println!("{count}");
            } else if count == 0 {
                println!("{}", "no bogus selectors".green());
            } else {
                println!("{} bogus selector(s)", count.yellow());
            }
        }
    }
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over `-v` flags.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "sable_selector=debug",
        _ => "sable_selector=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Decode a selector list from inline JSON or `@path`.
fn read_selector(argument: &str) -> Result<SelectorList> {
    let json = match argument.strip_prefix('@') {
        Some(path) => {
            tracing::debug!(path, "reading selector file");
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
        }
        None => argument.to_string(),
    };
    serde_json::from_str(&json).with_context(|| format!("invalid selector list: {argument}"))
}

fn print_selector(selector: &SelectorList, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(selector)?);
    } else {
        println!("{selector}");
    }
    Ok(())
}

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use roster_query::query::format::roster_context;
use roster_query::{
    apply_scope, HuggingFaceResponder, OfflineResponder, QueryEngine, RosterCache, ScopeSpec,
    Settings,
};

/// Rows printed by `:rows`.
const CONTEXT_ROWS: usize = 50;

/// Ask questions about a student roster from the terminal.
#[derive(Debug, Parser)]
#[command(name = "roster-repl", version)]
struct Args {
    /// Dataset file (.csv, .tsv or .json); defaults to the configured one.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Restrict to this grade.
    #[arg(long)]
    grade: Option<i64>,

    /// Restrict to this class label (case-insensitive).
    #[arg(long = "class")]
    class_label: Option<String>,

    /// Restrict to this region (case-insensitive).
    #[arg(long)]
    region: Option<String>,

    /// Ignore the configured default scope and see every record.
    #[arg(long, conflicts_with_all = ["grade", "class_label", "region"])]
    unscoped: bool,

    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never call the remote fallback responder.
    #[arg(long)]
    offline: bool,
}

impl Args {
    fn scope(&self, defaults: &ScopeSpec) -> ScopeSpec {
        if self.unscoped {
            return ScopeSpec::unrestricted();
        }
        if self.grade.is_none() && self.class_label.is_none() && self.region.is_none() {
            return defaults.clone();
        }
        ScopeSpec::from_inputs(
            self.grade,
            self.class_label.as_deref().unwrap_or(""),
            self.region.as_deref().unwrap_or(""),
        )
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    let dataset = args.dataset.clone().unwrap_or_else(|| settings.dataset.clone());
    let scope = args.scope(&settings.scope);

    let engine = if args.offline {
        QueryEngine::new(Box::new(OfflineResponder))
    } else {
        let responder = HuggingFaceResponder::new(&settings.fallback)
            .context("building the fallback client")?;
        QueryEngine::new(Box::new(responder))
    };

    let mut cache = RosterCache::open(&dataset)
        .with_context(|| format!("loading roster from {}", dataset.display()))?;

    println!("✅ Roster query ready ({scope}).");
    println!("Type your question (or 'exit' to quit)\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Ask: ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("reading stdin")?;
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let roster = cache.get().unwrap_or_else(|e| {
            log::warn!("{e}; answering from the last loaded roster");
            cache.roster()
        });

        match question {
            ":scope" => println!("{scope}"),
            ":rows" => {
                let scoped = apply_scope(roster.records(), &scope);
                println!("{}", roster_context(&scoped, CONTEXT_ROWS));
            }
            _ => {
                let today = Local::now().date_naive();
                println!("{}", engine.answer(roster.records(), &scope, question, today));
            }
        }
        println!();
    }

    Ok(())
}

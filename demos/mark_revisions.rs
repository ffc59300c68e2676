//! Convert the tracked changes of a Word document into marked text.
//!
//! Insertions are colored and accepted. Deletions are accepted, or struck
//! through and rejected with `--strike-deletions`, so the deleted text stays
//! visible. Every other kind of change is reported on standard error and left
//! in place.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example mark_revisions -- draft.docx marked.docx
//! ```
//!
//! Only one author's changes, deletions struck through in red:
//! ```sh
//! cargo run --example mark_revisions -- draft.docx marked.docx \
//!     --author "Jane Smith" \
//!     --strike-deletions \
//!     --color red
//! ```
//!
//! Options from a policy file:
//! ```sh
//! cargo run --example mark_revisions -- draft.docx marked.docx --policy policy.yaml
//! ```
//!
//! ```yaml
//! target_author: Jane Smith
//! color_override: dark_blue
//! strike_deletions: true
//! ```

use clap::Parser;
use markrev::ooxml::docx::DocxSession;
use markrev::revision::{ResolutionPolicy, WdColorIndex, resolve};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mark the tracked changes of a Word document
#[derive(Parser, Debug)]
#[command(
    name = "mark_revisions",
    about = "Convert tracked changes in a .docx file into colored and struck-through text",
    version
)]
struct Args {
    /// Input .docx file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output .docx file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Strike deletions through and keep them instead of removing them
    #[arg(long)]
    strike_deletions: bool,

    /// Only resolve changes made by this author
    #[arg(long, value_name = "NAME")]
    author: Option<String>,

    /// Color for marked text (e.g. blue, red, dark_blue)
    #[arg(long, value_name = "COLOR")]
    color: Option<WdColorIndex>,

    /// YAML policy file; command-line options override its values
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,
}

impl Args {
    fn policy(&self) -> markrev::Result<ResolutionPolicy> {
        let mut policy = match &self.policy {
            Some(path) => ResolutionPolicy::from_yaml_file(path)?,
            None => ResolutionPolicy::new(),
        };
        if self.strike_deletions {
            policy = policy.with_strike_deletions(true);
        }
        if let Some(author) = &self.author {
            policy = policy.with_target_author(author.clone());
        }
        if let Some(color) = self.color {
            policy = policy.with_color(color);
        }
        Ok(policy)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.input.is_file() {
        eprintln!("Error: Input file does not exist: {}", args.input.display());
        std::process::exit(1);
    }

    let policy = args.policy()?;
    let mut doc = DocxSession::open(&args.input)?;

    let mut resolver = resolve(&mut doc, &policy)?;
    let total = resolver.total();
    let mut stdout = std::io::stdout();
    let mut done = 0;
    for step in resolver.by_ref() {
        done = step?;
        print!("\rMarking... {:>3}%", done * 100 / total.max(1));
        stdout.flush()?;
    }
    drop(resolver);
    println!("\rMarking... {done} of {total} revisions processed");

    doc.save(&args.output)?;
    println!("✓ {} -> {}", args.input.display(), args.output.display());
    Ok(())
}

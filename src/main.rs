use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use zettel::config::{LOG_ENV, resolve_store_dir};
use zettel::{NoteError, NoteId, NoteRepository, NoteSession, QueryEngine};

/// zettel - plain-text notes linked by ID
#[derive(Parser)]
#[command(name = "zettel")]
#[command(about = "A flat-file Zettelkasten with backlinks and tags")]
#[command(version)]
struct Cli {
    /// Notes directory (defaults to $ZETTEL_DIR, then the platform data dir)
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Create a new note
    New {
        /// Title used for the heading and the filename
        #[arg(value_name = "TITLE")]
        title: String,
    },
    /// Print a note with its backlinks and outgoing links
    Show {
        #[arg(value_name = "ID")]
        id: NoteId,
    },
    /// Replace a note's content with standard input
    Save {
        #[arg(value_name = "ID")]
        id: NoteId,
    },
    /// Delete a note and rewrite links pointing at it
    Delete {
        #[arg(value_name = "ID")]
        id: NoteId,
    },
    /// List all notes by ID
    List(OutputArgs),
    /// Find notes whose filename or content contains a keyword
    Search {
        #[arg(value_name = "KEYWORD")]
        keyword: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List notes containing a tag
    Tag {
        /// Tag, with or without the leading '#'
        #[arg(value_name = "TAG")]
        tag: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List every tag in the store
    Tags(OutputArgs),
    /// List notes linking to a note
    Backlinks {
        #[arg(value_name = "ID")]
        id: NoteId,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Clone, Copy, Default)]
struct OutputArgs {
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input, unknown notes and saves without an open note.
/// Everything else, including I/O failures and incomplete backlink cleanup,
/// is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<NoteError>()
        .is_some_and(NoteError::is_user_error)
}

fn run(cli: Cli) -> Result<()> {
    let dir = resolve_store_dir(cli.dir.as_deref())?;
    let repo = NoteRepository::open(&dir)
        .with_context(|| format!("Failed to open note store at {}", dir.display()))?;

    execute(cli.command, &repo)
}

/// Executes a command against an already opened repository.
///
/// Separated from `run` so tests can drive it against a temporary store.
fn execute(command: Commands, repo: &NoteRepository) -> Result<()> {
    let query = QueryEngine::new(repo);

    match command {
        Commands::New { title } => {
            let note = repo.create(&title).context("Failed to create note")?;
            println!("Note created: {}", note.filename());
        }
        Commands::Show { id } => {
            let filename = repo.find_by_id(id)?;
            let content = repo.read(&filename)?;
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }

            let backlinks = query.find_backlinks(id)?.items;
            println!("\nBacklinks:");
            print_lines(&backlinks);

            let links: Vec<String> = query
                .links_from(&filename)?
                .into_iter()
                .map(|id| format!("[[{id}]]"))
                .collect();
            println!("\nLinks:");
            print_lines(&links);
        }
        Commands::Save { id } => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read note content from stdin")?;

            let mut session = NoteSession::new(repo);
            session.open_id(id)?;
            session.save(&content).context("Failed to save note")?;
            if let Some(open) = session.current() {
                println!("Saved {}", open.filename);
            }
        }
        Commands::Delete { id } => {
            let mut session = NoteSession::new(repo);
            session.open_id(id)?;
            match session.delete_current() {
                Ok(report) => {
                    println!("Deleted {}", report.deleted);
                    for filename in &report.rewritten {
                        println!("  updated backlinks in {filename}");
                    }
                }
                Err(e) => {
                    if let NoteError::PartialFailure {
                        deleted,
                        cleaned,
                        failed,
                    } = &e
                    {
                        println!("Deleted {deleted}");
                        for filename in cleaned {
                            println!("  updated backlinks in {filename}");
                        }
                        for failure in failed {
                            eprintln!("  could not update {}: {}", failure.filename, failure.reason);
                        }
                    }
                    return Err(e).context("Failed to delete note");
                }
            }
        }
        Commands::List(output) => emit(&query.list_all()?, output)?,
        Commands::Search { keyword, output } => emit(&query.search(&keyword)?.items, output)?,
        Commands::Tag { tag, output } => emit(&query.filter_by_tag(&tag)?.items, output)?,
        Commands::Tags(output) => {
            let tags: Vec<String> = query.extract_tags()?.items.into_iter().collect();
            emit(&tags, output)?;
        }
        Commands::Backlinks { id, output } => emit(&query.find_backlinks(id)?.items, output)?,
    }

    Ok(())
}

fn emit<T: Serialize + AsRef<str>>(items: &[T], output: OutputArgs) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        print_lines(items);
    }
    Ok(())
}

fn print_lines<T: AsRef<str>>(items: &[T]) {
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("{}", item.as_ref());
    }
}

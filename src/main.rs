//! `rit` — the CLI front-end over the core library. Sub-commands mirror
//! spec.md §6 exactly: every other form the teacher's original CLI
//! supported (log, status, tag, graph, and the individual plumbing
//! commands beyond `cat-file`) is out of scope and not wired up here.

use clap::{Parser, Subcommand};

use rit::commands;
use rit::commands::diff::Target as DiffTarget;
use rit::Repository;

/// Rit — a minimal Git-style version control core.
#[derive(Parser)]
#[command(name = "rit")]
#[command(author = "Sudeep Ranjan Sahoo <sudeep.ranjan.sahoo@example.com>")]
#[command(version = "0.1.0")]
#[command(about = "A minimal Git-style version control core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new rit repository
    Init {
        /// Create a bare repository (no working copy)
        #[arg(long)]
        bare: bool,
    },

    /// Stage files into the index
    Add {
        /// Path to stage, or "." for the whole working copy
        path: String,
    },

    /// Decompress and print an object, or dump the raw index file
    #[command(name = "cat-file")]
    CatFile {
        /// A 40-char hash, an abbreviated prefix, or the literal "index"
        object: String,

        /// Strip the `<kind>\0<len>\0` header before printing
        #[arg(short = 'p')]
        pretty_print: bool,
    },

    /// Record a commit from the staged index
    Commit {
        /// The commit message
        #[arg(short, long)]
        message: Option<String>,

        /// First re-stage every already-tracked path
        #[arg(short = 'a')]
        auto_add: bool,
    },

    /// Show changes between the working copy, index, and committed tree
    Diff {
        /// HEAD (committed tree) vs. index
        #[arg(long)]
        cached: bool,

        /// Current HEAD vs. the named branch's tree
        #[arg(short = 'b', long = "branch")]
        branch: Option<String>,

        /// Current HEAD vs. an arbitrary commit's tree
        #[arg(short = 'c', long = "commit")]
        commit: Option<String>,

        /// The literal token "HEAD": committed tree vs. working copy
        head: Option<String>,
    },

    /// Create a branch at the current commit
    Branch {
        /// Name of the branch to create
        name: String,
    },

    /// Switch the working copy and index to another branch
    Checkout {
        /// Branch to switch to
        name: String,
    },

    /// Print the ref HEAD currently resolves to
    #[command(name = "current_branch")]
    CurrentBranch,

    /// Print a commit hash: the current branch's head, or a named branch's
    #[command(name = "latest_commit")]
    LatestCommit {
        /// "branch_name <name>", or omitted for the current branch
        args: Vec<String>,
    },

    /// Three-way merge a branch into the current one
    Merge {
        /// "branch_name <name>"
        args: Vec<String>,
    },
}

const DEFAULT_COMMIT_MESSAGE: &str = "Default Commit Message";

fn main() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command) {
        // §7: errors are printed to standard output, not a distinct error
        // stream, and dispatching a recognized command always exits zero.
        println!("{err}");
    }
}

fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init { bare } => {
            if bare {
                let cwd = std::env::current_dir()?;
                Repository::init_bare(&cwd)?;
            } else {
                commands::init::run(false)?;
            }
        }

        Commands::Add { path } => {
            let repo = Repository::find()?;
            commands::add::run(&repo, &path)?;
        }

        Commands::CatFile {
            object,
            pretty_print,
        } => {
            let repo = Repository::find()?;
            commands::cat_file::run(&repo, &object, pretty_print)?;
        }

        Commands::Commit { message, auto_add } => {
            let repo = Repository::find()?;
            let message = message.unwrap_or_else(prompt_for_message);
            commands::commit::run(&repo, &message, auto_add)?;
        }

        Commands::Diff {
            cached,
            branch,
            commit,
            head,
        } => {
            let repo = Repository::find()?;
            let target = resolve_diff_target(cached, branch, commit, head)?;
            commands::diff::run(&repo, target)?;
        }

        Commands::Branch { name } => {
            let repo = Repository::find()?;
            commands::branch::run(&repo, &name)?;
        }

        Commands::Checkout { name } => {
            let repo = Repository::find()?;
            commands::checkout::run(&repo, &name)?;
        }

        Commands::CurrentBranch => {
            let repo = Repository::find()?;
            commands::current_branch::run(&repo)?;
        }

        Commands::LatestCommit { args } => {
            let repo = Repository::find()?;
            let branch_name = parse_branch_name_args(&args, "latest_commit")?;
            commands::latest_commit::run(&repo, branch_name)?;
        }

        Commands::Merge { args } => {
            let repo = Repository::find()?;
            let branch_name = parse_branch_name_args(&args, "merge")?
                .ok_or_else(|| anyhow::anyhow!("usage: merge branch_name <name>"))?;
            commands::merge::run(&repo, branch_name)?;
        }
    }
    Ok(())
}

fn resolve_diff_target(
    cached: bool,
    branch: Option<String>,
    commit: Option<String>,
    head: Option<String>,
) -> anyhow::Result<DiffTarget> {
    if cached {
        return Ok(DiffTarget::Cached);
    }
    if let Some(branch) = branch {
        return Ok(DiffTarget::Branch(branch));
    }
    if let Some(commit) = commit {
        return Ok(DiffTarget::Commit(commit));
    }
    match head.as_deref() {
        Some("HEAD") => Ok(DiffTarget::Head),
        Some(other) => anyhow::bail!("fatal: unrecognized diff argument '{other}'"),
        None => Ok(DiffTarget::WorkdirVsIndex),
    }
}

/// `latest_commit branch_name <name>` / bare `latest_commit` share one
/// positional slot in the CLI form; `merge branch_name <name>` reuses the
/// same shape.
fn parse_branch_name_args<'a>(args: &'a [String], command: &str) -> anyhow::Result<Option<&'a str>> {
    match args {
        [] => Ok(None),
        [tag, name] if tag == "branch_name" => Ok(Some(name.as_str())),
        _ => anyhow::bail!("usage: {command} [branch_name <name>]"),
    }
}

fn prompt_for_message() -> String {
    use std::io::Write;
    print!("Enter commit message: ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => DEFAULT_COMMIT_MESSAGE.to_string(),
        Ok(_) => {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                DEFAULT_COMMIT_MESSAGE.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

#![allow(dead_code)]

use crate::areas::repository::Repository;
use crate::artifacts::core::Output;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "grit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal git core",
    long_about = "This is a minimal reimplementation of the git core, written in Rust. \
    It shares git's on-disk layout (objects, index, refs) and covers a small porcelain: \
    init, add, commit, checkout, log, branch, and fast-forward merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Add files or directories to the index",
        long_about = "This command hashes the specified files into the object database and stages \
        them in the index. Directories are expanded to the files they contain."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to add to the index")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command synthesizes a tree snapshot from the index and records it as a \
        commit on the current branch (or on a detached HEAD)."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Restore staged paths into the working tree",
        long_about = "This command materializes the blobs recorded in the index for the specified \
        paths back into the working tree, creating parent directories as needed."
    )]
    Checkout {
        #[arg(index = 1, required = true, help = "The paths to restore from the index")]
        paths: Vec<String>,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command pages the history reachable from HEAD, newest commit first."
    )]
    Log,
    #[command(
        name = "branch",
        about = "Create a branch at the current tip",
        long_about = "This command creates a new branch pointing at the commit HEAD currently \
        resolves to."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: String,
    },
    #[command(
        name = "merge",
        about = "Merge a branch into the current one (fast-forward only)",
        long_about = "This command advances the current branch to the tip of the target branch \
        when the current tip is an ancestor of the target. Any other shape is refused."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let root = match path {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            let mut repository = Repository::new(root, Output::stdout())?;

            repository.init()
        }
        Commands::Add { paths } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::new(pwd, Output::stdout())?;

            repository.add(paths)
        }
        Commands::Commit { message } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::new(pwd, Output::stdout())?;

            repository.commit(message)
        }
        Commands::Checkout { paths } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::new(pwd, Output::stdout())?;

            repository.checkout(paths)
        }
        Commands::Log => {
            let pwd = std::env::current_dir()?;

            // Page the output when attached to a terminal, fall back to
            // plain stdout otherwise (pipes, tests, CI).
            if std::io::stdout().is_terminal() {
                let pager = minus::Pager::new();
                let repository = Repository::new(pwd, Output::pager(pager.clone()))?;

                repository.log()?;
                minus::page_all(pager)?;
                Ok(())
            } else {
                let repository = Repository::new(pwd, Output::stdout())?;

                repository.log()
            }
        }
        Commands::Branch { name } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::new(pwd, Output::stdout())?;

            repository.branch(name)
        }
        Commands::Merge { branch } => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::new(pwd, Output::stdout())?;

            repository.merge(branch)
        }
    }
}

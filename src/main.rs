use anyhow::Result;
use bit::areas::repository::Repository;
use bit::artifacts::protocol::transport::HttpTransport;
use bit::config::Config;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A simple git implementation",
    long_about = "This is a simple implementation of git, written in Rust. \
    It stores objects in git's loose format and can clone from smart-HTTP remotes.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
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
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object (or a ref such as HEAD) to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes an object file and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the entries of a tree, or of the tree of a commit."
    )]
    LsTree {
        #[arg(long, help = "List only file names")]
        name_only: bool,
        #[arg(index = 1, help = "The tree or commit to list")]
        tree_ish: String,
    },
    #[command(
        name = "write-tree",
        about = "Create a tree object from the working directory"
    )]
    WriteTree,
    #[command(
        name = "commit-tree",
        about = "Create a new commit object from a tree",
        long_about = "This command creates a commit of the given tree and prints its SHA. \
        The author is read from GIT_AUTHOR_NAME and GIT_AUTHOR_EMAIL."
    )]
    CommitTree {
        #[arg(index = 1, help = "The tree to commit")]
        tree: String,
        #[arg(short, long, help = "The parent commit")]
        parent: Option<String>,
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "ls-remote",
        about = "List references in a remote repository"
    )]
    LsRemote {
        #[arg(index = 1, help = "The URL of the remote repository")]
        url: String,
    },
    #[command(
        name = "unpack-objects",
        about = "Unpack objects from a pack",
        long_about = "This command stores every object of a pack file (or of standard input) \
        in the object database and prints their SHAs."
    )]
    UnpackObjects {
        #[arg(index = 1, help = "The pack file; standard input when omitted")]
        file: Option<PathBuf>,
    },
    #[command(
        name = "clone",
        about = "Clone a repository into a new directory"
    )]
    Clone {
        #[arg(index = 1, help = "The URL of the remote repository")]
        url: String,
        #[arg(index = 2, help = "The directory to clone into")]
        directory: Option<String>,
    },
}

fn main() -> ExitCode {
    // RUST_LOG overrides the default directive
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bit=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "fatal:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from_env();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()), config)?,
                None => open_current(config)?,
            };

            repository.init()?
        }
        Commands::CatFile { sha } => open_current(config)?.cat_file(sha)?,
        Commands::HashObject { write, file } => open_current(config)?.hash_object(file, *write)?,
        Commands::LsTree {
            name_only,
            tree_ish,
        } => open_current(config)?.ls_tree(tree_ish, *name_only)?,
        Commands::WriteTree => open_current(config)?.write_tree()?,
        Commands::CommitTree {
            tree,
            parent,
            message,
        } => open_current(config)?.commit_tree(tree, parent.as_deref(), message)?,
        Commands::Commit { message } => open_current(config)?.commit(message.as_str())?,
        Commands::LsRemote { url } => {
            let transport = HttpTransport::new(&config)?;
            open_current(config)?.ls_remote(url, transport)?
        }
        Commands::UnpackObjects { file } => open_current(config)?.unpack_objects(file.as_deref())?,
        Commands::Clone { url, directory } => {
            let directory = match directory {
                Some(directory) => directory.clone(),
                None => directory_from_url(url)?,
            };
            let transport = HttpTransport::new(&config)?;
            let repository = Repository::new(&directory, Box::new(std::io::stdout()), config)?;

            repository.clone_from(url, transport)?
        }
    }

    Ok(())
}

fn open_current(config: Config) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()), config)
}

/// `https://host/org/repo.git/` clones into `repo`
fn directory_from_url(url: &str) -> Result<String> {
    let last = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(|segment| segment.trim_end_matches(".git"))
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .ok_or_else(|| anyhow::anyhow!("cannot derive a directory name from {url}"))?;

    Ok(last.to_string())
}

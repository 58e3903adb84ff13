use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tinygit::areas::repository::Repository;
use tinygit::artifacts::objects::object_type::ObjectType;
use tinygit::commands::porcelain::tag::TagOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tinygit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressable object store speaking git's on-disk format",
    long_about = "This is a small implementation of git's object model, written in Rust. \
    It reads and writes loose objects and refs in a regular .git directory, \
    but has no index, packfiles, diff or merge.",
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
        path: Option<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the raw payload of an object in the repository. \
        Tags and commits are followed until an object of the requested type is found."
    )]
    CatFile {
        #[arg(index = 1, help = "The object type: blob, tree, commit or tag")]
        object_type: String,
        #[arg(index = 2, help = "The object to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command computes the object ID of a file and can write it to the object database."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        object_type: String,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "log",
        about = "Display the history of a commit as a Graphviz graph",
        long_about = "This command prints one edge per parent of every commit reachable from the given commit."
    )]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The commit to start from")]
        commit: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the mode, type, object ID and path of every entry of a tree."
    )]
    LsTree {
        #[arg(index = 1, help = "The tree, or an object pointing to one")]
        object: String,
    },
    #[command(
        name = "checkout",
        about = "Write the tree of a commit into an empty directory",
        long_about = "This command materializes the tree of a commit inside a directory that must be empty or absent."
    )]
    Checkout {
        #[arg(index = 1, help = "The commit or tree to check out")]
        commit: String,
        #[arg(index = 2, help = "The empty directory to check out into")]
        path: PathBuf,
    },
    #[command(
        name = "show-ref",
        about = "List references",
        long_about = "This command lists every loose ref under refs/ and every packed ref."
    )]
    ShowRef,
    #[command(
        name = "tag",
        about = "List or create tags",
        long_about = "Without a name this command lists tags. \
        With a name it creates a lightweight tag, or an annotated one with -a or -m."
    )]
    Tag {
        #[arg(short, long, help = "Create an annotated tag object")]
        annotate: bool,
        #[arg(short, long, help = "The tag message")]
        message: Option<String>,
        #[arg(index = 1, help = "The name of the tag to create")]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD", help = "The object the tag points to")]
        object: String,
    },
}

/// Initialize tracing with `RUST_LOG` filtering, on stderr so stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn discover() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::discover(&pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let path = path.as_deref().unwrap_or(Path::new("."));
            Repository::init(path, Box::new(std::io::stdout()))?;
        }
        Commands::CatFile {
            object_type,
            object,
        } => {
            let object_type = ObjectType::try_from(object_type.as_str())?;
            discover()?.cat_file(object_type, object)?
        }
        Commands::HashObject {
            write,
            object_type,
            file,
        } => {
            let object_type = ObjectType::try_from(object_type.as_str())?;
            discover()?.hash_object(file, object_type, *write)?
        }
        Commands::Log { commit } => discover()?.log(commit)?,
        Commands::LsTree { object } => discover()?.ls_tree(object)?,
        Commands::Checkout { commit, path } => discover()?.checkout(commit, path)?,
        Commands::ShowRef => discover()?.show_ref()?,
        Commands::Tag {
            annotate,
            message,
            name,
            object,
        } => {
            let repository = discover()?;
            match name {
                Some(name) => repository.create_tag(
                    name,
                    object,
                    &TagOptions::new(*annotate, message.clone()),
                )?,
                None => repository.list_tags()?,
            }
        }
    }

    Ok(())
}

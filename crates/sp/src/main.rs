//! Stackpost CLI - edit per-post page documents.
//!
//! Provides commands for:
//! - `init`, `show`, `clone`, `publish`, `set`: whole documents
//! - `owner`: who may edit a post
//! - `page`: create, inspect and delete pages
//! - `element`: add, update, delete and reorder elements
//! - `config`: the stored defaults record

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    CloneArgs, ConfigCommand, Context, ElementCommand, GlobalArgs, InitArgs, OwnerCommand,
    PageCommand, PublishArgs, SetArgs, ShowArgs,
};
use error::CliError;
use output::Output;

/// Stackpost - per-post page documents.
#[derive(Parser)]
#[command(name = "sp", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the document of a post (requires --user).
    Init(InitArgs),
    /// Print a post's document as JSON.
    Show(ShowArgs),
    /// Copy a post's document to another post.
    Clone(CloneArgs),
    /// Move a draft document live.
    Publish(PublishArgs),
    /// Shallow-merge top-level fields into a document.
    Set(SetArgs),
    /// Owner commands.
    #[command(subcommand)]
    Owner(OwnerCommand),
    /// Page commands.
    #[command(subcommand)]
    Page(PageCommand),
    /// Element commands.
    #[command(subcommand)]
    Element(ElementCommand),
    /// Config record commands.
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Commands {
    fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Init(args) => args.execute(ctx),
            Self::Show(args) => args.execute(ctx),
            Self::Clone(args) => args.execute(ctx),
            Self::Publish(args) => args.execute(ctx),
            Self::Set(args) => args.execute(ctx),
            Self::Owner(cmd) => cmd.execute(ctx),
            Self::Page(cmd) => cmd.execute(ctx),
            Self::Element(cmd) => cmd.execute(ctx),
            Self::Config(cmd) => cmd.execute(ctx),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = Context::open(&cli.global).and_then(|ctx| cli.command.execute(&ctx));

    if let Err(err) = result {
        Output::new().error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dlog", about = "dlog - publish articles under a name", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the object store, registry and configuration
    #[arg(long, global = true, default_value = ".dlog")]
    pub root: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a dlog root with a default configuration
    Init(InitArgs),
    /// Register a name for a new author
    Register(RegisterArgs),
    /// Publish an article
    Publish(PublishArgs),
    /// List published articles, newest first
    List(ListArgs),
    /// Show an article by header reference
    Show(ShowArgs),
    /// Remove an article from an author's index
    Remove(RemoveArgs),
    /// Replace an article with a new version
    Replace(ReplaceArgs),
    /// Show who is behind a name
    Whois(WhoisArgs),
    /// Check the integrity of an author's index
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Items per segment
    #[arg(long)]
    pub segment_capacity: Option<usize>,
    /// Number of live segments
    #[arg(long)]
    pub live_segments: Option<usize>,
}

#[derive(Args)]
pub struct RegisterArgs {
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct ArticleArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub cover: Option<String>,
    #[command(flatten)]
    pub content: ContentArgs,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ContentArgs {
    /// Article body
    #[arg(long)]
    pub body: Option<String>,
    /// Read the article body from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct PublishArgs {
    pub name: String,
    #[command(flatten)]
    pub article: ArticleArgs,
}

#[derive(Args)]
pub struct ListArgs {
    pub name: String,
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct ShowArgs {
    pub header: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub name: String,
    pub header: String,
}

#[derive(Args)]
pub struct ReplaceArgs {
    pub name: String,
    pub header: String,
    #[command(flatten)]
    pub article: ArticleArgs,
}

#[derive(Args)]
pub struct WhoisArgs {
    pub name: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub name: String,
}

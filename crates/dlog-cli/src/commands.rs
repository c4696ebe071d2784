use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use dlog_names::{FileRegistry, NameRegistry};
use dlog_sdk::{Author, ChainConfig, ContentRef, Dlog, NewArticle};
use dlog_store::FsObjectStore;

use crate::cli::*;
use crate::config::{DlogConfig, CONFIG_FILE};

/// Registry document inside the dlog root.
const REGISTRY_FILE: &str = "names.json";

type FsDlog = Dlog<FsObjectStore, FileRegistry>;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = cli.root.as_path();
    match cli.command {
        Command::Init(args) => cmd_init(root, args).await,
        Command::Register(args) => cmd_register(&open(root)?, args).await,
        Command::Publish(args) => cmd_publish(&open(root)?, args).await,
        Command::List(args) => cmd_list(&open(root)?, args).await,
        Command::Show(args) => cmd_show(&open(root)?, args),
        Command::Remove(args) => cmd_remove(&open(root)?, args).await,
        Command::Replace(args) => cmd_replace(&open(root)?, args).await,
        Command::Whois(args) => cmd_whois(&open(root)?, args).await,
        Command::Verify(args) => cmd_verify(&open(root)?, args).await,
    }
}

fn open(root: &Path) -> anyhow::Result<FsDlog> {
    if !root.join(CONFIG_FILE).exists() {
        bail!(
            "no dlog root at {} (run `dlog init` first)",
            root.display()
        );
    }
    let config = DlogConfig::load(root)?;
    let store = FsObjectStore::open(root)
        .with_context(|| format!("opening object store in {}", root.display()))?;
    let registry = FileRegistry::open(root.join(REGISTRY_FILE));
    Ok(Dlog::new(store, registry).with_config(config.chain))
}

fn parse_ref(text: &str) -> anyhow::Result<ContentRef> {
    text.parse()
        .with_context(|| format!("{text:?} is not a content reference"))
}

fn draft(args: ArticleArgs) -> anyhow::Result<NewArticle> {
    let body = match (args.content.body, args.content.file) {
        (Some(body), _) => body,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => bail!("an article needs --body or --file"),
    };
    let mut draft = NewArticle::new(args.title, body);
    if let Some(summary) = args.summary {
        draft = draft.with_summary(summary);
    }
    if let Some(cover) = args.cover {
        draft = draft.with_cover_image(cover);
    }
    for tag in args.tags {
        draft = draft.with_tag(tag);
    }
    Ok(draft)
}

async fn cmd_init(root: &Path, args: InitArgs) -> anyhow::Result<()> {
    fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;
    let mut config = DlogConfig::load(root)?;
    let defaults = ChainConfig::default();
    let requested = ChainConfig::new(
        args.segment_capacity.unwrap_or(config.chain.segment_capacity),
        args.live_segments.unwrap_or(config.chain.live_segments),
    )?;

    // Existing chains were built with the stored shape and cannot be reshaped.
    if requested != config.chain {
        let names = FileRegistry::open(root.join(REGISTRY_FILE)).names().await?;
        if !names.is_empty() {
            bail!(
                "{} already indexes {} author(s) with {} items x {} live segments; \
                 the chain shape cannot change",
                root.display(),
                names.len(),
                config.chain.segment_capacity,
                config.chain.live_segments
            );
        }
    }
    config.chain = requested;
    config.save(root)?;
    FsObjectStore::open(root)?;

    println!("{} Initialized dlog root in {}", "✓".green().bold(), root.display().to_string().bold());
    let shape = format!(
        "{} items x {} live segments",
        config.chain.segment_capacity, config.chain.live_segments
    );
    if config.chain == defaults {
        println!("  Chain: {}", shape.cyan());
    } else {
        println!("  Chain: {} {}", shape.cyan(), "(custom)".dimmed());
    }
    Ok(())
}

async fn cmd_register(dlog: &FsDlog, args: RegisterArgs) -> anyhow::Result<()> {
    let mut author = Author::new(&args.name);
    if let Some(description) = args.description {
        author = author.with_description(description);
    }
    if let Some(image) = args.image {
        author = author.with_profile_image(image);
    }
    let pointer = dlog.register(&args.name, &author).await?;
    println!("{} Registered {}", "✓".green().bold(), args.name.yellow().bold());
    println!("  Head pointer: {}", pointer.short_hex().dimmed());
    Ok(())
}

async fn cmd_publish(dlog: &FsDlog, args: PublishArgs) -> anyhow::Result<()> {
    let draft = draft(args.article)?;
    let title = draft.title.clone();
    let mut session = dlog.open_session(&args.name).await?;
    let receipt = session.publish_article(draft).await?;

    println!("{} Published {}", "✓".green().bold(), title.bold());
    println!("  Header: {}", receipt.header.to_string().yellow());
    if receipt.rebalanced {
        println!("  Index: {}", "segment archived".cyan());
    }
    Ok(())
}

async fn cmd_list(dlog: &FsDlog, args: ListArgs) -> anyhow::Result<()> {
    let articles = dlog.articles(&args.name, Some(args.limit)).await?;
    if articles.is_empty() {
        println!("No articles published by {}.", args.name.yellow());
        return Ok(());
    }
    for entry in articles {
        let header = &entry.header;
        println!(
            "{}  {}  {}",
            entry.header_ref.short_hex().yellow(),
            header.published_at.format("%Y-%m-%d").to_string().dimmed(),
            header.title.bold()
        );
        if !header.summary.is_empty() {
            println!("    {}", header.summary);
        }
    }
    Ok(())
}

fn cmd_show(dlog: &FsDlog, args: ShowArgs) -> anyhow::Result<()> {
    let header_ref = parse_ref(&args.header)?;
    let header = dlog.article_header(&header_ref)?;
    let article = dlog.article(&header.article)?;

    println!("{}", header.title.bold());
    println!("  Published: {}", header.published_at.to_rfc3339());
    println!("  Article:   {}", header.article_id.to_string().dimmed());
    if !header.tags.is_empty() {
        println!("  Tags:      {}", header.tags.join(", ").cyan());
    }
    if let Some(cover) = &header.cover_image {
        println!("  Cover:     {}", cover.blue());
    }
    if !header.summary.is_empty() {
        println!("\n{}", header.summary.italic());
    }
    println!("\n{}", article.body);
    Ok(())
}

async fn cmd_remove(dlog: &FsDlog, args: RemoveArgs) -> anyhow::Result<()> {
    let header_ref = parse_ref(&args.header)?;
    let mut session = dlog.open_session(&args.name).await?;
    match session.remove_article(&header_ref).await? {
        Some(_) => println!("{} Removed {}", "✓".green().bold(), header_ref.short_hex().yellow()),
        None => println!(
            "{} {} is not in the index of {}",
            "!".yellow().bold(),
            header_ref.short_hex(),
            args.name.yellow()
        ),
    }
    Ok(())
}

async fn cmd_replace(dlog: &FsDlog, args: ReplaceArgs) -> anyhow::Result<()> {
    let header_ref = parse_ref(&args.header)?;
    let draft = draft(args.article)?;
    let mut session = dlog.open_session(&args.name).await?;
    match session.replace_article(&header_ref, draft).await? {
        Some(receipt) => {
            println!("{} Replaced {}", "✓".green().bold(), header_ref.short_hex().yellow());
            println!("  Header: {}", receipt.header.to_string().yellow());
        }
        None => println!(
            "{} {} is not in the index of {}",
            "!".yellow().bold(),
            header_ref.short_hex(),
            args.name.yellow()
        ),
    }
    Ok(())
}

async fn cmd_whois(dlog: &FsDlog, args: WhoisArgs) -> anyhow::Result<()> {
    let pointer = dlog.head_pointer(&args.name).await?;
    let author = dlog.author(&args.name).await?;

    println!("{}", author.name.yellow().bold());
    if !author.description.is_empty() {
        println!("  {}", author.description);
    }
    if !author.profile_image.is_empty() {
        println!("  Image: {}", author.profile_image.blue());
    }
    match pointer.chain_head {
        Some(head) => println!("  Index head: {}", head.short_hex().dimmed()),
        None => println!("  Index head: {}", "(nothing published)".dimmed()),
    }
    Ok(())
}

async fn cmd_verify(dlog: &FsDlog, args: VerifyArgs) -> anyhow::Result<()> {
    let report = dlog.verify(&args.name).await?;
    if report.is_valid() {
        println!("{} Index of {} verified", "✓".green().bold(), args.name.yellow());
    } else {
        println!("{} Index of {} has problems", "✗".red().bold(), args.name.yellow());
    }
    println!(
        "  Segments: {} ({} live, {} archived)",
        report.segments, report.live, report.archived
    );
    println!("  Articles: {}", report.items);
    for violation in &report.violations {
        println!(
            "  {} segment {}: {}",
            "✗".red(),
            violation.depth,
            violation.description
        );
    }
    if !report.is_valid() {
        bail!("{} integrity violation(s)", report.violations.len());
    }
    Ok(())
}

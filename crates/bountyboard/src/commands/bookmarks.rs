//! Bookmarks command - saved bounties and projects.

use std::sync::Arc;

use anyhow::Result;
use bountyboard_state::{BookmarkManager, Notice, NoticeLevel, Notifier};
use bountyboard_types::{BookmarkKind, Listing};
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use super::{Context, print_json};

/// Arguments for the bookmarks command.
#[derive(Args, Debug)]
pub struct BookmarksArgs {
    #[command(subcommand)]
    pub command: BookmarksCommand,
}

#[derive(Subcommand, Debug)]
pub enum BookmarksCommand {
    /// List saved bookmarks
    List {
        /// Only show one kind (bounty or project)
        #[arg(long)]
        kind: Option<BookmarkKind>,
    },

    /// Save or unsave a bounty or project
    Toggle {
        /// bounty or project
        kind: BookmarkKind,
        /// Item id
        id: String,
    },

    /// Fetch full details of every bookmark from the backend
    Show,

    /// Remove all bookmarks
    Clear,
}

/// Prints notices to stderr.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => eprintln!("{} {}", style("✓").green(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", style("✗").red(), notice.message),
        }
    }
}

/// Run the bookmarks command.
pub async fn run(args: BookmarksArgs, ctx: &Context) -> Result<()> {
    let mut manager = open_manager(ctx);
    match args.command {
        BookmarksCommand::List { kind } => cmd_list(&manager, kind, ctx),
        BookmarksCommand::Toggle { kind, id } => cmd_toggle(&mut manager, kind, &id, ctx),
        BookmarksCommand::Show => cmd_show(&manager, ctx).await,
        BookmarksCommand::Clear => cmd_clear(&mut manager, ctx),
    }
}

fn open_manager(ctx: &Context) -> BookmarkManager {
    let manager = BookmarkManager::with_key(ctx.store(), ctx.config().bookmarks_key());
    if ctx.json_output {
        manager
    } else {
        manager.with_notifier(Arc::new(ConsoleNotifier))
    }
}

fn cmd_list(manager: &BookmarkManager, kind: Option<BookmarkKind>, ctx: &Context) -> Result<()> {
    let items: Vec<_> = manager
        .items()
        .iter()
        .filter(|item| kind.is_none_or(|k| item.kind == k))
        .collect();

    if ctx.json_output {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("No bookmarks saved.");
        return Ok(());
    }

    println!("{:<8} {:<28} SAVED", "TYPE", "ID");
    for item in items {
        println!(
            "{:<8} {:<28} {}",
            item.kind,
            item.id,
            item.saved_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn cmd_toggle(
    manager: &mut BookmarkManager,
    kind: BookmarkKind,
    id: &str,
    ctx: &Context,
) -> Result<()> {
    let bookmarked = manager.toggle_bookmark(id, kind);
    if ctx.json_output {
        return print_json(&json!({ "id": id, "type": kind, "bookmarked": bookmarked }));
    }
    Ok(())
}

async fn cmd_show(manager: &BookmarkManager, ctx: &Context) -> Result<()> {
    if manager.is_empty() {
        if ctx.json_output {
            return print_json(&Vec::<Listing>::new());
        }
        println!("No bookmarks saved.");
        return Ok(());
    }

    let client = ctx.client()?;
    let listings = client.bookmarks().hydrate(manager.items()).await;

    if ctx.json_output {
        return print_json(&listings);
    }

    for listing in &listings {
        let detail = match listing {
            Listing::Bounty(b) => b.status.clone().unwrap_or_default(),
            Listing::Project(p) => p.status.clone().unwrap_or_default(),
        };
        println!(
            "{:<8} {}  {}",
            listing.kind(),
            style(listing.title()).bold(),
            style(detail).dim()
        );
    }
    let missing = manager.len() - listings.len();
    if missing > 0 {
        println!(
            "{}",
            style(format!("{} bookmark(s) could not be loaded", missing)).yellow()
        );
    }
    Ok(())
}

fn cmd_clear(manager: &mut BookmarkManager, ctx: &Context) -> Result<()> {
    let removed = manager.len();
    manager.clear();
    if ctx.json_output {
        return print_json(&json!({ "removed": removed }));
    }
    println!("Removed {} bookmark(s).", removed);
    Ok(())
}

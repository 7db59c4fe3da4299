//! Winners command - draft and submit the winners of a bounty.

use anyhow::Result;
use bountyboard_state::WinnerDraftManager;
use bountyboard_types::{WinnerDraft, WinnerPatch};
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use super::{Context, print_json};

/// Arguments for the winners command.
#[derive(Args, Debug)]
pub struct WinnersArgs {
    /// Bounty whose winners are being drafted
    pub bounty: String,

    #[command(subcommand)]
    pub command: WinnersCommand,
}

/// Optional fields shared by `add` and `update`.
#[derive(Args, Debug)]
pub struct DetailArgs {
    /// Avatar URL
    #[arg(long)]
    pub avatar: Option<String>,

    /// Feedback for the winner
    #[arg(long)]
    pub feedback: Option<String>,

    /// Rating from 1 to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum WinnersCommand {
    /// Show the current draft
    List,

    /// Place a submission at a position
    Add {
        /// Position (1 = first place)
        #[arg(long)]
        position: u32,

        /// Submission id
        #[arg(long)]
        submission: String,

        /// Id of the submitting user
        #[arg(long)]
        user: String,

        /// Display name of the submitting user
        #[arg(long)]
        name: String,

        /// Prize amount
        #[arg(long)]
        amount: f64,

        #[command(flatten)]
        details: DetailArgs,
    },

    /// Remove the winner at a position
    Remove {
        /// Position to clear
        position: u32,
    },

    /// Change fields of the winner at a position
    Update {
        /// Position to update
        position: u32,

        /// New submission id
        #[arg(long)]
        submission: Option<String>,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New prize amount
        #[arg(long)]
        amount: Option<f64>,

        #[command(flatten)]
        details: DetailArgs,
    },

    /// Discard the draft
    Clear,

    /// Show the positions still open
    Available {
        /// Number of prize positions (1 to 100)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=100))]
        total: u32,
    },

    /// Send the draft to the backend
    Submit,
}

/// Run the winners command.
pub async fn run(args: WinnersArgs, ctx: &Context) -> Result<()> {
    let mut manager =
        WinnerDraftManager::with_prefix(ctx.store(), ctx.config().winners_prefix(), &args.bounty);

    match args.command {
        WinnersCommand::List => cmd_list(&manager, ctx),
        WinnersCommand::Add {
            position,
            submission,
            user,
            name,
            amount,
            details,
        } => {
            let mut winner = WinnerDraft::new(submission, user, name, position, amount);
            winner.avatar = details.avatar;
            winner.feedback = details.feedback;
            winner.rating = details.rating;
            manager.add_winner(winner)?;
            cmd_list(&manager, ctx)
        }
        WinnersCommand::Remove { position } => {
            if manager.remove_winner(position).is_none() {
                anyhow::bail!("No winner at position {}", position);
            }
            cmd_list(&manager, ctx)
        }
        WinnersCommand::Update {
            position,
            submission,
            name,
            amount,
            details,
        } => {
            let patch = WinnerPatch {
                submission_id: submission,
                name,
                avatar: details.avatar,
                amount,
                feedback: details.feedback,
                rating: details.rating,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update");
            }
            if !manager.update_winner(position, patch)? {
                anyhow::bail!("No winner at position {}", position);
            }
            cmd_list(&manager, ctx)
        }
        WinnersCommand::Clear => {
            manager.clear_winners();
            if ctx.json_output {
                return print_json(&json!({ "bountyId": manager.bounty_id(), "cleared": true }));
            }
            println!("Draft cleared.");
            Ok(())
        }
        WinnersCommand::Available { total } => {
            let positions = manager.available_positions(total);
            if ctx.json_output {
                return print_json(&positions);
            }
            let rendered: Vec<String> = positions.iter().map(u32::to_string).collect();
            println!("{}", rendered.join(" "));
            Ok(())
        }
        WinnersCommand::Submit => cmd_submit(&mut manager, ctx).await,
    }
}

fn cmd_list(manager: &WinnerDraftManager, ctx: &Context) -> Result<()> {
    if ctx.json_output {
        return print_json(&json!({
            "bountyId": manager.bounty_id(),
            "winners": manager.winners(),
            "totalAmount": manager.total_amount(),
        }));
    }

    if manager.is_empty() {
        println!("No winners drafted for {}.", manager.bounty_id());
        return Ok(());
    }

    println!("{:<4} {:<20} {:<20} {:>10}", "POS", "NAME", "SUBMISSION", "AMOUNT");
    for winner in manager.winners() {
        println!(
            "{:<4} {:<20} {:<20} {:>10.2}",
            winner.position, winner.name, winner.submission_id, winner.amount
        );
    }
    println!("{:<46} {:>10.2}", "Total", manager.total_amount());
    Ok(())
}

async fn cmd_submit(manager: &mut WinnerDraftManager, ctx: &Context) -> Result<()> {
    if manager.is_empty() {
        anyhow::bail!("No winners drafted for {}", manager.bounty_id());
    }

    let client = ctx.client()?;
    client
        .bounties()
        .submit_winners(manager.bounty_id(), manager.winners())
        .await?;

    let count = manager.len();
    manager.clear_winners();

    if ctx.json_output {
        return print_json(&json!({ "bountyId": manager.bounty_id(), "submitted": count }));
    }
    println!("{} Submitted {} winner(s).", style("✓").green(), count);
    Ok(())
}

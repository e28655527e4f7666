//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the trellis tool:
//! rendering the stack view and resolving rearrangement gestures into
//! canonical commands.

mod move_cmd;
mod new;
mod stacks;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use trellis_core::output::ColorMode;

/// Top-level CLI command for the trellis tool
#[derive(Parser)]
#[command(name = "trellis")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Render commit history as connected stacks and rearrange it")]
#[command(
  long_about = "Trellis renders a repository's commit history as connected stacks —\n\
        maximal unbranching chains of commits — laid out in deterministic levels.\n\n\
        Rearrangement gestures (moving a change, a file, a hunk, or a bookmark\n\
        relative to another commit) resolve into canonical history-editing commands."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the trellis tool
#[derive(Subcommand)]
pub enum Commands {
  /// Render the stack view of the repository
  #[command(long_about = "Render the repository's commit history as connected stacks.\n\n\
            Commits are partitioned into maximal unbranching chains and laid out in\n\
            levels from the roots down. Connections between stacks are classified as\n\
            linear, branch, or merge; concurrently developed sibling stacks are\n\
            marked as parallel groups.")]
  #[command(alias = "s")]
  Stacks(stacks::StacksArgs),

  /// Resolve a rearrangement gesture into a canonical command
  #[command(
    long_about = "Resolve a rearrangement gesture into the canonical command it would\n\
            dispatch.\n\n\
            Pick exactly one payload (--change, --file, --hunk, --bookmark, or a raw\n\
            --payload JSON transfer) and exactly one target (--before, --after,\n\
            --between, --onto, --new-branch). The resolved command is previewed, not\n\
            executed; execution belongs to the backing engine."
  )]
  #[command(alias = "mv")]
  Move(move_cmd::MoveArgs),

  /// Create an empty change branching off a commit
  #[command(long_about = "Create an empty change branching off the given commit.\n\n\
            This is the direct zero-payload trigger of a new-branch target; it goes\n\
            through the same single-flight command gate as every other command.")]
  New(new::NewArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  // Set global color override based on --colors argument
  match cli.colors {
    ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
    ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
    ColorMode::Auto => {
      // Let owo_colors use its default auto-detection
    }
  }

  match cli.command {
    Commands::Stacks(stacks) => stacks::handle_stacks_command(stacks),
    Commands::Move(move_args) => move_cmd::handle_move_command(move_args),
    Commands::New(new) => new::handle_new_command(new),
  }
}

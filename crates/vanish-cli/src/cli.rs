use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use vanish_core::{NoteId, VERSION};

/// Vanish - encrypted notes that destroy themselves
#[derive(Parser)]
#[command(name = "vanish")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the note database
    #[arg(long, global = true, env = "VANISH_DB_PATH")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing vault (notes under the old password become unreadable)
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Limit and flag options shared by `add` and `edit`
#[derive(Args)]
pub struct LimitArgs {
    /// Destroy the note after this many reads
    #[arg(long, value_name = "N")]
    pub max_opens: Option<u32>,

    /// Destroy the note after this time (ISO-8601 or YYYY-MM-DD)
    #[arg(long, value_name = "WHEN", conflicts_with = "ttl")]
    pub expires: Option<String>,

    /// Destroy the note after this long (e.g., "30m", "24h", "7d")
    #[arg(long, value_name = "DURATION")]
    pub ttl: Option<String>,

    /// Mark the note as a reflection
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub reflection: Option<bool>,

    /// Store the blind-mode flag on the note (recorded only, display is unchanged)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub blind: Option<bool>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Note title
    #[arg(long)]
    pub title: String,

    /// Note content (overrides stdin/prompt)
    #[arg(long)]
    pub content: Option<String>,

    #[command(flatten)]
    pub limits: LimitArgs,
}

/// Arguments for the `read` command
#[derive(Args)]
pub struct ReadArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: NoteId,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: NoteId,

    /// New title (defaults to the current one)
    #[arg(long)]
    pub title: Option<String>,

    /// New content (overrides stdin/prompt)
    #[arg(long)]
    pub content: Option<String>,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Remove the read limit
    #[arg(long, conflicts_with = "max_opens")]
    pub no_max_opens: bool,

    /// Remove the expiry
    #[arg(long, conflicts_with_all = ["expires", "ttl"])]
    pub no_expiry: bool,
}

/// Arguments for the `rm` command
#[derive(Args)]
pub struct RmArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: NoteId,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set the vault password
    Init(InitArgs),

    /// Show vault status
    Status(StatusArgs),

    /// Add a new note
    Add(AddArgs),

    /// Read a note (counts towards its read limit)
    Read(ReadArgs),

    /// Replace a note's title, content, limits or flags
    Edit(EditArgs),

    /// Delete a note
    Rm(RmArgs),

    /// List notes (titles only, does not count as a read)
    List(ListArgs),

    /// Delete every note that has reached its limit
    Purge,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::diff::ChangeKind;

#[derive(Parser)]
#[command(name = "snapkeep")]
#[command(about = "Compare snapper snapshots and manage cleanup settings")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Snapper configuration name (defaults to "root")
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Directory holding snapper configuration files
    #[arg(long, global = true)]
    pub configs_dir: Option<PathBuf>,

    /// Path to snapkeep's own settings file
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Log debug details to stderr
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List snapshots of the configuration
    List,

    /// Compare two snapshots
    Compare(CompareArgs),

    /// Inspect or edit cleanup settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Base snapshot number
    pub base: u32,

    /// Target snapshot number (0 is the live system)
    pub target: u32,

    /// Show one category of changes: added, removed, modified or other
    #[arg(long)]
    pub kind: Option<ChangeKind>,

    /// Page to show when --kind is given, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: i64,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current cleanup settings
    Show,

    /// List editable settings and their accepted values
    Keys,

    /// Validate every cleanup setting in the file
    Check,

    /// Change one cleanup setting
    Set(SetArgs),
}

#[derive(Parser)]
pub struct SetArgs {
    /// Setting name, e.g. TIMELINE_LIMIT_HOURLY
    pub key: String,

    /// New value
    pub value: String,

    /// Add the setting if the file does not contain it yet
    #[arg(long, default_value_t = false)]
    pub add: bool,
}

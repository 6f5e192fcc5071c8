use clap::{Parser, Subcommand};

/// Select and validate the active AWS credential + region pair.
///
/// Each workspace context keeps its own selection and recently-used lists.
#[derive(Parser, Debug)]
#[command(name = "awsctx", about = "Manage the active AWS connection per workspace")]
pub struct CliArgs {
    /// Workspace context whose selection is read and written
    #[arg(long, short, env = "AWSCTX_WORKSPACE", default_value = "default")]
    pub workspace: String,

    /// Skip the STS call; a pair is valid when both ids are registered
    #[arg(long)]
    pub offline: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current connection state and recently used ids
    Status,
    /// Select a credential profile
    UseProfile { credential_id: String },
    /// Select a region
    UseRegion { region_id: String },
    /// Select a credential profile and region together
    Use {
        credential_id: String,
        region_id: String,
    },
    /// Validate the current selection again
    Refresh,
    /// List registered credential profiles
    Profiles,
    /// List known regions
    Regions {
        /// Only regions of this partition (aws, aws-cn, aws-us-gov)
        #[arg(long)]
        partition: Option<String>,
    },
    /// Print every state change; reload profiles when the AWS config files change
    Watch,
}

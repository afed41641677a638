use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Color theme for the contribution graph (default, noir, plain)
    #[arg(long, global = true, value_name = "THEME")]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect a Habitica account
    ///
    /// Example: streakchart login --username ada --password secret
    /// Example: streakchart login --user-id <uuid> --api-token <token>
    Login {
        /// Habitica username or email (with --password)
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Existing API user id (with --api-token)
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        api_token: Option<String>,
    },
    /// Forget the stored credentials
    ///
    /// Example: streakchart logout
    Logout,
    /// List the daily tasks available for tracking
    ///
    /// Example: streakchart habits
    Habits,
    /// Choose which daily task the chart tracks
    ///
    /// Example: streakchart select 7a52c3e1-...
    Select {
        id: String,
    },
    /// Re-fetch the tracked daily and rebuild the cached series
    ///
    /// Example: streakchart refresh
    Refresh,
    /// Render the full contribution graph from the cache
    ///
    /// Example: streakchart show
    Show,
    /// Render the compact widget view
    ///
    /// Example: streakchart widget
    /// Example: streakchart widget --timeline
    Widget {
        /// Print the 24-hour snapshot timeline instead of one view
        #[arg(long)]
        timeline: bool,
    },
    /// Report authentication, selection and cache state
    ///
    /// Example: streakchart status
    Status,
}

use clap::{Parser, Subcommand};

/// Manage AIStaff agents and marketplace listings from the terminal.
#[derive(Debug, Parser)]
#[command(name = "aistaff", version, about)]
pub struct Cli {
    /// Backend base URL (overrides AISTAFF_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and persist the session tokens.
    Login {
        #[arg(long)]
        username: String,
        /// Prompted for interactively when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account, then sign in with the same credentials.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Forget the stored tokens and reset the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Work with your agent records.
    #[command(subcommand)]
    Agents(AgentsCommand),
    /// Browse and manage marketplace listings.
    #[command(subcommand)]
    Marketplace(MarketplaceCommand),
}

#[derive(Debug, Subcommand)]
pub enum AgentsCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Repeat for each capability tag.
        #[arg(long = "capability")]
        capabilities: Vec<String>,
    },
    Delete {
        id: i64,
    },
    /// Enumerate the capability tags the backend accepts.
    Capabilities,
}

#[derive(Debug, Subcommand)]
pub enum MarketplaceCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long = "capability")]
        capabilities: Vec<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long = "capability")]
        capabilities: Vec<String>,
    },
    Delete {
        id: i64,
    },
    /// Install a published listing as one of your agents.
    Install {
        id: i64,
    },
}

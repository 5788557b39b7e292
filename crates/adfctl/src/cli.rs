//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};

/// Data Factory activity type management CLI
#[derive(Parser, Debug)]
#[command(name = "adfctl")]
#[command(version, about = "Data Factory activity type management CLI")]
#[command(long_about = "
Data Factory activity type management CLI

Register, inspect and remove custom activity types on a data factory
through the resource manager REST API.

EXAMPLES:
    # Set up a profile
    adfctl profile set prod --subscription-id SUB --access-token TOKEN \\
        --resource-group analytics --factory factory-prod

    # List activity types as a table
    adfctl activity-type list

    # Get one definition as YAML
    adfctl activity-type get MyActivity -o yaml

    # Filter output with JMESPath
    adfctl activity-type list --all -q '[].name'

    # Register from a JSON file
    adfctl activity-type create --file my-activity.json

    # Delete and wait for completion
    adfctl activity-type delete MyActivity

For more help on a specific command, run:
    adfctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "ADFCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ADFCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// JMESPath query to filter output
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Automatically choose format based on command and context
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Activity type operations
    #[command(subcommand, name = "activity-type", visible_alias = "at")]
    ActivityType(ActivityTypeCommands),

    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    #[command(after_help = "EXAMPLES:
    # Create a profile
    adfctl profile set prod --subscription-id SUB --access-token TOKEN

    # Reference environment variables from the config file instead
    #   access_token = \"${AZURE_ACCESS_TOKEN}\"

    # List all profiles
    adfctl profile list

    # Make a profile the default
    adfctl profile default prod
")]
    Profile(ProfileCommands),

    /// Show version information
    #[command(visible_alias = "ver")]
    Version,
}

/// Resource group and data factory a command operates on
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Resource group (defaults to the profile's resource_group)
    #[arg(long, short = 'g')]
    pub resource_group: Option<String>,

    /// Data factory name (defaults to the profile's data_factory)
    #[arg(long = "factory", short = 'f')]
    pub factory: Option<String>,
}

/// Activity type commands
#[derive(Subcommand, Debug)]
pub enum ActivityTypeCommands {
    /// Get one activity type
    Get {
        /// Activity type name
        name: String,

        /// Registration scope to look in
        #[arg(long)]
        scope: Option<String>,

        #[command(flatten)]
        target: ScopeArgs,
    },

    /// List activity types
    #[command(visible_alias = "ls")]
    #[command(after_help = "EXAMPLES:
    # First page only
    adfctl activity-type list

    # Every page
    adfctl activity-type list --all

    # Continue from a next link printed by an earlier call
    adfctl activity-type list --next-link 'https://management.azure.com/...'
")]
    List {
        /// Only list types with this name
        #[arg(long)]
        name: Option<String>,

        /// Registration scope filter
        #[arg(long)]
        scope: Option<String>,

        /// Include every registered version
        #[arg(long)]
        all_versions: bool,

        /// Follow next links and return every page
        #[arg(long, conflicts_with = "next_link")]
        all: bool,

        /// Fetch the page behind a next link
        #[arg(long)]
        next_link: Option<String>,

        #[command(flatten)]
        target: ScopeArgs,
    },

    /// Create or update an activity type from an ActivityType JSON document
    Create {
        /// File holding the ActivityType JSON ("-" for stdin)
        #[arg(long)]
        file: String,

        #[command(flatten)]
        target: ScopeArgs,
    },

    /// Create or update an activity type, sending the JSON body as-is
    #[command(name = "create-raw")]
    CreateRaw {
        /// Activity type name
        name: String,

        /// File holding the request body ("-" for stdin)
        #[arg(long, conflicts_with = "data", required_unless_present = "data")]
        file: Option<String>,

        /// Request body given inline
        #[arg(long)]
        data: Option<String>,

        #[command(flatten)]
        target: ScopeArgs,
    },

    /// Delete an activity type
    #[command(visible_alias = "rm")]
    Delete {
        /// Activity type name
        name: String,

        /// Return once the service accepts the delete
        #[arg(long)]
        no_wait: bool,

        /// Maximum time to wait in seconds (defaults to the profile setting)
        #[arg(long, conflicts_with = "no_wait")]
        wait_timeout: Option<u64>,

        /// Polling interval in seconds, overriding the server's Retry-After
        #[arg(long, conflicts_with = "no_wait")]
        wait_interval: Option<u64>,

        #[command(flatten)]
        target: ScopeArgs,
    },
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add")]
    Set {
        /// Profile name
        name: String,

        /// Subscription id
        #[arg(long)]
        subscription_id: String,

        /// Bearer access token
        #[arg(long)]
        access_token: String,

        /// Resource manager endpoint
        #[arg(long, default_value = datafactory_core::config::config::DEFAULT_API_URL)]
        api_url: String,

        /// API version sent with every request
        #[arg(long, default_value = datafactory_core::config::config::DEFAULT_API_VERSION)]
        api_version: String,

        /// Default resource group
        #[arg(long)]
        resource_group: Option<String>,

        /// Default data factory
        #[arg(long = "factory")]
        factory: Option<String>,

        /// Seconds to wait before the first status poll
        #[arg(long)]
        initial_delay: Option<u64>,

        /// Seconds between status polls
        #[arg(long)]
        retry_delay: Option<u64>,

        /// Seconds to wait for long-running operations
        #[arg(long)]
        timeout: Option<u64>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,

        /// Store the access token in the OS keyring
        #[cfg(feature = "secure-storage")]
        #[arg(long)]
        use_keyring: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm")]
    Remove {
        /// Profile name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Set the default profile
    Default {
        /// Profile name
        name: String,
    },
}

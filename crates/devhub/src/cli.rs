//! Clap derive structures for the `devhub` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use devhub_core::DeviceType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// devhub -- manage registered IoT devices from the command line
#[derive(Debug, Parser)]
#[command(
    name = "devhub",
    version,
    about = "Manage registered IoT devices from the command line",
    long_about = "Console for a devhub device registry server.\n\n\
        Log in once, then list, create, edit and delete devices and their\n\
        configuration. Every change is reconciled against the server.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "DEVHUB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 's', env = "DEVHUB_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides the stored one)
    #[arg(long, env = "DEVHUB_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DEVHUB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DEVHUB_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "DEVHUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Create an account and store the session token
    Register(RegisterArgs),

    /// Forget the stored session token
    Logout,

    /// Manage registered devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "DEVHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name (prompted if omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "DEVHUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices
    #[command(alias = "ls")]
    List,

    /// Show one device and its configuration
    Get {
        /// Device id
        id: String,
    },

    /// Register a new device
    Create(CreateArgs),

    /// Edit a device's configuration (name and type are fixed)
    Edit(EditArgs),

    /// Delete a device (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Device id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Device name
    #[arg(long, short = 'n', required_unless_present = "from_file")]
    pub name: Option<String>,

    /// Device type
    #[arg(long = "type", short = 't', value_name = "TYPE", required_unless_present = "from_file")]
    pub device_type: Option<DeviceKind>,

    /// Configuration entry, repeatable
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Read the full draft ({name, type, config}) from a JSON file
    #[arg(long, short = 'F', value_name = "PATH", conflicts_with_all = ["name", "device_type"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Device id
    pub id: String,

    /// Set a configuration entry, repeatable
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Remove a configuration entry, repeatable
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,

    /// Start from an empty configuration
    #[arg(long)]
    pub clear: bool,
}

/// Device kinds offered when creating a device.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceKind {
    Thermostat,
    Light,
    /// Security camera
    Camera,
}

impl From<DeviceKind> for DeviceType {
    fn from(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Thermostat => Self::Thermostat,
            DeviceKind::Light => Self::Light,
            DeviceKind::Camera => Self::Camera,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set the server URL of the active profile
    SetServer {
        /// API base URL, e.g. http://localhost:4000/api
        url: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

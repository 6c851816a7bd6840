//! Command dispatch: bridges CLI args -> core registry -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod devices;
pub mod util;

use devhub_config::Config;
use devhub_core::{ApiClient, DeviceRegistry, HttpTransport};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: ApiClient<HttpTransport>,
    cfg: Config,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(&client, cfg, profile_name, args, global).await,
        Command::Register(args) => auth::register(&client, cfg, profile_name, args, global).await,
        Command::Logout => auth::logout(&client, cfg, profile_name, global),
        Command::Devices(args) => {
            let registry = DeviceRegistry::new(client);
            devices::handle(&registry, args, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

//! CLI definitions for the `zeny` binary.
//!
//! Required service values come from flags or, more usually, the `ZENY_*`
//! environment variables. Startup fails immediately when any is missing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use zeny_types::config::{BootstrapAdmin, LogFormat, ServiceConfig, Settings, StoreConfig};

/// Avatar persona, conversation and summary records service.
#[derive(Parser)]
#[command(name = "zeny", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format. Overrides `[logging] format` in the settings file.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations, bootstrap the admin account and serve the REST API.
    Serve {
        /// Address to bind. Overrides `[server] host`.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind. Overrides `[server] port`.
        #[arg(long)]
        port: Option<u16>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Run migrations and bootstrap the admin account, then exit.
    Bootstrap {
        #[command(flatten)]
        service: ServiceArgs,
    },
}

impl Commands {
    pub fn service(&self) -> &ServiceArgs {
        match self {
            Commands::Serve { service, .. } | Commands::Bootstrap { service } => service,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

/// Values the service cannot start without.
#[derive(Args)]
pub struct ServiceArgs {
    /// Store location, e.g. `sqlite://./data`.
    #[arg(long, env = "ZENY_STORE_URL")]
    pub store_url: String,

    /// Database name inside the store.
    #[arg(long, env = "ZENY_STORE_NAMESPACE")]
    pub store_namespace: String,

    /// Token signing secret (at least 32 bytes).
    #[arg(long, env = "ZENY_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Username of the admin account created on first startup.
    #[arg(long, env = "ZENY_ADMIN_USERNAME")]
    pub admin_username: String,

    /// Password of the admin account created on first startup.
    #[arg(long, env = "ZENY_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Optional TOML settings file.
    #[arg(long, env = "ZENY_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ServiceArgs {
    pub fn into_config(self, settings: Settings) -> ServiceConfig {
        ServiceConfig {
            store: StoreConfig {
                url: self.store_url,
                namespace: self.store_namespace,
            },
            token_secret: SecretString::from(self.token_secret),
            admin: BootstrapAdmin {
                username: self.admin_username,
                password: SecretString::from(self.admin_password),
            },
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 10] = [
        "--store-url",
        "sqlite://./data",
        "--store-namespace",
        "zeny",
        "--token-secret",
        "0123456789abcdef0123456789abcdef",
        "--admin-username",
        "admin",
        "--admin-password",
        "admin",
    ];

    #[test]
    fn parses_serve_with_overrides() {
        let mut argv = vec!["zeny", "-v", "serve", "--port", "9000"];
        argv.extend(REQUIRED);
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { host, port, service } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
                let config = service.into_config(Settings::default());
                assert_eq!(config.store.namespace, "zeny");
                assert!(config.validate().is_ok());
            }
            Commands::Bootstrap { .. } => panic!("expected serve"),
        }
    }

    /// The CLI definition with every `ZENY_*` fallback removed, so parsing
    /// sees only argv regardless of the caller's environment.
    fn command_without_env() -> clap::Command {
        const ENV_BACKED: [&str; 6] = [
            "store_url",
            "store_namespace",
            "token_secret",
            "admin_username",
            "admin_password",
            "config",
        ];
        let mut command = <Cli as clap::CommandFactory>::command();
        for name in ["serve", "bootstrap"] {
            command = command.mut_subcommand(name, |mut sub| {
                for id in ENV_BACKED {
                    sub = sub.mut_arg(id, |arg| arg.env(None::<&str>));
                }
                sub
            });
        }
        command
    }

    #[test]
    fn missing_required_value_fails() {
        let result = command_without_env().try_get_matches_from([
            "zeny",
            "bootstrap",
            "--store-url",
            "sqlite://./data",
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn all_required_flags_parse_without_env() {
        let mut argv = vec!["zeny", "bootstrap"];
        argv.extend(REQUIRED);
        assert!(command_without_env().try_get_matches_from(argv).is_ok());
    }

    #[test]
    fn cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}

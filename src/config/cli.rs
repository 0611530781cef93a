use crate::config::{ClientConfig, TokenType};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "khl-gate")]
#[command(about = "Inspect khl entities and replay captured event streams")]
pub struct CliArgs {
    #[arg(long, short, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "KHL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, value_enum)]
    pub token_type: Option<CliTokenType>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliTokenType {
    Bot,
    Bearer,
}

impl From<CliTokenType> for TokenType {
    fn from(value: CliTokenType) -> Self {
        match value {
            CliTokenType::Bot => TokenType::Bot,
            CliTokenType::Bearer => TokenType::Bearer,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch an entity by id and print it as JSON
    Load {
        #[command(subcommand)]
        target: LoadTarget,
    },
    /// Run the gateway over JSON lines read from stdin
    Replay,
}

#[derive(Debug, Clone, Subcommand)]
pub enum LoadTarget {
    Channel { id: String },
    Guild { id: String },
    User { id: String },
}

impl CliArgs {
    /// Merges the config file (if any) with command line overrides and validates the result.
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::new(String::new()),
        };

        if let Some(token) = &self.token {
            config.client.token = token.clone();
        }
        if let Some(token_type) = self.token_type {
            config.client.token_type = token_type.into();
        }
        if let Some(base_url) = &self.base_url {
            config.client.base_url = base_url.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs::parse_from([
            "khl-gate",
            "--token",
            "cli-token",
            "--token-type",
            "bearer",
            "--base-url",
            "http://localhost:8080/api/v3",
            "load",
            "channel",
            "42",
        ]);

        let config = args.resolve_config().unwrap();
        assert_eq!(config.client.token, "cli-token");
        assert_eq!(config.client.token_type, TokenType::Bearer);
        assert_eq!(config.client.base_url, "http://localhost:8080/api/v3");
        assert!(matches!(
            args.command,
            Command::Load {
                target: LoadTarget::Channel { ref id }
            } if id == "42"
        ));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let args = CliArgs::parse_from(["khl-gate", "--token", "", "replay"]);
        assert!(args.resolve_config().is_err());
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Parser)]
#[command(name = "demo-relay")]
#[command(about = "Relays demo-request form submissions to the sales inbox via Resend")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with [email], [policy] and [server] sections
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the demo endpoint over HTTP
    Serve {
        /// Address to listen on (falls back to [server].bind, then 127.0.0.1:3000)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Push one saved submission through the handler, e.g. to resend a logged lead
    Submit {
        /// JSON file holding the form body
        #[arg(long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_bind() {
        let cli = CliConfig::parse_from(["demo-relay", "serve", "--bind", "0.0.0.0:8080"]);
        match cli.command {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:8080")),
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_submit_with_global_flags() {
        let cli = CliConfig::parse_from([
            "demo-relay",
            "submit",
            "--file",
            "lead.json",
            "--config",
            "relay.toml",
            "--verbose",
        ]);
        assert!(matches!(cli.command, Command::Submit { ref file } if file == &PathBuf::from("lead.json")));
        assert_eq!(cli.config, Some(PathBuf::from("relay.toml")));
        assert!(cli.verbose);
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cinegate")]
#[command(author, version, about = "Cache-backed, locale-aware movie metadata gateway")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::parse_from(["cinegate", "serve"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert!(port.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cinegate", "serve", "--port", "9000", "-v", "-c", "x.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(9000)),
            _ => panic!("expected serve"),
        }
    }
}

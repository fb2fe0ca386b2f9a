//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for spotlight
#[derive(Parser, Debug)]
#[command(name = "spotlight")]
#[command(author, version, about = "AI dating show - a bachelorette, contestants and you")]
#[command(long_about = r#"
Spotlight runs a dating game show where an AI bachelorette questions a line-up
of contestants. One contestant is you; the others are AI personalities.

Each round the bachelorette asks a question, every contestant answers, and she
rates each answer from 0 to 10. After the last round the contestant with the
best average rating wins.

Configuration files are loaded from (in priority order):
1. SPOTLIGHT_* environment variables
2. --config <path>      Explicit config file
3. ./spotlight.toml     Project-level config
4. ~/.config/spotlight/config.toml   Global config

Example:
  spotlight serve --port 8000
  spotlight play --rounds 2
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to a daily file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the game over HTTP (default)
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play the show in this terminal
    Play {
        /// Number of rounds (overrides game.max_rounds)
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Suppress progress spinners
        #[arg(short, long)]
        quiet: bool,
    },
}

impl Cli {
    /// The subcommand to run; `serve` when none is given
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["spotlight"]);
        assert_eq!(
            cli.resolved_command(),
            Command::Serve {
                host: None,
                port: None
            }
        );
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_play_with_global_flags() {
        let cli = Cli::parse_from(["spotlight", "play", "--rounds", "2", "-vv", "--no-config"]);
        assert_eq!(
            cli.resolved_command(),
            Command::Play {
                rounds: Some(2),
                quiet: false
            }
        );
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_config);
    }

    #[test]
    fn test_serve_port() {
        let cli = Cli::parse_from(["spotlight", "serve", "-p", "9000"]);
        assert!(matches!(cli.resolved_command(), Command::Serve { port: Some(9000), .. }));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

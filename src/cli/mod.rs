pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::stats::StatsView;

#[derive(Parser)]
#[command(name = "tweetstats")]
#[command(about = "Statistics about the posts in your home timeline", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/tweetstats/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server
    Serve {
        /// Address to listen on, overriding the config file
        #[arg(short, long)]
        bind: Option<String>,

        /// Open the sign-in page in a browser once listening
        #[arg(long)]
        open: bool,
    },
    /// Print statistics for a saved home timeline response
    Report {
        /// JSON file holding an array of statuses
        path: PathBuf,

        /// Table to print: topusers, topclients, toptweeters or topfollowers
        /// (default: all of them)
        #[arg(short, long)]
        view: Option<StatsView>,
    },
    /// Record a tick in the database and list all ticks
    Db,
}

/// The views a `report` prints: the chosen one, or all of them.
pub fn report_views(view: Option<StatsView>) -> Vec<StatsView> {
    view.map_or_else(|| StatsView::ALL.to_vec(), |view| vec![view])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let cli = Cli::parse_from(["tweetstats", "report", "feed.json", "--view", "topclients"]);
        match cli.command {
            Commands::Report { path, view } => {
                assert_eq!(path, PathBuf::from("feed.json"));
                assert_eq!(view, Some(StatsView::TopClients));
                assert_eq!(report_views(view), vec![StatsView::TopClients]);
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_parse_serve_with_global_config() {
        let cli = Cli::parse_from(["tweetstats", "serve", "--bind", "0.0.0.0:80", "-c", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(
            cli.command,
            Commands::Serve { bind: Some(ref b), open: false } if b == "0.0.0.0:80"
        ));
    }

    #[test]
    fn test_report_defaults_to_all_views() {
        let cli = Cli::parse_from(["tweetstats", "report", "feed.json"]);
        match cli.command {
            Commands::Report { view, .. } => {
                assert_eq!(view, None);
                assert_eq!(report_views(view), StatsView::ALL.to_vec());
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_report_rejects_unknown_view() {
        let result = Cli::try_parse_from(["tweetstats", "report", "feed.json", "--view", "recent"]);
        assert!(result.is_err());
    }
}

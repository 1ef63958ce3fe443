//! CLI definition for the `manage-easy` command.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use manage_easy_board::{Lane, WorkKind};

/// Manage Easy - drive the work item board from the terminal.
///
/// Configuration is read from ~/.manage-easy/config.toml, then
/// ./.manage-easy/config.toml, then --config, then MANAGE_EASY_* variables.
#[derive(Parser, Debug)]
#[command(name = "manage-easy")]
#[command(version)]
#[command(about = "Reorder, add and remove work items on the Manage Easy board")]
#[command(
    long_about = "Manage Easy keeps tasks and bugs in four lanes: CREATED, TODO, \
    IN_PROGRESS and DONE.\n\n\
    Moves go through the same reorder engine as the board view, so only items \
    whose position changed are written.\n\n\
    Environment variables:\n  \
    MANAGE_EASY_STORE__BASE_URL      Override the Cloud Functions base URL\n  \
    MANAGE_EASY_STORE__TOKEN         Bearer token sent with every request\n  \
    MANAGE_EASY_STORE__TIMEOUT_SECS  Request timeout"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Merge an extra configuration file after the discovered ones
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every lane in board order
    Lanes {
        /// Only items belonging to this feature
        #[arg(long, value_name = "ID")]
        feature: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move an item to a lane position
    Move {
        /// Work item id
        id: String,
        /// Target lane (created, todo, in-progress, done)
        lane: Lane,
        /// Position in the target lane; defaults to the end
        #[arg(long)]
        index: Option<usize>,
    },

    /// Create an item at the end of a lane
    Add {
        /// Title of the new item
        title: String,
        /// Lane to create it in
        #[arg(long, default_value = "todo")]
        lane: Lane,
        /// task or bug
        #[arg(long, default_value = "task")]
        kind: WorkKind,
    },

    /// Delete an item
    Delete {
        /// Work item id
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cli = Cli::parse_from(["manage-easy", "move", "w1", "in-progress", "--index", "2"]);
        match cli.command {
            Commands::Move { id, lane, index } => {
                assert_eq!(id, "w1");
                assert_eq!(lane, Lane::InProgress);
                assert_eq!(index, Some(2));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_defaults() {
        let cli = Cli::parse_from(["manage-easy", "add", "Fix login"]);
        assert!(matches!(
            cli.command,
            Commands::Add {
                lane: Lane::Todo,
                kind: WorkKind::Task,
                ..
            }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["manage-easy", "lanes", "--debug", "--config", "board.toml"]);
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("board.toml")));
    }

    #[test]
    fn test_rejects_unknown_lane() {
        assert!(Cli::try_parse_from(["manage-easy", "move", "w1", "backlog"]).is_err());
    }
}

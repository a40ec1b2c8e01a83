//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "mdnote",
    version,
    about = "Read a markdown file in the terminal and attach comments to its lines",
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Markdown file to open in the viewer.
    #[arg(value_name = "FILE", required = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding annotation records (overrides the config file).
    #[arg(long = "store-dir", value_name = "DIR", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Config file to read instead of the XDG default.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a file's comments as a markdown citation document.
    Comments {
        /// Annotated markdown file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_opens_viewer() {
        let cli = Cli::try_parse_from(["mdnote", "notes.md"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("notes.md")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn comments_subcommand_with_global_flags() {
        let cli = Cli::try_parse_from(["mdnote", "comments", "notes.md", "--store-dir", "/s", "-vv"]).unwrap();
        match cli.command {
            Some(Command::Comments { file }) => assert_eq!(file, PathBuf::from("notes.md")),
            other => panic!("expected comments, got {other:?}"),
        }
        assert_eq!(cli.store_dir, Some(PathBuf::from("/s")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn file_is_required_without_subcommand() {
        assert!(Cli::try_parse_from(["mdnote"]).is_err());
    }
}

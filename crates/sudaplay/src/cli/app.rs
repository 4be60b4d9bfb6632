use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::inspect::InspectArg;
use super::list::{ListArg, ShowArg};
use super::play::{DownloadArg, PlayArg};
use super::publish::PublishArg;
use super::rate::RateArg;
use super::remove::RemoveArg;
use super::upload::UploadArg;
use crate::env::SudaEnv;

#[derive(Debug, Parser)]
#[command(name = "sudaplay", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Overrides the configured media root
    #[arg(long, global = true)]
    pub media_root: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "up", name = "upload", about = "Create a game and publish its archive")]
    Upload(UploadArg),
    #[command(alias = "p", name = "publish", about = "Re-run the publisher for a game")]
    Publish(PublishArg),
    #[command(alias = "i", name = "inspect", about = "Check an archive without publishing it")]
    Inspect(InspectArg),
    #[command(alias = "ls", name = "list")]
    List(ListArg),
    #[command(name = "show")]
    Show(ShowArg),
    #[command(name = "play")]
    Play(PlayArg),
    #[command(alias = "dl", name = "download")]
    Download(DownloadArg),
    #[command(name = "rate")]
    Rate(RateArg),
    #[command(alias = "rm", name = "remove")]
    Remove(RemoveArg),
}

impl App {
    pub fn run(self) -> Result<()> {
        let App {
            config,
            media_root,
            cmd,
        } = self;
        let env = || SudaEnv::new(config.as_deref(), media_root.clone());

        match cmd {
            // works on a bare file, no media root needed
            Commands::Inspect(arg) => arg.run(),
            Commands::Upload(arg) => arg.run(&env()?),
            Commands::Publish(arg) => arg.run(&env()?),
            Commands::List(arg) => arg.run(&env()?),
            Commands::Show(arg) => arg.run(&env()?),
            Commands::Play(arg) => arg.run(&env()?),
            Commands::Download(arg) => arg.run(&env()?),
            Commands::Rate(arg) => arg.run(&env()?),
            Commands::Remove(arg) => arg.run(&env()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        App::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let app = App::try_parse_from([
            "sudaplay",
            "rate",
            "7",
            "--user",
            "3",
            "--value",
            "4",
            "--media-root",
            "/srv/media",
        ])
        .unwrap();
        assert_eq!(app.media_root, Some(PathBuf::from("/srv/media")));
        assert!(matches!(app.cmd, Commands::Rate(_)));
    }
}

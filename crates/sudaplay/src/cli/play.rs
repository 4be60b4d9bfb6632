use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sudaplay_catalog::play::{download, play};
use sudaplay_catalog::{RecordId, UserId};

use super::print_target;
use crate::env::SudaEnv;

#[derive(Args, Debug)]
pub struct PlayArg {
    id: u64,
    #[arg(long)]
    viewer: Option<u64>,
}

impl PlayArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let session = play(
            env.store(),
            RecordId(self.id),
            env.media_url(),
            self.viewer.map(UserId),
        )?;

        print_target(&session.target);
        println!("views: {}", session.record.views);
        if let Some(value) = session.user_rating {
            println!("your rating: {value}");
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DownloadArg {
    id: u64,
    #[arg(long)]
    viewer: u64,
    #[arg(long, short, help = "Directory to copy the archive into")]
    output: Option<PathBuf>,
}

impl DownloadArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let sent = download(env.store(), RecordId(self.id), UserId(self.viewer))?;

        match self.output {
            Some(dir) => {
                let target = dir.join(sent.attachment_name);
                std::fs::copy(&sent.path, &target)
                    .with_context(|| format!("Failed to copy archive to {}", target.display()))?;
                println!("{}", target.display());
            }
            None => println!("{}", sent.path.display()),
        }
        Ok(())
    }
}

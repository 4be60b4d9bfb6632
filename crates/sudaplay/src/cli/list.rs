use anyhow::Result;
use clap::Args;
use sudaplay_catalog::play::detail;
use sudaplay_catalog::{RecordId, RecordStore, UserId};

use super::{print_record, print_target};
use crate::env::SudaEnv;

#[derive(Args, Debug)]
pub struct ListArg {
    #[arg(long, help = "Only games uploaded by this user, approved or not")]
    user: Option<u64>,
    #[arg(long)]
    json: bool,
}

impl ListArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let records: Vec<_> = env
            .store()
            .list()?
            .into_iter()
            .filter(|r| match self.user {
                Some(user) => r.uploaded_by == UserId(user),
                None => r.is_approved,
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            records.iter().for_each(print_record);
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowArg {
    id: u64,
    #[arg(long)]
    viewer: Option<u64>,
    #[arg(long)]
    json: bool,
}

impl ShowArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let game = detail(
            env.store(),
            RecordId(self.id),
            env.media_url(),
            self.viewer.map(UserId),
        )?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&game.record)?);
            return Ok(());
        }

        print_record(&game.record);
        println!("{}", game.record.short_description);
        if !game.record.processing_error.is_empty() {
            println!("error: {}", game.record.processing_error);
        }
        print_target(&game.target);
        Ok(())
    }
}

use anyhow::Result;
use clap::Args;
use sudaplay_catalog::{RecordId, UserId, rate};

use crate::env::SudaEnv;

#[derive(Args, Debug)]
pub struct RateArg {
    id: u64,
    #[arg(long)]
    user: u64,
    #[arg(long, allow_negative_numbers = true)]
    value: i64,
}

impl RateArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let outcome = rate(env.store(), RecordId(self.id), UserId(self.user), self.value)?;
        println!("rating {} ({} votes)", outcome.average, outcome.votes);
        Ok(())
    }
}

use anyhow::{Result, bail};
use clap::Args;
use sudaplay_catalog::{RecordId, remove_record};

use crate::env::SudaEnv;

#[derive(Args, Debug)]
pub struct RemoveArg {
    id: u64,
}

impl RemoveArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let id = RecordId(self.id);
        match remove_record(env.store(), env.layout(), id)? {
            Some(record) => println!("removed #{id} {}", record.title),
            None => bail!("Game {id} not found"),
        }
        Ok(())
    }
}

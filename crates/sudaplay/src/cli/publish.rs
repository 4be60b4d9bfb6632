use anyhow::{Context, Result, bail};
use clap::Args;
use sudaplay_catalog::{PublishStatus, RecordId, RecordStore};
use tracing::debug;

use crate::env::SudaEnv;

#[derive(Args, Debug)]
pub struct PublishArg {
    id: u64,
    #[arg(long, help = "Print every extracted file with its size and SHA-256")]
    files: bool,
}

impl PublishArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let id = RecordId(self.id);
        let mut record = env
            .store()
            .get(id)?
            .with_context(|| format!("Game {id} not found"))?;

        let result = env.publisher().publish(&mut record, env.store());
        let status = PublishStatus::from(&result);
        let Ok(build) = result else {
            bail!("{}", status.message);
        };

        println!("published {}", build.playable_path);
        println!("{} files, {} bytes", build.file_count, build.total_bytes);
        for file in &build.files {
            debug!(path = %file.path.display(), size = file.size, sha256 = ?file.sha256, "built file");
            if self.files || file.sha256.is_some() {
                println!(
                    "  {:<64}  {:>10}  {}",
                    file.sha256.as_deref().unwrap_or("-"),
                    file.size,
                    file.path.display()
                );
            }
        }
        Ok(())
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sudaplay_catalog::play::play_target;
use sudaplay_catalog::{ArchiveUpload, Genre, NewGame, UploadHandler, UserId};

use super::{print_record, print_target};
use crate::env::SudaEnv;

#[derive(Args, Debug)]
pub struct UploadArg {
    #[arg(long)]
    title: String,
    #[arg(long, help = "accion, aventura, estrategia, rpg, deportes, carreras, puzzle, simulacion, terror, multijugador or otro")]
    genre: Genre,
    #[arg(long, help = "Id of the uploading user")]
    user: u64,
    #[arg(long, default_value = "")]
    short_description: String,
    #[arg(long)]
    description: String,
    #[arg(long, help = "ZIP archive holding the web build")]
    archive: Option<PathBuf>,
    #[arg(long)]
    external_url: Option<String>,
    #[arg(long, help = "Cover image path relative to the media root")]
    cover: Option<String>,
}

impl UploadArg {
    pub fn run(self, env: &SudaEnv) -> Result<()> {
        let archive = self.archive.map(|source| ArchiveUpload {
            file_name: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            source,
        });

        let game = NewGame {
            title: self.title,
            short_description: self.short_description,
            description: self.description,
            genre: self.genre,
            cover_image: self.cover,
            external_url: self.external_url,
            archive,
        };

        let record = UploadHandler::new(env.store(), env.publisher())
            .max_upload_bytes(env.config().limits.max_upload_bytes)
            .submit(game, UserId(self.user))
            .context("Upload rejected")?;

        print_record(&record);
        print_target(&play_target(&record, env.media_url()));
        Ok(())
    }
}

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sudaplay_catalog::entry_page::{ENTRY_PAGE, select_entry_page};

#[derive(Args, Debug)]
pub struct InspectArg {
    archive: PathBuf,
    #[arg(long, short, help = "Print every entry name")]
    verbose: bool,
}

impl InspectArg {
    pub fn run(self) -> Result<()> {
        let file = File::open(&self.archive)
            .with_context(|| format!("Failed to open {}", self.archive.display()))?;
        let listing = sudaplay_archive::list_from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not a valid ZIP", self.archive.display()))?;

        println!(
            "{} entries, {} bytes uncompressed",
            listing.names.len(),
            listing.declared_bytes
        );
        if self.verbose {
            for name in &listing.names {
                println!("  {name}");
            }
        }

        let candidates = listing
            .names
            .iter()
            .filter(|name| !name.ends_with('/'))
            .map(|name| name.split(['/', '\\']).filter(|s| !s.is_empty()).collect::<PathBuf>())
            .filter(|path| path.file_name().is_some_and(|n| n == ENTRY_PAGE));

        match select_entry_page(&PathBuf::new(), candidates) {
            Some(page) => println!("entry page: {}", page.display()),
            None => println!("no {ENTRY_PAGE} found, the archive cannot be published"),
        }
        Ok(())
    }
}

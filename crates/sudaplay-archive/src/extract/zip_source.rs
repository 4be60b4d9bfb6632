use std::io::{Read, Seek};
use std::path::Path;

use crate::entry::{ArchiveListing, EntryKind};
use crate::error::{Error, Result};
use crate::extract::PlannedEntry;
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;
use crate::sanitize::sanitize_entry_name;

pub(crate) struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipSource<R> {
    pub(crate) fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Resolve every entry below `root` and check the declared sizes.
    ///
    /// Nothing is decompressed or written here; a single bad entry rejects
    /// the whole archive.
    pub(crate) fn plan(&mut self, root: &Path, options: &ExtractOptions) -> Result<Vec<PlannedEntry>> {
        let count = self.archive.len();
        if let Some(limit) = options.max_entries
            && count > limit
        {
            return Err(Error::TooManyEntries { count, limit });
        }

        let mut planned = Vec::with_capacity(count);
        let mut declared_total = 0u64;

        for index in 0..count {
            // raw access reads the header without setting up decompression
            let file = self.archive.by_index_raw(index)?;
            let name = file.name().to_string();
            let size = file.size();
            let kind = if file.is_dir() || name.ends_with('\\') {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let mode = file.unix_mode();
            drop(file);

            let sanitized = sanitize_entry_name(&name, root)?;
            if sanitized.relative.as_os_str().is_empty() {
                if kind == EntryKind::Directory {
                    continue;
                }
                return Err(Error::InvalidPath { entry: name });
            }

            if let Some(limit) = options.max_entry_bytes
                && size > limit
            {
                return Err(Error::EntryTooLarge {
                    entry: name,
                    size,
                    limit,
                });
            }

            declared_total = declared_total.saturating_add(size);
            if let Some(limit) = options.max_total_bytes
                && declared_total > limit
            {
                return Err(Error::ArchiveTooLarge { limit });
            }

            planned.push(PlannedEntry {
                index,
                sanitized,
                kind,
                declared_size: size,
                mode,
            });
        }

        Ok(planned)
    }

    pub(crate) fn open(&mut self, index: usize) -> Result<impl Read + '_> {
        Ok(self.archive.by_index(index)?)
    }

    pub(crate) fn listing(&mut self) -> Result<ArchiveListing> {
        let mut names = Vec::with_capacity(self.archive.len());
        let mut declared_bytes = 0u64;
        for index in 0..self.archive.len() {
            let file = self.archive.by_index_raw(index)?;
            declared_bytes = declared_bytes.saturating_add(file.size());
            names.push(file.name().to_string());
        }
        Ok(ArchiveListing {
            format: ArchiveFormat::Zip,
            names,
            declared_bytes,
        })
    }
}

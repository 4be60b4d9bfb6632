//! Validate-then-extract pipeline.
//!
//! Every entry is sanitized and checked against the configured limits before
//! the first byte is written. Only then are entries decompressed, with the
//! limits enforced again on the actual output size.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entry::{ArchiveListing, ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format;
use crate::options::{ExtractOptions, Progress};
use crate::sanitize::SanitizedPath;

mod zip_source;

use zip_source::ZipSource;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// An entry that passed validation but has not been written yet.
pub(crate) struct PlannedEntry {
    pub index: usize,
    pub sanitized: SanitizedPath,
    pub kind: EntryKind,
    pub declared_size: u64,
    pub mode: Option<u32>,
}

/// Extract a ZIP archive into `destination`.
///
/// `destination` is created if missing and canonicalized before entries are
/// resolved against it.
pub fn extract_from_reader<R: Read + Seek>(
    mut reader: R,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let format = format::detect_from_reader(&mut reader)?.ok_or(Error::UnsupportedFormat)?;
    let mut source = ZipSource::new(reader)?;

    ensure_directory(destination)?;
    let root = destination
        .canonicalize()
        .map_err(|e| Error::ExtractionFailed {
            path: destination.to_path_buf(),
            source: e,
        })?;

    let plan = source.plan(&root, options)?;
    let declared_total: u64 = plan.iter().map(|p| p.declared_size).sum();
    debug!(
        entries = plan.len(),
        declared_bytes = declared_total,
        root = %root.display(),
        "archive validated"
    );

    let mut entries = Vec::with_capacity(plan.len());
    let mut total_bytes = 0u64;

    for planned in plan {
        let target = planned.sanitized.resolved.clone();
        let mut entry = Entry::new(
            planned.sanitized.original.clone(),
            planned.sanitized.relative.clone(),
            planned.kind,
        )
        .with_mode(planned.mode)
        .with_target_path(target.clone());

        match planned.kind {
            EntryKind::Directory => ensure_directory(&target)?,
            EntryKind::File => {
                let reader = source.open(planned.index)?;
                let (written, hash) = write_file(reader, &planned, options, total_bytes)?;
                total_bytes += written;
                entry = entry.with_size(written);
                if let Some(hash) = hash {
                    entry = entry.with_hash(hash);
                }
            }
        }

        options.report_progress(Progress {
            bytes_processed: total_bytes,
            total_bytes: Some(declared_total),
            current_file: Some(planned.sanitized.relative),
        });

        entries.push(entry);
    }

    Ok(ArchiveReport {
        format,
        root,
        entry_count: entries.len(),
        total_bytes,
        entries,
    })
}

/// List entry names without extracting anything.
pub fn list_from_reader<R: Read + Seek>(mut reader: R) -> Result<ArchiveListing> {
    format::detect_from_reader(&mut reader)?.ok_or(Error::UnsupportedFormat)?;
    ZipSource::new(reader)?.listing()
}

fn write_file<R: Read>(
    mut reader: R,
    planned: &PlannedEntry,
    options: &ExtractOptions,
    written_before: u64,
) -> Result<(u64, Option<String>)> {
    let target = &planned.sanitized.resolved;
    if let Some(parent) = target.parent() {
        ensure_directory(parent)?;
    }

    let mut file = File::create(target).map_err(|e| extraction_failed(target, e))?;
    let mut hasher = options.hash_strategy.hasher();
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| extraction_failed(target, e))?;
        if n == 0 {
            break;
        }
        written += n as u64;

        if let Some(limit) = options.max_entry_bytes
            && written > limit
        {
            return Err(Error::EntryTooLarge {
                entry: planned.sanitized.original.clone(),
                size: written,
                limit,
            });
        }
        if let Some(limit) = options.max_total_bytes
            && written_before + written > limit
        {
            return Err(Error::ArchiveTooLarge { limit });
        }

        if let Some(ref mut hasher) = hasher {
            hasher.update(&buffer[..n]);
        }
        file.write_all(&buffer[..n])
            .map_err(|e| extraction_failed(target, e))?;
    }

    file.flush().map_err(|e| extraction_failed(target, e))?;
    Ok((written, hasher.map(|h| h.finish())))
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn extraction_failed(path: &Path, source: std::io::Error) -> Error {
    Error::ExtractionFailed {
        path: PathBuf::from(path),
        source,
    }
}

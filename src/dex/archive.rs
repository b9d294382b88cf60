//! JAR extraction and repacking.
//!
//! A JAR is a ZIP file, so both directions go through the `zip` crate.
//! Packing is deterministic: entries are written in sorted order with a
//! fixed timestamp, so the same tree always yields the same bytes.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Component, Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::error::{Result, StripError};

/// Unpack `archive` into `dest`, returning the relative paths of all files.
///
/// Directory entries are recreated but not returned. Entries whose names
/// would escape `dest` abort the extraction.
pub fn extract(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let archive = absolute(archive).map_err(|e| extraction_error(archive, &e))?;
    let fail = |e: &dyn std::fmt::Display| extraction_error(&archive, e);

    let file = File::open(&archive).map_err(|e| fail(&e))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| fail(&e))?;
    fs::create_dir_all(dest).map_err(|e| fail(&e))?;

    let mut files = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| fail(&e))?;
        let Some(enclosed) = entry.enclosed_name() else {
            return Err(fail(&format!(
                "entry '{}' points outside the extraction directory",
                entry.name()
            )));
        };
        let relative = normalize(&enclosed);
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out_path = dest.join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| fail(&e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }
        let mut out = BufWriter::new(File::create(&out_path).map_err(|e| fail(&e))?);
        io::copy(&mut entry, &mut out).map_err(|e| fail(&e))?;
        files.push(relative);
    }
    // Repeated entry names overwrite one file on disk
    files.sort();
    files.dedup();

    tracing::debug!(count = files.len(), archive = %archive.display(), "extracted");
    Ok(files)
}

/// Pack every file and directory under `root` into a new archive at `output`.
///
/// Returns the number of file entries written. `output` must not live
/// inside `root`.
pub fn pack(root: &Path, output: &Path) -> Result<usize> {
    let fail = |e: &dyn std::fmt::Display| StripError::Pack {
        archive: output.to_path_buf(),
        message: e.to_string(),
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    walk(root, Path::new(""), &mut dirs, &mut files).map_err(|e| fail(&e))?;

    let file = File::create(output).map_err(|e| fail(&e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for dir in &dirs {
        zip.add_directory(format!("{}/", entry_name(dir)), options)
            .map_err(|e| fail(&e))?;
    }
    for relative in &files {
        zip.start_file(entry_name(relative), options)
            .map_err(|e| fail(&e))?;
        let mut input = BufReader::new(File::open(root.join(relative)).map_err(|e| fail(&e))?);
        io::copy(&mut input, &mut zip).map_err(|e| fail(&e))?;
    }
    zip.finish().map_err(|e| fail(&e))?;

    tracing::debug!(count = files.len(), archive = %output.display(), "packed");
    Ok(files.len())
}

/// Recursively list `dir`, sorted, as paths relative to the walk root.
fn walk(
    root: &Path,
    prefix: &Path,
    dirs: &mut Vec<PathBuf>,
    files: &mut Vec<PathBuf>,
) -> io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(root.join(prefix))?.collect::<io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let relative = prefix.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            dirs.push(relative.clone());
            walk(root, &relative, dirs, files)?;
        } else {
            files.push(relative);
        }
    }
    Ok(())
}

/// ZIP entry names always use forward slashes.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Path of an entry as it lands in the tree: `./a//B.class` is `a/B.class`.
fn normalize(enclosed: &Path) -> PathBuf {
    enclosed
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn extraction_error(archive: &Path, e: &dyn std::fmt::Display) -> StripError {
    StripError::Extraction {
        archive: archive.to_path_buf(),
        message: e.to_string(),
    }
}

//! Bundle file generation.
//!
//! A bundle is a sequence of records, one per source file:
//!
//! ```text
//! ******************
//! Fichier : <path>
//! ******************
//!
//! <content>
//!
//! ```
//!
//! A file that cannot be read gets an inline error line instead of its
//! content; only failures on the bundle file itself are returned.

use crate::models::{FileRecord, ReadError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Line framing each record header.
pub const DIVIDER: &str = "******************";

/// Label preceding the source path in a record header.
pub const PATH_LABEL: &str = "Fichier : ";

/// Prefix of the line written in place of unreadable content.
pub const READ_ERROR_PREFIX: &str = "Erreur lors de la lecture du fichier : ";

/// Error writing a bundle file.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counters for one written bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleStats {
    /// Records written, one per input path.
    pub records: usize,
    /// Inputs replaced by an inline error line.
    pub read_failures: usize,
    /// Bytes of source content written.
    pub content_bytes: u64,
}

/// Read a source file as text, replacing invalid UTF-8 sequences.
pub fn read_record(path: &Path) -> Result<FileRecord, ReadError> {
    let bytes = std::fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (content, lossy) = match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
    };

    Ok(FileRecord {
        path: path.to_path_buf(),
        content,
        lossy,
    })
}

/// Write the header block for `path`.
fn write_header<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", DIVIDER)?;
    writeln!(out, "{}{}", PATH_LABEL, path.display())?;
    writeln!(out, "{}", DIVIDER)?;
    writeln!(out)
}

/// Write one full record: header, then content or the error line.
pub fn write_record<W: Write>(
    out: &mut W,
    path: &Path,
    record: &Result<FileRecord, ReadError>,
) -> io::Result<()> {
    write_header(out, path)?;

    match record {
        Ok(file) => out.write_all(file.content.as_bytes())?,
        Err(e) => write!(out, "{}{}", READ_ERROR_PREFIX, e)?,
    }

    out.write_all(b"\n\n")
}

/// Write every file of `files`, in order, to `output`.
///
/// The output is truncated first. Unreadable inputs never abort the batch.
pub fn write_bundle(files: &[PathBuf], output: &Path) -> Result<BundleStats, BundleError> {
    let file = File::create(output).map_err(|source| BundleError::Create {
        path: output.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let mut stats = BundleStats::default();

    let write_err = |source| BundleError::Write {
        path: output.to_path_buf(),
        source,
    };

    for path in files {
        info!("  -> Bundling file: {}", path.display());

        let record = read_record(path);
        match &record {
            Ok(file) => {
                if file.lossy {
                    debug!("Replaced invalid UTF-8 in {}", file.path.display());
                }
                stats.content_bytes += file.content.len() as u64;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", e.path().display(), e);
                stats.read_failures += 1;
            }
        }

        write_record(&mut out, path, &record).map_err(write_err)?;
        stats.records += 1;
    }

    out.flush().map_err(write_err)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn record_for(path: &str, content: &str) -> String {
        format!(
            "******************\nFichier : {}\n******************\n\n{}\n\n",
            path, content
        )
    }

    #[test]
    fn test_two_records_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.css");
        let b = temp_dir.path().join("b.css");
        fs::write(&a, "X").unwrap();
        fs::write(&b, "Y").unwrap();
        let output = temp_dir.path().join("all_css.txt");

        let stats = write_bundle(&[a.clone(), b.clone()], &output).unwrap();

        let expected = format!(
            "{}{}",
            record_for(&a.display().to_string(), "X"),
            record_for(&b.display().to_string(), "Y")
        );
        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
        assert_eq!(
            stats,
            BundleStats {
                records: 2,
                read_failures: 0,
                content_bytes: 2,
            }
        );
    }

    #[test]
    fn test_unreadable_file_is_inlined_and_batch_continues() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.js");
        let present = temp_dir.path().join("here.js");
        fs::write(&present, "ok();").unwrap();
        let output = temp_dir.path().join("all_js.txt");

        let stats = write_bundle(&[missing.clone(), present.clone()], &output).unwrap();
        let text = fs::read_to_string(&output).unwrap();

        assert_eq!(stats.records, 2);
        assert_eq!(stats.read_failures, 1);
        assert!(text.contains(&format!("Fichier : {}", missing.display())));
        assert!(text.contains(READ_ERROR_PREFIX));
        assert!(text.ends_with(&record_for(&present.display().to_string(), "ok();")));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.php");
        fs::write(&path, b"caf\xe9").unwrap();

        let record = read_record(&path).unwrap();
        assert!(record.lossy);
        assert_eq!(record.content, "caf\u{FFFD}");
    }

    #[test]
    fn test_output_is_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("one.h");
        fs::write(&src, "int x;").unwrap();
        let output = temp_dir.path().join("all_h.txt");
        fs::write(&output, "stale content that is much longer than the new bundle").unwrap();

        write_bundle(&[src.clone()], &output).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            record_for(&src.display().to_string(), "int x;")
        );
    }

    #[test]
    fn test_create_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("missing_dir").join("out.txt");

        let err = write_bundle(&[], &output).unwrap_err();
        assert!(matches!(err, BundleError::Create { .. }));
    }

    #[test]
    fn test_write_record_for_error() {
        let err = ReadError::Io {
            path: PathBuf::from("x.ui"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let mut out = Vec::new();
        write_record(&mut out, Path::new("x.ui"), &Err(err)).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            record_for("x.ui", "Erreur lors de la lecture du fichier : denied")
        );
    }
}

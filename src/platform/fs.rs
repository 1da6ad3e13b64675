// LogRecon - platform/fs.rs
//
// Strict UTF-8 loading of source log files.
//
// Files are read fully into memory; above the mmap threshold the file is
// memory-mapped first so the bytes are validated without an extra heap copy.
// The file handle never outlives the read call.

use crate::util::error::SourceError;
use std::io;
use std::path::Path;

/// Read a log file as UTF-8 text.
///
/// Decoding failures are fatal: no lossy replacement, no partial content.
pub fn read_log_file(path: &Path, mmap_threshold: u64) -> Result<String, SourceError> {
    let metadata = std::fs::metadata(path).map_err(|e| classify(path, e))?;

    if metadata.is_dir() {
        return Err(SourceError::Unreadable {
            path: path.to_path_buf(),
            source: io::Error::other("path is a directory"),
        });
    }

    let size = metadata.len();
    let mapped = size >= mmap_threshold && size > 0;
    let content = if mapped {
        read_mapped(path)?
    } else {
        read_buffered(path)?
    };

    tracing::debug!(
        file = %path.display(),
        bytes = size,
        mapped,
        "Log file read"
    );

    Ok(content)
}

fn read_buffered(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| classify(path, e))?;
    String::from_utf8(bytes).map_err(|e| SourceError::InvalidEncoding {
        path: path.to_path_buf(),
        source: e.utf8_error(),
    })
}

/// Read using `memmap2` for large files.
fn read_mapped(path: &Path) -> Result<String, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| classify(path, e))?;
    // SAFETY: the map is read-only and dropped before this function returns.
    // External modification of the file during the read could produce
    // undefined behaviour, which is accepted for already-written debug logs.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| classify(path, e))?;
    std::str::from_utf8(&mmap)
        .map(str::to_string)
        .map_err(|e| SourceError::InvalidEncoding {
            path: path.to_path_buf(),
            source: e,
        })
}

fn classify(path: &Path, error: io::Error) -> SourceError {
    if error.kind() == io::ErrorKind::NotFound {
        SourceError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        SourceError::Unreadable {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

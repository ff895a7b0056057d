//! Reading logs off disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, instrument};

use crate::errors::SessionError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SessionError + '_ {
    move |source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a whole log into memory, one trimmed line per entry.
#[instrument(level = "debug")]
pub fn read_log_lines(path: &Path) -> Result<Vec<String>, SessionError> {
    let bytes = fs::read(path).map_err(io_error(path))?;
    // Hand histories are not always valid UTF-8 (currency symbols in
    // legacy code pages), a lossy decode keeps the rest of the line usable.
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
    debug!(lines = lines.len(), "Read hand history");
    Ok(lines)
}

/// The most recently modified regular file in `dir`.
#[instrument(level = "debug")]
pub fn latest_hand_history(dir: &Path) -> Result<PathBuf, SessionError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let metadata = entry.metadata().map_err(io_error(&entry.path()))?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(io_error(&entry.path()))?;
        let is_newer = newest
            .as_ref()
            .is_none_or(|(best, best_path)| (modified, entry.path()) > (*best, best_path.clone()));
        if is_newer {
            newest = Some((modified, entry.path()));
        }
    }
    let (_, path) = newest.ok_or_else(|| SessionError::NoHandHistory(dir.to_path_buf()))?;
    debug!(?path, "Selected newest hand history");
    Ok(path)
}

/// Resolve a path that may be either a log file or a directory of logs.
pub fn resolve_log_path(path: &Path) -> Result<PathBuf, SessionError> {
    if path.is_dir() {
        latest_hand_history(path)
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_read_log_lines_trims() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hh.txt");
        fs::write(&path, "  Seat 1: Alice (10000 in chips)  \r\n\n\tTotal pot 10 | Rake 0\n").unwrap();

        let lines = read_log_lines(&path).unwrap();
        assert_eq!(
            lines,
            vec![
                "Seat 1: Alice (10000 in chips)".to_string(),
                String::new(),
                "Total pot 10 | Rake 0".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_log_lines(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
    }

    #[test]
    fn test_latest_hand_history_picks_newest() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("old.txt");
        let new = dir.path().join("new.txt");
        File::create(&old).unwrap().write_all(b"old").unwrap();
        File::create(&new).unwrap().write_all(b"new").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(past)
            .unwrap();

        assert_eq!(latest_hand_history(dir.path()).unwrap(), new);
        assert_eq!(resolve_log_path(dir.path()).unwrap(), new);
        assert_eq!(resolve_log_path(&old).unwrap(), old);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let err = latest_hand_history(dir.path()).unwrap_err();
        assert!(matches!(err, SessionError::NoHandHistory(_)));
    }
}

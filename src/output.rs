//! Staged output files.
//!
//! Every output of a run is first written to a hidden temp file next to
//! its target. Targets are only replaced once all outputs have been
//! produced, so a failed run leaves no partial results behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::WiremarkError;

/// A fully written output waiting to be moved onto its target.
#[derive(Debug)]
pub struct Staged {
    target: PathBuf,
    file: NamedTempFile,
}

/// Writes one output to a temp file in the target's directory.
///
/// The temp file is deleted if `write` fails or the result is dropped
/// without being committed.
pub fn stage<F>(target: &Path, write: F) -> Result<Staged, WiremarkError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), WiremarkError>,
{
    let write_err = |source| WiremarkError::OutputWrite {
        path: target.to_path_buf(),
        source,
    };

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::Builder::new()
        .prefix(".wiremark-")
        .tempfile_in(dir)
        .map_err(write_err)?;

    let mut writer = BufWriter::new(file.as_file_mut());
    write(&mut writer)?;
    writer.flush().map_err(write_err)?;
    drop(writer);

    Ok(Staged {
        target: target.to_path_buf(),
        file,
    })
}

/// Moves every staged output onto its target, in order.
///
/// If one move fails, targets already replaced in this call are removed
/// and the remaining temp files are discarded.
pub fn commit(staged: Vec<Staged>) -> Result<(), WiremarkError> {
    let mut done: Vec<PathBuf> = Vec::with_capacity(staged.len());

    for Staged { target, file } in staged {
        if let Err(err) = file.persist(&target) {
            for path in &done {
                if let Err(cleanup) = std::fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %cleanup, "cannot remove output");
                }
            }
            return Err(WiremarkError::OutputWrite {
                path: target,
                source: err.error,
            });
        }
        tracing::debug!(path = %target.display(), "wrote output");
        done.push(target);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_text(target: &Path, text: &'static str) -> Staged {
        stage(target, |w| w.write_all(text.as_bytes()).map_err(WiremarkError::Io)).unwrap()
    }

    #[test]
    fn test_nothing_lands_before_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let staged = stage_text(&target, "hello");
        assert!(!target.exists());

        commit(vec![staged]).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let result = stage(&target, |_| {
            Err(WiremarkError::InvalidConfig("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_commit_removes_earlier_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let blocked = dir.path().join("blocked");
        std::fs::create_dir(&blocked).unwrap();

        let staged = vec![stage_text(&first, "a"), stage_text(&blocked, "b")];
        let result = commit(staged);

        assert!(matches!(result, Err(WiremarkError::OutputWrite { .. })));
        assert!(!first.exists());
        assert!(blocked.is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_fails_at_stage() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.txt");
        let result = stage(&target, |_| Ok(()));
        assert!(matches!(result, Err(WiremarkError::OutputWrite { .. })));
    }
}

//! Sweep output directory handling.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyExists,
}

/// Create the sweep output directory if missing. Existing contents are left alone.
pub fn ensure_output_dir(path: &Path) -> std::io::Result<DirStatus> {
    if path.is_dir() {
        return Ok(DirStatus::AlreadyExists);
    }
    std::fs::create_dir_all(path)?;
    Ok(DirStatus::Created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_call_reports_existing_dir_and_keeps_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("sweep");

        assert_eq!(ensure_output_dir(&dir).unwrap(), DirStatus::Created);
        std::fs::write(dir.join("old.log"), "previous run").unwrap();

        assert_eq!(ensure_output_dir(&dir).unwrap(), DirStatus::AlreadyExists);
        assert_eq!(
            std::fs::read_to_string(dir.join("old.log")).unwrap(),
            "previous run"
        );
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("sweep");
        std::fs::write(&path, "not a directory").unwrap();
        assert!(ensure_output_dir(&path).is_err());
    }
}

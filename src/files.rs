//! Blocklist file I/O.
//!
//! Reading fails fast when the source is missing; writing creates parent
//! directories as needed. [`list_blocklists`] finds the lists of a folder and
//! [`backup_dir`] mirrors cleaned lists into a second directory after a run.

use crate::error::{PrunerError, Result};
use std::path::{Path, PathBuf};

/// File extension of blocklists picked up in folder mode.
pub const BLOCKLIST_EXTENSION: &str = "txt";

/// Reads a blocklist into lines, without line terminators.
///
/// # Errors
///
/// Returns [`PrunerError::SourceNotFound`] if `path` does not exist, or
/// [`PrunerError::Io`] if it cannot be read as UTF-8 text.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(PrunerError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "Read blocklist");
    Ok(content.lines().map(ToString::to_string).collect())
}

/// Writes lines joined by `\n`, with a trailing newline when non-empty.
///
/// Overwrites `path` if it exists.
///
/// # Errors
///
/// Returns [`PrunerError::Io`] if the parent directory cannot be created or
/// the file cannot be written.
pub fn write_lines<I, S>(lines: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_lines(lines))?;
    tracing::info!(path = %path.display(), "Wrote cleaned blocklist");
    Ok(())
}

/// Returns the `*.txt` regular files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`PrunerError::SourceNotFound`] if `dir` is not a directory, or
/// [`PrunerError::Io`] if it cannot be listed.
pub fn list_blocklists(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PrunerError::SourceNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut lists = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == BLOCKLIST_EXTENSION) {
            lists.push(path);
        }
    }
    lists.sort();
    tracing::debug!(dir = %dir.display(), count = lists.len(), "Found blocklists");
    Ok(lists)
}

/// Copies every regular file in `source` into `backup`, overwriting older
/// copies. Returns the number of files copied.
///
/// # Errors
///
/// Returns [`PrunerError::Io`] if either directory cannot be accessed.
/// A single file that fails to copy is logged and skipped.
pub fn backup_dir(source: &Path, backup: &Path) -> Result<usize> {
    std::fs::create_dir_all(backup)?;

    let mut copied = 0;
    for entry in std::fs::read_dir(source)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        match std::fs::copy(&path, backup.join(name)) {
            Ok(_) => copied += 1,
            Err(e) => tracing::warn!(
                file = %path.display(),
                error = %e,
                "Failed to back up file"
            ),
        }
    }
    tracing::info!(
        source = %source.display(),
        backup = %backup.display(),
        copied,
        "Backed up cleaned lists"
    );
    Ok(copied)
}

fn render_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = lines
        .into_iter()
        .map(|line| line.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join("\n");
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_terminates_with_newline() {
        assert_eq!(render_lines(["a.example", "# c"]), "a.example\n# c\n");
        assert_eq!(render_lines(Vec::<String>::new()), "");
    }

    #[test]
    fn render_does_not_double_trailing_newline() {
        assert_eq!(render_lines(["a.example", ""]), "a.example\n");
        assert_eq!(render_lines(["a.example", "", ""]), "a.example\n\n");
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_lines(&dir.path().join("blocklist.txt")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn read_strips_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocklist.txt");
        std::fs::write(&path, "# list\r\nads.example.com\n\ntrack.example.net").unwrap();

        assert_eq!(
            read_lines(&path).unwrap(),
            ["# list", "ads.example.com", "", "track.example.net"]
        );
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned").join("nested").join("blocklist.txt");

        write_lines(["ads.example.com"], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ads.example.com\n");
    }

    #[test]
    fn write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocklist.txt");

        write_lines(["old.example.com", "older.example.com"], &path).unwrap();
        write_lines(["new.example.com"], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new.example.com\n");
    }

    #[test]
    fn lists_only_txt_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("trackers.txt"), "t.example\n").unwrap();
        std::fs::write(dir.path().join("ads.txt"), "a.example\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();
        std::fs::write(dir.path().join("ads.txt.bak"), "old\n").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        assert_eq!(
            list_blocklists(dir.path()).unwrap(),
            [dir.path().join("ads.txt"), dir.path().join("trackers.txt")]
        );
    }

    #[test]
    fn listing_missing_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_blocklists(&dir.path().join("domains")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn backup_copies_files_only() {
        let source = tempfile::tempdir().unwrap();
        let backup = tempfile::tempdir().unwrap();
        let target = backup.path().join("mirror");

        std::fs::write(source.path().join("blocklist.txt"), "a.example\n").unwrap();
        std::fs::write(source.path().join("extra.txt"), "b.example\n").unwrap();
        std::fs::create_dir(source.path().join("subdir")).unwrap();

        assert_eq!(backup_dir(source.path(), &target).unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(target.join("blocklist.txt")).unwrap(),
            "a.example\n"
        );
        assert!(!target.join("subdir").exists());
    }

    #[test]
    fn backup_of_missing_source_fails() {
        let backup = tempfile::tempdir().unwrap();
        assert!(backup_dir(Path::new("/nonexistent/cleaned"), backup.path()).is_err());
    }
}

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::RepositoryError;

/// File storage operations for the visits data file
pub struct FileStorage;

impl FileStorage {
    /// Read every line of the data file
    ///
    /// Bytes that are not valid UTF-8 are replaced so that a damaged line is
    /// still handed to the caller instead of ending the read. A file that
    /// cannot be opened or read (a directory, a failing device) is
    /// `SourceUnavailable`.
    pub fn read_lines(path: &Path) -> Result<Vec<String>, RepositoryError> {
        debug!("Reading visit lines from {}", path.display());

        let unavailable = |source: io::Error| RepositoryError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unavailable)?;

        let mut lines = Vec::new();
        for chunk in BufReader::new(file).split(b'\n') {
            let bytes = chunk.map_err(unavailable)?;
            let line = String::from_utf8_lossy(&bytes);
            lines.push(line.trim_end_matches('\r').to_string());
        }

        Ok(lines)
    }

    /// Append one line to the data file, creating it if needed
    pub fn append_line(path: &Path, line: &str) -> Result<(), RepositoryError> {
        debug!("Appending line to {}", path.display());

        let needs_separator = Self::ends_without_newline(path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        if needs_separator {
            file.write_all(b"\n")?;
        }
        writeln!(file, "{}", line)?;
        file.flush()?;

        Ok(())
    }

    /// Replace the whole data file with new contents
    ///
    /// The contents are written to a sibling file first and renamed over the target.
    pub fn replace_contents(path: &Path, contents: &str) -> Result<(), RepositoryError> {
        let staging = Self::staging_path(path);
        debug!("Rewriting {} via {}", path.display(), staging.display());

        fs::write(&staging, contents)?;
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        Ok(())
    }

    fn ends_without_newline(path: &Path) -> io::Result<bool> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        if file.metadata()?.len() == 0 {
            return Ok(false);
        }

        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    fn staging_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from("visits"));
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn data_file(dir: &TempDir) -> PathBuf {
        dir.path().join("patients.txt")
    }

    #[test]
    fn test_read_missing_file_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = FileStorage::read_lines(&data_file(&dir));
        assert!(result.unwrap_err().is_source_unavailable());
    }

    #[test]
    fn test_read_directory_is_source_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = FileStorage::read_lines(dir.path());
        assert!(result.unwrap_err().is_source_unavailable());
    }

    #[test]
    fn test_read_lines_strips_terminators() {
        let dir = TempDir::new().unwrap();
        let path = data_file(&dir);
        fs::write(&path, "a,b\r\nc,d\n\ne").unwrap();

        let lines = FileStorage::read_lines(&path).unwrap();
        assert_eq!(lines, vec!["a,b", "c,d", "", "e"]);
    }

    #[test]
    fn test_read_lines_tolerates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = data_file(&dir);
        fs::write(&path, b"1,\xff\n2,x\n").unwrap();

        let lines = FileStorage::read_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2,x");
    }

    #[test]
    fn test_append_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = data_file(&dir);

        FileStorage::append_line(&path, "first").unwrap();
        FileStorage::append_line(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_append_after_unterminated_last_line() {
        let dir = TempDir::new().unwrap();
        let path = data_file(&dir);
        fs::write(&path, "old").unwrap();

        FileStorage::append_line(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_replace_contents_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = data_file(&dir);
        fs::write(&path, "one\ntwo\n").unwrap();

        FileStorage::replace_contents(&path, "three\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "three\n");
        assert!(!dir.path().join("patients.txt.tmp").exists());
    }
}

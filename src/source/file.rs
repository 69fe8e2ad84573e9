//! File-based log source.

use crate::model::error::InputError;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A JSONL log file opened for reading.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    reader: BufReader<File>,
}

impl FileSource {
    /// Open the log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        // Check if file exists before trying to open
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
        })
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand over the buffered reader.
    pub fn into_reader(self) -> BufReader<File> {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn new_returns_file_not_found_for_missing_path() {
        let result = FileSource::new("/nonexistent/path/to/file.jsonl");
        assert!(matches!(result, Err(InputError::FileNotFound { .. })));
    }

    #[test]
    fn new_opens_existing_file() {
        let test_file = std::env::temp_dir().join("cchist_file_source_open.jsonl");
        std::fs::write(&test_file, "line1\n").unwrap();

        let source = FileSource::new(&test_file).unwrap();
        assert_eq!(source.path(), test_file.as_path());

        let mut content = String::new();
        source.into_reader().read_to_string(&mut content).unwrap();
        let _ = std::fs::remove_file(&test_file);

        assert_eq!(content, "line1\n");
    }

    #[test]
    fn new_on_directory_is_io_error() {
        let dir = std::env::temp_dir();
        // Opening a directory succeeds on some platforms; reading it never does
        match FileSource::new(&dir) {
            Ok(source) => {
                let mut buf = String::new();
                assert!(source.into_reader().read_to_string(&mut buf).is_err());
            }
            Err(err) => assert!(matches!(err, InputError::Io(_))),
        }
    }
}

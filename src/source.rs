//! Line sources
//!
//! [`Pipeline::file`] opens a path and yields its lines; [`Pipeline::lines`] does
//! the same for any buffered reader. Lines keep their terminator (`\n` or
//! `\r\n`); only the last line may lack one. Read failures are yielded as `Err`
//! items so they reach the caller, and end the source.
//!
//! The underlying handle is released as soon as the source reaches its end or
//! fails. A pipeline dropped half-way releases it when the pipeline is dropped.

use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Iterator over the lines of a reader, terminators included.
pub struct Lines<R> {
    reader: Option<R>,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Lines {
            reader: Some(reader),
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => Some(Ok(line)),
            Err(e) => {
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}

impl<'a> Pipeline<'a, io::Result<String>> {
    /// Lines of `reader`, read lazily.
    pub fn lines<R: BufRead + 'a>(reader: R) -> Self {
        Pipeline::wrap(Lines::new(reader))
    }
}

impl Pipeline<'static, io::Result<String>> {
    /// Lines of the file at `path`, read lazily.
    ///
    /// # Errors
    ///
    /// `PipelineError::FileNotFound` unless `path` is a regular file, or
    /// `PipelineError::Io` if it cannot be opened.
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened line source");
        Ok(Pipeline::lines(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_keeps_terminators() {
        let lines = Pipeline::lines(Cursor::new("one\ntwo\r\nthree"))
            .try_to_list()
            .unwrap();
        assert_eq!(lines, vec!["one\n", "two\r\n", "three"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_empty_line() {
        let lines = Pipeline::lines(Cursor::new("a\nb\n")).try_to_list().unwrap();
        assert_eq!(lines, vec!["a\n", "b\n"]);
        assert_eq!(Pipeline::lines(Cursor::new("")).count(), 0);
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_read_error_is_yielded_once() {
        let items = Pipeline::lines(BufReader::new(Failing)).to_list();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Pipeline::file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pipeline::file(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }
}

use crate::domain::ports::RequestBody;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// An in-memory body.
#[derive(Debug, Clone)]
pub struct BytesBody {
    data: Vec<u8>,
    content_type: Option<String>,
}

impl BytesBody {
    pub fn new(data: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    pub fn from_text(text: impl Into<String>, content_type: &str) -> Self {
        Self::new(text.into().into_bytes(), Some(content_type))
    }

    pub fn json(data: impl Into<Vec<u8>>) -> Self {
        Self::new(data, Some("application/json"))
    }
}

impl RequestBody for BytesBody {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn content_length(&self) -> io::Result<Option<u64>> {
        Ok(Some(self.data.len() as u64))
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(&self.data)
    }
}

/// A body read from disk. The file is reopened on every write.
#[derive(Debug, Clone)]
pub struct FileBody {
    path: PathBuf,
    content_type: Option<String>,
}

impl FileBody {
    pub fn new(path: impl AsRef<Path>, content_type: Option<&str>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            content_type: content_type.map(str::to_string),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RequestBody for FileBody {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn content_length(&self) -> io::Result<Option<u64>> {
        Ok(Some(std::fs::metadata(&self.path)?.len()))
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        let mut file = File::open(&self.path)?;
        io::copy(&mut file, sink)?;
        Ok(())
    }
}

/// A one-shot body backed by a reader, such as a pipe or a socket.
pub struct ReaderBody<R> {
    reader: Mutex<Option<R>>,
    content_length: Option<u64>,
    content_type: Option<String>,
}

impl<R: Read + Send> ReaderBody<R> {
    pub fn new(reader: R, content_length: Option<u64>, content_type: Option<&str>) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
            content_length,
            content_type: content_type.map(str::to_string),
        }
    }
}

impl<R: Read + Send> RequestBody for ReaderBody<R> {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn content_length(&self) -> io::Result<Option<u64>> {
        Ok(self.content_length)
    }

    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "reader lock poisoned"))?
            .take();
        let mut reader = reader.ok_or_else(|| {
            io::Error::new(io::ErrorKind::Other, "one-shot body already consumed")
        })?;
        io::copy(&mut reader, sink)?;
        Ok(())
    }

    fn is_one_shot(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bytes_body() {
        let body = BytesBody::from_text("hello", "text/plain");
        assert_eq!(body.content_type(), Some("text/plain"));
        assert_eq!(body.content_length().unwrap(), Some(5));

        let mut out = Vec::new();
        body.write_to(&mut out).unwrap();
        body.write_to(&mut out).unwrap();
        assert_eq!(out, b"hellohello");
    }

    #[test]
    fn test_file_body_rewrites_from_start() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"file contents").unwrap();
        file.flush().unwrap();

        let body = FileBody::new(file.path(), Some(OCTET_STREAM));
        assert_eq!(body.content_length().unwrap(), Some(13));

        let mut first = Vec::new();
        let mut second = Vec::new();
        body.write_to(&mut first).unwrap();
        body.write_to(&mut second).unwrap();
        assert_eq!(first, b"file contents");
        assert_eq!(second, b"file contents");
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let body = FileBody::new("/definitely/not/here.bin", None);
        assert_eq!(
            body.content_length().unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert!(body.write_to(&mut Vec::new()).is_err());
    }

    #[test]
    fn test_reader_body_is_one_shot() {
        let body = ReaderBody::new(&b"stream"[..], None, None);
        assert!(body.is_one_shot());
        assert_eq!(body.content_length().unwrap(), None);

        let mut out = Vec::new();
        body.write_to(&mut out).unwrap();
        assert_eq!(out, b"stream");

        let err = body.write_to(&mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("already consumed"));
    }
}

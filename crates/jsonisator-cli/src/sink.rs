//! Buffered JSON file sink.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jsonisator_core::{render_many, Record};

/// Collects instances and writes them to a file as one document per flush.
///
/// With `append` set, each flush adds to the end of the file; otherwise it
/// replaces the file's contents.
pub struct JsonSink<T> {
    path: PathBuf,
    append: bool,
    buffer: Vec<T>,
}

impl<T: Record> JsonSink<T> {
    pub fn new(path: impl Into<PathBuf>, append: bool) -> Self {
        Self {
            path: path.into(),
            append,
            buffer: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, item: T) {
        self.buffer.push(item);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Render the buffered instances, write them out, and clear the buffer.
    /// Flushing an empty buffer writes nothing.
    pub fn flush(&mut self) -> Result<()> {
        if self.is_empty() {
            tracing::debug!(path = %self.path.display(), "nothing to flush");
            return Ok(());
        }

        let text = render_many(&self.buffer).context("Failed to render buffered instances")?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.append)
            .truncate(!self.append)
            .open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed to write file: {}", self.path.display()))?;

        tracing::info!(
            path = %self.path.display(),
            count = self.buffer.len(),
            bytes = text.len(),
            append = self.append,
            "flushed"
        );
        self.buffer.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("jsonisator-sink-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn flush_truncates_by_default() {
        let path = temp_path("truncate.json");
        let mut sink = JsonSink::new(&path, false);
        sink.write(Model { id: 1, products: vec![] });
        sink.flush().unwrap();
        sink.write(Model { id: 2, products: vec![] });
        sink.flush().unwrap();
        assert!(sink.is_empty());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"id\": 2,\n  \"products\": []\n}"
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn flush_appends_when_asked() {
        let path = temp_path("append.json");
        let mut sink = JsonSink::new(&path, true);
        sink.write(Model { id: 1, products: vec![] });
        sink.flush().unwrap();
        sink.write(Model { id: 2, products: vec![] });
        sink.flush().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"id\": 1,"));
        assert!(text.ends_with("\"id\": 2,\n  \"products\": []\n}"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn batch_flush_writes_array() {
        let path = temp_path("batch.json");
        let mut sink = JsonSink::new(&path, false);
        sink.write(Model { id: 1, products: vec![] });
        sink.write(Model { id: 2, products: vec![] });
        assert_eq!(sink.len(), 2);
        sink.flush().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
        assert!(text.ends_with("}\n]"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_flush_creates_nothing() {
        let path = temp_path("empty.json");
        let mut sink: JsonSink<Model> = JsonSink::new(&path, false);
        sink.flush().unwrap();
        assert!(!path.exists());
    }
}

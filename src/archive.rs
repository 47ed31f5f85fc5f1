use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// In-memory zip of synthesized clips, one entry per line.
///
/// Entries are stored uncompressed (audio is already compressed) and named
/// by their 1-based line index, e.g. `1.mp3`.
pub struct AudioArchive {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    extension: String,
    entries: Vec<String>,
}

impl AudioArchive {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            extension: extension.into(),
            entries: Vec::new(),
        }
    }

    /// File name used for the clip of line `index`.
    pub fn entry_name(&self, index: usize) -> String {
        format!("{index}.{}", self.extension)
    }

    /// Add the audio for line `index`.
    pub fn add(&mut self, index: usize, audio: &[u8]) -> Result<(), ArchiveError> {
        let name = self.entry_name(index);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.writer.start_file(name.as_str(), options)?;
        self.writer.write_all(audio)?;
        self.entries.push(name);
        Ok(())
    }

    /// Names of the entries added so far, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the central directory and return the zip bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

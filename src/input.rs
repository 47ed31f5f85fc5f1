//! Turning pasted text or an uploaded file into the lines to synthesize.
//!
//! Extraction only splits and filters; cleanup happens later in the driver.

use std::path::Path;

/// How the contents of an uploaded file are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `.txt`: one line of speech per non-blank line.
    PlainText,
    /// `.srt`: sequence numbers and timing cues are dropped.
    Subtitle,
    /// Anything else. Produces no lines.
    Unsupported,
}

impl SourceKind {
    /// Pick the kind from a file name's extension, ignoring case.
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("txt") => SourceKind::PlainText,
            Some("srt") => SourceKind::Subtitle,
            _ => SourceKind::Unsupported,
        }
    }
}

/// Where the text of a run comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Text typed or pasted directly, one synthesis line per line.
    Pasted(String),
    /// An uploaded file: its name (for the extension) and raw bytes.
    File { name: String, contents: Vec<u8> },
}

impl InputSource {
    pub fn file(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        InputSource::File {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, keeping its name for format detection.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(InputSource::File { name, contents })
    }

    /// Extract the non-blank lines of this source in their original order.
    pub fn extract_lines(&self) -> Vec<String> {
        match self {
            InputSource::Pasted(text) => plain_text_lines(text),
            InputSource::File { name, contents } => {
                let kind = SourceKind::from_file_name(name);
                let text = decode_dropping_invalid(contents);
                match kind {
                    SourceKind::PlainText => plain_text_lines(&text),
                    SourceKind::Subtitle => subtitle_lines(&text),
                    SourceKind::Unsupported => {
                        log::warn!("Unsupported input file {name:?}, expected .txt or .srt");
                        Vec::new()
                    }
                }
            }
        }
    }
}

/// Split on newlines, trim each line and drop the blank ones.
pub fn plain_text_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep only the dialogue lines of an SRT document.
///
/// Lines made up entirely of digits (cue counters) and lines containing a
/// `-->` timing arrow are dropped, as are blank lines.
pub fn subtitle_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.chars().all(char::is_numeric))
        .filter(|line| !line.contains("-->"))
        .map(str::to_string)
        .collect()
}

/// Decode UTF-8, silently skipping any invalid byte sequences.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

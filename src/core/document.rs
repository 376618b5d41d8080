//! The page being read: its lines and its heading outline.

use std::io::Read;
use std::path::Path;

/// Errors loading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not valid UTF-8")]
    NotUtf8(String),
    #[error("{0} is empty")]
    Empty(String),
}

/// A markdown ATX heading (`#` … `######`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub title: String,
    /// Zero-based line index in the document.
    pub row: usize,
}

#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    lines: Vec<String>,
    headings: Vec<Heading>,
}

impl Document {
    /// Read `path`, or stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let name = path.display().to_string();
        let io_err = |source| DocumentError::Io {
            path: name.clone(),
            source,
        };

        let bytes = if is_stdin(path) {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).map_err(io_err)?;
            buf
        } else {
            std::fs::read(path).map_err(io_err)?
        };

        let text = String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8(name.clone()))?;
        if text.trim().is_empty() {
            return Err(DocumentError::Empty(name));
        }

        Ok(Self::from_text(title_for(path), &text))
    }

    pub fn from_text(title: impl Into<String>, text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(|l| l.replace('\t', "    ")).collect();
        let headings = extract_headings(&lines);
        Self {
            title: title.into(),
            lines,
            headings,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Top-level sections for the nav menu: headings at the shallowest
    /// level present.
    pub fn sections(&self) -> Vec<&Heading> {
        let Some(top) = self.headings.iter().map(|h| h.level).min() else {
            return Vec::new();
        };
        self.headings.iter().filter(|h| h.level == top).collect()
    }
}

fn extract_headings(lines: &[String]) -> Vec<Heading> {
    let mut out = Vec::new();
    let mut fence: Option<&str> = None;

    for (row, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        // At most three spaces of indentation, as in CommonMark.
        if line.len() - trimmed.len() > 3 {
            continue;
        }
        let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
        if hashes == 0 || hashes > 6 {
            continue;
        }
        let rest = &trimmed[hashes..];
        if !rest.is_empty() && !rest.starts_with(' ') {
            continue;
        }
        let title = rest.trim().trim_end_matches('#').trim_end();
        if title.is_empty() {
            continue;
        }
        out.push(Heading {
            level: hashes as u8,
            title: title.to_string(),
            row,
        });
    }
    out
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Page title: the file name, or `stdin`.
fn title_for(path: &Path) -> String {
    if is_stdin(path) {
        return "stdin".into();
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

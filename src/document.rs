use crate::error::CitError;
use crate::{CitValue, statics};
use flate2::{Compression, GzBuilder, read::GzDecoder};
use std::{
    borrow::Cow,
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};

const UTF8_BOM: &str = "\u{FEFF}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitFormat {
    Json,
    GzipJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

/// A parsed CIT file plus what is needed to write it back the same way.
#[derive(Debug, Clone)]
pub struct LoadedCity {
    pub source_path: Option<PathBuf>,
    pub format: CitFormat,
    pub line_ending: LineEnding,
    pub root: CitValue,
}

impl LoadedCity {
    pub fn load_path(path: &Path) -> Result<Self, CitError> {
        let bytes = fs::read(path).map_err(|source| CitError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut city = Self::from_bytes(path, &bytes)?;
        city.source_path = Some(path.to_path_buf());
        Ok(city)
    }

    /// Parse file contents. `path` is only used for format detection and messages.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self, CitError> {
        let format = detect_format(path, bytes);
        let text_bytes = match format {
            CitFormat::Json => Cow::Borrowed(bytes),
            CitFormat::GzipJson => {
                let mut decoder = GzDecoder::new(bytes);
                let mut out = Vec::new();
                decoder
                    .read_to_end(&mut out)
                    .map_err(CitError::Decompress)?;
                Cow::Owned(out)
            }
        };

        let line_ending = detect_line_ending(&text_bytes);

        // Undecodable bytes become U+FFFD rather than failing the load.
        let text = String::from_utf8_lossy(&text_bytes);
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);
        let root = CitValue::parse(text).map_err(|e| CitError::Parse {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })?;
        if root.as_object().is_none() {
            return Err(CitError::NotAnObject {
                found: root.type_name(),
            });
        }

        tracing::debug!(?path, ?format, ?line_ending, "parsed CIT document");
        Ok(Self {
            source_path: None,
            format,
            line_ending,
            root,
        })
    }

    pub fn city_name(&self) -> Option<&str> {
        self.root
            .get(statics::CIT_KEY_CITY_NAME)
            .and_then(CitValue::as_str)
    }

    /// Serialize with the loaded line ending in the given container format.
    pub fn generate_bytes_for_format(&self, format: CitFormat) -> Result<Vec<u8>, CitError> {
        let newline = match self.line_ending {
            LineEnding::Lf => statics::NL_LF,
            LineEnding::CrLf => statics::NL_CRLF,
        };
        let text = self.root.to_cit_pretty_with_newline(newline);

        match format {
            CitFormat::Json => Ok(text.into_bytes()),
            CitFormat::GzipJson => {
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder
                    .write_all(text.as_bytes())
                    .map_err(CitError::Compress)?;
                encoder.finish().map_err(CitError::Compress)
            }
        }
    }

    /// Write the current document to `path`; the format follows the target extension.
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), CitError> {
        let format = format_for_target(path);
        let bytes = self.generate_bytes_for_format(format)?;
        write_file(path, &bytes)?;
        self.source_path = Some(path.to_path_buf());
        self.format = format;
        Ok(())
    }
}

fn format_for_target(path: &Path) -> CitFormat {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        CitFormat::GzipJson
    } else {
        CitFormat::Json
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CitError> {
    fs::write(path, bytes).map_err(|source| CitError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn detect_line_ending(text_bytes: &[u8]) -> LineEnding {
    // Count actual newline terminators; a stray CRLF inside a mostly-LF file
    // should not flip the whole output.
    let mut lf_count = 0usize;
    let mut crlf_count = 0usize;

    for (i, b) in text_bytes.iter().enumerate() {
        if *b != b'\n' {
            continue;
        }
        if i > 0 && text_bytes[i - 1] == b'\r' {
            crlf_count += 1;
        } else {
            lf_count += 1;
        }
    }

    if crlf_count > lf_count {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}

fn detect_format(path: &Path, bytes: &[u8]) -> CitFormat {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        return CitFormat::GzipJson;
    }
    // Gzip magic: 1F 8B
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return CitFormat::GzipJson;
    }
    CitFormat::Json
}

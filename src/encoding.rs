//! Dataset loading with encoding detection
//!
//! Reads the raw regulations file, detects its encoding and transcodes it to
//! UTF-8 before it is handed to the parser.

use crate::parser::{parse_with_stats, ParseStats};
use crate::record::Record;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Bytes sampled for encoding detection
const DETECTION_SAMPLE: usize = 64 * 1024;

/// Failure to read the raw dataset
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of encoding detection
#[derive(Debug, Clone)]
pub struct EncodingInfo {
    /// Detected encoding name
    pub name: &'static str,
    /// Confidence level (0.0 - 1.0)
    pub confidence: f32,
    /// The encoding_rs Encoding reference
    pub encoding: &'static Encoding,
    /// Length of the byte order mark, if any
    pub bom_len: usize,
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self {
            name: "UTF-8",
            confidence: 1.0,
            encoding: encoding_rs::UTF_8,
            bom_len: 0,
        }
    }
}

/// Detect the encoding of raw file content
pub fn detect_encoding(content: &[u8]) -> EncodingInfo {
    if content.is_empty() {
        return EncodingInfo::default();
    }

    // Check for BOM first
    if let Some((encoding, bom_len)) = detect_bom(content) {
        return EncodingInfo {
            name: encoding.name(),
            confidence: 1.0,
            encoding,
            bom_len,
        };
    }

    let sample = &content[..content.len().min(DETECTION_SAMPLE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == content.len());
    let encoding = detector.guess(None, true);

    // Rough confidence based on whether the content is valid UTF-8
    let confidence = if encoding == encoding_rs::UTF_8 {
        if std::str::from_utf8(sample).is_ok() {
            1.0
        } else {
            0.5
        }
    } else {
        0.8
    };

    EncodingInfo {
        name: encoding.name(),
        confidence,
        encoding,
        bom_len: 0,
    }
}

/// Detect BOM (Byte Order Mark) at the start of content
fn detect_bom(content: &[u8]) -> Option<(&'static Encoding, usize)> {
    if content.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some((encoding_rs::UTF_8, 3));
    }
    if content.starts_with(&[0xFE, 0xFF]) {
        return Some((encoding_rs::UTF_16BE, 2));
    }
    if content.starts_with(&[0xFF, 0xFE]) {
        return Some((encoding_rs::UTF_16LE, 2));
    }
    None
}

/// Transcode raw bytes to UTF-8, dropping any BOM
pub fn decode(content: &[u8]) -> (String, EncodingInfo) {
    let info = detect_encoding(content);
    let body = &content[info.bom_len..];

    let (text, had_errors) = info.encoding.decode_without_bom_handling(body);
    if had_errors {
        log::warn!(
            "Invalid {} sequences in input, replaced with U+FFFD",
            info.name
        );
    }

    (text.into_owned(), info)
}

/// Read a dataset file and transcode it to UTF-8
pub fn load_text(path: &Path) -> Result<(String, EncodingInfo), LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => io_error(e),
    })?;

    let len = file.metadata().map_err(io_error)?.len();
    if len == 0 {
        return Ok((String::new(), EncodingInfo::default()));
    }

    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(io_error)?;
    let (text, info) = decode(&mmap);
    log::debug!(
        "Loaded {:?}: {} bytes, encoding {} (confidence {:.1})",
        path,
        len,
        info.name,
        info.confidence
    );

    Ok((text, info))
}

/// Load and parse a dataset file.
///
/// A file that cannot be read is logged and yields an empty record set; the
/// error never reaches the caller.
pub fn load_records(path: &Path) -> (Vec<Record>, ParseStats) {
    match load_text(path) {
        Ok((text, _)) => parse_with_stats(&text),
        Err(e) => {
            log::error!("Error loading regulations: {}", e);
            (Vec::new(), ParseStats::default())
        }
    }
}

//! Loading LS-8 program images from text.
//!
//! An image is one binary literal per line, such as `10000010`. Anything
//! after a `#` is a comment, and blank lines are skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: `{text}` is not an 8-bit binary literal")]
    InvalidLiteral { line: usize, text: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parse the text of a program image into bytes.
pub fn parse(source: &str) -> Result<Vec<u8>, ParseError> {
    let mut image = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let text = match line.split_once('#') {
            Some((code, _comment)) => code,
            None => line,
        }
        .trim();
        if text.is_empty() {
            continue;
        }
        let byte = parse_literal(text).ok_or_else(|| ParseError::InvalidLiteral {
            line: index + 1,
            text: text.to_string(),
        })?;
        image.push(byte);
    }
    Ok(image)
}

fn parse_literal(text: &str) -> Option<u8> {
    if text.len() > 8 || !text.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(text, 2).ok()
}

/// Read and parse the program image at `path`.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(parse(&source)?)
}

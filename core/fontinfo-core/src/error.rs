//! Error taxonomy for fontinfo-core
//!
//! Only [`ScanError`] and [`WriteError`] are allowed to end a run. Everything
//! a single font file can go wrong with is a [`ParseError`], which the
//! pipeline logs and turns into a skipped entry.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configured font directory could not be listed. Fatal to the run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read font directory {}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why one font file contributed nothing to the report.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read font file {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed font file {}: {kind}", path.display())]
    Malformed { path: PathBuf, kind: MalformedKind },
}

impl ParseError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ParseError::FileRead { path, .. } | ParseError::Malformed { path, .. } => path,
        }
    }
}

/// Structural problems that make a file unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedKind {
    #[error("unrecognised sfnt version tag 0x{0:08X}")]
    BadVersionTag(u32),
    #[error("no 'name' table in the table directory")]
    MissingNameTable,
    #[error("no full font name (nameID 4) record")]
    MissingFullName,
    #[error("truncated while reading {what}")]
    Truncated { what: &'static str },
}

/// A single name record whose bytes could not be turned into text.
///
/// Never escapes the parser: the record is dropped and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("UTF-16 string has odd byte length {0}")]
    OddLength(usize),
    #[error("unpaired UTF-16 surrogate 0x{0:04X}")]
    UnpairedSurrogate(u16),
    #[error("string bytes {start}..{end} lie outside the name table")]
    OutOfBounds { start: usize, end: usize },
}

/// The report could not be written. Fatal; the computed report is lost.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write report to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot serialise report")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that escape [`crate::collect`].
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("invalid worker count {0}; at least one worker is required")]
    InvalidJobs(usize),
    #[error("cannot start worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

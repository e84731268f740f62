// SPDX-License-Identifier: MIT

use crate::flight::Flight;
use thiserror::Error;

/// Broad class of a record failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Line length or line count does not match the record layout.
    Structural,
    /// Non-numeric content where a number is required.
    Format,
    /// A categorical value outside its allowed set.
    Validation,
    /// Unparseable date or time.
    Temporal,
}

/// Why a single record was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("{record} record too short (need {min} chars, got {len}): {line}")]
    LineTooShort {
        record: char,
        min: usize,
        len: usize,
        line: String,
    },
    #[error("{record} record declares {count} fields but is {len} chars long: {line}")]
    WrongLineSize {
        record: char,
        count: usize,
        len: usize,
        line: String,
    },
    #[error("field boundary splits a multi-byte character: {0}")]
    Misaligned(String),
    #[error("task declares {expected} lines but only {available} remain")]
    MissingTaskLines { expected: usize, available: usize },
    #[error("extension {code} at columns {start}-{end} is beyond the end of the line: {line}")]
    ExtensionOutOfRange {
        code: String,
        start: usize,
        end: usize,
        line: String,
    },
    #[error("invalid {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid coordinate: '{0}'")]
    InvalidCoordinate(String),
    #[error("invalid extension declaration '{0}'")]
    InvalidExtension(String),
    #[error("invalid fix validity '{0}'")]
    InvalidFixValidity(char),
    #[error("unknown header field '{0}'")]
    UnknownHeaderField(String),
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::LineTooShort { .. }
            | RecordError::WrongLineSize { .. }
            | RecordError::Misaligned(_)
            | RecordError::MissingTaskLines { .. }
            | RecordError::ExtensionOutOfRange { .. } => ErrorKind::Structural,
            RecordError::InvalidNumber { .. }
            | RecordError::InvalidCoordinate(_)
            | RecordError::InvalidExtension(_) => ErrorKind::Format,
            RecordError::InvalidFixValidity(_) | RecordError::UnknownHeaderField(_) => {
                ErrorKind::Validation
            }
            RecordError::InvalidTime(_) | RecordError::InvalidDate(_) => ErrorKind::Temporal,
        }
    }
}

/// A parse that stopped at the first bad record.
///
/// Holds the flight as it stood before the failing line.
#[derive(Error, Debug)]
#[error("line {line}: {source}")]
pub struct ParseError {
    pub line: usize,
    #[source]
    pub source: RecordError,
    partial: Box<Flight>,
}

impl ParseError {
    pub(crate) fn new(line: usize, source: RecordError, partial: Flight) -> Self {
        Self {
            line,
            source,
            partial: Box::new(partial),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn partial(&self) -> &Flight {
        &self.partial
    }

    pub fn into_partial(self) -> Flight {
        *self.partial
    }
}

#[derive(Error, Debug)]
pub enum IgcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

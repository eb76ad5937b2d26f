//! Error types for style sheet loading.

use thiserror::Error;

/// Errors that can occur while loading a style sheet.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at {line}:{column}: {kind}")]
    Parse {
        line: u32,
        column: u32,
        kind: ParseErrorKind,
    },
}

/// Why a style sheet failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("invalid media query `{0}`")]
    InvalidMediaQuery(String),

    #[error("@media rules cannot be nested")]
    NestedMediaRule,
}

pub type Result<T> = std::result::Result<T, Error>;

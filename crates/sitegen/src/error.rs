// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for site generation

use std::path::PathBuf;

/// Everything that can fail a build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file (bad quoting, wrong field count, ...)
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: arrow_schema::ArrowError,
    },

    /// Site configuration could not be expanded, parsed or validated
    #[error("Invalid site configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A required column is absent from the header
    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A required value is empty in one row
    #[error("{} row {row}: required field '{column}' is empty", path.display())]
    MissingField {
        path: PathBuf,
        row: usize,
        column: String,
    },

    /// A value is present but unusable
    #[error("{} row {row}: invalid {column} '{value}': {reason}", path.display())]
    InvalidField {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    /// Two rows share an id
    #[error("{}: duplicate id '{id}' in rows {first_row} and {row}", path.display())]
    DuplicateId {
        path: PathBuf,
        id: String,
        first_row: usize,
        row: usize,
    },

    /// Two rows would be written to the same page
    #[error("{} row {row}: slug '{slug}' is already used by another record", path.display())]
    DuplicateSlug {
        path: PathBuf,
        slug: String,
        row: usize,
    },

    /// Template loading or rendering failed
    #[error("Template '{name}' failed: {message}")]
    Template { name: String, message: String },

    /// Asset pattern or directory walk failed
    #[error("Asset copy failed: {message}")]
    Assets { message: String },

    /// The output directory cannot be replaced safely
    #[error("Output directory {}: {message}", path.display())]
    OutputDir { path: PathBuf, message: String },
}

/// Result type for site generation
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Flatten a tera error and its causes into a single `Template` error.
    pub(crate) fn template(name: &str, err: &tera::Error) -> Self {
        Error::Template {
            name: name.to_string(),
            message: collect_error_chain(err).join(": "),
        }
    }
}

/// An error's message followed by the message of each cause, outermost first.
pub(crate) fn collect_error_chain(err: &dyn std::error::Error) -> Vec<String> {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Product and post records, typed from CSV rows.
//!
//! Records are read-only for the whole build. Every CSV column is kept in
//! `fields` so templates can reference columns this crate knows nothing about.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex"));
static PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("price regex"));

/// Date format of the `publish_date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Publication status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Draft,
    Published,
    Archived,
}

impl Status {
    /// Parse a status cell. Case and surrounding whitespace are ignored and an
    /// empty cell means `Draft`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "draft" => Some(Status::Draft),
            "published" => Some(Status::Published),
            "archived" => Some(Status::Archived),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
            Status::Archived => "archived",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, collapse every run of characters outside `[a-z0-9]` into one
/// `-`, and trim `-` from both ends.
#[must_use]
pub fn slugify(text: &str) -> String {
    NON_SLUG
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Split a comma-separated tag cell.
#[must_use]
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// One CSV data row: column name → cell text.
///
/// Every header column is present in `values`; empty cells are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub values: BTreeMap<String, String>,
}

impl Row {
    /// Non-empty trimmed value, or `None`.
    #[must_use]
    pub fn optional(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Non-empty trimmed value, or a `MissingField` error.
    pub fn required(&self, path: &Path, column: &str) -> Result<&str> {
        self.optional(column).ok_or_else(|| Error::MissingField {
            path: path.to_path_buf(),
            row: self.row,
            column: column.to_string(),
        })
    }

    fn invalid(&self, path: &Path, column: &str, value: &str, reason: &str) -> Error {
        Error::InvalidField {
            path: path.to_path_buf(),
            row: self.row,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Fields shared by every record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub row: usize,
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: Status,
    pub publish_date: Option<NaiveDate>,
}

impl RecordMeta {
    fn from_row(row: &Row, path: &Path) -> Result<Self> {
        let id = row.required(path, "id")?.to_string();
        let title = row.required(path, "title")?.to_string();

        let status_text = row.optional("status").unwrap_or("");
        let status = Status::parse(status_text).ok_or_else(|| {
            row.invalid(
                path,
                "status",
                status_text,
                "expected draft, published or archived",
            )
        })?;

        let publish_date = match row.optional("publish_date") {
            None => None,
            Some(text) => Some(
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map_err(|e| row.invalid(path, "publish_date", text, &e.to_string()))?,
            ),
        };

        let mut slug = slugify(&title);
        if slug.is_empty() {
            slug = slugify(&id);
        }
        if slug.is_empty() {
            return Err(row.invalid(path, "title", &title, "no letters or digits to build a URL from"));
        }

        Ok(Self {
            row: row.row,
            id,
            title,
            slug,
            status,
            publish_date,
        })
    }
}

/// Anything the publish window can filter.
pub trait Publishable {
    fn meta(&self) -> &RecordMeta;
}

/// Conversion from a CSV row, used by the table loader.
pub trait FromRow: Sized + Publishable {
    /// Human name of the record kind, used in log messages.
    const KIND: &'static str;
    /// Columns the header must contain.
    const REQUIRED_COLUMNS: &'static [&'static str] = &["id", "title", "status"];

    fn from_row(row: &Row, path: &Path) -> Result<Self>;
}

/// A product row from `products.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub meta: RecordMeta,
    pub description: Option<String>,
    /// Price as written, validated to be a plain non-negative decimal
    pub price: Option<String>,
    /// Where the product is actually bought
    pub external_url: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

impl Publishable for Product {
    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl FromRow for Product {
    const KIND: &'static str = "product";

    fn from_row(row: &Row, path: &Path) -> Result<Self> {
        let meta = RecordMeta::from_row(row, path)?;

        let price = match row.optional("price") {
            None => None,
            Some(text) if PRICE.is_match(text) => Some(text.to_string()),
            Some(text) => {
                return Err(row.invalid(path, "price", text, "expected a plain decimal like 24.00"));
            }
        };

        Ok(Self {
            meta,
            description: row.optional("description").map(str::to_string),
            price,
            external_url: row.optional("external_url").map(str::to_string),
            image: row.optional("image").map(str::to_string),
            tags: row.optional("tags").map(split_tags).unwrap_or_default(),
            fields: row.values.clone(),
        })
    }
}

/// A blog post row from `posts.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub meta: RecordMeta,
    pub excerpt: Option<String>,
    /// Inline markdown body
    pub content: Option<String>,
    /// Markdown file holding the body, relative to the data directory
    pub content_file: Option<String>,
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

impl Publishable for Post {
    fn meta(&self) -> &RecordMeta {
        &self.meta
    }
}

impl FromRow for Post {
    const KIND: &'static str = "post";

    fn from_row(row: &Row, path: &Path) -> Result<Self> {
        Ok(Self {
            meta: RecordMeta::from_row(row, path)?,
            excerpt: row.optional("excerpt").map(str::to_string),
            content: row.optional("content").map(str::to_string),
            content_file: row.optional("content_file").map(str::to_string),
            tags: row.optional("tags").map(split_tags).unwrap_or_default(),
            fields: row.values.clone(),
        })
    }
}

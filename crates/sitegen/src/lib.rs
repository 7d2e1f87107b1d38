// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Sitegen — static shop and blog generator
//!
//! Reads a product table, a post table and a site configuration, and writes
//! a complete static site: HTML pages from Tera templates, `sitemap.xml`,
//! `rss.xml`, JSON-LD structured data and copied assets.
//!
//! ## Inputs
//!
//! ```text
//! data/site.yml        site configuration
//! data/products.csv    one row per product
//! data/posts.csv       one row per post (markdown inline or in content_file)
//! site/templates/      index.html, products_index.html, product.html,
//!                      blog_index.html, post.html (+ partials)
//! site/assets/         copied to <output>/assets
//! ```
//!
//! Only records with status `published` and a publish date that is absent or
//! not after the build day appear anywhere in the output.
//!
//! ## Usage
//!
//! ```bash
//! shopgen build --output _site
//! shopgen social --limit 3
//! ```

mod assets;
mod builder;
mod config;
mod error;
mod feeds;
pub mod jsonld;
pub mod markdown;
mod pages;
mod publish;
mod records;
mod render;
mod social;
mod table;

pub use assets::copy_assets;
pub use builder::{BuildReport, SiteBuilder, SiteData};
pub use config::{BuildPaths, SiteConfig, expand_config_template};
pub use error::{Error, Result};
pub use feeds::{rss, sitemap};
pub use pages::{Article, PageJob, plan_pages};
pub use publish::{PublishWindow, Visibility};
pub use records::{FromRow, Post, Product, Publishable, RecordMeta, Row, Status, slugify, split_tags};
pub use render::TemplateEngine;
pub use social::{DEFAULT_LIMIT as DEFAULT_SOCIAL_LIMIT, social_copy};
pub use table::{CsvTable, check_unique_slugs, load_table, read_table};

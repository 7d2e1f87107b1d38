// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Site configuration, parsed from `data/site.yml`, and the build paths.
//!
//! The file is expanded as a Tera template before it is parsed, so CI can
//! inject values from the environment:
//!
//! ```yaml
//! title: "Desk Goods"
//! base_url: "{{ env(name='SITE_URL', default='https://example.github.io') }}"
//! description: "Small things for tidy desks"
//! social:
//!   instagram: "https://instagram.com/deskgoods"
//! monetization:
//!   kofi: "https://ko-fi.com/deskgoods"
//! featured_products: 4
//! recent_posts: 3
//! assets: ["css/*.css", "img/**"]
//! ```

use crate::error::{Error, Result, collect_error_chain};
use diagnostics::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tera::{Tera, Value};

/// Site-wide settings. Loaded once per build, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub base_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// ISO 4217 code used in structured data
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Prefix used when prices are shown as text
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub social: BTreeMap<String, String>,
    #[serde(default)]
    pub monetization: BTreeMap<String, String>,
    /// How many products the home page shows
    #[serde(default = "default_featured_products")]
    pub featured_products: usize,
    /// How many posts the home page shows
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,
    /// Glob patterns, relative to the assets directory, of files to publish
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
    /// Any other key, passed through to templates untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_featured_products() -> usize {
    4
}

fn default_recent_posts() -> usize {
    3
}

fn default_assets() -> Vec<String> {
    vec!["**/*".to_string()]
}

impl SiteConfig {
    /// Read, expand, parse and validate the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let expanded = expand_config_template(&raw).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        let config = Self::parse(&expanded, path)?;

        let file = path.display().to_string();
        let title = config.title.clone();
        debug!("Loaded site configuration {file} for {title}", file: file, title: title);
        Ok(config)
    }

    /// Parse YAML that has already been expanded.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, Path::new("<inline>"))
    }

    fn parse(yaml: &str, path: &Path) -> Result<Self> {
        let config: SiteConfig = serde_yaml_ng::from_str(yaml).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| Error::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.title.trim().is_empty() {
            return Err(invalid("title must not be empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url must not be empty"));
        }
        if self.assets.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("assets patterns must not be empty"));
        }
        Ok(())
    }

    /// Absolute URL of a site-relative path.
    ///
    /// `base_url` may or may not end with `/`; `url_for("")` is the home page.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// The whole configuration as a JSON object, extra keys flattened in.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| Error::Config {
            path: PathBuf::from("<site>"),
            message: e.to_string(),
        })
    }
}

/// Expand Tera syntax in the raw configuration text.
///
/// Only the `env(name=.., default=..)` function is available; there are no
/// variables.
pub fn expand_config_template(text: &str) -> std::result::Result<String, String> {
    let mut tera = Tera::default();
    tera.register_function("env", env_function);

    tera.render_str(text, &tera::Context::new())
        .map_err(|e| format!("Template expansion failed: {}", collect_error_chain(&e).join("\n  → ")))
}

fn env_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("env() requires a string `name` argument"))?;

    match std::env::var(name) {
        Ok(value) => Ok(Value::String(value)),
        Err(_) => args.get("default").cloned().ok_or_else(|| {
            tera::Error::msg(format!(
                "environment variable '{}' is not set and no default was given",
                name
            ))
        }),
    }
}

/// Where inputs are read from and where the site is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            template_dir: PathBuf::from("site/templates"),
            assets_dir: PathBuf::from("site/assets"),
            output_dir: PathBuf::from("_site"),
        }
    }
}

impl BuildPaths {
    #[must_use]
    pub fn site_config(&self) -> PathBuf {
        self.data_dir.join("site.yml")
    }

    #[must_use]
    pub fn products_csv(&self) -> PathBuf {
        self.data_dir.join("products.csv")
    }

    #[must_use]
    pub fn posts_csv(&self) -> PathBuf {
        self.data_dir.join("posts.csv")
    }
}

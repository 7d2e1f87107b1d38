// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Page templates.
//!
//! Every `*.html` file under the template directory is loaded into one Tera
//! instance. Two functions are available to templates:
//!
//! - `url(path="products/")` → absolute site URL
//! - `asset(path="css/site.css")` → absolute URL under `/assets/`

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::pages::{
    BLOG_INDEX_TEMPLATE, HOME_TEMPLATE, POST_TEMPLATE, PRODUCT_TEMPLATE, PRODUCTS_INDEX_TEMPLATE,
    PageJob,
};
use diagnostics::*;
use std::collections::HashMap;
use std::path::Path;
use tera::{Tera, Value};

/// Templates every build renders.
pub const PAGE_TEMPLATES: [&str; 5] = [
    HOME_TEMPLATE,
    PRODUCTS_INDEX_TEMPLATE,
    PRODUCT_TEMPLATE,
    BLOG_INDEX_TEMPLATE,
    POST_TEMPLATE,
];

pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Load `**/*.html` from `dir`.
    pub fn load(dir: &Path, site: &SiteConfig) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::Template {
                name: dir.display().to_string(),
                message: "template directory does not exist".to_string(),
            });
        }
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob).map_err(|e| Error::template(&glob, &e))?;

        let count = tera.get_template_names().count();
        let dir = dir.display().to_string();
        debug!("Loaded {count} templates from {dir}", count: count, dir: dir);

        Ok(Self::with_functions(tera, site))
    }

    /// Build from in-memory templates.
    pub fn from_raw(templates: &[(&str, &str)], site: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(templates.to_vec())
            .map_err(|e| Error::template("<raw>", &e))?;
        Ok(Self::with_functions(tera, site))
    }

    fn with_functions(mut tera: Tera, site: &SiteConfig) -> Self {
        tera.set_escape_fn(escape_html);
        let for_url = site.clone();
        tera.register_function("url", move |args: &HashMap<String, Value>| {
            let path = path_arg("url", args)?;
            Ok(Value::String(for_url.url_for(path)))
        });
        let for_asset = site.clone();
        tera.register_function("asset", move |args: &HashMap<String, Value>| {
            let path = path_arg("asset", args)?;
            let path = format!("assets/{}", path.trim_start_matches('/'));
            Ok(Value::String(for_asset.url_for(&path)))
        });
        Self { tera }
    }

    /// Fail unless every page template is present.
    pub fn check(&self) -> Result<()> {
        let names: Vec<&str> = self.tera.get_template_names().collect();
        for required in PAGE_TEMPLATES {
            if !names.contains(&required) {
                return Err(Error::Template {
                    name: required.to_string(),
                    message: "template not found".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn render(&self, job: &PageJob) -> Result<String> {
        self.tera
            .render(job.template, &job.context)
            .map_err(|e| Error::template(job.template, &e))
    }
}

/// Autoescape for `.html` templates. Unlike Tera's default, `/` is kept so
/// URLs print as written.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn path_arg<'a>(function: &str, args: &'a HashMap<String, Value>) -> tera::Result<&'a str> {
    args.get("path").and_then(Value::as_str).ok_or_else(|| {
        tera::Error::msg(format!("{}() requires a string `path` argument", function))
    })
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Page planning: turns the site config and the visible records into a flat
//! list of `PageJob`s, one per output HTML file.
//!
//! | output                 | template              | page keys                           |
//! |------------------------|-----------------------|-------------------------------------|
//! | `index.html`           | `index.html`          | `featured_products`, `recent_posts` |
//! | `products/index.html`  | `products_index.html` | `products`                          |
//! | `products/<slug>.html` | `product.html`        | `product`                           |
//! | `blog/index.html`      | `blog_index.html`     | `posts`                             |
//! | `blog/<slug>.html`     | `post.html`           | `post`                              |
//!
//! Every context also carries the site keys at top level, `site`,
//! `build_date`, `page_url`, `breadcrumbs` and `json_ld`.

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::jsonld;
use crate::markdown;
use crate::records::{DATE_FORMAT, Post, Product};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use std::path::Path;
use tera::Context;

pub const HOME_TEMPLATE: &str = "index.html";
pub const PRODUCTS_INDEX_TEMPLATE: &str = "products_index.html";
pub const PRODUCT_TEMPLATE: &str = "product.html";
pub const BLOG_INDEX_TEMPLATE: &str = "blog_index.html";
pub const POST_TEMPLATE: &str = "post.html";

/// Longest generated description, in characters.
const SUMMARY_CHARS: usize = 160;

/// One page to generate.
#[derive(Debug, Clone)]
pub struct PageJob {
    /// Output path relative to the output directory (e.g. "products/pen.html")
    pub output_path: String,
    /// Template name inside the template directory
    pub template: &'static str,
    pub context: Context,
}

/// A visible post with its body rendered.
#[derive(Debug, Clone)]
pub struct Article {
    pub post: Post,
    pub body_html: String,
    /// Excerpt, or a summary of the body when the row has none
    pub description: String,
}

impl Article {
    /// Render the body from `content_file` (relative to `data_dir`) when set,
    /// otherwise from the inline `content` column.
    pub fn load(post: Post, data_dir: &Path) -> Result<Self> {
        let source = match &post.content_file {
            Some(file) => {
                let path = data_dir.join(file);
                Some(std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?)
            }
            None => post.content.clone(),
        };
        let source = source.unwrap_or_default();

        let description = match &post.excerpt {
            Some(excerpt) => excerpt.clone(),
            None => markdown::summary(&source, SUMMARY_CHARS),
        };

        Ok(Self {
            body_html: markdown::render_markdown(&source),
            description,
            post,
        })
    }
}

#[must_use]
pub fn product_path(product: &Product) -> String {
    format!("products/{}.html", product.meta.slug)
}

#[must_use]
pub fn post_path(post: &Post) -> String {
    format!("blog/{}.html", post.meta.slug)
}

fn columns(fields: &std::collections::BTreeMap<String, String>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Template view of a product: every CSV column plus derived keys.
#[must_use]
pub fn product_value(site: &SiteConfig, product: &Product) -> Value {
    let mut map = columns(&product.fields);
    let path = product_path(product);
    map.insert("slug".into(), json!(product.meta.slug));
    map.insert("url".into(), json!(site.url_for(&path)));
    map.insert("path".into(), json!(path));
    map.insert("tag_list".into(), json!(product.tags));
    map.insert(
        "image_url".into(),
        json!(
            product
                .image
                .as_deref()
                .map(|image| jsonld::resolve_url(site, image))
                .unwrap_or_default()
        ),
    );
    map.insert(
        "price_display".into(),
        json!(
            product
                .price
                .as_deref()
                .map(|price| format!("{}{}", site.currency_symbol, price))
                .unwrap_or_default()
        ),
    );
    map.insert(
        "buy_url".into(),
        json!(product.external_url.clone().unwrap_or_default()),
    );
    Value::Object(map)
}

/// Template view of a post: every CSV column plus derived keys.
#[must_use]
pub fn article_value(site: &SiteConfig, article: &Article) -> Value {
    let post = &article.post;
    let mut map = columns(&post.fields);
    let path = post_path(post);
    map.insert("slug".into(), json!(post.meta.slug));
    map.insert("url".into(), json!(site.url_for(&path)));
    map.insert("path".into(), json!(path));
    map.insert("tag_list".into(), json!(post.tags));
    map.insert("content_html".into(), json!(article.body_html));
    map.insert("description".into(), json!(article.description));
    Value::Object(map)
}

/// Shared context: site keys flattened at top level, then `site` itself.
fn base_context(
    site: &SiteConfig,
    site_value: &Value,
    today: NaiveDate,
    page_path: &str,
    breadcrumbs: &[(String, String)],
    json_ld: &Value,
) -> Context {
    let mut context = Context::new();
    if let Value::Object(map) = site_value {
        for (key, value) in map {
            context.insert(key.as_str(), value);
        }
    }
    context.insert("site", site_value);
    context.insert("build_date", &today.format(DATE_FORMAT).to_string());
    context.insert("page_url", &site.url_for(page_path));
    let crumbs: Vec<Value> = breadcrumbs
        .iter()
        .map(|(label, url)| json!({ "label": label, "url": url }))
        .collect();
    context.insert("breadcrumbs", &crumbs);
    context.insert("json_ld", &jsonld::script_tag(json_ld));
    context
}

/// Expand the site into page jobs, in a fixed order: home, product index,
/// products, blog index, posts. Records keep their input order.
pub fn plan_pages(
    site: &SiteConfig,
    products: &[Product],
    articles: &[Article],
    today: NaiveDate,
) -> Result<Vec<PageJob>> {
    let site_value = site.to_value()?;
    let product_values: Vec<Value> = products.iter().map(|p| product_value(site, p)).collect();
    let post_values: Vec<Value> = articles.iter().map(|a| article_value(site, a)).collect();

    let home = ("Home".to_string(), site.url_for(""));
    let products_crumb = ("Products".to_string(), site.url_for("products/"));
    let blog_crumb = ("Blog".to_string(), site.url_for("blog/"));

    let mut jobs = Vec::with_capacity(3 + products.len() + articles.len());

    // Home
    let mut context = base_context(
        site,
        &site_value,
        today,
        "",
        std::slice::from_ref(&home),
        &jsonld::website(site),
    );
    let featured: Vec<&Value> = product_values.iter().take(site.featured_products).collect();
    let recent: Vec<&Value> = post_values.iter().take(site.recent_posts).collect();
    context.insert("featured_products", &featured);
    context.insert("recent_posts", &recent);
    jobs.push(PageJob {
        output_path: "index.html".to_string(),
        template: HOME_TEMPLATE,
        context,
    });

    // Product index and pages
    let urls: Vec<String> = products.iter().map(|p| site.url_for(&product_path(p))).collect();
    let mut context = base_context(
        site,
        &site_value,
        today,
        "products/",
        &[home.clone(), products_crumb.clone()],
        &jsonld::item_list("Products", &site.url_for("products/"), &urls),
    );
    context.insert("products", &product_values);
    jobs.push(PageJob {
        output_path: "products/index.html".to_string(),
        template: PRODUCTS_INDEX_TEMPLATE,
        context,
    });

    for (product, value) in products.iter().zip(&product_values) {
        let path = product_path(product);
        let url = site.url_for(&path);
        let mut context = base_context(
            site,
            &site_value,
            today,
            &path,
            &[
                home.clone(),
                products_crumb.clone(),
                (product.meta.title.clone(), url.clone()),
            ],
            &jsonld::product(site, product, &url),
        );
        context.insert("product", value);
        jobs.push(PageJob {
            output_path: path,
            template: PRODUCT_TEMPLATE,
            context,
        });
    }

    // Blog index and posts
    let urls: Vec<String> = articles
        .iter()
        .map(|a| site.url_for(&post_path(&a.post)))
        .collect();
    let mut context = base_context(
        site,
        &site_value,
        today,
        "blog/",
        &[home.clone(), blog_crumb.clone()],
        &jsonld::item_list("Blog", &site.url_for("blog/"), &urls),
    );
    context.insert("posts", &post_values);
    jobs.push(PageJob {
        output_path: "blog/index.html".to_string(),
        template: BLOG_INDEX_TEMPLATE,
        context,
    });

    for (article, value) in articles.iter().zip(&post_values) {
        let path = post_path(&article.post);
        let url = site.url_for(&path);
        let mut context = base_context(
            site,
            &site_value,
            today,
            &path,
            &[
                home.clone(),
                blog_crumb.clone(),
                (article.post.meta.title.clone(), url.clone()),
            ],
            &jsonld::blog_posting(site, &article.post, &url, &article.description),
        );
        context.insert("post", value);
        jobs.push(PageJob {
            output_path: path,
            template: POST_TEMPLATE,
            context,
        });
    }

    Ok(jobs)
}

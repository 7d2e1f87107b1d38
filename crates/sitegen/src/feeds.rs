// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! `sitemap.xml` and `rss.xml`.
//!
//! Both documents are built with maud, which escapes every interpolated value,
//! so record text can carry `&`, `<` or quotes safely.

use crate::config::SiteConfig;
use crate::pages::{Article, post_path, product_path};
use crate::records::{DATE_FORMAT, Product};
use chrono::NaiveDate;
use maud::{Markup, PreEscaped, html};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const VERSION: &str = env!("CARGO_PKG_VERSION");

struct SitemapEntry {
    loc: String,
    lastmod: String,
    changefreq: &'static str,
    priority: &'static str,
}

fn day(date: Option<NaiveDate>, today: NaiveDate) -> String {
    date.unwrap_or(today).format(DATE_FORMAT).to_string()
}

/// One `<url>` per generated page.
#[must_use]
pub fn sitemap(
    site: &SiteConfig,
    products: &[Product],
    articles: &[Article],
    today: NaiveDate,
) -> String {
    let index = |path: &str, priority| SitemapEntry {
        loc: site.url_for(path),
        lastmod: day(None, today),
        changefreq: "daily",
        priority,
    };

    let mut entries = vec![index("", "1.0"), index("products/", "0.9"), index("blog/", "0.9")];
    entries.extend(products.iter().map(|p| SitemapEntry {
        loc: site.url_for(&product_path(p)),
        lastmod: day(p.meta.publish_date, today),
        changefreq: "weekly",
        priority: "0.8",
    }));
    entries.extend(articles.iter().map(|a| SitemapEntry {
        loc: site.url_for(&post_path(&a.post)),
        lastmod: day(a.post.meta.publish_date, today),
        changefreq: "monthly",
        priority: "0.7",
    }));

    let markup = html! {
        (PreEscaped(XML_DECLARATION))
        urlset xmlns=(SITEMAP_NS) {
            @for entry in &entries {
                url {
                    loc { (entry.loc) }
                    lastmod { (entry.lastmod) }
                    changefreq { (entry.changefreq) }
                    priority { (entry.priority) }
                }
            }
        }
    };
    markup.into_string()
}

/// RFC 2822 timestamp at midnight UTC.
fn pub_date(date: NaiveDate) -> Option<String> {
    date.and_hms_opt(0, 0, 0).map(|t| t.and_utc().to_rfc2822())
}

struct FeedItem<'a> {
    title: &'a str,
    link: String,
    description: &'a str,
    categories: &'a [String],
    pub_date: Option<String>,
}

fn item(entry: &FeedItem<'_>) -> Markup {
    html! {
        item {
            title { (entry.title) }
            link { (entry.link) }
            guid isPermaLink="true" { (entry.link) }
            @if !entry.description.is_empty() {
                description { (entry.description) }
            }
            @for category in entry.categories {
                category { (category) }
            }
            @if let Some(date) = &entry.pub_date {
                pubDate { (date) }
            }
        }
    }
}

/// RSS 2.0 feed: every visible post, then every visible product.
#[must_use]
pub fn rss(site: &SiteConfig, products: &[Product], articles: &[Article]) -> String {
    let mut items: Vec<FeedItem<'_>> = articles
        .iter()
        .map(|a| FeedItem {
            title: &a.post.meta.title,
            link: site.url_for(&post_path(&a.post)),
            description: &a.description,
            categories: &a.post.tags,
            pub_date: a.post.meta.publish_date.and_then(pub_date),
        })
        .collect();
    items.extend(products.iter().map(|p| FeedItem {
        title: &p.meta.title,
        link: site.url_for(&product_path(p)),
        description: p.description.as_deref().unwrap_or_default(),
        categories: &p.tags,
        pub_date: p.meta.publish_date.and_then(pub_date),
    }));

    let markup = html! {
        (PreEscaped(XML_DECLARATION))
        rss version="2.0" {
            channel {
                title { (site.title) }
                link { (site.url_for("")) }
                description { (site.description) }
                language { (site.language) }
                generator { "shopgen " (VERSION) }
                @for entry in &items {
                    (item(entry))
                }
            }
        }
    };
    markup.into_string()
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Promotional copy for social media, printed for a human to paste.

use crate::config::SiteConfig;
use crate::pages::{Article, post_path, product_path};
use crate::records::Product;

/// Records of each kind included by default.
pub const DEFAULT_LIMIT: usize = 3;

const SEPARATOR_WIDTH: usize = 50;

/// `#tag` per tag, inner whitespace removed.
#[must_use]
pub fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.split_whitespace().collect::<String>())
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

fn block(out: &mut String, lines: &[String]) {
    let body: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.is_empty())
        .collect();
    out.push_str(&format!("{}\n\n", body.join("\n\n")));
    out.push_str(&format!("{}\n\n", "-".repeat(SEPARATOR_WIDTH)));
}

/// Copy for the first `limit` products and posts, in the order given.
///
/// Callers pass visible records only.
#[must_use]
pub fn social_copy(
    site: &SiteConfig,
    products: &[Product],
    articles: &[Article],
    limit: usize,
) -> String {
    let mut out = String::from("=== SOCIAL MEDIA COPY ===\n\n--- PRODUCT PROMOTIONS ---\n\n");

    for product in products.iter().take(limit) {
        let headline = match &product.price {
            Some(price) => format!(
                "🚀 NEW: {} - {}{}",
                product.meta.title, site.currency_symbol, price
            ),
            None => format!("🚀 NEW: {}", product.meta.title),
        };
        let link = product
            .external_url
            .clone()
            .unwrap_or_else(|| site.url_for(&product_path(product)));
        block(
            &mut out,
            &[
                headline,
                product.description.clone().unwrap_or_default(),
                format!("👉 Get it here: {}", link),
                hashtags(&product.tags),
            ],
        );
    }

    out.push_str("--- BLOG CONTENT ---\n\n");
    for article in articles.iter().take(limit) {
        let post = &article.post;
        block(
            &mut out,
            &[
                format!("📖 NEW POST: {}", post.meta.title),
                article.description.clone(),
                format!("👉 Read more: {}", site.url_for(&post_path(post))),
                hashtags(&post.tags),
            ],
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Post, RecordMeta, Status, slugify};
    use std::collections::BTreeMap;
    use std::path::Path;

    fn site() -> SiteConfig {
        SiteConfig::from_yaml_str("title: Desk Goods\nbase_url: https://shop.example/\n")
            .expect("site")
    }

    fn meta(id: &str, title: &str) -> RecordMeta {
        RecordMeta {
            row: 1,
            id: id.to_string(),
            title: title.to_string(),
            slug: slugify(title),
            status: Status::Published,
            publish_date: None,
        }
    }

    fn product(id: &str, title: &str, price: Option<&str>) -> Product {
        Product {
            meta: meta(id, title),
            description: Some("Holds pens.".to_string()),
            price: price.map(str::to_string),
            external_url: Some("https://buy.example/tray".to_string()),
            image: None,
            tags: vec!["desk setup".to_string(), "walnut".to_string()],
            fields: BTreeMap::new(),
        }
    }

    fn article(id: &str, title: &str) -> Article {
        let post = Post {
            meta: meta(id, title),
            excerpt: Some("Why trays matter.".to_string()),
            content: None,
            content_file: None,
            tags: vec![],
            fields: BTreeMap::new(),
        };
        Article::load(post, Path::new("/nonexistent")).expect("article")
    }

    #[test]
    fn test_hashtags() {
        let tags = vec!["desk setup".to_string(), " ".to_string(), "wood".to_string()];
        assert_eq!(hashtags(&tags), "#desksetup #wood");
        assert_eq!(hashtags(&[]), "");
    }

    #[test]
    fn test_product_and_post_blocks() {
        let text = social_copy(
            &site(),
            &[product("p1", "Walnut Tray", Some("24"))],
            &[article("b1", "Tray Talk")],
            DEFAULT_LIMIT,
        );
        let separator = "-".repeat(50);
        let expected = format!(
            "=== SOCIAL MEDIA COPY ===\n\n--- PRODUCT PROMOTIONS ---\n\n\
             🚀 NEW: Walnut Tray - $24\n\nHolds pens.\n\n👉 Get it here: https://buy.example/tray\n\n#desksetup #walnut\n\n\
             {sep}\n\n\
             --- BLOG CONTENT ---\n\n\
             📖 NEW POST: Tray Talk\n\nWhy trays matter.\n\n👉 Read more: https://shop.example/blog/tray-talk.html\n\n\
             {sep}\n\n",
            sep = separator
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_limit_and_missing_price() {
        let products = vec![
            product("p1", "One", None),
            product("p2", "Two", Some("2")),
        ];
        let text = social_copy(&site(), &products, &[], 1);
        assert!(text.contains("🚀 NEW: One\n"));
        assert!(!text.contains("Two"));
    }
}

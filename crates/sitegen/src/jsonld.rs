// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! schema.org structured data embedded in pages as JSON-LD.

use crate::config::SiteConfig;
use crate::records::{DATE_FORMAT, Post, Product};
use serde_json::{Value, json};

const CONTEXT: &str = "https://schema.org";

/// `WebSite` block for the home page.
#[must_use]
pub fn website(site: &SiteConfig) -> Value {
    let mut value = json!({
        "@context": CONTEXT,
        "@type": "WebSite",
        "name": site.title,
        "url": site.url_for(""),
    });
    insert_nonempty(&mut value, "description", &site.description);
    insert_nonempty(&mut value, "inLanguage", &site.language);

    let same_as: Vec<&String> = site.social.values().collect();
    if !same_as.is_empty() {
        value["publisher"] = json!({
            "@type": "Organization",
            "name": site.title,
            "sameAs": same_as,
        });
    }
    value
}

/// `Product` block for a product page.
///
/// `offers` is present only when the row has a price.
#[must_use]
pub fn product(site: &SiteConfig, product: &Product, page_url: &str) -> Value {
    let mut value = json!({
        "@context": CONTEXT,
        "@type": "Product",
        "name": product.meta.title,
        "sku": product.meta.id,
        "url": page_url,
    });
    if let Some(description) = &product.description {
        insert_nonempty(&mut value, "description", description);
    }
    if let Some(image) = &product.image {
        value["image"] = Value::String(resolve_url(site, image));
    }
    if let Some(price) = &product.price {
        let mut offer = json!({
            "@type": "Offer",
            "price": price,
            "priceCurrency": site.currency,
            "availability": "https://schema.org/InStock",
        });
        if let Some(link) = &product.external_url {
            offer["url"] = Value::String(link.clone());
        }
        value["offers"] = offer;
    }
    value
}

/// `BlogPosting` block for a post page.
#[must_use]
pub fn blog_posting(site: &SiteConfig, post: &Post, page_url: &str, description: &str) -> Value {
    let mut value = json!({
        "@context": CONTEXT,
        "@type": "BlogPosting",
        "headline": post.meta.title,
        "url": page_url,
        "mainEntityOfPage": page_url,
        "publisher": {
            "@type": "Organization",
            "name": site.title,
            "url": site.url_for(""),
        },
    });
    insert_nonempty(&mut value, "description", description);
    if let Some(date) = post.meta.publish_date {
        value["datePublished"] = Value::String(date.format(DATE_FORMAT).to_string());
    }
    if !site.author.trim().is_empty() {
        value["author"] = json!({ "@type": "Person", "name": site.author });
    }
    if !post.tags.is_empty() {
        value["keywords"] = Value::String(post.tags.join(", "));
    }
    value
}

/// `ItemList` block for an index page, one `ListItem` per linked page.
#[must_use]
pub fn item_list(name: &str, page_url: &str, urls: &[String]) -> Value {
    let elements: Vec<Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| json!({ "@type": "ListItem", "position": i + 1, "url": url }))
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "ItemList",
        "name": name,
        "url": page_url,
        "numberOfItems": urls.len(),
        "itemListElement": elements,
    })
}

/// Serialize into a `<script type="application/ld+json">` element.
///
/// `</` is written as `<\/` so record text can never close the script early.
#[must_use]
pub fn script_tag(value: &Value) -> String {
    let json = value.to_string().replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">{}</script>", json)
}

/// Absolute URLs pass through; anything else is taken as site-relative.
#[must_use]
pub fn resolve_url(site: &SiteConfig, reference: &str) -> String {
    let absolute = ["http://", "https://", "//"];
    if absolute.iter().any(|prefix| reference.starts_with(prefix)) {
        reference.to_string()
    } else {
        site.url_for(reference)
    }
}

fn insert_nonempty(value: &mut Value, key: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    if let Value::Object(map) = value {
        map.insert(key.to_string(), Value::String(text.to_string()));
    }
}

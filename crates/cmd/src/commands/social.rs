// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use sitegen::{SiteBuilder, social_copy};

use crate::common::SiteContext;

/// Print promotional copy for the first `limit` visible products and posts.
pub fn social_command<F>(context: &SiteContext, limit: usize, mut handler: F) -> Result<()>
where
    F: FnMut(String),
{
    // Nothing is written, so the output directory is never used.
    let builder = SiteBuilder::new(context.build_paths(PathBuf::new()), context.window());
    let data = builder.load().context("Failed to load site data")?;

    let products = data.products.len().min(limit);
    let posts = data.articles.len().min(limit);
    diagnostics::log_debug!("Social copy for {products} products and {posts} posts", products: products, posts: posts);

    handler(social_copy(&data.site, &data.products, &data.articles, limit));
    Ok(())
}

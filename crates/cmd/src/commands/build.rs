// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::{Context, Result};
use sitegen::{BuildReport, SiteBuilder};

use crate::common::SiteContext;

/// Generate the site into `output_dir`.
///
/// The summary line goes to `handler`.
pub fn build_command<F>(context: &SiteContext, output_dir: PathBuf, mut handler: F) -> Result<BuildReport>
where
    F: FnMut(String),
{
    let display = output_dir.display().to_string();
    let window = context.window();
    let target = display.clone();
    let today = window.today.to_string();
    diagnostics::log_info!("Building site into {target} for {today}", target: target, today: today);

    let builder = SiteBuilder::new(context.build_paths(output_dir), window);
    let report = builder
        .build()
        .with_context(|| format!("Failed to build site into {}", display))?;

    handler(format!(
        "Built {} pages ({} products, {} posts; {} hidden) and {} assets into {}",
        report.pages,
        report.products,
        report.posts,
        report.hidden_products + report.hidden_posts,
        report.assets,
        report.output_dir.display()
    ));
    Ok(report)
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use sitegen::{BuildPaths, PublishWindow};

/// Input locations and the build day, shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct SiteContext {
    /// Directory holding site.yml, products.csv and posts.csv
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Template directory
    #[arg(long, global = true, default_value = "site/templates")]
    pub templates: PathBuf,

    /// Static assets copied to <output>/assets
    #[arg(long, global = true, default_value = "site/assets")]
    pub assets: PathBuf,

    /// Build as if today were this date (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,
}

impl Default for SiteContext {
    fn default() -> Self {
        let paths = BuildPaths::default();
        Self {
            data_dir: paths.data_dir,
            templates: paths.template_dir,
            assets: paths.assets_dir,
            today: None,
        }
    }
}

impl SiteContext {
    /// Paths for a build writing into `output_dir`.
    #[must_use]
    pub fn build_paths(&self, output_dir: PathBuf) -> BuildPaths {
        BuildPaths {
            data_dir: self.data_dir.clone(),
            template_dir: self.templates.clone(),
            assets_dir: self.assets.clone(),
            output_dir,
        }
    }

    #[must_use]
    pub fn window(&self) -> PublishWindow {
        match self.today {
            Some(day) => PublishWindow::new(day),
            None => PublishWindow::today(),
        }
    }
}

/// Parse a `YYYY-MM-DD` command line date.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), Ok(NaiveDate::from_ymd_opt(2024, 2, 29).expect("date")));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn test_fixed_day_window() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).expect("date");
        let context = SiteContext {
            today: Some(day),
            ..SiteContext::default()
        };
        assert_eq!(context.window().today, day);
        let paths = context.build_paths(PathBuf::from("out"));
        assert_eq!(paths.data_dir, PathBuf::from("data"));
        assert_eq!(paths.output_dir, PathBuf::from("out"));
    }
}

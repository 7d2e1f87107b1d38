// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The build pipeline.
//!
//! ```text
//! site.yml ──► SiteConfig ─┐
//! products.csv ─► filter ──┼─► plan_pages ─► render ─┐
//! posts.csv ────► filter ──┘   sitemap, rss ─────────┼─► staging dir ─► output dir
//! assets/ ───────────────────────────────────────────┘
//! ```
//!
//! Everything is written to a staging directory beside the output directory.
//! The output directory is only replaced once every page, feed and asset has
//! been written, so a failed build leaves the previous site in place.

use crate::assets::copy_assets;
use crate::config::{BuildPaths, SiteConfig};
use crate::error::{Error, Result};
use crate::feeds;
use crate::pages::{Article, plan_pages};
use crate::publish::PublishWindow;
use crate::records::{Post, Product};
use crate::render::TemplateEngine;
use crate::table::{check_unique_slugs, load_table};
use diagnostics::*;
use std::path::{Path, PathBuf};

const STAGING_PREFIX: &str = ".shopgen-staging-";
const RETIRED_PREFIX: &str = ".shopgen-retired-";

/// Configuration and visible records for one build.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub site: SiteConfig,
    pub products: Vec<Product>,
    pub articles: Vec<Article>,
    pub hidden_products: usize,
    pub hidden_posts: usize,
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub products: usize,
    pub posts: usize,
    pub hidden_products: usize,
    pub hidden_posts: usize,
    /// HTML pages written
    pub pages: usize,
    /// Asset files copied
    pub assets: usize,
    pub output_dir: PathBuf,
}

pub struct SiteBuilder {
    paths: BuildPaths,
    window: PublishWindow,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(paths: BuildPaths, window: PublishWindow) -> Self {
        Self { paths, window }
    }

    #[must_use]
    pub fn paths(&self) -> &BuildPaths {
        &self.paths
    }

    /// Load the configuration and both tables, keeping visible records.
    pub fn load(&self) -> Result<SiteData> {
        let site = SiteConfig::load(&self.paths.site_config())?;

        let products_csv = self.paths.products_csv();
        let products: Vec<Product> = load_table(&products_csv)?;
        let (products, hidden_products) = self.window.filter(products);
        check_unique_slugs(&products_csv, &products)?;

        let posts_csv = self.paths.posts_csv();
        let posts: Vec<Post> = load_table(&posts_csv)?;
        let (posts, hidden_posts) = self.window.filter(posts);
        check_unique_slugs(&posts_csv, &posts)?;
        let articles = posts
            .into_iter()
            .map(|post| Article::load(post, &self.paths.data_dir))
            .collect::<Result<Vec<_>>>()?;

        Ok(SiteData {
            site,
            products,
            articles,
            hidden_products,
            hidden_posts,
        })
    }

    /// Generate the whole site and swap it into the output directory.
    pub fn build(&self) -> Result<BuildReport> {
        let output_dir = std::path::absolute(&self.paths.output_dir)
            .map_err(|e| Error::io(&self.paths.output_dir, e))?;
        self.check_output_dir(&output_dir)?;

        let data = self.load()?;
        let engine = TemplateEngine::load(&self.paths.template_dir, &data.site)?;
        engine.check()?;

        let parent = output_parent(&output_dir)?;
        std::fs::create_dir_all(&parent).map_err(|e| Error::io(&parent, e))?;
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| Error::io(&parent, e))?;

        let (pages, assets) = self.write_site(&data, &engine, staging.path())?;
        replace_dir(staging.path(), &output_dir, &parent)?;

        let report = BuildReport {
            products: data.products.len(),
            posts: data.articles.len(),
            hidden_products: data.hidden_products,
            hidden_posts: data.hidden_posts,
            pages,
            assets,
            output_dir,
        };

        let products = report.products;
        let posts = report.posts;
        let hidden = report.hidden_products + report.hidden_posts;
        let dir = report.output_dir.display().to_string();
        info!(
            "Built {pages} pages ({products} products, {posts} posts, {hidden} hidden), {assets} assets into {dir}",
            pages: pages,
            products: products,
            posts: posts,
            hidden: hidden,
            assets: assets,
            dir: dir
        );

        Ok(report)
    }

    /// Pages, feeds and assets into `root`. Returns (pages, assets).
    fn write_site(
        &self,
        data: &SiteData,
        engine: &TemplateEngine,
        root: &Path,
    ) -> Result<(usize, usize)> {
        let jobs = plan_pages(&data.site, &data.products, &data.articles, self.window.today)?;
        for job in &jobs {
            let html = engine.render(job)?;
            write_file(root, &job.output_path, &html)?;
            let page = job.output_path.clone();
            debug!("Rendered {page}", page: page);
        }

        let sitemap = feeds::sitemap(
            &data.site,
            &data.products,
            &data.articles,
            self.window.today,
        );
        write_file(root, "sitemap.xml", &sitemap)?;
        write_file(
            root,
            "rss.xml",
            &feeds::rss(&data.site, &data.products, &data.articles),
        )?;

        let assets = copy_assets(&self.paths.assets_dir, &data.site.assets, &root.join("assets"))?;
        Ok((jobs.len(), assets))
    }

    /// The output directory is deleted on every build, so it must not be (or
    /// contain) any input directory. It must not sit inside one either: the
    /// staging directory would then be read back as templates or assets.
    fn check_output_dir(&self, output_dir: &Path) -> Result<()> {
        let inputs = [
            &self.paths.data_dir,
            &self.paths.template_dir,
            &self.paths.assets_dir,
        ];
        for input in inputs {
            let input = std::path::absolute(input).map_err(|e| Error::io(input, e))?;
            if input.starts_with(output_dir) {
                return Err(Error::OutputDir {
                    path: output_dir.to_path_buf(),
                    message: format!("would overwrite input directory {}", input.display()),
                });
            }
            if output_dir.starts_with(&input) {
                return Err(Error::OutputDir {
                    path: output_dir.to_path_buf(),
                    message: format!("is inside input directory {}", input.display()),
                });
            }
        }
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(Error::OutputDir {
                path: output_dir.to_path_buf(),
                message: "exists and is not a directory".to_string(),
            });
        }
        Ok(())
    }
}

fn output_parent(output_dir: &Path) -> Result<PathBuf> {
    output_dir
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::OutputDir {
            path: output_dir.to_path_buf(),
            message: "has no parent directory".to_string(),
        })
}

fn write_file(root: &Path, relpath: &str, contents: &str) -> Result<()> {
    let path = root.join(relpath);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(&path, contents).map_err(|e| Error::io(&path, e))
}

/// Move `staged` to `output_dir`. An existing output directory is first moved
/// aside, and moved back if the swap fails.
fn replace_dir(staged: &Path, output_dir: &Path, parent: &Path) -> Result<()> {
    if !output_dir.exists() {
        return std::fs::rename(staged, output_dir).map_err(|e| Error::io(output_dir, e));
    }

    let retired = tempfile::Builder::new()
        .prefix(RETIRED_PREFIX)
        .tempdir_in(parent)
        .map_err(|e| Error::io(parent, e))?;
    let old = retired.path().join("site");

    std::fs::rename(output_dir, &old).map_err(|e| Error::io(output_dir, e))?;
    if let Err(e) = std::fs::rename(staged, output_dir) {
        std::fs::rename(&old, output_dir).map_err(|e| Error::io(output_dir, e))?;
        return Err(Error::io(output_dir, e));
    }
    // Dropping `retired` deletes the previous site.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_dir_swaps_contents() {
        let root = tempfile::tempdir().expect("tempdir");
        let output = root.path().join("_site");
        std::fs::create_dir_all(&output).expect("mkdir");
        std::fs::write(output.join("stale.html"), "old").expect("write");

        let staged = root.path().join("staged");
        std::fs::create_dir_all(&staged).expect("mkdir");
        std::fs::write(staged.join("index.html"), "new").expect("write");

        replace_dir(&staged, &output, root.path()).expect("replace");
        assert!(!staged.exists());
        assert!(!output.join("stale.html").exists());
        assert_eq!(
            std::fs::read_to_string(output.join("index.html")).expect("read"),
            "new"
        );
        let leftovers: Vec<_> = std::fs::read_dir(root.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["_site".to_string()]);
    }

    #[test]
    fn test_output_may_not_contain_inputs() {
        let root = tempfile::tempdir().expect("tempdir");
        let paths = BuildPaths {
            data_dir: root.path().join("site/data"),
            template_dir: root.path().join("templates"),
            assets_dir: root.path().join("assets"),
            output_dir: root.path().join("site"),
        };
        let builder = SiteBuilder::new(paths, PublishWindow::today());
        let err = builder.build().expect_err("output contains data dir");
        assert!(matches!(err, Error::OutputDir { .. }));
    }

    #[test]
    fn test_output_may_not_be_inside_inputs() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join("assets/css")).expect("mkdir");
        std::fs::write(root.path().join("assets/css/site.css"), "body {}").expect("write");

        let paths = BuildPaths {
            data_dir: root.path().join("data"),
            template_dir: root.path().join("templates"),
            assets_dir: root.path().join("assets"),
            output_dir: root.path().join("assets/_site"),
        };
        let builder = SiteBuilder::new(paths, PublishWindow::today());
        for _ in 0..2 {
            let err = builder.build().expect_err("output inside assets dir");
            assert!(
                matches!(err, Error::OutputDir { ref message, .. } if message.starts_with("is inside"))
            );
        }

        let entries: Vec<_> = std::fs::read_dir(root.path().join("assets"))
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["css".to_string()]);
    }

    #[test]
    fn test_write_file_creates_parents() {
        let root = tempfile::tempdir().expect("tempdir");
        write_file(root.path(), "blog/hello.html", "hi").expect("write");
        assert_eq!(
            std::fs::read_to_string(root.path().join("blog/hello.html")).expect("read"),
            "hi"
        );
    }
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end builds against a small shop on disk.

use chrono::NaiveDate;
use sitegen::{BuildPaths, Error, PublishWindow, SiteBuilder, social_copy};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SITE_YML: &str = r#"title: Desk Goods
base_url: "{{ env(name='SHOPGEN_TEST_UNSET_BASE_URL', default='https://shop.example') }}"
description: Small things for tidy desks
author: Sam
featured_products: 2
recent_posts: 1
"#;

const PRODUCTS_CSV: &str = "\
id,title,status,publish_date,price,description,tags,image,external_url
p1,Walnut Tray,published,2024-01-10,24.00,Solid walnut,\"desk, wood\",img/tray.jpg,https://buy.example/tray
p2,Brass Clip,draft,,3,Shiny,,,
p3,Desk Lamp,published,2024-03-01,40,Bright,,,
p4,Pen Cup,published,,8,Holds pens,,,
";

const POSTS_CSV: &str = "\
id,title,status,publish_date,excerpt,content,content_file,tags
b1,Hello World,published,2024-01-05,First post,Hello **there**,,news
b2,Coming Soon,published,2024-12-01,,Later,,
b3,From File,published,,,,posts/from-file.md,
";

const TEMPLATES: [(&str, &str); 5] = [
    (
        "index.html",
        "<h1>{{ title }}</h1>{% for p in featured_products %}<a href=\"{{ p.url }}\">{{ p.title }}</a>{% endfor %}{% for p in recent_posts %}<a href=\"{{ p.url }}\">{{ p.title }}</a>{% endfor %}{{ json_ld | safe }}",
    ),
    (
        "products_index.html",
        "{% for p in products %}<li>{{ p.title }} {{ p.price_display }}</li>{% endfor %}",
    ),
    (
        "product.html",
        "<h1>{{ product.title }}</h1><p>{{ product.price_display }}</p><img src=\"{{ product.image_url }}\"><link href=\"{{ asset(path='css/site.css') }}\">{{ json_ld | safe }}",
    ),
    (
        "blog_index.html",
        "{% for p in posts %}<li>{{ p.title }}</li>{% endfor %}",
    ),
    (
        "post.html",
        "<h1>{{ post.title }}</h1>{{ post.content_html | safe }}<p>{{ build_date }}</p>",
    ),
];

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let fixture = Self { dir };
        fixture.write("data/site.yml", SITE_YML);
        fixture.write("data/products.csv", PRODUCTS_CSV);
        fixture.write("data/posts.csv", POSTS_CSV);
        fixture.write("data/posts/from-file.md", "# From a file\n\nBody text.\n");
        for (name, body) in TEMPLATES {
            fixture.write(&format!("site/templates/{}", name), body);
        }
        fixture.write("site/assets/css/site.css", "body { margin: 0 }");
        fixture
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relpath: &str, content: &str) {
        let path = self.root().join(relpath);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write fixture");
    }

    fn output(&self) -> PathBuf {
        self.root().join("_site")
    }

    fn builder(&self, today: NaiveDate) -> SiteBuilder {
        let paths = BuildPaths {
            data_dir: self.root().join("data"),
            template_dir: self.root().join("site/templates"),
            assets_dir: self.root().join("site/assets"),
            output_dir: self.output(),
        };
        SiteBuilder::new(paths, PublishWindow::new(today))
    }

    fn read(&self, relpath: &str) -> String {
        std::fs::read_to_string(self.output().join(relpath)).expect("read output")
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Every file under `dir` with its bytes.
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let rel = path.strip_prefix(root).expect("relative").to_path_buf();
                files.insert(rel, std::fs::read(&path).expect("read"));
            }
        }
    }
    let mut files = BTreeMap::new();
    walk(dir, dir, &mut files);
    files
}

#[test]
fn test_only_visible_records_are_published() {
    let fixture = Fixture::new();
    let report = fixture.builder(day(2024, 2, 1)).build().expect("build");

    assert_eq!(report.products, 2);
    assert_eq!(report.posts, 2);
    assert_eq!(report.hidden_products, 2);
    assert_eq!(report.hidden_posts, 1);
    assert_eq!(report.pages, 7);
    assert_eq!(report.assets, 1);

    let out = fixture.output();
    assert!(out.join("products/walnut-tray.html").is_file());
    assert!(out.join("products/pen-cup.html").is_file());
    assert!(!out.join("products/brass-clip.html").exists());
    assert!(!out.join("products/desk-lamp.html").exists());
    assert!(out.join("blog/hello-world.html").is_file());
    assert!(out.join("blog/from-file.html").is_file());
    assert!(!out.join("blog/coming-soon.html").exists());
    assert!(out.join("assets/css/site.css").is_file());

    for page in ["index.html", "products/index.html", "sitemap.xml", "rss.xml"] {
        let text = fixture.read(page);
        assert!(!text.contains("Brass Clip"), "{page} leaks a draft");
        assert!(!text.contains("Desk Lamp"), "{page} leaks a scheduled product");
        assert!(!text.contains("Coming Soon"), "{page} leaks a scheduled post");
    }
}

#[test]
fn test_scheduled_record_appears_on_its_day() {
    let fixture = Fixture::new();
    let report = fixture.builder(day(2024, 3, 1)).build().expect("build");
    assert_eq!(report.products, 3);
    assert!(fixture.output().join("products/desk-lamp.html").is_file());
    assert!(fixture.read("products/index.html").contains("Desk Lamp $40"));
}

#[test]
fn test_page_contents() {
    let fixture = Fixture::new();
    fixture.builder(day(2024, 2, 1)).build().expect("build");

    let home = fixture.read("index.html");
    assert!(home.starts_with("<h1>Desk Goods</h1>"));
    assert!(home.contains("<a href=\"https://shop.example/products/walnut-tray.html\">Walnut Tray</a>"));
    assert!(home.contains("<a href=\"https://shop.example/blog/hello-world.html\">Hello World</a>"));
    assert!(!home.contains("From File"), "recent_posts is limited to 1");
    assert!(home.contains("\"@type\":\"WebSite\""));

    let product = fixture.read("products/walnut-tray.html");
    assert!(product.contains("<p>$24.00</p>"));
    assert!(product.contains("src=\"https://shop.example/img/tray.jpg\""));
    assert!(product.contains("href=\"https://shop.example/assets/css/site.css\""));
    assert!(product.contains("\"@type\":\"Product\""));
    assert!(product.contains("\"price\":\"24.00\""));

    let inline = fixture.read("blog/hello-world.html");
    assert!(inline.contains("<p>Hello <strong>there</strong></p>"));
    assert!(inline.contains("<p>2024-02-01</p>"));

    let from_file = fixture.read("blog/from-file.html");
    assert!(from_file.contains("<h1>From a file</h1>"));
}

#[test]
fn test_feeds_have_one_entry_per_visible_record() {
    let fixture = Fixture::new();
    fixture.builder(day(2024, 2, 1)).build().expect("build");

    let sitemap = fixture.read("sitemap.xml");
    assert_eq!(sitemap.matches("<url>").count(), 3 + 2 + 2);
    assert!(sitemap.contains("<lastmod>2024-01-10</lastmod>"));

    let rss = fixture.read("rss.xml");
    assert_eq!(rss.matches("<item>").count(), 4);
    assert!(rss.contains("<category>wood</category>"));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let fixture = Fixture::new();
    let builder = fixture.builder(day(2024, 2, 1));
    builder.build().expect("first build");
    let first = snapshot(&fixture.output());
    builder.build().expect("second build");
    let second = snapshot(&fixture.output());
    assert_eq!(first, second);
}

#[test]
fn test_template_error_keeps_previous_output() {
    let fixture = Fixture::new();
    let builder = fixture.builder(day(2024, 2, 1));
    builder.build().expect("first build");
    let before = snapshot(&fixture.output());

    fixture.write("site/templates/product.html", "{{ product.no_such_column }}");
    let err = builder.build().expect_err("undefined field");
    assert!(matches!(err, Error::Template { ref name, .. } if name == "product.html"));

    assert_eq!(snapshot(&fixture.output()), before);
    let leftovers: Vec<String> = std::fs::read_dir(fixture.root())
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".shopgen-"))
        .collect();
    assert!(leftovers.is_empty(), "staging left behind: {leftovers:?}");
}

#[test]
fn test_missing_required_field_fails_build() {
    let fixture = Fixture::new();
    fixture.write(
        "data/products.csv",
        "id,title,status\np1,Walnut Tray,published\np2,,published\n",
    );
    let err = fixture
        .builder(day(2024, 2, 1))
        .build()
        .expect_err("empty title");
    assert!(matches!(err, Error::MissingField { row: 2, ref column, .. } if column == "title"));
    assert!(!fixture.output().exists());
}

#[test]
fn test_hidden_record_may_share_a_title() {
    let fixture = Fixture::new();
    let products = format!("{}p5,Walnut Tray,draft,,30,Re-listing,,,\n", PRODUCTS_CSV);
    fixture.write("data/products.csv", &products);

    let report = fixture.builder(day(2024, 2, 1)).build().expect("build");
    assert_eq!(report.products, 2);
    assert_eq!(report.hidden_products, 3);
    assert!(fixture.read("products/walnut-tray.html").contains("$24.00"));
}

#[test]
fn test_visible_records_with_one_slug_fail_build() {
    let fixture = Fixture::new();
    let products = format!("{}p5,Walnut  Tray!,published,,30,Re-listing,,,\n", PRODUCTS_CSV);
    fixture.write("data/products.csv", &products);

    let err = fixture
        .builder(day(2024, 2, 1))
        .build()
        .expect_err("two pages at products/walnut-tray.html");
    assert!(matches!(err, Error::DuplicateSlug { row: 5, ref slug, .. } if slug == "walnut-tray"));
    assert!(!fixture.output().exists());
}

#[test]
fn test_missing_template_fails_before_writing() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.root().join("site/templates/blog_index.html")).expect("rm");
    let err = fixture
        .builder(day(2024, 2, 1))
        .build()
        .expect_err("missing template");
    assert!(matches!(err, Error::Template { ref name, .. } if name == "blog_index.html"));
    assert!(!fixture.output().exists());
}

#[test]
fn test_social_copy_uses_visible_records() {
    let fixture = Fixture::new();
    let data = fixture.builder(day(2024, 2, 1)).load().expect("load");
    let text = social_copy(&data.site, &data.products, &data.articles, 3);

    assert!(text.contains("🚀 NEW: Walnut Tray - $24.00"));
    assert!(text.contains("#desk #wood"));
    assert!(text.contains("👉 Read more: https://shop.example/blog/hello-world.html"));
    assert!(!text.contains("Desk Lamp"));
    assert!(!text.contains("Coming Soon"));
}

// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Markdown rendering for post bodies.
//!
//! Uses pulldown-cmark with GFM extensions (tables, strikethrough, task
//! lists, footnotes). Raw HTML passes through unchanged per CommonMark.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html::push_html};

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
}

/// Render markdown to HTML.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, options());
    let mut html = String::with_capacity(content.len() * 2);
    push_html(&mut html, parser);
    html
}

/// Plain text of the first paragraph, cut at a word boundary to at most
/// `max_chars` characters (an ellipsis is appended when cut).
///
/// Used as a description when a post has no excerpt.
#[must_use]
pub fn summary(content: &str, max_chars: usize) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new_ext(content, options()) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) if in_paragraph => break,
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

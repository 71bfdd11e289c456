// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result markup, escaped by construction.
//!
//! Every string in a search result came from a server we don't control, and
//! the panel is filled with `innerHTML`. A title of `<img src=x onerror=...>`
//! must show up as text, not run. Instead of remembering to escape at every
//! call site, markup lives in `Markup`, and the only ways to get remote text
//! into a `Markup` go through the escapers below:
//!
//! | Entry point          | What it does                                    |
//! |----------------------|-------------------------------------------------|
//! | `Markup::text`       | escapes `& < > " '`                             |
//! | `Element::attr`      | escapes the value, attribute names are static   |
//! | `Element::href`      | `sanitize_url`, then attribute escaping         |
//! | `Markup::trusted`    | `&'static str` only: literals in this file      |
//!
//! There is no `From<String> for Markup`. Code that wants one is about to
//! interpolate something unescaped.

use crate::types::{ResultItem, ResultSet, SearchOutcome};

/// Placeholder shown when a search matched nothing.
pub const NO_RESULTS_TEXT: &str = "No results found!";

/// Separator between breadcrumb entries (each entry is followed by it).
pub const CITATION_SEPARATOR: &str = " › ";

/// What newlines in a snippet turn into.
const SNIPPET_BREAK: &str = "&hellip; ";

/// HTML that is safe to hand to `innerHTML`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new() -> Self {
        Markup(String::new())
    }

    /// Escaped text node.
    pub fn text(text: &str) -> Self {
        Markup(escape_text(text))
    }

    /// Literal markup written in this crate.
    fn trusted(html: &'static str) -> Self {
        Markup(html.to_string())
    }

    pub fn push(&mut self, other: Markup) {
        self.0.push_str(&other.0);
    }

    pub fn push_text(&mut self, text: &str) {
        push_escaped(&mut self.0, text);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Markup> for Markup {
    fn from_iter<I: IntoIterator<Item = Markup>>(iter: I) -> Self {
        let mut out = Markup::new();
        for part in iter {
            out.push(part);
        }
        out
    }
}

/// Minimal element builder. Tag and attribute names are `'static` so they
/// can only come from this crate.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    body: Markup,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attrs: Vec::new(),
            body: Markup::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: &str) -> Self {
        self.attrs.push((name, escape_text(value)));
        self
    }

    pub fn href(self, url: &str) -> Self {
        let url = sanitize_url(url);
        self.attr("href", &url)
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.body.push(child);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.body.push_text(text);
        self
    }

    pub fn build(self) -> Markup {
        let mut out = String::with_capacity(self.body.0.len() + 32);
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.body.0);
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
        Markup(out)
    }
}

/// Escape text for use in element content or a quoted attribute value.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Make a remote URL safe for an `href`.
///
/// Strips the characters that can break out of an attribute (`>`, `"`, plus
/// `<`, `'`, backtick) and control characters. Script-bearing schemes are
/// replaced with `#`.
pub fn sanitize_url(url: &str) -> String {
    let cleaned: String = url
        .chars()
        .filter(|c| !matches!(c, '>' | '"' | '<' | '\'' | '`') && !c.is_control())
        .collect();

    let scheme: String = cleaned
        .chars()
        .filter(|c| !c.is_whitespace())
        .take_while(|c| *c != ':' && *c != '/' && *c != '?' && *c != '#')
        .collect::<String>()
        .to_ascii_lowercase();
    let has_scheme = cleaned
        .chars()
        .filter(|c| !c.is_whitespace())
        .nth(scheme.chars().count())
        == Some(':');

    if has_scheme && matches!(scheme.as_str(), "javascript" | "vbscript" | "data") {
        return "#".to_string();
    }
    cleaned
}

/// Snippet text with newlines rendered as an ellipsis separator.
fn snippet(content: &str) -> Markup {
    let mut out = Markup::new();
    for (i, line) in content.split('\n').enumerate() {
        if i > 0 {
            out.push(Markup::trusted(SNIPPET_BREAK));
        }
        out.push_text(line.strip_suffix('\r').unwrap_or(line));
    }
    out
}

fn citation(ancestors: &[String]) -> Markup {
    let mut out = Markup::new();
    for ancestor in ancestors {
        out.push_text(ancestor);
        out.push_text(CITATION_SEPARATOR);
    }
    Element::new("cite").child(out).build()
}

fn tag(item: &ResultItem) -> Option<Markup> {
    let label: Vec<&str> = [item.kind.as_deref(), item.version.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if label.is_empty() {
        return None;
    }
    Some(
        Element::new("small")
            .attr("class", "search-result-tag")
            .text(&label.join(" "))
            .build(),
    )
}

/// One result node.
///
/// ```html
/// <div class="search-result" role="option" data-index="0">
///   <a href="/a"><cite>Docs › </cite>Alpha</a>
///   <span>x&hellip; y</span>
/// </div>
/// ```
pub fn render_item(index: usize, item: &ResultItem) -> Markup {
    let link = Element::new("a")
        .href(&item.url)
        .child(citation(&item.ancestors))
        .text(&item.title)
        .build();

    let mut node = Element::new("div")
        .attr("class", "search-result")
        .attr("role", "option")
        .attr("data-index", &index.to_string())
        .child(link)
        .child(Element::new("span").child(snippet(&item.content)).build());

    if let Some(tag) = tag(item) {
        node = node.child(tag);
    }
    node.build()
}

pub fn render_results(results: &ResultSet) -> Markup {
    results
        .iter()
        .enumerate()
        .map(|(index, item)| render_item(index, item))
        .collect()
}

pub fn render_no_results() -> Markup {
    Element::new("div")
        .attr("class", "search-no-results")
        .text(NO_RESULTS_TEXT)
        .build()
}

pub fn render_outcome(outcome: &SearchOutcome) -> Markup {
    match outcome {
        SearchOutcome::Results(set) => render_results(set),
        SearchOutcome::NoResults => render_no_results(),
    }
}

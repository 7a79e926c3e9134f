//! Sanitizers for untrusted values scraped from third-party pages.
//!
//! Every title, description, URL and style value the renderer writes into a
//! card passes through one of these first. They are total: any input yields
//! usable output, never an error.
//!
//! - [`text`] drops markup. Tags are removed, the content of executable or
//!   embedding elements (`script`, `style`, `iframe`, ...) is removed with
//!   them, and entities are decoded. The result is plain text; escaping for
//!   output happens when the fragment is serialized.
//! - [`url`] trims the value and neutralizes every scheme except `http`,
//!   `https` and `mailto`, replacing the value with [`BLOCKED_URL`].
//!   Scheme-less (relative) references pass. Entities are left alone, so
//!   query strings such as `?a=1&copy=2` stay intact.
//! - [`style`] keeps only plain `property: value` declarations and drops any
//!   declaration that could load resources or run code.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

/// Replacement for URLs with a disallowed scheme.
pub const BLOCKED_URL: &str = "about:blank";

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Elements whose content is dropped entirely, not just unwrapped.
const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "svg", "math",
];

const FORBIDDEN_STYLE_FRAGMENTS: &[&str] = &[
    "url(",
    "expression(",
    "javascript:",
    "vbscript:",
    "@import",
    "behavior",
    "-moz-binding",
    "\\",
];

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z-]+)\s*:\s*(.+?)\s*$").expect("declaration pattern is valid")
});

/// Strip markup and return plain text.
pub fn text(input: &str) -> String {
    if !input.contains(['<', '&']) {
        return input.to_string();
    }
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    collect_text(fragment.root_element(), &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(el) = ElementRef::wrap(child) {
            if !DROPPED_ELEMENTS.contains(&el.value().name()) {
                collect_text(el, out);
            }
        }
    }
}

/// Trimmed URL with dangerous schemes replaced by [`BLOCKED_URL`].
pub fn url(input: &str) -> String {
    let trimmed = input.trim();
    match scheme(trimmed) {
        Some(scheme) if !ALLOWED_SCHEMES.contains(&scheme.as_str()) => BLOCKED_URL.to_string(),
        _ => trimmed.to_string(),
    }
}

/// Lowercased scheme of `value`, ignoring embedded whitespace and control
/// characters the way browsers do when they parse `java\tscript:`.
fn scheme(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let colon = compact.find(':')?;
    let candidate = &compact[..colon];
    if candidate.is_empty() || candidate.contains(['/', '?', '#']) {
        return None;
    }
    Some(candidate.to_ascii_lowercase())
}

/// Inline style reduced to safe `property: value` declarations.
pub fn style(input: &str) -> String {
    text(input)
        .split(';')
        .filter_map(|decl| {
            let caps = DECLARATION.captures(decl)?;
            let (property, value) = (&caps[1], &caps[2]);
            let lowered = value.to_ascii_lowercase();
            if FORBIDDEN_STYLE_FRAGMENTS.iter().any(|f| lowered.contains(f)) {
                return None;
            }
            Some(format!("{}: {}", property.to_ascii_lowercase(), value))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

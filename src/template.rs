//! Card templates and the detached fragments instantiated from them.
//!
//! A [`Template`] is parsed once and never mutated. [`Template::instantiate`]
//! hands out an independent deep copy (a [`Fragment`]) that the renderer fills
//! in and trims, so no two cards ever share state.
//!
//! Slots inside a fragment are addressed with a small selector subset:
//!
//! | Selector | Matches elements whose |
//! |----------|------------------------|
//! | `[attr="v"]` | `attr` equals `v` exactly |
//! | `[attr*="v"]` | `attr` contains `v` |
//! | `.name` | `class` list contains the token `name` |
//!
//! Lookups return the first match in document order. A selector outside this
//! subset matches nothing.
//!
//! Fragments serialize back to HTML with every text node and attribute value
//! escaped, so scraped text can never reopen markup.

use log::warn;
use maud::html;
use scraper::{ElementRef, Html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Cannot read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Name of the built-in card template.
pub const CARD_TEMPLATE: &str = "project-template";

/// A named, immutable card template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: Fragment,
}

impl Template {
    /// Parse `html` as template content.
    pub fn parse(name: &str, html: &str) -> Self {
        let parsed = Html::parse_fragment(html);
        Self {
            name: name.to_string(),
            content: Fragment {
                nodes: convert_children(parsed.root_element()),
            },
        }
    }

    /// Load a template from an HTML file; the file stem becomes its name.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let html = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| CARD_TEMPLATE.to_string());
        Ok(Self::parse(&name, &html))
    }

    /// The built-in project card.
    pub fn card() -> Self {
        let markup = html! {
            article.card {
                figure.card-media {
                    img.card-feature-image alt="" loading="lazy";
                }
                div.card-body {
                    h3.card-heading {}
                    p.card-description {}
                    a.card-link href="#" target="_blank" rel="noopener" { "View project" }
                }
                footer.card-footer {
                    span.card-language-colour {}
                    span.card-language {}
                    a.card-logo href="#" target="_blank" rel="noopener" {}
                }
            }
        };
        Self::parse(CARD_TEMPLATE, &markup.into_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A fresh, detached copy of the template content.
    pub fn instantiate(&self) -> Fragment {
        self.content.clone()
    }
}

fn convert_children(element: ElementRef<'_>) -> Vec<FragmentNode> {
    element
        .children()
        .filter_map(|child| {
            if let Some(text) = child.value().as_text() {
                return Some(FragmentNode::Text(text.to_string()));
            }
            ElementRef::wrap(child).map(|el| {
                let mut attrs: Vec<(String, String)> = el
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                attrs.sort();
                FragmentNode::Element(Element {
                    name: el.value().name().to_string(),
                    attrs,
                    children: convert_children(el),
                })
            })
        })
        .collect()
}

// ============================================================================
// Fragment tree
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentNode {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<FragmentNode>,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![FragmentNode::Text(text.to_string())];
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                FragmentNode::Text(t) => out.push_str(t),
                FragmentNode::Element(el) => out.push_str(&el.text()),
            }
        }
        out
    }
}

/// A detached, mutable card instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    nodes: Vec<FragmentNode>,
}

impl Fragment {
    pub fn select(&self, selector: &str) -> Option<&Element> {
        let sel = SlotSelector::parse(selector)?;
        find(&self.nodes, &sel)
    }

    pub fn select_mut(&mut self, selector: &str) -> Option<&mut Element> {
        let sel = SlotSelector::parse(selector)?;
        find_mut(&mut self.nodes, &sel)
    }

    /// Remove the first element matching `selector`, with its subtree.
    /// Returns whether anything was removed.
    pub fn remove(&mut self, selector: &str) -> bool {
        match SlotSelector::parse(selector) {
            Some(sel) => remove_first(&mut self.nodes, &sel),
            None => false,
        }
    }

    /// Serialize to HTML, escaping all text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }
}

fn find<'a>(nodes: &'a [FragmentNode], sel: &SlotSelector<'_>) -> Option<&'a Element> {
    for node in nodes {
        if let FragmentNode::Element(el) = node {
            if sel.matches(el) {
                return Some(el);
            }
            if let Some(found) = find(&el.children, sel) {
                return Some(found);
            }
        }
    }
    None
}

fn find_mut<'a>(nodes: &'a mut [FragmentNode], sel: &SlotSelector<'_>) -> Option<&'a mut Element> {
    for node in nodes {
        if let FragmentNode::Element(el) = node {
            if sel.matches(el) {
                return Some(el);
            }
            if let Some(found) = find_mut(&mut el.children, sel) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_first(nodes: &mut Vec<FragmentNode>, sel: &SlotSelector<'_>) -> bool {
    for idx in 0..nodes.len() {
        if let FragmentNode::Element(el) = &mut nodes[idx] {
            if sel.matches(el) {
                nodes.remove(idx);
                return true;
            }
            if remove_first(&mut el.children, sel) {
                return true;
            }
        }
    }
    false
}

fn escape(value: &str) -> String {
    html! { (value) }.into_string()
}

fn write_node(node: &FragmentNode, out: &mut String) {
    match node {
        FragmentNode::Text(text) => out.push_str(&escape(text)),
        FragmentNode::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attrs {
                out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }
            for child in &el.children {
                write_node(child, out);
            }
            out.push_str(&format!("</{}>", el.name));
        }
    }
}

// ============================================================================
// Slot selectors
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum SlotSelector<'a> {
    AttrEquals { attr: &'a str, value: &'a str },
    AttrContains { attr: &'a str, value: &'a str },
    Class(&'a str),
}

impl<'a> SlotSelector<'a> {
    fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        let parsed = if let Some(class) = selector.strip_prefix('.') {
            (!class.is_empty()).then_some(SlotSelector::Class(class))
        } else if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let unquote = |v: &'a str| v.trim().trim_matches(|c| c == '"' || c == '\'');
            if let Some((attr, value)) = inner.split_once("*=") {
                Some(SlotSelector::AttrContains {
                    attr: attr.trim(),
                    value: unquote(value),
                })
            } else {
                inner.split_once('=').map(|(attr, value)| SlotSelector::AttrEquals {
                    attr: attr.trim(),
                    value: unquote(value),
                })
            }
        } else {
            None
        };
        if parsed.is_none() {
            warn!("unsupported slot selector {selector:?}");
        }
        parsed
    }

    fn matches(&self, el: &Element) -> bool {
        match *self {
            SlotSelector::AttrEquals { attr, value } => el.attr(attr) == Some(value),
            SlotSelector::AttrContains { attr, value } => {
                el.attr(attr).is_some_and(|v| v.contains(value))
            }
            SlotSelector::Class(name) => el
                .attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn card_template_has_every_slot() {
        let fragment = Template::card().instantiate();
        for slot in [
            r#"[class="card-heading"]"#,
            r#"[class="card-description"]"#,
            r#"[class="card-link"]"#,
            r#"[class="card-language"]"#,
            r#"[class="card-language-colour"]"#,
            r#"[class*="card-logo"]"#,
            r#"[class="card-feature-image"]"#,
        ] {
            assert!(fragment.select(slot).is_some(), "missing slot {slot}");
        }
    }

    #[test]
    fn instances_are_independent() {
        let template = Template::card();
        let mut first = template.instantiate();
        let second = template.instantiate();

        first
            .select_mut(r#"[class="card-heading"]"#)
            .unwrap()
            .set_text("changed");
        assert!(first.remove(r#"[class="card-description"]"#));

        assert_eq!(second, template.instantiate());
        assert_eq!(second.select(".card-heading").unwrap().text(), "");
        assert!(second.select(".card-description").is_some());
    }

    #[test]
    fn exact_class_selector_does_not_match_prefix() {
        let fragment = Template::parse("t", r#"<span class="card-language-colour"></span>"#).instantiate();
        assert!(fragment.select(r#"[class="card-language"]"#).is_none());
        assert!(fragment.select(r#"[class*="card-language"]"#).is_some());
    }

    #[test]
    fn remove_takes_whole_subtree() {
        let mut fragment =
            Template::parse("t", r#"<div class="a"><p class="b">x</p></div><p class="c">y</p>"#)
                .instantiate();
        assert!(fragment.remove(".a"));
        assert!(fragment.select(".b").is_none());
        assert_eq!(fragment.to_html(), r#"<p class="c">y</p>"#);
        assert!(!fragment.remove(".a"));
    }

    #[test]
    fn serialization_escapes_text_and_attributes() {
        let mut fragment = Template::parse("t", r##"<a class="l" href="#"></a>"##).instantiate();
        let el = fragment.select_mut(".l").unwrap();
        el.set_text("<script>alert(1)</script>");
        el.set_attr("href", "\"><script>x</script>");

        let html = fragment.to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&quot;&gt;"));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let fragment = Template::parse("t", r#"<img class="i" src="a.png">"#).instantiate();
        assert_eq!(fragment.to_html(), r#"<img class="i" src="a.png">"#);
    }

    #[test]
    fn nested_elements_serialize_with_closing_tags() {
        let markup = r#"<div class="o"><p class="p">a &amp; b</p><span>x</span></div>"#;
        let fragment = Template::parse("t", markup).instantiate();
        assert_eq!(fragment.to_html(), markup);
    }

    #[test]
    fn unsupported_selector_matches_nothing() {
        let mut fragment = Template::card().instantiate();
        assert!(fragment.select("article > div").is_none());
        assert!(!fragment.remove("article > div"));
    }

    #[test]
    fn template_from_file_uses_stem_as_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("compact-card.html");
        fs::write(&path, r#"<div class="card-heading"></div>"#).unwrap();

        let template = Template::from_file(&path).unwrap();
        assert_eq!(template.name(), "compact-card");
        assert!(template.instantiate().select(".card-heading").is_some());
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let err = Template::from_file(Path::new("/nonexistent/card.html")).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }
}

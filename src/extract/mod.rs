//! Source extractors: one per site, each turning a listing page into
//! [`Project`] records.
//!
//! All three follow the same shape:
//!
//! 1. Find every repeating item block with a substring attribute selector
//!    (`[class*="..."]`). The sites generate long class names that churn;
//!    matching a stable fragment survives more of that churn than an exact match.
//! 2. Look up each field with its own query inside the block. A missing
//!    element only leaves that field empty; the block is still emitted.
//! 3. Trim text, and resolve links against the site's fixed origin.
//!
//! The site-specific rules live in [`github`], [`cults3d`] and [`boardgamegeek`].

pub mod boardgamegeek;
pub mod cults3d;
pub mod github;

use crate::document::Node;
use crate::types::Host;
use log::debug;
use url::Url;

/// Trimmed text of `node`, or `None` when the node is missing or blank.
pub(crate) fn trimmed_text(node: Option<Node<'_>>) -> Option<String> {
    node.map(|n| n.text().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Non-blank attribute value of `node`.
pub(crate) fn attr<'a>(node: Option<Node<'a>>, name: &str) -> Option<&'a str> {
    node.and_then(|n| n.attr(name)).filter(|v| !v.trim().is_empty())
}

/// Attribute value of `node` as written, empty values included. An explicit
/// `alt=""` marks a decorative image and has to survive.
pub(crate) fn raw_attr<'a>(node: Option<Node<'a>>, name: &str) -> Option<&'a str> {
    node.and_then(|n| n.attr(name))
}

/// Resolve `href` against the origin of `host`.
///
/// Relative links become absolute; already absolute links are kept. A missing
/// or unparsable link yields `None`.
pub fn resolve_link(href: Option<&str>, host: Host) -> Option<Url> {
    let href = href?.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(host.base_origin()).ok()?;
    match base.join(href) {
        Ok(url) => Some(url),
        Err(err) => {
            debug!("dropping unresolvable link {href:?} on {}: {err}", host.slug());
            None
        }
    }
}

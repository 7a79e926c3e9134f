//! Shared test utilities.
//!
//! Markup builders that produce listing blocks shaped like the live pages,
//! and an in-memory [`Fetcher`] that serves canned bodies and records every
//! request.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let page = bgg_page(&[bgg_item(13, "Catan", None, Some("thumb.jpg"))]);
//! let fetcher = MapFetcher::default()
//!     .with("http://localhost:8080/proxy/boardgamegeek", &page);
//! ```

use crate::fetch::{FetchError, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

// =========================================================================
// In-memory fetcher
// =========================================================================

/// Serves bodies from a map. Unknown URLs answer 404.
#[derive(Default)]
pub struct MapFetcher {
    bodies: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MapFetcher {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.clone(),
                status: 404,
            })
    }
}

// =========================================================================
// Listing markup builders
// =========================================================================

/// One pinned-repository block. `extra_class` of `"fork"` marks a fork.
pub fn github_item(
    extra_class: &str,
    title: &str,
    description: Option<&str>,
    href: &str,
    language: Option<(&str, &str)>,
) -> String {
    let description = description
        .map(|d| format!(r#"<p class="pinned-item-desc color-fg-muted">{d}</p>"#))
        .unwrap_or_default();
    let language = language
        .map(|(name, style)| {
            format!(
                r#"<p class="mb-0 f6"><span class="d-inline-block">
                     <span class="repo-language-color" style="{style}"></span>
                     <span itemprop="programmingLanguage">{name}</span>
                   </span></p>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="Box pinned-item-list-item public {extra_class}">
             <div class="pinned-item-list-item-content">
               <a href="{href}" class="Link mr-1 text-bold"><span class="repo" title="{title}">{title}</span></a>
               {description}
               {language}
             </div>
           </div>"#
    )
}

/// One model card. The image `alt` mirrors the trimmed title, as on the site.
pub fn cults3d_item(title: &str, href: &str, data_src: Option<&str>) -> String {
    let image = data_src
        .map(|src| {
            format!(
                r#"<img class="painting-image lazyload" data-src="{src}" alt="{}">"#,
                title.trim()
            )
        })
        .unwrap_or_default();
    format!(
        r#"<article class="crea">
             <div class="painting">{image}</div>
             <a class="drawer-contents" title="{title}" href="{href}"><span>ignored text</span></a>
           </article>"#
    )
}

/// One collection row. The link slug is the lowercased, dashed title.
pub fn bgg_item(id: u32, title: &str, description: Option<&str>, thumbnail: Option<&str>) -> String {
    let slug = title.to_lowercase().replace(' ', "-");
    let href = format!("/boardgame/{id}/{slug}");
    let thumbnail = thumbnail
        .map(|src| format!(r#"<img src="{src}" alt="Board Game: {title}">"#))
        .unwrap_or_default();
    let description = description
        .map(|d| format!("<p>{d}</p>"))
        .unwrap_or_default();
    format!(
        r#"<tr id="row_{id}">
             <td class="collection_thumbnail"><a href="{href}">{thumbnail}</a></td>
             <td class="collection_objectname"><div><a href="{href}">{title}</a></div>{description}</td>
           </tr>"#
    )
}

/// Collection page wrapping `rows` in a table.
pub fn bgg_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="collection_table">{}</table></body></html>"#,
        rows.concat()
    )
}

/// Detail XML document for one game.
pub fn bgg_detail(image: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<boardgames><boardgame objectid="1"><thumbnail>thumb.jpg</thumbnail><image>{image}</image></boardgame></boardgames>"#
    )
}

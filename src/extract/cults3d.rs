//! Cults3D profile page: published 3D models.
//!
//! Card images are lazy-loaded through a CDN resizer, so `data-src` usually
//! looks like `https://images.cults3d.com/<signature>/<opts>/https://files.cults3d.com/uploaders/...`.
//! When the original upload URL is embedded like that, it becomes the
//! high-res source and the full CDN thumbnail URL is kept as the low-res
//! fallback.

use super::{attr, raw_attr, resolve_link};
use crate::document::StructuredDocument;
use crate::types::{Host, Image, Project};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

const ITEM: &str = r#"article[class*="crea"]"#;
const LINK: &str = r#"a[class*="drawer-contents"]"#;
const IMAGE: &str = r#"img[class*="painting-image"]"#;

static FULL_SIZE_ASSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https://files\.cults3d\.com[^'"]+"#).expect("full-size asset pattern is valid")
});

/// Extract every model card.
pub fn extract(doc: &dyn StructuredDocument) -> Vec<Project> {
    let mut projects = Vec::new();

    for block in doc.query_all(ITEM) {
        let link = block.query(LINK);
        let image_el = block.query(IMAGE);

        let image = attr(image_el, "data-src").map(|data_src| {
            let (high_res_src, low_res_src) = split_image_source(data_src);
            Image {
                high_res_src: Some(high_res_src),
                low_res_src,
                alt: raw_attr(image_el, "alt").map(str::to_string),
            }
        });

        projects.push(Project {
            title: attr(link, "title").map(|t| t.trim().to_string()),
            url: resolve_link(attr(link, "href"), Host::Cults3d),
            image,
            ..Project::new(Host::Cults3d)
        });
    }

    debug!("cults3d: extracted {} projects", projects.len());
    projects
}

/// Split a lazy-load attribute into `(high_res, low_res)`.
///
/// If an original upload URL is embedded, it is the high-res source and the
/// whole attribute is the low-res fallback. Otherwise the value is used as is.
pub fn split_image_source(data_src: &str) -> (String, Option<String>) {
    match FULL_SIZE_ASSET.find(data_src) {
        Some(found) => (found.as_str().to_string(), Some(data_src.to_string())),
        None => (data_src.to_string(), None),
    }
}

//! BoardGameGeek collection page: one table row per game.
//!
//! Only the listing thumbnail is available here. The full-size image comes
//! later from the per-game XML document; see [`crate::enrich`].

use super::{attr, raw_attr, resolve_link, trimmed_text};
use crate::document::StructuredDocument;
use crate::types::{Host, Image, Project};
use log::debug;

const ITEM: &str = r#"tr[id*="row_"]"#;
const TITLE: &str = r#"td[class*="collection_objectname"] > div > a"#;
const DESCRIPTION: &str = r#"td[class*="collection_objectname"] > p"#;
const THUMBNAIL_LINK: &str = r#"td[class*="collection_thumbnail"] > a"#;
const THUMBNAIL_IMAGE: &str = r#"td[class*="collection_thumbnail"] > a > img"#;

/// Extract every collection row.
pub fn extract(doc: &dyn StructuredDocument) -> Vec<Project> {
    let mut projects = Vec::new();

    for row in doc.query_all(ITEM) {
        let thumbnail = row.query(THUMBNAIL_IMAGE);
        let image = attr(thumbnail, "src").map(|src| Image {
            high_res_src: Some(src.to_string()),
            low_res_src: None,
            alt: raw_attr(thumbnail, "alt").map(str::to_string),
        });

        projects.push(Project {
            title: trimmed_text(row.query(TITLE)),
            description: trimmed_text(row.query(DESCRIPTION)),
            url: resolve_link(attr(row.query(THUMBNAIL_LINK), "href"), Host::BoardGameGeek),
            image,
            ..Project::new(Host::BoardGameGeek)
        });
    }

    debug!("boardgamegeek: extracted {} projects", projects.len());
    projects
}

//! GitHub profile page: pinned repositories.

use super::{attr, resolve_link, trimmed_text};
use crate::document::StructuredDocument;
use crate::types::{Host, Image, Language, Project};
use log::debug;

const ITEM: &str = r#"div[class*="Box pinned-item-list-item"]"#;
const TITLE: &str = r#"span[class*="repo"]"#;
const DESCRIPTION: &str = r#"p[class*="pinned-item-desc"]"#;
const LINK: &str = r#"a[class*="Link"]"#;
const LANGUAGE_NAME: &str = r#"span[itemprop*="programmingLanguage"]"#;
const LANGUAGE_COLOR: &str = r#"span[class*="repo-language-color"]"#;

/// Class fragment GitHub puts on pinned items that are forks.
const FORK_MARKER: &str = "fork";

/// Local image shown for every GitHub project instead of page imagery.
#[derive(Debug, Clone)]
pub struct Branding {
    pub logo_src: String,
    pub logo_alt: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            logo_src: "/images/github.png".to_string(),
            logo_alt: "Github Logo".to_string(),
        }
    }
}

/// Extract pinned, non-fork repositories.
pub fn extract(doc: &dyn StructuredDocument, branding: &Branding) -> Vec<Project> {
    let mut projects = Vec::new();

    for block in doc.query_all(ITEM) {
        if block
            .attr("class")
            .is_some_and(|class| class.contains(FORK_MARKER))
        {
            debug!("skipping forked pinned item");
            continue;
        }

        let language_name = trimmed_text(block.query(LANGUAGE_NAME));
        let language_style = attr(block.query(LANGUAGE_COLOR), "style");
        // Half a language is no use to the card: both or nothing.
        let programming_language = match (language_name, language_style) {
            (Some(name), Some(style)) => Some(Language {
                name,
                style: style.to_string(),
            }),
            _ => None,
        };

        projects.push(Project {
            host: Host::GitHub,
            title: trimmed_text(block.query(TITLE)),
            description: trimmed_text(block.query(DESCRIPTION)),
            url: resolve_link(attr(block.query(LINK), "href"), Host::GitHub),
            image: Some(Image {
                high_res_src: Some(branding.logo_src.clone()),
                low_res_src: None,
                alt: Some(branding.logo_alt.clone()),
            }),
            programming_language,
        });
    }

    debug!("github: extracted {} projects", projects.len());
    projects
}

//! Shared data model produced by the extractors and consumed by the renderer.
//!
//! Every field except [`Project::host`] is independently optional: the source
//! sites publish loosely structured markup, and a missing element is never an
//! error, only an absent value. Consumers must handle each field on its own.

use serde::Serialize;
use url::Url;

/// Which source site a [`Project`] was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Host {
    /// Code-hosting profile (pinned repositories).
    GitHub,
    /// 3D-model marketplace profile.
    Cults3d,
    /// Board-game collection tracker.
    BoardGameGeek,
}

impl Host {
    /// Short name used for branding text in the rendered card.
    pub fn slug(self) -> &'static str {
        match self {
            Host::GitHub => "github",
            Host::Cults3d => "cults3d",
            Host::BoardGameGeek => "boardgamegeek",
        }
    }

    /// Fixed origin every link found on this host's pages is resolved against.
    pub fn base_origin(self) -> &'static str {
        match self {
            Host::GitHub => "https://github.com",
            Host::Cults3d => "https://cults3d.com",
            Host::BoardGameGeek => "https://boardgamegeek.com",
        }
    }
}

/// A progressively loaded image reference.
///
/// When both sources are present, `high_res_src` is the better asset.
/// Rendering walks placeholder → low → high and never steps back down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub high_res_src: Option<String>,
    pub low_res_src: Option<String>,
    pub alt: Option<String>,
}

/// Repository language as shown on the code host.
///
/// `style` is the raw `style` attribute from the source page and is untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub name: String,
    pub style: String,
}

/// One listed item from any source, normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub host: Host,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always absolute; resolved against [`Host::base_origin`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// Only ever set by the GitHub extractor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<Language>,
}

impl Project {
    /// An empty project for `host`; extractors fill in what they find.
    pub fn new(host: Host) -> Self {
        Self {
            host,
            title: None,
            description: None,
            url: None,
            image: None,
            programming_language: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_serializes_lowercase() {
        let json = serde_json::to_string(&Host::BoardGameGeek).unwrap();
        assert_eq!(json, r#""boardgamegeek""#);
    }

    #[test]
    fn absent_fields_are_skipped_in_json() {
        let project = Project::new(Host::Cults3d);
        let json = serde_json::to_string(&project).unwrap();
        assert_eq!(json, r#"{"host":"cults3d"}"#);
    }

    #[test]
    fn base_origins_are_absolute() {
        for host in [Host::GitHub, Host::Cults3d, Host::BoardGameGeek] {
            let origin = Url::parse(host.base_origin()).unwrap();
            assert_eq!(origin.scheme(), "https");
        }
    }
}

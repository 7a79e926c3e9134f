//! # Project Gallery
//!
//! Builds a single portfolio page from the public listing pages of three
//! hosting sites: pinned repositories on GitHub, a BoardGameGeek collection,
//! and published models on Cults3D.
//!
//! # Pipeline
//!
//! ```text
//! fetch      location  →  Document          (HTML via scraper, XML via quick-xml)
//! extract    Document  →  Vec<Project>      (one extractor per host)
//! enrich     Project   →  Project           (BoardGameGeek: detail XML → full-size image)
//! render     Project   →  card Fragment     (template slots filled or removed, all values sanitized)
//! assemble   cards     →  GalleryContainer  (random insertion, sources in fixed order)
//! page       container →  dist/index.html
//! ```
//!
//! Sources run one after another. The first one that cannot be fetched ends
//! the run, but the page is still written with the cards gathered so far.
//! Everything scraped is untrusted and goes through [`sanitize`]
//! before it reaches the page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Host`, `Project`, `Image`, `Language` |
//! | [`document`] | Queryable HTML/XML documents behind one trait |
//! | [`fetch`] | Location → parsed document; `Fetcher` trait and the `reqwest` client |
//! | [`extract`] | Per-host listing extractors |
//! | [`enrich`] | BoardGameGeek image upgrade from detail documents |
//! | [`sanitize`] | Text, URL and style sanitizers |
//! | [`template`] | Card template and detached card fragments |
//! | [`progressive`] | Placeholder → low-res → high-res loading state machine |
//! | [`render`] | Project → card |
//! | [`gallery`] | Source ordering, random insertion, page shell, `build` |
//! | [`config`] | `gallery.toml` loading, validation, stock config, color CSS |
//! | [`output`] | CLI progress and summary formatting |
//!
//! # Design Decisions
//!
//! ## Literal Locations
//!
//! A source location that is not an `http(s)://` address is parsed as the
//! document itself. Fixtures and offline runs use the same code path as live
//! fetches.
//!
//! ## Detached Card Fragments
//!
//! Cards are built as owned trees rather than strings, so a slot can be
//! removed cleanly when its field is missing and every value is escaped once,
//! at serialization.

pub mod config;
pub mod document;
pub mod enrich;
pub mod extract;
pub mod fetch;
pub mod gallery;
pub mod output;
pub mod progressive;
pub mod render;
pub mod sanitize;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

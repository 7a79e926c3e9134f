//! Gallery assembly: sources → projects → cards → page.
//!
//! Sources are processed strictly in order: GitHub, then BoardGameGeek (with
//! its per-game image upgrade), then Cults3D. Within a source every detail
//! fetch is awaited before the next one starts, and a source's cards are only
//! inserted once the whole source is done.
//!
//! Each card lands at a uniformly random position among the container's
//! current children, including the end. Appending a source's cards one by one
//! this way shuffles sources together, though the overall order is not a
//! uniform permutation.
//!
//! The first failing source (network error, non-success status) ends the
//! run: it is logged and recorded in the [`GalleryReport`], and the sources
//! after it are listed as not run. Cards already inserted stay, and
//! [`build`] still writes the page.
//!
//! ## Progress Reporting
//!
//! [`Assembler::with_events`] takes an optional channel sender. Each step is
//! sent as a [`GalleryEvent`] so the CLI can print progress while the
//! pipeline runs; the formatting lives in [`crate::output`].

use crate::config::{AssetsConfig, GalleryConfig, ID_PLACEHOLDER, generate_color_css};
use crate::enrich;
use crate::extract::{boardgamegeek, cults3d, github};
use crate::fetch::{DocumentKind, FetchError, Fetcher, fetch};
use crate::render::render;
use crate::template::{Fragment, Template, TemplateError};
use crate::types::{Host, Project};
use log::{info, warn};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/progressive.js");

/// Order in which sources are fetched and inserted.
pub const SOURCE_ORDER: [Host; 3] = [Host::GitHub, Host::BoardGameGeek, Host::Cults3d];

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Resolved locations for every source document.
///
/// A location is either an absolute `http(s)://` address or literal content;
/// see [`crate::fetch::fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocations {
    pub github: String,
    pub boardgamegeek: String,
    pub cults3d: String,
    pub boardgamegeek_detail: String,
}

impl SourceLocations {
    pub fn page(&self, host: Host) -> &str {
        match host {
            Host::GitHub => &self.github,
            Host::BoardGameGeek => &self.boardgamegeek,
            Host::Cults3d => &self.cults3d,
        }
    }

    /// Detail document location for a game id.
    pub fn detail(&self, id: &str) -> String {
        self.boardgamegeek_detail.replace(ID_PLACEHOLDER, id)
    }
}

// ============================================================================
// Container
// ============================================================================

/// The page region that holds the cards, in display order.
#[derive(Debug, Default)]
pub struct GalleryContainer {
    children: Vec<Fragment>,
}

impl GalleryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Fragment] {
        &self.children
    }

    /// Insert before the child at `index`; an index past the end appends.
    pub fn insert(&mut self, index: usize, card: Fragment) {
        let index = index.min(self.children.len());
        self.children.insert(index, card);
    }

    /// Insert each card at a position drawn uniformly from `0..=len`.
    pub fn insert_random<R: Rng>(&mut self, cards: impl IntoIterator<Item = Fragment>, rng: &mut R) {
        for card in cards {
            let index = rng.random_range(0..=self.children.len());
            self.insert(index, card);
        }
    }

    pub fn to_html(&self) -> String {
        self.children.iter().map(Fragment::to_html).collect()
    }
}

// ============================================================================
// Events and report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    SourceStarted {
        host: Host,
        location: String,
    },
    ProjectsExtracted {
        host: Host,
        count: usize,
    },
    /// A BoardGameGeek detail document was fetched and applied.
    ImageUpgraded {
        index: usize,
        title: Option<String>,
        id: String,
        upgraded: bool,
    },
    /// No game id in the project URL; the thumbnail is kept.
    EnrichmentSkipped {
        index: usize,
        title: Option<String>,
    },
    CardsInserted {
        host: Host,
        count: usize,
        gallery_size: usize,
    },
    SourceFailed {
        host: Host,
        error: String,
    },
}

#[derive(Debug)]
pub struct SourceReport {
    pub host: Host,
    /// Number of cards inserted, or why the source was abandoned.
    pub result: Result<usize, FetchError>,
}

#[derive(Debug, Default)]
pub struct GalleryReport {
    pub sources: Vec<SourceReport>,
    /// Sources skipped because an earlier one failed.
    pub not_run: Vec<Host>,
}

impl GalleryReport {
    pub fn inserted(&self) -> usize {
        self.sources.iter().filter_map(|s| s.result.as_ref().ok()).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.result.is_err())
    }
}

// ============================================================================
// Assembler
// ============================================================================

/// Runs the source → card pipeline against one template.
pub struct Assembler<'a> {
    fetcher: &'a dyn Fetcher,
    template: &'a Template,
    locations: &'a SourceLocations,
    placeholder: String,
    branding: github::Branding,
    events: Option<Sender<GalleryEvent>>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        template: &'a Template,
        locations: &'a SourceLocations,
        assets: &AssetsConfig,
    ) -> Self {
        Self {
            fetcher,
            template,
            locations,
            placeholder: assets.placeholder.clone(),
            branding: github::Branding {
                logo_src: assets.github_logo.clone(),
                logo_alt: assets.github_logo_alt.clone(),
            },
            events: None,
        }
    }

    pub fn with_events(mut self, events: Option<Sender<GalleryEvent>>) -> Self {
        self.events = events;
        self
    }

    fn emit(&self, event: GalleryEvent) {
        if let Some(tx) = &self.events {
            tx.send(event).ok();
        }
    }

    /// Process the sources in [`SOURCE_ORDER`], inserting cards into
    /// `container`. The first failure stops the run and is recorded, never
    /// returned.
    pub async fn assemble<R: Rng>(&self, container: &mut GalleryContainer, rng: &mut R) -> GalleryReport {
        let mut report = GalleryReport::default();

        for (position, host) in SOURCE_ORDER.into_iter().enumerate() {
            match self.load(host).await {
                Ok(projects) => {
                    let cards: Vec<Fragment> = projects
                        .iter()
                        .map(|project| render(project, self.template, &self.placeholder))
                        .collect();
                    let count = cards.len();
                    container.insert_random(cards, rng);
                    info!("{}: inserted {count} cards", host.slug());
                    self.emit(GalleryEvent::CardsInserted {
                        host,
                        count,
                        gallery_size: container.len(),
                    });
                    report.sources.push(SourceReport { host, result: Ok(count) });
                }
                Err(err) => {
                    report.not_run = SOURCE_ORDER[position + 1..].to_vec();
                    warn!(
                        "{}: {err}; not running {} later source(s)",
                        host.slug(),
                        report.not_run.len()
                    );
                    self.emit(GalleryEvent::SourceFailed {
                        host,
                        error: err.to_string(),
                    });
                    report.sources.push(SourceReport { host, result: Err(err) });
                    break;
                }
            }
        }

        report
    }

    /// Fetch and extract one source's projects, upgrading BoardGameGeek
    /// images from their detail documents.
    pub async fn load(&self, host: Host) -> Result<Vec<Project>, FetchError> {
        let location = self.locations.page(host);
        self.emit(GalleryEvent::SourceStarted {
            host,
            location: display_location(location),
        });

        let mut projects = {
            let doc = fetch(self.fetcher, location, DocumentKind::Markup).await?;
            match host {
                Host::GitHub => github::extract(&doc, &self.branding),
                Host::BoardGameGeek => boardgamegeek::extract(&doc),
                Host::Cults3d => cults3d::extract(&doc),
            }
        };
        self.emit(GalleryEvent::ProjectsExtracted {
            host,
            count: projects.len(),
        });

        if host == Host::BoardGameGeek {
            self.upgrade_images(&mut projects).await?;
        }
        Ok(projects)
    }

    /// One detail fetch per game, strictly in sequence.
    async fn upgrade_images(&self, projects: &mut [Project]) -> Result<(), FetchError> {
        for (index, project) in projects.iter_mut().enumerate() {
            let Some(id) = enrich::detail_id(project) else {
                warn!(
                    "boardgamegeek: no game id for {:?}; keeping thumbnail",
                    project.title.as_deref().unwrap_or("(untitled)")
                );
                self.emit(GalleryEvent::EnrichmentSkipped {
                    index,
                    title: project.title.clone(),
                });
                continue;
            };

            let detail = fetch(self.fetcher, &self.locations.detail(&id), DocumentKind::Data).await?;
            let before = project.image.clone();
            enrich::upgrade(project, &detail);
            self.emit(GalleryEvent::ImageUpgraded {
                index,
                title: project.title.clone(),
                upgraded: project.image != before,
                id,
            });
        }
        Ok(())
    }
}

/// Network locations are shown as is; literal content is summarized.
fn display_location(location: &str) -> String {
    if crate::fetch::is_network_location(location) {
        location.to_string()
    } else {
        format!("<inline document, {} bytes>", location.len())
    }
}

// ============================================================================
// Page
// ============================================================================

/// Full page: shell, color variables, cards, and the progressive loader.
pub fn render_page(container: &GalleryContainer, config: &GalleryConfig) -> Markup {
    let css = format!("{}\n\n{}", generate_color_css(&config.colors), CSS_STATIC);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.page.title) }
                style { (PreEscaped(css)) }
            }
            body {
                main.projects {
                    h1.projects-title { (config.page.title) }
                    section id="project-gallery" class="project-gallery" {
                        (PreEscaped(container.to_html()))
                    }
                }
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Run the whole pipeline and write `index.html` into `output_dir`.
pub async fn build(
    config: &GalleryConfig,
    fetcher: &dyn Fetcher,
    output_dir: &Path,
    events: Option<Sender<GalleryEvent>>,
) -> Result<GalleryReport, GalleryError> {
    let template = match &config.page.template {
        Some(path) => Template::from_file(path)?,
        None => Template::card(),
    };
    let locations = config.sources.locations();
    let assembler = Assembler::new(fetcher, &template, &locations, &config.assets).with_events(events);

    let mut container = GalleryContainer::new();
    let mut rng = StdRng::from_os_rng();
    let report = assembler.assemble(&mut container, &mut rng).await;
    drop(assembler);

    fs::create_dir_all(output_dir)?;
    let index = output_dir.join("index.html");
    fs::write(&index, render_page(&container, config).into_string())?;
    info!("wrote {} cards to {}", container.len(), index.display());

    Ok(report)
}

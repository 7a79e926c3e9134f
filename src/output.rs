//! CLI output formatting for the gallery pipeline.
//!
//! Output is source-centric: each source gets a header line with its slug and
//! where it was fetched from, followed by indented progress lines. Games
//! touched by the image upgrade are listed by positional index and title.
//!
//! ```text
//! github ← http://localhost:8080/proxy/github
//!     3 projects
//!     Inserted 3 cards (gallery: 3)
//! boardgamegeek ← http://localhost:8080/proxy/boardgamegeek
//!     2 projects
//!     001 Catan (#13): upgraded
//!     002 Azul: no game id, thumbnail kept
//!     Inserted 2 cards (gallery: 5)
//! cults3d ← http://localhost:8080/proxy/cults3d
//!     FAILED: http://localhost:8080/proxy/cults3d returned 503
//!
//! Gallery: 5 cards from 2 of 3 sources
//!     cults3d: http://localhost:8080/proxy/cults3d returned 503
//! ```
//!
//! Sources after a failed one never start; the summary lists them as
//! `not run`.
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::gallery::{GalleryEvent, GalleryReport};

/// Format a 0-based position as a 1-based, 3-digit zero-padded index.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos + 1)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Index + title, or index + `(untitled)`.
fn project_line(index: usize, title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} (untitled)", format_index(index)),
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Format one progress event as display lines.
pub fn format_gallery_event(event: &GalleryEvent) -> Vec<String> {
    match event {
        GalleryEvent::SourceStarted { host, location } => {
            vec![format!("{} ← {}", host.slug(), location)]
        }
        GalleryEvent::ProjectsExtracted { count, .. } => {
            vec![format!("{}{}", indent(1), plural(*count, "project", "projects"))]
        }
        GalleryEvent::ImageUpgraded {
            index,
            title,
            id,
            upgraded,
        } => {
            let status = if *upgraded { "upgraded" } else { "no detail image" };
            vec![format!(
                "{}{} (#{}): {}",
                indent(1),
                project_line(*index, title.as_deref()),
                id,
                status
            )]
        }
        GalleryEvent::EnrichmentSkipped { index, title } => vec![format!(
            "{}{}: no game id, thumbnail kept",
            indent(1),
            project_line(*index, title.as_deref())
        )],
        GalleryEvent::CardsInserted {
            count,
            gallery_size,
            ..
        } => vec![format!(
            "{}Inserted {} (gallery: {})",
            indent(1),
            plural(*count, "card", "cards"),
            gallery_size
        )],
        GalleryEvent::SourceFailed { error, .. } => {
            vec![format!("{}FAILED: {}", indent(1), error)]
        }
    }
}

/// Summary printed once the page is written.
pub fn format_report(report: &GalleryReport) -> Vec<String> {
    let total = report.sources.len() + report.not_run.len();
    let ok = report.sources.iter().filter(|s| s.result.is_ok()).count();
    let mut lines = vec![
        String::new(),
        format!(
            "Gallery: {} from {} of {} sources",
            plural(report.inserted(), "card", "cards"),
            ok,
            total
        ),
    ];
    for failed in report.failed() {
        if let Err(err) = &failed.result {
            lines.push(format!("{}{}: {}", indent(1), failed.host.slug(), err));
        }
    }
    for host in &report.not_run {
        lines.push(format!("{}{}: not run", indent(1), host.slug()));
    }
    lines
}

pub fn print_report(report: &GalleryReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::gallery::SourceReport;
    use crate::types::Host;
    use url::Url;

    #[test]
    fn source_header_shows_slug_and_location() {
        let lines = format_gallery_event(&GalleryEvent::SourceStarted {
            host: Host::BoardGameGeek,
            location: "http://localhost:8080/proxy/boardgamegeek".to_string(),
        });
        assert_eq!(
            lines,
            vec!["boardgamegeek ← http://localhost:8080/proxy/boardgamegeek"]
        );
    }

    #[test]
    fn upgrade_lines_use_one_based_index() {
        let lines = format_gallery_event(&GalleryEvent::ImageUpgraded {
            index: 0,
            title: Some("Catan".to_string()),
            id: "13".to_string(),
            upgraded: true,
        });
        assert_eq!(lines, vec!["    001 Catan (#13): upgraded"]);
    }

    #[test]
    fn untitled_projects_are_marked() {
        let lines = format_gallery_event(&GalleryEvent::EnrichmentSkipped {
            index: 4,
            title: None,
        });
        assert_eq!(lines, vec!["    005 (untitled): no game id, thumbnail kept"]);
    }

    #[test]
    fn counts_are_pluralized() {
        let one = format_gallery_event(&GalleryEvent::CardsInserted {
            host: Host::Cults3d,
            count: 1,
            gallery_size: 7,
        });
        assert_eq!(one, vec!["    Inserted 1 card (gallery: 7)"]);

        let many = format_gallery_event(&GalleryEvent::ProjectsExtracted {
            host: Host::GitHub,
            count: 3,
        });
        assert_eq!(many, vec!["    3 projects"]);
    }

    #[test]
    fn report_lists_failed_and_skipped_sources() {
        let report = GalleryReport {
            sources: vec![
                SourceReport {
                    host: Host::GitHub,
                    result: Ok(3),
                },
                SourceReport {
                    host: Host::BoardGameGeek,
                    result: Err(FetchError::Status {
                        url: Url::parse("http://localhost:8080/proxy/boardgamegeek").unwrap(),
                        status: 503,
                    }),
                },
            ],
            not_run: vec![Host::Cults3d],
        };
        let lines = format_report(&report);
        assert_eq!(lines[1], "Gallery: 3 cards from 1 of 3 sources");
        assert_eq!(
            lines[2],
            "    boardgamegeek: http://localhost:8080/proxy/boardgamegeek returned 503"
        );
        assert_eq!(lines[3], "    cults3d: not run");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn clean_report_has_only_summary() {
        let report = GalleryReport {
            sources: vec![SourceReport {
                host: Host::GitHub,
                result: Ok(1),
            }],
            not_run: Vec::new(),
        };
        assert_eq!(format_report(&report), vec!["", "Gallery: 1 card from 1 of 1 sources"]);
    }
}

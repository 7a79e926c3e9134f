//! Image resolution upgrade for BoardGameGeek projects.
//!
//! The collection page only carries small thumbnails. Each game also has an
//! XML detail document whose first `<image>` element holds the canonical
//! full-size asset. Upgrading demotes the thumbnail to the low-res tier and
//! installs the detail image as high-res, so the card can show the thumbnail
//! first and swap in the real image once it arrives.

use crate::document::StructuredDocument;
use crate::types::Project;
use log::debug;

const DETAIL_IMAGE: &str = "image";

/// Identifier used to look up a game's detail document: the first path
/// segment of the project URL that is purely numeric.
///
/// `https://boardgamegeek.com/boardgame/13/catan` → `Some("13")`.
pub fn detail_id(project: &Project) -> Option<String> {
    project
        .url
        .as_ref()?
        .path_segments()?
        .find(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Promote the detail document's image to high-res, demoting the current one.
///
/// No-op when the detail document has no image element or the project has
/// no image to upgrade.
pub fn upgrade(project: &mut Project, detail: &dyn StructuredDocument) {
    let Some(found) = detail.query(DETAIL_IMAGE) else {
        debug!("no <image> in detail document; keeping listing thumbnail");
        return;
    };
    let Some(image) = project.image.as_mut() else {
        return;
    };
    let full = found.text().trim().to_string();
    image.low_res_src = image.high_res_src.take();
    image.high_res_src = Some(full);
}

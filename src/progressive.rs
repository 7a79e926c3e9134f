//! Progressive image loading as an explicit state machine.
//!
//! Each feature image starts on a local placeholder. Every time the current
//! asset finishes loading, the image advances to the next better tier that is
//! actually available:
//!
//! ```text
//! placeholder ──load──▶ low-res ──load──▶ high-res (terminal)
//!      └───────────load (no low-res)─────────▶ high-res
//! ```
//!
//! The transition table is computed once from whichever tiers exist, so the
//! image never regresses and never requests an asset it will not show.
//! The same table is written into the card as `data-*` attributes for the
//! browser-side loader in `static/progressive.js`.

use crate::types::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Placeholder,
    LowRes,
    HighRes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveImage {
    placeholder: String,
    /// Available tiers in load order.
    chain: Vec<(Stage, String)>,
    stage: Stage,
    current: usize,
}

impl ProgressiveImage {
    /// Build the loader for `image`, passing each source through `clean`.
    pub fn new(placeholder: &str, image: &Image, clean: impl Fn(&str) -> String) -> Self {
        let chain = [
            (Stage::LowRes, image.low_res_src.as_deref()),
            (Stage::HighRes, image.high_res_src.as_deref()),
        ]
        .into_iter()
        .filter_map(|(stage, src)| src.filter(|s| !s.is_empty()).map(|s| (stage, clean(s))))
        .collect();

        Self {
            placeholder: clean(placeholder),
            chain,
            stage: Stage::Placeholder,
            current: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Source the image element should currently display.
    pub fn current_src(&self) -> &str {
        match self.current {
            0 => &self.placeholder,
            n => &self.chain[n - 1].1,
        }
    }

    /// Source for a tier, if that tier is part of the chain.
    pub fn src_for(&self, stage: Stage) -> Option<&str> {
        self.chain
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, src)| src.as_str())
    }

    pub fn is_terminal(&self) -> bool {
        self.current == self.chain.len()
    }

    /// Handle an asset-load-complete signal. Returns the new source to display,
    /// or `None` when already at the best available tier.
    pub fn on_load(&mut self) -> Option<&str> {
        if self.is_terminal() {
            return None;
        }
        self.current += 1;
        self.stage = self.chain[self.current - 1].0;
        Some(&self.chain[self.current - 1].1)
    }
}

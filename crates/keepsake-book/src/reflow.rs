//! Anchor-preserving layout changes.
//!
//! A layout change shifts every page boundary. Before the change the
//! controller records the first photo of the visible spread; once pages
//! have been recomputed it moves the navigator to wherever that photo
//! landed. While this happens the book is "reflowing" and flip
//! animations are suppressed.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use keepsake_core::config::BookConfig;
use keepsake_core::types::PhotoId;

use crate::grouper::Page;
use crate::leaf::ViewportMode;
use crate::navigator::BookNavigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Waiting for pages to be recomputed under the new layout.
    Pending { anchor: PhotoId, requested_at: Instant },
    /// Relocation done (or skipped); the flag clears at `until`.
    Settling { until: Instant },
}

/// What happened when a pending reflow was completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RelocationOutcome {
    /// The anchor was found and the navigator moved to it.
    Relocated { page_index: usize, spread: usize },
    /// The anchor is no longer in the book; the spread is unchanged.
    AnchorLost,
    /// No reflow was pending.
    NothingPending,
}

/// Drives a single layout change from anchor capture to settle.
#[derive(Debug, Clone)]
pub struct LayoutReflowController {
    phase: Phase,
    settle_delay: Duration,
    fallback_delay: Duration,
}

impl LayoutReflowController {
    pub fn new(settle_delay: Duration, fallback_delay: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            settle_delay,
            fallback_delay,
        }
    }

    pub fn from_config(config: &BookConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reflow_settle_ms),
            Duration::from_millis(config.reflow_fallback_ms),
        )
    }

    /// First photo of the first non-empty visible page, left before right.
    pub fn capture_anchor<'a>(visible: impl IntoIterator<Item = &'a Page>) -> Option<PhotoId> {
        visible
            .into_iter()
            .find_map(|page| page.first())
            .map(|photo| photo.id)
    }

    /// Start a reflow. Without an anchor there is nothing to relocate and
    /// the flag clears after the fallback delay.
    pub fn begin(&mut self, anchor: Option<PhotoId>, now: Instant) {
        self.phase = match anchor {
            Some(anchor) => Phase::Pending {
                anchor,
                requested_at: now,
            },
            None => Phase::Settling {
                until: now + self.fallback_delay,
            },
        };
        debug!(anchor = ?anchor, "Layout reflow started");
    }

    /// Whether a relocation is waiting for recomputed pages.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    /// The recorded anchor, if a relocation is pending.
    pub fn anchor(&self) -> Option<PhotoId> {
        match self.phase {
            Phase::Pending { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    /// Relocate to the anchor within freshly computed `pages`.
    ///
    /// The anchor is looked up by id, so photos added or removed since
    /// [`begin`](Self::begin) do not matter unless the anchor itself is gone.
    pub fn complete(
        &mut self,
        pages: &[Page],
        navigator: &mut BookNavigator,
        mode: ViewportMode,
        now: Instant,
    ) -> RelocationOutcome {
        let Phase::Pending { anchor, .. } = self.phase else {
            return RelocationOutcome::NothingPending;
        };

        self.phase = Phase::Settling {
            until: now + self.settle_delay,
        };

        match pages.iter().position(|page| page.contains(anchor)) {
            Some(page_index) => {
                let spread = navigator.move_to_page(page_index, mode);
                debug!(%anchor, page_index, spread, "Relocated to anchor photo");
                RelocationOutcome::Relocated { page_index, spread }
            }
            None => {
                debug!(%anchor, "Anchor photo gone after reflow, staying put");
                RelocationOutcome::AnchorLost
            }
        }
    }

    /// Whether flip animation should currently be suppressed.
    pub fn is_reflowing(&self, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::Pending { requested_at, .. } => now < requested_at + self.fallback_delay,
            Phase::Settling { until } => now < until,
        }
    }

    /// Drop an expired settle deadline.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Settling { until } = self.phase {
            if now >= until {
                self.phase = Phase::Idle;
            }
        }
    }

    /// Abandon any reflow in progress.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }
}

impl Default for LayoutReflowController {
    fn default() -> Self {
        Self::from_config(&BookConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::BookPhoto;
    use chrono::Utc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn single(id: PhotoId) -> Page {
        Page::new(vec![BookPhoto::new(id, "file://a", Utc::now(), "a/a.jpg")])
    }

    #[test]
    fn test_capture_prefers_left_page() {
        let left = single(PhotoId::new());
        let right = single(PhotoId::new());
        assert_eq!(
            LayoutReflowController::capture_anchor([&left, &right]),
            Some(left[0].id)
        );
        let empty = Page::default();
        assert_eq!(
            LayoutReflowController::capture_anchor([&empty, &right]),
            Some(right[0].id)
        );
        assert_eq!(LayoutReflowController::capture_anchor([&empty]), None);
    }

    #[test]
    fn test_without_anchor_flag_clears_after_fallback() {
        let mut reflow = LayoutReflowController::new(ms(100), ms(300));
        let t0 = Instant::now();
        reflow.begin(None, t0);
        assert!(reflow.is_reflowing(t0 + ms(299)));
        assert!(!reflow.is_reflowing(t0 + ms(300)));
    }

    #[test]
    fn test_relocates_to_anchor() {
        let anchor = PhotoId::new();
        let pages = vec![single(PhotoId::new()), single(PhotoId::new()), single(anchor)];
        let mut reflow = LayoutReflowController::new(ms(100), ms(300));
        let mut nav = BookNavigator::new();
        let t0 = Instant::now();

        reflow.begin(Some(anchor), t0);
        assert!(reflow.is_pending());
        assert!(reflow.is_reflowing(t0 + ms(5)));

        let outcome = reflow.complete(&pages, &mut nav, ViewportMode::Desktop, t0 + ms(5));
        assert_eq!(outcome, RelocationOutcome::Relocated { page_index: 2, spread: 1 });
        assert_eq!(nav.current_spread(), 1);
        assert!(reflow.is_reflowing(t0 + ms(104)));
        assert!(!reflow.is_reflowing(t0 + ms(105)));
    }

    #[test]
    fn test_lost_anchor_keeps_spread() {
        let mut reflow = LayoutReflowController::new(ms(100), ms(300));
        let mut nav = BookNavigator::new();
        nav.next(3);
        let t0 = Instant::now();

        reflow.begin(Some(PhotoId::new()), t0);
        let pages = vec![single(PhotoId::new())];
        let outcome = reflow.complete(&pages, &mut nav, ViewportMode::Desktop, t0);
        assert_eq!(outcome, RelocationOutcome::AnchorLost);
        assert_eq!(nav.current_spread(), 1);
        reflow.tick(t0 + ms(100));
        assert!(!reflow.is_reflowing(t0 + ms(100)));
        assert_eq!(reflow.anchor(), None);
    }

    #[test]
    fn test_uncompleted_reflow_clears_after_fallback() {
        let mut reflow = LayoutReflowController::new(ms(100), ms(300));
        let t0 = Instant::now();
        reflow.begin(Some(PhotoId::new()), t0);
        assert!(reflow.is_reflowing(t0 + ms(299)));
        assert!(!reflow.is_reflowing(t0 + ms(300)));
        assert!(!reflow.is_reflowing(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn test_complete_without_begin() {
        let mut reflow = LayoutReflowController::default();
        let mut nav = BookNavigator::new();
        let outcome = reflow.complete(&[], &mut nav, ViewportMode::Mobile, Instant::now());
        assert_eq!(outcome, RelocationOutcome::NothingPending);
    }
}

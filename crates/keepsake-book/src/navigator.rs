//! The spread state machine.

use serde::Serialize;
use tracing::{debug, warn};

use crate::grouper::Page;
use crate::label::month_year_key;
use crate::leaf::{ViewportMode, spread_for_page};

/// Result of a jump-to-date request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JumpOutcome {
    /// A photo with the exact label was found.
    Exact { page_index: usize, spread: usize },
    /// No exact match; a page starting in the same month was used.
    SameMonth { page_index: usize, spread: usize },
    /// Nothing matched; the position is unchanged.
    NotFound,
}

impl JumpOutcome {
    /// Whether the jump moved to a page.
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Holds the current spread: the number of leaves already turned.
///
/// All transitions saturate; none of them fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookNavigator {
    current_spread: usize,
}

impl BookNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_spread(&self) -> usize {
        self.current_spread
    }

    /// Turn one leaf forward. Returns whether the spread changed.
    pub fn next(&mut self, leaf_count: usize) -> bool {
        if self.current_spread < leaf_count {
            self.current_spread += 1;
            true
        } else {
            false
        }
    }

    /// Turn one leaf back. Returns whether the spread changed.
    pub fn prev(&mut self) -> bool {
        if self.current_spread > 0 {
            self.current_spread -= 1;
            true
        } else {
            false
        }
    }

    /// Whether leaf `leaf_index` has been turned.
    pub fn is_flipped(&self, leaf_index: usize) -> bool {
        self.current_spread > leaf_index
    }

    /// Move to the spread showing the first page that holds `label`.
    ///
    /// Falls back to the first page whose opening photo shares the
    /// label's month and year. A miss leaves the position unchanged.
    pub fn jump_to_date(&mut self, pages: &[Page], label: &str, mode: ViewportMode) -> JumpOutcome {
        if let Some(page_index) = pages.iter().position(|page| page.contains_label(label)) {
            let spread = self.move_to_page(page_index, mode);
            debug!(label, page_index, spread, "Jumped to exact date");
            return JumpOutcome::Exact { page_index, spread };
        }

        let target = month_year_key(label);
        let fallback = label.split(' ').count() >= 3;
        let found = fallback
            .then(|| {
                pages.iter().position(|page| {
                    page.first().is_some_and(|first| {
                        first.label.split(' ').count() >= 3
                            && month_year_key(&first.label) == target
                    })
                })
            })
            .flatten();

        match found {
            Some(page_index) => {
                let spread = self.move_to_page(page_index, mode);
                debug!(label, page_index, spread, "Jumped to month");
                JumpOutcome::SameMonth { page_index, spread }
            }
            None => {
                warn!("No photos found for {label}");
                JumpOutcome::NotFound
            }
        }
    }

    /// Move so that the page at `page_index` is visible.
    pub fn move_to_page(&mut self, page_index: usize, mode: ViewportMode) -> usize {
        self.current_spread = spread_for_page(page_index, mode);
        self.current_spread
    }

    /// Keep the spread within `[0, leaf_count]`.
    pub fn clamp(&mut self, leaf_count: usize) {
        self.current_spread = self.current_spread.min(leaf_count);
    }

    /// Close the book.
    pub fn reset(&mut self) {
        self.current_spread = 0;
    }
}

//! Leaves: the two-sided physical pages of the book.
//!
//! On desktop, page index 0 sits on the inside of the front cover and
//! belongs to no leaf; leaf `i` carries pages `2i+1` (front) and `2i+2`
//! (back). On mobile each page is its own single-sided leaf.

use serde::{Deserialize, Serialize};

use crate::grouper::Page;

/// Viewport class, derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    /// Single column, one page per leaf.
    Mobile,
    /// Double-page spreads.
    Desktop,
}

impl ViewportMode {
    /// Widths at or below `breakpoint` are mobile.
    pub fn from_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Whether this is the mobile layout.
    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }
}

/// A two-sided leaf. Missing pages are empty, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub index: usize,
    pub front: Page,
    pub back: Page,
    /// 1-based number of the front page.
    pub front_page_number: usize,
    /// 1-based number of the back page; `None` on mobile.
    pub back_page_number: Option<usize>,
}

impl Leaf {
    /// Whether the leaf carries a back face with photos.
    pub fn has_back_photos(&self) -> bool {
        !self.back.is_empty()
    }
}

/// Number of leaves for `page_count` pages.
pub fn leaf_count(page_count: usize, mode: ViewportMode) -> usize {
    match mode {
        ViewportMode::Mobile => page_count,
        ViewportMode::Desktop => page_count.saturating_sub(1).div_ceil(2),
    }
}

/// Pair pages into leaves.
pub fn paginate(pages: &[Page], mode: ViewportMode) -> Vec<Leaf> {
    let page_at = |index: usize| pages.get(index).cloned().unwrap_or_default();

    (0..leaf_count(pages.len(), mode))
        .map(|i| match mode {
            ViewportMode::Mobile => Leaf {
                index: i,
                front: page_at(i),
                back: Page::default(),
                front_page_number: i + 1,
                back_page_number: None,
            },
            ViewportMode::Desktop => Leaf {
                index: i,
                front: page_at(2 * i + 1),
                back: page_at(2 * i + 2),
                front_page_number: 2 * i + 2,
                back_page_number: Some(2 * i + 3),
            },
        })
        .collect()
}

/// The spread at which the page with `page_index` is visible.
///
/// Desktop spreads show pages `2s` and `2s+1`; mobile shows page `s`.
pub fn spread_for_page(page_index: usize, mode: ViewportMode) -> usize {
    match mode {
        ViewportMode::Desktop => page_index / 2,
        ViewportMode::Mobile => page_index,
    }
}

/// Stacking order of a leaf. Flipped leaves stack ascending, unflipped
/// leaves descending, so the next leaf to turn is on top.
pub fn stack_order(leaf_index: usize, current_spread: usize, leaf_count: usize) -> usize {
    if current_spread > leaf_index {
        leaf_index + 1
    } else {
        (leaf_count + 1).saturating_sub(leaf_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_breakpoint_is_inclusive() {
        assert_eq!(ViewportMode::from_width(768, 768), ViewportMode::Mobile);
        assert_eq!(ViewportMode::from_width(769, 768), ViewportMode::Desktop);
        assert_eq!(ViewportMode::from_width(320, 768), ViewportMode::Mobile);
    }

    #[test]
    fn test_leaf_count() {
        assert_eq!(leaf_count(0, ViewportMode::Desktop), 0);
        assert_eq!(leaf_count(1, ViewportMode::Desktop), 0);
        assert_eq!(leaf_count(2, ViewportMode::Desktop), 1);
        assert_eq!(leaf_count(3, ViewportMode::Desktop), 1);
        assert_eq!(leaf_count(4, ViewportMode::Desktop), 2);
        assert_eq!(leaf_count(0, ViewportMode::Mobile), 0);
        assert_eq!(leaf_count(5, ViewportMode::Mobile), 5);
    }

    #[test]
    fn test_desktop_page_numbers() {
        let pages = vec![Page::default(); 4];
        let leaves = paginate(&pages, ViewportMode::Desktop);
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].front_page_number, 2);
        assert_eq!(leaves[0].back_page_number, Some(3));
        assert_eq!(leaves[1].front_page_number, 4);
        assert_eq!(leaves[1].back_page_number, Some(5));
    }

    #[test]
    fn test_mobile_leaves_have_no_back() {
        let pages = vec![Page::default(); 3];
        let leaves = paginate(&pages, ViewportMode::Mobile);
        assert_eq!(leaves.len(), 3);
        assert!(leaves.iter().all(|l| l.back_page_number.is_none()));
        assert_eq!(leaves[2].front_page_number, 3);
    }

    #[test]
    fn test_stack_order() {
        // Three leaves, one flipped.
        assert_eq!(stack_order(0, 1, 3), 1);
        assert_eq!(stack_order(1, 1, 3), 3);
        assert_eq!(stack_order(2, 1, 3), 2);
    }

    #[test]
    fn test_spread_for_page() {
        assert_eq!(spread_for_page(0, ViewportMode::Desktop), 0);
        assert_eq!(spread_for_page(3, ViewportMode::Desktop), 1);
        assert_eq!(spread_for_page(3, ViewportMode::Mobile), 3);
    }
}

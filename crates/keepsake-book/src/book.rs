//! The book coordinator.
//!
//! [`Book`] owns everything one open album needs for presentation: the
//! photo list, the layout, the viewport mode, the navigator and the
//! reflow controller. Pages and leaves are derived values, recomputed
//! only when one of their inputs changes.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use keepsake_core::AppResult;
use keepsake_core::config::{BookConfig, GroupOrder};
use keepsake_core::types::PhotoId;

use crate::grid::{Layout, PageGrid};
use crate::grouper::{Page, group_into_pages};
use crate::label::page_header;
use crate::leaf::{Leaf, ViewportMode, paginate, stack_order};
use crate::navigator::{BookNavigator, JumpOutcome};
use crate::photo::BookPhoto;
use crate::reflow::{LayoutReflowController, RelocationOutcome};

/// Which side of the spread a page is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSide {
    Left,
    Right,
    /// Mobile shows one page at a time.
    Single,
}

/// A page as it should be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    pub page_index: usize,
    /// 1-based page number.
    pub number: usize,
    pub side: PageSide,
    pub header: String,
    pub photos: &'a [BookPhoto],
    pub can_prev: bool,
    pub can_next: bool,
}

/// The pages visible at the current spread.
#[derive(Debug, Clone, Serialize)]
pub struct SpreadView<'a> {
    pub spread: usize,
    pub leaf_count: usize,
    pub layout: Layout,
    pub mode: ViewportMode,
    pub left: Option<PageView<'a>>,
    pub right: Option<PageView<'a>>,
}

/// Result of [`Book::request_layout_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutChange {
    /// The layout now in effect.
    pub layout: Layout,
    /// Where the navigator ended up.
    pub relocation: RelocationOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeriveKey {
    revision: u64,
    layout: Layout,
    mode: ViewportMode,
    order: GroupOrder,
}

#[derive(Debug, Default)]
struct Derived {
    key: Option<DeriveKey>,
    pages: Vec<Page>,
    leaves: Vec<Leaf>,
}

/// Presentation state of one open album.
#[derive(Debug)]
pub struct Book {
    config: BookConfig,
    photos: Vec<BookPhoto>,
    revision: u64,
    grid: PageGrid,
    viewport_width: u32,
    mode: ViewportMode,
    navigator: BookNavigator,
    reflow: LayoutReflowController,
    derived: Derived,
}

impl Book {
    /// Create an empty book using the configured layout and viewport.
    pub fn new(config: BookConfig) -> AppResult<Self> {
        let layout = Layout::try_from(config.default_layout)?;
        let viewport_width = config.default_viewport_width;
        let mode = ViewportMode::from_width(viewport_width, config.mobile_breakpoint_px);
        let mut book = Self {
            reflow: LayoutReflowController::from_config(&config),
            config,
            photos: Vec::new(),
            revision: 0,
            grid: PageGrid::new(layout),
            viewport_width,
            mode,
            navigator: BookNavigator::new(),
            derived: Derived::default(),
        };
        book.rederive();
        Ok(book)
    }

    pub fn photos(&self) -> &[BookPhoto] {
        &self.photos
    }

    pub fn pages(&self) -> &[Page] {
        &self.derived.pages
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.derived.leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.derived.leaves.len()
    }

    pub fn layout(&self) -> Layout {
        self.grid.layout()
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn current_spread(&self) -> usize {
        self.navigator.current_spread()
    }

    pub fn is_flipped(&self, leaf_index: usize) -> bool {
        self.navigator.is_flipped(leaf_index)
    }

    /// Stacking order of a leaf at the current spread.
    pub fn stack_order(&self, leaf_index: usize) -> usize {
        stack_order(leaf_index, self.current_spread(), self.leaf_count())
    }

    pub fn find_photo(&self, id: PhotoId) -> Option<&BookPhoto> {
        self.photos.iter().find(|photo| photo.id == id)
    }

    /// Turn one leaf forward.
    pub fn next(&mut self) -> bool {
        self.navigator.next(self.leaf_count())
    }

    /// Turn one leaf back.
    pub fn prev(&mut self) -> bool {
        self.navigator.prev()
    }

    /// Move to the spread holding the given date label.
    pub fn jump_to_date(&mut self, label: &str) -> JumpOutcome {
        self.navigator
            .jump_to_date(&self.derived.pages, label, self.mode)
    }

    /// Cycle the layout and move to the spread that still shows the photo
    /// that was visible before the change.
    ///
    /// The reflow flag stays up until the settle delay after `now`, or the
    /// fallback delay when nothing was visible.
    pub fn request_layout_change(&mut self, now: Instant) -> LayoutChange {
        let anchor = LayoutReflowController::capture_anchor(self.visible_pages());
        let layout = self.grid.advance();
        self.reflow.begin(anchor, now);
        self.rederive();
        let relocation = self
            .reflow
            .complete(&self.derived.pages, &mut self.navigator, self.mode, now);

        info!(layout = %layout, anchor = ?anchor, relocation = ?relocation, "Layout changed");
        LayoutChange { layout, relocation }
    }

    /// Drop the reflow flag once its deadline has passed.
    pub fn settle(&mut self, now: Instant) {
        self.reflow.tick(now);
    }

    /// Whether flip animations should be suppressed.
    pub fn is_reflowing(&self, now: Instant) -> bool {
        self.reflow.is_reflowing(now)
    }

    /// React to a viewport resize. Returns the resulting mode.
    pub fn set_viewport_width(&mut self, width: u32) -> ViewportMode {
        self.viewport_width = width;
        let mode = ViewportMode::from_width(width, self.config.mobile_breakpoint_px);
        if mode != self.mode {
            debug!(width, mode = ?mode, "Viewport mode changed");
            self.mode = mode;
            self.rederive();
        }
        mode
    }

    /// Add photos, keeping the list ordered by capture date.
    pub fn insert_photos(&mut self, photos: impl IntoIterator<Item = BookPhoto>) {
        let before = self.photos.len();
        self.photos.extend(photos);
        if self.photos.len() == before {
            return;
        }
        self.sort_photos();
        self.touch();
    }

    /// Remove a photo. Returns it if it was present.
    pub fn remove_photo(&mut self, id: PhotoId) -> Option<BookPhoto> {
        let position = self.photos.iter().position(|photo| photo.id == id)?;
        let removed = self.photos.remove(position);
        self.touch();
        Some(removed)
    }

    /// Replace the whole photo list, as when an album is loaded.
    pub fn replace_photos(&mut self, photos: Vec<BookPhoto>) {
        self.photos = photos;
        self.sort_photos();
        self.touch();
    }

    /// Update a photo's caption. Returns whether the photo exists.
    pub fn update_description(&mut self, id: PhotoId, description: Option<String>) -> bool {
        match self.photos.iter_mut().find(|photo| photo.id == id) {
            Some(photo) => {
                photo.description = description;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Close the book: no photos, first spread, no reflow in flight.
    pub fn reset(&mut self) {
        self.photos.clear();
        self.navigator.reset();
        self.reflow.reset();
        self.touch();
    }

    /// The pages shown at the current spread.
    pub fn visible_spread(&self) -> SpreadView<'_> {
        let spread = self.current_spread();
        let leaf_count = self.leaf_count();

        let (left, right) = match self.mode {
            ViewportMode::Desktop => {
                let left = if spread == 0 {
                    Some(self.page_view(0, PageSide::Left, false, false))
                } else if spread - 1 < leaf_count {
                    Some(self.page_view(2 * spread, PageSide::Left, true, false))
                } else {
                    None
                };
                let right = self.derived.leaves.get(spread).map(|leaf| {
                    let is_last = spread + 1 == leaf_count && !leaf.has_back_photos();
                    self.page_view(2 * spread + 1, PageSide::Right, false, !is_last)
                });
                (left, right)
            }
            ViewportMode::Mobile => {
                let single = (spread < leaf_count).then(|| {
                    self.page_view(spread, PageSide::Single, spread != 0, spread + 1 != leaf_count)
                });
                (None, single)
            }
        };

        SpreadView {
            spread,
            leaf_count,
            layout: self.layout(),
            mode: self.mode,
            left,
            right,
        }
    }

    fn page_view(&self, page_index: usize, side: PageSide, can_prev: bool, can_next: bool) -> PageView<'_> {
        let (photos, header) = match self.derived.pages.get(page_index) {
            Some(page) => (page.photos(), page_header(page)),
            None => (&[][..], page_header(&Page::default())),
        };
        PageView {
            page_index,
            number: page_index + 1,
            side,
            header,
            photos,
            can_prev,
            can_next,
        }
    }

    fn visible_pages(&self) -> Vec<&Page> {
        let spread = self.current_spread();
        let indices = match self.mode {
            ViewportMode::Desktop => vec![2 * spread, 2 * spread + 1],
            ViewportMode::Mobile => vec![spread],
        };
        indices
            .into_iter()
            .filter_map(|index| self.derived.pages.get(index))
            .collect()
    }

    fn sort_photos(&mut self) {
        self.photos.sort_by_key(|photo| photo.captured_on);
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.rederive();
    }

    fn rederive(&mut self) {
        let key = DeriveKey {
            revision: self.revision,
            layout: self.grid.layout(),
            mode: self.mode,
            order: self.config.group_order,
        };
        if self.derived.key == Some(key) {
            return;
        }

        let pages = group_into_pages(&self.photos, key.layout.capacity(), key.order);
        let leaves = paginate(&pages, key.mode);
        debug!(
            photos = self.photos.len(),
            pages = pages.len(),
            leaves = leaves.len(),
            "Book recomputed"
        );
        self.derived = Derived {
            key: Some(key),
            pages,
            leaves,
        };
        self.navigator.clamp(self.derived.leaves.len());
    }
}

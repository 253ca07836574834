//! # keepsake-book
//!
//! The photo book engine. A flat, date-ordered photo list is grouped into
//! month buckets, split into fixed-capacity pages, paired into two-sided
//! leaves, and navigated spread by spread.
//!
//! ## Modules
//!
//! - `label` — date labels and month-year keys
//! - `grid` — page capacity (1, 6, 9) and its cycle
//! - `grouper` — month grouping and page splitting
//! - `leaf` — leaves, viewport mode, stacking order
//! - `navigator` — the spread state machine
//! - `reflow` — anchor-preserving layout changes
//! - `book` — the memoized coordinator tying the above together
//!
//! Everything here is synchronous and free of I/O; time enters only as
//! `Instant` arguments so callers control the clock.

pub mod book;
pub mod grid;
pub mod grouper;
pub mod label;
pub mod leaf;
pub mod navigator;
pub mod photo;
pub mod reflow;

pub use book::{Book, LayoutChange, PageSide, PageView, SpreadView};
pub use grid::{Layout, PageGrid};
pub use grouper::{Page, group_into_pages};
pub use label::{format_label, month_year_key, page_header, parse_label};
pub use leaf::{Leaf, ViewportMode, leaf_count, paginate, spread_for_page, stack_order};
pub use navigator::{BookNavigator, JumpOutcome};
pub use photo::BookPhoto;
pub use reflow::{LayoutReflowController, RelocationOutcome};

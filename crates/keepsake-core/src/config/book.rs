//! Book presentation configuration.

use serde::{Deserialize, Serialize};

/// Order in which month groups are laid out in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrder {
    /// Groups appear in the order their first photo is encountered.
    #[default]
    FirstSeen,
    /// Groups are sorted by (year, month).
    Chronological,
}

/// Tunables for pagination, viewport detection, and reflow timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Photos per page when an album is first opened (1, 6, or 9).
    #[serde(default = "default_layout")]
    pub default_layout: u8,
    /// Viewports at most this wide are treated as mobile.
    #[serde(default = "default_breakpoint")]
    pub mobile_breakpoint_px: u32,
    /// Delay before the reflow flag clears after a relocation.
    #[serde(default = "default_settle")]
    pub reflow_settle_ms: u64,
    /// Delay before the reflow flag clears when there was no anchor.
    #[serde(default = "default_fallback")]
    pub reflow_fallback_ms: u64,
    /// Month group ordering.
    #[serde(default)]
    pub group_order: GroupOrder,
    /// Viewport width assumed by the terminal browser.
    #[serde(default = "default_viewport_width")]
    pub default_viewport_width: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            default_layout: default_layout(),
            mobile_breakpoint_px: default_breakpoint(),
            reflow_settle_ms: default_settle(),
            reflow_fallback_ms: default_fallback(),
            group_order: GroupOrder::default(),
            default_viewport_width: default_viewport_width(),
        }
    }
}

fn default_layout() -> u8 {
    6
}

fn default_breakpoint() -> u32 {
    768
}

fn default_settle() -> u64 {
    100
}

fn default_fallback() -> u64 {
    300
}

fn default_viewport_width() -> u32 {
    1280
}

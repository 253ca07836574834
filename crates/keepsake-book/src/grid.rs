//! Page capacity policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use keepsake_core::AppError;

/// Photos-per-page layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Layout {
    /// One photo per page.
    One,
    /// Two columns by three rows.
    #[default]
    Six,
    /// Three by three.
    Nine,
}

impl Layout {
    /// Maximum photos on a page.
    pub fn capacity(self) -> usize {
        match self {
            Self::One => 1,
            Self::Six => 6,
            Self::Nine => 9,
        }
    }

    /// The layout chosen by the next toggle: 6 → 9 → 1 → 6.
    pub fn next(self) -> Self {
        match self {
            Self::Six => Self::Nine,
            Self::Nine => Self::One,
            Self::One => Self::Six,
        }
    }

    /// Grid shape as `(columns, rows)`.
    pub fn shape(self) -> (usize, usize) {
        match self {
            Self::One => (1, 1),
            Self::Six => (2, 3),
            Self::Nine => (3, 3),
        }
    }
}

impl TryFrom<u8> for Layout {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            6 => Ok(Self::Six),
            9 => Ok(Self::Nine),
            other => Err(AppError::validation(format!(
                "Unsupported layout {other}; expected 1, 6 or 9"
            ))),
        }
    }
}

impl From<Layout> for u8 {
    fn from(layout: Layout) -> Self {
        layout.capacity() as u8
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.capacity())
    }
}

/// The active layout of an open book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageGrid {
    layout: Layout,
}

impl PageGrid {
    /// Start with the given layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Current layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Current capacity.
    pub fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// Move to the next layout in the cycle and return it.
    pub fn advance(&mut self) -> Layout {
        self.layout = self.layout.next();
        self.layout
    }
}

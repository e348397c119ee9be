//! Orientation-independent coordinates.
//!
//! `U` is the flow axis (where items are placed one after another) and `V` is the cross axis
//! (where completed lines stack). For [`Orientation::Horizontal`] `U` is the width axis; for
//! [`Orientation::Vertical`] it is the height axis.

use crate::geometry::Orientation;
use crate::geometry::Rect;
use crate::geometry::Size;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UvMeasure {
    pub u: f64,
    pub v: f64,
}

impl UvMeasure {
    /// "No measure yet".
    pub const ZERO: Self = Self { u: 0.0, v: 0.0 };

    /// Maps a `(width, height)` pair onto the flow/cross axes of `orientation`.
    pub fn new(orientation: Orientation, width: f64, height: f64) -> Self {
        match orientation {
            Orientation::Horizontal => Self {
                u: width,
                v: height,
            },
            Orientation::Vertical => Self {
                u: height,
                v: width,
            },
        }
    }

    pub fn from_size(orientation: Orientation, size: Size) -> Self {
        Self::new(orientation, size.width, size.height)
    }

    pub fn to_size(self, orientation: Orientation) -> Size {
        match orientation {
            Orientation::Horizontal => Size::new(self.u, self.v),
            Orientation::Vertical => Size::new(self.v, self.u),
        }
    }
}

/// Extent of a rectangle along the cross axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UvBounds {
    pub v_min: f64,
    pub v_max: f64,
}

impl UvBounds {
    pub fn new(orientation: Orientation, rect: Rect) -> Self {
        match orientation {
            Orientation::Horizontal => Self {
                v_min: rect.top(),
                v_max: rect.bottom(),
            },
            Orientation::Vertical => Self {
                v_min: rect.left(),
                v_max: rect.right(),
            },
        }
    }
}

/// Builds a real rectangle from a flow-space origin and extent.
pub(crate) fn uv_rect(orientation: Orientation, origin: UvMeasure, extent: UvMeasure) -> Rect {
    match orientation {
        Orientation::Horizontal => Rect::new(origin.u, origin.v, extent.u, extent.v),
        Orientation::Vertical => Rect::new(origin.v, origin.u, extent.v, extent.u),
    }
}

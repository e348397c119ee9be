//! `ratatui-flow-core` contains the layout engines behind `ratatui-flow`, free of any terminal or
//! GUI toolkit.
//!
//! The main entry point is [`wrap::WrapLayout`], a virtualizing flow layout that packs a
//! (possibly huge) collection of items into rows or columns. It runs as two passes driven by a
//! host:
//!
//! - `measure` walks the items in order, asks the host for sizes it has not cached yet, and
//!   stops as soon as the lines it builds leave the host's realization window.
//! - `arrange` walks the same cached sizes and asks the host to place only the items that
//!   intersect the window.
//!
//! The host side is the [`host::VirtualizingHost`] trait. Per-context caches live in
//! [`state::WrapLayoutState`], which the host owns and hands to every pass.
//!
//! [`tab_strip::TabStripLayout`] is a much simpler, non-virtualized panel for tab headers that
//! uses the same host trait.
//!
//! ## Design goals
//!
//! - Synchronous, single-threaded passes. No async runtime.
//! - Orientation-independent math: everything is computed on flow (`U`) / cross (`V`) axes, see
//!   [`uv`].
//! - Explicit errors for host contract violations instead of panics, see [`error::LayoutError`].
pub mod error;
pub mod geometry;
pub mod host;
pub mod state;
pub mod tab_strip;
pub mod uv;
pub mod wrap;

pub use error::LayoutError;
pub use geometry::Orientation;
pub use geometry::Rect;
pub use geometry::Size;
pub use geometry::Thickness;
pub use host::VirtualizingHost;
pub use state::WrapLayoutState;
pub use tab_strip::TabStripLayout;
pub use wrap::WrapLayout;
pub use wrap::WrapLayoutOptions;

//! Virtualized flow layout widgets for ratatui.
//!
//! [`wrap_view::WrapView`] drives the wrap layout engine from `ratatui-flow-core` over terminal
//! cells: items are measured and placed only around the visible window, and the view keeps the
//! scroll state. [`tab_strip::TabStrip`] renders a one-row tab header with the tab strip layout.

pub use ratatui_flow_core as core;

pub mod theme;

pub mod render;
pub mod viewport;

pub mod tab_strip;
pub mod wrap_view;

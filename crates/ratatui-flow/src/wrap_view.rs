use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size as CellSize;
use ratatui::style::Style;
use ratatui_flow_core::LayoutError;
use ratatui_flow_core::Orientation;
use ratatui_flow_core::Size;
use ratatui_flow_core::VirtualizingHost;
use ratatui_flow_core::WrapLayout;
use ratatui_flow_core::WrapLayoutOptions;
use ratatui_flow_core::WrapLayoutState;
use tracing::debug;

use crate::render;
use crate::theme::Theme;
use crate::viewport::ViewportState;

/// Options for [`WrapView`].
///
/// Spacing and padding in `layout` are in terminal cells.
#[derive(Clone, Debug)]
pub struct WrapViewOptions {
    pub layout: WrapLayoutOptions,
    /// Extra cells realized before and after the viewport along the scrolling axis.
    pub overscan: u16,
    pub show_scrollbar: bool,
    pub style: Style,
    pub scrollbar_style: Style,
}

impl Default for WrapViewOptions {
    fn default() -> Self {
        Self {
            layout: WrapLayoutOptions {
                horizontal_spacing: 1.0,
                ..Default::default()
            },
            overscan: 2,
            show_scrollbar: true,
            style: Style::default(),
            scrollbar_style: Style::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WrapItemContext {
    pub index: usize,
    /// Placement in content coordinates, before scrolling and clipping.
    pub bounds: ratatui_flow_core::Rect,
    /// Columns cut off on the left by the viewport.
    pub clip_left: u32,
    /// Rows cut off on the top by the viewport.
    pub clip_top: u32,
}

/// A scrollable, virtualized wrap panel.
///
/// Items are sized through a caller-supplied sizer and laid out with [`WrapLayout`]. Only the
/// items around the viewport are sized and handed to the render callback, so collections of
/// millions of items stay cheap. The scrollable extent grows as the view scrolls, since items
/// past the viewport are not measured until they come close.
pub struct WrapView {
    pub viewport: ViewportState,
    options: WrapViewOptions,
    layout: WrapLayout,
    state: WrapLayoutState,
    sizer: Arc<dyn Fn(usize) -> CellSize + Send + Sync>,
    count: Option<usize>,
    placements: Vec<(usize, ratatui_flow_core::Rect)>,
}

impl Default for WrapView {
    fn default() -> Self {
        let options = WrapViewOptions::default();
        let layout = WrapLayout::with_options(options.layout);
        let state = layout.initialize_for_context();
        Self {
            viewport: ViewportState::default(),
            options,
            layout,
            state,
            sizer: Arc::new(|_| CellSize::new(1, 1)),
            count: None,
            placements: Vec::new(),
        }
    }
}

impl WrapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WrapViewOptions) -> Self {
        let mut v = Self::default();
        v.set_options(options);
        v
    }

    pub fn options(&self) -> &WrapViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: WrapViewOptions) {
        if options.layout.orientation != self.options.layout.orientation {
            self.viewport.x = 0;
            self.viewport.y = 0;
        }
        self.layout.set_options(options.layout);
        self.options = options;
    }

    pub fn orientation(&self) -> Orientation {
        self.options.layout.orientation
    }

    pub fn set_item_sizer(&mut self, f: impl Fn(usize) -> CellSize + Send + Sync + 'static) {
        self.sizer = Arc::new(f);
        self.state.invalidate();
    }

    pub fn set_fixed_item_size(&mut self, width: u16, height: u16) {
        self.set_item_sizer(move |_| CellSize::new(width, height));
    }

    /// Drops every cached item size. Call after items changed without the count changing.
    pub fn invalidate_items(&mut self) {
        self.state.invalidate();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.viewport.scroll_by(self.orientation(), delta);
    }

    pub fn page_forward(&mut self) {
        self.viewport.page_forward(self.orientation());
    }

    pub fn page_back(&mut self) {
        self.viewport.page_back(self.orientation());
    }

    pub fn to_start(&mut self) {
        self.viewport.to_start(self.orientation());
    }

    pub fn to_end(&mut self) {
        self.viewport.to_end(self.orientation());
    }

    /// Items placed by the last render, in content coordinates.
    pub fn placements(&self) -> &[(usize, ratatui_flow_core::Rect)] {
        &self.placements
    }

    pub fn render<F>(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        count: usize,
        mut render_item: F,
    ) -> Result<(), LayoutError>
    where
        F: FnMut(Rect, WrapItemContext, &mut Buffer, &Theme),
    {
        if area.width == 0 || area.height == 0 {
            return Ok(());
        }

        let orientation = self.orientation();
        let (content_area, scrollbar_area) =
            split_scrollbar(area, orientation, self.options.show_scrollbar);
        self.viewport
            .set_viewport(content_area.width, content_area.height);

        if self.count != Some(count) {
            self.state.invalidate();
            self.count = Some(count);
        }

        let available = match orientation {
            Orientation::Horizontal => Size::new(content_area.width as f64, f64::INFINITY),
            Orientation::Vertical => Size::new(f64::INFINITY, content_area.height as f64),
        };

        self.placements.clear();
        let mut host = CellHost {
            count,
            sizer: self.sizer.as_ref(),
            window: self
                .viewport
                .realization_rect(orientation, self.options.overscan),
            placements: &mut self.placements,
        };

        let measured = self.layout.measure(&mut host, &mut self.state, available)?;
        let padding = self.options.layout.padding;
        let mut content_w = to_cells(measured.width + padding.horizontal());
        let mut content_h = to_cells(measured.height + padding.vertical());
        match orientation {
            Orientation::Horizontal => content_w = content_w.max(content_area.width as u32),
            Orientation::Vertical => content_h = content_h.max(content_area.height as u32),
        }
        self.viewport.set_content(content_w, content_h);

        // Clamping may have moved the window back; everything before it is measured already.
        host.window = self
            .viewport
            .realization_rect(orientation, self.options.overscan);
        self.layout.arrange(&mut host, &mut self.state, available)?;

        let base_style = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        buf.set_style(content_area, base_style);

        let visible = ratatui_flow_core::Rect::new(
            self.viewport.x as f64,
            self.viewport.y as f64,
            content_area.width as f64,
            content_area.height as f64,
        );
        let mut rendered = 0usize;
        for &(index, bounds) in &self.placements {
            if !bounds.intersects(&visible) {
                continue;
            }
            let Some((item_area, clip_left, clip_top)) =
                project(bounds, &self.viewport, content_area)
            else {
                continue;
            };
            let ctx = WrapItemContext {
                index,
                bounds,
                clip_left,
                clip_top,
            };
            render_item(item_area, ctx, buf, theme);
            rendered += 1;
        }

        if let Some(sb) = scrollbar_area {
            render::render_scrollbar(
                sb,
                buf,
                &self.viewport,
                orientation,
                self.options.scrollbar_style,
            );
        }

        debug!(
            count,
            placed = self.placements.len(),
            rendered,
            offset = self.viewport.offset(orientation),
            "wrap view rendered"
        );
        Ok(())
    }
}

/// Cell size of a `[label]` chip.
pub fn chip_size(label: &str) -> CellSize {
    CellSize::new(render::label_width(label).saturating_add(2), 1)
}

/// Draws `[label]` into a chip area handed out by [`WrapView::render`].
///
/// A chip stretched past its label (the last item of a view fills its line) keeps the label
/// width.
pub fn render_chip(area: Rect, ctx: &WrapItemContext, buf: &mut Buffer, label: &str, style: Style) {
    if ctx.clip_top > 0 || area.height == 0 {
        return;
    }
    let chip = format!("[{label}]");
    render::render_str_clipped(area.x, area.y, ctx.clip_left, area.width, buf, &chip, style);
}

struct CellHost<'a> {
    count: usize,
    sizer: &'a (dyn Fn(usize) -> CellSize + Send + Sync),
    window: ratatui_flow_core::Rect,
    placements: &'a mut Vec<(usize, ratatui_flow_core::Rect)>,
}

impl VirtualizingHost for CellHost<'_> {
    fn item_count(&self) -> usize {
        self.count
    }

    fn realization_rect(&self) -> ratatui_flow_core::Rect {
        self.window
    }

    fn measure_element(&mut self, index: usize, _available: Size) -> Result<Size, LayoutError> {
        if index >= self.count {
            return Err(LayoutError::ElementUnavailable { index });
        }
        let size = (self.sizer)(index);
        Ok(Size::new(size.width as f64, size.height as f64))
    }

    fn arrange_element(
        &mut self,
        index: usize,
        rect: ratatui_flow_core::Rect,
    ) -> Result<(), LayoutError> {
        self.placements.push((index, rect));
        Ok(())
    }
}

fn split_scrollbar(area: Rect, orientation: Orientation, show: bool) -> (Rect, Option<Rect>) {
    match orientation {
        Orientation::Horizontal if show && area.width >= 2 => (
            Rect::new(area.x, area.y, area.width - 1, area.height),
            Some(Rect::new(area.x + area.width - 1, area.y, 1, area.height)),
        ),
        Orientation::Vertical if show && area.height >= 2 => (
            Rect::new(area.x, area.y, area.width, area.height - 1),
            Some(Rect::new(area.x, area.y + area.height - 1, area.width, 1)),
        ),
        _ => (area, None),
    }
}

/// Maps a content-space placement onto the screen, returning the visible cells and how much was
/// cut off on the left and top.
fn project(
    bounds: ratatui_flow_core::Rect,
    viewport: &ViewportState,
    area: Rect,
) -> Option<(Rect, u32, u32)> {
    let left = bounds.left().round() as i64 - viewport.x as i64;
    let top = bounds.top().round() as i64 - viewport.y as i64;
    let right = bounds.right().round() as i64 - viewport.x as i64;
    let bottom = bounds.bottom().round() as i64 - viewport.y as i64;

    let vis_left = left.max(0);
    let vis_top = top.max(0);
    let vis_right = right.min(area.width as i64);
    let vis_bottom = bottom.min(area.height as i64);
    if vis_right <= vis_left || vis_bottom <= vis_top {
        return None;
    }

    Some((
        Rect::new(
            area.x + vis_left as u16,
            area.y + vis_top as u16,
            (vis_right - vis_left) as u16,
            (vis_bottom - vis_top) as u16,
        ),
        (vis_left - left) as u32,
        (vis_top - top) as u32,
    ))
}

fn to_cells(value: f64) -> u32 {
    value.max(0.0).ceil().min(u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_flow_core::Thickness;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn view_without_scrollbar() -> WrapView {
        WrapView::with_options(WrapViewOptions {
            show_scrollbar: false,
            overscan: 0,
            ..Default::default()
        })
    }

    #[test]
    fn chips_wrap_into_rows() {
        let labels: Vec<String> = (0..10).map(|i| format!("a{i}")).collect();
        let mut view = view_without_scrollbar();
        let sizer_labels = labels.clone();
        view.set_item_sizer(move |i| chip_size(&sizer_labels[i]));

        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        let mut seen = Vec::new();
        view.render(area, &mut buf, &Theme::default(), labels.len(), |a, ctx, buf, _| {
            seen.push(ctx.index);
            render_chip(a, &ctx, buf, &labels[ctx.index], Style::default());
        })
        .unwrap();

        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert_eq!(row(&buf, 0), "[a0] [a1] [a2] [a3] ");
        assert_eq!(row(&buf, 1), "[a4] [a5] [a6] [a7] ");
        assert_eq!(row(&buf, 2), "[a8] [a9]           ");
        // The last chip fills the rest of its line.
        assert_eq!(view.placements()[9].1.width, 15.0);
    }

    #[test]
    fn scrolling_renders_later_lines_only() {
        let mut view = view_without_scrollbar();
        view.set_fixed_item_size(4, 1);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);

        view.scroll_by(5);
        let mut seen = Vec::new();
        view.render(area, &mut buf, &Theme::default(), 100, |_, ctx, _, _| {
            seen.push(ctx.index)
        })
        .unwrap();

        assert_eq!(view.viewport.y, 5);
        assert_eq!(seen, (20..32).collect::<Vec<_>>());
    }

    #[test]
    fn to_end_clamps_after_measuring_everything() {
        let mut view = view_without_scrollbar();
        view.set_fixed_item_size(4, 1);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);

        view.to_end();
        let mut seen = Vec::new();
        view.render(area, &mut buf, &Theme::default(), 100, |_, ctx, _, _| {
            seen.push(ctx.index)
        })
        .unwrap();

        assert_eq!(view.viewport.content_h, 25);
        assert_eq!(view.viewport.y, 22);
        assert_eq!(seen, (88..100).collect::<Vec<_>>());
        assert_eq!(view.viewport.percent(Orientation::Horizontal), Some(100));
    }

    #[test]
    fn vertical_orientation_fills_columns() {
        let mut view = WrapView::with_options(WrapViewOptions {
            layout: WrapLayoutOptions {
                horizontal_spacing: 1.0,
                orientation: Orientation::Vertical,
                ..Default::default()
            },
            show_scrollbar: false,
            overscan: 0,
            ..Default::default()
        });
        view.set_fixed_item_size(3, 1);
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);

        let mut areas = Vec::new();
        view.render(area, &mut buf, &Theme::default(), 100, |a, ctx, _, _| {
            areas.push((ctx.index, a))
        })
        .unwrap();

        assert_eq!(areas[0], (0, Rect::new(0, 0, 3, 1)));
        assert_eq!(areas[1], (1, Rect::new(0, 1, 3, 1)));
        assert_eq!(areas[2], (2, Rect::new(4, 0, 3, 1)));
        // The third column is cut by the right edge.
        assert_eq!(areas[4], (4, Rect::new(8, 0, 2, 1)));
    }

    #[test]
    fn padding_offsets_items_and_grows_content() {
        let mut view = WrapView::with_options(WrapViewOptions {
            layout: WrapLayoutOptions {
                padding: Thickness::new(1.0, 1.0, 1.0, 1.0),
                ..Default::default()
            },
            show_scrollbar: false,
            ..Default::default()
        });
        view.set_fixed_item_size(2, 1);
        let area = Rect::new(0, 0, 8, 5);
        let mut buf = Buffer::empty(area);

        let mut first = None;
        view.render(area, &mut buf, &Theme::default(), 3, |a, ctx, _, _| {
            if ctx.index == 0 {
                first = Some(a);
            }
        })
        .unwrap();

        assert_eq!(first, Some(Rect::new(1, 1, 2, 1)));
        assert_eq!(view.viewport.content_h, 4);
    }

    #[test]
    fn count_change_drops_cached_sizes() {
        let mut view = view_without_scrollbar();
        view.set_fixed_item_size(4, 1);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);

        view.render(area, &mut buf, &Theme::default(), 10, |_, _, _, _| {})
            .unwrap();
        assert!(
            view.render(area, &mut buf, &Theme::default(), 5, |_, _, _, _| {})
                .is_ok()
        );
        assert_eq!(view.placements().len(), 5);
    }

    #[test]
    fn chips_wider_than_the_view_still_render() {
        let mut view = WrapView::with_options(WrapViewOptions {
            overscan: 0,
            ..Default::default()
        });
        view.set_fixed_item_size(10, 1);
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);

        let mut seen = Vec::new();
        view.render(area, &mut buf, &Theme::default(), 5, |a, ctx, _, _| {
            assert_eq!(a.width, 4);
            seen.push(ctx.index);
        })
        .unwrap();

        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(view.placements().len(), 4);
        assert_eq!(view.viewport.content_h, 4);
    }

    #[test]
    fn scrollbar_takes_last_column() {
        let mut view = WrapView::new();
        view.set_fixed_item_size(4, 1);
        let area = Rect::new(0, 0, 11, 2);
        let mut buf = Buffer::empty(area);

        let mut right_edge = 0;
        view.render(area, &mut buf, &Theme::default(), 50, |a, _, _, _| {
            right_edge = right_edge.max(a.x + a.width);
        })
        .unwrap();

        assert!(right_edge <= 10);
        assert_eq!(buf[(10, 0)].symbol(), "█");
    }
}

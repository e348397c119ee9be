use ratatui_flow_core::Orientation;

/// Scroll position and extents of a scrollable area, in terminal cells.
///
/// For wrap layouts only the cross axis scrolls: `y` for [`Orientation::Horizontal`], `x` for
/// [`Orientation::Vertical`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub x: u32,
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_w: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        self.viewport_w = w;
        self.viewport_h = h;
    }

    pub fn set_content(&mut self, w: u32, h: u32) {
        self.content_w = w;
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
        self.x = self.x.min(self.max_x());
    }

    /// Scrolls along the cross axis of `orientation`.
    ///
    /// Only the lower end is clamped. Virtualized content is measured lazily, so the far end is
    /// not known until the next render measures up to the new offset.
    pub fn scroll_by(&mut self, orientation: Orientation, delta: i32) {
        let offset = self.offset_mut(orientation);
        *offset = (*offset as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32;
    }

    pub fn page_forward(&mut self, orientation: Orientation) {
        let page = self.page(orientation);
        self.scroll_by(orientation, page);
    }

    pub fn page_back(&mut self, orientation: Orientation) {
        let page = self.page(orientation);
        self.scroll_by(orientation, -page);
    }

    pub fn to_start(&mut self, orientation: Orientation) {
        *self.offset_mut(orientation) = 0;
    }

    /// Jumps past the end; the next render clamps once the full extent is measured.
    pub fn to_end(&mut self, orientation: Orientation) {
        *self.offset_mut(orientation) = u32::MAX;
    }

    pub fn offset(&self, orientation: Orientation) -> u32 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }

    pub fn percent(&self, orientation: Orientation) -> Option<u8> {
        let (offset, viewport, content) = match orientation {
            Orientation::Horizontal => (self.y, self.viewport_h, self.content_h),
            Orientation::Vertical => (self.x, self.viewport_w, self.content_w),
        };
        if content == 0 || viewport == 0 || content <= viewport as u32 {
            return None;
        }
        let visible_end = offset.saturating_add(viewport as u32) as f64;
        let pct = (visible_end / content as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }

    /// The visible window in content coordinates, grown by `overscan` cells on both sides of
    /// the cross axis.
    pub fn realization_rect(
        &self,
        orientation: Orientation,
        overscan: u16,
    ) -> ratatui_flow_core::Rect {
        let overscan = overscan as f64;
        let (mut x, mut y) = (self.x as f64, self.y as f64);
        let (mut w, mut h) = (self.viewport_w as f64, self.viewport_h as f64);
        match orientation {
            Orientation::Horizontal => {
                y -= overscan;
                h += 2.0 * overscan;
            }
            Orientation::Vertical => {
                x -= overscan;
                w += 2.0 * overscan;
            }
        }
        ratatui_flow_core::Rect::new(x, y, w, h)
    }

    fn page(&self, orientation: Orientation) -> i32 {
        let viewport = match orientation {
            Orientation::Horizontal => self.viewport_h,
            Orientation::Vertical => self.viewport_w,
        };
        viewport.saturating_sub(1).max(1) as i32
    }

    fn offset_mut(&mut self, orientation: Orientation) -> &mut u32 {
        match orientation {
            Orientation::Horizontal => &mut self.y,
            Orientation::Vertical => &mut self.x,
        }
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }

    fn max_x(&self) -> u32 {
        self.content_w.saturating_sub(self.viewport_w as u32)
    }
}

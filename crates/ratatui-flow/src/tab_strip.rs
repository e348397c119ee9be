use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_flow_core::LayoutError;
use ratatui_flow_core::Size;
use ratatui_flow_core::TabStripLayout;
use ratatui_flow_core::VirtualizingHost;

use crate::render;
use crate::theme::Theme;

#[derive(Clone, Debug, Default)]
pub struct TabStripOptions {
    /// Falls back to [`Theme::text_muted`] when left at the default style.
    pub style: Style,
    /// Falls back to [`Theme::tab_active`] when left at the default style.
    pub active_style: Style,
}

/// A one-row tab header bar. Each title gets at most an equal share of the width.
#[derive(Clone, Debug, Default)]
pub struct TabStrip {
    titles: Vec<String>,
    selected: Option<usize>,
    options: TabStripOptions,
    layout: TabStripLayout,
}

impl TabStrip {
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            titles,
            ..Self::default()
        }
    }

    pub fn with_options(titles: Vec<String>, options: TabStripOptions) -> Self {
        Self {
            titles,
            options,
            ..Self::default()
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn set_titles(&mut self, titles: Vec<String>) {
        self.titles = titles;
        self.selected = clamp_selected(self.selected, self.titles.len());
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, selected: Option<usize>) {
        self.selected = clamp_selected(selected, self.titles.len());
    }

    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
    ) -> Result<(), LayoutError> {
        if area.width == 0 || area.height == 0 {
            return Ok(());
        }

        let mut host = TabHost {
            titles: &self.titles,
            placed: Vec::with_capacity(self.titles.len()),
        };
        let available = Size::new(area.width as f64, area.height as f64);
        let measured = self.layout.measure(&mut host, available)?;
        self.layout.arrange(&mut host, measured)?;

        let style = pick(self.options.style, theme.text_muted);
        let active_style = pick(self.options.active_style, theme.tab_active);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);

        for (index, rect) in host.placed {
            let x = rect.x.floor() as u16;
            if x >= area.width {
                break;
            }
            let width = (rect.width.floor() as u16).min(area.width - x);
            let style = if self.selected == Some(index) {
                active_style
            } else {
                style
            };
            let cell = Rect::new(area.x + x, area.y, width, 1);
            buf.set_style(cell, style);
            let label = format!(" {} ", self.titles[index]);
            render::render_str_clipped(cell.x, cell.y, 0, width, buf, &label, style);
        }
        Ok(())
    }
}

struct TabHost<'a> {
    titles: &'a [String],
    placed: Vec<(usize, ratatui_flow_core::Rect)>,
}

impl VirtualizingHost for TabHost<'_> {
    fn item_count(&self) -> usize {
        self.titles.len()
    }

    fn realization_rect(&self) -> ratatui_flow_core::Rect {
        ratatui_flow_core::Rect::default()
    }

    fn measure_element(&mut self, index: usize, available: Size) -> Result<Size, LayoutError> {
        let title = self
            .titles
            .get(index)
            .ok_or(LayoutError::ElementUnavailable { index })?;
        let wanted = render::label_width(title).saturating_add(2) as f64;
        Ok(Size::new(
            wanted.min(available.width.floor()),
            available.height.min(1.0),
        ))
    }

    fn arrange_element(
        &mut self,
        index: usize,
        rect: ratatui_flow_core::Rect,
    ) -> Result<(), LayoutError> {
        self.placed.push((index, rect));
        Ok(())
    }
}

fn pick(style: Style, fallback: Style) -> Style {
    if style == Style::default() {
        fallback
    } else {
        style
    }
}

fn clamp_selected(selected: Option<usize>, count: usize) -> Option<usize> {
    match selected {
        Some(i) if count > 0 => Some(i.min(count - 1)),
        _ => None,
    }
}

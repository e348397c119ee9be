use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui_flow_core::Orientation;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportState;

const TAB_COLS: usize = 4;

/// Draws a one-cell scrollbar for the axis `orientation` scrolls along: a vertical bar for
/// horizontal flow, a horizontal bar for vertical flow.
pub fn render_scrollbar(
    area: Rect,
    buf: &mut Buffer,
    state: &ViewportState,
    orientation: Orientation,
    style: Style,
) {
    buf.set_style(area, style);
    let (track, offset, viewport, content) = match orientation {
        Orientation::Horizontal => (area.height, state.y, state.viewport_h, state.content_h),
        Orientation::Vertical => (area.width, state.x, state.viewport_w, state.content_w),
    };
    if track == 0 {
        return;
    }

    let cell = |i: u16| match orientation {
        Orientation::Horizontal => (area.x, area.y + i),
        Orientation::Vertical => (area.x + i, area.y),
    };

    if content <= viewport as u32 || content == 0 {
        for i in 0..track {
            let (x, y) = cell(i);
            buf.set_stringn(x, y, " ", 1, style);
        }
        return;
    }

    let track_len = track as f64;
    let thumb_len = ((viewport as f64 / content as f64) * track_len)
        .round()
        .clamp(1.0, track_len) as u16;

    let max_offset = content.saturating_sub(viewport as u32).max(1) as f64;
    let thumb_start = ((offset as f64 / max_offset) * (track_len - thumb_len as f64))
        .round()
        .clamp(0.0, (track_len - thumb_len as f64).max(0.0)) as u16;

    let thumb = match orientation {
        Orientation::Horizontal => "█",
        Orientation::Vertical => "▀",
    };
    for i in 0..track {
        let ch = if i >= thumb_start && i < thumb_start + thumb_len {
            thumb
        } else {
            " "
        };
        let (x, y) = cell(i);
        buf.set_stringn(x, y, ch, 1, style);
    }
}

/// Display width of a one-line label, tabs expanded to four columns.
pub fn label_width(input: &str) -> u16 {
    let cols: usize = input
        .chars()
        .map(|ch| {
            if ch == '\t' {
                TAB_COLS
            } else {
                UnicodeWidthChar::width(ch).unwrap_or(0)
            }
        })
        .sum();
    cols.min(u16::MAX as usize) as u16
}

/// Renders `input` starting at display column `start_col`, writing at most `max_cols` cells.
///
/// Wide characters that straddle `start_col` or the right edge are dropped rather than split.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    if max_cols == 0 {
        return;
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut dx = 0u16;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let (symbol, w): (&str, usize) = if ch == '\t' {
            (" ", TAB_COLS)
        } else {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            let symbol: &str = ch.encode_utf8(&mut tmp);
            (symbol, w)
        };

        if col + w <= start_col {
            col += w;
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            return;
        }

        // Tabs spread over several blank cells; wide glyphs own the first cell and blank the rest.
        for i in 0..w {
            if let Some(cell) = buf.cell_mut((x + dx, y)) {
                cell.set_style(style);
                cell.set_symbol(if i == 0 || ch == '\t' { symbol } else { "" });
            }
            dx += 1;
        }
        out_cols += w;
        col += w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn label_width_counts_wide_chars_and_tabs() {
        assert_eq!(label_width("abc"), 3);
        assert_eq!(label_width("你好"), 4);
        assert_eq!(label_width("a\tb"), 6);
    }

    #[test]
    fn clipped_label_skips_leading_columns() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        render_str_clipped(0, 0, 2, 3, &mut buf, "abcdef", Style::default());
        assert_eq!(row(&buf, 0), "cde   ");
    }

    #[test]
    fn clipped_label_drops_straddling_wide_char() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        render_str_clipped(0, 0, 1, 4, &mut buf, "你好", Style::default());
        assert_eq!(row(&buf, 0), "好  ");
    }

    #[test]
    fn scrollbar_thumb_tracks_offset() {
        let mut state = ViewportState::default();
        state.set_viewport(10, 4);
        state.set_content(10, 8);
        state.y = 4;
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 4));
        render_scrollbar(
            Rect::new(0, 0, 1, 4),
            &mut buf,
            &state,
            Orientation::Horizontal,
            Style::default(),
        );
        let column: Vec<String> = (0..4).map(|y| buf[(0, y)].symbol().to_string()).collect();
        assert_eq!(column, vec![" ", " ", "█", "█"]);
    }
}

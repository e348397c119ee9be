use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_flow::core::Orientation;
use ratatui_flow::core::Thickness;
use ratatui_flow::tab_strip::TabStrip;
use ratatui_flow::theme::Theme;
use ratatui_flow::wrap_view::WrapView;
use ratatui_flow::wrap_view::WrapViewOptions;
use ratatui_flow::wrap_view::chip_size;
use ratatui_flow::wrap_view::render_chip;
use std::io;
use std::sync::Arc;
use std::time::Duration;

const WORDS: [&str; 8] = ["fox", "quick", "lazy", "dog", "jumps", "brown", "over", "the"];

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let labels: Arc<Vec<String>> = Arc::new(
        (0..100_000)
            .map(|i| format!("{i} {}", WORDS[i % WORDS.len()]))
            .collect(),
    );

    let mut view = WrapView::with_options(WrapViewOptions {
        layout: ratatui_flow::core::WrapLayoutOptions {
            horizontal_spacing: 1.0,
            vertical_spacing: 0.0,
            padding: Thickness::uniform(1.0),
            ..Default::default()
        },
        ..Default::default()
    });
    let sizer_labels = Arc::clone(&labels);
    view.set_item_sizer(move |i| {
        let label = sizer_labels.get(i).map(String::as_str).unwrap_or("");
        chip_size(label)
    });

    let mut tabs = TabStrip::new(vec!["Rows".into(), "Columns".into()]);
    tabs.select(Some(0));

    let res = run(&mut terminal, &theme, &labels, &mut view, &mut tabs);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    labels: &[String],
    view: &mut WrapView,
    tabs: &mut TabStrip,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let [header, main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .areas(area);

            let buf = f.buffer_mut();
            if let Err(err) = tabs.render(header, buf, theme) {
                tracing::warn!(%err, "tab strip render failed");
            }

            let block = Block::default()
                .title("WrapView (j/k, PgUp/PgDn, g/G, o, q)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            f.render_widget(block, main);

            let buf = f.buffer_mut();
            let res = view.render(
                inner,
                buf,
                theme,
                labels.len(),
                |item_area, ctx, buf, theme| {
                    let label = labels.get(ctx.index).map(String::as_str).unwrap_or("");
                    let style = if ctx.index % 7 == 0 {
                        theme.accent
                    } else {
                        theme.text_primary
                    };
                    render_chip(item_area, &ctx, buf, label, style);
                },
            );
            if let Err(err) = res {
                tracing::warn!(%err, "wrap view render failed");
            }

            let orientation = view.orientation();
            let pct = view.viewport.percent(orientation).unwrap_or(0);
            let status_line = format!(
                "items={}  placed={}  scroll={pct}%",
                labels.len(),
                view.placements().len()
            );
            let status_span = Span::styled(status_line, Style::default());
            buf.set_span(status.x, status.y, &status_span, status.width);
        })?;

        if crossterm::event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = crossterm::event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => view.scroll_by(1),
                KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => view.scroll_by(-1),
                KeyCode::PageDown => view.page_forward(),
                KeyCode::PageUp => view.page_back(),
                KeyCode::Char('g') | KeyCode::Home => view.to_start(),
                KeyCode::Char('G') | KeyCode::End => view.to_end(),
                KeyCode::Char('o') => {
                    let mut options = view.options().clone();
                    let (orientation, tab) = match options.layout.orientation {
                        Orientation::Horizontal => (Orientation::Vertical, 1),
                        Orientation::Vertical => (Orientation::Horizontal, 0),
                    };
                    options.layout.orientation = orientation;
                    view.set_options(options);
                    tabs.select(Some(tab));
                }
                _ => {}
            }
        }
    }
}

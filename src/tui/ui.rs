use crate::todo::models::FilterState;
use crate::todo::views;
use crate::tui::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Todo list
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_input(frame, chunks[0], app);
    draw_todo_list(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);

    if app.help_mode {
        draw_help_window(frame);
    }
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.is_remote() { "New todo (remote)" } else { "New todo" };

    let (content, style) = match app.mode {
        Mode::Insert => {
            let (before_cursor, after_cursor) = app.editor.split(app.text_input());
            (
                format!("{}█{}", before_cursor, after_cursor),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        }
        Mode::Normal if app.text_input().is_empty() => (
            "What needs to be done? (press a)".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Mode::Normal => (app.text_input().to_string(), Style::default().fg(Color::Gray)),
    };

    let border_style = match app.mode {
        Mode::Insert => Style::default().fg(Color::Blue),
        Mode::Normal => Style::default().fg(Color::Cyan),
    };

    let input = Paragraph::new(content)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border_style));

    frame.render_widget(input, area);
}

fn draw_todo_list(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .visible_todos()
        .into_iter()
        .map(|todo| {
            let checkbox = if todo.completed { "☑" } else { "☐" };
            let style = if todo.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(Span::styled(
                format!(" {} {}", checkbox, todo.title),
                style,
            )))
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Todos"))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    if !empty && app.mode == Mode::Normal {
        list_state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(0)])
        .split(area);

    let selected = FilterState::VARIANTS
        .iter()
        .position(|filter| *filter == app.filter())
        .unwrap_or(0);
    let tabs = Tabs::new(FilterState::VARIANTS.iter().map(|filter| filter.label()).collect::<Vec<_>>())
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Filter ({} done)",
            views::completed_count(app.store.state())
        )))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let footer_text = match (&app.status_message, app.mode) {
        (Some(message), _) => message.clone(),
        (None, Mode::Insert) => {
            format!("{} | INSERT | Enter: add | Esc: cancel", app.status_label())
        }
        (None, Mode::Normal) => format!(
            "{} | a: add | Enter: toggle | d: delete | f: filter | ?: help | q: quit",
            app.status_label()
        ),
    };
    let footer_style = if app.status_message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL))
        .style(footer_style);

    frame.render_widget(footer, chunks[1]);
}

fn draw_help_window(frame: &mut Frame) {
    let help_text = vec![
        "Todo - Keyboard Commands",
        "",
        "NAVIGATION:",
        "  ↑↓ / j/k          Navigate up/down",
        "  Enter / Space     Toggle todo completion",
        "  d / Delete        Delete todo",
        "",
        "ADDING:",
        "  a / i             Type a new todo",
        "  Enter             Add it (stays in insert mode)",
        "  Esc               Clear input and leave insert mode",
        "  Ctrl+W            Delete previous word",
        "",
        "FILTERS:",
        "  f / Tab           Cycle All / Active / Completed",
        "  1 2 3             All / Active / Completed",
        "",
        "OTHER:",
        "  u                 Undo last change (local only)",
        "  r                 Reload from remote",
        "  Esc               Dismiss message",
        "  ?                 Show this help (press ? or Esc to close)",
        "  q / Ctrl+C        Quit application",
    ];

    let help_paragraph = Paragraph::new(help_text.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help - Keyboard Commands ")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(ratatui::widgets::Wrap { trim: true });

    let area = centered_rect(70, 80, frame.size());

    frame.render_widget(Clear, area);
    frame.render_widget(help_paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

//! Rendering for the interactive console.
//!
//! Headers always render; an empty queue shows zero data rows instead of
//! an error screen.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table, TableState, Tabs};
use ratatui::Frame;

use crate::app::App;
use crate::events::QueueKind;
use crate::notify::{Notice, NoticeKind};
use crate::table::{QueueRow, QueueTable};

pub fn draw(frame: &mut Frame, app: &App) {
    let [tabs_area, table_area, notices_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(frame, tabs_area, app);
    match app.active {
        QueueKind::Reviews => draw_queue(frame, table_area, &app.reviews),
        QueueKind::Aliases => draw_queue(frame, table_area, &app.aliases),
    }
    draw_notices(frame, notices_area, &app.notices);

    let help = Paragraph::new(" q quit | tab switch | j/k select | a approve | r reject | R refresh")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = match app.active {
        QueueKind::Reviews => 0,
        QueueKind::Aliases => 1,
    };
    let tabs = Tabs::new(vec![
        format!("Reviews ({})", app.reviews.rows().len()),
        format!("Aliases ({})", app.aliases.rows().len()),
    ])
    .select(selected)
    .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
    .block(Block::default().borders(Borders::ALL).title(" Mealboard moderation "));
    frame.render_widget(tabs, area);
}

fn draw_queue<R: QueueRow>(frame: &mut Frame, area: Rect, table: &QueueTable<R>) {
    let header = Row::new(R::columns().iter().copied())
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = table
        .rows()
        .iter()
        .map(|row| {
            let mut style = Style::default();
            // Terminal rows and rows with a decision on the wire are
            // dimmed; their actions are disabled in the app layer.
            if !row.status().is_awaiting() || table.is_in_flight(row.id()) {
                style = style.add_modifier(Modifier::DIM);
            }
            Row::new(row.cells()).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = R::columns().iter().map(|_| Constraint::Fill(1)).collect();
    let widget = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", R::title())));

    let mut state = TableState::default();
    state.select(table.selected_index());
    frame.render_stateful_widget(widget, area, &mut state);
}

fn draw_notices(frame: &mut Frame, area: Rect, notices: &[Notice]) {
    let items: Vec<ListItem> = notices
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|notice| {
            let color = match notice.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            ListItem::new(Line::styled(
                format!("{} {}", notice.at.format("%H:%M:%S"), notice.message),
                Style::default().fg(color),
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Notices "));
    frame.render_widget(list, area);
}

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::models::{timestamp, ComplaintStatus, Priority};
use crate::storage::TableStorage;
use crate::store::RecordStore;
use crate::views::{complaint_rows, ComplaintRow};

struct AppState {
    rows: Vec<ComplaintRow>,
    selected: usize,
    scroll_offset: u16,
    message: Option<String>,
}

impl AppState {
    fn new(rows: Vec<ComplaintRow>) -> Self {
        Self {
            rows,
            selected: 0,
            scroll_offset: 0,
            message: None,
        }
    }

    fn current(&self) -> Option<&ComplaintRow> {
        self.rows.get(self.selected)
    }

    fn next(&mut self) {
        if !self.rows.is_empty() && self.selected < self.rows.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    /// Persist a new status for the selected complaint and mirror it locally.
    fn set_status<S: TableStorage>(&mut self, store: &mut RecordStore<S>, status: ComplaintStatus) {
        let Some(row) = self.current() else { return };
        let id = row.complaint_id.clone();

        match store.set_complaint_status(&id, status) {
            Ok(_) => {
                if let Some(r) = self.rows.get_mut(self.selected) {
                    r.status = status;
                }
                self.message = Some(format!("{} marked {}", id, status));
            }
            Err(e) => self.message = Some(format!("Update failed: {}", e)),
        }
    }
}

pub fn run_browse<S: TableStorage>(
    store: &mut RecordStore<S>,
    status: Option<ComplaintStatus>,
) -> Result<()> {
    let rows = complaint_rows(store.tables(), status);
    if rows.is_empty() {
        println!("No complaints found.");
        return Ok(());
    }

    let mut state = AppState::new(rows);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<S: TableStorage>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    store: &mut RecordStore<S>,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let prev_selected = state.selected;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('p') => state.set_status(store, ComplaintStatus::Pending),
                KeyCode::Char('r') => state.set_status(store, ComplaintStatus::Resolved),
                _ => {}
            }
            if state.selected != prev_selected {
                list_state.select(Some(state.selected));
                state.message = None;
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(frame.area());

    // Left panel: complaint list
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| {
            let status_icon = match row.status {
                ComplaintStatus::Pending => "*",
                ComplaintStatus::Resolved => "+",
            };
            ListItem::new(format!(
                "{} {:<5} {} | {}",
                status_icon,
                row.complaint_id,
                crate::truncate(&row.product_name, 20),
                crate::truncate(&row.user_name, 16)
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Complaints ({}) ", state.rows.len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: complaint detail
    let detail = build_detail(state);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help
    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let footer = match &state.message {
        Some(msg) => format!(" {}", msg),
        None => " j/k:navigate  J/K:scroll  p:pending r:resolved  q:quit".to_string(),
    };
    let help = Paragraph::new(footer).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area[1]);
}

fn build_detail(state: &AppState) -> Text<'_> {
    let Some(row) = state.current() else {
        return Text::raw("No complaint selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        format!("Complaint {}", row.complaint_id),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("{} by {}", row.product_name, row.vendor_name)));
    lines.push(Line::from(format!("FSSAI: {}", row.fssai_code)));
    lines.push(Line::from(format!("Filed by: {}", row.user_name)));
    lines.push(Line::from(format!("Date: {}", row.date.format(timestamp::FORMAT))));

    let status_style = match row.status {
        ComplaintStatus::Pending => Style::default().fg(Color::Yellow),
        ComplaintStatus::Resolved => Style::default().fg(Color::Green),
    };
    lines.push(Line::from(Span::styled(
        format!("Status: {}", row.status),
        status_style,
    )));

    let priority_style = match row.priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Cyan),
        Priority::Low => Style::default().fg(Color::DarkGray),
    };
    lines.push(Line::from(Span::styled(
        format!("Priority: {}", row.priority),
        priority_style,
    )));

    lines.push(Line::from(""));

    if row.text.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "(No complaint text)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for line in textwrap::fill(&row.text, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}

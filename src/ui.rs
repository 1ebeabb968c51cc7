use anyhow::Result;
use category_ledger::{
    expansion_marker, next_category_header, previous_category_header, sticky_header_index, Row,
    Session, Transaction,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const PAGE_SIZE: usize = 20;
const ANIMATION_TICK: Duration = Duration::from_millis(16);
const IDLE_TICK: Duration = Duration::from_millis(250);

pub struct App {
    pub session: Session,
    /// Index into the projected rows
    pub selected: usize,
    /// First row drawn in the list area
    pub offset: usize,
    pub show_detail: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            selected: 0,
            offset: 0,
            show_detail: false,
        }
    }

    fn row_count(&self, now: Instant) -> usize {
        self.session.rows_at(now).len()
    }

    pub fn selected_transaction(&self, now: Instant) -> Option<Transaction> {
        match self.session.rows_at(now).get(self.selected) {
            Some(Row::Item { transaction, .. }) => Some((*transaction).clone()),
            _ => None,
        }
    }

    pub fn next(&mut self, now: Instant) {
        let len = self.row_count(now);
        if len == 0 {
            return;
        }
        self.selected = if self.selected >= len - 1 {
            0
        } else {
            self.selected + 1
        };
    }

    pub fn previous(&mut self, now: Instant) {
        let len = self.row_count(now);
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            (self.selected - 1).min(len - 1)
        };
    }

    pub fn page_down(&mut self, now: Instant) {
        let len = self.row_count(now);
        if len == 0 {
            return;
        }
        self.selected = (self.selected + PAGE_SIZE).min(len - 1);
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(PAGE_SIZE);
    }

    pub fn home(&mut self) {
        self.selected = 0;
    }

    pub fn end(&mut self, now: Instant) {
        self.selected = self.row_count(now).saturating_sub(1);
    }

    /// Jump to the next category header
    pub fn next_category(&mut self, now: Instant) {
        let rows = self.session.rows_at(now);
        if let Some(index) = next_category_header(&rows, self.selected) {
            self.selected = index;
        }
    }

    /// Jump to the header of the current category, or the one before it
    pub fn previous_category(&mut self, now: Instant) {
        let rows = self.session.rows_at(now);
        if let Some(index) = previous_category_header(&rows, self.selected) {
            self.selected = index;
        }
    }

    /// Enter/Space: toggle a category header, open details on an item
    pub fn activate(&mut self, now: Instant) {
        let category = match self.session.rows_at(now).get(self.selected) {
            Some(Row::CategoryHeader { category, .. }) => Some(category.to_string()),
            Some(Row::Item { .. }) => {
                self.show_detail = !self.show_detail;
                None
            }
            _ => None,
        };

        if let Some(category) = category {
            self.session.toggle(&category, now);
        }
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(now),
            KeyCode::Tab => self.next_category(now),
            KeyCode::BackTab => self.previous_category(now),
            KeyCode::Char('e') => self.session.expand_all(now),
            KeyCode::Char('c') => {
                self.session.collapse_all(now);
                self.show_detail = false;
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(now),
            KeyCode::Up | KeyCode::Char('k') => self.previous(now),
            KeyCode::PageDown => self.page_down(now),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(now),
            _ => {}
        }
        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal UI exited with an error");
        return Err(err.into());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        let animating = app.session.tick(now);
        terminal.draw(|f| ui(f, app, now))?;

        // Redraw quickly while a category is opening or closing
        let timeout = if animating { ANIMATION_TICK } else { IDLE_TICK };
        if !event::poll(timeout)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !app.handle_key(key, Instant::now()) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let detail = if app.show_detail {
        app.selected_transaction(now)
    } else {
        None
    };

    match detail {
        Some(tx) => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(60), // List
                    Constraint::Percentage(40), // Detail panel
                ])
                .split(chunks[1]);

            render_list(f, content_chunks[0], app, now);
            render_detail_panel(f, content_chunks[1], &tx);
        }
        None => render_list(f, chunks[1], app, now),
    }

    render_status_bar(f, chunks[2], app, now);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let expansion = app.session.expansion();

    let spans = vec![
        Span::styled(
            "Transactions",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total: {}", app.session.total_transactions()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!(
                "Expanded: {}/{}",
                expansion.expanded_count(),
                expansion.len()
            ),
            Style::default().fg(Color::Cyan),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

/// First row to draw so `selected` stays visible below a pinned header
fn scroll_offset(rows: &[Row<'_>], selected: usize, offset: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }

    let mut offset = offset.min(rows.len().saturating_sub(1));
    if selected < offset {
        offset = selected;
    }
    if selected >= offset + height {
        offset = selected + 1 - height;
    }

    // The pinned header covers the top line
    if offset > 0 && selected == offset && is_pinned(rows, offset) {
        offset -= 1;
    }

    offset
}

fn is_pinned(rows: &[Row<'_>], offset: usize) -> bool {
    matches!(sticky_header_index(rows, offset), Some(index) if index < offset)
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App, now: Instant) {
    let height = area.height.saturating_sub(2) as usize;
    let rows = app.session.rows_at(now);

    app.selected = app.selected.min(rows.len().saturating_sub(1));
    app.offset = scroll_offset(&rows, app.selected, app.offset, height);

    let mut lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.offset)
        .take(height)
        .map(|(index, row)| row_line(row, index == app.selected))
        .collect();

    if let Some(pinned) = sticky_header_index(&rows, app.offset).filter(|i| *i < app.offset) {
        if let Some(top) = lines.first_mut() {
            *top = row_line(&rows[pinned], false);
        }
    }

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" By Category "),
    );

    f.render_widget(list, area);
}

fn row_line<'a>(row: &Row<'a>, selected: bool) -> Line<'a> {
    let marker = if selected { "→ " } else { "  " };

    let mut spans = match row {
        Row::CategoryHeader {
            category,
            expanded,
            count,
            total,
        } => vec![
            Span::styled(
                format!("{}{} {}", marker, expansion_marker(*expanded), category),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} txs  ${:.2}", count, total),
                Style::default().fg(Color::DarkGray),
            ),
        ],
        Row::DateHeader { date, .. } => vec![Span::styled(
            format!("{}  {}", marker, date.format("%Y-%m-%d")),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )],
        Row::Item { transaction, .. } => {
            let color = if transaction.is_credit() {
                Color::Green
            } else {
                Color::Red
            };
            vec![
                Span::raw(format!(
                    "{}    {:<28}",
                    marker,
                    truncate(&transaction.description, 28)
                )),
                Span::styled(
                    transaction.date_label(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:>12}", transaction.display_amount()),
                    Style::default().fg(color),
                ),
            ]
        }
    };

    if selected {
        spans = spans
            .into_iter()
            .map(|span| {
                let style = span.style.bg(Color::DarkGray);
                Span::styled(span.content, style)
            })
            .collect();
    }

    Line::from(spans)
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let total = app.session.rows_at(now).len();
    let selected = if total == 0 { 0 } else { app.selected + 1 };

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Toggle/Details | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Category | "),
        Span::styled("e/c", Style::default().fg(Color::Yellow)),
        Span::raw(" Expand/Collapse all | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, tx: &Transaction) {
    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Id: ", label),
            Span::raw(tx.id.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Description: ", label),
            Span::raw(tx.description.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Date: ", label),
            Span::raw(tx.date_label()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Amount: ", label),
            Span::styled(
                tx.display_amount(),
                Style::default().fg(if tx.is_credit() {
                    Color::Green
                } else {
                    Color::Red
                }),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Category: ", label),
            Span::raw(tx.category.clone()),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Transaction Details "),
    );

    f.render_widget(detail_panel, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use category_ledger::seed_transactions;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(Session::new(&seed_transactions(), Duration::ZERO))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn draw(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let now = Instant::now();
        terminal.draw(|f| ui(f, app, now)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_renders_categories_and_items() {
        let mut app = app();
        let screen = draw(&mut app, 90, 40).join("\n");

        assert!(screen.contains("Total: 22"));
        assert!(screen.contains("Expanded: 13/13"));
        assert!(screen.contains("▼ Book Store"));
        assert!(screen.contains("Barnes & Noble"));
        assert!(screen.contains("$23.75"));
    }

    #[test]
    fn test_enter_on_header_collapses_category() {
        let mut app = app();
        let now = Instant::now();

        assert!(app.handle_key(key(KeyCode::Enter), now));
        assert!(!app.session.is_expanded("Book Store"));

        let screen = draw(&mut app, 90, 40).join("\n");
        assert!(screen.contains("▲ Book Store"));
        assert!(!screen.contains("Barnes & Noble"));
    }

    #[test]
    fn test_enter_on_item_opens_details() {
        let mut app = app();
        let now = Instant::now();

        // Book Store header, date header, Barnes & Noble
        app.handle_key(key(KeyCode::Down), now);
        app.handle_key(key(KeyCode::Down), now);
        app.handle_key(key(KeyCode::Enter), now);

        assert!(app.show_detail);
        assert_eq!(app.selected_transaction(now).map(|t| t.id), Some(3));

        let screen = draw(&mut app, 120, 40).join("\n");
        assert!(screen.contains("Transaction Details"));
    }

    #[test]
    fn test_tab_jumps_between_categories() {
        let mut app = app();
        let now = Instant::now();

        app.handle_key(key(KeyCode::Tab), now);
        assert_eq!(app.selected, 3);

        app.handle_key(key(KeyCode::BackTab), now);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_collapse_all_then_expand_all() {
        let mut app = app();
        let now = Instant::now();

        app.handle_key(key(KeyCode::Char('c')), now);
        assert_eq!(app.session.expansion().expanded_count(), 0);
        app.handle_key(key(KeyCode::End), now);
        assert_eq!(app.selected, 12);

        app.handle_key(key(KeyCode::Char('e')), now);
        assert_eq!(app.session.expansion().expanded_count(), 13);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        let now = Instant::now();
        assert!(!app.handle_key(key(KeyCode::Char('q')), now));
        assert!(!app.handle_key(key(KeyCode::Esc), now));
    }

    #[test]
    fn test_sticky_date_header_is_pinned() {
        let mut app = app();
        // Coffee Shop: [9] header, [10] 2025-02-24, [11] Starbucks $6.25,
        // [12] 2025-02-27, [13] Starbucks $5.99, [14] Starbucks $4.50
        app.selected = 14;

        let lines = draw(&mut app, 90, 12);

        assert_eq!(app.offset, 11);
        assert!(lines[4].contains("2025-02-24"));
        let screen = lines.join("\n");
        assert!(!screen.contains("$6.25"));
        assert!(screen.contains("$4.50"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Starbucks", 28), "Starbucks");
        assert_eq!(truncate("A very long merchant description", 10), "A very ...");
    }
}

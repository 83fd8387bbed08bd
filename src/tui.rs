use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell as TableCell, Clear, List, ListItem, ListState, Paragraph,
        Row as TableRow, Table, TableState, Wrap,
    },
};
use std::io::stdout;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::config::{Config, FilterOptions};
use crate::controller::{Controller, Effect, Input, StatusChange};
use crate::dates::DateFormatter;
use crate::error::{FetchError, UpdateError};
use crate::filters::{MultiSelect, ALL};
use crate::models::JobRecord;
use crate::render::{
    ActionId, ActionsCell, Cell, Row, RowAction, StatusSelector, TableBody, TableRenderer,
};
use crate::schema::ColumnSchema;

const TICK: Duration = Duration::from_millis(100);

/// Results of effects, delivered back to the UI thread.
enum Completion {
    Fetched {
        seq: u64,
        result: Result<Vec<JobRecord>, FetchError>,
    },
    Updated {
        change: StatusChange,
        result: Result<(), UpdateError>,
    },
    OpenFailed {
        url: String,
        reason: String,
    },
}

/// Runs controller effects as tasks; results come back over the channel.
struct Executor {
    handle: Handle,
    api: ApiClient,
    open_command: String,
    tx: UnboundedSender<Completion>,
}

impl Executor {
    fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            let tx = self.tx.clone();
            match effect {
                Effect::Fetch(ticket) => {
                    let api = self.api.clone();
                    self.handle.spawn(async move {
                        let result = api.fetch_jobs(&ticket.url).await;
                        let _ = tx.send(Completion::Fetched {
                            seq: ticket.seq,
                            result,
                        });
                    });
                }
                Effect::UpdateStatus(change) => {
                    let api = self.api.clone();
                    self.handle.spawn(async move {
                        let result = api.update_status(&change.filename, change.status).await;
                        let _ = tx.send(Completion::Updated { change, result });
                    });
                }
                Effect::Open { url, no_referrer } => {
                    // The opener starts a fresh top-level navigation, which
                    // carries no referrer.
                    debug!(%url, no_referrer, "opening page");
                    let program = self.open_command.clone();
                    self.handle.spawn(async move {
                        let status = tokio::process::Command::new(&program)
                            .arg(&url)
                            .stdin(Stdio::null())
                            .stdout(Stdio::null())
                            .stderr(Stdio::null())
                            .status()
                            .await;
                        let reason = match status {
                            Ok(s) if s.success() => return,
                            Ok(s) => format!("{} exited with {}", program, s),
                            Err(e) => format!("{}: {}", program, e),
                        };
                        let _ = tx.send(Completion::OpenFailed { url, reason });
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Status,
    German,
    Seniority,
    Days,
    Search,
    Table,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Status,
        Focus::German,
        Focus::Seniority,
        Focus::Days,
        Focus::Search,
        Focus::Table,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Multi {
    German,
    Seniority,
}

/// Status picker opened for one row, built from that row's selector.
struct Selector {
    filename: String,
    selector: StatusSelector,
    state: ListState,
}

struct App {
    controller: Controller,
    options: FilterOptions,
    schema: ColumnSchema,
    focus: Focus,
    table: TableState,
    german_cursor: usize,
    seniority_cursor: usize,
    selector: Option<Selector>,
    quit: bool,
}

impl App {
    fn new(controller: Controller, options: FilterOptions, schema: ColumnSchema) -> Self {
        Self {
            controller,
            options,
            schema,
            focus: Focus::Table,
            table: TableState::default(),
            german_cursor: 0,
            seniority_cursor: 0,
            selector: None,
            quit: false,
        }
    }

    /// `ALL` followed by the configured values.
    fn choices(&self, which: Multi) -> Vec<&str> {
        let configured = match which {
            Multi::German => &self.options.german_options,
            Multi::Seniority => &self.options.seniority_options,
        };
        std::iter::once(ALL)
            .chain(configured.iter().map(String::as_str))
            .collect()
    }

    fn cursor_mut(&mut self, which: Multi) -> &mut usize {
        match which {
            Multi::German => &mut self.german_cursor,
            Multi::Seniority => &mut self.seniority_cursor,
        }
    }

    fn selection(&self, which: Multi) -> &MultiSelect {
        match which {
            Multi::German => &self.controller.filters().german,
            Multi::Seniority => &self.controller.filters().seniority,
        }
    }

    fn selected_row(&self) -> Option<&Row> {
        let index = self.table.selected()?;
        self.controller.view().visible_rows().nth(index)
    }

    fn selected_actions(&self) -> Option<&ActionsCell> {
        self.selected_row()?.cells.iter().find_map(|cell| match cell {
            Cell::Actions(actions) => Some(actions),
            _ => None,
        })
    }

    fn selected_filename(&self) -> Option<String> {
        self.selected_row().map(|r| r.filename.clone())
    }

    /// Keeps the highlighted row inside the visible rows after a re-render.
    fn sync_selection(&mut self) {
        let count = self.controller.view().visible_rows().count();
        if count == 0 {
            self.table.select(None);
        } else {
            let index = self.table.selected().unwrap_or(0).min(count - 1);
            self.table.select(Some(index));
        }
    }

    fn on_completion(&mut self, done: Completion) -> Vec<Effect> {
        match done {
            Completion::Fetched { seq, result } => {
                self.controller.on_fetch_result(seq, result);
                Vec::new()
            }
            Completion::Updated { change, result } => {
                self.controller.on_update_result(&change, result)
            }
            Completion::OpenFailed { url, reason } => {
                warn!(%url, %reason, "could not open page");
                self.controller
                    .show_alert(format!("Could not open {}: {}", url, reason));
                Vec::new()
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return Vec::new();
        }

        // Alerts block everything until dismissed.
        if self.controller.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.controller.dismiss_alert();
            }
            return Vec::new();
        }

        if self.selector.is_some() {
            return self.on_selector_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        let effects = match self.focus {
            Focus::Search => self.on_search_key(key, now),
            Focus::Days => self.on_days_key(key, now),
            Focus::Status => self.on_status_key(key, now),
            Focus::German => self.on_multi_key(key, now, Multi::German),
            Focus::Seniority => self.on_multi_key(key, now, Multi::Seniority),
            Focus::Table => self.on_table_key(key, now),
        };
        self.sync_selection();
        effects
    }

    /// Keys shared by every control that does not take text.
    fn on_common_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('R') => self.controller.handle(Input::RefreshCache, now),
            KeyCode::Char('q') => {
                self.quit = true;
                Vec::new()
            }
            KeyCode::Esc => {
                self.focus = Focus::Table;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let mut query = self.controller.filters().query.clone();
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => query.push(c),
            KeyCode::Backspace => {
                if query.pop().is_none() {
                    return Vec::new();
                }
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.focus = Focus::Table;
                return Vec::new();
            }
            _ => return Vec::new(),
        }
        self.controller.handle(Input::SetQuery(query), now)
    }

    fn on_days_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let current = self.controller.filters().days_since_saved.unwrap_or(0);
        let days = match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let digit = c.to_digit(10).unwrap_or(0);
                current.saturating_mul(10).saturating_add(digit).min(9999)
            }
            KeyCode::Backspace => current / 10,
            KeyCode::Enter | KeyCode::Esc => {
                self.focus = Focus::Table;
                return Vec::new();
            }
            _ => return Vec::new(),
        };
        let days = (days > 0).then_some(days);
        if days == self.controller.filters().days_since_saved {
            return Vec::new();
        }
        self.controller.handle(Input::SetDays(days), now)
    }

    fn on_status_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let current = self.controller.filters().status;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.controller.handle(Input::SetStatusFilter(current.prev()), now)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.controller.handle(Input::SetStatusFilter(current.next()), now)
            }
            _ => self.on_common_key(key, now),
        }
    }

    fn on_multi_key(&mut self, key: KeyEvent, now: Instant, which: Multi) -> Vec<Effect> {
        let len = self.choices(which).len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                let cursor = self.cursor_mut(which);
                *cursor = cursor.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let cursor = self.cursor_mut(which);
                *cursor = (*cursor + 1).min(len.saturating_sub(1));
                Vec::new()
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let cursor = *self.cursor_mut(which);
                let Some(value) = self.choices(which).get(cursor).map(|v| v.to_string()) else {
                    return Vec::new();
                };
                let input = match which {
                    Multi::German => Input::ToggleGerman(value),
                    Multi::Seniority => Input::ToggleSeniority(value),
                };
                self.controller.handle(input, now)
            }
            _ => self.on_common_key(key, now),
        }
    }

    fn on_table_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let row_action = |action: RowAction, app: &mut App| -> Vec<Effect> {
            match app.selected_filename() {
                Some(filename) => app.controller.trigger(&ActionId::new(&filename, action)),
                None => Vec::new(),
            }
        };

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let next = self.table.selected().map_or(0, |i| i + 1);
                self.table.select(Some(next));
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let prev = self.table.selected().map_or(0, |i| i.saturating_sub(1));
                self.table.select(Some(prev));
                Vec::new()
            }
            KeyCode::Char('v') => row_action(RowAction::MarkViewed, self),
            KeyCode::Char('o') => row_action(RowAction::OpenDetail, self),
            KeyCode::Char('u') => row_action(RowAction::OpenOrigin, self),
            KeyCode::Char('c') => {
                let picker = self
                    .selected_row()
                    .map(|row| row.filename.clone())
                    .zip(self.selected_actions().map(|a| a.selector.clone()));
                if let Some((filename, selector)) = picker {
                    let mut state = ListState::default();
                    state.select(Some(0));
                    self.selector = Some(Selector {
                        filename,
                        selector,
                        state,
                    });
                }
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                Vec::new()
            }
            KeyCode::Esc => {
                self.quit = true;
                Vec::new()
            }
            _ => self.on_common_key(key, now),
        }
    }

    fn on_selector_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let Some(picker) = self.selector.as_mut() else {
            return Vec::new();
        };
        let current = picker.state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let last = picker.selector.options.len();
                picker.state.select(Some((current + 1).min(last)));
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                picker.state.select(Some(current.saturating_sub(1)));
                Vec::new()
            }
            KeyCode::Esc => {
                self.selector = None;
                Vec::new()
            }
            KeyCode::Enter => {
                // Entry 0 is the placeholder.
                let chosen = current
                    .checked_sub(1)
                    .and_then(|i| picker.selector.options.get(i))
                    .map(|(_, id)| id.clone());
                self.selector = None;
                match chosen {
                    Some(id) => {
                        let effects = self.controller.trigger(&id);
                        self.sync_selection();
                        effects
                    }
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }
}

pub fn run_dashboard(config: &Config, api: ApiClient) -> Result<()> {
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let (tx, mut rx) = unbounded_channel();

    let schema = ColumnSchema::default();
    let renderer = TableRenderer::new(
        schema,
        DateFormatter::new(config.display_zone()?),
        api.base_url().clone(),
    );
    let controller = Controller::new(api.clone(), renderer, config.controller_options());
    let mut app = App::new(controller, config.filters.clone(), schema);
    let executor = Executor {
        handle: runtime.handle().clone(),
        api,
        open_command: config.ui.open_command.clone(),
        tx,
    };

    info!("starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app, &executor, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    executor: &Executor,
    rx: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    executor.run(app.controller.start());

    while !app.quit {
        terminal.draw(|frame| draw(frame, app))?;

        let timeout = app
            .controller
            .next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(TICK)
            .min(TICK);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let effects = app.on_key(key, Instant::now());
                    executor.run(effects);
                }
            }
        }

        while let Ok(done) = rx.try_recv() {
            let effects = app.on_completion(done);
            executor.run(effects);
            app.sync_selection();
        }

        executor.run(app.controller.poll(Instant::now()));
    }
    Ok(())
}

fn badge_style(class: &str) -> Style {
    match class {
        "status-new" => Style::default().fg(Color::Green),
        "status-viewed" => Style::default().fg(Color::Blue),
        "status-shortlisted" => Style::default().fg(Color::Yellow),
        "status-longlisted" => Style::default().fg(Color::Magenta),
        "status-applied" => Style::default().fg(Color::Cyan),
        "status-archived" => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    }
}

fn column_style(class: Option<&str>) -> Style {
    match class {
        Some("col-title") => Style::default().add_modifier(Modifier::BOLD),
        Some("col-notes") => Style::default().fg(Color::Gray),
        Some("col-date") => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    }
}

fn table_cell(cell: &Cell) -> TableCell<'_> {
    match cell {
        Cell::Text { text, class } => {
            TableCell::from(Span::styled(text.as_str(), column_style(*class)))
        }
        Cell::Badge { class, label } => {
            TableCell::from(Span::styled(label.as_str(), badge_style(class)))
        }
        Cell::Actions(_) => TableCell::from(cell.display_text()),
    }
}

fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_filters(frame, app, chunks[0]);
    draw_table(frame, app, chunks[1]);
    draw_detail(frame, app, chunks[2]);
    draw_footer(frame, app, chunks[3]);

    if app.selector.is_some() {
        draw_selector(frame, app);
    }
    if let Some(message) = app.controller.alert() {
        draw_alert(frame, message);
    }
}

fn draw_filters(frame: &mut Frame, app: &App, area: Rect) {
    let filters = app.controller.filters();
    let focused = |f: Focus| {
        if app.focus == f {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        }
    };
    let days = filters
        .days_since_saved
        .map(|d| d.to_string())
        .unwrap_or_default();
    let mut search = filters.query.clone();
    if app.focus == Focus::Search {
        search.push('_');
    }

    let controls = Line::from(vec![
        Span::raw(" Status: "),
        Span::styled(format!("[{}]", filters.status.as_str()), focused(Focus::Status)),
        Span::raw("  German: "),
        Span::styled(format!("[{}]", filters.german.summary()), focused(Focus::German)),
        Span::raw("  Seniority: "),
        Span::styled(format!("[{}]", filters.seniority.summary()), focused(Focus::Seniority)),
        Span::raw("  Days: "),
        Span::styled(format!("[{}]", days), focused(Focus::Days)),
        Span::raw("  Search: "),
        Span::styled(format!("[{}]", search), focused(Focus::Search)),
    ]);

    let hint = match app.focus {
        Focus::German => picker_line(app, Multi::German),
        Focus::Seniority => picker_line(app, Multi::Seniority),
        Focus::Status => Line::from(" ←/→ change status"),
        Focus::Days => Line::from(" digits: days since saved, backspace to clear"),
        Focus::Search => Line::from(" type to search title, company, skills"),
        Focus::Table => Line::from(Span::styled(
            " Tab: filters  /: search  R: refresh cache",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let widget = Paragraph::new(vec![controls, hint])
        .block(Block::default().borders(Borders::ALL).title(" Filters "));
    frame.render_widget(widget, area);
}

fn picker_line(app: &App, which: Multi) -> Line<'static> {
    let cursor = match which {
        Multi::German => app.german_cursor,
        Multi::Seniority => app.seniority_cursor,
    };
    let selection = app.selection(which);
    let mut spans = vec![Span::raw(" ")];
    for (i, choice) in app.choices(which).into_iter().enumerate() {
        let checked = if choice == ALL {
            selection.is_unconstrained()
        } else {
            selection.contains(choice)
        };
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = if i == cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{} {}", mark, choice), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let view = app.controller.view();
    let block = Block::default().borders(Borders::ALL).title(" Jobs ");

    match &view.body {
        TableBody::Placeholder { text, is_error, .. } => {
            let style = if *is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            let header = Line::from(view.header.join(" | "))
                .style(Style::default().add_modifier(Modifier::BOLD));
            let widget = Paragraph::new(vec![
                header,
                Line::from(""),
                Line::from(Span::styled(*text, style)).alignment(Alignment::Center),
            ])
            .block(block);
            frame.render_widget(widget, area);
        }
        TableBody::Rows(_) => {
            let header = TableRow::new(view.header.iter().map(|h| TableCell::from(*h)))
                .style(Style::default().add_modifier(Modifier::BOLD));
            let rows = view
                .visible_rows()
                .map(|row| TableRow::new(row.cells.iter().map(table_cell)));
            let widths = app
                .schema
                .columns()
                .iter()
                .map(|c| Constraint::Length(c.width));

            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
                .highlight_symbol("> ");
            frame.render_stateful_widget(table, area, &mut app.table);
        }
    }
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(4).max(20) as usize;
    let record = app
        .selected_row()
        .and_then(|row| app.controller.record(&row.filename));

    let lines = match record {
        Some(job) => {
            let mut lines = detail_lines(job, width);
            if let Some(actions) = app.selected_actions() {
                lines.extend(link_lines(actions));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No job selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn detail_lines(job: &JobRecord, width: usize) -> Vec<Line<'static>> {
    let or_na = |v: &Option<String>| {
        v.as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("N/A")
            .to_string()
    };

    let mut lines = vec![
        Line::from(Span::styled(
            or_na(&job.job_title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("at {} · {}", or_na(&job.company), or_na(&job.location))),
        Line::from(format!("File: {}", job.filename)),
    ];

    for (label, value) in [
        ("Required", &job.required_skills),
        ("Preferred", &job.preferred_skills),
        ("Other", &job.other_requirements),
    ] {
        let text = format!("{}: {}", label, or_na(value));
        for line in textwrap::fill(&text, width).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    lines
}

fn link_lines(actions: &ActionsCell) -> Vec<Line<'static>> {
    actions
        .links
        .iter()
        .map(|link| {
            let key = match link.id.action {
                RowAction::OpenDetail => "o",
                RowAction::OpenOrigin => "u",
                _ => "",
            };
            let style = if link.class.contains("btn-url") {
                Style::default().fg(Color::Blue)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let mut spans = vec![
                Span::styled(format!("[{}] {}: ", key, link.label), style),
                Span::raw(link.href.clone()),
            ];
            if link.rel.is_some() {
                spans.push(Span::styled(
                    " (no referrer)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut caption = app.controller.view().caption.clone();
    if app.controller.loading() {
        caption.push_str(" (loading...)");
    }
    let help = "  j/k:navigate  v:viewed  c:change status  o:view html  u:go to url  Tab:filters  q:quit";
    let footer = Line::from(vec![
        Span::styled(format!(" {}", caption), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_selector(frame: &mut Frame, app: &mut App) {
    let Some(picker) = app.selector.as_mut() else {
        return;
    };
    let items: Vec<ListItem> = std::iter::once(ListItem::new(Span::styled(
        picker.selector.placeholder,
        Style::default().fg(Color::DarkGray),
    )))
    .chain(
        picker
            .selector
            .options
            .iter()
            .map(|(status, _)| ListItem::new(status.label())),
    )
    .collect();

    let height = picker.selector.options.len() as u16 + 3;
    let area = centered(frame.area(), 30, height);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", picker.filename)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut picker.state);
}

fn draw_alert(frame: &mut Frame, message: &str) {
    let area = centered(frame.area(), 50, 6);
    let widget = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Alert "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}

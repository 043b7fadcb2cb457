//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing a country and a date filter,
//! then renders the totals and a trend chart of the filtered rows.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::{DataOrigin, Session, Settings};
use crate::cli::{TuiArgs, parse_iso_date};
use crate::domain::{FilterSpec, FilteredView, Metric};
use crate::error::AppError;
use crate::report::{CHART_TITLE, fmt_thousands};

mod plotters_chart;

use plotters_chart::{TrendChart, metric_color};

/// Start the TUI.
pub fn run(settings: &Settings, args: TuiArgs) -> Result<(), AppError> {
    let session = crate::app::open_session(settings)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session);
    if let Some(country) = args.country {
        app.country_input = country;
        app.search(false);
    }
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which filter the parameter fields feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    All,
    Range,
    Date,
    Year,
}

impl FilterKind {
    fn next(self) -> Self {
        match self {
            FilterKind::All => FilterKind::Range,
            FilterKind::Range => FilterKind::Date,
            FilterKind::Date => FilterKind::Year,
            FilterKind::Year => FilterKind::All,
        }
    }

    fn prev(self) -> Self {
        match self {
            FilterKind::All => FilterKind::Year,
            FilterKind::Range => FilterKind::All,
            FilterKind::Date => FilterKind::Range,
            FilterKind::Year => FilterKind::Date,
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            FilterKind::All => "whole history",
            FilterKind::Range => "date range",
            FilterKind::Date => "specific date",
            FilterKind::Year => "year",
        }
    }
}

/// Rows of the settings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Country,
    Kind,
    ParamA,
    ParamB,
}

const FIELDS: [Field; 4] = [Field::Country, Field::Kind, Field::ParamA, Field::ParamB];

struct App<S> {
    session: Session<S>,
    country_input: String,
    kind: FilterKind,
    param_a: String,
    param_b: String,
    selected_field: usize,
    editing: bool,
    status: String,
}

impl<S: crate::data::TimelineSource> App<S> {
    fn new(session: Session<S>) -> Self {
        Self {
            session,
            country_input: String::new(),
            kind: FilterKind::All,
            param_a: String::new(),
            param_b: String::new(),
            selected_field: 0,
            editing: false,
            status: "Enter a country name and press Enter.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn field(&self) -> Field {
        FIELDS[self.selected_field]
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < self.visible_fields() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left | KeyCode::Right if self.field() == Field::Kind => {
                self.kind = if code == KeyCode::Right { self.kind.next() } else { self.kind.prev() };
                self.param_a.clear();
                self.param_b.clear();
                self.selected_field = self.selected_field.min(self.visible_fields() - 1);
                self.status = format!("filter: {} (press a to apply)", self.kind.display_name());
            }
            KeyCode::Enter => {
                if self.field() == Field::Kind {
                    self.apply_filter();
                } else {
                    self.editing = true;
                    self.status = format!("Editing {}. Enter to confirm, Esc to stop.", self.field_label(self.field()));
                }
            }
            KeyCode::Char('a') => self.apply_filter(),
            KeyCode::Char('r') => self.search(true),
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let field = self.field();
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit finished.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                match field {
                    Field::Country => self.search(false),
                    _ => self.apply_filter(),
                }
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.input_mut(field) {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                let accepted = match (field, self.kind) {
                    (Field::Country, _) => !c.is_control(),
                    (_, FilterKind::Year) => c.is_ascii_digit(),
                    _ => c.is_ascii_digit() || c == '-',
                };
                if accepted {
                    if let Some(buf) = self.input_mut(field) {
                        buf.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Country => Some(&mut self.country_input),
            Field::Kind => None,
            Field::ParamA => Some(&mut self.param_a),
            Field::ParamB => Some(&mut self.param_b),
        }
    }

    fn visible_fields(&self) -> usize {
        match self.kind {
            FilterKind::All => 2,
            FilterKind::Date | FilterKind::Year => 3,
            FilterKind::Range => 4,
        }
    }

    fn field_label(&self, field: Field) -> &'static str {
        match (field, self.kind) {
            (Field::Country, _) => "Country",
            (Field::Kind, _) => "Filter",
            (Field::ParamA, FilterKind::Range) => "Start (YYYY-MM-DD)",
            (Field::ParamB, FilterKind::Range) => "End (YYYY-MM-DD)",
            (Field::ParamA, FilterKind::Date) => "Date (YYYY-MM-DD)",
            (Field::ParamA, FilterKind::Year) => "Year (e.g. 2021)",
            _ => "-",
        }
    }

    fn search(&mut self, refresh: bool) {
        let country = self.country_input.trim().to_string();
        if country.is_empty() {
            self.status = "Please enter a country name.".to_string();
            return;
        }

        self.status = match self.session.search(&country, refresh) {
            Ok(data) => {
                let how = match data.origin {
                    DataOrigin::Saved => "loaded from",
                    DataOrigin::Fetched => "fetched and saved to",
                };
                format!("{} days {how} {}", fmt_thousands(data.table.len() as u64), data.path.display())
            }
            Err(err) => err.to_string(),
        };

        if self.session.current().is_some() {
            if let Err(msg) = self.reapply_filter() {
                self.status = format!("{} | filter not applied: {msg}", self.status);
            }
        }
    }

    /// Build the filter from the inputs, or explain what is wrong with them.
    fn filter_spec(&self) -> Result<Option<FilterSpec>, String> {
        let a = self.param_a.trim();
        let b = self.param_b.trim();
        match self.kind {
            FilterKind::All => Ok(None),
            FilterKind::Range => {
                if a.is_empty() || b.is_empty() {
                    return Err("Please enter both start and end dates.".to_string());
                }
                Ok(Some(FilterSpec::DateRange {
                    start: parse_iso_date(a)?,
                    end: parse_iso_date(b)?,
                }))
            }
            FilterKind::Date => {
                if a.is_empty() {
                    return Err("Please enter a specific date.".to_string());
                }
                Ok(Some(FilterSpec::ExactDate { date: parse_iso_date(a)? }))
            }
            FilterKind::Year => {
                let year = a
                    .parse::<i32>()
                    .map_err(|_| format!("Invalid year '{a}'."))?;
                Ok(Some(FilterSpec::Year { year }))
            }
        }
    }

    fn apply_filter(&mut self) {
        if self.session.current().is_none() {
            self.status = "Search for a country first.".to_string();
            return;
        }
        match self.filter_spec() {
            Ok(spec) => {
                let status = match self.run_filter(spec) {
                    Some(v) if v.is_empty() => "No data available for the selected filter.".to_string(),
                    Some(v) => format!("{} days selected.", fmt_thousands(v.len() as u64)),
                    None => "Search for a country first.".to_string(),
                };
                self.status = status;
            }
            Err(msg) => self.status = msg,
        }
    }

    /// Re-apply the selected filter after a search.
    ///
    /// Incomplete inputs leave the session without a view rather than
    /// showing the whole table under a range/date/year selector.
    fn reapply_filter(&mut self) -> Result<(), String> {
        let spec = self.filter_spec()?;
        let _ = self.run_filter(spec);
        Ok(())
    }

    fn run_filter(&mut self, spec: Option<FilterSpec>) -> Option<&FilteredView> {
        match spec {
            Some(spec) => self.session.apply_filter(spec),
            None => self.session.show_all(),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("covid", Style::default().fg(Color::Cyan)),
            Span::raw(" - COVID-19 Data Dashboard"),
        ]));

        let title = self
            .session
            .chart_request(CHART_TITLE)
            .map(|c| c.title)
            .or_else(|| self.session.current().map(|c| format!("{CHART_TITLE} for {}", c.country)))
            .unwrap_or_else(|| "No country loaded".to_string());
        lines.push(Line::from(Span::styled(title, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        self.draw_settings(frame, bottom[0]);
        self.draw_totals(frame, bottom[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Trends").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(request) = self.session.chart_request(CHART_TITLE) else {
            let msg = if self.session.current().is_some() {
                "No data to plot for this filter."
            } else {
                "Waiting for data..."
            };
            frame.render_widget(Paragraph::new(msg).style(Style::default().fg(Color::Yellow)), inner);
            return;
        };

        let (series, x_bounds, y_bounds) = chart_series(request.view);
        let Some(origin) = request.view.first_date() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        frame.render_widget(legend(), chunks[0]);
        frame.render_widget(
            TrendChart {
                series: &series,
                origin,
                x_bounds,
                y_bounds,
            },
            chunks[1],
        );
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        for &field in FIELDS.iter().take(self.visible_fields()) {
            let value = match field {
                Field::Country => self.country_input.clone(),
                Field::Kind => format!("< {} >", self.kind.display_name()),
                Field::ParamA => self.param_a.clone(),
                Field::ParamB => self.param_b.clone(),
            };
            items.push(ListItem::new(format!("{}: {value}", self.field_label(field))));
        }

        let title = if self.editing { "Settings (editing)" } else { "Settings" };
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(if self.editing {
                Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Black).bg(Color::White)
            })
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_totals(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines: Vec<Line> = match self.session.totals() {
            Some(totals) => Metric::ALL
                .iter()
                .map(|&m| {
                    Line::from(Span::styled(
                        format!("Total {}: {}", m.display_name(), fmt_thousands(totals.get(m))),
                        Style::default().fg(metric_color(m)),
                    ))
                })
                .collect(),
            None => vec![Line::from("-")],
        };

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Totals").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ filter kind  Enter edit/apply  a apply  r refetch  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn legend() -> Paragraph<'static> {
    let mut spans = Vec::new();
    for metric in [Metric::Cases, Metric::Recovered, Metric::Deaths, Metric::Vaccinations] {
        spans.push(Span::styled("── ", Style::default().fg(metric_color(metric))));
        spans.push(Span::raw(format!("{}  ", metric.display_name())));
    }
    Paragraph::new(Line::from(spans))
}

/// Build chart series: one line per metric over day offsets from the first date.
fn chart_series(view: &FilteredView) -> (Vec<(Metric, Vec<(f64, f64)>)>, [f64; 2], [f64; 2]) {
    let Some(origin) = view.first_date() else {
        return (Vec::new(), [0.0, 1.0], [0.0, 1.0]);
    };

    let series: Vec<(Metric, Vec<(f64, f64)>)> = [Metric::Cases, Metric::Recovered, Metric::Deaths, Metric::Vaccinations]
        .into_iter()
        .map(|metric| {
            let points = view
                .records()
                .iter()
                .map(|r| ((r.date - origin).num_days() as f64, r.value(metric) as f64))
                .collect();
            (metric, points)
        })
        .collect();

    let span = view
        .last_date()
        .map(|last| (last - origin).num_days() as f64)
        .unwrap_or(0.0);
    let x_bounds = if span > 0.0 { [0.0, span] } else { [-0.5, 0.5] };

    let y_max = series
        .iter()
        .flat_map(|(_, pts)| pts.iter().map(|&(_, y)| y))
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };
    let y_bounds = [0.0, y_max * 1.05];

    (series, x_bounds, y_bounds)
}

//! Terminal UI for the log dashboard
//!
//! Renders the aggregator's state with ratatui: an overview with summary
//! cards and HTTP-code bars, a per-URL timeline chart fed by the snapshot
//! window, a top-errors view and a cumulative view.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::aggregator::Aggregator;
use crate::model::StatsSummary;

/// Active dashboard view, cycled with Tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Timeline,
    TopErrors,
    Cumulative,
}

impl View {
    fn next(self) -> Self {
        match self {
            Self::Overview => Self::Timeline,
            Self::Timeline => Self::TopErrors,
            Self::TopErrors => Self::Cumulative,
            Self::Cumulative => Self::Overview,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Timeline => "Timeline",
            Self::TopErrors => "Top Errors",
            Self::Cumulative => "Cumulative",
        }
    }
}

/// Application state for the dashboard
pub struct DashboardApp {
    pub aggregator: Aggregator,
    pub view: View,
    pub error_message: Option<String>,
}

impl DashboardApp {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            view: View::Overview,
            error_message: None,
        }
    }

    /// Handle keyboard input; returns true to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                let paused = self.aggregator.is_paused();
                self.aggregator.set_paused(!paused);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let keys = self.aggregator.window().series_keys();
                if let Some(series) = keys.get(index) {
                    self.aggregator.toggle_series(series);
                }
            }
            _ => {}
        }
        false
    }

    /// Render the UI
    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Body
                Constraint::Length(3), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.view {
            View::Overview => self.render_overview(f, chunks[1]),
            View::Timeline => self.render_timeline(f, chunks[1]),
            View::TopErrors => self.render_top_errors(f, chunks[1]),
            View::Cumulative => self.render_cumulative(f, chunks[1]),
        }
        self.render_footer(f, chunks[2]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let last_update = self
            .aggregator
            .last_update()
            .unwrap_or("Never")
            .to_string();

        let mut spans = vec![
            Span::styled(
                "Log Dashboard",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(self.view.title(), Style::default().fg(Color::Yellow)),
            Span::raw("  |  Last update: "),
            Span::styled(last_update, Style::default().fg(Color::Green)),
        ];
        if self.aggregator.is_paused() {
            spans.push(Span::raw("  |  "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let title = vec![
            Line::from(spans),
            Line::from(Span::styled(
                "Press 'q' to quit | 'p' to pause | 'r' to refresh | Tab to switch view | 1-9 to toggle series",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_overview(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        self.render_summary_cards(f, rows[0]);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(rows[1]);

        self.render_code_breakdown(f, charts[0]);
        self.render_url_bars(f, charts[1]);
    }

    fn render_summary_cards(&self, f: &mut Frame, area: Rect) {
        let summary = self.aggregator.summary();
        let total = summary.map(|s| format_number(s.total_processed_logs));
        let errors5xx = summary.map(|s| format_number(s.errors5xx));
        let error_rate = summary.map(|s| format!("{:.1}%", s.error_rate_percent));

        let cards = [
            ("Processed Logs", total, Color::Green),
            ("Errors 5xx", errors5xx, Color::Red),
            ("Error Rate", error_rate, Color::Yellow),
            (
                "Last Activity",
                self.aggregator.last_update().map(str::to_string),
                Color::Blue,
            ),
        ];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25); 4])
            .split(area);

        for ((label, value, color), column) in cards.into_iter().zip(columns.iter()) {
            let line = Line::from(vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    value.unwrap_or_else(|| "--".to_string()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]);
            let paragraph =
                Paragraph::new(line).block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, *column);
        }
    }

    fn render_code_breakdown(&self, f: &mut Frame, area: Rect) {
        let breakdown = self.aggregator.breakdown();
        let bars = vec![
            ("2xx", breakdown.success2xx, Color::Green),
            ("4xx", breakdown.errors4xx, Color::Yellow),
            ("5xx", breakdown.errors5xx, Color::Red),
        ];

        let group = BarGroup::default().bars(
            &bars
                .into_iter()
                .map(|(label, value, color)| {
                    Bar::default()
                        .label(Line::from(label))
                        .value(value)
                        .style(Style::default().fg(color))
                })
                .collect::<Vec<_>>(),
        );

        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("HTTP Codes"),
            )
            .bar_width(7)
            .bar_gap(2)
            .data(group);
        f.render_widget(chart, area);
    }

    fn render_url_bars(&self, f: &mut Frame, area: Rect) {
        let mut entries: Vec<(&String, u64)> = self
            .aggregator
            .bar()
            .iter()
            .map(|(url, stat)| (url, stat.count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        let bars: Vec<Bar> = entries
            .iter()
            .take(8)
            .map(|(url, count)| {
                Bar::default()
                    .label(Line::from(short_label(url)))
                    .value(*count)
            })
            .collect();

        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Requests by URL"),
            )
            .bar_width(9)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        f.render_widget(chart, area);
    }

    fn render_timeline(&self, f: &mut Frame, area: Rect) {
        let window = self.aggregator.window();
        if window.is_empty() {
            let paragraph = Paragraph::new(Span::styled(
                "Waiting for history data...",
                Style::default().fg(Color::Yellow),
            ))
            .block(Block::default().borders(Borders::ALL).title("Timeline"));
            f.render_widget(paragraph, area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(28)])
            .split(area);

        let selection = self.aggregator.selection();
        let series: Vec<(String, Vec<(f64, f64)>)> = window
            .series_keys()
            .into_iter()
            .filter(|key| selection.is_selected(key))
            .map(|key| {
                let data: Vec<(f64, f64)> = window
                    .points()
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let count = p.url_stats.get(&key).map_or(0, |s| s.count);
                        (i as f64, count as f64)
                    })
                    .collect();
                (key, data)
            })
            .collect();

        let max_y = series
            .iter()
            .flat_map(|(_, data)| data.iter().map(|(_, y)| *y))
            .fold(1.0_f64, f64::max);

        let datasets: Vec<Dataset> = series
            .iter()
            .map(|(key, data)| {
                let color = self.aggregator.palette().get(key).unwrap_or(Color::Gray);
                Dataset::default()
                    .name(key.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(data)
            })
            .collect();

        let x_labels: Vec<Span> = [
            window.points().first(),
            window.points().get(window.len() / 2),
            window.points().last(),
        ]
        .iter()
        .flatten()
        .map(|p| Span::raw(time_label(&p.timestamp).to_string()))
        .collect();

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Requests over time"),
            )
            .x_axis(
                Axis::default()
                    .bounds([0.0, (window.len().saturating_sub(1)).max(1) as f64])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, max_y])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", max_y / 2.0)),
                        Span::raw(format!("{:.0}", max_y)),
                    ]),
            );
        f.render_widget(chart, columns[0]);

        self.render_series_legend(f, columns[1]);
    }

    fn render_series_legend(&self, f: &mut Frame, area: Rect) {
        let selection = self.aggregator.selection();
        let lines: Vec<Line> = self
            .aggregator
            .window()
            .series_keys()
            .into_iter()
            .take(9)
            .enumerate()
            .map(|(i, key)| {
                let color = self.aggregator.palette().get(&key).unwrap_or(Color::Gray);
                let style = if selection.is_selected(&key) {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(vec![
                    Span::styled(format!("[{}] ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(key, style),
                ])
            })
            .collect();

        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Series"));
        f.render_widget(paragraph, area);
    }

    fn render_top_errors(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let (urls4xx, urls5xx) = match self.aggregator.summary() {
            Some(summary) => (summary.urls4xx.clone(), summary.urls5xx.clone()),
            None => Default::default(),
        };

        render_error_table(f, columns[0], "4xx by URL", urls4xx, Color::Yellow);
        render_error_table(f, columns[1], "5xx by URL", urls5xx, Color::Red);
    }

    fn render_cumulative(&self, f: &mut Frame, area: Rect) {
        let Some(stats) = self.aggregator.cumulative() else {
            let paragraph = Paragraph::new(Span::styled(
                "Loading cumulative stats...",
                Style::default().fg(Color::Yellow),
            ))
            .block(Block::default().borders(Borders::ALL).title("Cumulative"));
            f.render_widget(paragraph, area);
            return;
        };

        let rows = summary_rows(stats);
        let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Cumulative (lifetime)"),
            )
            .column_spacing(1);
        f.render_widget(table, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let content = if let Some(error) = &self.error_message {
            vec![Line::from(vec![
                Span::styled(format!("Error: {}", error), Style::default().fg(Color::Red)),
                Span::styled(
                    "  (retrying on next interval...)",
                    Style::default().fg(Color::Yellow),
                ),
            ])]
        } else if self.aggregator.summary().is_none() {
            vec![Line::from(Span::styled(
                "Waiting for stats data...",
                Style::default().fg(Color::Yellow),
            ))]
        } else {
            let window = self.aggregator.window();
            vec![Line::from(vec![
                Span::styled("Window: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("{} snapshots", window.len())),
                Span::raw("  |  "),
                Span::styled("Series: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    "{} tracked, {} shown",
                    window.series_keys().len(),
                    self.aggregator.selection().selected().len()
                )),
            ])]
        };

        let paragraph = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

fn render_error_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    urls: std::collections::BTreeMap<String, u64>,
    color: Color,
) {
    let mut entries: Vec<(String, u64)> = urls.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let rows: Vec<Row> = if entries.is_empty() {
        vec![Row::new(vec![Cell::from("No errors recorded")])]
    } else {
        entries
            .into_iter()
            .map(|(url, count)| {
                Row::new(vec![
                    Cell::from(url),
                    Cell::from(format_number(count)).style(Style::default().fg(color)),
                ])
            })
            .collect()
    };

    let header = Row::new([
        Cell::from("URL").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Count").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .bottom_margin(1);

    let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn summary_rows(stats: &StatsSummary) -> Vec<Row<'static>> {
    vec![
        Row::new(vec![
            Cell::from("Processed logs"),
            Cell::from(format_number(stats.total_processed_logs)),
        ]),
        Row::new(vec![
            Cell::from("Success 2xx"),
            Cell::from(format_number(stats.success2xx)),
        ]),
        Row::new(vec![
            Cell::from("Errors 4xx"),
            Cell::from(format_number(stats.errors4xx)),
        ]),
        Row::new(vec![
            Cell::from("Errors 5xx"),
            Cell::from(format_number(stats.errors5xx)),
        ]),
        Row::new(vec![
            Cell::from("Error rate"),
            Cell::from(format!("{:.2}%", stats.error_rate_percent)),
        ]),
    ]
}

/// HH:MM:SS part of an ISO-8601 timestamp
fn time_label(timestamp: &str) -> &str {
    timestamp.get(11..19).unwrap_or(timestamp)
}

/// Shorten a URL path so bar labels stay readable
fn short_label(url: &str) -> String {
    let trimmed = url.trim_start_matches('/');
    if trimmed.chars().count() <= 9 {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(7).collect();
        format!("{}..", head)
    }
}

/// Format number with thousand separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let len = s.len();

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

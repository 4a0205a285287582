//! UI rendering for the TUI.

use callscope_core::analytics::{hourly_averages, MonthlySummary};
use callscope_core::analytics::monthly::{calls_by_day, chats_by_day};
use callscope_core::format::{days_in_month, format_count, month_name};
use callscope_core::table::{SortDirection, SortField};
use callscope_core::types::ClassifierMetric;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use crate::app::{App, View};
use crate::theme::Theme;

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App, theme: &Theme) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    render_header(frame, app, theme, header);
    match app.view {
        View::Daily => render_daily(frame, app, theme, body),
        View::Hourly => render_hourly(frame, app, theme, body),
        View::Monthly => render_monthly(frame, app, theme, body),
        View::Classifiers => render_classifiers(frame, app, theme, body),
        View::Online => render_online(frame, app, theme, body),
    }
    render_footer(frame, app, theme, footer);
}

// ============================================
// Chrome
// ============================================

fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, view) in [
        View::Daily,
        View::Hourly,
        View::Monthly,
        View::Classifiers,
        View::Online,
    ]
    .into_iter()
    .enumerate()
    {
        let style = if view == app.view {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.title()), style));
    }

    spans.push(Span::styled("│ ", Style::default().fg(theme.border)));
    spans.push(Span::styled("queue ", Style::default().fg(theme.dim)));
    spans.push(Span::styled(
        app.queue.label(),
        Style::default().fg(theme.accent),
    ));

    match app.view {
        View::Monthly => {
            let (year, month) = app.month;
            spans.push(Span::styled("  month ", Style::default().fg(theme.dim)));
            spans.push(Span::styled(
                format!("{} {}", month_name(month), year),
                Style::default().fg(theme.accent),
            ));
        }
        View::Online => {}
        _ => {
            spans.push(Span::styled("  range ", Style::default().fg(theme.dim)));
            spans.push(Span::styled(
                format!("{} .. {}", app.start, app.end),
                Style::default().fg(theme.accent),
            ));
        }
    }

    match app.view {
        View::Daily | View::Hourly => {
            spans.push(Span::styled("  metric ", Style::default().fg(theme.dim)));
            spans.push(Span::styled(
                app.daily_metric.label(),
                Style::default().fg(theme.accent),
            ));
        }
        View::Classifiers => {
            spans.push(Span::styled("  metric ", Style::default().fg(theme.dim)));
            spans.push(Span::styled(
                app.classifier_metric.label(),
                Style::default().fg(theme.accent),
            ));
            if let Some(topic) = &app.drill_topic {
                spans.push(Span::styled("  topic ", Style::default().fg(theme.dim)));
                spans.push(Span::styled(
                    topic.as_str(),
                    Style::default().fg(theme.accent),
                ));
            }
        }
        _ => {}
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_active))
        .title(" callscope ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let [status_area, keys_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let status_line = if app.search_mode {
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(theme.dim)),
            Span::styled(
                format!("{}▎", app.search),
                Style::default().fg(theme.accent),
            ),
        ])
    } else if app.loading {
        Line::from(Span::styled("loading...", Style::default().fg(theme.warn)))
    } else if let Some(status) = &app.status {
        let color = if status.is_error { theme.bad } else { theme.good };
        Line::from(Span::styled(
            status.text.as_str(),
            Style::default().fg(color),
        ))
    } else if !app.search.is_empty() {
        Line::from(Span::styled(
            format!("filter: {}", app.search),
            Style::default().fg(theme.accent),
        ))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status_line), status_area);

    let keys = match app.view {
        View::Classifiers => {
            "1-5 views  m metric  f queue  [/] range  / search  s/d/o/i sort  ←→+c column sort  enter drill  e export  r reload  q quit"
        }
        View::Daily => "1-5 views  m metric  f queue  [/] range  e export  a export all  r reload  q quit",
        View::Monthly => "1-5 views  f queue  [/] month  e export  r reload  q quit",
        _ => "1-5 views  m metric  f queue  [/] range  e export  r reload  q quit",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(keys, Style::default().fg(theme.dim))),
        keys_area,
    );
}

fn table_block<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" {title} "))
}

fn header_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.header)
        .add_modifier(Modifier::BOLD)
}

fn selected_style(theme: &Theme) -> Style {
    Style::default()
        .bg(theme.selection_bg)
        .fg(theme.selection_fg)
}

// ============================================
// Views
// ============================================

fn render_daily(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let header = Row::new(
        [
            "Date", "Calls", "AHT", "SL", "Abandoned", "Chats", "FRT", "RT", "Agents",
        ]
        .map(|h| Cell::from(h).style(header_style(theme))),
    );

    let rows: Vec<Row> = app
        .daily
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.date.format("%d.%m.%Y").to_string()),
                Cell::from(r.total_calls.to_string()),
                Cell::from(r.avg_call_duration.clone()),
                Cell::from(format!("{:.1}%", r.sl)),
                Cell::from(r.total_abandoned.to_string())
                    .style(Style::default().fg(theme.warn)),
                Cell::from(r.total_chats.to_string()),
                Cell::from(r.avg_chat_frt.clone()),
                Cell::from(r.resolution_time_avg.clone()),
                Cell::from(r.distinct_agents.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(selected_style(theme))
        .block(table_block(
            format!("Daily ({} days)", app.daily.len()),
            theme,
        ));
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_hourly(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let [table_area, chart_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(6)]).areas(area);

    // Peak-hour table: one row per day, busiest hours called out
    let header = Row::new(
        ["Date", "Total", "Peak hour", "Peak value"]
            .map(|h| Cell::from(h).style(header_style(theme))),
    );
    let rows: Vec<Row> = app
        .hourly
        .iter()
        .map(|r| {
            let total: f64 = r.hours.iter().sum();
            let (peak_hour, peak) = r
                .hours
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(h, v)| (h, *v))
                .unwrap_or((0, 0.0));
            Row::new(vec![
                Cell::from(r.date.format("%d.%m.%Y").to_string()),
                Cell::from(format_count(total)),
                Cell::from(format!("{peak_hour:02}:00")),
                Cell::from(format_count(peak)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(selected_style(theme))
        .block(table_block(
            format!("Hourly · {}", app.daily_metric.label()),
            theme,
        ));
    frame.render_stateful_widget(table, table_area, &mut app.table_state);

    // Average load curve across the selected range
    let averages = hourly_averages(&app.hourly);
    let bars: Vec<u64> = averages.iter().map(|v| v.round() as u64).collect();
    let sparkline = Sparkline::default()
        .data(&bars)
        .style(Style::default().fg(theme.chart))
        .block(table_block("Average by hour (00-23)".to_string(), theme));
    frame.render_widget(sparkline, chart_area);
}

fn render_monthly(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let [summary_area, table_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(5)]).areas(area);

    let summary = MonthlySummary::compute(&app.monthly);
    let text = vec![
        Line::from(vec![
            Span::styled("Calls ", Style::default().fg(theme.dim)),
            Span::styled(summary.total_calls.to_string(), Style::default().fg(theme.text)),
            Span::styled("   Chats ", Style::default().fg(theme.dim)),
            Span::styled(summary.total_chats.to_string(), Style::default().fg(theme.text)),
            Span::styled("   Total ", Style::default().fg(theme.dim)),
            Span::styled(
                summary.total_inquiries.to_string(),
                Style::default().fg(theme.accent),
            ),
            Span::styled("   Abandoned ", Style::default().fg(theme.dim)),
            Span::styled(
                format!("{} ({:.1}%)", summary.total_abandoned, summary.abandoned_percent),
                Style::default().fg(theme.warn),
            ),
        ]),
        Line::from(vec![
            Span::styled("AHT ", Style::default().fg(theme.dim)),
            Span::styled(summary.avg_aht.clone(), Style::default().fg(theme.text)),
            Span::styled("   SL ", Style::default().fg(theme.dim)),
            Span::styled(format!("{:.1}%", summary.avg_sl), Style::default().fg(theme.good)),
            Span::styled("   FRT ", Style::default().fg(theme.dim)),
            Span::styled(summary.avg_frt.clone(), Style::default().fg(theme.text)),
            Span::styled("   RT ", Style::default().fg(theme.dim)),
            Span::styled(summary.avg_rt.clone(), Style::default().fg(theme.text)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(text).block(table_block("Summary".to_string(), theme)),
        summary_area,
    );

    let (year, month) = app.month;
    let calls = calls_by_day(&app.monthly);
    let chats = chats_by_day(&app.monthly);

    let header = Row::new(
        ["Day", "Calls", "AHT", "SL", "Abandoned", "Chats", "FRT", "RT", "Agents"]
            .map(|h| Cell::from(h).style(header_style(theme))),
    );
    let rows: Vec<Row> = (1..=days_in_month(year, month))
        .map(|day| {
            let call = calls.get(&day);
            let chat = chats.get(&day);
            Row::new(vec![
                Cell::from(format!("{day:02}.{month:02}.{year}")),
                Cell::from(call.map_or_else(|| "0".to_string(), |r| r.total_calls.to_string())),
                Cell::from(
                    call.map_or_else(|| "00:00:00".to_string(), |r| r.avg_call_duration.clone()),
                ),
                Cell::from(call.map_or_else(|| "0.0%".to_string(), |r| format!("{:.1}%", r.sl))),
                Cell::from(
                    call.map_or_else(|| "0".to_string(), |r| r.total_abandoned.to_string()),
                )
                .style(Style::default().fg(theme.warn)),
                Cell::from(chat.map_or_else(|| "0".to_string(), |r| r.total_chats.to_string())),
                Cell::from(
                    chat.map_or_else(|| "00:00:00".to_string(), |r| r.avg_chat_frt.clone()),
                ),
                Cell::from(
                    chat.map_or_else(|| "00:00:00".to_string(), |r| r.resolution_time_avg.clone()),
                ),
                Cell::from(
                    call.map_or_else(|| "0".to_string(), |r| r.distinct_agents.to_string()),
                ),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(selected_style(theme))
        .block(table_block(
            format!("{} {}", month_name(month), year),
            theme,
        ));
    frame.render_stateful_widget(table, table_area, &mut app.table_state);
}

/// Sort indicator for a classifier column header.
fn sort_marker(app: &App, field: &SortField) -> &'static str {
    if app.sort.field != *field {
        return "";
    }
    match app.sort.direction {
        SortDirection::Ascending => " ▲",
        SortDirection::Descending => " ▼",
        SortDirection::None => "",
    }
}

fn render_classifiers(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let is_topics = app.classifier_metric == ClassifierMetric::Topics;
    let rows_data = app.visible_classifier_rows();
    let columns = app.classifier_table.columns.clone();

    let mut header_cells: Vec<Cell> = vec![Cell::from(format!(
        "Topic{}",
        sort_marker(app, &SortField::Label)
    ))
    .style(header_style(theme))];
    if is_topics {
        header_cells.push(
            Cell::from(format!("Ratio{}", sort_marker(app, &SortField::Ratio)))
                .style(header_style(theme)),
        );
    } else {
        header_cells.push(
            Cell::from(format!("Subtopic{}", sort_marker(app, &SortField::SubLabel)))
                .style(header_style(theme)),
        );
    }
    for (i, column) in columns.iter().enumerate() {
        let marker = sort_marker(app, &SortField::Column(column.clone()));
        let style = if i == app.column_cursor {
            header_style(theme).fg(theme.accent)
        } else {
            header_style(theme)
        };
        header_cells.push(Cell::from(format!("{column}{marker}")).style(style));
    }
    header_cells.push(
        Cell::from(format!("Total{}", sort_marker(app, &SortField::Total)))
            .style(header_style(theme)),
    );

    let rows: Vec<Row> = rows_data
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(row.label.clone())];
            if is_topics {
                let ratio = row.ratio.unwrap_or(0.0);
                cells.push(Cell::from(format!("{ratio:.1}%")));
            } else {
                let subtopic = match row.sub_label.as_deref() {
                    Some("") | None => "—".to_string(),
                    Some(s) => s.to_string(),
                };
                cells.push(Cell::from(subtopic));
            }
            for value in &row.values {
                cells.push(Cell::from(format_count(*value)));
            }
            cells.push(
                Cell::from(format_count(row.total)).style(Style::default().fg(theme.accent)),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(18), Constraint::Min(12)];
    widths.extend(columns.iter().map(|_| Constraint::Length(11)));
    widths.push(Constraint::Length(8));

    let title = format!(
        "{} · {} rows",
        app.classifier_metric.label(),
        rows_data.len()
    );
    let table = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .row_highlight_style(selected_style(theme))
        .block(table_block(title, theme));
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_online(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let [health_area, chart_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(6)]).areas(area);

    let store_line = |name: &str, state: &str| -> Line {
        let color = if state.eq_ignore_ascii_case("ok") || state.eq_ignore_ascii_case("connected")
        {
            theme.good
        } else {
            theme.bad
        };
        Line::from(vec![
            Span::styled(format!("{name}: "), Style::default().fg(theme.dim)),
            Span::styled(state.to_string(), Style::default().fg(color)),
        ])
    };

    let text = match &app.health {
        Some(health) => vec![
            store_line("calls store", &health.calls_store),
            store_line("chats store", &health.chats_store),
        ],
        None => vec![Line::from(Span::styled(
            "health unknown",
            Style::default().fg(theme.dim),
        ))],
    };
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Left)
            .block(table_block("Backend".to_string(), theme)),
        health_area,
    );

    let bars: Vec<u64> = app
        .hourly
        .first()
        .map(|r| r.hours.iter().map(|v| v.round() as u64).collect())
        .unwrap_or_default();
    let sparkline = Sparkline::default()
        .data(&bars)
        .style(Style::default().fg(theme.chart))
        .block(table_block("Today by hour (00-23)".to_string(), theme));
    frame.render_widget(sparkline, chart_area);
}

//! Application state for the TUI.

use std::path::PathBuf;

use callscope_core::analytics::{classifier_pivot, subtopic_pivot, topic_pivot, PivotTable};
use callscope_core::backend::{
    fetch_hourly_totals, fetch_subtopic_pool, hourly_detailed, MetricsBackend,
};
use callscope_core::export;
use callscope_core::table::{self, SortField, SortSpec};
use callscope_core::types::{
    BackendHealth, ClassifierMetric, ClassifierRecord, DailyMetric, DailyRecord, HourlyRecord,
    MonthlyData, QueueFilter, TopicRecord,
};
use callscope_core::{Config, Error, HttpBackend};
use chrono::{Datelike, Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::TableState;
use tokio::runtime::Runtime;

/// Current dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Daily metrics table
    #[default]
    Daily,
    /// Hourly breakdown of one metric
    Hourly,
    /// Monthly report with summary
    Monthly,
    /// Classifier pivots with sort/search
    Classifiers,
    /// Backend health and today's load curve
    Online,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Daily => "Daily",
            View::Hourly => "Hourly",
            View::Monthly => "Monthly",
            View::Classifiers => "Classifiers",
            View::Online => "Online",
        }
    }
}

/// One-line status shown in the footer.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Main application state.
pub struct App {
    /// Reporting backend client
    backend: HttpBackend,
    /// Runtime driving backend fetches; reloads block the UI thread, so a
    /// finished reload can never race a newer one
    runtime: Runtime,
    /// Export output directory from config
    export_dir: PathBuf,
    /// Current view
    pub view: View,
    /// Active queue filter
    pub queue: QueueFilter,
    /// Inclusive range start
    pub start: NaiveDate,
    /// Inclusive range end
    pub end: NaiveDate,
    /// Month anchor for the monthly view
    pub month: (i32, u32),
    /// Metric for the daily and hourly views
    pub daily_metric: DailyMetric,
    /// Metric for the classifier view
    pub classifier_metric: ClassifierMetric,
    /// Daily records for the selected range
    pub daily: Vec<DailyRecord>,
    /// Hourly records for the selected range and metric
    pub hourly: Vec<HourlyRecord>,
    /// Monthly call and chat series
    pub monthly: MonthlyData,
    /// Unsorted classifier pivot for the current classifier metric
    pub classifier_table: PivotTable,
    /// Full call + chat classifier pool for subtopic drill-down
    subtopic_pool: Vec<ClassifierRecord>,
    /// Topic the subtopics-daily view is drilled into
    pub drill_topic: Option<String>,
    /// Raw topic records (kept for the ratio column)
    pub topics: Vec<TopicRecord>,
    /// Backend store health
    pub health: Option<BackendHealth>,
    /// Sort state for the classifier view
    pub sort: SortSpec,
    /// Date column the column-sort key applies to
    pub column_cursor: usize,
    /// Search query for the classifier view
    pub search: String,
    /// True while '/' input captures keystrokes
    pub search_mode: bool,
    /// Table selection state
    pub table_state: TableState,
    /// True while a reload is in flight
    pub loading: bool,
    /// Footer status line
    pub status: Option<StatusMessage>,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App against the given backend.
    pub fn new(config: &Config, backend: HttpBackend, runtime: Runtime) -> Self {
        let today = Local::now().date_naive();
        let start = today.checked_sub_days(Days::new(6)).unwrap_or(today);
        Self {
            backend,
            runtime,
            export_dir: config.export.output_dir.clone(),
            view: View::default(),
            queue: config.filters.queue,
            start,
            end: today,
            month: (today.year(), today.month()),
            daily_metric: DailyMetric::Calls,
            classifier_metric: ClassifierMetric::Call,
            daily: Vec::new(),
            hourly: Vec::new(),
            monthly: MonthlyData::default(),
            classifier_table: PivotTable::default(),
            subtopic_pool: Vec::new(),
            drill_topic: None,
            topics: Vec::new(),
            health: None,
            sort: SortSpec::default(),
            column_cursor: 0,
            search: String::new(),
            search_mode: false,
            table_state: TableState::default(),
            loading: false,
            status: None,
            should_quit: false,
        }
    }

    /// Rows of the classifier view after sort and search.
    pub fn visible_classifier_rows(&self) -> Vec<callscope_core::analytics::PivotRow> {
        table::apply(&self.classifier_table, &self.sort, &self.search)
    }

    // ============================================
    // Data loading
    // ============================================

    /// Reload the current view's data from the backend.
    ///
    /// The loading flag is cleared on every exit path, error included, so a
    /// failed fetch never leaves the view stuck in a loading state.
    pub fn reload(&mut self) {
        self.loading = true;
        self.status = None;
        let result = self.fetch_current_view();
        self.loading = false;

        match result {
            Ok(()) => {}
            Err(Error::NotImplemented(msg)) => {
                self.status = Some(StatusMessage::info(msg));
            }
            Err(err) => {
                tracing::warn!(error = %err, view = self.view.title(), "reload failed");
                self.status = Some(StatusMessage::error(format!("load failed: {err}")));
            }
        }
        self.table_state.select(Some(0));
    }

    fn fetch_current_view(&mut self) -> callscope_core::Result<()> {
        match self.view {
            View::Daily => {
                self.daily = self
                    .runtime
                    .block_on(self.backend.daily(self.start, self.end, self.queue))?;
            }
            View::Hourly => {
                self.hourly = match self.daily_metric {
                    DailyMetric::Total => {
                        self.runtime
                            .block_on(fetch_hourly_totals(
                                &self.backend,
                                self.start,
                                self.end,
                                self.queue,
                            ))?
                            .total
                    }
                    DailyMetric::DetailedDaily => {
                        hourly_detailed(self.start, self.end, self.queue)?
                    }
                    metric => self.runtime.block_on(self.backend.hourly(
                        self.start,
                        self.end,
                        self.queue,
                        metric,
                    ))?,
                };
            }
            View::Monthly => {
                let (year, month) = self.month;
                let start = NaiveDate::from_ymd_opt(year, month, 1)
                    .ok_or_else(|| Error::Backend(format!("invalid month {year}-{month}")))?;
                let end = start
                    .checked_add_days(Days::new(
                        callscope_core::format::days_in_month(year, month) as u64 - 1,
                    ))
                    .unwrap_or(start);
                self.monthly = self
                    .runtime
                    .block_on(self.backend.monthly(start, end, self.queue))?;
            }
            View::Classifiers => self.fetch_classifiers()?,
            View::Online => {
                self.health = Some(self.runtime.block_on(self.backend.health())?);
                let today = Local::now().date_naive();
                self.hourly = self.runtime.block_on(self.backend.hourly(
                    today,
                    today,
                    self.queue,
                    DailyMetric::Total,
                ))?;
            }
        }
        Ok(())
    }

    fn fetch_classifiers(&mut self) -> callscope_core::Result<()> {
        self.classifier_table = match self.classifier_metric {
            ClassifierMetric::Call => {
                let records = self.runtime.block_on(self.backend.call_classifiers(
                    self.start,
                    self.end,
                    self.queue,
                ))?;
                classifier_pivot(&records)
            }
            ClassifierMetric::Chat => {
                let records = self.runtime.block_on(self.backend.chat_classifiers(
                    self.start,
                    self.end,
                    self.queue,
                ))?;
                classifier_pivot(&records)
            }
            ClassifierMetric::Overall => {
                let records = self.runtime.block_on(self.backend.overall_classifiers(
                    self.start,
                    self.end,
                    self.queue,
                ))?;
                classifier_pivot(&records)
            }
            ClassifierMetric::Topics => {
                self.topics = self.runtime.block_on(self.backend.topics(
                    self.start,
                    self.end,
                    self.queue,
                ))?;
                topic_pivot(&self.topics)
            }
            ClassifierMetric::SubtopicsDaily => {
                // The pool is fetched once; drilling into another topic only
                // refilters it locally
                if self.subtopic_pool.is_empty() {
                    self.subtopic_pool = self.runtime.block_on(fetch_subtopic_pool(
                        &self.backend,
                        self.start,
                        self.end,
                        self.queue,
                    ))?;
                }
                let topic = self.drill_topic.clone().unwrap_or_default();
                let records: Vec<ClassifierRecord> = self
                    .subtopic_pool
                    .iter()
                    .filter(|r| r.topic == topic)
                    .cloned()
                    .collect();
                subtopic_pivot(&records)
            }
        };
        Ok(())
    }

    // ============================================
    // Key handling
    // ============================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.search_mode {
            self.handle_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('1') => self.switch_view(View::Daily),
            KeyCode::Char('2') => self.switch_view(View::Hourly),
            KeyCode::Char('3') => self.switch_view(View::Monthly),
            KeyCode::Char('4') => self.switch_view(View::Classifiers),
            KeyCode::Char('5') => self.switch_view(View::Online),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('f') => {
                self.queue = self.queue.next();
                self.subtopic_pool.clear();
                self.reload();
            }
            KeyCode::Char('m') => self.cycle_metric(),
            KeyCode::Char('[') => self.shift_range(-1),
            KeyCode::Char(']') => self.shift_range(1),
            KeyCode::Char('/') if self.view == View::Classifiers => {
                self.search_mode = true;
            }
            KeyCode::Char('s') if self.view == View::Classifiers => {
                self.toggle_sort(SortField::Label);
            }
            KeyCode::Char('d') if self.view == View::Classifiers => {
                self.toggle_sort(SortField::SubLabel);
            }
            KeyCode::Char('o') if self.view == View::Classifiers => {
                self.toggle_sort(SortField::Total);
            }
            KeyCode::Char('i') if self.view == View::Classifiers => {
                self.toggle_sort(SortField::Ratio);
            }
            KeyCode::Left if self.view == View::Classifiers => {
                self.column_cursor = self.column_cursor.saturating_sub(1);
            }
            KeyCode::Right if self.view == View::Classifiers => {
                let last = self.classifier_table.columns.len().saturating_sub(1);
                self.column_cursor = (self.column_cursor + 1).min(last);
            }
            KeyCode::Char('c') if self.view == View::Classifiers => {
                if let Some(column) = self.classifier_table.columns.get(self.column_cursor) {
                    self.toggle_sort(SortField::Column(column.clone()));
                }
            }
            KeyCode::Enter if self.view == View::Classifiers => self.drill_into_selected(),
            KeyCode::Esc if self.view == View::Classifiers => self.close_drill_down(),
            KeyCode::Char('e') => self.export_current_view(),
            KeyCode::Char('a') if self.view == View::Daily => self.export_all_metrics(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => {
                self.table_state.select(Some(0));
            }
            KeyCode::End | KeyCode::Char('G') => {
                let len = self.visible_row_count();
                self.table_state.select(Some(len.saturating_sub(1)));
            }
            _ => {}
        }
    }

    /// Keyboard input while the search prompt is active.
    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.search_mode = false;
            }
            KeyCode::Esc => {
                self.search_mode = false;
                self.search.clear();
            }
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(c) => {
                self.search.push(c);
            }
            _ => {}
        }
        self.table_state.select(Some(0));
    }

    fn switch_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.reload();
        }
    }

    /// Cycle the metric menu of the current view.
    fn cycle_metric(&mut self) {
        match self.view {
            View::Daily | View::Hourly => {
                let all = DailyMetric::ALL;
                let idx = all.iter().position(|m| *m == self.daily_metric).unwrap_or(0);
                self.daily_metric = all[(idx + 1) % all.len()];
                self.reload();
            }
            View::Classifiers => {
                let all = ClassifierMetric::ALL;
                let idx = all
                    .iter()
                    .position(|m| *m == self.classifier_metric)
                    .unwrap_or(0);
                self.classifier_metric = all[(idx + 1) % all.len()];
                self.reload();
            }
            _ => {}
        }
    }

    /// Move the date range a week, or the monthly anchor a month.
    fn shift_range(&mut self, direction: i64) {
        if self.view == View::Monthly {
            let (mut year, mut month) = self.month;
            if direction < 0 {
                if month == 1 {
                    year -= 1;
                    month = 12;
                } else {
                    month -= 1;
                }
            } else if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
            self.month = (year, month);
        } else {
            let days = Days::new(7);
            (self.start, self.end) = if direction < 0 {
                (
                    self.start.checked_sub_days(days).unwrap_or(self.start),
                    self.end.checked_sub_days(days).unwrap_or(self.end),
                )
            } else {
                (
                    self.start.checked_add_days(days).unwrap_or(self.start),
                    self.end.checked_add_days(days).unwrap_or(self.end),
                )
            };
            self.subtopic_pool.clear();
        }
        self.reload();
    }

    /// Toggle a sort field through ascending, descending, and off.
    fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.table_state.select(Some(0));
    }

    /// Drill from the selected classifier row into its subtopics-by-day view.
    fn drill_into_selected(&mut self) {
        if self.classifier_metric == ClassifierMetric::SubtopicsDaily {
            return;
        }
        let rows = self.visible_classifier_rows();
        let Some(row) = self.table_state.selected().and_then(|i| rows.get(i)) else {
            return;
        };
        self.drill_topic = Some(row.label.clone());
        self.classifier_metric = ClassifierMetric::SubtopicsDaily;
        self.reload();
    }

    fn close_drill_down(&mut self) {
        if self.classifier_metric == ClassifierMetric::SubtopicsDaily {
            self.drill_topic = None;
            self.classifier_metric = ClassifierMetric::Call;
            self.reload();
        }
    }

    // ============================================
    // Export
    // ============================================

    /// Export the current view to xlsx, reporting the outcome in the footer.
    fn export_current_view(&mut self) {
        let result = match self.view {
            View::Daily => export::export_metric(
                &self.daily,
                self.daily_metric,
                self.queue,
                self.start,
                self.end,
                &self.export_dir,
            ),
            View::Hourly => export::export_hourly(
                &self.hourly,
                self.daily_metric,
                self.queue,
                self.start,
                self.end,
                &self.export_dir,
            ),
            View::Monthly => {
                let (year, month) = self.month;
                export::export_monthly(&self.monthly, self.queue, year, month, &self.export_dir)
            }
            View::Classifiers => match self.classifier_metric {
                ClassifierMetric::Topics => export::export_topics(
                    &self.classifier_table,
                    self.queue,
                    self.start,
                    self.end,
                    &self.search,
                    &self.export_dir,
                ),
                metric => export::export_classifiers(
                    &self.classifier_table,
                    metric,
                    self.queue,
                    self.start,
                    self.end,
                    &self.search,
                    &self.export_dir,
                ),
            },
            View::Online => {
                self.status = Some(StatusMessage::info("the online view has no export"));
                return;
            }
        };
        self.finish_export(result);
    }

    fn export_all_metrics(&mut self) {
        let result = export::export_all_metrics(
            &self.daily,
            self.queue,
            self.start,
            self.end,
            &self.export_dir,
        );
        self.finish_export(result);
    }

    fn finish_export(&mut self, result: callscope_core::Result<PathBuf>) {
        self.status = Some(match result {
            Ok(path) => StatusMessage::info(format!("exported {}", path.display())),
            Err(Error::EmptyExport(reason)) => {
                StatusMessage::info(format!("nothing to export: {reason}"))
            }
            Err(Error::NotImplemented(msg)) => StatusMessage::info(msg),
            Err(err) => StatusMessage::error(format!("export failed: {err}")),
        });
    }

    // ============================================
    // Selection
    // ============================================

    fn visible_row_count(&self) -> usize {
        match self.view {
            View::Daily => self.daily.len(),
            View::Hourly => self.hourly.len(),
            View::Monthly => self.monthly.calls.len().max(self.monthly.chats.len()),
            View::Classifiers => self.visible_classifier_rows().len(),
            View::Online => 0,
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_row_count();
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        let prev = match self.table_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table_state.select(Some(prev));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // App construction needs a live runtime; key-handling logic that does not
    // touch the backend is covered through the pure state transitions below.

    fn app() -> App {
        let config = Config::default();
        let backend = HttpBackend::new(&config.backend).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        App::new(&config, backend, runtime)
    }

    #[test]
    fn test_default_range_is_one_week() {
        let app = app();
        assert_eq!((app.end - app.start).num_days(), 6);
    }

    #[test]
    fn test_month_anchor_wraps_across_year() {
        let mut app = app();
        app.view = View::Monthly;
        app.month = (2025, 1);
        app.shift_range(-1);
        assert_eq!(app.month, (2024, 12));
        app.shift_range(1);
        assert_eq!(app.month, (2025, 1));
    }

    #[test]
    fn test_search_mode_captures_and_clears() {
        let mut app = app();
        app.view = View::Classifiers;
        app.handle_key(KeyEvent::from(KeyCode::Char('/')));
        assert!(app.search_mode);

        app.handle_key(KeyEvent::from(KeyCode::Char('b')));
        app.handle_key(KeyEvent::from(KeyCode::Char('i')));
        assert_eq!(app.search, "bi");

        // 'q' is text while searching, not quit
        app.handle_key(KeyEvent::from(KeyCode::Char('q')));
        assert!(!app.should_quit);

        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert!(!app.search_mode);
        assert!(app.search.is_empty());
    }

    #[test]
    fn test_sort_toggle_cycles_off() {
        use callscope_core::table::SortDirection;
        let mut app = app();
        app.view = View::Classifiers;
        app.toggle_sort(SortField::Total);
        assert_eq!(app.sort.direction, SortDirection::Ascending);
        app.toggle_sort(SortField::Total);
        assert_eq!(app.sort.direction, SortDirection::Descending);
        app.toggle_sort(SortField::Total);
        assert_eq!(app.sort.direction, SortDirection::None);
    }
}

//! Admin view state and the rendered dashboard
//!
//! [`AdminViewState`] holds the filter, page size and current page. Changing
//! the filter or page size returns to page 1; moving past either end of the
//! page range is a no-op.

use cpoll_common::ResponseRecord;
use serde::Serialize;

use super::filter::{FilterCriteria, FilterOptions};
use super::pagination::{calculate_pagination, page_window, PageSize};
use super::summary::{ChartData, SummaryStatistics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminViewState {
    filters: FilterCriteria,
    page_size: PageSize,
    page: usize,
}

impl Default for AdminViewState {
    fn default() -> Self {
        Self {
            filters: FilterCriteria::default(),
            page_size: PageSize::default(),
            page: 1,
        }
    }
}

impl AdminViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a state carried in a request; the page is clamped at render
    pub fn with_parts(filters: FilterCriteria, page_size: PageSize, page: usize) -> Self {
        Self {
            filters,
            page_size,
            page: page.max(1),
        }
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Jump to `page`, clamped to `[1, max(1, total_pages)]`
    pub fn go_to(&mut self, page: usize, total_pages: usize) {
        self.page = page.max(1).min(total_pages.max(1));
    }

    pub fn next(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Build the dashboard over the full record set
    pub fn render(&self, records: &[ResponseRecord]) -> DashboardView {
        let summary = SummaryStatistics::compute(records);
        let chart = summary.chart();
        let filter_options = FilterOptions::from_records(records);

        let filtered = self.filters.apply(records);
        let pagination = calculate_pagination(filtered.len(), self.page_size, self.page);

        let rows = filtered
            .iter()
            .skip(pagination.offset)
            .take(self.page_size.rows())
            .enumerate()
            .map(|(index, record)| TableRow {
                serial: pagination.offset + index + 1,
                record: (*record).clone(),
            })
            .collect();

        DashboardView {
            summary,
            chart,
            filter_options,
            filters: self.filters.clone(),
            pagination: PageInfo {
                page: pagination.page,
                page_size: self.page_size,
                total_pages: pagination.total_pages,
                total_filtered: filtered.len(),
                pages: page_window(pagination.page, pagination.total_pages),
                has_previous: pagination.page > 1,
                has_next: pagination.page < pagination.total_pages,
            },
            rows,
        }
    }
}

/// Everything the admin dashboard displays
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub summary: SummaryStatistics,
    pub chart: ChartData,
    pub filter_options: FilterOptions,
    pub filters: FilterCriteria,
    pub pagination: PageInfo,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: PageSize,
    pub total_pages: usize,
    pub total_filtered: usize,
    /// Page button numbers
    pub pages: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// One table row; serial numbers continue across pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub serial: usize,
    #[serde(flatten)]
    pub record: ResponseRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::tests::record;

    fn records(n: usize) -> Vec<ResponseRecord> {
        (0..n)
            .map(|i| record(&format!("Respondent {}", i), "Osun", "x"))
            .collect()
    }

    #[test]
    fn test_default_state() {
        let state = AdminViewState::new();
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), PageSize::TwentyFive);
        assert!(state.filters().is_empty());
    }

    #[test]
    fn test_last_page_of_120() {
        let all = records(120);
        let state = AdminViewState::with_parts(FilterCriteria::default(), PageSize::TwentyFive, 5);
        let view = state.render(&all);

        assert_eq!(view.pagination.total_pages, 5);
        assert_eq!(view.rows.len(), 20);
        assert_eq!(view.rows[0].serial, 101);
        assert_eq!(view.rows[0].record.name, "Respondent 100");
        assert_eq!(view.rows[19].serial, 120);
        assert!(!view.pagination.has_next);
        assert!(view.pagination.has_previous);
    }

    #[test]
    fn test_page_past_end_clamps() {
        let all = records(120);
        let state = AdminViewState::with_parts(FilterCriteria::default(), PageSize::TwentyFive, 6);
        let view = state.render(&all);
        assert_eq!(view.pagination.page, 5);
        assert_eq!(view.rows[0].serial, 101);
    }

    #[test]
    fn test_next_and_previous_stop_at_ends() {
        let mut state = AdminViewState::new();
        state.previous();
        assert_eq!(state.page(), 1);

        state.go_to(5, 5);
        state.next(5);
        assert_eq!(state.page(), 5);

        state.go_to(99, 5);
        assert_eq!(state.page(), 5);
        state.previous();
        assert_eq!(state.page(), 4);
    }

    #[test]
    fn test_filter_and_size_changes_reset_page() {
        let mut state = AdminViewState::new();
        state.go_to(3, 5);
        state.set_page_size(PageSize::Ten);
        assert_eq!(state.page(), 1);

        state.go_to(3, 5);
        state.set_filters(FilterCriteria {
            state: "Oyo".to_string(),
            ..Default::default()
        });
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_summary_ignores_filter() {
        let mut all = records(3);
        all[0].state = "Oyo".to_string();
        let mut state = AdminViewState::new();
        state.set_filters(FilterCriteria {
            state: "Oyo".to_string(),
            ..Default::default()
        });

        let view = state.render(&all);
        assert_eq!(view.summary.total, 3);
        assert_eq!(view.pagination.total_filtered, 1);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.filter_options.states, vec!["Osun", "Oyo"]);
    }

    #[test]
    fn test_empty_view() {
        let view = AdminViewState::new().render(&[]);
        assert_eq!(view.pagination.page, 1);
        assert_eq!(view.pagination.total_pages, 0);
        assert!(view.pagination.pages.is_empty());
        assert!(view.rows.is_empty());
    }
}

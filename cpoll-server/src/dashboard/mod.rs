//! Admin aggregation and filtering view
//!
//! Pure computation over a snapshot of stored records: filtering, summary
//! statistics, chart data and pagination. No I/O.

pub mod filter;
pub mod pagination;
pub mod summary;
pub mod view;

pub use filter::{FilterCriteria, FilterOptions};
pub use pagination::{calculate_pagination, page_window, PageSize, Pagination};
pub use summary::{ChartData, SummaryStatistics};
pub use view::{AdminViewState, DashboardView, TableRow};

//! Dashboard state, rendering and polling logic
//!
//! - models: payloads of the summary, chart data and quick-add endpoints
//! - page: the element surface the dashboard renders into
//! - chart: pie and bar chart state
//! - summary: summary figure display
//! - api: backend access trait
//! - controller: quick-add modal, refresh chains and polling

pub mod api;
pub mod chart;
pub mod controller;
pub mod error;
pub mod models;
pub mod page;
pub mod summary;

pub use api::{ApiRef, DashboardApi};
pub use chart::{ChartInstance, ChartKind, ChartRenderer, Dataset};
pub use controller::{DashboardController, EventOutcome, PollingHandle, RefreshReport};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{CategoryTotal, ChartData, FormData, MonthlySeries, SubmitOutcome, SummaryFigures};
pub use page::{MemoryPage, Page, PageEvent, PageRef};
pub use summary::SummaryUpdater;

//! Backend access used by the dashboard

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{ChartData, FormData, SubmitOutcome, SummaryFigures};

/// Backend reference type
pub type ApiRef = Arc<dyn DashboardApi>;

/// The three backend calls the dashboard makes
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch the current month totals
    async fn fetch_summary(&self) -> CoreResult<SummaryFigures>;

    /// Fetch the pie and bar chart aggregates
    async fn fetch_chart_data(&self) -> CoreResult<ChartData>;

    /// Post the quick-add form fields.
    ///
    /// A transport failure is an error; any HTTP answer is an outcome.
    async fn submit_quick_add(&self, form: &FormData) -> CoreResult<SubmitOutcome>;
}

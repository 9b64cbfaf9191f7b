//! Payloads exchanged with the tracker backend

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Current month totals from the summary endpoint.
///
/// Fields the backend omits (or sends as `null`) display as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryFigures {
    #[serde(rename = "Income", default)]
    pub income: Option<f64>,
    #[serde(rename = "Expense", default)]
    pub expense: Option<f64>,
    #[serde(rename = "Investment", default)]
    pub investment: Option<f64>,
}

impl SummaryFigures {
    pub fn new(income: f64, expense: f64, investment: f64) -> Self {
        Self {
            income: Some(income),
            expense: Some(expense),
            investment: Some(investment),
        }
    }

    pub fn income_or_zero(&self) -> f64 {
        self.income.unwrap_or(0.0)
    }

    pub fn expense_or_zero(&self) -> f64 {
        self.expense.unwrap_or(0.0)
    }

    pub fn investment_or_zero(&self) -> f64 {
        self.investment.unwrap_or(0.0)
    }
}

/// Display text for a figure: the shortest form of the number, `100` not `100.0`
pub fn display_number(value: f64) -> String {
    format!("{}", value)
}

/// Expense total for one category (pie slice)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub total: f64,
}

impl CategoryTotal {
    pub fn new(category: &str, total: f64) -> Self {
        Self {
            category: category.to_string(),
            total,
        }
    }
}

/// Monthly income and expense, index-aligned with `labels`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub income: Vec<f64>,
    #[serde(default)]
    pub expense: Vec<f64>,
}

impl MonthlySeries {
    /// `labels[i]`, `income[i]` and `expense[i]` describe the same month,
    /// so all three must have the same length.
    pub fn check_alignment(&self) -> CoreResult<()> {
        if self.labels.len() != self.income.len() || self.labels.len() != self.expense.len() {
            return Err(CoreError::MalformedPayload {
                message: format!(
                    "monthly series not aligned: {} labels, {} income values, {} expense values",
                    self.labels.len(),
                    self.income.len(),
                    self.expense.len()
                ),
            });
        }
        Ok(())
    }
}

/// Chart aggregates from the chart data endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub expense_by_category: Vec<CategoryTotal>,
    #[serde(default)]
    pub monthly: MonthlySeries,
}

/// Fields of the quick-add form, in form order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FormData::append`]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.append(name, value);
        self
    }

    pub fn append(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    /// First value submitted under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// What the backend did with a quick-add submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response redirected the client; the page should follow
    Redirected { url: String },
    /// The response came straight back from the add endpoint
    Stayed { status: u16 },
}

impl SubmitOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, SubmitOutcome::Redirected { .. })
    }

    /// A redirect, or a 2xx answer from the add endpoint itself
    pub fn is_success(&self) -> bool {
        match self {
            SubmitOutcome::Redirected { .. } => true,
            SubmitOutcome::Stayed { status } => (200..300).contains(status),
        }
    }
}

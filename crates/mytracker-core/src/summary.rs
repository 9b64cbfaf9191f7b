//! Summary figure display

use mytracker_config::ElementsConfig;

use crate::error::CoreResult;
use crate::models::{display_number, SummaryFigures};
use crate::page::Page;

/// Writes the three summary figures into their text elements
#[derive(Debug, Clone)]
pub struct SummaryUpdater {
    income_id: String,
    expense_id: String,
    invest_id: String,
}

impl SummaryUpdater {
    pub fn new(elements: &ElementsConfig) -> Self {
        Self {
            income_id: elements.sum_income.clone(),
            expense_id: elements.sum_expense.clone(),
            invest_id: elements.sum_invest.clone(),
        }
    }

    /// Plain text replacement, missing figures shown as `0`
    pub fn apply_summary(&self, figures: &SummaryFigures, page: &dyn Page) -> CoreResult<()> {
        page.set_text(&self.income_id, &display_number(figures.income_or_zero()))?;
        page.set_text(&self.expense_id, &display_number(figures.expense_or_zero()))?;
        page.set_text(&self.invest_id, &display_number(figures.investment_or_zero()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    #[test]
    fn test_income_only() {
        let elements = ElementsConfig::default();
        let page = MemoryPage::dashboard(&elements);
        let figures: SummaryFigures = serde_json::from_str(r#"{"Income": 100}"#).unwrap();

        SummaryUpdater::new(&elements).apply_summary(&figures, &page).unwrap();

        assert_eq!(page.text("sum-income").as_deref(), Some("100"));
        assert_eq!(page.text("sum-expense").as_deref(), Some("0"));
        assert_eq!(page.text("sum-invest").as_deref(), Some("0"));
    }

    #[test]
    fn test_all_figures() {
        let elements = ElementsConfig::default();
        let page = MemoryPage::dashboard(&elements);

        SummaryUpdater::new(&elements)
            .apply_summary(&SummaryFigures::new(50000.0, 21000.5, 10000.0), &page)
            .unwrap();

        assert_eq!(page.text("sum-income").as_deref(), Some("50000"));
        assert_eq!(page.text("sum-expense").as_deref(), Some("21000.5"));
        assert_eq!(page.text("sum-invest").as_deref(), Some("10000"));
    }

    #[test]
    fn test_missing_element_is_reported() {
        let elements = ElementsConfig::default();
        let page = MemoryPage::with_elements(&["sum-income", "sum-expense"]);

        let err = SummaryUpdater::new(&elements)
            .apply_summary(&SummaryFigures::default(), &page)
            .unwrap_err();

        assert_eq!(err.to_string(), "Element not found: #sum-invest");
        assert_eq!(page.text("sum-income").as_deref(), Some("0"));
    }
}

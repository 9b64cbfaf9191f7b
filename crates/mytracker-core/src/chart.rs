//! Pie and bar chart state

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::ChartData;
use crate::page::Page;

/// Chart type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Expense by category
    Pie,
    /// Monthly income and expense
    Bar,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Pie => write!(f, "pie"),
            ChartKind::Bar => write!(f, "bar"),
        }
    }
}

/// One data series of a chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Legend label (bar datasets only)
    pub label: Option<String>,
    pub data: Vec<f64>,
    /// Per-value colors (pie slices only)
    pub background_color: Vec<String>,
}

impl Dataset {
    fn labelled(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Default::default()
        }
    }
}

/// Rendering state of one chart canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInstance {
    pub kind: ChartKind,
    /// Id of the canvas element the chart draws into
    pub element_id: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    /// Number of redraws since creation
    pub revision: u64,
}

impl ChartInstance {
    /// Empty pie chart: one dataset of values with per-slice colors
    pub fn pie(element_id: &str) -> Self {
        Self {
            kind: ChartKind::Pie,
            element_id: element_id.to_string(),
            labels: vec![],
            datasets: vec![Dataset::default()],
            revision: 0,
        }
    }

    /// Empty bar chart: "Income" and "Expense" datasets sharing labels
    pub fn bar(element_id: &str) -> Self {
        Self {
            kind: ChartKind::Bar,
            element_id: element_id.to_string(),
            labels: vec![],
            datasets: vec![Dataset::labelled("Income"), Dataset::labelled("Expense")],
            revision: 0,
        }
    }

    /// Redraw after the labels and datasets were replaced
    pub fn update(&mut self, page: &dyn Page) -> CoreResult<()> {
        self.revision += 1;
        page.draw_chart(self)
    }
}

/// Owns the dashboard's two charts and applies chart data to them in place
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    pie: ChartInstance,
    bar: ChartInstance,
    palette: Vec<String>,
}

impl ChartRenderer {
    /// Create both charts on their canvases and draw them empty.
    ///
    /// Fails if either canvas is missing from the page.
    pub fn init(
        pie_element: &str,
        bar_element: &str,
        palette: Vec<String>,
        page: &dyn Page,
    ) -> CoreResult<Self> {
        for id in [pie_element, bar_element] {
            if !page.has_element(id) {
                return Err(CoreError::ElementNotFound { id: id.to_string() });
            }
        }
        if palette.is_empty() {
            return Err(CoreError::ConfigError {
                message: "chart palette is empty".to_string(),
            });
        }

        let renderer = Self {
            pie: ChartInstance::pie(pie_element),
            bar: ChartInstance::bar(bar_element),
            palette,
        };
        page.draw_chart(&renderer.pie)?;
        page.draw_chart(&renderer.bar)?;
        Ok(renderer)
    }

    pub fn pie(&self) -> &ChartInstance {
        &self.pie
    }

    pub fn bar(&self) -> &ChartInstance {
        &self.bar
    }

    /// Slice color for position `index`, cycling through the palette
    pub fn slice_color(&self, index: usize) -> &str {
        &self.palette[index % self.palette.len()]
    }

    /// Replace both charts' labels and values with `data` and redraw them.
    ///
    /// Misaligned monthly arrays reject the whole payload; neither chart
    /// changes in that case.
    pub fn apply_chart_data(&mut self, data: &ChartData, page: &dyn Page) -> CoreResult<()> {
        data.monthly.check_alignment()?;

        let labels: Vec<String> = data
            .expense_by_category
            .iter()
            .map(|c| c.category.clone())
            .collect();
        let colors: Vec<String> = (0..labels.len())
            .map(|i| self.slice_color(i).to_string())
            .collect();
        self.pie.labels = labels;
        self.pie.datasets[0].data = data.expense_by_category.iter().map(|c| c.total).collect();
        self.pie.datasets[0].background_color = colors;
        self.pie.update(page)?;

        self.bar.labels = data.monthly.labels.clone();
        self.bar.datasets[0].data = data.monthly.income.clone();
        self.bar.datasets[1].data = data.monthly.expense.clone();
        self.bar.update(page)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryTotal, MonthlySeries};
    use crate::page::MemoryPage;
    use mytracker_config::DEFAULT_PALETTE;

    fn palette() -> Vec<String> {
        DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
    }

    fn renderer(page: &MemoryPage) -> ChartRenderer {
        ChartRenderer::init("pieChart", "barChart", palette(), page).unwrap()
    }

    #[test]
    fn test_init_draws_empty_charts() {
        let page = MemoryPage::with_elements(&["pieChart", "barChart"]);
        let renderer = renderer(&page);

        let pie = page.chart("pieChart").unwrap();
        assert_eq!(pie.kind, ChartKind::Pie);
        assert!(pie.labels.is_empty());
        assert_eq!(pie.datasets.len(), 1);

        let bar = page.chart("barChart").unwrap();
        let names: Vec<Option<String>> = bar.datasets.iter().map(|d| d.label.clone()).collect();
        assert_eq!(names, vec![Some("Income".to_string()), Some("Expense".to_string())]);
        assert_eq!(renderer.bar().revision, 0);
    }

    #[test]
    fn test_init_requires_canvases() {
        let page = MemoryPage::with_elements(&["pieChart"]);
        let err = ChartRenderer::init("pieChart", "barChart", palette(), &page).unwrap_err();
        assert!(matches!(err, CoreError::ElementNotFound { ref id } if id == "barChart"));
    }

    #[test]
    fn test_pie_from_expense_by_category() {
        let page = MemoryPage::with_elements(&["pieChart", "barChart"]);
        let mut renderer = renderer(&page);
        let data = ChartData {
            expense_by_category: vec![CategoryTotal::new("Food", 50.0), CategoryTotal::new("Rent", 200.0)],
            monthly: MonthlySeries::default(),
        };

        renderer.apply_chart_data(&data, &page).unwrap();

        let pie = page.chart("pieChart").unwrap();
        assert_eq!(pie.labels, vec!["Food", "Rent"]);
        assert_eq!(pie.datasets[0].data, vec![50.0, 200.0]);
        assert_eq!(pie.datasets[0].background_color, vec!["#e62429", "#ffb86b"]);
        assert_eq!(pie.revision, 1);
    }

    #[test]
    fn test_pie_colors_cycle_through_palette() {
        let page = MemoryPage::with_elements(&["pieChart", "barChart"]);
        let mut renderer = renderer(&page);
        let data = ChartData {
            expense_by_category: (0..7).map(|i| CategoryTotal::new(&format!("c{i}"), i as f64)).collect(),
            monthly: MonthlySeries::default(),
        };

        renderer.apply_chart_data(&data, &page).unwrap();

        let colors = &renderer.pie().datasets[0].background_color;
        assert_eq!(colors.len(), 7);
        assert_eq!(colors[5], colors[0]);
        assert_eq!(colors[6], "#ffb86b");
    }

    #[test]
    fn test_bar_from_monthly_series() {
        let page = MemoryPage::with_elements(&["pieChart", "barChart"]);
        let mut renderer = renderer(&page);
        let data = ChartData {
            expense_by_category: vec![],
            monthly: MonthlySeries {
                labels: vec!["Jan".to_string(), "Feb".to_string()],
                income: vec![1000.0, 1100.0],
                expense: vec![400.0, 420.0],
            },
        };

        renderer.apply_chart_data(&data, &page).unwrap();

        let bar = page.chart("barChart").unwrap();
        assert_eq!(bar.labels, vec!["Jan", "Feb"]);
        assert_eq!(bar.datasets[0].label.as_deref(), Some("Income"));
        assert_eq!(bar.datasets[0].data, vec![1000.0, 1100.0]);
        assert_eq!(bar.datasets[1].data, vec![400.0, 420.0]);
    }

    #[test]
    fn test_charts_are_mutated_in_place() {
        let page = MemoryPage::with_elements(&["pieChart", "barChart"]);
        let mut renderer = renderer(&page);
        let first = ChartData {
            expense_by_category: vec![CategoryTotal::new("Food", 50.0), CategoryTotal::new("Rent", 200.0)],
            monthly: MonthlySeries::default(),
        };
        let second = ChartData {
            expense_by_category: vec![CategoryTotal::new("Internet", 1000.0)],
            monthly: MonthlySeries::default(),
        };

        renderer.apply_chart_data(&first, &page).unwrap();
        renderer.apply_chart_data(&second, &page).unwrap();

        let pie = page.chart("pieChart").unwrap();
        assert_eq!(pie.labels, vec!["Internet"]);
        assert_eq!(pie.datasets[0].background_color, vec!["#e62429"]);
        assert_eq!(pie.revision, 2);
    }

    #[test]
    fn test_misaligned_payload_leaves_charts_untouched() {
        let page = MemoryPage::with_elements(&["pieChart", "barChart"]);
        let mut renderer = renderer(&page);
        let data = ChartData {
            expense_by_category: vec![CategoryTotal::new("Food", 50.0)],
            monthly: MonthlySeries {
                labels: vec!["Jan".to_string(), "Feb".to_string()],
                income: vec![1000.0, 1100.0],
                expense: vec![400.0],
            },
        };

        let err = renderer.apply_chart_data(&data, &page).unwrap_err();
        assert!(matches!(err, CoreError::MalformedPayload { .. }));
        assert!(renderer.pie().labels.is_empty());
        assert_eq!(page.chart("pieChart").unwrap().revision, 0);
        assert_eq!(page.chart("barChart").unwrap().revision, 0);
    }
}

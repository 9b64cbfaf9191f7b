//! Terminal rendering of the dashboard page

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use mytracker_config::ElementsConfig;
use mytracker_core::{ChartInstance, ChartKind, CoreError, CoreResult, Page};

const BAR_WIDTH: usize = 40;

/// Page that prints every update to stdout
pub struct TerminalPage {
    elements: HashSet<String>,
    labels: ElementsConfig,
    out: Mutex<std::io::Stdout>,
}

impl TerminalPage {
    pub fn new(elements: &ElementsConfig) -> Self {
        Self {
            elements: elements.all().into_iter().map(str::to_string).collect(),
            labels: elements.clone(),
            out: Mutex::new(std::io::stdout()),
        }
    }

    fn label<'a>(&self, id: &'a str) -> &'a str {
        if id == self.labels.sum_income {
            "Income"
        } else if id == self.labels.sum_expense {
            "Expense"
        } else if id == self.labels.sum_invest {
            "Investment"
        } else {
            id
        }
    }

    fn print(&self, text: &str) -> CoreResult<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| CoreError::InternalError { message: "stdout lock poisoned".to_string() })?;
        writeln!(out, "{}", text).map_err(|e| CoreError::InternalError { message: e.to_string() })
    }

    fn check(&self, id: &str) -> CoreResult<()> {
        if self.elements.contains(id) {
            Ok(())
        } else {
            Err(CoreError::ElementNotFound { id: id.to_string() })
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let width = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(width.max(1))
}

/// Text rendering of a chart
pub fn render_chart(chart: &ChartInstance) -> String {
    let mut lines = vec![];
    match chart.kind {
        ChartKind::Pie => {
            lines.push("Expense by category".to_string());
            let dataset = chart.datasets.first();
            let values = dataset.map(|d| d.data.as_slice()).unwrap_or_default();
            let total: f64 = values.iter().sum();
            for (i, label) in chart.labels.iter().enumerate() {
                let value = values.get(i).copied().unwrap_or(0.0);
                let color = dataset
                    .and_then(|d| d.background_color.get(i))
                    .map(String::as_str)
                    .unwrap_or("");
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                lines.push(format!("  {:<16} {:>12} {:>5.1}% {}", label, value, share, color));
            }
        }
        ChartKind::Bar => {
            lines.push("Monthly income / expense".to_string());
            let max = chart
                .datasets
                .iter()
                .flat_map(|d| d.data.iter().copied())
                .fold(0.0_f64, f64::max);
            for (i, label) in chart.labels.iter().enumerate() {
                for dataset in &chart.datasets {
                    let value = dataset.data.get(i).copied().unwrap_or(0.0);
                    let name = dataset.label.as_deref().unwrap_or("");
                    lines.push(format!("  {:<8} {:<8} {:>12} {}", label, name, value, bar(value, max)));
                }
            }
        }
    }
    if chart.labels.is_empty() {
        lines.push("  (no data)".to_string());
    }
    lines.join("\n")
}

impl Page for TerminalPage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    fn set_text(&self, id: &str, text: &str) -> CoreResult<()> {
        self.check(id)?;
        self.print(&format!("[{}] {:<10} {}", timestamp(), self.label(id), text))
    }

    fn set_visible(&self, id: &str, visible: bool) -> CoreResult<()> {
        self.check(id)?;
        let state = if visible { "shown" } else { "hidden" };
        self.print(&format!("[{}] {} {}", timestamp(), id, state))
    }

    fn draw_chart(&self, chart: &ChartInstance) -> CoreResult<()> {
        self.check(&chart.element_id)?;
        // Charts are drawn empty once at startup; skip that frame
        if chart.revision == 0 {
            return Ok(());
        }
        self.print(&format!("[{}] {}", timestamp(), render_chart(chart)))
    }

    fn navigate(&self, url: &str) {
        let _ = self.print(&format!("[{}] -> {}", timestamp(), url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pie_chart() {
        let mut chart = ChartInstance::pie("pieChart");
        chart.labels = vec!["Food".to_string(), "Rent".to_string()];
        chart.datasets[0].data = vec![50.0, 150.0];
        chart.datasets[0].background_color = vec!["#e62429".to_string(), "#ffb86b".to_string()];

        let text = render_chart(&chart);
        assert!(text.contains("Food"));
        assert!(text.contains("25.0%"));
        assert!(text.contains("#ffb86b"));
    }

    #[test]
    fn test_render_bar_chart() {
        let mut chart = ChartInstance::bar("barChart");
        chart.labels = vec!["Jan".to_string()];
        chart.datasets[0].data = vec![1000.0];
        chart.datasets[1].data = vec![500.0];

        let text = render_chart(&chart);
        assert!(text.contains("Income"));
        assert!(text.contains(&"█".repeat(BAR_WIDTH)));
        assert!(text.contains(&"█".repeat(BAR_WIDTH / 2)));
    }

    #[test]
    fn test_render_empty_chart() {
        assert!(render_chart(&ChartInstance::pie("pieChart")).contains("(no data)"));
    }

    #[test]
    fn test_terminal_page_elements() {
        let page = TerminalPage::new(&ElementsConfig::default());
        assert!(page.has_element("sum-income"));
        assert!(page.set_text("missing", "0").is_err());
        assert_eq!(page.label("sum-invest"), "Investment");
    }
}

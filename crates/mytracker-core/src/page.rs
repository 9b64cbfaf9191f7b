//! The page surface the dashboard renders into
//!
//! A [`Page`] stands in for the dashboard markup: elements addressed by id,
//! text nodes, a modal that can be shown or hidden, two chart canvases, and
//! the page location. [`MemoryPage`] keeps all of it in memory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use mytracker_config::ElementsConfig;

use crate::chart::ChartInstance;
use crate::error::{CoreError, CoreResult};
use crate::models::FormData;

/// Page reference type
pub type PageRef = Arc<dyn Page>;

/// Rendering surface for the dashboard
pub trait Page: Send + Sync {
    /// Whether an element with this id exists
    fn has_element(&self, id: &str) -> bool;

    /// Replace the text content of an element
    fn set_text(&self, id: &str, text: &str) -> CoreResult<()>;

    /// Show or hide an element
    fn set_visible(&self, id: &str, visible: bool) -> CoreResult<()>;

    /// Redraw the canvas bound to `chart.element_id`
    fn draw_chart(&self, chart: &ChartInstance) -> CoreResult<()>;

    /// Replace the whole page with another location
    fn navigate(&self, url: &str);

    /// Ids from `ids` that the page does not carry
    fn missing_elements<'a>(&self, ids: &[&'a str]) -> Vec<&'a str> {
        ids.iter().copied().filter(|id| !self.has_element(id)).collect()
    }
}

/// User interaction with the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// An element was clicked
    Click { id: String },
    /// A form was submitted with its current fields
    Submit { id: String, form: FormData },
}

impl PageEvent {
    pub fn click(id: &str) -> Self {
        PageEvent::Click { id: id.to_string() }
    }

    pub fn submit(id: &str, form: FormData) -> Self {
        PageEvent::Submit { id: id.to_string(), form }
    }
}

/// State of one element of a [`MemoryPage`]
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    pub text: String,
    pub visible: bool,
    pub chart: Option<ChartInstance>,
}

#[derive(Debug, Default)]
struct MemoryPageState {
    elements: HashMap<String, MemoryElement>,
    location: Option<String>,
}

/// In-memory page
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: RwLock<MemoryPageState>,
}

impl MemoryPage {
    /// Page carrying exactly the given element ids, all visible and empty
    pub fn with_elements(ids: &[&str]) -> Self {
        let elements = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    MemoryElement {
                        visible: true,
                        ..Default::default()
                    },
                )
            })
            .collect();
        Self {
            state: RwLock::new(MemoryPageState {
                elements,
                location: None,
            }),
        }
    }

    /// Dashboard markup: every configured element, modal initially hidden
    pub fn dashboard(elements: &ElementsConfig) -> Self {
        let page = Self::with_elements(&elements.all());
        if let Ok(mut state) = page.state.write() {
            if let Some(modal) = state.elements.get_mut(&elements.modal) {
                modal.visible = false;
            }
        }
        page
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.read().elements.get(id).map(|e| e.text.clone())
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.read().elements.get(id).map(|e| e.visible)
    }

    /// Last drawn state of a chart canvas
    pub fn chart(&self, id: &str) -> Option<ChartInstance> {
        self.read().elements.get(id).and_then(|e| e.chart.clone())
    }

    /// Location the page navigated to, if any
    pub fn location(&self) -> Option<String> {
        self.read().location.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryPageState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_element<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut MemoryElement) -> T,
    ) -> CoreResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|_| CoreError::InternalError { message: "page state poisoned".to_string() })?;
        state
            .elements
            .get_mut(id)
            .map(f)
            .ok_or_else(|| CoreError::ElementNotFound { id: id.to_string() })
    }
}

impl Page for MemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.read().elements.contains_key(id)
    }

    fn set_text(&self, id: &str, text: &str) -> CoreResult<()> {
        self.with_element(id, |element| element.text = text.to_string())
    }

    fn set_visible(&self, id: &str, visible: bool) -> CoreResult<()> {
        self.with_element(id, |element| element.visible = visible)
    }

    fn draw_chart(&self, chart: &ChartInstance) -> CoreResult<()> {
        self.with_element(&chart.element_id, |element| element.chart = Some(chart.clone()))
    }

    fn navigate(&self, url: &str) {
        if let Ok(mut state) = self.state.write() {
            state.location = Some(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_page_hides_modal() {
        let elements = ElementsConfig::default();
        let page = MemoryPage::dashboard(&elements);

        assert_eq!(page.is_visible("quickAddModal"), Some(false));
        assert_eq!(page.is_visible("quick-add-btn"), Some(true));
        assert_eq!(page.text("sum-income"), Some(String::new()));
        assert!(page.missing_elements(&elements.all()).is_empty());
    }

    #[test]
    fn test_set_text_on_missing_element() {
        let page = MemoryPage::with_elements(&["sum-income"]);
        assert!(page.set_text("sum-income", "100").is_ok());
        assert_eq!(page.text("sum-income").as_deref(), Some("100"));

        let err = page.set_text("sum-expense", "0").unwrap_err();
        assert!(matches!(err, CoreError::ElementNotFound { ref id } if id == "sum-expense"));
    }

    #[test]
    fn test_missing_elements() {
        let page = MemoryPage::with_elements(&["pieChart"]);
        assert_eq!(page.missing_elements(&["pieChart", "barChart"]), vec!["barChart"]);
    }

    #[test]
    fn test_navigate_records_location() {
        let page = MemoryPage::default();
        assert_eq!(page.location(), None);
        page.navigate("http://127.0.0.1:10000/records");
        assert_eq!(page.location().as_deref(), Some("http://127.0.0.1:10000/records"));
    }
}

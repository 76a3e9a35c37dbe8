use serde::Serialize;

use super::ContainerState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The `<select>` that feeds the load trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    options: Vec<SelectOption>,
    state: ContainerState,
}

impl Selector {
    /// Replaces the options 1:1 with `symbols`, keeping their order. A previous
    /// selection survives if its value is still offered.
    pub fn replace(&mut self, symbols: Vec<String>) {
        let selected = self.selected().map(str::to_string);
        self.options = symbols
            .into_iter()
            .map(|s| SelectOption {
                selected: selected.as_deref() == Some(s.as_str()),
                label: s.clone(),
                value: s,
            })
            .collect();
        self.state = ContainerState::Loaded;
    }

    /// Marks `value` as selected. Returns false if no option carries it.
    pub fn select(&mut self, value: &str) -> bool {
        if !self.options.iter().any(|o| o.value == value) {
            return false;
        }
        for option in &mut self.options {
            option.selected = option.value == value;
        }
        true
    }

    /// Explicitly selected value, or the first option as a browser would submit.
    pub fn current_value(&self) -> Option<&str> {
        self.selected()
            .or_else(|| self.options.first().map(|o| o.value.as_str()))
    }

    pub fn selected(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.value.as_str())
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options_mirror_response_order() {
        let mut selector = Selector::default();
        selector.replace(symbols(&["TSLA", "AAPL", "MSFT"]));

        let values: Vec<&str> = selector.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["TSLA", "AAPL", "MSFT"]);
        assert!(selector.options().iter().all(|o| o.label == o.value));
        assert_eq!(selector.state(), ContainerState::Loaded);
    }

    #[test]
    fn test_replace_clears_previous_options() {
        let mut selector = Selector::default();
        selector.replace(symbols(&["AAPL", "MSFT"]));
        selector.replace(symbols(&["NVDA"]));
        assert_eq!(selector.options().len(), 1);
    }

    #[test]
    fn test_selection_survives_when_still_offered() {
        let mut selector = Selector::default();
        selector.replace(symbols(&["AAPL", "MSFT"]));
        assert!(selector.select("MSFT"));

        selector.replace(symbols(&["MSFT", "TSLA"]));
        assert_eq!(selector.selected(), Some("MSFT"));

        selector.replace(symbols(&["TSLA"]));
        assert_eq!(selector.selected(), None);
        assert_eq!(selector.current_value(), Some("TSLA"));
    }

    #[test]
    fn test_select_unknown_value() {
        let mut selector = Selector::default();
        selector.replace(symbols(&["AAPL"]));
        assert!(!selector.select("ZZZ"));
        assert_eq!(selector.selected(), None);
    }

    #[test]
    fn test_empty_selector_has_no_value() {
        let selector = Selector::default();
        assert_eq!(selector.current_value(), None);
        assert_eq!(selector.state(), ContainerState::Empty);
    }
}

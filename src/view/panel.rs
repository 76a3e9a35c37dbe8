use serde::Serialize;

use super::format::plain;
use super::ContainerState;
use crate::types::PerformanceSummary;

/// A block of paragraphs, e.g. the `#performance` summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Panel {
    lines: Vec<String>,
    state: ContainerState,
}

impl Panel {
    pub fn replace(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.state = ContainerState::Loaded;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }
}

pub fn performance_lines(summary: &PerformanceSummary) -> Vec<String> {
    vec![
        format!("Total Value: ${}", plain(summary.total_value)),
        format!("Unrealized PnL: ${}", plain(summary.unrealized_pnl)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_lines() {
        let lines = performance_lines(&PerformanceSummary {
            total_value: 120000.0,
            unrealized_pnl: 5000.5,
        });
        assert_eq!(lines, vec!["Total Value: $120000", "Unrealized PnL: $5000.5"]);
    }

    #[test]
    fn test_replace_overwrites() {
        let mut panel = Panel::default();
        panel.replace(vec!["a".to_string(), "b".to_string()]);
        panel.replace(vec!["c".to_string()]);
        assert_eq!(panel.lines(), ["c".to_string()]);
        assert_eq!(panel.state(), ContainerState::Loaded);
    }
}

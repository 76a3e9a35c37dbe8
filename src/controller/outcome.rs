use std::fmt;

use crate::api::FetchError;
use crate::config::PagePanel;

/// What happened to one container after a fetch settled.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered,
    /// A newer request for the same container was issued; nothing changed.
    Stale,
    /// Not attempted because an earlier pipeline step did not render.
    Skipped,
    /// Logged and swallowed; prior content is left intact.
    Failed(FetchError),
}

impl RenderOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RenderOutcome::Rendered => "rendered",
            RenderOutcome::Stale => "stale",
            RenderOutcome::Skipped => "skipped",
            RenderOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderOutcome::Rendered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RenderOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            RenderOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct BootstrapReport {
    pub panels: Vec<(PagePanel, RenderOutcome)>,
}

impl BootstrapReport {
    #[cfg(test)]
    pub fn get(&self, panel: PagePanel) -> Option<&RenderOutcome> {
        self.panels.iter().find(|(p, _)| *p == panel).map(|(_, o)| o)
    }

    pub fn failures(&self) -> usize {
        self.panels.iter().filter(|(_, o)| o.is_failed()).count()
    }
}

/// Outcome of one load-trigger pipeline: table, chart, then signal overlay.
#[derive(Debug)]
pub struct LoadReport {
    pub symbol: String,
    pub table: RenderOutcome,
    pub chart: RenderOutcome,
    pub overlay: RenderOutcome,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: table {}, chart {}, overlay {}",
            self.symbol,
            self.table.label(),
            self.chart.label(),
            self.overlay.label()
        )
    }
}

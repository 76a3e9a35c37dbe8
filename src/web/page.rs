use askama::Template;

use crate::config::PageSettings;
use crate::view::{ContainerId, ContainerState, Document};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    title: &'a str,
    plotly_src: &'a str,
    doc: &'a Document,
    has_chart: bool,
    chart_json: String,
}

/// Renders the full dashboard page from a document snapshot.
pub fn render_page(doc: &Document, page: &PageSettings) -> anyhow::Result<String> {
    let has_chart = doc.state(ContainerId::Chart) != ContainerState::Empty;
    let chart_json = if has_chart {
        script_safe(&serde_json::to_string(doc.chart.figure())?)
    } else {
        String::new()
    };

    let template = DashboardTemplate {
        title: &page.title,
        plotly_src: &page.plotly_src,
        doc,
        has_chart,
        chart_json,
    };
    Ok(template.render()?)
}

// JSON inlined into <script> must not close the element early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

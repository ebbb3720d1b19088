//! Static single-page front end. Projections are computed in Rust; the page
//! only toggles panels and hands the embedded config to Chart.js.

use super::chart::ChartConfig;
use super::format::PercentCategory;
use super::table::{CellStyle, TableBody, COLUMNS};
use super::widget::{ChartHandle, ChartWidget, Panel, Surface, ViewManager};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

/// Tracks which panels are visible; the page opens in that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageViews {
    visible: BTreeSet<Panel>,
}

impl Default for PageViews {
    fn default() -> Self {
        Self { visible: BTreeSet::from([Panel::Menu]) }
    }
}

impl PageViews {
    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }
}

impl ViewManager for PageViews {
    fn show(&mut self, panel: Panel) {
        self.visible.insert(panel);
    }

    fn hide(&mut self, panel: Panel) {
        self.visible.remove(&panel);
    }
}

/// Chart widget that serializes the config for embedding in the page.
#[derive(Debug, Default)]
pub struct PageChartWidget;

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChart {
    pub surface: Surface,
    pub config_json: String,
}

impl ChartHandle for EmbeddedChart {
    fn dispose(self) {
        debug!(surface = %self.surface.0, "embedded chart released");
    }
}

impl ChartWidget for PageChartWidget {
    type Handle = EmbeddedChart;

    fn construct(&mut self, surface: &Surface, config: &ChartConfig) -> Result<EmbeddedChart> {
        let config_json = serde_json::to_string(config).context("Failed to serialize chart config")?;
        Ok(EmbeddedChart { surface: surface.clone(), config_json })
    }
}

pub fn render_page(table: &TableBody, views: &PageViews, chart: Option<&EmbeddedChart>) -> String {
    let hidden = |panel: Panel| if views.is_visible(panel) { "" } else { " hidden" };
    let surface = chart.map(|c| c.surface.0.as_str()).unwrap_or("liquidityChart");
    // `</` inside a script block would end it early.
    let config = chart.map(|c| c.config_json.replace("</", "<\\/")).unwrap_or_else(|| "null".to_string());

    let mut html = String::new();
    html.push_str(r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Net Liquidity</title>
<style>
body { background: #0f172a; color: #cbd5e1; font-family: 'Inter', sans-serif; margin: 0; padding: 24px; }
.hidden { display: none !important; }
.menu { display: flex; gap: 16px; }
button { background: #1e293b; color: #e2e8f0; border: 1px solid #334155; border-radius: 8px; padding: 12px 20px; cursor: pointer; }
table { border-collapse: collapse; width: 100%; font-variant-numeric: tabular-nums; }
th, td { padding: 6px 10px; border-bottom: 1px solid #1e293b; text-align: right; }
th { position: sticky; top: 0; background: #0f172a; }
td.date, td.pct { text-align: center; }
td.headline { font-weight: bold; color: #60a5fa; }
td.cell-negative { background: #7f1d1d; color: #fff; }
td.cell-positive { background: #ffffff; color: #0f172a; }
td.message { text-align: center; }
.chart-box { position: relative; height: 70vh; }
</style>
</head>
<body>
"#);

    let _ = write!(
        html,
        r#"<section id="{}" class="menu{}">
<button id="btn-history">History</button>
<button id="btn-graph">Graph</button>
</section>
"#,
        Panel::Menu.id(),
        hidden(Panel::Menu)
    );

    let _ = write!(
        html,
        "<section id=\"{}\" class=\"view{}\">\n<button class=\"back-btn\">Back</button>\n<table id=\"history-table\">\n<thead><tr>",
        Panel::History.id(),
        hidden(Panel::History)
    );
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", escape(column));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    html.push_str(&render_table_body(table));
    html.push_str("</tbody>\n</table>\n</section>\n");

    let _ = write!(
        html,
        r#"<section id="{}" class="view{}">
<button class="back-btn">Back</button>
<div class="chart-box"><canvas id="{}"></canvas></div>
</section>
"#,
        Panel::Graph.id(),
        hidden(Panel::Graph),
        escape(surface)
    );

    let _ = write!(
        html,
        r#"<script id="chart-config" type="application/json">{config}</script>
<script src="{CHART_JS_CDN}"></script>
<script>
(() => {{
  const show = (id) => document.getElementById(id).classList.remove('hidden');
  const hide = (id) => document.getElementById(id).classList.add('hidden');
  const config = JSON.parse(document.getElementById('chart-config').textContent);
  let instance = null;
  const renderChart = () => {{
    if (instance) {{ instance.destroy(); instance = null; }}
    if (!config || typeof Chart === 'undefined') return;
    const cfg = structuredClone(config);
    for (const axis of Object.values(cfg.options.scales)) {{
      if (axis.ticks && axis.ticks.format === 'billions') {{
        axis.ticks.callback = (v) => (v / 1e9).toFixed(0) + 'B';
      }}
    }}
    instance = new Chart(document.getElementById('{surface}').getContext('2d'), cfg);
  }};
  document.getElementById('btn-history').addEventListener('click', () => {{ hide('{menu}'); show('{history}'); }});
  document.getElementById('btn-graph').addEventListener('click', () => {{ hide('{menu}'); show('{graph}'); renderChart(); }});
  document.querySelectorAll('.back-btn').forEach((b) => b.addEventListener('click', () => {{
    hide('{history}'); hide('{graph}'); show('{menu}');
  }}));
  if (!document.getElementById('{graph}').classList.contains('hidden')) renderChart();
}})();
</script>
</body>
</html>
"#,
        surface = escape(surface),
        menu = Panel::Menu.id(),
        history = Panel::History.id(),
        graph = Panel::Graph.id(),
    );

    html
}

pub fn render_table_body(table: &TableBody) -> String {
    let mut out = String::new();
    match table {
        TableBody::Empty => {}
        TableBody::Failure(message) => {
            let _ = writeln!(
                out,
                r#"<tr><td class="message" colspan="{}">{}</td></tr>"#,
                COLUMNS.len(),
                escape(message)
            );
        }
        TableBody::Rows(rows) => {
            for row in rows {
                out.push_str("<tr>");
                for cell in row.cells() {
                    let class = match cell.style {
                        CellStyle::Date => "date",
                        CellStyle::Plain => "",
                        CellStyle::Headline => "headline",
                        CellStyle::Percent(Some(PercentCategory::Negative)) => "pct cell-negative",
                        CellStyle::Percent(Some(PercentCategory::PositiveOrZero)) => "pct cell-positive",
                        CellStyle::Percent(None) => "pct",
                    };
                    if class.is_empty() {
                        let _ = write!(out, "<td>{}</td>", escape(cell.text));
                    } else {
                        let _ = write!(out, r#"<td class="{}">{}</td>"#, class, escape(cell.text));
                    }
                }
                out.push_str("</tr>\n");
            }
        }
    }
    out
}

/// Writes `index.html` into `out_dir`, creating it if needed.
pub async fn write_page(out_dir: &Path, page: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = out_dir.join("index.html");
    tokio::fs::write(&path, page)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = page.len(), "page written");
    Ok(path)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::table::DisplayRow;
    use crate::models::Record;

    #[test]
    fn test_failure_row_spans_all_columns() {
        let body = render_table_body(&TableBody::load_failure());
        assert_eq!(body.matches("<tr>").count(), 1);
        assert!(body.contains(r#"colspan="8""#));
        assert!(body.contains("Failed to load data"));
    }

    #[test]
    fn test_row_classes() {
        let row = DisplayRow::from_record(&Record {
            date: Some("2024-03-07".into()),
            net_liquidity: Some(1.0),
            wow: Some(-0.01),
            mom: Some(0.02),
            ..Default::default()
        });
        let body = render_table_body(&TableBody::Rows(vec![row]));
        assert!(body.contains(r#"<td class="date">2024-03-07</td>"#));
        assert!(body.contains(r#"<td class="headline">1</td>"#));
        assert!(body.contains(r#"<td class="pct cell-negative">-1.0%</td>"#));
        assert!(body.contains(r#"<td class="pct cell-positive">2.0%</td>"#));
        assert!(body.contains(r#"<td class="pct">-</td>"#));
    }

    #[test]
    fn test_dates_are_escaped() {
        let row = DisplayRow::from_record(&Record { date: Some("<b>".into()), ..Default::default() });
        let body = render_table_body(&TableBody::Rows(vec![row]));
        assert!(body.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_page_reflects_visible_panels() {
        let mut views = PageViews::default();
        let page = render_page(&TableBody::Empty, &views, None);
        assert!(page.contains(r#"<section id="menu-view" class="menu">"#));
        assert!(page.contains(r#"<section id="view-graph" class="view hidden">"#));
        assert!(page.contains(r#"type="application/json">null</script>"#));

        views.hide(Panel::Menu);
        views.show(Panel::History);
        let page = render_page(&TableBody::Empty, &views, None);
        assert!(page.contains(r#"<section id="menu-view" class="menu hidden">"#));
        assert!(page.contains(r#"<section id="view-history" class="view">"#));
    }
}

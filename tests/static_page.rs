use net_liquidity_lib::view::html::{render_page, write_page, PageChartWidget, PageViews};
use net_liquidity_lib::view::widget::Panel;
use net_liquidity_lib::{DataLocation, DatasetLoader, Session};

const FEED: &str = r#"[
  {"Date": "2024-03-06", "WALCL": 7539000000000.0, "WDTGAL": 767000000000.0, "RRPONTSYD": 438000000000.0,
   "NetLiquidity": 6334000000000.0, "WoW": 0.0251, "MoM": -0.033, "YoY": null, "MA5": null, "MA20": null, "MA60": null},
  {"Date": "2024-03-07", "WALCL": 7540000000000.0, "WDTGAL": 760000000000.0, "RRPONTSYD": 440000000000.0,
   "NetLiquidity": 6340000000000.0, "WoW": -0.001, "MoM": 0.0, "YoY": 0.12, "MA5": 6337000000000.0}
]"#;

#[tokio::test]
async fn page_embeds_table_and_chart_config() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    std::fs::write(&data, FEED).unwrap();

    let mut session = Session::new(PageViews::default(), PageChartWidget);
    assert!(session.start(&DatasetLoader::new(), &DataLocation::File(data)).await);
    session.show_graph().unwrap();
    session.back_to_menu();

    assert!(session.views().is_visible(Panel::Menu));
    assert!(!session.views().is_visible(Panel::Graph));

    let chart = session.chart().unwrap();
    let config: serde_json::Value = serde_json::from_str(&chart.config_json).unwrap();
    assert_eq!(config["data"]["labels"], serde_json::json!(["03-06", "03-07"]));
    assert_eq!(config["data"]["datasets"][0]["data"][1], 6340000000000.0);
    assert!(config["data"]["datasets"][1]["data"][0].is_null());

    let page = render_page(session.table(), session.views(), session.chart());
    // newest row first
    let newest = page.find("2024-03-07").unwrap();
    let older = page.find("2024-03-06").unwrap();
    assert!(newest < older);
    assert!(page.contains(r#"<td class="headline">6,340,000,000,000</td>"#));
    assert!(page.contains(r#"<td class="pct cell-negative">-0.1%</td>"#));
    assert!(page.contains(r#"<td class="pct cell-positive">12.0%</td>"#));
    assert!(page.contains(r#""maxTicksLimit":12"#));

    let out = dir.path().join("site");
    let written = write_page(&out, &page).await.unwrap();
    assert_eq!(written, out.join("index.html"));
    assert_eq!(std::fs::read_to_string(written).unwrap(), page);
}

#[tokio::test]
async fn failed_load_page_has_message_and_no_data_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(PageViews::default(), PageChartWidget);
    assert!(!session.start(&DatasetLoader::new(), &DataLocation::File(dir.path().join("nope.json"))).await);

    let page = render_page(session.table(), session.views(), session.chart());
    let body = &page[page.find("<tbody>").unwrap()..page.find("</tbody>").unwrap()];
    assert_eq!(body.matches("<tr>").count(), 1);
    assert!(body.contains(r#"colspan="8">Failed to load data"#));
}

use net_liquidity_lib::config::Settings;
use net_liquidity_lib::view::format::{format_number, format_percent, PLACEHOLDER};
use net_liquidity_lib::{init_tracing, DatasetLoader, Record};
use std::process::ExitCode;

type Field = (&'static str, fn(&Record) -> Option<f64>);

const FIELDS: [Field; 10] = [
    ("WALCL", |r| r.walcl),
    ("WDTGAL", |r| r.wdtgal),
    ("RRPONTSYD", |r| r.rrpontsyd),
    ("NetLiquidity", |r| r.net_liquidity),
    ("WoW", |r| r.wow),
    ("MoM", |r| r.mom),
    ("YoY", |r| r.yoy),
    ("MA5", |r| r.ma5),
    ("MA20", |r| r.ma20),
    ("MA60", |r| r.ma60),
];

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid settings: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("🔍 Diagnostic - Loading: {}", settings.data);
    let dataset = match DatasetLoader::new().load(&settings.data).await {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("❌ Failed to load data: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Records: {}", dataset.len());
    if let (Some(newest), Some(oldest)) = (dataset.latest(), dataset.oldest()) {
        println!(
            "Range:   {} .. {}",
            oldest.date.as_deref().unwrap_or(PLACEHOLDER),
            newest.date.as_deref().unwrap_or(PLACEHOLDER)
        );
        println!(
            "Latest:  Net Liquidity {} | WoW {} | MoM {} | YoY {}",
            format_number(newest.net_liquidity),
            format_percent(newest.wow).text,
            format_percent(newest.mom).text,
            format_percent(newest.yoy).text,
        );
    }

    println!("\n{:<15} | {:<10}", "Field", "Absent");
    println!("{}", "-".repeat(28));
    let undated = dataset.records().iter().filter(|r| r.date.is_none()).count();
    println!("{:<15} | {:<10}", "Date", undated);
    for (name, get) in FIELDS {
        let absent = dataset.records().iter().filter(|r| get(r).is_none()).count();
        println!("{:<15} | {:<10}", name, absent);
    }
    println!("\nDone.");
    ExitCode::SUCCESS
}

//! Table projection: one formatted row per record, same order as the dataset.

use super::format::{format_number, format_percent, PercentCategory, PercentCell, PLACEHOLDER};
use crate::models::{Dataset, Record};
use serde::Serialize;

pub const COLUMNS: [&str; 8] = [
    "Date",
    "Fed Assets (WALCL)",
    "TGA (WDTGAL)",
    "RRP (RRPONTSYD)",
    "Net Liquidity",
    "WoW",
    "MoM",
    "YoY",
];

pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub date: String,
    pub walcl: String,
    pub wdtgal: String,
    pub rrpontsyd: String,
    pub net_liquidity: String,
    pub wow: PercentCell,
    pub mom: PercentCell,
    pub yoy: PercentCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Centered, verbatim.
    Date,
    Plain,
    /// The headline figure, emphasized.
    Headline,
    Percent(Option<PercentCategory>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    pub text: &'a str,
    pub style: CellStyle,
}

impl DisplayRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            date: record.date.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
            walcl: format_number(record.walcl),
            wdtgal: format_number(record.wdtgal),
            rrpontsyd: format_number(record.rrpontsyd),
            net_liquidity: format_number(record.net_liquidity),
            wow: format_percent(record.wow),
            mom: format_percent(record.mom),
            yoy: format_percent(record.yoy),
        }
    }

    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [Cell<'_>; 8] {
        [
            Cell { text: &self.date, style: CellStyle::Date },
            Cell { text: &self.walcl, style: CellStyle::Plain },
            Cell { text: &self.wdtgal, style: CellStyle::Plain },
            Cell { text: &self.rrpontsyd, style: CellStyle::Plain },
            Cell { text: &self.net_liquidity, style: CellStyle::Headline },
            percent_cell(&self.wow),
            percent_cell(&self.mom),
            percent_cell(&self.yoy),
        ]
    }
}

fn percent_cell(cell: &PercentCell) -> Cell<'_> {
    Cell { text: &cell.text, style: CellStyle::Percent(cell.category) }
}

/// What the table body currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableBody {
    #[default]
    Empty,
    Rows(Vec<DisplayRow>),
    /// A single message row spanning every column.
    Failure(String),
}

impl TableBody {
    pub fn load_failure() -> Self {
        TableBody::Failure(LOAD_FAILURE_MESSAGE.to_string())
    }

    pub fn rows(&self) -> &[DisplayRow] {
        match self {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }
}

pub fn project_rows(dataset: &Dataset) -> Vec<DisplayRow> {
    dataset.records().iter().map(DisplayRow::from_record).collect()
}

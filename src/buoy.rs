//! # Buoy Observation Parsing
//!
//! NDBC publishes the same real-time buoy numbers in two shapes, and the
//! feed used by this tool has switched between them over time:
//!
//! ### Columnar text (realtime2 `.spec` / `.txt`)
//! ```text
//! #YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
//! #yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT
//! 2026 10 19 14 10  1.4  1.2  9.1  0.5  4.0 ENE  E    AVERAGE  6.2  72
//! ```
//! The first line names the columns; the latest observation sits at a fixed
//! line offset (2 for realtime2 files, 1 for a bare header + row). Fields are
//! looked up by column *name*, so reordered columns are harmless.
//!
//! ### HTML table (station page)
//! The first `<table>` whose text contains `WVHT` holds the observations;
//! row 1 is the latest one and cells 1–4 are significant height, swell
//! height, swell period and swell direction.
//!
//! ## Missing values
//! `MM`, `-` and empty cells become [`Reading::Missing`]. Everything else is
//! passed through as text, optionally converted from meters to feet.
//!
//! ## Failure policy
//! The `try_*` methods report *why* a document could not be read through
//! [`BuoyError`]. [`BuoyParser::parse`] logs that cause and degrades to
//! [`BuoyObservation::missing`], so callers always get a complete record.

use crate::config::{BuoyConfig, BuoyFormatSetting};
use crate::{BuoyObservation, Reading, Unit};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Raw values meaning "no reading".
pub const MISSING_SENTINELS: [&str; 3] = ["MM", "-", ""];

/// Column marker used to find the observation table.
pub const TABLE_MARKER: &str = "WVHT";

const METERS_TO_FEET: f64 = 3.28084;

/// Reasons a buoy document could not be turned into an observation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuoyError {
    #[error("buoy document is empty")]
    EmptyDocument,

    #[error("no observation at line {offset} ({available} lines available)")]
    MissingRow { offset: usize, available: usize },

    #[error("observation row has {found} columns, header has {expected}")]
    ShortRow { expected: usize, found: usize },

    #[error("no table containing WVHT")]
    TableNotFound,

    #[error("WVHT table has no observation row")]
    MissingTableRow,

    #[error("observation table row has {found} cells, need at least 5")]
    ShortTableRow { found: usize },
}

/// Concrete document layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuoyFormat {
    Columnar,
    Table,
}

impl BuoyFormat {
    /// Probe a document: anything carrying a `<table` tag is treated as the
    /// station page, everything else as columnar text.
    pub fn detect(text: &str) -> Self {
        if text.to_ascii_lowercase().contains("<table") {
            BuoyFormat::Table
        } else {
            BuoyFormat::Columnar
        }
    }
}

/// Column name → index map built from a columnar header line.
#[derive(Debug, Clone)]
struct ColumnMapping {
    name_to_index: HashMap<String, usize>,
    width: usize,
}

impl ColumnMapping {
    fn analyze(header: &str) -> Self {
        let name_to_index: HashMap<String, usize> = header
            .split_whitespace()
            .enumerate()
            .map(|(index, name)| (name.trim_start_matches('#').to_string(), index))
            .collect();
        let width = header.split_whitespace().count();
        ColumnMapping {
            name_to_index,
            width,
        }
    }

    fn get<'a>(&self, row: &[&'a str], column: &str) -> Option<&'a str> {
        self.name_to_index
            .get(column)
            .and_then(|&index| row.get(index))
            .copied()
    }
}

/// Parser for both buoy feed layouts.
#[derive(Clone, Debug)]
pub struct BuoyParser {
    format: BuoyFormatSetting,
    row_offset: usize,
    convert_meters_to_feet: bool,
}

impl Default for BuoyParser {
    fn default() -> Self {
        Self::from_config(&BuoyConfig::default())
    }
}

impl BuoyParser {
    pub fn new(format: BuoyFormatSetting, row_offset: usize, convert_meters_to_feet: bool) -> Self {
        BuoyParser {
            format,
            row_offset,
            convert_meters_to_feet,
        }
    }

    pub fn from_config(config: &BuoyConfig) -> Self {
        Self::new(config.format, config.row_offset, config.convert_meters_to_feet)
    }

    /// Parse `text` in the configured (or detected) format, degrading to an
    /// all-missing observation on any structural problem.
    pub fn parse(&self, text: &str) -> BuoyObservation {
        self.try_parse(text).unwrap_or_else(|error| {
            warn!("Buoy document unusable: {}", error);
            BuoyObservation::missing()
        })
    }

    pub fn try_parse(&self, text: &str) -> Result<BuoyObservation, BuoyError> {
        let format = match self.format {
            BuoyFormatSetting::Auto => BuoyFormat::detect(text),
            BuoyFormatSetting::Columnar => BuoyFormat::Columnar,
            BuoyFormatSetting::Table => BuoyFormat::Table,
        };
        debug!(?format, "Parsing buoy document");
        match format {
            BuoyFormat::Columnar => self.try_parse_columnar(text),
            BuoyFormat::Table => self.try_parse_table_html(text),
        }
    }

    /// Whitespace-delimited feed: header on line 0, observation on line
    /// `row_offset`.
    ///
    /// # Example
    /// ```
    /// use wave_card_lib::buoy::BuoyParser;
    /// use wave_card_lib::config::BuoyFormatSetting;
    ///
    /// let parser = BuoyParser::new(BuoyFormatSetting::Columnar, 1, false);
    /// let obs = parser.try_parse_columnar("WVHT SwH SwP SwD\nMM 4 9 ENE").unwrap();
    /// assert!(obs.significant_height.is_missing());
    /// assert_eq!(obs.swell_height.to_string(), "4 ft");
    /// assert_eq!(obs.swell_period.to_string(), "9 sec");
    /// assert_eq!(obs.swell_direction.to_string(), "ENE");
    /// ```
    pub fn try_parse_columnar(&self, text: &str) -> Result<BuoyObservation, BuoyError> {
        let lines: Vec<&str> = text.trim().lines().collect();
        let header = lines
            .first()
            .filter(|line| !line.trim().is_empty())
            .ok_or(BuoyError::EmptyDocument)?;
        let mapping = ColumnMapping::analyze(header);

        let row = lines.get(self.row_offset).ok_or(BuoyError::MissingRow {
            offset: self.row_offset,
            available: lines.len(),
        })?;
        let row: Vec<&str> = row.split_whitespace().collect();
        if row.len() < mapping.width {
            return Err(BuoyError::ShortRow {
                expected: mapping.width,
                found: row.len(),
            });
        }

        let field = |name: &str| mapping.get(&row, name).unwrap_or("");
        Ok(self.observation(field("WVHT"), field("SwH"), field("SwP"), field("SwD")))
    }

    /// Station page: locate the `WVHT` table and read its second row.
    pub fn try_parse_table_html(&self, html: &str) -> Result<BuoyObservation, BuoyError> {
        let rows = table_rows(html).ok_or(BuoyError::TableNotFound)?;
        self.try_parse_table_rows(&rows)
    }

    /// Table rows already split into cell text, header row first.
    pub fn try_parse_table_rows(&self, rows: &[Vec<String>]) -> Result<BuoyObservation, BuoyError> {
        let latest = rows.get(1).ok_or(BuoyError::MissingTableRow)?;
        if latest.len() < 5 {
            return Err(BuoyError::ShortTableRow {
                found: latest.len(),
            });
        }
        Ok(self.observation(&latest[1], &latest[2], &latest[3], &latest[4]))
    }

    pub fn parse_table_rows(&self, rows: &[Vec<String>]) -> BuoyObservation {
        self.try_parse_table_rows(rows).unwrap_or_else(|error| {
            warn!("Buoy table unusable: {}", error);
            BuoyObservation::missing()
        })
    }

    fn observation(&self, wvht: &str, swh: &str, swp: &str, swd: &str) -> BuoyObservation {
        BuoyObservation {
            significant_height: self.height(wvht),
            swell_height: self.height(swh),
            swell_period: reading(swp, Some(Unit::Seconds)),
            swell_direction: reading(swd, None),
        }
    }

    fn height(&self, raw: &str) -> Reading {
        match reading(raw, Some(Unit::Feet)) {
            Reading::Present { value, unit } if self.convert_meters_to_feet => Reading::Present {
                value: meters_to_feet(&value),
                unit,
            },
            other => other,
        }
    }
}

/// Normalize one raw field: sentinels become [`Reading::Missing`].
pub fn reading(raw: &str, unit: Option<Unit>) -> Reading {
    let value = raw.trim();
    if MISSING_SENTINELS.contains(&value) {
        Reading::Missing
    } else {
        Reading::Present {
            value: value.to_string(),
            unit,
        }
    }
}

fn meters_to_feet(value: &str) -> String {
    match value.parse::<f64>() {
        Ok(meters) => format!("{:.1}", meters * METERS_TO_FEET),
        Err(_) => value.to_string(),
    }
}

/// Cell text of every row of the first table mentioning [`TABLE_MARKER`].
fn table_rows(html: &str) -> Option<Vec<Vec<String>>> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("CSS selector should be valid");
    let row_sel = Selector::parse("tr").expect("CSS selector should be valid");
    let cell_sel = Selector::parse("td").expect("CSS selector should be valid");

    let table = doc
        .select(&table_sel)
        .find(|table| element_text(table).contains(TABLE_MARKER))?;

    let rows: Vec<Vec<String>> = table
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| element_text(&cell).trim().to_string())
                .collect::<Vec<String>>()
        })
        .collect();
    Some(rows)
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

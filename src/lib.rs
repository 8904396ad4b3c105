//! # Wave Card Core Library
//!
//! This library turns two loosely structured marine-weather documents into a
//! handful of typed records:
//!
//! - an NDBC offshore/coastal zone forecast (free prose split by day labels)
//!   becomes an ordered list of [`ForecastLine`]s, and
//! - a buoy feed (NDBC realtime2 columnar text, or the station page's HTML
//!   table) becomes one [`BuoyObservation`].
//!
//! ## Data Flow
//! 1. **Fetch**: [`fetch::Fetcher`] downloads both documents (or they are read
//!    from disk). This is the only blocking step.
//! 2. **Forecast**: [`forecast::ForecastParser`] flattens HTML, cuts out the
//!    zone span, segments it by period label and extracts wave fields.
//! 3. **Buoy**: [`buoy::BuoyParser`] probes the document format and reads the
//!    latest observation row, normalizing `MM`/`-`/empty to
//!    [`Reading::Missing`].
//! 4. **Present**: [`card::WaveCard`] renders the values as text or JSON.
//!
//! The forecast and buoy paths never depend on each other. Every parsing
//! stage is a pure function of its input, so a malformed document degrades to
//! fewer lines or missing readings rather than an error at the card boundary.
//!
//! ## Core Types
//! - [`PeriodLabel`]: the fixed vocabulary of forecast period tags
//! - [`ForecastSegment`]: one labeled chunk of forecast prose
//! - [`ForecastLine`] / [`Conditions`] / [`HeightBand`]: extracted wave fields
//! - [`Reading`] / [`BuoyObservation`]: the buoy snapshot

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod buoy;
pub mod card;
pub mod config;
pub mod extractor;
pub mod fetch;
pub mod forecast;
pub mod segmenter;

/// Period tag attached to a forecast segment.
///
/// `REST OF TONIGHT` / `REST OF TODAY` never survive segmentation: they are
/// folded into [`PeriodLabel::Today`] when the segment is opened.
/// [`PeriodLabel::Currently`] is only ever assigned to the first line of a
/// forecast by the extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period", content = "day", rename_all = "snake_case")]
pub enum PeriodLabel {
    Currently,
    Today,
    Tonight,
    Day(Weekday),
    Night(Weekday),
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Currently => f.write_str("Currently"),
            PeriodLabel::Today => f.write_str("TODAY"),
            PeriodLabel::Tonight => f.write_str("TONIGHT"),
            PeriodLabel::Day(day) => write!(f, "{}", day_token(*day)),
            PeriodLabel::Night(day) => write!(f, "{} NIGHT", day_token(*day)),
        }
    }
}

fn day_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// One labeled chunk of the raw forecast text.
///
/// `body` holds the trimmed non-label lines that followed the label, joined
/// with single spaces in their original order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSegment {
    pub label: PeriodLabel,
    pub body: String,
}

/// Inclusive wave-height range in feet.
///
/// # Example
/// ```
/// use wave_card_lib::HeightBand;
///
/// let band = HeightBand::around(3).unwrap();
/// assert_eq!(band, HeightBand { low: 2, high: 4 });
/// assert_eq!(band.to_string(), "2–4 ft");
/// assert_eq!(HeightBand::around(i32::MAX), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightBand {
    pub low: i32,
    pub high: i32,
}

impl HeightBand {
    /// Synthesize a ±1 ft band around a point estimate, or `None` when the
    /// band would not fit in an `i32`.
    pub fn around(height: i32) -> Option<Self> {
        Some(HeightBand {
            low: height.checked_sub(1)?,
            high: height.checked_add(1)?,
        })
    }
}

impl fmt::Display for HeightBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{} ft", self.low, self.high)
    }
}

/// What a matcher recovered from one segment body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conditions {
    /// "Wave Detail: NE 3 ft at 8 seconds" style point estimate.
    WaveDetail {
        height_band: HeightBand,
        period_seconds: u32,
        direction: String,
    },
    /// "Seas 3 to 5 ft" range, kept verbatim.
    SeasRange { height_band: HeightBand },
    /// Truncated raw text, only produced when unmatched segments are kept.
    Summary { text: String },
}

/// Structured result for one forecast period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastLine {
    pub label: PeriodLabel,
    pub conditions: Conditions,
}

impl ForecastLine {
    pub fn height_band(&self) -> Option<HeightBand> {
        match &self.conditions {
            Conditions::WaveDetail { height_band, .. } | Conditions::SeasRange { height_band } => {
                Some(*height_band)
            }
            Conditions::Summary { .. } => None,
        }
    }

    pub fn period_seconds(&self) -> Option<u32> {
        match &self.conditions {
            Conditions::WaveDetail { period_seconds, .. } => Some(*period_seconds),
            _ => None,
        }
    }

    pub fn direction(&self) -> Option<&str> {
        match &self.conditions {
            Conditions::WaveDetail { direction, .. } => Some(direction),
            _ => None,
        }
    }
}

impl fmt::Display for ForecastLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.conditions {
            Conditions::WaveDetail {
                height_band,
                period_seconds,
                direction,
            } => write!(
                f,
                "{}: {} @ {}s {}",
                self.label, height_band, period_seconds, direction
            ),
            Conditions::SeasRange { height_band } => write!(f, "{}: {}", self.label, height_band),
            Conditions::Summary { text } => write!(f, "{}: {}", self.label, text),
        }
    }
}

/// Unit attached to a present buoy reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Feet,
    Seconds,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Feet => "ft",
            Unit::Seconds => "sec",
        }
    }
}

/// A single buoy field: either a raw value with its unit, or no reading.
///
/// A missing reading is never represented as zero or as the sentinel text
/// (`MM`, `-`) the feed used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reading {
    Missing,
    Present { value: String, unit: Option<Unit> },
}

impl Reading {
    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }

    /// Raw value without its unit.
    pub fn value(&self) -> Option<&str> {
        match self {
            Reading::Present { value, .. } => Some(value),
            Reading::Missing => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Missing => f.write_str("N/A"),
            Reading::Present {
                value,
                unit: Some(unit),
            } => write!(f, "{} {}", value, unit.suffix()),
            Reading::Present { value, unit: None } => f.write_str(value),
        }
    }
}

/// Latest real-time buoy snapshot.
///
/// # Example
/// ```
/// use wave_card_lib::BuoyObservation;
///
/// let obs = BuoyObservation::missing();
/// assert!(obs.swell_period.is_missing());
/// assert_eq!(obs.swell_period.to_string(), "N/A");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuoyObservation {
    pub significant_height: Reading,
    pub swell_height: Reading,
    pub swell_period: Reading,
    pub swell_direction: Reading,
}

impl BuoyObservation {
    /// Observation with every field missing, used whenever the feed is
    /// unavailable or unparseable.
    pub fn missing() -> Self {
        BuoyObservation {
            significant_height: Reading::Missing,
            swell_height: Reading::Missing,
            swell_period: Reading::Missing,
            swell_direction: Reading::Missing,
        }
    }

    pub fn is_all_missing(&self) -> bool {
        self.significant_height.is_missing()
            && self.swell_height.is_missing()
            && self.swell_period.is_missing()
            && self.swell_direction.is_missing()
    }
}

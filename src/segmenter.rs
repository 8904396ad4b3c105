//! # Forecast Segmentation
//!
//! Splits the text of an NWS/NDBC zone forecast into labeled periods.
//!
//! ## Zone span
//! A forecast product covers many zones back to back. [`ZoneLocator`] finds
//! the literal zone code (e.g. `AMZ726`) and cuts the text from there up to
//! the next zone code (terminator regex, `AMZ\d{3}` by default) or the end of
//! the document.
//!
//! ## Period labels
//! Inside the span, each period starts on a line such as:
//! ```text
//! REST OF TONIGHT
//! TODAY
//! .TONIGHT...E winds 10 to 15 kt.
//! MON NIGHT
//! ```
//! [`Segmenter`] runs a two-state scan (scanning → accumulating) over the
//! lines. Text before the first label is dropped; every later non-label line
//! is appended to the open period. `REST OF ...` is folded into
//! [`PeriodLabel::Today`] the moment the period is opened.

use crate::{ForecastSegment, PeriodLabel};
use chrono::Weekday;
use regex::Regex;
use tracing::debug;

/// Maximum number of periods kept from one forecast.
pub const MAX_SEGMENTS: usize = 6;

/// Label lines: optional leading dot, a period token, then end of line or
/// inline text after whitespace or the NWS `...` separator.
const LABEL_PATTERN: &str = concat!(
    r"^\.?(?:(?P<rest>REST OF [A-Z]+)|(?P<today>TODAY)|(?P<tonight>TONIGHT)|",
    r"(?P<day>MON(?:DAY)?|TUE(?:SDAY)?|WED(?:NESDAY)?|THU(?:RSDAY)?|FRI(?:DAY)?|SAT(?:URDAY)?|SUN(?:DAY)?)",
    r"(?P<night> NIGHT)?)",
    r"(?:(?:\.{3}|\s+)(?P<inline>.*))?$"
);

/// Cuts the zone of interest out of a multi-zone forecast product.
#[derive(Clone, Debug)]
pub struct ZoneLocator {
    anchor: String,
    terminator: Regex,
}

impl ZoneLocator {
    /// `anchor` is matched literally; `terminator` is a regex.
    pub fn new(anchor: &str, terminator: &str) -> Result<Self, regex::Error> {
        Ok(ZoneLocator {
            anchor: anchor.to_string(),
            terminator: Regex::new(terminator)?,
        })
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Return the span from the anchor up to the terminator (exclusive) or the
    /// end of text, or `None` when the anchor never occurs.
    pub fn locate<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.anchor.is_empty() {
            return None;
        }
        let start = text.find(&self.anchor)?;
        let after_anchor = start + self.anchor.len();
        let end = self
            .terminator
            .find(&text[after_anchor..])
            .map(|m| after_anchor + m.start())
            .unwrap_or(text.len());
        Some(&text[start..end])
    }
}

/// Label-driven splitter for zone forecast text.
#[derive(Clone, Debug)]
pub struct Segmenter {
    label: Regex,
    max_segments: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(MAX_SEGMENTS)
    }
}

struct OpenSegment {
    label: PeriodLabel,
    parts: Vec<String>,
}

impl OpenSegment {
    fn close(self) -> ForecastSegment {
        ForecastSegment {
            label: self.label,
            body: self.parts.join(" "),
        }
    }
}

enum ScanState {
    Scanning,
    Accumulating(OpenSegment),
}

impl Segmenter {
    pub fn new(max_segments: usize) -> Self {
        Segmenter {
            label: Regex::new(LABEL_PATTERN).expect("label pattern should be valid"),
            max_segments,
        }
    }

    /// Split `text` into at most `max_segments` labeled periods, in source
    /// order. Text without any label line yields an empty vector.
    ///
    /// # Example
    /// ```
    /// use wave_card_lib::{segmenter::Segmenter, PeriodLabel};
    ///
    /// let text = "REST OF TONIGHT\nSeas 3 to 5 ft.\nTODAY\nWave Detail: E 4 ft at 7 seconds.";
    /// let segments = Segmenter::default().segment(text);
    /// assert_eq!(segments.len(), 2);
    /// assert_eq!(segments[0].label, PeriodLabel::Today);
    /// assert_eq!(segments[1].body, "Wave Detail: E 4 ft at 7 seconds.");
    /// ```
    pub fn segment(&self, text: &str) -> Vec<ForecastSegment> {
        let mut segments = Vec::new();
        let mut state = ScanState::Scanning;

        for line in text.lines() {
            let line = line.trim();
            if let Some((label, inline)) = self.parse_label(line) {
                if let ScanState::Accumulating(open) = state {
                    segments.push(open.close());
                }
                let parts = inline.map(|s| vec![s.to_string()]).unwrap_or_default();
                state = ScanState::Accumulating(OpenSegment { label, parts });
            } else if let ScanState::Accumulating(open) = &mut state {
                if !line.is_empty() {
                    open.parts.push(line.to_string());
                }
            }
        }

        if let ScanState::Accumulating(open) = state {
            segments.push(open.close());
        }

        let found = segments.len();
        segments.truncate(self.max_segments);
        debug!(found, kept = segments.len(), "Segmented forecast text");
        segments
    }

    /// Recognize a label line, returning the normalized label and any text
    /// that followed it on the same line.
    fn parse_label<'a>(&self, line: &'a str) -> Option<(PeriodLabel, Option<&'a str>)> {
        let caps = self.label.captures(line)?;

        let label = if caps.name("rest").is_some() || caps.name("today").is_some() {
            PeriodLabel::Today
        } else if caps.name("tonight").is_some() {
            PeriodLabel::Tonight
        } else {
            let day = weekday(caps.name("day")?.as_str())?;
            if caps.name("night").is_some() {
                PeriodLabel::Night(day)
            } else {
                PeriodLabel::Day(day)
            }
        };

        let inline = caps
            .name("inline")
            .map(|m| m.as_str().trim_start_matches('.').trim())
            .filter(|s| !s.is_empty());
        Some((label, inline))
    }
}

fn weekday(token: &str) -> Option<Weekday> {
    match token.get(..3)? {
        "MON" => Some(Weekday::Mon),
        "TUE" => Some(Weekday::Tue),
        "WED" => Some(Weekday::Wed),
        "THU" => Some(Weekday::Thu),
        "FRI" => Some(Weekday::Fri),
        "SAT" => Some(Weekday::Sat),
        "SUN" => Some(Weekday::Sun),
        _ => None,
    }
}

//! # Forecast Field Extraction
//!
//! Turns a [`ForecastSegment`] into a [`ForecastLine`] by running an ordered
//! list of [`ConditionMatcher`]s over the segment body. The first matcher to
//! recognize the text wins, so more specific phrasings go first:
//!
//! 1. [`WaveDetailMatcher`]: `Wave Detail: NE 3 ft at 8 seconds`
//! 2. [`SeasRangeMatcher`]: `Seas 3 to 5 ft`
//! 3. [`SummaryMatcher`] (only with [`UnmatchedPolicy::Truncate`]): the raw
//!    body, cut to a character budget
//!
//! Before matching, every `feet` in the body is rewritten to `ft` so both
//! spellings are handled by the same patterns. A segment nothing recognizes
//! produces no line at all.

use crate::config::{ForecastConfig, UnmatchedPolicy};
use crate::{Conditions, ForecastLine, ForecastSegment, HeightBand, PeriodLabel};
use regex::Regex;
use tracing::debug;

/// A pluggable recognizer for one phrasing of wave conditions.
pub trait ConditionMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Recognize `body` (already unit-normalized), or return `None`.
    fn match_body(&self, body: &str) -> Option<Conditions>;
}

/// Directional point estimate: compass word, height in ft, period in seconds.
///
/// After a `Wave Detail:` prefix any word is taken as the direction; without
/// the prefix only compass abbreviations and spelled-out points count.
pub struct WaveDetailMatcher {
    pattern: Regex,
}

impl Default for WaveDetailMatcher {
    fn default() -> Self {
        WaveDetailMatcher {
            pattern: Regex::new(concat!(
                r"(?i)(?:wave detail:\s*(?P<word>[a-z]+)\s*|",
                r"\b(?P<point>north(?:east|west)?|south(?:east|west)?|east|west|",
                r"nne|ene|ese|sse|ssw|wsw|wnw|nnw|ne|se|sw|nw|n|e|s|w)\s*)",
                r"(?P<height>\d+)\s*ft\s*at\s*(?P<period>\d+)\s*seconds?\b",
            ))
            .expect("wave detail pattern should be valid"),
        }
    }
}

impl ConditionMatcher for WaveDetailMatcher {
    fn name(&self) -> &'static str {
        "wave_detail"
    }

    fn match_body(&self, body: &str) -> Option<Conditions> {
        let caps = self.pattern.captures(body)?;
        let direction = caps.name("word").or_else(|| caps.name("point"))?;
        let height: i32 = caps["height"].parse().ok()?;
        let period_seconds: u32 = caps["period"].parse().ok()?;
        Some(Conditions::WaveDetail {
            height_band: HeightBand::around(height)?,
            period_seconds,
            direction: compass_abbreviation(direction.as_str()),
        })
    }
}

/// Spelled-out points become their abbreviation; anything else is upper-cased.
fn compass_abbreviation(word: &str) -> String {
    let word = word.to_uppercase();
    let short = match word.as_str() {
        "NORTH" => "N",
        "NORTHEAST" => "NE",
        "EAST" => "E",
        "SOUTHEAST" => "SE",
        "SOUTH" => "S",
        "SOUTHWEST" => "SW",
        "WEST" => "W",
        "NORTHWEST" => "NW",
        _ => return word,
    };
    short.to_string()
}

/// "Seas N to M ft", taken verbatim as the band.
pub struct SeasRangeMatcher {
    pattern: Regex,
}

impl Default for SeasRangeMatcher {
    fn default() -> Self {
        SeasRangeMatcher {
            pattern: Regex::new(r"(?i)\bseas\s+(\d+)\s+to\s+(\d+)\s*ft\b")
                .expect("seas pattern should be valid"),
        }
    }
}

impl ConditionMatcher for SeasRangeMatcher {
    fn name(&self) -> &'static str {
        "seas_range"
    }

    fn match_body(&self, body: &str) -> Option<Conditions> {
        let caps = self.pattern.captures(body)?;
        Some(Conditions::SeasRange {
            height_band: HeightBand {
                low: caps[1].parse().ok()?,
                high: caps[2].parse().ok()?,
            },
        })
    }
}

/// Catch-all that keeps the first `max_chars` characters of the body.
pub struct SummaryMatcher {
    max_chars: usize,
}

impl SummaryMatcher {
    pub fn new(max_chars: usize) -> Self {
        SummaryMatcher { max_chars }
    }
}

impl ConditionMatcher for SummaryMatcher {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn match_body(&self, body: &str) -> Option<Conditions> {
        let body = body.trim();
        if body.is_empty() || self.max_chars == 0 {
            return None;
        }
        Some(Conditions::Summary {
            text: truncate_chars(body, self.max_chars),
        })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Ordered matcher chain applied to each forecast segment.
pub struct FieldExtractor {
    matchers: Vec<Box<dyn ConditionMatcher>>,
    feet: Regex,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(UnmatchedPolicy::Omit, 0)
    }
}

impl FieldExtractor {
    /// Standard chain; `truncate_chars` only matters with
    /// [`UnmatchedPolicy::Truncate`].
    pub fn new(unmatched: UnmatchedPolicy, truncate_chars: usize) -> Self {
        let mut matchers: Vec<Box<dyn ConditionMatcher>> = vec![
            Box::new(WaveDetailMatcher::default()),
            Box::new(SeasRangeMatcher::default()),
        ];
        if unmatched == UnmatchedPolicy::Truncate {
            matchers.push(Box::new(SummaryMatcher::new(truncate_chars)));
        }
        Self::with_matchers(matchers)
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.unmatched, config.truncate_chars)
    }

    /// Build an extractor from a custom chain, tried in the given order.
    pub fn with_matchers(matchers: Vec<Box<dyn ConditionMatcher>>) -> Self {
        FieldExtractor {
            matchers,
            feet: Regex::new(r"(?i)\bfeet\b").expect("unit pattern should be valid"),
        }
    }

    /// Extract one line from `segment`. The first line of a forecast is
    /// always labeled [`PeriodLabel::Currently`].
    pub fn extract(&self, segment: &ForecastSegment, is_first: bool) -> Option<ForecastLine> {
        let body = self.feet.replace_all(&segment.body, "ft");
        let (name, conditions) = self
            .matchers
            .iter()
            .find_map(|m| m.match_body(&body).map(|c| (m.name(), c)))?;

        let label = if is_first {
            PeriodLabel::Currently
        } else {
            segment.label
        };
        debug!(matcher = name, %label, "Extracted forecast line");
        Some(ForecastLine { label, conditions })
    }

    /// Extract lines from all segments, preserving order. Only the first
    /// segment gets the `Currently` override, even if it yields no line.
    pub fn extract_all(&self, segments: &[ForecastSegment]) -> Vec<ForecastLine> {
        segments
            .iter()
            .enumerate()
            .filter_map(|(i, segment)| self.extract(segment, i == 0))
            .collect()
    }
}

//! # Zone Forecast Pipeline
//!
//! Chains the forecast stages into one call:
//!
//! 1. **Flatten**: [`document_text`] turns the NDBC HTML page into plain text,
//!    one text node per line.
//! 2. **Locate**: [`ZoneLocator`] cuts out the configured zone.
//! 3. **Segment**: [`Segmenter`] splits the zone into labeled periods.
//! 4. **Extract**: [`FieldExtractor`] keeps the periods with wave data.
//!
//! `Ok(vec![])` means the zone was found but nothing usable was in it;
//! [`ForecastError::AnchorNotFound`] means the zone itself was missing. Both
//! end in the card's fallback text, but only the second is a structural
//! problem worth a warning.

use crate::config::ForecastConfig;
use crate::extractor::FieldExtractor;
use crate::segmenter::{Segmenter, ZoneLocator};
use crate::ForecastLine;
use scraper::Html;
use thiserror::Error;
use tracing::debug;

/// Structural forecast failures.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The zone code does not occur in the document
    #[error("zone anchor {0} not found in forecast")]
    AnchorNotFound(String),

    /// The configured zone terminator is not a valid regex
    #[error("invalid zone terminator pattern: {0}")]
    InvalidTerminator(#[from] regex::Error),
}

/// Flatten an HTML document to text, one text node per line.
///
/// Plain-text input passes through unchanged apart from entity decoding.
pub fn document_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let text: Vec<&str> = doc.root_element().text().collect();
    text.join("\n")
}

/// Configured forecast pipeline.
pub struct ForecastParser {
    locator: ZoneLocator,
    segmenter: Segmenter,
    extractor: FieldExtractor,
}

impl ForecastParser {
    pub fn from_config(config: &ForecastConfig) -> Result<Self, ForecastError> {
        Ok(ForecastParser {
            locator: ZoneLocator::new(&config.zone, &config.zone_terminator)?,
            segmenter: Segmenter::new(config.max_periods),
            extractor: FieldExtractor::from_config(config),
        })
    }

    /// Run the full pipeline over a raw (HTML or text) forecast document.
    pub fn parse_document(&self, document: &str) -> Result<Vec<ForecastLine>, ForecastError> {
        self.parse_text(&document_text(document))
    }

    /// Run zone location, segmentation and extraction over plain text.
    ///
    /// # Example
    /// ```
    /// use wave_card_lib::config::ForecastConfig;
    /// use wave_card_lib::forecast::ForecastParser;
    ///
    /// let parser = ForecastParser::from_config(&ForecastConfig::default()).unwrap();
    /// let text = "AMZ726-191530-\nTODAY\nWave Detail: NE 3 ft at 8 seconds.\nAMZ732-191530-";
    /// let lines = parser.parse_text(text).unwrap();
    /// assert_eq!(lines.len(), 1);
    /// assert_eq!(lines[0].to_string(), "Currently: 2–4 ft @ 8s NE");
    /// ```
    pub fn parse_text(&self, text: &str) -> Result<Vec<ForecastLine>, ForecastError> {
        let zone = self
            .locator
            .locate(text)
            .ok_or_else(|| ForecastError::AnchorNotFound(self.locator.anchor().to_string()))?;
        let segments = self.segmenter.segment(zone);
        let lines = self.extractor.extract_all(&segments);
        debug!(
            segments = segments.len(),
            lines = lines.len(),
            "Parsed zone forecast"
        );
        Ok(lines)
    }
}

//! # Wave Card Rendering
//!
//! Text and JSON presentation of one run's results. The card mirrors the
//! layout of the published wave graphic line by line, so the same content can
//! be checked in a terminal or handed to an external image renderer:
//!
//! ```text
//! Oct 19, 2026
//! Wave Forecast – AMZ726
//! Coastal waters east of Puerto Rico
//!
//! Currently: 2–4 ft @ 8s NE
//! TODAY: 3–5 ft
//!
//! Current – Buoy 41043
//! Sig: 4.6 ft | Swell: 3.9 ft | 9.1 sec | ENE
//! ```
//!
//! An empty forecast is replaced by the configured fallback line; missing
//! buoy readings print as `N/A`.

use crate::config::Config;
use crate::{BuoyObservation, ForecastLine};
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the presenter needs for one card.
#[derive(Clone, Debug, Serialize)]
pub struct WaveCard {
    pub date: NaiveDate,
    pub zone: String,
    pub zone_name: String,
    pub station: String,
    pub forecast: Vec<ForecastLine>,
    pub buoy: BuoyObservation,
    #[serde(skip)]
    fallback_text: String,
}

impl WaveCard {
    pub fn new(
        config: &Config,
        forecast: Vec<ForecastLine>,
        buoy: BuoyObservation,
        date: NaiveDate,
    ) -> Self {
        WaveCard {
            date,
            zone: config.forecast.zone.clone(),
            zone_name: config.forecast.zone_name.clone(),
            station: config.buoy.station.clone(),
            forecast,
            buoy,
            fallback_text: config.forecast.fallback_text.clone(),
        }
    }

    /// Forecast block: one line per period, or the fallback line.
    pub fn forecast_text(&self) -> String {
        if self.forecast.is_empty() {
            return self.fallback_text.clone();
        }
        self.forecast
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn buoy_text(&self) -> String {
        format!(
            "Sig: {} | Swell: {} | {} | {}",
            self.buoy.significant_height,
            self.buoy.swell_height,
            self.buoy.swell_period,
            self.buoy.swell_direction
        )
    }

    pub fn render_text(&self) -> String {
        format!(
            "{}\nWave Forecast – {}\n{}\n\n{}\n\nCurrent – Buoy {}\n{}\n",
            self.date.format("%b %d, %Y"),
            self.zone,
            self.zone_name,
            self.forecast_text(),
            self.station,
            self.buoy_text()
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Conditions, HeightBand, PeriodLabel, Reading, Unit};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn sample_lines() -> Vec<ForecastLine> {
        vec![
            ForecastLine {
                label: PeriodLabel::Currently,
                conditions: Conditions::WaveDetail {
                    height_band: HeightBand::around(3).unwrap(),
                    period_seconds: 8,
                    direction: "NE".to_string(),
                },
            },
            ForecastLine {
                label: PeriodLabel::Today,
                conditions: Conditions::SeasRange {
                    height_band: HeightBand { low: 3, high: 5 },
                },
            },
        ]
    }

    #[test]
    fn test_render_full_card() {
        let buoy = BuoyObservation {
            significant_height: Reading::Present {
                value: "4.6".to_string(),
                unit: Some(Unit::Feet),
            },
            swell_height: Reading::Missing,
            swell_period: Reading::Present {
                value: "9.1".to_string(),
                unit: Some(Unit::Seconds),
            },
            swell_direction: Reading::Present {
                value: "ENE".to_string(),
                unit: None,
            },
        };
        let card = WaveCard::new(&Config::default(), sample_lines(), buoy, date());
        let text = card.render_text();
        assert!(text.starts_with("Oct 19, 2026\nWave Forecast – AMZ726\n"));
        assert!(text.contains("Currently: 2–4 ft @ 8s NE\nTODAY: 3–5 ft\n"));
        assert!(text.contains("Current – Buoy 41043\n"));
        assert!(text.ends_with("Sig: 4.6 ft | Swell: N/A | 9.1 sec | ENE\n"));
    }

    #[test]
    fn test_empty_forecast_uses_fallback() {
        let card = WaveCard::new(
            &Config::default(),
            Vec::new(),
            BuoyObservation::missing(),
            date(),
        );
        assert_eq!(card.forecast_text(), "Wave forecast temporarily unavailable.");
        assert_eq!(card.buoy_text(), "Sig: N/A | Swell: N/A | N/A | N/A");
    }

    #[test]
    fn test_json_shape() {
        let card = WaveCard::new(
            &Config::default(),
            sample_lines(),
            BuoyObservation::missing(),
            date(),
        );
        let value: serde_json::Value = serde_json::from_str(&card.to_json().unwrap()).unwrap();
        assert_eq!(value["date"], "2026-10-19");
        assert_eq!(value["forecast"][0]["label"]["period"], "currently");
        assert_eq!(value["forecast"][0]["conditions"]["kind"], "wave_detail");
        assert_eq!(value["forecast"][0]["conditions"]["height_band"]["low"], 2);
        assert_eq!(value["buoy"]["swell_period"]["status"], "missing");
        assert!(value.get("fallback_text").is_none());
    }
}

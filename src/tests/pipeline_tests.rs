//! # End-to-End Test Suite for Wave Card
//!
//! Exercises the whole extraction chain the way the binary runs it: raw
//! documents (or fetch failures) in, card-ready values out. No test touches
//! the network; unavailable documents are simulated with `FetchError`s.

use std::io;
use tempfile::NamedTempFile;
use wave_card_lib::buoy::BuoyParser;
use wave_card_lib::card::WaveCard;
use wave_card_lib::config::{BuoyFormatSetting, Config};
use wave_card_lib::extractor::FieldExtractor;
use wave_card_lib::fetch::{read_document, FetchError};
use wave_card_lib::segmenter::{Segmenter, MAX_SEGMENTS};
use wave_card_lib::{BuoyObservation, HeightBand, PeriodLabel, Reading};

use clap::Parser;

use crate::{buoy_observation, forecast_lines, Args};

const FORECAST_PAGE: &str = r#"<html><body><pre>
AMZ726-191530-
Coastal waters east of Puerto Rico-
REST OF TONIGHT
Wave Detail: NE 3 feet at 8 seconds.
TODAY
Seas 3 to 5 ft.
TONIGHT
Wave Detail: ENE 5 ft at 9 seconds.
MON
Seas 4 to 6 ft.
MON NIGHT
Variable winds.
TUE
Wave Detail: E 4 ft at 7 seconds.
TUE NIGHT
Wave Detail: E 4 ft at 7 seconds.
WED
Wave Detail: E 6 ft at 10 seconds.
AMZ732-191530-
TODAY
Seas 1 to 2 ft.
</pre></body></html>"#;

const REALTIME2: &str = "\
#YY  MM DD hh mm WVHT  SwH  SwP  WWH  WWP SwD WWD  STEEPNESS  APD MWD
#yr  mo dy hr mn    m    m  sec    m  sec  -  degT     -      sec degT
2026 10 19 14 10  1.4   MM  9.1  0.5  4.0 ENE  E    AVERAGE  6.2  72
";

fn unavailable() -> Result<String, FetchError> {
    Err(FetchError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        "document not fetched",
    )))
}

/// A label line directly followed by a wave detail sentence is the smallest
/// forecast that produces a line.
#[test]
fn single_period_becomes_currently() {
    let segments = Segmenter::default().segment("TODAY\nWave Detail: NE 3 ft at 8 seconds.");
    let lines = FieldExtractor::default().extract_all(&segments);

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].label, PeriodLabel::Currently);
    assert_eq!(lines[0].height_band(), Some(HeightBand { low: 2, high: 4 }));
    assert_eq!(lines[0].period_seconds(), Some(8));
    assert_eq!(lines[0].direction(), Some("NE"));
}

/// Columnar feed with a sentinel in the first field.
#[test]
fn header_and_row_become_observation() {
    let parser = BuoyParser::new(BuoyFormatSetting::Columnar, 1, false);
    let obs = parser.parse("WVHT SwH SwP SwD\nMM 4 9 ENE");

    assert_eq!(obs.significant_height, Reading::Missing);
    assert_eq!(obs.swell_height.to_string(), "4 ft");
    assert_eq!(obs.swell_period.to_string(), "9 sec");
    assert_eq!(obs.swell_direction.to_string(), "ENE");
}

/// Text with no label token yields nothing, and the card falls back.
#[test]
fn unlabeled_forecast_falls_back() {
    let config = Config::default();
    let lines = forecast_lines(
        &config,
        Ok("AMZ726-191530-\nSmall craft should exercise caution.".to_string()),
    );
    assert!(lines.is_empty());

    let card = WaveCard::new(&config, lines, BuoyObservation::missing(), today());
    assert_eq!(card.forecast_text(), config.forecast.fallback_text);
}

/// Every label occurrence opens its own segment, in source order.
#[test]
fn segments_follow_label_sequence() {
    let labels = ["TODAY", "TONIGHT", "FRI", "FRI NIGHT", "SAT"];
    let text: String = labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{label}\nline {i} a\n\nline {i} b\n"))
        .collect();

    let segments = Segmenter::default().segment(&text);
    assert_eq!(segments.len(), labels.len());
    for (i, (segment, label)) in segments.iter().zip(labels).enumerate() {
        assert_eq!(segment.label.to_string(), label);
        assert_eq!(segment.body, format!("line {i} a line {i} b"));
    }
}

/// Point estimates always widen to exactly ±1 ft, ranges never do.
#[test]
fn band_rules_hold_across_heights() {
    let extractor = FieldExtractor::default();
    for height in 1..=15 {
        let segment = Segmenter::default()
            .segment(&format!("TODAY\nWave Detail: SW {height} ft at 12 seconds."))
            .remove(0);
        let line = extractor.extract(&segment, false).unwrap();
        assert_eq!(
            line.height_band(),
            Some(HeightBand {
                low: height - 1,
                high: height + 1
            })
        );

        let segment = Segmenter::default()
            .segment(&format!("TODAY\nSeas {height} to {} ft.", height + 2))
            .remove(0);
        let line = extractor.extract(&segment, false).unwrap();
        assert_eq!(
            line.height_band(),
            Some(HeightBand {
                low: height,
                high: height + 2
            })
        );
    }
}

#[test]
fn full_product_is_capped_and_ordered() {
    let lines = forecast_lines(&Config::default(), Ok(FORECAST_PAGE.to_string()));

    // Eight periods in the zone, six kept, MON NIGHT has no wave data
    let rendered: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Currently: 2–4 ft @ 8s NE",
            "TODAY: 3–5 ft",
            "TONIGHT: 4–6 ft @ 9s ENE",
            "MON: 4–6 ft",
            "TUE: 3–5 ft @ 7s E",
        ]
    );
    assert!(lines.len() <= MAX_SEGMENTS);
}

#[test]
fn unavailable_documents_degrade() {
    let config = Config::default();
    assert!(forecast_lines(&config, unavailable()).is_empty());
    assert!(buoy_observation(&config, unavailable()).is_all_missing());
}

#[test]
fn missing_zone_degrades_to_fallback() {
    let mut config = Config::default();
    config.forecast.zone = "AMZ999".to_string();
    assert!(forecast_lines(&config, Ok(FORECAST_PAGE.to_string())).is_empty());
}

#[test]
fn realtime2_file_from_disk() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), REALTIME2).unwrap();

    let obs = buoy_observation(&Config::default(), read_document(file.path()));
    assert_eq!(obs.significant_height.to_string(), "1.4 ft");
    assert!(obs.swell_height.is_missing());
    assert_eq!(obs.swell_period.to_string(), "9.1 sec");
    assert_eq!(obs.swell_direction.to_string(), "ENE");
}

#[test]
fn card_renders_from_documents() {
    let config = Config::default();
    let card = WaveCard::new(
        &config,
        forecast_lines(&config, Ok(FORECAST_PAGE.to_string())),
        buoy_observation(&config, Ok(REALTIME2.to_string())),
        today(),
    );
    let text = card.render_text();
    assert!(text.contains("Wave Forecast – AMZ726"));
    assert!(text.contains("Currently: 2–4 ft @ 8s NE"));
    assert!(text.contains("Sig: 1.4 ft | Swell: N/A | 9.1 sec | ENE"));
}

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn config_flag_is_optional() {
    let args = Args::try_parse_from(["wave-card"]).unwrap();
    assert!(args.config.is_none());

    let args = Args::try_parse_from(["wave-card", "-c", "other.toml", "--json"]).unwrap();
    assert_eq!(args.config.as_deref(), Some(std::path::Path::new("other.toml")));
    assert!(args.json);
}

#[test]
fn oversized_wave_detail_is_dropped() {
    let page = "AMZ726-191530-\nTODAY\nWave Detail: NE 2147483647 ft at 8 seconds.\nTONIGHT\nWave Detail: East 4 ft at 7 seconds.\n";
    let rendered: Vec<String> = forecast_lines(&Config::default(), Ok(page.to_string()))
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(rendered, vec!["TONIGHT: 3–5 ft @ 7s E"]);
}

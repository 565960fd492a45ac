//! Coordinate table extraction from raw document text

use georef_types::RawMatch;
use tracing::{debug, warn};

use crate::patterns::TablePattern;

/// Scans `text` for coordinate rows and returns them in document order.
///
/// Duplicates are kept. No matches is a valid outcome and yields an empty vec.
pub fn extract(text: &str, pattern: &TablePattern) -> Vec<RawMatch> {
    let mut matches = Vec::new();

    for cap in pattern.regex().captures_iter(text) {
        let easting = cap
            .get(pattern.easting_group())
            .and_then(|m| m.as_str().trim().parse::<f64>().ok());
        let northing = cap
            .get(pattern.northing_group())
            .and_then(|m| m.as_str().trim().parse::<f64>().ok());

        match (easting, northing) {
            (Some(easting), Some(northing)) => matches.push(RawMatch::new(easting, northing)),
            _ => {
                // Only reachable with custom patterns whose groups capture non-numbers
                warn!(row = &cap[0], "Skipping table row with unparseable numbers");
            }
        }
    }

    debug!(
        text_len = text.len(),
        rows = matches.len(),
        "Coordinate table scan complete"
    );
    matches
}

/// [`extract`] with the built-in survey-table row shape.
pub fn extract_survey_table(text: &str) -> Vec<RawMatch> {
    extract(text, &TablePattern::survey_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::TableSchema;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SAMPLE_TABLE: &str = "CUADRO DE COORDENADAS\n\
        VERTICE LADO RUMBO DISTANCIA ESTE NORTE\n\
        P1 P1 - P2 N 45°12'E 120.45 654396.100 9744073.130\n\
        P2 P2 - P3 S 10°03'E 98.10 654481.520 9744158.020\n\
        P3 P3 - P4 S 80°40'W 140.00 654498.640 9744061.400\n\
        P4 P4 - P1 N 12°00'W 77.32 654360.500 9744040.870\n\
        AREA TOTAL: 1.52 Ha\n";

    #[test]
    fn test_extracts_rows_in_document_order() {
        let matches = extract_survey_table(SAMPLE_TABLE);
        assert_eq!(
            matches,
            vec![
                RawMatch::new(654396.100, 9744073.130),
                RawMatch::new(654481.520, 9744158.020),
                RawMatch::new(654498.640, 9744061.400),
                RawMatch::new(654360.500, 9744040.870),
            ]
        );
    }

    #[test]
    fn test_single_row_scenario() {
        let matches = extract_survey_table("P1 ... 654396.100 9744073.130");
        assert_eq!(matches, vec![RawMatch::new(654396.100, 9744073.130)]);
    }

    #[test]
    fn test_empty_text_has_no_matches() {
        assert!(extract_survey_table("").is_empty());
    }

    #[test]
    fn test_does_not_deduplicate() {
        let text = "P1 a 654396.100 9744073.130\nP1 a 654396.100 9744073.130\n";
        assert_eq!(extract_survey_table(text).len(), 2);
    }

    #[test]
    fn test_seven_digit_easting_is_accepted() {
        let matches = extract_survey_table("P7 x 1654396.100 9744073.130");
        assert_eq!(matches, vec![RawMatch::new(1654396.100, 9744073.130)]);
    }

    #[test]
    fn test_malformed_rows_are_ignored() {
        let text = "P1 a 654396.10 9744073.130\n\
                    P2 a 654396.100 974407.130\n\
                    PX a 654396.100 9744073.130\n\
                    P3 a 54396.100 9744073.130\n";
        assert!(extract_survey_table(text).is_empty());
    }

    #[test]
    fn test_custom_pattern() {
        let schema = TableSchema {
            row_pattern: r"V\d+;N=(\d+\.\d+);E=(\d+\.\d+)".into(),
            easting_group: 2,
            northing_group: 1,
        };
        let pattern = schema.compile().unwrap();
        let matches = extract("V1;N=9744073.13;E=654396.1\nV2;N=1.5;E=2.5", &pattern);
        assert_eq!(
            matches,
            vec![
                RawMatch::new(654396.1, 9744073.13),
                RawMatch::new(2.5, 1.5)
            ]
        );
    }

    fn well_formed_row() -> impl Strategy<Value = (String, RawMatch)> {
        (1u32..500, 100_000_000u64..9_999_999_999, 1_000_000_000u64..9_999_999_999).prop_map(
            |(label, e_milli, n_milli)| {
                let easting = e_milli as f64 / 1000.0;
                let northing = n_milli as f64 / 1000.0;
                let row = format!(
                    "P{} P{} - P{} {}.{:03} {}.{:03}",
                    label,
                    label,
                    label + 1,
                    e_milli / 1000,
                    e_milli % 1000,
                    n_milli / 1000,
                    n_milli % 1000
                );
                (row, RawMatch::new(easting, northing))
            },
        )
    }

    fn malformed_row() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("P9 a 654396.10 9744073.13".to_string()),
            Just("P9 a 654396.100 974407.130".to_string()),
            Just("PX a 654396.100 9744073.130".to_string()),
            Just("AREA TOTAL: 1.52 Ha".to_string()),
            "[a-z ]{0,30}",
        ]
    }

    proptest! {
        #[test]
        fn extraction_count_matches_well_formed_rows(
            good in prop::collection::vec(well_formed_row(), 0..12),
            bad in prop::collection::vec(malformed_row(), 0..12),
        ) {
            let mut lines = Vec::new();
            let mut expected = Vec::new();
            let mut bad_iter = bad.iter();
            for (row, parsed) in &good {
                if let Some(noise) = bad_iter.next() {
                    lines.push(noise.clone());
                }
                lines.push(row.clone());
                expected.push(*parsed);
            }
            lines.extend(bad_iter.cloned());

            let matches = extract_survey_table(&lines.join("\n"));
            prop_assert_eq!(matches.len(), expected.len());
            for (got, want) in matches.iter().zip(&expected) {
                prop_assert!((got.easting - want.easting).abs() < 1e-6);
                prop_assert!((got.northing - want.northing).abs() < 1e-6);
            }
        }
    }
}

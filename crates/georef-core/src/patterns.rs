//! Row patterns for locating coordinate tables in a document's text layer

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GeorefError;

/// Survey-table row: a `P<number>` label, free text, then easting and northing.
///
/// Easting has 6-7 integer digits, northing exactly 7, both with 3 decimals.
pub const SURVEY_ROW_PATTERN: &str = r"P\d+\s+.*?\s+(\d{6,7}\.\d{3})\s+(\d{7}\.\d{3})";

lazy_static! {
    static ref SURVEY_ROW: Regex = Regex::new(SURVEY_ROW_PATTERN).unwrap();
}

/// Declarative description of a coordinate table row, as it appears in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    /// Regex matched against the whole text; `.` does not cross line breaks.
    pub row_pattern: String,
    /// 1-based capture group holding the easting.
    pub easting_group: usize,
    /// 1-based capture group holding the northing.
    pub northing_group: usize,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            row_pattern: SURVEY_ROW_PATTERN.to_string(),
            easting_group: 1,
            northing_group: 2,
        }
    }
}

impl TableSchema {
    pub fn compile(&self) -> Result<TablePattern, GeorefError> {
        TablePattern::compile(self)
    }
}

/// A compiled [`TableSchema`], ready to scan text.
#[derive(Debug, Clone)]
pub struct TablePattern {
    regex: Regex,
    easting_group: usize,
    northing_group: usize,
}

impl TablePattern {
    /// Compile a schema, checking that both groups exist and differ.
    pub fn compile(schema: &TableSchema) -> Result<Self, GeorefError> {
        let regex = if schema.row_pattern == SURVEY_ROW_PATTERN {
            SURVEY_ROW.clone()
        } else {
            Regex::new(&schema.row_pattern)
                .map_err(|e| GeorefError::InvalidPattern(e.to_string()))?
        };

        // captures_len counts the implicit whole-match group 0
        let groups = regex.captures_len() - 1;
        for (label, group) in [
            ("easting", schema.easting_group),
            ("northing", schema.northing_group),
        ] {
            if group == 0 || group > groups {
                return Err(GeorefError::InvalidPattern(format!(
                    "{} group {} not in pattern with {} capture groups",
                    label, group, groups
                )));
            }
        }
        if schema.easting_group == schema.northing_group {
            return Err(GeorefError::InvalidPattern(
                "easting and northing must use different groups".into(),
            ));
        }

        Ok(Self {
            regex,
            easting_group: schema.easting_group,
            northing_group: schema.northing_group,
        })
    }

    /// The built-in survey-table row shape.
    pub fn survey_default() -> Self {
        Self {
            regex: SURVEY_ROW.clone(),
            easting_group: 1,
            northing_group: 2,
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn easting_group(&self) -> usize {
        self.easting_group
    }

    pub fn northing_group(&self) -> usize {
        self.northing_group
    }
}

impl Default for TablePattern {
    fn default() -> Self {
        Self::survey_default()
    }
}

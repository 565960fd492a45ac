use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeorefError {
    #[error("No coordinates found in document")]
    NoCoordinatesFound,

    #[error("Invalid coordinate ({x}, {y}): {reason}")]
    InvalidCoordinate { x: f64, y: f64, reason: String },

    #[error("Insufficient points: need {needed}, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("Degenerate bounds: lat span {lat_span}, lng span {lng_span}")]
    DegenerateBounds { lat_span: f64, lng_span: f64 },

    #[error("Corner move would invert the image bounds")]
    InvertedBounds,

    #[error("Projection setup failed: {0}")]
    Projection(String),

    #[error("Invalid row pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid map record: {0}")]
    InvalidMap(String),

    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("PDF is password protected")]
    PasswordProtected,

    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

impl GeorefError {
    /// Whether this error only degrades the result instead of failing the request.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            GeorefError::NoCoordinatesFound
                | GeorefError::InvalidCoordinate { .. }
                | GeorefError::InsufficientPoints { .. }
                | GeorefError::DegenerateBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrading_kinds_are_warnings() {
        assert!(GeorefError::NoCoordinatesFound.is_warning());
        assert!(GeorefError::InsufficientPoints { needed: 3, got: 2 }.is_warning());
        assert!(GeorefError::DegenerateBounds {
            lat_span: 0.0,
            lng_span: 1.0
        }
        .is_warning());
        assert!(GeorefError::InvalidCoordinate {
            x: 1.0,
            y: 2.0,
            reason: "out of zone".into()
        }
        .is_warning());
    }

    #[test]
    fn test_ingestion_and_setup_errors_are_fatal() {
        assert!(!GeorefError::PasswordProtected.is_warning());
        assert!(!GeorefError::InvalidPdf("header".into()).is_warning());
        assert!(!GeorefError::Projection("zone".into()).is_warning());
        assert!(!GeorefError::InvertedBounds.is_warning());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            GeorefError::NoCoordinatesFound.to_string(),
            "No coordinates found in document"
        );
        assert_eq!(
            GeorefError::InsufficientPoints { needed: 3, got: 1 }.to_string(),
            "Insufficient points: need 3, got 1"
        );
    }
}

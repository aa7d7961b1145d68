//! Record schema and validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest model year considered plausible
const YEAR_MIN: i32 = 1900;
/// Latest model year considered plausible
const YEAR_MAX: i32 = 2100;

/// One normalized vehicle listing
///
/// `listing_id` is the canonical path of the listing's detail page (or the
/// `card_<dom id>` fallback) and is required; everything else is nullable.
/// Numeric fields use unsigned types where the schema demands
/// non-negativity, so those bounds hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub listing_id: String,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub price_reference: Option<u64>,
    pub mpg_combined: Option<u32>,
    pub rating_expert: Option<f32>,
    pub rating_consumer: Option<f32>,
    pub description: Option<String>,
}

/// Reasons a candidate record fails schema validation
///
/// Any violation invalidates the entire record, not just the offending
/// field.
#[derive(Debug, Error, PartialEq)]
pub enum RecordInvalid {
    #[error("listing id is empty")]
    EmptyId,

    #[error("year {0} outside plausible range {YEAR_MIN}..={YEAR_MAX}")]
    YearOutOfRange(i32),

    #[error("{field} rating {value} outside 0.0..=5.0")]
    RatingOutOfRange { field: &'static str, value: f32 },
}

impl Record {
    /// Checks every declared bound; fail-closed on the first violation
    pub fn validate(&self) -> Result<(), RecordInvalid> {
        if self.listing_id.trim().is_empty() {
            return Err(RecordInvalid::EmptyId);
        }

        if let Some(year) = self.year {
            if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
                return Err(RecordInvalid::YearOutOfRange(year));
            }
        }

        for (field, rating) in [
            ("expert", self.rating_expert),
            ("consumer", self.rating_consumer),
        ] {
            if let Some(value) = rating {
                if !(0.0..=5.0).contains(&value) || value.is_nan() {
                    return Err(RecordInvalid::RatingOutOfRange { field, value });
                }
            }
        }

        Ok(())
    }

    /// Best identifier for diagnostics: listing id, then name, then a
    /// placeholder
    pub fn identity(&self) -> &str {
        if !self.listing_id.is_empty() {
            return &self.listing_id;
        }
        self.name.as_deref().unwrap_or("unknown")
    }
}

/// Normalizes a raw details-page href into the canonical path-like form
///
/// Trims whitespace and guarantees a leading slash.
pub fn canonical_listing_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_record() -> Record {
        Record {
            listing_id: "/cars/acme/runner/".to_string(),
            name: Some("2024 Acme Runner".to_string()),
            year: Some(2024),
            make: Some("Acme".to_string()),
            model: Some("Runner".to_string()),
            category: Some("SUV".to_string()),
            price_reference: Some(25000),
            mpg_combined: Some(30),
            rating_expert: Some(4.5),
            rating_consumer: Some(4.8),
            description: None,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(minimal_record().validate().is_ok());
    }

    #[test]
    fn test_all_nullable_fields_absent_still_valid() {
        let record = Record {
            listing_id: "/cars/acme/runner/".to_string(),
            name: None,
            year: None,
            make: None,
            model: None,
            category: None,
            price_reference: None,
            mpg_combined: None,
            rating_expert: None,
            rating_consumer: None,
            description: None,
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut record = minimal_record();
        record.listing_id = "  ".to_string();
        assert_eq!(record.validate(), Err(RecordInvalid::EmptyId));
    }

    #[test]
    fn test_rating_above_bound_rejected() {
        let mut record = minimal_record();
        record.rating_expert = Some(7.0);
        assert_eq!(
            record.validate(),
            Err(RecordInvalid::RatingOutOfRange {
                field: "expert",
                value: 7.0
            })
        );
    }

    #[test]
    fn test_negative_rating_rejected() {
        let mut record = minimal_record();
        record.rating_consumer = Some(-1.5);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_implausible_year_rejected() {
        let mut record = minimal_record();
        record.year = Some(208);
        assert_eq!(record.validate(), Err(RecordInvalid::YearOutOfRange(208)));
    }

    #[test]
    fn test_identity_prefers_listing_id() {
        let record = minimal_record();
        assert_eq!(record.identity(), "/cars/acme/runner/");
    }

    #[test]
    fn test_identity_falls_back_to_name() {
        let mut record = minimal_record();
        record.listing_id = String::new();
        assert_eq!(record.identity(), "2024 Acme Runner");
    }

    #[test]
    fn test_canonical_listing_id_adds_leading_slash() {
        assert_eq!(canonical_listing_id("cars/acme/runner/"), "/cars/acme/runner/");
        assert_eq!(canonical_listing_id("/cars/acme/runner/"), "/cars/acme/runner/");
        assert_eq!(canonical_listing_id("  cars/x  "), "/cars/x");
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = minimal_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}

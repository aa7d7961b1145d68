//! Structural extraction of listing markup
//!
//! This module turns one page of semi-structured markup into validated
//! [`Record`]s:
//! - Listing-card fragments are located by layered structural signatures
//! - Every field lookup walks an ordered fallback chain before giving up
//!   on that field (never on the whole record)
//! - Text is normalized into typed fields; normalization failure yields
//!   `None`, not an error
//! - Candidates are validated against the record schema and dropped with a
//!   logged reason on any bound violation

mod extractor;
mod normalize;
mod record;

pub use extractor::{extract_page, is_blocked, PageExtraction};
pub use normalize::{clean_mpg, clean_price, clean_rating, decompose_title, TitleParts};
pub use record::{canonical_listing_id, Record, RecordInvalid};

//! Text normalizers for heterogeneous listing fields
//!
//! Upstream markup mixes currency symbols, unit suffixes, and placeholder
//! strings into its values. Every normalizer here is total: unparseable
//! content yields `None`, never an error.

/// Year, make, and model decomposed from a raw listing title
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TitleParts {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
}

/// Placeholder strings the source uses for absent values
fn is_null_marker(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "none" | "null" | "n/a"
    )
}

/// Extracts an integer price from a string (e.g. `"$25,000"` -> `25000`)
pub fn clean_price(raw: &str) -> Option<u64> {
    if is_null_marker(raw) {
        return None;
    }
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Extracts the first integer from a unit-suffixed string
/// (e.g. `"30 MPG"` -> `30`)
pub fn clean_mpg(raw: &str) -> Option<u32> {
    if is_null_marker(raw) {
        return None;
    }
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parses a rating string (e.g. `"4.8"` -> `4.8`)
///
/// Range checking belongs to record validation, not here.
pub fn clean_rating(raw: &str) -> Option<f32> {
    if is_null_marker(raw) {
        return None;
    }
    raw.trim().parse().ok()
}

/// Splits a raw title into year, make, and model
///
/// A 4-digit token at the start or end of the title is taken as the year
/// and removed; the first remaining token becomes the make and the rest
/// the model. Single-token titles carry no decomposable identity and
/// yield all-`None`.
pub fn decompose_title(raw: &str) -> TitleParts {
    let mut parts: Vec<&str> = raw.split_whitespace().collect();
    let mut result = TitleParts::default();

    if parts.len() < 2 {
        return result;
    }

    if is_year_token(parts[0]) {
        result.year = parts.remove(0).parse().ok();
    } else if is_year_token(parts[parts.len() - 1]) {
        result.year = parts.pop().and_then(|t| t.parse().ok());
    }

    if !parts.is_empty() {
        result.make = Some(parts[0].to_string());
        if parts.len() > 1 {
            result.model = Some(parts[1..].join(" "));
        }
    }

    result
}

fn is_year_token(token: &str) -> bool {
    token.len() == 4 && token.chars().all(|c| c.is_ascii_digit())
}

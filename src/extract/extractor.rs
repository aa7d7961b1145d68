//! Listing-card extraction with layered fallback signatures
//!
//! The upstream markup is generated and its class names churn between
//! deployments, so nothing here trusts a single selector: cards, fields,
//! and metric values are each located by an ordered chain of signatures,
//! ending in a positional/textual heuristic where one exists. A chain that
//! finds nothing nulls the field; only schema validation drops a record.

use crate::extract::normalize::{clean_mpg, clean_price, clean_rating, decompose_title};
use crate::extract::record::{canonical_listing_id, Record};
use scraper::{ElementRef, Html, Selector};

/// Structural signatures for one listing card, primary first
const CARD_SELECTORS: &[&str] = &[
    r#"div[id^="vehicle_card_"]"#,
    r#"div[class*="vehicle-card"]"#,
];

/// Details-page link inside a card; the href is the canonical identifier
const DETAILS_LINK_SELECTORS: &[&str] = &[r#"a[class*="e1uau9z02"]"#, r#"a[class*="ewtqiv30"]"#];

const NAME_SELECTORS: &[&str] = &[r#"h2[class*="argo-heading"]"#];
const CATEGORY_SELECTORS: &[&str] = &[r#"div[class*="e19qstch21"]"#];
const DESCRIPTION_SELECTORS: &[&str] = &[r#"div[class*="e19qstch18"]"#];

/// Styled metric-value node; tried before the positional heuristic
const METRIC_VALUE_SELECTOR: &str = r#"div[class*="e151py7u1"]"#;

/// Anti-bot verification widget
const BLOCK_MARKER_SELECTOR: &str = "div.g-recaptcha";

const PRICE_LABEL: &str = "Starting Price";
const MPG_LABEL: &str = "Combined Fuel Economy";

/// Result of extracting one page of markup
///
/// `card_count` counts located listing fragments, including ones whose
/// candidate record was dropped; the controller uses it to distinguish an
/// empty page from a page full of invalid cards.
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub card_count: usize,
    pub records: Vec<Record>,
}

/// Extracts all valid records from one page of markup
///
/// Output ordering mirrors page order. Duplicates within the page are
/// preserved; deduplication is the reconciler's job.
pub fn extract_page(html: &str) -> PageExtraction {
    let document = Html::parse_document(html);
    let cards = find_cards(&document);
    let card_count = cards.len();

    let mut records = Vec::new();
    for card in cards {
        if let Some(record) = extract_card(card) {
            records.push(record);
        }
    }

    PageExtraction {
        card_count,
        records,
    }
}

/// Checks the page for the anti-bot verification marker
pub fn is_blocked(html: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse(BLOCK_MARKER_SELECTOR) {
        Ok(sel) => document.select(&sel).next().is_some(),
        Err(_) => false,
    }
}

/// Locates listing-card fragments, first signature with any matches wins
fn find_cards(document: &Html) -> Vec<ElementRef<'_>> {
    for raw in CARD_SELECTORS {
        if let Ok(sel) = Selector::parse(raw) {
            let cards: Vec<_> = document.select(&sel).collect();
            if !cards.is_empty() {
                return cards;
            }
        }
    }
    Vec::new()
}

/// Extracts one card into a validated record
///
/// Returns None when the card has no usable identifier or the candidate
/// fails schema validation; both are logged, neither propagates.
fn extract_card(card: ElementRef) -> Option<Record> {
    let listing_id = match extract_listing_id(card) {
        Some(id) => id,
        None => {
            tracing::warn!("Dropping listing fragment with no usable identifier");
            return None;
        }
    };

    let name = extract_name(card);
    let title = name.as_deref().map(decompose_title).unwrap_or_default();

    let record = Record {
        listing_id,
        name,
        year: title.year,
        make: title.make,
        model: title.model,
        category: select_first_text(card, CATEGORY_SELECTORS),
        price_reference: find_labeled_value(card, PRICE_LABEL).and_then(|v| clean_price(&v)),
        mpg_combined: find_labeled_value(card, MPG_LABEL).and_then(|v| clean_mpg(&v)),
        rating_expert: extract_rating(card, "Expert"),
        rating_consumer: extract_rating(card, "Consumer"),
        description: extract_description(card),
    };

    match record.validate() {
        Ok(()) => Some(record),
        Err(reason) => {
            tracing::error!("Data validation failed for {}: {}", record.identity(), reason);
            None
        }
    }
}

/// Canonical identifier from the details link, else the card's DOM id
fn extract_listing_id(card: ElementRef) -> Option<String> {
    if let Some(href) = select_first_attr(card, DETAILS_LINK_SELECTORS, "href") {
        return Some(canonical_listing_id(&href));
    }

    match card.value().attr("id") {
        Some(dom_id) if !dom_id.is_empty() => {
            tracing::warn!(
                "No details link found for card {}; using fallback identifier",
                dom_id
            );
            Some(format!("card_{}", dom_id))
        }
        _ => None,
    }
}

/// Title heading, falling back to the details-link text
fn extract_name(card: ElementRef) -> Option<String> {
    select_first_text(card, NAME_SELECTORS)
        .or_else(|| select_first_text(card, DETAILS_LINK_SELECTORS))
}

/// Finds a metric value associated with a label by climbing the ancestor
/// chain from the label node
///
/// The climb stops at the first row-like ancestor (a flex row or anything
/// with multiple element children) and searches only inside it, so a
/// missing value nulls the field instead of borrowing a neighboring
/// metric. Within the row the styled value node is tried first, then a
/// positional heuristic: a sibling div whose text has the expected shape
/// (currency symbol or unit suffix plus digits).
fn find_labeled_value(card: ElementRef, label: &str) -> Option<String> {
    let label_el = find_label(card, label)?;

    let mut container = label_el;
    for _ in 0..3 {
        container = container.parent().and_then(ElementRef::wrap)?;
        let is_row = container.value().attr("direction").is_some()
            || container.children().filter_map(ElementRef::wrap).count() > 1;
        if is_row {
            return metric_value_in(container, label);
        }
        if container.id() == card.id() {
            break;
        }
    }
    None
}

/// First div whose entire text equals the label
fn find_label<'a>(card: ElementRef<'a>, label: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse("div").ok()?;
    card.select(&sel).find(|el| element_text(*el) == label)
}

fn metric_value_in(container: ElementRef, label: &str) -> Option<String> {
    if let Ok(sel) = Selector::parse(METRIC_VALUE_SELECTOR) {
        if let Some(el) = container.select(&sel).next() {
            let text = element_text(el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    for child in container.children().filter_map(ElementRef::wrap) {
        if child.value().name() != "div" {
            continue;
        }
        let text = element_text(child);
        if text == label || text.is_empty() {
            continue;
        }
        let has_digit = text.chars().any(|c| c.is_ascii_digit());
        let has_marker = text.contains('$') || text.to_ascii_uppercase().contains("MPG");
        if has_digit && has_marker {
            return Some(text);
        }
    }
    None
}

/// Rating score near its label ("Expert" / "Consumer")
///
/// The score is the first purely numeric div inside the label's parent;
/// searching wider would risk borrowing the other rating's score.
fn extract_rating(card: ElementRef, label: &str) -> Option<f32> {
    let label_el = find_label(card, label)?;
    let container = label_el.parent().and_then(ElementRef::wrap)?;
    let sel = Selector::parse("div").ok()?;

    for el in container.select(&sel) {
        let text = element_text(el);
        if text == label || text.is_empty() {
            continue;
        }
        let digits = text.replace('.', "");
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return clean_rating(&text);
        }
    }
    None
}

fn extract_description(card: ElementRef) -> Option<String> {
    for raw in DESCRIPTION_SELECTORS {
        let Ok(sel) = Selector::parse(raw) else {
            continue;
        };
        let Some(el) = card.select(&sel).next() else {
            continue;
        };

        // Prefer the inner span when present
        if let Ok(span_sel) = Selector::parse("span") {
            if let Some(span) = el.select(&span_sel).next() {
                let text = element_text(span);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }

        let text = element_text(el);
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn select_first_text(card: ElementRef, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        if let Ok(sel) = Selector::parse(raw) {
            if let Some(el) = card.select(&sel).next() {
                let text = element_text(el);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn select_first_attr(card: ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    for raw in selectors {
        if let Ok(sel) = Selector::parse(raw) {
            if let Some(el) = card.select(&sel).next() {
                if let Some(value) = el.value().attr(attr) {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }
    None
}

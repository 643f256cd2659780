//! Lot-record extraction from harvested page text.
//!
//! The detail view renders every lot as a free-text block starting with the
//! section marker. Parsing never fails: absent fields degrade to sentinel
//! values, since missing award data is an expected outcome.

use regex::Regex;

use crate::model::{FieldValue, TenderRecord};
use crate::services::harvester::HarvestMode;

/// Repeating string that opens each lot's data block.
pub const SECTION_MARKER: &str = "מספר מתחם:";

const EXPENSES_LABEL: &str = "הוצאות פיתוח ב₪";
const PRICE_LABEL: &str = "מחיר סופי ב₪";
const WINNER_LABEL: &str = "שם זוכה";

/// Parse all lot records out of one tender's text scope.
///
/// N occurrences of the section marker yield exactly N records; text without
/// the marker is treated as a single global lot.
pub fn parse_records(scope: &str, tender_number: &str, mode: HarvestMode) -> Vec<TenderRecord> {
    let parts: Vec<&str> = scope.split(SECTION_MARKER).collect();

    // parts[0] is the text before the first marker and belongs to no lot
    let segments: Vec<&str> = if parts.len() > 1 {
        parts[1..].to_vec()
    } else {
        parts
    };

    segments
        .into_iter()
        .map(|segment| parse_lot(segment, tender_number, mode))
        .collect()
}

fn parse_lot(segment: &str, tender_number: &str, mode: HarvestMode) -> TenderRecord {
    let lot_number = leading_lot_number(segment).unwrap_or_default();

    let expenses = labeled_value(segment, EXPENSES_LABEL);
    let price = labeled_value(segment, PRICE_LABEL);
    let winner = labeled_value(segment, WINNER_LABEL);

    // In multi-target mode a lot with none of the three award fields means
    // the committee has not published results yet, which is worth telling
    // apart from a partially missing line.
    let nothing_published = matches!(mode, HarvestMode::Multi)
        && expenses.is_none()
        && price.is_none()
        && winner.is_none();

    let to_field = |value: Option<String>| match value {
        Some(v) => FieldValue::Found(v),
        None if nothing_published => FieldValue::NotPublished,
        None => FieldValue::NotFound,
    };

    TenderRecord {
        tender_number: tender_number.to_string(),
        lot_number,
        development_expenses: to_field(expenses),
        winning_offer: to_field(price),
        winner_name: to_field(winner),
    }
}

/// First run of digits at the start of the segment, leading whitespace and
/// newlines ignored.
fn leading_lot_number(segment: &str) -> Option<String> {
    let re = Regex::new(r"^\s*(\d+)").ok()?;
    re.captures(segment)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Label, optional colon, then either a numeric-with-separators token or the
/// rest of the line.
fn labeled_value(segment: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r"{}\s*:?\s*([\d,.]+|[^\n]+)",
        regex::escape(label)
    ))
    .ok()?;
    re.captures(segment)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TENDER: &str = "474/2024";

    fn single_lot_text() -> String {
        "1\nהוצאות פיתוח ב₪: 50,000\nמחיר סופי ב₪: 1,200,000\nשם זוכה: Acme Ltd".to_string()
    }

    #[test]
    fn unmarked_text_yields_one_global_lot() {
        let records = parse_records(&single_lot_text(), TENDER, HarvestMode::Single);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.tender_number, TENDER);
        assert_eq!(record.lot_number, "1");
        assert_eq!(record.development_expenses, FieldValue::Found("50,000".into()));
        assert_eq!(record.winning_offer, FieldValue::Found("1,200,000".into()));
        assert_eq!(record.winner_name, FieldValue::Found("Acme Ltd".into()));
    }

    #[test]
    fn marker_count_determines_record_count() {
        let scope = format!(
            "header text\n{} 3\nהוצאות פיתוח ב₪: 10\n{} 4\nהוצאות פיתוח ב₪: 20\n",
            SECTION_MARKER, SECTION_MARKER
        );
        let records = parse_records(&scope, TENDER, HarvestMode::Single);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lot_number, "3");
        assert_eq!(records[1].lot_number, "4");
    }

    #[test]
    fn sections_without_winner_line_get_not_found() {
        let scope = format!(
            "{} 1\nהוצאות פיתוח ב₪: 10,000\nמחיר סופי ב₪: 90,000\n{} 2\nהוצאות פיתוח ב₪: 11,000\nמחיר סופי ב₪: 95,000\n",
            SECTION_MARKER, SECTION_MARKER
        );
        let records = parse_records(&scope, TENDER, HarvestMode::Single);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.winner_name, FieldValue::NotFound);
            assert!(record.development_expenses.is_found());
            assert!(record.winning_offer.is_found());
        }
    }

    #[test]
    fn multi_mode_marks_fully_absent_award_data_as_not_published() {
        let scope = format!("{} 5\nsome unrelated text\n", SECTION_MARKER);
        let records = parse_records(&scope, TENDER, HarvestMode::Multi);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lot_number, "5");
        assert_eq!(records[0].development_expenses, FieldValue::NotPublished);
        assert_eq!(records[0].winning_offer, FieldValue::NotPublished);
        assert_eq!(records[0].winner_name, FieldValue::NotPublished);
    }

    #[test]
    fn multi_mode_keeps_not_found_when_some_fields_exist() {
        let scope = format!("{} 5\nמחיר סופי ב₪: 90,000\n", SECTION_MARKER);
        let records = parse_records(&scope, TENDER, HarvestMode::Multi);
        assert_eq!(records[0].winning_offer, FieldValue::Found("90,000".into()));
        assert_eq!(records[0].development_expenses, FieldValue::NotFound);
        assert_eq!(records[0].winner_name, FieldValue::NotFound);
    }

    #[test]
    fn single_mode_never_uses_not_published() {
        let scope = format!("{} 5\nsome unrelated text\n", SECTION_MARKER);
        let records = parse_records(&scope, TENDER, HarvestMode::Single);
        assert_eq!(records[0].development_expenses, FieldValue::NotFound);
        assert_eq!(records[0].winning_offer, FieldValue::NotFound);
        assert_eq!(records[0].winner_name, FieldValue::NotFound);
    }

    #[test]
    fn parsing_is_idempotent() {
        let scope = format!(
            "{} 1\nהוצאות פיתוח ב₪: 10,000\nשם זוכה: חברה בע\"מ\n",
            SECTION_MARKER
        );
        let first = parse_records(&scope, TENDER, HarvestMode::Multi);
        let second = parse_records(&scope, TENDER, HarvestMode::Multi);
        assert_eq!(first, second);
    }

    #[test]
    fn every_field_is_always_populated() {
        let scopes = [
            String::new(),
            "garbage".to_string(),
            single_lot_text(),
            format!("{}{}", SECTION_MARKER, SECTION_MARKER),
        ];
        for scope in &scopes {
            for mode in [HarvestMode::Single, HarvestMode::Multi] {
                for record in parse_records(scope, TENDER, mode) {
                    // Sentinels, never absence
                    assert!(!record.development_expenses.as_str().is_empty());
                    assert!(!record.winning_offer.as_str().is_empty());
                    assert!(!record.winner_name.as_str().is_empty());
                }
            }
        }
    }

    #[test]
    fn numeric_token_wins_over_rest_of_line() {
        let scope = "1\nמחיר סופי ב₪: 42,500 לאחר הנחה\n";
        let records = parse_records(scope, TENDER, HarvestMode::Single);
        assert_eq!(records[0].winning_offer, FieldValue::Found("42,500".into()));
    }

    #[test]
    fn hebrew_winner_names_are_captured_to_end_of_line() {
        let scope = "1\nשם זוכה: אחים לוי בנייה בע\"מ\nother\n";
        let records = parse_records(scope, TENDER, HarvestMode::Single);
        assert_eq!(
            records[0].winner_name,
            FieldValue::Found("אחים לוי בנייה בע\"מ".into())
        );
    }
}

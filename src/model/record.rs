//! Harvested tender records.

use serde::Serialize;

/// An extracted field value, or one of the defined sentinels.
///
/// Missing data is an expected outcome, not an error, so absent fields are
/// carried as sentinels rather than `Option` — a record never has an absent
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    /// The label was not present in the record's text scope.
    NotFound,
    /// The tender was seen but carries no award data at all yet
    /// (multi-target mode only).
    NotPublished,
}

impl FieldValue {
    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(v) => v,
            FieldValue::NotFound => "not found",
            FieldValue::NotPublished => "not published",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One tender lot scraped out of page text.
///
/// The same tender number repeats across lots; a record has no identity
/// beyond the tuple itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenderRecord {
    /// Tender identifier of form `digits/digits`
    pub tender_number: String,
    /// Lot number within the tender; empty for a tender whose text carried
    /// no per-lot section at all (single global lot)
    pub lot_number: String,
    pub development_expenses: FieldValue,
    pub winning_offer: FieldValue,
    pub winner_name: FieldValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_render_as_fixed_strings() {
        assert_eq!(FieldValue::NotFound.as_str(), "not found");
        assert_eq!(FieldValue::NotPublished.as_str(), "not published");
        assert_eq!(FieldValue::Found("50,000".into()).as_str(), "50,000");
    }

    #[test]
    fn field_value_serializes_to_plain_string() {
        let json = serde_json::to_string(&FieldValue::Found("Acme Ltd".into())).unwrap();
        assert_eq!(json, "\"Acme Ltd\"");
        let json = serde_json::to_string(&FieldValue::NotPublished).unwrap();
        assert_eq!(json, "\"not published\"");
    }
}

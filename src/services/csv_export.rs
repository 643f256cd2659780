//! CSV export of harvested records.

use tracing::info;

use crate::error::{ExportError, Result, ScrapeError};
use crate::model::TenderRecord;

/// Column header, fixed order.
const HEADER: [&str; 5] = [
    "Tender Number",
    "Lot Number",
    "Winner",
    "Winning Offer",
    "Dev Expenses",
];

/// Write records to `path` as a CSV table.
pub fn export_records(path: &str, records: &[TenderRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        ScrapeError::Export(ExportError::WriteFailed {
            path: path.to_string(),
            source: Box::new(e),
        })
    })?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            record.tender_number.as_str(),
            record.lot_number.as_str(),
            record.winner_name.as_str(),
            record.winning_offer.as_str(),
            record.development_expenses.as_str(),
        ])?;
    }
    writer.flush()?;

    info!("💾 wrote {} record(s) to {}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldValue;

    fn sample_record() -> TenderRecord {
        TenderRecord {
            tender_number: "474/2024".into(),
            lot_number: "1".into(),
            development_expenses: FieldValue::Found("50,000".into()),
            winning_offer: FieldValue::Found("1,200,000".into()),
            winner_name: FieldValue::NotFound,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let path_str = path.to_str().unwrap();

        export_records(path_str, &[sample_record()]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Tender Number,Lot Number,Winner,Winning Offer,Dev Expenses"
        );
        assert_eq!(
            lines.next().unwrap(),
            "474/2024,1,not found,\"1,200,000\",\"50,000\""
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_record_set_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        export_records(path.to_str().unwrap(), &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Tender Number,"));
    }
}

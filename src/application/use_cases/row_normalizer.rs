// ============================================================
// ROW NORMALIZER
// ============================================================
// Apply a column mapping and the value cleaner to raw rows

use crate::application::use_cases::value_cleaner::clean_value;
use crate::domain::product::{
    CanonicalField, ColumnMapping, NormalizedRecord, RawRow, RowOutcome, RowTally,
};

/// Importable records plus the rejected lines of one file
#[derive(Debug, Clone, Default)]
pub struct NormalizedRows {
    pub records: Vec<NormalizedRecord>,
    /// `Malformed` and `MissingIdentifier` outcomes, in file order
    pub rejected: Vec<RowOutcome>,
    pub tally: RowTally,
}

/// Normalizes rows against one mapping; column positions are resolved once
pub struct RowNormalizer {
    header_count: usize,
    columns: Vec<(CanonicalField, Option<usize>)>,
}

impl RowNormalizer {
    pub fn new(mapping: &ColumnMapping) -> Self {
        Self {
            header_count: mapping.headers().len(),
            columns: CanonicalField::ALL
                .iter()
                .map(|field| (*field, mapping.column_index(*field)))
                .collect(),
        }
    }

    /// Classify and normalize one row
    pub fn normalize(&self, row: &RawRow) -> RowOutcome {
        if row.cells.len() != self.header_count {
            return RowOutcome::Malformed {
                line: row.line,
                expected: self.header_count,
                found: row.cells.len(),
            };
        }

        let mut record = NormalizedRecord::default();
        for (field, index) in &self.columns {
            let raw = index.and_then(|i| row.cell(i));
            record.set(*field, clean_value(raw, field.kind()));
        }

        if record.is_importable() {
            RowOutcome::Importable(record)
        } else {
            RowOutcome::MissingIdentifier { line: row.line }
        }
    }

    /// Normalize every row, splitting importable records from rejected lines
    pub fn normalize_all<'a, I>(&self, rows: I) -> NormalizedRows
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let mut out = NormalizedRows::default();

        for row in rows {
            out.tally.data_rows += 1;
            match self.normalize(row) {
                RowOutcome::Importable(record) => {
                    out.tally.importable += 1;
                    out.records.push(record);
                }
                rejected @ RowOutcome::Malformed { .. } => {
                    out.tally.parse_errors += 1;
                    out.rejected.push(rejected);
                }
                rejected @ RowOutcome::MissingIdentifier { .. } => {
                    out.tally.validation_errors += 1;
                    out.rejected.push(rejected);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::header_matcher::detect_mapping;
    use crate::infrastructure::csv::parse_line;

    fn mapping(header_line: &str) -> ColumnMapping {
        detect_mapping(&parse_line(header_line))
    }

    fn row(line: usize, text: &str) -> RawRow {
        RawRow::new(line, parse_line(text))
    }

    #[test]
    fn test_widget_scenario() {
        let mapping = mapping("FNSKU,Item Description,Retail Price,Qty");
        let normalizer = RowNormalizer::new(&mapping);

        let outcome = normalizer.normalize(&row(2, r#"X001ABCDEF,"Widget, Deluxe",$19.99,10"#));
        let expected = NormalizedRecord {
            fnsku: Some("X001ABCDEF".into()),
            name: Some("Widget, Deluxe".into()),
            price: Some(19.99),
            quantity: Some(10.0),
            ..Default::default()
        };
        assert_eq!(outcome, RowOutcome::Importable(expected));
    }

    #[test]
    fn test_cell_count_mismatch_is_parse_error() {
        let mapping = mapping("FNSKU,Item Description,Qty");
        let normalizer = RowNormalizer::new(&mapping);

        let rows = vec![row(2, "X001,Widget"), row(3, "X002,Gadget,1,extra")];
        let result = normalizer.normalize_all(&rows);

        assert!(result.records.is_empty());
        assert_eq!(result.tally.parse_errors, 2);
        assert_eq!(result.tally.validation_errors, 0);
        assert_eq!(
            result.rejected[0],
            RowOutcome::Malformed {
                line: 2,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_empty_identifier_is_validation_error() {
        let mapping = mapping("ASIN,Description");
        let normalizer = RowNormalizer::new(&mapping);

        let rows = vec![row(2, " - ,Blue mug"), row(3, "B000123,Red mug")];
        let result = normalizer.normalize_all(&rows);

        assert_eq!(result.tally.data_rows, 2);
        assert_eq!(result.tally.importable, 1);
        assert_eq!(result.tally.validation_errors, 1);
        assert_eq!(result.tally.parse_errors, 0);
        assert_eq!(result.rejected, vec![RowOutcome::MissingIdentifier { line: 2 }]);
        assert_eq!(result.records[0].asin.as_deref(), Some("B000123"));
    }

    #[test]
    fn test_verdict_is_stable_across_runs() {
        let mapping = mapping("FNSKU,ASIN,LPN,Name");
        let normalizer = RowNormalizer::new(&mapping);
        let raw = row(2, "n/a,NA, ,Thing");

        let first = normalizer.normalize(&raw);
        let second = normalizer.normalize(&raw);
        assert_eq!(first, RowOutcome::MissingIdentifier { line: 2 });
        assert_eq!(first, second);
    }

    #[test]
    fn test_operator_edit_changes_source_column() {
        let mut mapping = mapping("FNSKU,Title,Alt Title");
        mapping.assign(CanonicalField::Name, "Alt Title").unwrap();
        let normalizer = RowNormalizer::new(&mapping);

        match normalizer.normalize(&row(2, "X1,First,Second")) {
            RowOutcome::Importable(record) => assert_eq!(record.name.as_deref(), Some("Second")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_repeated_header_reads_last_column() {
        let mapping = mapping("FNSKU,Qty,Qty");
        let normalizer = RowNormalizer::new(&mapping);

        match normalizer.normalize(&row(2, "X1,1,2")) {
            RowOutcome::Importable(record) => assert_eq!(record.quantity, Some(2.0)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

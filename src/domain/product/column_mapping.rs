// ============================================================
// COLUMN MAPPING
// ============================================================
// Which source header feeds which canonical field, for one import file

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::CanonicalField;
use crate::domain::error::{AppError, Result};

/// Mapping from canonical field to source header.
/// Built once per file, editable until the import is committed, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Headers of the file, in file order
    headers: Vec<String>,

    /// Mapped fields; absent key means unmapped
    assignments: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    /// Create an empty mapping over the given file headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            assignments: BTreeMap::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn header_for(&self, field: CanonicalField) -> Option<&str> {
        self.assignments.get(&field).map(String::as_str)
    }

    /// Map `field` to a header of the file.
    /// Exact spelling wins; otherwise the first header equal ignoring case and outer whitespace.
    pub fn assign(&mut self, field: CanonicalField, header: &str) -> Result<()> {
        let wanted = header.trim();
        let found = self
            .headers
            .iter()
            .find(|h| h.as_str() == header)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|h| h.trim().eq_ignore_ascii_case(wanted))
            })
            .cloned()
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "cannot map {} to '{}': no such column (available: {})",
                    field,
                    wanted,
                    self.headers.join(", ")
                ))
            })?;

        self.assignments.insert(field, found);
        Ok(())
    }

    /// Record a match found among `headers` by the header matcher
    pub(crate) fn insert_detected(&mut self, field: CanonicalField, header: String) {
        debug_assert!(self.headers.contains(&header));
        self.assignments.insert(field, header);
    }

    /// Mark `field` unmapped
    pub fn clear(&mut self, field: CanonicalField) {
        self.assignments.remove(&field);
    }

    /// Mapped fields in declared order
    pub fn mapped_fields(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.assignments
            .iter()
            .map(|(field, header)| (*field, header.as_str()))
    }

    pub fn unmapped_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(|f| !self.assignments.contains_key(f))
            .collect()
    }

    /// True when at least one identifier field is mapped.
    /// Without one, every row of the file will fail validation.
    pub fn has_identifier(&self) -> bool {
        CanonicalField::IDENTIFIERS
            .iter()
            .any(|f| self.assignments.contains_key(f))
    }

    /// Headers that feed more than one field
    pub fn shared_headers(&self) -> Vec<(String, Vec<CanonicalField>)> {
        let mut by_header: BTreeMap<&str, Vec<CanonicalField>> = BTreeMap::new();
        for (field, header) in &self.assignments {
            by_header.entry(header.as_str()).or_default().push(*field);
        }

        by_header
            .into_iter()
            .filter(|(_, fields)| fields.len() > 1)
            .map(|(header, fields)| (header.to_string(), fields))
            .collect()
    }

    /// Cell position of the mapped header (last occurrence when names repeat)
    pub fn column_index(&self, field: CanonicalField) -> Option<usize> {
        let header = self.assignments.get(&field)?;
        self.headers.iter().rposition(|h| h == header)
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in CanonicalField::ALL {
            match self.header_for(field) {
                Some(header) => writeln!(f, "  {:<10} <- {}", field.as_str(), header)?,
                None => writeln!(f, "  {:<10}    (unmapped)", field.as_str())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["FNSKU".to_string(), "Item Description".to_string(), "Qty".to_string()]
    }

    #[test]
    fn test_assign_accepts_case_insensitive_header() {
        let mut mapping = ColumnMapping::new(headers());
        mapping.assign(CanonicalField::Name, "item description").unwrap();
        assert_eq!(mapping.header_for(CanonicalField::Name), Some("Item Description"));
        assert_eq!(mapping.column_index(CanonicalField::Name), Some(1));
    }

    #[test]
    fn test_assign_rejects_unknown_header() {
        let mut mapping = ColumnMapping::new(headers());
        let err = mapping.assign(CanonicalField::Price, "Retail Price").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(mapping.header_for(CanonicalField::Price), None);
    }

    #[test]
    fn test_clear_and_unmapped() {
        let mut mapping = ColumnMapping::new(headers());
        mapping.assign(CanonicalField::Fnsku, "FNSKU").unwrap();
        assert!(mapping.has_identifier());

        mapping.clear(CanonicalField::Fnsku);
        assert!(!mapping.has_identifier());
        assert_eq!(mapping.unmapped_fields().len(), CanonicalField::ALL.len());
    }

    #[test]
    fn test_shared_headers() {
        let mut mapping = ColumnMapping::new(headers());
        mapping.assign(CanonicalField::Fnsku, "FNSKU").unwrap();
        mapping.assign(CanonicalField::Upc, "FNSKU").unwrap();
        mapping.assign(CanonicalField::Quantity, "Qty").unwrap();

        let shared = mapping.shared_headers();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].0, "FNSKU");
        assert_eq!(shared[0].1, vec![CanonicalField::Fnsku, CanonicalField::Upc]);
    }

    #[test]
    fn test_duplicate_header_resolves_to_last() {
        let mut mapping = ColumnMapping::new(vec![
            "Qty".to_string(),
            "FNSKU".to_string(),
            "Qty".to_string(),
        ]);
        mapping.assign(CanonicalField::Quantity, "Qty").unwrap();
        assert_eq!(mapping.column_index(CanonicalField::Quantity), Some(2));
    }
}

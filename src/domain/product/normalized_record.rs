// ============================================================
// NORMALIZED RECORDS
// ============================================================
// Cleaned, typed product rows ready for persistence

use serde::{Deserialize, Serialize};

use super::CanonicalField;

/// A cleaned cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanedValue {
    Text(String),
    Number(f64),
}

impl CleanedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CleanedValue::Text(s) => Some(s),
            CleanedValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CleanedValue::Number(n) => Some(*n),
            CleanedValue::Text(_) => None,
        }
    }
}

/// One product row after mapping and cleaning.
/// Every field is optional; importability is decided by the identifier fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub fnsku: Option<String>,
    pub asin: Option<String>,
    pub lpn: Option<String>,
    pub upc: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub brand: Option<String>,
}

impl NormalizedRecord {
    /// Store a cleaned value. A value of the wrong shape for the field is stored as null.
    pub fn set(&mut self, field: CanonicalField, value: Option<CleanedValue>) {
        let text = || value.as_ref().and_then(|v| v.as_text()).map(str::to_string);
        let number = || value.as_ref().and_then(|v| v.as_number());

        match field {
            CanonicalField::Fnsku => self.fnsku = text(),
            CanonicalField::Asin => self.asin = text(),
            CanonicalField::Lpn => self.lpn = text(),
            CanonicalField::Upc => self.upc = text(),
            CanonicalField::Name => self.name = text(),
            CanonicalField::Price => self.price = number(),
            CanonicalField::Category => self.category = text(),
            CanonicalField::Quantity => self.quantity = number(),
            CanonicalField::Brand => self.brand = text(),
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<CleanedValue> {
        let text = |v: &Option<String>| v.clone().map(CleanedValue::Text);
        match field {
            CanonicalField::Fnsku => text(&self.fnsku),
            CanonicalField::Asin => text(&self.asin),
            CanonicalField::Lpn => text(&self.lpn),
            CanonicalField::Upc => text(&self.upc),
            CanonicalField::Name => text(&self.name),
            CanonicalField::Price => self.price.map(CleanedValue::Number),
            CanonicalField::Category => text(&self.category),
            CanonicalField::Quantity => self.quantity.map(CleanedValue::Number),
            CanonicalField::Brand => text(&self.brand),
        }
    }

    /// At least one of fnsku, asin, lpn is present
    pub fn is_importable(&self) -> bool {
        self.fnsku.is_some() || self.asin.is_some() || self.lpn.is_some()
    }

    /// Key used to upsert the record: first present identifier, tagged with its field name
    pub fn identity_key(&self) -> Option<String> {
        CanonicalField::IDENTIFIERS.iter().find_map(|field| {
            self.get(*field)
                .and_then(|v| v.as_text().map(|s| format!("{}:{}", field.as_str(), s)))
        })
    }
}

/// Classification of one data line
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Importable(NormalizedRecord),

    /// Cell count differs from header count
    Malformed {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// No fnsku, asin or lpn after cleaning
    MissingIdentifier { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut record = NormalizedRecord::default();
        record.set(CanonicalField::Fnsku, Some(CleanedValue::Text("X001".into())));
        record.set(CanonicalField::Price, Some(CleanedValue::Number(19.99)));

        assert_eq!(record.fnsku.as_deref(), Some("X001"));
        assert_eq!(record.get(CanonicalField::Price), Some(CleanedValue::Number(19.99)));
        assert_eq!(record.get(CanonicalField::Brand), None);
    }

    #[test]
    fn test_wrong_shape_stored_as_null() {
        let mut record = NormalizedRecord::default();
        record.set(CanonicalField::Quantity, Some(CleanedValue::Text("ten".into())));
        assert_eq!(record.quantity, None);
    }

    #[test]
    fn test_importable_requires_identifier() {
        let mut record = NormalizedRecord {
            name: Some("Widget".into()),
            upc: Some("012345678905".into()),
            ..Default::default()
        };
        assert!(!record.is_importable());
        assert_eq!(record.identity_key(), None);

        record.lpn = Some("LPN123".into());
        assert!(record.is_importable());
        assert_eq!(record.identity_key().as_deref(), Some("lpn:LPN123"));
    }

    #[test]
    fn test_identity_key_prefers_fnsku() {
        let record = NormalizedRecord {
            fnsku: Some("X001ABCDEF".into()),
            asin: Some("B000123".into()),
            ..Default::default()
        };
        assert_eq!(record.identity_key().as_deref(), Some("fnsku:X001ABCDEF"));
    }

    #[test]
    fn test_serializes_nulls() {
        let record = NormalizedRecord {
            fnsku: Some("X001".into()),
            quantity: Some(10.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fnsku"], "X001");
        assert_eq!(json["quantity"], 10.0);
        assert!(json["asin"].is_null());
    }
}

// ============================================================
// CANONICAL FIELDS
// ============================================================
// The fixed set of product attributes an import can populate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a raw cell is cleaned for a given field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Uppercase alphanumeric code (FNSKU, ASIN, ...)
    Identifier,

    /// Free text with whitespace collapsed
    Text,

    /// Floating point number, currency symbols and separators stripped
    Number,
}

/// Target attribute of a normalized import record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Fnsku,
    Asin,
    Lpn,
    Upc,
    Name,
    Price,
    Category,
    Quantity,
    Brand,
}

impl CanonicalField {
    /// All fields in declared order
    pub const ALL: [CanonicalField; 9] = [
        CanonicalField::Fnsku,
        CanonicalField::Asin,
        CanonicalField::Lpn,
        CanonicalField::Upc,
        CanonicalField::Name,
        CanonicalField::Price,
        CanonicalField::Category,
        CanonicalField::Quantity,
        CanonicalField::Brand,
    ];

    /// Fields of which at least one must be present for a record to be importable
    pub const IDENTIFIERS: [CanonicalField; 3] = [
        CanonicalField::Fnsku,
        CanonicalField::Asin,
        CanonicalField::Lpn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Fnsku => "fnsku",
            CanonicalField::Asin => "asin",
            CanonicalField::Lpn => "lpn",
            CanonicalField::Upc => "upc",
            CanonicalField::Name => "name",
            CanonicalField::Price => "price",
            CanonicalField::Category => "category",
            CanonicalField::Quantity => "quantity",
            CanonicalField::Brand => "brand",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            CanonicalField::Fnsku
            | CanonicalField::Asin
            | CanonicalField::Lpn
            | CanonicalField::Upc => ValueKind::Identifier,
            CanonicalField::Name | CanonicalField::Category | CanonicalField::Brand => {
                ValueKind::Text
            }
            CanonicalField::Price | CanonicalField::Quantity => ValueKind::Number,
        }
    }

    /// Accepted header spellings, most specific first.
    /// Order matters: the header matcher tries them in this order.
    pub fn header_variants(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Fnsku => &["fnsku", "fn sku", "sku", "fulfillment sku", "x code"],
            CanonicalField::Asin => &["asin", "amazon asin", "asin number"],
            CanonicalField::Lpn => &["lpn", "license plate", "license plate number", "lpn number"],
            CanonicalField::Upc => &["upc", "upc code", "barcode", "ean", "gtin"],
            CanonicalField::Name => &[
                "name",
                "product name",
                "item name",
                "title",
                "product title",
                "item description",
                "description",
            ],
            CanonicalField::Price => &[
                "price",
                "retail price",
                "unit price",
                "list price",
                "msrp",
                "cost",
            ],
            CanonicalField::Category => &[
                "category",
                "product category",
                "department",
                "dept",
                "group",
            ],
            CanonicalField::Quantity => &["quantity", "qty", "units", "on hand"],
            CanonicalField::Brand => &["brand", "brand name", "manufacturer", "mfr"],
        }
    }

    pub fn is_identifier(&self) -> bool {
        Self::IDENTIFIERS.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown field '{}', expected one of: {}",
                    s.trim(),
                    Self::ALL
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(CanonicalField::Fnsku.kind(), ValueKind::Identifier);
        assert_eq!(CanonicalField::Upc.kind(), ValueKind::Identifier);
        assert_eq!(CanonicalField::Name.kind(), ValueKind::Text);
        assert_eq!(CanonicalField::Price.kind(), ValueKind::Number);
        assert_eq!(CanonicalField::Quantity.kind(), ValueKind::Number);
    }

    #[test]
    fn test_identifier_set_excludes_upc() {
        assert!(CanonicalField::Lpn.is_identifier());
        assert!(!CanonicalField::Upc.is_identifier());
    }

    #[test]
    fn test_parse_field_name() {
        assert_eq!("FNSKU".parse::<CanonicalField>(), Ok(CanonicalField::Fnsku));
        assert_eq!(" quantity ".parse::<CanonicalField>(), Ok(CanonicalField::Quantity));
        assert!("weight".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn test_every_field_has_variants() {
        for field in CanonicalField::ALL {
            assert!(!field.header_variants().is_empty(), "{} has no variants", field);
        }
    }
}

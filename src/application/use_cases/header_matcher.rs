//! Header matcher for product import files
//!
//! Works out which column of an uploaded file feeds each canonical field.
//! Each field is matched independently in two passes over its accepted variants:
//!
//! 1. exact: the normalized variant equals a normalized header
//! 2. substring: one contains the other, both at least 3 characters long
//!
//! Variants are tried in declared order and headers in file order, first hit wins.
//! The exact pass runs over every variant before any substring comparison, so a
//! short variant like "sku" cannot grab an unrelated long header while an exact
//! match exists further down the list.

use tracing::{debug, warn};

use crate::domain::product::{CanonicalField, ColumnMapping};
use crate::shared::text::collapse_whitespace;

/// Minimum normalized length for substring matching
const MIN_SUBSTRING_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Exact,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    /// Header as written in the file
    pub header: String,
    /// Column position
    pub index: usize,
    /// Variant that produced the match
    pub variant: &'static str,
    pub match_type: MatchType,
}

/// Lowercase, collapse whitespace runs, drop `#`, `-` and `_`, trim
pub fn normalize_header(raw: &str) -> String {
    collapse_whitespace(&raw.to_lowercase())
        .chars()
        .filter(|c| !matches!(c, '#' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Matches canonical fields against the headers of one file
pub struct HeaderMatcher {
    headers: Vec<String>,
    normalized: Vec<String>,
}

impl HeaderMatcher {
    pub fn new(headers: &[String]) -> Self {
        Self {
            headers: headers.to_vec(),
            normalized: headers.iter().map(|h| normalize_header(h)).collect(),
        }
    }

    /// Best header for the given variants, or `None`
    pub fn find(&self, variants: &[&'static str]) -> Option<HeaderMatch> {
        let variants: Vec<(&'static str, String)> =
            variants.iter().map(|v| (*v, normalize_header(v))).collect();

        for (variant, wanted) in &variants {
            if let Some(index) = self.normalized.iter().position(|h| h == wanted) {
                return Some(self.hit(index, variant, MatchType::Exact));
            }
        }

        for (variant, wanted) in &variants {
            if wanted.chars().count() < MIN_SUBSTRING_LEN {
                continue;
            }
            let found = self.normalized.iter().position(|h| {
                h.chars().count() >= MIN_SUBSTRING_LEN
                    && (h.contains(wanted.as_str()) || wanted.contains(h.as_str()))
            });
            if let Some(index) = found {
                return Some(self.hit(index, variant, MatchType::Substring));
            }
        }

        None
    }

    /// Match every canonical field. Headers may be reused by several fields.
    pub fn detect_mapping(&self) -> ColumnMapping {
        let mut mapping = ColumnMapping::new(self.headers.clone());

        for field in CanonicalField::ALL {
            match self.find(field.header_variants()) {
                Some(hit) => {
                    debug!(
                        field = field.as_str(),
                        header = %hit.header,
                        variant = hit.variant,
                        match_type = ?hit.match_type,
                        "Mapped column"
                    );
                    mapping.insert_detected(field, hit.header);
                }
                None => debug!(field = field.as_str(), "No column found"),
            }
        }

        for (header, fields) in mapping.shared_headers() {
            warn!(
                header = %header,
                fields = ?fields,
                "Column feeds more than one field"
            );
        }

        mapping
    }

    fn hit(&self, index: usize, variant: &'static str, match_type: MatchType) -> HeaderMatch {
        HeaderMatch {
            header: self.headers[index].clone(),
            index,
            variant,
            match_type,
        }
    }
}

/// Detect the column mapping for a header row
pub fn detect_mapping(headers: &[String]) -> ColumnMapping {
    HeaderMatcher::new(headers).detect_mapping()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("SKU #"), "sku");
        assert_eq!(normalize_header("  Item   Description "), "item description");
        assert_eq!(normalize_header("license_plate-no"), "licenseplateno");
    }

    #[test]
    fn test_exact_pass_wins_before_substring() {
        let matcher = HeaderMatcher::new(&headers(&["SKU #", "Product Title", "Qty"]));
        let hit = matcher.find(CanonicalField::Fnsku.header_variants()).unwrap();

        assert_eq!(hit.header, "SKU #");
        assert_eq!(hit.index, 0);
        assert_eq!(hit.variant, "sku");
        assert_eq!(hit.match_type, MatchType::Exact);
    }

    #[test]
    fn test_exact_match_later_in_file_beats_earlier_substring() {
        // "seller sku" contains "sku" but "FNSKU" is an exact match
        let matcher = HeaderMatcher::new(&headers(&["Seller SKU", "FNSKU"]));
        let hit = matcher.find(CanonicalField::Fnsku.header_variants()).unwrap();
        assert_eq!(hit.header, "FNSKU");
        assert_eq!(hit.match_type, MatchType::Exact);
    }

    #[test]
    fn test_substring_fallback() {
        let matcher = HeaderMatcher::new(&headers(&["Seller SKU", "Units Shipped"]));

        let sku = matcher.find(CanonicalField::Fnsku.header_variants()).unwrap();
        assert_eq!(sku.header, "Seller SKU");
        assert_eq!(sku.match_type, MatchType::Substring);

        let qty = matcher.find(CanonicalField::Quantity.header_variants()).unwrap();
        assert_eq!(qty.header, "Units Shipped");
    }

    #[test]
    fn test_short_strings_never_substring_match() {
        // "id" is shorter than 3 characters and must not match "asin"
        let matcher = HeaderMatcher::new(&headers(&["ID", "Notes"]));
        assert_eq!(matcher.find(&["asin"]), None);
        assert_eq!(matcher.find(&["id"]).map(|m| m.match_type), Some(MatchType::Exact));
    }

    #[test]
    fn test_variant_order_decides_ties() {
        let matcher = HeaderMatcher::new(&headers(&["Description", "Product Name"]));
        let hit = matcher.find(CanonicalField::Name.header_variants()).unwrap();
        // "product name" is declared before "description"
        assert_eq!(hit.header, "Product Name");
    }

    #[test]
    fn test_detect_mapping_scenario() {
        let mapping = detect_mapping(&headers(&["FNSKU", "Item Description", "Retail Price", "Qty"]));

        assert_eq!(mapping.header_for(CanonicalField::Fnsku), Some("FNSKU"));
        assert_eq!(mapping.header_for(CanonicalField::Name), Some("Item Description"));
        assert_eq!(mapping.header_for(CanonicalField::Price), Some("Retail Price"));
        assert_eq!(mapping.header_for(CanonicalField::Quantity), Some("Qty"));
        for field in [
            CanonicalField::Asin,
            CanonicalField::Lpn,
            CanonicalField::Upc,
            CanonicalField::Category,
            CanonicalField::Brand,
        ] {
            assert_eq!(mapping.header_for(field), None, "{} should be unmapped", field);
        }
    }

    #[test]
    fn test_header_reuse_allowed() {
        // "Brand Name" matches brand exactly and name by substring
        let mapping = detect_mapping(&headers(&["ASIN", "Brand Name"]));
        assert_eq!(mapping.header_for(CanonicalField::Brand), Some("Brand Name"));
        assert_eq!(mapping.header_for(CanonicalField::Name), Some("Brand Name"));
        assert_eq!(mapping.shared_headers().len(), 1);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let h = headers(&["LPN", "UPC Code", "Dept", "Mfr", "Cost"]);
        assert_eq!(detect_mapping(&h), detect_mapping(&h));
    }
}

pub mod batch_importer;
pub mod header_matcher;
pub mod product_import;
pub mod row_normalizer;
pub mod value_cleaner;

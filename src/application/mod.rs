pub mod use_cases;

pub use use_cases::batch_importer::{BatchImporter, ImportCancellation};
pub use use_cases::header_matcher::{detect_mapping, HeaderMatcher};
pub use use_cases::product_import::{MappingEdit, PreparedImport, ProductImportUseCase};
pub use use_cases::row_normalizer::{NormalizedRows, RowNormalizer};
pub use use_cases::value_cleaner::clean_value;

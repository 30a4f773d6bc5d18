pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use app::run;
pub use application::{detect_mapping, ImportCancellation, MappingEdit, ProductImportUseCase};
pub use domain::error::{AppError, Result};
pub use domain::import_config::ImportConfig;
pub use domain::product::{CanonicalField, ColumnMapping, ImportSummary, NormalizedRecord};
pub use infrastructure::sinks::ProductSink;

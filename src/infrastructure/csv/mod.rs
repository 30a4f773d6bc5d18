// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// File decoding, line parsing, and CSV export

mod csv_exporter;
mod csv_parser;
mod file_reader;

pub use csv_exporter::CsvExporter;
pub use csv_parser::{parse_line, CsvParser};
pub use file_reader::FileReader;

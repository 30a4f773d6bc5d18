pub mod commands;

use std::path::PathBuf;
use std::str::FromStr;

use crate::application::MappingEdit;
use crate::domain::error::{AppError, Result};
use crate::domain::product::CanonicalField;

pub use commands::{execute, CliState};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_LIST_LIMIT: i64 = 50;

pub const USAGE: &str = "\
Usage: inventory-import <command> [options]

Commands:
  mapping  <file>              Show which column feeds each product field
  preview  <file>              Normalize without importing, print the first rows as JSON
  import   <file>              Import the file into the configured backend
  export   <file> <out.csv>    Normalize and write importable rows to CSV
  template <out.csv>           Write an empty import template
  list                         List products stored in the local database

Options:
  --map <field>=<header>       Use <header> as the source of <field>
  --unmap <field>              Leave <field> unmapped
  --rows <n>                   Rows shown by preview (default 5)
  --export <out.csv>           Also write the normalized rows during import
  --limit <n> / --offset <n>   Paging for list (default 50 / 0)";

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Help,
    Mapping {
        file: PathBuf,
        edits: Vec<MappingEdit>,
    },
    Preview {
        file: PathBuf,
        edits: Vec<MappingEdit>,
        rows: usize,
    },
    Import {
        file: PathBuf,
        edits: Vec<MappingEdit>,
        export: Option<PathBuf>,
    },
    Export {
        file: PathBuf,
        output: PathBuf,
        edits: Vec<MappingEdit>,
    },
    Template {
        output: PathBuf,
    },
    List {
        limit: i64,
        offset: i64,
    },
}

/// Parse command line arguments, program name excluded
pub fn parse_args<I>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };

    let mut positional: Vec<String> = Vec::new();
    let mut edits = Vec::new();
    let mut rows = DEFAULT_PREVIEW_ROWS;
    let mut export = None;
    let mut limit = DEFAULT_LIST_LIMIT;
    let mut offset = 0;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--map" => {
                let value = value_for("--map", args.next())?;
                if !value.contains('=') {
                    return Err(usage_error(format!(
                        "--map expects <field>=<header>, got '{}'",
                        value
                    )));
                }
                edits.push(value.parse::<MappingEdit>()?);
            }
            "--unmap" => {
                let field = CanonicalField::from_str(&value_for("--unmap", args.next())?)
                    .map_err(AppError::ValidationError)?;
                edits.push(MappingEdit::Clear(field));
            }
            "--rows" => rows = number_for("--rows", args.next())?,
            "--export" => export = Some(PathBuf::from(value_for("--export", args.next())?)),
            "--limit" => limit = number_for("--limit", args.next())?,
            "--offset" => offset = number_for("--offset", args.next())?,
            flag if flag.starts_with("--") => {
                return Err(usage_error(format!("Unknown option: {}", flag)))
            }
            other => positional.push(other.to_string()),
        }
    }

    match (command.as_str(), positional.as_slice()) {
        ("help" | "-h" | "--help", _) => Ok(CliCommand::Help),
        ("mapping", [file]) => Ok(CliCommand::Mapping {
            file: PathBuf::from(file),
            edits,
        }),
        ("preview", [file]) => Ok(CliCommand::Preview {
            file: PathBuf::from(file),
            edits,
            rows,
        }),
        ("import", [file]) => Ok(CliCommand::Import {
            file: PathBuf::from(file),
            edits,
            export,
        }),
        ("export", [file, output]) => Ok(CliCommand::Export {
            file: PathBuf::from(file),
            output: PathBuf::from(output),
            edits,
        }),
        ("template", [output]) => Ok(CliCommand::Template {
            output: PathBuf::from(output),
        }),
        ("list", []) => {
            if limit < 1 || offset < 0 {
                return Err(usage_error("--limit must be positive and --offset not negative"));
            }
            Ok(CliCommand::List { limit, offset })
        }
        ("mapping" | "preview" | "import" | "export" | "template" | "list", _) => Err(
            usage_error(format!("Wrong number of arguments for '{}'", command)),
        ),
        _ => Err(usage_error(format!("Unknown command: {}", command))),
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| usage_error(format!("{} needs a value", flag)))
}

fn number_for<T: FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = value_for(flag, value)?;
    value
        .parse::<T>()
        .map_err(|_| usage_error(format!("{} expects a number, got '{}'", flag, value)))
}

fn usage_error(message: impl Into<String>) -> AppError {
    AppError::ValidationError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<CliCommand> {
        parse_args(line.split_whitespace().map(str::to_string))
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert_eq!(parse_args(Vec::<String>::new()).unwrap(), CliCommand::Help);
        assert_eq!(parse("--help").unwrap(), CliCommand::Help);
    }

    #[test]
    fn test_import_with_edits_and_export() {
        let command = parse("import stock.csv --map price=Cost --unmap brand --export out.csv").unwrap();
        assert_eq!(
            command,
            CliCommand::Import {
                file: PathBuf::from("stock.csv"),
                edits: vec![
                    MappingEdit::Assign(CanonicalField::Price, "Cost".to_string()),
                    MappingEdit::Clear(CanonicalField::Brand),
                ],
                export: Some(PathBuf::from("out.csv")),
            }
        );
    }

    #[test]
    fn test_map_value_may_contain_spaces() {
        let args = ["mapping", "stock.csv", "--map", "name=Item Description"]
            .iter()
            .map(|s| s.to_string());
        match parse_args(args).unwrap() {
            CliCommand::Mapping { edits, .. } => assert_eq!(
                edits,
                vec![MappingEdit::Assign(
                    CanonicalField::Name,
                    "Item Description".to_string()
                )]
            ),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_preview_rows_and_list_paging() {
        assert_eq!(
            parse("preview stock.csv --rows 12").unwrap(),
            CliCommand::Preview {
                file: PathBuf::from("stock.csv"),
                edits: vec![],
                rows: 12,
            }
        );
        assert_eq!(
            parse("list --limit 10 --offset 20").unwrap(),
            CliCommand::List {
                limit: 10,
                offset: 20
            }
        );
        assert_eq!(
            parse("list").unwrap(),
            CliCommand::List {
                limit: DEFAULT_LIST_LIMIT,
                offset: 0
            }
        );
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(parse("import").is_err());
        assert!(parse("export stock.csv").is_err());
        assert!(parse("frobnicate x").is_err());
        assert!(parse("preview stock.csv --rows many").is_err());
        assert!(parse("mapping stock.csv --map price").is_err());
        assert!(parse("mapping stock.csv --unmap colour").is_err());
        assert!(parse("import stock.csv --force").is_err());
        assert!(parse("list --limit 0").is_err());
    }
}

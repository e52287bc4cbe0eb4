use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use csv::StringRecord;

use super::model::{FieldType, RecordSet};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How raw values are turned into typed fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quoting {
    /// Values that parse as numbers become numeric fields.
    #[default]
    NonNumeric,
    /// Every field is text.
    AllText,
}

/// Quoting policy plus the options handed to the CSV parser unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub quoting: Quoting,
    pub delimiter: u8,
    pub quote: u8,
    pub escape: Option<u8>,
    pub double_quote: bool,
    pub comment: Option<u8>,
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            quoting: Quoting::NonNumeric,
            delimiter: b',',
            quote: b'"',
            escape: None,
            double_quote: true,
            comment: None,
            trim: false,
        }
    }
}

impl CsvOptions {
    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            // Field counts are checked row by row below.
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(self.escape)
            .double_quote(self.double_quote)
            .comment(self.comment)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            });
        builder
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a CSV file with default options.
pub fn load_csv(path: impl AsRef<Path>) -> Result<RecordSet> {
    load_csv_with(path, &CsvOptions::default())
}

/// Load a CSV file.
pub fn load_csv_with(path: impl AsRef<Path>, options: &CsvOptions) -> Result<RecordSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    let records = read_csv(file, options)?;
    log::info!(
        "Loaded {} rows with fields {:?} from {}",
        records.len(),
        records.field_names(),
        path.display()
    );
    Ok(records)
}

/// Read CSV data: row 0 names the fields, row 1 decides their types, every
/// following row must match both.
///
/// Under [`Quoting::NonNumeric`] a quoted value in the first data row makes
/// its field text, so `"007"` keeps its leading zeros.
pub fn read_csv<R: Read>(mut reader: R, options: &CsvOptions) -> Result<RecordSet> {
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .map_err(csv::Error::from)?;

    let rows: Vec<StringRecord> = options
        .reader_builder()
        .from_reader(input.as_slice())
        .records()
        .collect::<std::result::Result<_, _>>()?;

    let (header, data) = rows.split_first().ok_or(Error::MissingHeader)?;
    let first = data.first().ok_or(Error::NoData)?;

    let names: Vec<&str> = header.iter().collect();
    check_width(first, names.len(), 1)?;
    let quoted = match options.quoting {
        Quoting::NonNumeric => {
            quoted_fields(raw_record(&input, first, data.get(1), options), options)
        }
        Quoting::AllText => Vec::new(),
    };
    let types: Vec<FieldType> = first
        .iter()
        .enumerate()
        .map(|(idx, raw)| match options.quoting {
            Quoting::NonNumeric if quoted.get(idx) == Some(&true) => FieldType::Text,
            Quoting::NonNumeric => FieldType::infer(raw),
            Quoting::AllText => FieldType::Text,
        })
        .collect();

    let mut columns: Vec<ColumnBuilder> = types
        .iter()
        .map(|&t| ColumnBuilder::new(t, data.len()))
        .collect();

    for (offset, record) in data.iter().enumerate() {
        let row = offset + 1;
        check_width(record, names.len(), row)?;
        for ((raw, column), name) in record.iter().zip(columns.iter_mut()).zip(&names) {
            column.push(raw).map_err(|expected| Error::FieldType {
                row,
                field: name.to_string(),
                value: raw.to_string(),
                expected,
            })?;
        }
    }

    let schema = Schema::new(
        names
            .iter()
            .zip(&types)
            .map(|(name, t)| Field::new(*name, t.data_type(), false))
            .collect::<Vec<_>>(),
    );
    let arrays: Vec<ArrayRef> = columns.into_iter().map(ColumnBuilder::finish).collect();
    let batch = RecordBatch::try_new(Arc::new(schema), arrays)?;
    RecordSet::from_batch(batch)
}

/// Raw bytes of `record`, up to the start of `next` or the end of input.
///
/// A record's position may point at blank or comment lines the parser
/// skipped on the way to it; those are dropped here.
fn raw_record<'a>(
    input: &'a [u8],
    record: &StringRecord,
    next: Option<&StringRecord>,
    options: &CsvOptions,
) -> &'a [u8] {
    let Some(start) = record.position().map(|p| p.byte() as usize) else {
        return &[];
    };
    let end = next
        .and_then(|r| r.position())
        .map_or(input.len(), |p| p.byte() as usize);
    let mut raw = input.get(start..end).unwrap_or(&[]);

    loop {
        match raw.first() {
            Some(b'\n' | b'\r') => raw = &raw[1..],
            Some(&b) if options.comment == Some(b) => {
                let line_end = raw.iter().position(|&c| c == b'\n').map_or(raw.len(), |i| i + 1);
                raw = &raw[line_end..];
            }
            _ => return raw,
        }
    }
}

/// Which fields of one raw record open with the quote character. Mirrors the
/// parser: a quote only opens a quoted field as the field's first byte.
fn quoted_fields(raw: &[u8], options: &CsvOptions) -> Vec<bool> {
    let mut quoted = Vec::new();
    let mut current = false;
    let mut at_start = true;
    let mut in_quotes = false;
    let mut i = 0;

    while i < raw.len() {
        let b = raw[i];
        if in_quotes {
            if options.escape == Some(b) {
                i += 1;
            } else if b == options.quote {
                if options.double_quote && raw.get(i + 1) == Some(&options.quote) {
                    i += 1;
                } else {
                    in_quotes = false;
                }
            }
        } else if b == options.delimiter {
            quoted.push(current);
            current = false;
            at_start = true;
        } else if b == b'\n' || b == b'\r' {
            break;
        } else if at_start && b == options.quote {
            in_quotes = true;
            current = true;
            at_start = false;
        } else {
            at_start = false;
        }
        i += 1;
    }
    quoted.push(current);
    quoted
}

fn check_width(record: &StringRecord, expected: usize, row: usize) -> Result<()> {
    if record.len() != expected {
        return Err(Error::FieldCount {
            row,
            expected,
            found: record.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Column builders
// ---------------------------------------------------------------------------

enum ColumnBuilder {
    Integer(Int64Builder),
    Float(Float64Builder),
    Text(StringBuilder),
}

impl ColumnBuilder {
    fn new(field_type: FieldType, capacity: usize) -> Self {
        match field_type {
            FieldType::Integer => ColumnBuilder::Integer(Int64Builder::with_capacity(capacity)),
            FieldType::Float => ColumnBuilder::Float(Float64Builder::with_capacity(capacity)),
            FieldType::Text => ColumnBuilder::Text(StringBuilder::new()),
        }
    }

    /// Append one raw value; on mismatch returns the expected type's name.
    fn push(&mut self, raw: &str) -> std::result::Result<(), &'static str> {
        match self {
            ColumnBuilder::Integer(b) => {
                let v = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| FieldType::Integer.name())?;
                b.append_value(v);
            }
            ColumnBuilder::Float(b) => {
                let v = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| FieldType::Float.name())?;
                b.append_value(v);
            }
            ColumnBuilder::Text(b) => b.append_value(raw),
        }
        Ok(())
    }

    fn finish(self) -> ArrayRef {
        match self {
            ColumnBuilder::Integer(mut b) => Arc::new(b.finish()),
            ColumnBuilder::Float(mut b) => Arc::new(b.finish()),
            ColumnBuilder::Text(mut b) => Arc::new(b.finish()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn read(text: &str) -> Result<RecordSet> {
        read_csv(text.as_bytes(), &CsvOptions::default())
    }

    #[test]
    fn infers_types_from_first_data_row() {
        let rs = read("a,b,c\n1,2.5,x\n3,4,y\n").unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.field_type("a"), Some(FieldType::Integer));
        assert_eq!(rs.field_type("b"), Some(FieldType::Float));
        assert_eq!(rs.field_type("c"), Some(FieldType::Text));
        assert_eq!(rs.get(1, "b"), Some(Value::Float(4.0)));
    }

    #[test]
    fn empty_and_header_only_inputs_fail() {
        assert!(matches!(read(""), Err(Error::MissingHeader)));
        assert!(matches!(read("a,b,c\n"), Err(Error::NoData)));
    }

    #[test]
    fn ragged_rows_fail() {
        let err = read("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(
            err,
            Error::FieldCount {
                row: 2,
                expected: 2,
                found: 1
            }
        ));
        assert!(matches!(
            read("a,b\n1,2,3\n").unwrap_err(),
            Error::FieldCount { row: 1, .. }
        ));
    }

    #[test]
    fn incompatible_later_values_fail() {
        let err = read("a,b\n1,2.5\n1.5,3\n").unwrap_err();
        assert!(matches!(
            err,
            Error::FieldType { row: 2, ref field, expected: "integer", .. } if field == "a"
        ));
        assert!(read("a,b\n1,2.5\n2,abc\n").is_err());
    }

    #[test]
    fn text_columns_accept_anything() {
        let rs = read("name\nx\n42\n").unwrap();
        assert_eq!(rs.field_type("name"), Some(FieldType::Text));
        assert_eq!(rs.get(1, "name"), Some(Value::Text("42".into())));
    }

    #[test]
    fn all_text_quoting_keeps_strings() {
        let options = CsvOptions {
            quoting: Quoting::AllText,
            ..CsvOptions::default()
        };
        let rs = read_csv("a,b\n1,2\n".as_bytes(), &options).unwrap();
        assert_eq!(rs.field_type("a"), Some(FieldType::Text));
    }

    #[test]
    fn parser_options_pass_through() {
        let options = CsvOptions {
            delimiter: b';',
            comment: Some(b'#'),
            trim: true,
            ..CsvOptions::default()
        };
        let rs = read_csv("# units: m\nx; y\n1; 2.0\n".as_bytes(), &options).unwrap();
        assert_eq!(rs.field_names(), vec!["x", "y"]);
        assert_eq!(rs.field_type("y"), Some(FieldType::Float));
    }

    #[test]
    fn quoted_first_row_values_stay_text() {
        let rs = read("zip,n,note\n\"007\",1,\"a,\"\"b\"\"\"\n\"12\",2,c\n").unwrap();
        assert_eq!(rs.field_type("zip"), Some(FieldType::Text));
        assert_eq!(rs.get(0, "zip"), Some(Value::Text("007".into())));
        assert_eq!(rs.field_type("n"), Some(FieldType::Integer));
        assert_eq!(rs.get(0, "note"), Some(Value::Text("a,\"b\"".into())));
    }

    #[test]
    fn quoting_survives_comment_and_blank_lines() {
        let options = CsvOptions {
            comment: Some(b'#'),
            ..CsvOptions::default()
        };
        let rs = read_csv("id,v\n\n# \"note\"\n\"01\",2\n".as_bytes(), &options).unwrap();
        assert_eq!(rs.get(0, "id"), Some(Value::Text("01".into())));
        assert_eq!(rs.field_type("v"), Some(FieldType::Integer));
    }

    #[test]
    fn quoted_field_detection_follows_parser_options() {
        let options = CsvOptions::default();
        assert_eq!(quoted_fields(b"\"1\",2,\"x,y\"\n", &options), vec![true, false, true]);
        assert_eq!(quoted_fields(b"1,a\"b\",\"\"", &options), vec![false, false, true]);

        let semicolons = CsvOptions {
            delimiter: b';',
            quote: b'\'',
            ..CsvOptions::default()
        };
        assert_eq!(quoted_fields(b"'1;2';3", &semicolons), vec![true, false]);
    }

    #[test]
    fn duplicate_field_names_are_kept() {
        let rs = read("a,a\n1,x\n").unwrap();
        assert_eq!(rs.num_fields(), 2);
        assert_eq!(rs.field_type("a"), Some(FieldType::Integer));
    }
}

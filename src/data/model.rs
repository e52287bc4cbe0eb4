use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// FieldType – the scalar type of one column
// ---------------------------------------------------------------------------

/// Column type, decided once from the first data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Float,
    /// Variable-length text; holds anything.
    Text,
}

impl FieldType {
    /// Type of a single raw value: integer, else float, else text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.parse::<i64>().is_ok() {
            FieldType::Integer
        } else if trimmed.parse::<f64>().is_ok() {
            FieldType::Float
        } else {
            FieldType::Text
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            FieldType::Integer => DataType::Int64,
            FieldType::Float => DataType::Float64,
            FieldType::Text => DataType::Utf8,
        }
    }

    fn from_data_type(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int64 => Some(FieldType::Integer),
            DataType::Float64 => Some(FieldType::Float),
            DataType::Utf8 => Some(FieldType::Text),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// One cell of a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Text(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordSet – the loaded table
// ---------------------------------------------------------------------------

/// Fixed-schema rows stored column-wise in an Arrow record batch.
///
/// Field names come from the header row and need not be unique; lookups by
/// name return the first match.
#[derive(Debug, Clone)]
pub struct RecordSet {
    batch: RecordBatch,
}

impl RecordSet {
    /// Wrap a batch whose columns are all Int64, Float64 or Utf8.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        for field in batch.schema().fields() {
            if FieldType::from_data_type(field.data_type()).is_none() {
                return Err(Error::Arrow(arrow::error::ArrowError::SchemaError(format!(
                    "field '{}' has unsupported type {}",
                    field.name(),
                    field.data_type()
                ))));
            }
        }
        Ok(Self { batch })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn num_fields(&self) -> usize {
        self.batch.num_columns()
    }

    /// Field names in header order.
    pub fn field_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// `(name, type)` pairs in header order.
    pub fn fields(&self) -> Vec<(String, FieldType)> {
        self.batch
            .schema()
            .fields()
            .iter()
            .filter_map(|f| Some((f.name().clone(), FieldType::from_data_type(f.data_type())?)))
            .collect()
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        let idx = self.index_of(name)?;
        FieldType::from_data_type(self.batch.schema().field(idx).data_type())
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.index_of(name).map(|idx| self.batch.column(idx))
    }

    /// A numeric column as `f64`s, ready for plotting.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>> {
        let col = self
            .column(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;

        if let Some(ints) = col.as_any().downcast_ref::<Int64Array>() {
            Ok(ints.values().iter().map(|&v| v as f64).collect())
        } else if let Some(floats) = col.as_any().downcast_ref::<Float64Array>() {
            Ok(floats.values().to_vec())
        } else {
            Err(Error::NotNumeric(name.to_string()))
        }
    }

    /// The cell at `row` in the named field.
    pub fn get(&self, row: usize, name: &str) -> Option<Value> {
        let idx = self.index_of(name)?;
        self.cell(row, idx)
    }

    /// Every cell of one row, in field order.
    pub fn row(&self, row: usize) -> Option<Vec<Value>> {
        (0..self.num_fields()).map(|idx| self.cell(row, idx)).collect()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Records-oriented JSON: `[{"a": 1, "b": 2.5, "c": "x"}, ...]`.
    ///
    /// With duplicate field names the last column wins, as in any JSON object.
    pub fn to_json(&self) -> JsonValue {
        let names = self.field_names();
        let records = (0..self.len())
            .map(|row| {
                let mut obj = Map::new();
                for (idx, name) in names.iter().enumerate() {
                    let value = self
                        .cell(row, idx)
                        .and_then(|v| serde_json::to_value(v).ok())
                        .unwrap_or(JsonValue::Null);
                    obj.insert(name.clone(), value);
                }
                JsonValue::Object(obj)
            })
            .collect();
        JsonValue::Array(records)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.batch
            .schema()
            .fields()
            .iter()
            .position(|f| f.name() == name)
    }

    fn cell(&self, row: usize, idx: usize) -> Option<Value> {
        if row >= self.len() || idx >= self.num_fields() {
            return None;
        }
        let col: &Arc<dyn Array> = self.batch.column(idx);
        if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
            Some(Value::Integer(arr.value(row)))
        } else if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
            Some(Value::Float(arr.value(row)))
        } else {
            col.as_any()
                .downcast_ref::<StringArray>()
                .map(|arr| Value::Text(arr.value(row).to_string()))
        }
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = arrow::util::pretty::pretty_format_batches(std::slice::from_ref(&self.batch))
            .map_err(|_| fmt::Error)?;
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Schema};

    fn sample() -> RecordSet {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64, false),
            Field::new("b", DataType::Float64, false),
            Field::new("c", DataType::Utf8, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Float64Array::from(vec![2.5, 3.0])),
                Arc::new(StringArray::from(vec!["x", "y"])),
            ],
        )
        .unwrap();
        RecordSet::from_batch(batch).unwrap()
    }

    #[test]
    fn infer_prefers_integer_then_float() {
        assert_eq!(FieldType::infer("1"), FieldType::Integer);
        assert_eq!(FieldType::infer(" -7 "), FieldType::Integer);
        assert_eq!(FieldType::infer("2.5"), FieldType::Float);
        assert_eq!(FieldType::infer("1e3"), FieldType::Float);
        assert_eq!(FieldType::infer("x"), FieldType::Text);
        assert_eq!(FieldType::infer(""), FieldType::Text);
    }

    #[test]
    fn accessors() {
        let rs = sample();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.field_names(), vec!["a", "b", "c"]);
        assert_eq!(rs.field_type("b"), Some(FieldType::Float));
        assert_eq!(rs.get(1, "c"), Some(Value::Text("y".into())));
        assert_eq!(rs.get(2, "c"), None);
        assert_eq!(
            rs.row(0),
            Some(vec![
                Value::Integer(1),
                Value::Float(2.5),
                Value::Text("x".into())
            ])
        );
        assert_eq!(rs.column_f64("a").unwrap(), vec![1.0, 2.0]);
        assert!(matches!(rs.column_f64("c"), Err(Error::NotNumeric(_))));
        assert!(matches!(rs.column_f64("z"), Err(Error::UnknownField(_))));
    }

    #[test]
    fn json_records_and_pretty_table() {
        let rs = sample();
        let json = rs.to_json();
        assert_eq!(json[0]["a"], 1);
        assert_eq!(json[1]["b"], 3.0);
        assert_eq!(json[1]["c"], "y");

        let table = rs.to_string();
        assert!(table.contains("| a "));
        assert!(table.contains("2.5"));
    }

    #[test]
    fn rejects_unsupported_columns() {
        let schema = Schema::new(vec![Field::new("flag", DataType::Boolean, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(arrow::array::BooleanArray::from(vec![true]))],
        )
        .unwrap();
        assert!(RecordSet::from_batch(batch).is_err());
    }
}

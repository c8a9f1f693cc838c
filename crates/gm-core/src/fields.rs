//! Field resolution: locating the columns a layer needs inside a frame

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::{GeomapError, Result};

/// A logical column a layer requires, with the lower-case names accepted for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRole {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl FieldRole {
    pub const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }

    /// Whether a column name satisfies this role
    pub fn accepts(&self, column_name: &str) -> bool {
        let lower = column_name.to_lowercase();
        self.aliases.iter().any(|alias| *alias == lower)
    }
}

/// A column matched to a role
#[derive(Debug, Clone)]
pub struct FieldMatch {
    /// Position of the column in the frame schema
    pub index: usize,
    /// Column name as it appears in the frame
    pub name: String,
    pub values: ArrayRef,
}

impl FieldMatch {
    /// Read the column as floating point values; nulls and unparseable cells become NaN
    pub fn numbers(&self) -> Result<Vec<f64>> {
        let floats = cast(&self.values, &DataType::Float64)?;
        let floats = floats
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| {
                arrow::error::ArrowError::CastError(format!(
                    "column {} could not be read as Float64",
                    self.name
                ))
            })?;
        Ok(floats.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Read the column as text; nulls stay `None`
    pub fn strings(&self) -> Result<Vec<Option<String>>> {
        let text = cast(&self.values, &DataType::Utf8)?;
        let text = text
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| {
                arrow::error::ArrowError::CastError(format!(
                    "column {} could not be read as Utf8",
                    self.name
                ))
            })?;
        Ok(text.iter().map(|v| v.map(str::to_string)).collect())
    }

    pub fn is_numeric(&self) -> bool {
        self.values.data_type().is_numeric()
    }
}

/// Result of resolving every required role against one frame
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    matches: Vec<(&'static str, FieldMatch)>,
}

impl FieldMapping {
    pub fn get(&self, role: &str) -> Option<&FieldMatch> {
        self.matches
            .iter()
            .find(|(name, _)| *name == role)
            .map(|(_, m)| m)
    }

    /// Numeric values of a mapped role
    pub fn numbers(&self, role: &str) -> Result<Vec<f64>> {
        self.get(role)
            .ok_or_else(|| GeomapError::MissingField {
                role: role.to_string(),
            })?
            .numbers()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Find the first column matching a role, scanning the schema in order
pub fn find_field(frame: &RecordBatch, role: &FieldRole) -> Option<FieldMatch> {
    frame
        .schema()
        .fields()
        .iter()
        .position(|f| role.accepts(f.name()))
        .map(|index| FieldMatch {
            index,
            name: frame.schema().field(index).name().clone(),
            values: frame.column(index).clone(),
        })
}

/// Find a column by name, preferring an exact match over a case-insensitive one
pub fn field_by_name(frame: &RecordBatch, name: &str) -> Option<FieldMatch> {
    let schema = frame.schema();
    let index = schema
        .fields()
        .iter()
        .position(|f| f.name() == name)
        .or_else(|| {
            schema
                .fields()
                .iter()
                .position(|f| f.name().eq_ignore_ascii_case(name))
        })?;
    Some(FieldMatch {
        index,
        name: schema.field(index).name().clone(),
        values: frame.column(index).clone(),
    })
}

/// Resolve all roles against a frame.
///
/// Fails on the first role without a matching column; the error's display
/// string is the warning shown for the skipped frame.
pub fn resolve_fields(frame: &RecordBatch, roles: &[FieldRole]) -> Result<FieldMapping> {
    let mut matches = Vec::with_capacity(roles.len());
    for role in roles {
        let found = find_field(frame, role).ok_or_else(|| GeomapError::MissingField {
            role: role.name.to_string(),
        })?;
        matches.push((role.name, found));
    }
    Ok(FieldMapping { matches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int32Array;
    use std::sync::Arc;

    const LAT: FieldRole = FieldRole::new("lat", &["lat", "latitude"]);
    const LON: FieldRole = FieldRole::new("lon", &["lon", "lng"]);

    fn frame() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("Name", Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef),
            ("LATITUDE", Arc::new(Float64Array::from(vec![1.5, 2.5])) as ArrayRef),
            ("Lat", Arc::new(Int32Array::from(vec![7, 8])) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_case_insensitive_first_match() {
        let mapping = resolve_fields(&frame(), &[LAT]).unwrap();
        let lat = mapping.get("lat").unwrap();
        assert_eq!(lat.index, 1);
        assert_eq!(lat.name, "LATITUDE");
        assert_eq!(lat.numbers().unwrap(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_missing_role_reports_warning() {
        let err = resolve_fields(&frame(), &[LAT, LON]).unwrap_err();
        assert_eq!(err.to_string(), "lon field not found.");
    }

    #[test]
    fn test_field_by_name_prefers_exact_match() {
        assert_eq!(field_by_name(&frame(), "Lat").unwrap().index, 2);
        assert_eq!(field_by_name(&frame(), "name").unwrap().index, 0);
        assert!(field_by_name(&frame(), "missing").is_none());
    }

    #[test]
    fn test_integer_and_null_columns_read_as_floats() {
        let batch = RecordBatch::try_from_iter(vec![(
            "lat",
            Arc::new(Int32Array::from(vec![Some(3), None])) as ArrayRef,
        )])
        .unwrap();
        let values = resolve_fields(&batch, &[LAT]).unwrap().numbers("lat").unwrap();
        assert_eq!(values[0], 3.0);
        assert!(values[1].is_nan());
    }
}

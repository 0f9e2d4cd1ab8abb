//! Calibration Documents
//!
//! JSON or TOML files listing calibration points. Mapping arrays stay as
//! generic values so a malformed entry is rejected on its own instead of
//! failing the whole document.
//!
//! ```json
//! { "map": [ { "domain": [0, 0, 1], "range": [0, 0, 1.01] } ], "radius": 24 }
//! ```
//!
//! ```toml
//! radius = 24.0
//!
//! [[offsets]]
//! point = [0, 0, 1]
//! offset = [0, 0, 0.01]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, EntryError};
use crate::geometry::Coord;
use crate::mapping::MappingMode;

/// Root of a calibration document
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CalibrationDocument {
    /// Absolute-target entries: `{ domain, range }`
    pub map: Option<Value>,
    /// Offset entries: `{ point, offset }`
    pub offsets: Option<Value>,
    /// Explicit neighbor search radius
    pub radius: Option<f64>,
}

impl CalibrationDocument {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a document, choosing the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let read = || {
            fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        match format.as_deref() {
            Some("json") => Self::from_json_str(&read()?),
            Some("toml") => Self::from_toml_str(&read()?),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Mode implied by the document: offsets if it only has `"offsets"`
    pub fn detect_mode(&self) -> MappingMode {
        if self.offsets.is_some() && self.map.is_none() {
            MappingMode::Offset
        } else {
            MappingMode::Absolute
        }
    }

    /// Raw entry array for `mode`, if the document has one
    pub fn entries(&self, mode: MappingMode) -> Option<&Value> {
        match mode {
            MappingMode::Absolute => self.map.as_ref(),
            MappingMode::Offset => self.offsets.as_ref(),
        }
    }
}

/// Decode one `{ <domain_field>: [x,y,z], <target_field>: [x,y,z] }` entry
pub fn parse_entry(entry: &Value, mode: MappingMode) -> Result<(Coord, Coord), EntryError> {
    let object = entry.as_object().ok_or(EntryError::NotAnObject)?;
    let (domain_field, target_field) = mode.fields();

    let domain = parse_vector(object.get(domain_field), domain_field)?;
    let target = parse_vector(object.get(target_field), target_field)?;
    Ok((domain, target))
}

fn parse_vector(value: Option<&Value>, field: &str) -> Result<Coord, EntryError> {
    let items = value.and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
    if items.len() != 3 {
        return Err(EntryError::WrongLength {
            field: field.to_string(),
            actual: items.len(),
        });
    }

    let mut components = [0.0; 3];
    for (index, item) in items.iter().enumerate() {
        components[index] = item.as_f64().ok_or_else(|| EntryError::NotANumber {
            field: field.to_string(),
            index,
        })?;
    }
    Ok(Coord::from_array(components))
}

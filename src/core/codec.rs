//! Position encoding stored on every sleeve so a later run can recognise it.
//!
//! The format is `"{x};{y};{z}"` with Rust's shortest round-trip float
//! formatting, so `decode(encode(p)) == p` for every finite point.

use nalgebra::Point3;
use thiserror::Error;

const SEPARATOR: char = ';';
const AXES: [&str; 3] = ["X", "Y", "Z"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Expected 3 ';'-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("Field {axis} is not a finite number: '{value}'")]
    InvalidNumber { axis: &'static str, value: String },
}

pub fn encode(point: &Point3<f64>) -> String {
    format!("{}{SEPARATOR}{}{SEPARATOR}{}", point.x, point.y, point.z)
}

pub fn decode(encoded: &str) -> Result<Point3<f64>, DecodeError> {
    let fields: Vec<&str> = encoded.split(SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(DecodeError::FieldCount {
            found: fields.len(),
        });
    }

    let mut coords = [0.0; 3];
    for ((slot, field), axis) in coords.iter_mut().zip(&fields).zip(AXES) {
        *slot = field
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DecodeError::InvalidNumber {
                axis,
                value: field.to_string(),
            })?;
    }

    Ok(Point3::new(coords[0], coords[1], coords[2]))
}

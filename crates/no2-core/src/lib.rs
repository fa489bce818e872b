//! Core domain types and error definitions for the NO₂ prediction service.
//!
//! This crate provides the types shared between the model and the server:
//!
//! - [`Coordinates`]: A (latitude, longitude) pair submitted by a client
//! - [`FeatureVector`]: The numeric row handed to a model
//! - [`Regressor`]: The inference seam implemented by loaded models
//! - [`InferenceError`]: Error type for prediction calls
//!
//! # Example
//!
//! ```rust
//! use no2_core::{Coordinates, FeatureVector};
//!
//! let coords = Coordinates::new(40.7128, -74.0060);
//! let features = FeatureVector::from(coords);
//!
//! assert_eq!(features.as_slice(), &[40.7128, -74.0060]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns every feature vector carries: latitude then longitude.
pub const FEATURE_COUNT: usize = 2;

/// Errors that can occur while running inference.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// The row width does not match what the model was trained on.
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// A feature value was NaN or infinite.
    #[error("feature {index} is not a finite number")]
    NonFinite { index: usize },

    /// The model produced no output for a non-empty input.
    #[error("model returned no predictions")]
    EmptyOutput,
}

/// A geographic point as submitted to `/predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "latitude: {}, longitude: {}", self.latitude, self.longitude)
    }
}

/// A single model input row.
///
/// Built from [`Coordinates`], the column order is always
/// `[latitude, longitude]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Coordinates> for FeatureVector {
    fn from(coords: Coordinates) -> Self {
        Self(vec![coords.latitude, coords.longitude])
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]]")
    }
}

/// A loaded regression model.
///
/// Implementations must be read-only after construction so a single
/// instance can serve concurrent requests.
pub trait Regressor: Send + Sync {
    /// Number of columns each input row must have.
    fn n_features(&self) -> usize;

    /// Predicts one scalar per input row, in row order.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, InferenceError>;

    /// Predicts a single row and returns its only output.
    fn predict_one(&self, row: FeatureVector) -> Result<f64, InferenceError> {
        self.predict(std::slice::from_ref(&row))?
            .first()
            .copied()
            .ok_or(InferenceError::EmptyOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl Regressor for Constant {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
            Ok(rows.iter().map(|_| self.0).collect())
        }
    }

    struct Silent;

    impl Regressor for Silent {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict(&self, _rows: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_feature_vector_order() {
        let features = FeatureVector::from(Coordinates::new(51.5, -0.12));
        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(features.as_slice(), &[51.5, -0.12]);
    }

    #[test]
    fn test_feature_vector_display() {
        let features = FeatureVector::from(Coordinates::new(40.5, -74.0));
        assert_eq!(features.to_string(), "[[40.5, -74]]");
    }

    #[test]
    fn test_predict_one_takes_first_output() {
        let model = Constant(17.25);
        let row = FeatureVector::from(Coordinates::new(0.0, 0.0));
        assert_eq!(model.predict_one(row).unwrap(), 17.25);
    }

    #[test]
    fn test_predict_one_empty_output() {
        let row = FeatureVector::from(Coordinates::new(0.0, 0.0));
        assert_eq!(Silent.predict_one(row), Err(InferenceError::EmptyOutput));
    }

    #[test]
    fn test_coordinates_serde() {
        let coords: Coordinates =
            serde_json::from_str(r#"{"latitude": 40.7128, "longitude": -74.006}"#).unwrap();
        assert_eq!(coords, Coordinates::new(40.7128, -74.006));
    }
}

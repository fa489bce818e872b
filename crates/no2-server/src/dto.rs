use std::fmt;

use no2_core::Coordinates;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

// === HTTP DTOs ===

/// Body of `POST /predict`. Fields are optional so that absent or null
/// coordinates reach the handler and get the dedicated 400 response.
///
/// Only a JSON object is accepted; arrays and scalars are rejected.
#[derive(Debug, Default)]
pub struct PredictRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl<'de> Deserialize<'de> for PredictRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PredictRequestVisitor)
    }
}

struct PredictRequestVisitor;

impl<'de> Visitor<'de> for PredictRequestVisitor {
    type Value = PredictRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object with latitude and longitude")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut req = PredictRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "latitude" => req.latitude = map.next_value()?,
                "longitude" => req.longitude = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(req)
    }
}

impl PredictRequest {
    /// Both coordinates, or `None` if either is missing.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(rename = "NO2_prediction")]
    pub no2_prediction: f64,
}

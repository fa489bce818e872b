//! Model inference service.

use no2_core::{Coordinates, FeatureVector, InferenceError, Regressor};
use tracing::info;

/// Runs the model on a single (latitude, longitude) row.
pub fn predict(model: &dyn Regressor, coords: Coordinates) -> Result<f64, InferenceError> {
    let features = FeatureVector::from(coords);
    info!("Model input features: {}", features);

    let prediction = model.predict_one(features)?;
    info!("Prediction result: {}", prediction);

    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Echoes the row back as `latitude * 1000 + longitude` to expose column order.
    struct ColumnEcho;

    impl Regressor for ColumnEcho {
        fn n_features(&self) -> usize {
            2
        }

        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, InferenceError> {
            Ok(rows
                .iter()
                .map(|r| r.as_slice()[0] * 1000.0 + r.as_slice()[1])
                .collect())
        }
    }

    #[test]
    fn test_latitude_is_first_column() {
        let value = predict(&ColumnEcho, Coordinates::new(2.0, 3.0)).unwrap();
        assert_eq!(value, 2003.0);
    }

    #[test]
    fn test_features_and_result_logged_at_info() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            predict(&ColumnEcho, Coordinates::new(2.0, 3.0)).unwrap();
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Model input features: [[2, 3]]"), "{logs}");
        assert!(logs.contains("Prediction result: 2003"), "{logs}");
    }
}

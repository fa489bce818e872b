//! Reading model artifacts from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::{Forest, ModelError};

impl Forest {
    /// Loads and validates the artifact at `path`.
    ///
    /// Any failure here is fatal for the server: it must not start without a
    /// model.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        info!("Loading model artifact from {}", path.display());

        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let forest = Forest::from_reader(BufReader::new(file))?;

        info!(
            trees = forest.n_trees(),
            aggregation = ?forest.aggregation(),
            features = ?forest.feature_names(),
            "Model loaded"
        );
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_artifact(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("no2-model-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/forest.json");
        let forest = Forest::load(&path).unwrap();
        assert_eq!(forest.n_trees(), 3);
        assert_eq!(forest.feature_names(), &["latitude", "longitude"]);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join(format!("no2-missing-{}.json", uuid::Uuid::new_v4()));
        let err = Forest::load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("no2-missing-"));
    }

    #[test]
    fn test_load_corrupt_file() {
        let path = temp_artifact("{ not json");
        let err = Forest::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn test_load_invalid_structure() {
        let path = temp_artifact(r#"{ "n_features": 2, "trees": [] }"#);
        let err = Forest::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ModelError::Invalid(_)));
    }
}

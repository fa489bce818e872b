//! HTTP server exposing a loaded NO₂ regression model.
//!
//! Routes:
//!
//! - `GET /`: static landing page
//! - `GET /health`: liveness probe
//! - `POST /predict`: `{"latitude", "longitude"}` to `{"NO2_prediction"}`

pub mod dto;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use anyhow::ensure;
use no2_core::{Regressor, FEATURE_COUNT};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only state. The model is loaded once before serving.
pub struct ServerState {
    model: Arc<dyn Regressor>,
}

impl ServerState {
    /// Wraps a loaded model, refusing one that does not take exactly
    /// (latitude, longitude) rows.
    pub fn from_model(model: impl Regressor + 'static) -> anyhow::Result<Self> {
        ensure!(
            model.n_features() == FEATURE_COUNT,
            "model expects {} features, requests supply {}",
            model.n_features(),
            FEATURE_COUNT
        );
        Ok(Self { model: Arc::new(model) })
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }
}

/// Builds the application router with CORS open to any origin.
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::home::index))
        .route("/predict", post(handlers::predict::predict))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use no2_model::{Forest, Node, Tree};

    fn constant_forest(n_features: usize) -> Forest {
        Forest::new(n_features, vec![Tree::new(vec![Node::leaf(25.0)])]).unwrap()
    }

    #[test]
    fn test_state_accepts_two_feature_model() {
        let state = ServerState::from_model(constant_forest(2)).unwrap();
        assert_eq!(state.model().n_features(), FEATURE_COUNT);
    }

    #[test]
    fn test_state_rejects_wrong_feature_width() {
        let err = ServerState::from_model(constant_forest(3)).err().unwrap();
        assert_eq!(err.to_string(), "model expects 3 features, requests supply 2");

        assert!(ServerState::from_model(constant_forest(1)).is_err());
    }
}

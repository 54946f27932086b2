use crate::workflow::catalog::Catalog;
use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use votecore::SourceKind;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};
use warp::Filter;

type SharedCatalog = Arc<RwLock<Catalog>>;

/// Hosts the three dashboard documents under `/data/` plus `/health`.
pub struct HttpBridge {
    state: SharedCatalog,
}

impl HttpBridge {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            state: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
        routes(self.state.clone())
    }

    /// Binds `addr` and serves until `shutdown` resolves.
    pub fn serve(
        &self,
        addr: SocketAddr,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(SocketAddr, impl Future<Output = ()>)> {
        let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);
        let routes = self.routes().with(cors).with(warp::log("publisher"));
        warp::serve(routes)
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .with_context(|| format!("binding HTTP bridge on {addr}"))
    }

    pub fn publish(&self, catalog: Catalog) {
        match self.state.write() {
            Ok(mut guard) => {
                *guard = catalog;
                let available = guard.available();
                info!("catalog published: {available} of 3 documents available");
            }
            Err(_) => warn!("catalog lock poisoned; keeping previous documents"),
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Option<Catalog> {
        self.state.read().ok().map(|guard| guard.clone())
    }
}

fn routes(
    state: SharedCatalog,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let document = |kind: SourceKind| {
        let state = state.clone();
        warp::path("data")
            .and(warp::path(kind.document_name()))
            .and(warp::path::end())
            .and(warp::get())
            .map(move || document_reply(&state, kind))
    };

    let health_state = state.clone();
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || match health_state.read() {
            Ok(catalog) => reply::json(&catalog.health()).into_response(),
            Err(_) => poisoned(),
        });

    document(SourceKind::MunicipalityBoundaries)
        .or(document(SourceKind::UrbanUnitBoundaries))
        .unify()
        .or(document(SourceKind::Results))
        .unify()
        .or(health)
        .unify()
}

fn document_reply(state: &SharedCatalog, kind: SourceKind) -> Response {
    let Ok(catalog) = state.read() else {
        return poisoned();
    };
    match catalog.document(kind) {
        Ok(document) => reply::json(document).into_response(),
        Err(reason) => reply::with_status(
            reply::json(&json!({
                "status": "unavailable",
                "document": kind.document_name(),
                "reason": reason,
            })),
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .into_response(),
    }
}

fn poisoned() -> Response {
    let body = json!({"status": "error", "reason": "catalog lock poisoned"});
    reply::with_status(reply::json(&body), StatusCode::INTERNAL_SERVER_ERROR).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::catalog::ConfiguredSource;
    use crate::workflow::config::PublisherConfig;
    use votecore::loader::load_all;

    async fn bridge(config: PublisherConfig) -> HttpBridge {
        let outcome = load_all(&ConfiguredSource::new(config)).await;
        HttpBridge::new(Catalog::from_outcome(outcome))
    }

    #[tokio::test]
    async fn serves_each_document() {
        let bridge = bridge(PublisherConfig::default()).await;
        let routes = bridge.routes();

        for kind in SourceKind::ALL {
            let response = warp::test::request()
                .method("GET")
                .path(&format!("/data/{}", kind.document_name()))
                .reply(&routes)
                .await;
            let name = kind.document_name();
            assert_eq!(response.status(), StatusCode::OK, "{name}");
        }

        let response = warp::test::request()
            .path("/data/percentuali.json")
            .reply(&routes)
            .await;
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["coalitions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failed_document_does_not_affect_others() {
        let config = PublisherConfig {
            municipality_boundaries: Some("/nonexistent/Mappa-municipi.geojson".into()),
            ..Default::default()
        };
        let bridge = bridge(config).await;
        let routes = bridge.routes();

        let failed = warp::test::request()
            .path("/data/Mappa-municipi.geojson")
            .reply(&routes)
            .await;
        assert_eq!(failed.status(), StatusCode::SERVICE_UNAVAILABLE);

        let served = warp::test::request()
            .path("/data/Map-uu.geojson")
            .reply(&routes)
            .await;
        assert_eq!(served.status(), StatusCode::OK);

        let health = warp::test::request().path("/health").reply(&routes).await;
        let body: serde_json::Value = serde_json::from_slice(health.body()).unwrap();
        assert_eq!(
            body["documents"]["Mappa-municipi.geojson"]["status"],
            "unavailable"
        );
    }

    #[tokio::test]
    async fn unknown_path_is_rejected() {
        let bridge = bridge(PublisherConfig::default()).await;
        let response = warp::test::request()
            .path("/data/other.json")
            .reply(&bridge.routes())
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn publish_replaces_catalog() {
        let bridge = bridge(PublisherConfig::default()).await;
        let config = PublisherConfig {
            results: Some("/nonexistent/percentuali.json".into()),
            ..Default::default()
        };
        let outcome = load_all(&ConfiguredSource::new(config)).await;
        bridge.publish(Catalog::from_outcome(outcome));
        assert_eq!(bridge.snapshot().unwrap().available(), 2);
    }
}

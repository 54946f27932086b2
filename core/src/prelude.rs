use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::model::{GeoBoundary, ResultsTable};

/// Identifies one of the three independent documents the dashboard loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    MunicipalityBoundaries,
    UrbanUnitBoundaries,
    Results,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [
        SourceKind::MunicipalityBoundaries,
        SourceKind::UrbanUnitBoundaries,
        SourceKind::Results,
    ];

    /// Document name as published under `/data/`.
    pub fn document_name(self) -> &'static str {
        match self {
            SourceKind::MunicipalityBoundaries => "Mappa-municipi.geojson",
            SourceKind::UrbanUnitBoundaries => "Map-uu.geojson",
            SourceKind::Results => "percentuali.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::MunicipalityBoundaries => "municipality boundaries",
            SourceKind::UrbanUnitBoundaries => "urban-unit boundaries",
            SourceKind::Results => "results",
        }
    }
}

/// Error raised while obtaining one of the documents.
///
/// Payloads are plain strings so a load result can be cloned into UI messages.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("i/o failure: {0}")]
    Io(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Supplies the three datasets behind the dashboard.
///
/// Each method is a single best-effort attempt; the success of one has no
/// bearing on the others.
pub trait DataSource {
    fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send;
    fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send;
    fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send;
}

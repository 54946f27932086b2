use std::future::Future;
use std::path::Path;

use serde_json::{json, Value};
use votecore::loader::{read_document, LoadOutcome, StaticSource};
use votecore::model::{GeoBoundary, ResultsTable};
use votecore::{DataSource, LoadError, LoadResult, SourceKind};

use crate::generator::results::{synthesize, GeneratorConfig};
use crate::workflow::config::PublisherConfig;

/// Reads each configured file, falling back to the embedded fixture when a
/// path is not set. Results pass through the generator when it is enabled.
#[derive(Debug, Clone)]
pub struct ConfiguredSource {
    config: PublisherConfig,
    fixtures: StaticSource,
}

impl ConfiguredSource {
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            config,
            fixtures: StaticSource::fixtures(),
        }
    }

    fn generator(&self) -> Option<GeneratorConfig> {
        self.config.generator()
    }
}

async fn boundary_from(
    path: Option<&Path>,
    fixtures: &StaticSource,
    kind: SourceKind,
) -> LoadResult<GeoBoundary> {
    match path {
        Some(path) => GeoBoundary::parse(&read_document(path).await?),
        None => GeoBoundary::parse(fixtures.document(kind)),
    }
}

impl DataSource for ConfiguredSource {
    fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        boundary_from(
            self.config.municipality_boundaries.as_deref(),
            &self.fixtures,
            SourceKind::MunicipalityBoundaries,
        )
    }

    fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        boundary_from(
            self.config.urban_unit_boundaries.as_deref(),
            &self.fixtures,
            SourceKind::UrbanUnitBoundaries,
        )
    }

    fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send {
        async move {
            let table = match self.config.results.as_deref() {
                Some(path) => ResultsTable::parse(&read_document(path).await?)?,
                None => self.fixtures.results().await?,
            };
            Ok(match self.generator() {
                Some(generator) => synthesize(&table, &generator),
                None => table,
            })
        }
    }
}

/// The three documents as served, each independently present or failed.
#[derive(Debug, Clone)]
pub struct Catalog {
    municipality_boundaries: Result<Value, String>,
    urban_unit_boundaries: Result<Value, String>,
    results: Result<Value, String>,
}

impl Catalog {
    pub fn from_outcome(outcome: LoadOutcome) -> Self {
        Self {
            municipality_boundaries: outcome
                .municipality_boundaries
                .map(GeoBoundary::into_value)
                .map_err(|err| err.to_string()),
            urban_unit_boundaries: outcome
                .urban_unit_boundaries
                .map(GeoBoundary::into_value)
                .map_err(|err| err.to_string()),
            results: outcome
                .results
                .and_then(|table| {
                    serde_json::to_value(table.to_document()).map_err(LoadError::from)
                })
                .map_err(|err| err.to_string()),
        }
    }

    pub fn document(&self, kind: SourceKind) -> Result<&Value, &str> {
        let slot = match kind {
            SourceKind::MunicipalityBoundaries => &self.municipality_boundaries,
            SourceKind::UrbanUnitBoundaries => &self.urban_unit_boundaries,
            SourceKind::Results => &self.results,
        };
        slot.as_ref().map_err(String::as_str)
    }

    pub fn available(&self) -> usize {
        SourceKind::ALL
            .iter()
            .filter(|&&kind| self.document(kind).is_ok())
            .count()
    }

    pub fn health(&self) -> Value {
        let documents: serde_json::Map<String, Value> = SourceKind::ALL
            .iter()
            .map(|&kind| {
                let status = match self.document(kind) {
                    Ok(_) => json!({"status": "ok"}),
                    Err(reason) => json!({"status": "unavailable", "reason": reason}),
                };
                (kind.document_name().to_string(), status)
            })
            .collect();
        json!({"status": "ok", "documents": documents})
    }
}

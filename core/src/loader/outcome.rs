use crate::model::{audit, GeoBoundary, ResultsTable};
use crate::prelude::{DataSource, LoadError, LoadResult, SourceKind};
use crate::telemetry::log::LogManager;

/// Result of one load pass; each slot succeeds or fails on its own.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub municipality_boundaries: LoadResult<GeoBoundary>,
    pub urban_unit_boundaries: LoadResult<GeoBoundary>,
    pub results: LoadResult<ResultsTable>,
}

impl LoadOutcome {
    pub fn failures(&self) -> Vec<(SourceKind, &LoadError)> {
        let mut failures = Vec::new();
        if let Err(err) = &self.municipality_boundaries {
            failures.push((SourceKind::MunicipalityBoundaries, err));
        }
        if let Err(err) = &self.urban_unit_boundaries {
            failures.push((SourceKind::UrbanUnitBoundaries, err));
        }
        if let Err(err) = &self.results {
            failures.push((SourceKind::Results, err));
        }
        failures
    }

    pub fn log(&self, logger: &LogManager) {
        log_boundary(
            logger,
            SourceKind::MunicipalityBoundaries,
            &self.municipality_boundaries,
        );
        log_boundary(
            logger,
            SourceKind::UrbanUnitBoundaries,
            &self.urban_unit_boundaries,
        );
        log_results(logger, &self.results);
    }
}

/// Issues the three loads concurrently and waits for all of them.
pub async fn load_all<S: DataSource>(source: &S) -> LoadOutcome {
    let (municipality_boundaries, urban_unit_boundaries, results) = tokio::join!(
        source.municipality_boundaries(),
        source.urban_unit_boundaries(),
        source.results(),
    );

    LoadOutcome {
        municipality_boundaries,
        urban_unit_boundaries,
        results,
    }
}

pub fn log_boundary(logger: &LogManager, kind: SourceKind, result: &LoadResult<GeoBoundary>) {
    match result {
        Ok(boundary) => logger.record(&format!(
            "loaded {}: {} features",
            kind.label(),
            boundary.feature_count()
        )),
        Err(err) => logger.warn(&format!("{} unavailable: {}", kind.label(), err)),
    }
}

/// Logs the load and any consistency findings; findings never reject the table.
pub fn log_results(logger: &LogManager, result: &LoadResult<ResultsTable>) {
    match result {
        Ok(table) => {
            logger.record(&format!(
                "loaded results: {} municipalities, {} urban units",
                table.municipalities.len(),
                table.urban_units.len()
            ));
            for finding in audit(table) {
                logger.warn(&format!("results audit: {finding}"));
            }
        }
        Err(err) => logger.warn(&format!("results unavailable: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticSource;
    use std::future::Future;

    struct FailingResults(StaticSource);

    impl DataSource for FailingResults {
        fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
            self.0.municipality_boundaries()
        }

        fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
            self.0.urban_unit_boundaries()
        }

        fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send {
            async { Err(LoadError::Unavailable("simulated rejection".into())) }
        }
    }

    #[tokio::test]
    async fn fixtures_load_without_failures() {
        let outcome = load_all(&StaticSource::fixtures()).await;
        assert!(outcome.failures().is_empty());
    }

    #[tokio::test]
    async fn one_failure_leaves_other_slots_intact() {
        let outcome = load_all(&FailingResults(StaticSource::fixtures())).await;
        let failures = outcome.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, SourceKind::Results);
        assert!(outcome.municipality_boundaries.is_ok());
        assert!(outcome.urban_unit_boundaries.is_ok());
    }

    #[tokio::test]
    async fn malformed_document_fails_only_its_slot() {
        let fixtures = StaticSource::fixtures();
        let source = StaticSource::new(
            "{\"features\": 3}",
            fixtures.document(SourceKind::UrbanUnitBoundaries),
            fixtures.document(SourceKind::Results),
        );
        let outcome = load_all(&source).await;
        assert!(matches!(
            outcome.municipality_boundaries,
            Err(LoadError::Malformed(_))
        ));
        assert!(outcome.results.is_ok());
    }
}

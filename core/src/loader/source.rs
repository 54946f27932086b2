use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::model::{GeoBoundary, ResultsTable};
use crate::prelude::{DataSource, LoadError, LoadResult, SourceKind};

const MUNICIPALITY_FIXTURE: &str = include_str!("../../fixtures/municipality_boundaries.geojson");
const URBAN_UNIT_FIXTURE: &str = include_str!("../../fixtures/urban_unit_boundaries.geojson");
const RESULTS_FIXTURE: &str = include_str!("../../fixtures/results.json");

/// In-memory documents, by default the sample Genoa fixtures.
#[derive(Debug, Clone)]
pub struct StaticSource {
    municipality_boundaries: Cow<'static, str>,
    urban_unit_boundaries: Cow<'static, str>,
    results: Cow<'static, str>,
}

impl StaticSource {
    pub fn fixtures() -> Self {
        Self {
            municipality_boundaries: Cow::Borrowed(MUNICIPALITY_FIXTURE),
            urban_unit_boundaries: Cow::Borrowed(URBAN_UNIT_FIXTURE),
            results: Cow::Borrowed(RESULTS_FIXTURE),
        }
    }

    pub fn new(
        municipality_boundaries: impl Into<String>,
        urban_unit_boundaries: impl Into<String>,
        results: impl Into<String>,
    ) -> Self {
        Self {
            municipality_boundaries: Cow::Owned(municipality_boundaries.into()),
            urban_unit_boundaries: Cow::Owned(urban_unit_boundaries.into()),
            results: Cow::Owned(results.into()),
        }
    }

    /// Raw text of one document, as it would be served.
    pub fn document(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::MunicipalityBoundaries => &self.municipality_boundaries,
            SourceKind::UrbanUnitBoundaries => &self.urban_unit_boundaries,
            SourceKind::Results => &self.results,
        }
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::fixtures()
    }
}

impl DataSource for StaticSource {
    fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        async move { GeoBoundary::parse(&self.municipality_boundaries) }
    }

    fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        async move { GeoBoundary::parse(&self.urban_unit_boundaries) }
    }

    fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send {
        async move { ResultsTable::parse(&self.results) }
    }
}

/// Documents read from disk, one file per source.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub municipality_boundaries: PathBuf,
    pub urban_unit_boundaries: PathBuf,
    pub results: PathBuf,
}

impl FileSource {
    /// Uses the published document names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            municipality_boundaries: dir.join(SourceKind::MunicipalityBoundaries.document_name()),
            urban_unit_boundaries: dir.join(SourceKind::UrbanUnitBoundaries.document_name()),
            results: dir.join(SourceKind::Results.document_name()),
        }
    }
}

pub async fn read_document(path: &Path) -> LoadResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| LoadError::Io(format!("{}: {}", path.display(), err)))
}

impl DataSource for FileSource {
    fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        async move { GeoBoundary::parse(&read_document(&self.municipality_boundaries).await?) }
    }

    fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        async move { GeoBoundary::parse(&read_document(&self.urban_unit_boundaries).await?) }
    }

    fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send {
        async move { ResultsTable::parse(&read_document(&self.results).await?) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn fixtures_parse() {
        let source = StaticSource::fixtures();
        let municipalities = source.municipality_boundaries().await.unwrap();
        let urban_units = source.urban_unit_boundaries().await.unwrap();
        assert_eq!(municipalities.feature_count(), 9);
        assert_eq!(urban_units.feature_count(), 14);
        let table = source.results().await.unwrap();
        assert_eq!(table.municipalities.len(), 9);
        assert_eq!(table.urban_units.len(), 14);
        assert_eq!(table.coalitions.len(), 3);
        assert!(table.turnout.is_some());
    }

    #[test]
    fn fixtures_are_consistent() {
        let table = ResultsTable::parse(RESULTS_FIXTURE).unwrap();
        assert!(crate::model::audit(&table).is_empty());
    }

    #[tokio::test]
    async fn file_source_reads_published_names() {
        let dir = tempdir().unwrap();
        let fixtures = StaticSource::fixtures();
        for kind in SourceKind::ALL {
            let path = dir.path().join(kind.document_name());
            fs::write(path, fixtures.document(kind)).unwrap();
        }

        let source = FileSource::in_dir(dir.path());
        assert_eq!(source.results().await.unwrap().record_count(), 23);
        assert!(source.urban_unit_boundaries().await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let source = FileSource::in_dir(dir.path());
        let err = source.municipality_boundaries().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Io(message) if message.contains("Mappa-municipi.geojson")
        ));
    }
}

use std::future::Future;

use votecore::loader::StaticSource;
use votecore::model::{GeoBoundary, ResultsTable};
use votecore::{DataSource, LoadError, LoadResult, SourceKind};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";

/// Fetches the documents from a running publisher.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn document_url(&self, kind: SourceKind) -> String {
        format!("{}/data/{}", self.base_url, kind.document_name())
    }

    async fn fetch(&self, kind: SourceKind) -> LoadResult<reqwest::Response> {
        let url = self.document_url(kind);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| LoadError::Unavailable(format!("{url}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Unavailable(format!("{url}: HTTP {status}")));
        }
        Ok(response)
    }

    async fn boundary(&self, kind: SourceKind) -> LoadResult<GeoBoundary> {
        let value = self
            .fetch(kind)
            .await?
            .json::<serde_json::Value>()
            .await
            .map_err(|err| body_error(kind, err))?;
        GeoBoundary::from_value(value)
    }
}

fn body_error(kind: SourceKind, err: reqwest::Error) -> LoadError {
    if err.is_decode() {
        LoadError::Malformed(format!("{}: {err}", kind.document_name()))
    } else {
        LoadError::Unavailable(format!("{}: {err}", kind.document_name()))
    }
}

impl DataSource for HttpSource {
    fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        self.boundary(SourceKind::MunicipalityBoundaries)
    }

    fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        self.boundary(SourceKind::UrbanUnitBoundaries)
    }

    fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send {
        async move {
            let kind = SourceKind::Results;
            let body = self
                .fetch(kind)
                .await?
                .text()
                .await
                .map_err(|err| body_error(kind, err))?;
            ResultsTable::parse(&body)
        }
    }
}

/// Where the dashboard reads from: the embedded sample or a publisher.
#[derive(Debug, Clone)]
pub enum Source {
    Offline(StaticSource),
    Http(HttpSource),
}

impl Source {
    pub fn new(base_url: &str, offline: bool) -> Self {
        if offline {
            Source::Offline(StaticSource::fixtures())
        } else {
            Source::Http(HttpSource::new(base_url))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Offline(_) => "dati di esempio incorporati".into(),
            Source::Http(http) => http.base_url.clone(),
        }
    }
}

impl DataSource for Source {
    fn municipality_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        async move {
            match self {
                Source::Offline(source) => source.municipality_boundaries().await,
                Source::Http(source) => source.municipality_boundaries().await,
            }
        }
    }

    fn urban_unit_boundaries(&self) -> impl Future<Output = LoadResult<GeoBoundary>> + Send {
        async move {
            match self {
                Source::Offline(source) => source.urban_unit_boundaries().await,
                Source::Http(source) => source.urban_unit_boundaries().await,
            }
        }
    }

    fn results(&self) -> impl Future<Output = LoadResult<ResultsTable>> + Send {
        async move {
            match self {
                Source::Offline(source) => source.results().await,
                Source::Http(source) => source.results().await,
            }
        }
    }
}

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::generator::results::GeneratorConfig;

/// Publisher settings, read from YAML. Unset document paths fall back to the
/// embedded fixtures.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub bind: SocketAddr,
    pub municipality_boundaries: Option<PathBuf>,
    pub urban_unit_boundaries: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub synthesize: bool,
    pub seed: u64,
    pub jitter: f64,
    /// Reload the documents every this many seconds; each round reseeds the generator.
    pub refresh_secs: Option<u64>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            municipality_boundaries: None,
            urban_unit_boundaries: None,
            results: None,
            synthesize: false,
            seed: 0,
            jitter: GeneratorConfig::default().jitter,
            refresh_secs: None,
        }
    }
}

impl PublisherConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let shown = path_ref.display();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading publisher config {shown}"))?;
        let config: PublisherConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing publisher config {shown}"))?;
        Ok(config)
    }

    /// Command-line flags win over the file.
    pub fn apply_overrides(
        &mut self,
        bind: Option<SocketAddr>,
        seed: Option<u64>,
        synthesize: bool,
    ) {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self.synthesize |= synthesize;
    }

    pub fn generator(&self) -> Option<GeneratorConfig> {
        self.synthesize.then(|| GeneratorConfig {
            seed: self.seed,
            jitter: self.jitter,
        })
    }

    /// The configuration for reload round `round`, with the seed advanced.
    pub fn for_round(&self, round: u64) -> Self {
        Self {
            seed: self.seed.wrapping_add(round),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_serve_fixtures_on_loopback() {
        let cfg = PublisherConfig::default();
        assert_eq!(cfg.bind.port(), 9000);
        assert!(cfg.results.is_none());
        assert!(cfg.generator().is_none());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        let yaml = "bind: 0.0.0.0:8080\nresults: data/percentuali.json\nseed: 7\n";
        temp.write_all(yaml.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let cfg = PublisherConfig::load(&path).unwrap();
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.results, Some(PathBuf::from("data/percentuali.json")));
        assert_eq!(cfg.seed, 7);
        assert!(cfg.municipality_boundaries.is_none());
    }

    #[test]
    fn overrides_enable_generator() {
        let mut cfg = PublisherConfig::default();
        cfg.apply_overrides(None, Some(42), true);
        let generator = cfg.generator().unwrap();
        assert_eq!(generator.seed, 42);
        assert_eq!(cfg.bind.port(), 9000);
    }

    #[test]
    fn rounds_advance_the_seed() {
        let cfg = PublisherConfig {
            seed: u64::MAX,
            refresh_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(cfg.for_round(1).seed, 0);
        assert_eq!(cfg.for_round(0).seed, u64::MAX);
        assert_eq!(cfg.for_round(2).refresh_secs, Some(30));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"bind: [not, an, address]\n").unwrap();
        let path = temp.into_temp_path();
        let err = PublisherConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("parsing publisher config"));
    }
}

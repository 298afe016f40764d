use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::repository::{DEFAULT_PAYMENT_TYPES, SimulatedRepository};
use crate::store::FlowConfig;
use crate::{DEFAULT_COUNTDOWN_SECS, DEFAULT_LOAD_DELAY, DEFAULT_TICK_PERIOD};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub flow: Option<FlowSection>,
    pub repository: Option<RepositorySection>,
    pub display: Option<DisplaySection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlowSection {
    pub countdown_secs: Option<u32>,
    pub tick_millis: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepositorySection {
    pub delay_ms: Option<u64>,
    pub failure_rate: Option<f64>,
    pub payment_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/paysheet/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paysheet").join("config.toml"))
}

/// Load config by cascading CWD `.paysheet.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".paysheet.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Read and parse one config file. Missing files are silent; malformed ones are
/// logged and ignored.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (base_flow, over_flow) = (base.flow.unwrap_or_default(), overlay.flow.unwrap_or_default());
    let (base_repo, over_repo) = (
        base.repository.unwrap_or_default(),
        overlay.repository.unwrap_or_default(),
    );
    let (base_display, over_display) = (
        base.display.unwrap_or_default(),
        overlay.display.unwrap_or_default(),
    );

    ConfigFile {
        flow: Some(FlowSection {
            countdown_secs: over_flow.countdown_secs.or(base_flow.countdown_secs),
            tick_millis: over_flow.tick_millis.or(base_flow.tick_millis),
        }),
        repository: Some(RepositorySection {
            delay_ms: over_repo.delay_ms.or(base_repo.delay_ms),
            failure_rate: over_repo.failure_rate.or(base_repo.failure_rate),
            payment_types: over_repo.payment_types.or(base_repo.payment_types),
        }),
        display: Some(DisplaySection {
            theme: over_display.theme.or(base_display.theme),
        }),
    }
}

impl ConfigFile {
    /// Flow parameters with defaults filled in. A zero tick period falls back to the default.
    pub fn flow_config(&self) -> FlowConfig {
        let flow = self.flow.clone().unwrap_or_default();
        FlowConfig {
            countdown_secs: flow.countdown_secs.unwrap_or(DEFAULT_COUNTDOWN_SECS),
            tick_period: flow
                .tick_millis
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TICK_PERIOD),
        }
    }

    /// The simulated repository described by the `[repository]` section.
    pub fn repository(&self) -> SimulatedRepository {
        let repo = self.repository.clone().unwrap_or_default();
        let delay = repo
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOAD_DELAY);
        let simulated = match repo.payment_types {
            Some(names) if !names.is_empty() => SimulatedRepository::from_names(&names, delay),
            _ => SimulatedRepository::from_names(DEFAULT_PAYMENT_TYPES, delay),
        };
        simulated.with_failure_rate(repo.failure_rate.unwrap_or(0.0))
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.display.as_ref().and_then(|d| d.theme.as_deref())
    }
}

use config::{Config, Environment, File};
use serde::Deserialize;
use std::{collections::HashMap, env, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub trace: TraceConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_run_migrations() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Page size bounds applied to listing endpoints.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    Json,
    Pretty,
    Full,
    Compact,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TraceConsoleConfig {
    pub filter: String,
    pub format: TraceFormat,
    pub buffer_limit: usize,
    pub lossy: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TraceFileConfig {
    pub filter: String,
    pub format: TraceFormat,
    pub directory: String,
    pub filename: String,
    pub buffer_limit: usize,
    pub lossy: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TraceOtelConfig {
    pub service_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TraceConfig {
    pub console: Option<TraceConsoleConfig>,
    pub file: Option<TraceFileConfig>,
    pub otel: Option<TraceOtelConfig>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            console: Some(TraceConsoleConfig {
                filter: "info".into(),
                format: TraceFormat::Compact,
                buffer_limit: 128_000,
                lossy: true,
            }),
            file: None,
            otel: None,
        }
    }
}

impl AppConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let run_mode = env::var("APP_ENV").unwrap_or_default();
        Self::load_with_options(path, Some(run_mode), None)
    }

    pub fn load_with_options<P: AsRef<Path>>(
        path: P,
        run_mode: Option<String>,
        overrides: Option<HashMap<String, String>>,
    ) -> crate::Result<Self> {
        let dir = path.as_ref().to_string_lossy();
        let run_mode = run_mode.unwrap_or_default();
        let mut builder = Config::builder()
            .add_source(File::with_name(&format!("{dir}/default")))
            .add_source(
                File::with_name(&format!("{dir}/{run_mode}")).required(false),
            )
            // not committed
            .add_source(File::with_name(&format!("{dir}/local")).required(false))
            // TOURBOOK_DATABASE__MAX_CONNECTIONS -> database.max_connections
            .add_source(
                Environment::with_prefix("TOURBOOK")
                    .prefix_separator("_")
                    .separator("__"),
            );

        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                builder = builder
                    .set_override(key, value)
                    .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?;
            }
        }

        let s = builder
            .build()
            .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?;

        let config: Self = s
            .try_deserialize()
            .map_err(|e| crate::Error::Config(anyhow::anyhow!(e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        let p = &self.pagination;
        if p.default_limit == 0 || p.max_limit == 0 {
            return Err(crate::Error::Config(anyhow::anyhow!(
                "pagination limits must be positive"
            )));
        }
        if p.default_limit > p.max_limit {
            return Err(crate::Error::Config(anyhow::anyhow!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                p.default_limit,
                p.max_limit
            )));
        }
        Ok(())
    }
}

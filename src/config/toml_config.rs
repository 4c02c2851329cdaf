use crate::core::RunConfig;
use crate::domain::model::{Level, Selection};
use crate::domain::tiers::TierGroup;
use crate::utils::error::{MobilityError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub dataset: DatasetConfig,
    pub filters: Option<FiltersConfig>,
    pub load: LoadConfig,
    pub dashboard: Option<DashboardConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub mobility_file: String,
    pub cost_file: String,
    pub mobility_url: Option<String>,
    pub cost_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub min_q1_share: Option<f64>,
    pub level: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MobilityError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MobilityError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Substitute environment variables (e.g. ${MOBILITY_DATA_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // Unresolved variables are left intact so the TOML error points at them
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Sanity-check the configuration values
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("dataset.mobility_file", &self.dataset.mobility_file)?;
        validation::validate_path("dataset.cost_file", &self.dataset.cost_file)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_extensions(
            "dataset.mobility_file",
            std::slice::from_ref(&self.dataset.mobility_file),
            &["csv"],
        )?;
        validation::validate_file_extensions(
            "dataset.cost_file",
            std::slice::from_ref(&self.dataset.cost_file),
            &["csv"],
        )?;

        if let Some(url) = &self.dataset.mobility_url {
            validation::validate_url("dataset.mobility_url", url)?;
        }
        if let Some(url) = &self.dataset.cost_url {
            validation::validate_url("dataset.cost_url", url)?;
        }

        if let Some(filters) = &self.filters {
            if let Some(share) = filters.min_q1_share {
                validation::validate_range("filters.min_q1_share", share, 0.0, 50.0)?;
            }
            if let Some(level) = &filters.level {
                level.parse::<Level>()?;
            }
            if let Some(group) = &filters.group {
                group.parse::<TierGroup>()?;
            }
        }

        let valid_formats = ["csv", "json"];
        for format in &self.load.output_formats {
            if !valid_formats.contains(&format.as_str()) {
                return Err(MobilityError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        if let Some(compression) = &self.load.compression {
            if let Some(filename) = &compression.filename {
                validation::validate_non_empty_string("load.compression.filename", filename)?;
            }
        }

        Ok(())
    }

    /// Access-share threshold used when the filters table omits one
    pub fn min_q1_share(&self) -> f64 {
        self.filters
            .as_ref()
            .and_then(|f| f.min_q1_share)
            .unwrap_or(5.0)
    }

    pub fn dashboard_host(&self) -> &str {
        self.dashboard
            .as_ref()
            .and_then(|d| d.host.as_deref())
            .unwrap_or("127.0.0.1")
    }

    pub fn dashboard_port(&self) -> u16 {
        self.dashboard.as_ref().and_then(|d| d.port).unwrap_or(8501)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl RunConfig for AppConfig {
    fn mobility_file(&self) -> &str {
        &self.dataset.mobility_file
    }

    fn cost_file(&self) -> &str {
        &self.dataset.cost_file
    }

    fn mobility_url(&self) -> Option<&str> {
        self.dataset.mobility_url.as_deref()
    }

    fn cost_url(&self) -> Option<&str> {
        self.dataset.cost_url.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn selection(&self) -> Result<Selection> {
        let Some(filters) = &self.filters else {
            return Ok(Selection::default());
        };
        let level = filters.level.as_deref().map(Level::from_str).transpose()?;
        let group = filters
            .group
            .as_deref()
            .map(TierGroup::from_str)
            .transpose()?;
        Ok(Selection {
            level,
            group,
            min_q1_share: filters.min_q1_share,
        })
    }

    fn compress_output(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    fn archive_filename(&self) -> &str {
        self.load
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
            .unwrap_or("mobility_report.zip")
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

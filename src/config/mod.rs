pub mod cli;
pub mod toml_config;

use crate::core::RunConfig;
use crate::domain::model::{Level, Selection};
use crate::domain::tiers::TierGroup;
use crate::utils::error::{MobilityError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "college-mobility")]
#[command(about = "Analyzes economic mobility and affordability across US colleges")]
pub struct CliConfig {
    #[arg(long, default_value = "data/mrc_table2.csv")]
    pub mobility_file: String,

    #[arg(long, default_value = "data/mrc_table10.csv")]
    pub cost_file: String,

    /// Download source used when the mobility file is missing
    #[arg(long)]
    pub mobility_url: Option<String>,

    /// Download source used when the cost file is missing
    #[arg(long)]
    pub cost_url: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub formats: Vec<String>,

    /// Keep only institutions at this level (four-year or two-year)
    #[arg(long)]
    pub level: Option<String>,

    /// Keep only institutions in this group (e.g. Elite, Selective)
    #[arg(long)]
    pub group: Option<String>,

    /// Minimum percentage of students from the bottom parent-income quintile
    #[arg(long, default_value = "5.0")]
    pub min_q1_share: f64,

    /// Bundle the report files into a single zip archive
    #[arg(long)]
    pub archive: bool,

    /// Archive filename, {timestamp} expands to the current time
    #[arg(long, default_value = "mobility_report.zip")]
    pub archive_name: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl RunConfig for CliConfig {
    fn mobility_file(&self) -> &str {
        &self.mobility_file
    }

    fn cost_file(&self) -> &str {
        &self.cost_file
    }

    fn mobility_url(&self) -> Option<&str> {
        self.mobility_url.as_deref()
    }

    fn cost_url(&self) -> Option<&str> {
        self.cost_url.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn selection(&self) -> Result<Selection> {
        let level = self.level.as_deref().map(Level::from_str).transpose()?;
        let group = self.group.as_deref().map(TierGroup::from_str).transpose()?;
        Ok(Selection {
            level,
            group,
            min_q1_share: Some(self.min_q1_share),
        })
    }

    fn compress_output(&self) -> bool {
        self.archive
    }

    fn archive_filename(&self) -> &str {
        &self.archive_name
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("mobility_file", &self.mobility_file)?;
        validation::validate_path("cost_file", &self.cost_file)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extensions(
            "mobility_file",
            std::slice::from_ref(&self.mobility_file),
            &["csv"],
        )?;
        validation::validate_file_extensions(
            "cost_file",
            std::slice::from_ref(&self.cost_file),
            &["csv"],
        )?;

        if let Some(url) = &self.mobility_url {
            validation::validate_url("mobility_url", url)?;
        }
        if let Some(url) = &self.cost_url {
            validation::validate_url("cost_url", url)?;
        }

        validation::validate_range("min_q1_share", self.min_q1_share, 0.0, 50.0)?;

        for format in &self.formats {
            if format != "csv" && format != "json" {
                return Err(MobilityError::InvalidConfigValueError {
                    field: "formats".to_string(),
                    value: format.clone(),
                    reason: "Supported formats are: csv, json".to_string(),
                });
            }
        }

        if let Some(level) = &self.level {
            level.parse::<Level>()?;
        }
        if let Some(group) = &self.group {
            group.parse::<TierGroup>()?;
        }

        validation::validate_non_empty_string("archive_name", &self.archive_name)?;
        Ok(())
    }
}

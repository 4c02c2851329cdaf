use crate::analysis::{affordability, ladder, quadrants};
use crate::core::dataset;
use crate::core::{AnalysisReport, Institution, Pipeline, RunConfig, SourceTables, Storage};
use crate::domain::model::{LadderDistribution, RankedInstitution};
use crate::utils::error::{MobilityError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub struct MobilityPipeline<S: Storage, C: RunConfig> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: RunConfig> MobilityPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    /// Reads a dataset from storage, falling back to a download when the
    /// file is missing and a source URL is configured. Downloads are written
    /// back to storage so later runs hit the local copy.
    async fn fetch_dataset(&self, label: &str, file: &str, url: Option<&str>) -> Result<Vec<u8>> {
        match self.storage.read_file(file).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes of {} data from {}", data.len(), label, file);
                Ok(data)
            }
            Err(read_error) => {
                let Some(url) = url else {
                    return Err(read_error);
                };

                tracing::warn!(
                    "⚠️ {} dataset not found at {} ({}), downloading from {}",
                    label,
                    file,
                    read_error,
                    url
                );
                let response = self.client.get(url).send().await?.error_for_status()?;
                tracing::debug!("Download response status: {}", response.status());

                let data = response.bytes().await?;
                self.storage.write_file(file, &data).await?;
                tracing::info!("📥 Downloaded {} data to {} ({} bytes)", label, file, data.len());
                Ok(data.to_vec())
            }
        }
    }
}

#[derive(serde::Serialize)]
struct InstitutionRecord<'a> {
    super_opeid: i64,
    name: &'a str,
    level: &'static str,
    tier: u8,
    tier_name: &'static str,
    group: &'static str,
    subgroup: &'static str,
    count: Option<f64>,
    par_q1: Option<f64>,
    kq1_cond_parq1: Option<f64>,
    kq2_cond_parq1: Option<f64>,
    kq3_cond_parq1: Option<f64>,
    kq4_cond_parq1: Option<f64>,
    kq5_cond_parq1: Option<f64>,
    k_married: Option<f64>,
    sticker_price_2013: Option<f64>,
    scorecard_netprice_2013: Option<f64>,
    mobility_rate: Option<f64>,
}

impl<'a> From<&'a Institution> for InstitutionRecord<'a> {
    fn from(institution: &'a Institution) -> Self {
        Self {
            super_opeid: institution.super_opeid,
            name: &institution.name,
            level: institution.level.name(),
            tier: institution.tier.code(),
            tier_name: institution.tier.name(),
            group: institution.group().name(),
            subgroup: institution.subgroup(),
            count: institution.cohort_count,
            par_q1: institution.par_q1,
            kq1_cond_parq1: institution.kq1_cond_parq1,
            kq2_cond_parq1: institution.kq2_cond_parq1,
            kq3_cond_parq1: institution.kq3_cond_parq1,
            kq4_cond_parq1: institution.kq4_cond_parq1,
            kq5_cond_parq1: institution.kq5_cond_parq1,
            k_married: institution.k_married,
            sticker_price_2013: institution.sticker_price_2013,
            scorecard_netprice_2013: institution.scorecard_netprice_2013,
            mobility_rate: institution.mobility_rate(),
        }
    }
}

#[derive(serde::Serialize)]
struct LadderOutput<'a> {
    selection: &'a LadderDistribution,
    baseline: &'a LadderDistribution,
}

fn write_csv<T: serde::Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| MobilityError::ProcessingError {
            message: format!("CSV writer error: {}", e),
        })
}

fn institutions_csv(institutions: &[Institution]) -> Result<Vec<u8>> {
    write_csv(institutions.iter().map(InstitutionRecord::from))
}

fn rankings_csv(rankings: &[RankedInstitution]) -> Result<Vec<u8>> {
    write_csv(rankings.iter())
}

#[async_trait::async_trait]
impl<S: Storage, C: RunConfig> Pipeline for MobilityPipeline<S, C> {
    async fn extract(&self) -> Result<SourceTables> {
        let mobility_data = self
            .fetch_dataset(
                "mobility",
                self.config.mobility_file(),
                self.config.mobility_url(),
            )
            .await?;
        let cost_data = self
            .fetch_dataset("cost", self.config.cost_file(), self.config.cost_url())
            .await?;

        let mobility = dataset::parse_mobility_csv(&mobility_data)?;
        let cost = dataset::parse_cost_csv(&cost_data)?;
        tracing::debug!(
            "Parsed {} mobility rows and {} cost rows",
            mobility.len(),
            cost.len()
        );

        Ok(SourceTables { mobility, cost })
    }

    async fn transform(&self, tables: SourceTables) -> Result<AnalysisReport> {
        if tables.mobility.is_empty() {
            return Err(MobilityError::DataFormatError {
                file: self.config.mobility_file().to_string(),
                message: "mobility table contains no data rows".to_string(),
            });
        }

        let selection = self.config.selection()?;
        let (all, merge) = dataset::merge_datasets(tables)?;

        // The baseline keeps the level and access-share filters but spans
        // every group, so group views compare against the full population.
        let baseline = selection.without_group().filter(&all);
        let selected = selection.filter(&all);
        tracing::debug!(
            "{} of {} merged institutions match the selection",
            selected.len(),
            all.len()
        );

        let summary = affordability::summary_stats(&selected);
        let ladder = ladder::ladder_distribution(&selection.group_label(), &selected);
        let baseline_ladder = ladder::ladder_distribution("All", &baseline);
        let scatter = affordability::scatter(&selected, &baseline);
        let quadrants = quadrants::quadrant_report(&baseline);
        let rankings = affordability::rank_institutions(&selected);

        Ok(AnalysisReport {
            selection,
            merge,
            institutions: selected,
            summary,
            ladder,
            baseline_ladder,
            scatter,
            quadrants,
            rankings,
        })
    }

    async fn load(&self, report: AnalysisReport) -> Result<String> {
        let mut files: Vec<(&'static str, Vec<u8>)> = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    files.push(("institutions.csv", institutions_csv(&report.institutions)?));
                    files.push(("rankings.csv", rankings_csv(&report.rankings)?));
                }
                "json" => {
                    files.push((
                        "summary.json",
                        serde_json::to_vec_pretty(&report.summary)?,
                    ));
                    files.push((
                        "ladder.json",
                        serde_json::to_vec_pretty(&LadderOutput {
                            selection: &report.ladder,
                            baseline: &report.baseline_ladder,
                        })?,
                    ));
                    files.push((
                        "quadrants.json",
                        serde_json::to_vec_pretty(&report.quadrants)?,
                    ));
                    files.push((
                        "scatter.json",
                        serde_json::to_vec_pretty(&report.scatter)?,
                    ));
                }
                _ => {
                    tracing::warn!("🔶 Unsupported output format: {}", format);
                }
            }
        }

        let mut metadata = HashMap::new();
        metadata.insert(
            "tool".to_string(),
            serde_json::Value::String(env!("CARGO_PKG_NAME").to_string()),
        );
        metadata.insert(
            "version".to_string(),
            serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
        );
        metadata.insert(
            "generated_at".to_string(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
        metadata.insert("selection".to_string(), serde_json::to_value(&report.selection)?);
        metadata.insert("merge".to_string(), serde_json::to_value(report.merge)?);
        metadata.insert(
            "institutions".to_string(),
            serde_json::Value::from(report.institutions.len()),
        );
        files.push(("metadata.json", serde_json::to_vec_pretty(&metadata)?));

        let output_path = self.config.output_path();
        if self.config.compress_output() {
            let filename = self.config.archive_filename().replace(
                "{timestamp}",
                &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            );
            tracing::debug!("Creating ZIP archive {} with {} files", filename, files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let archive_path = format!("{}/{}", output_path, filename);
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_path, &zip_data).await?;
            Ok(archive_path)
        } else {
            for (name, data) in &files {
                let file_path = format!("{}/{}", output_path, name);
                tracing::debug!("Writing {} ({} bytes)", file_path, data.len());
                self.storage.write_file(&file_path, data).await?;
            }
            Ok(output_path.to_string())
        }
    }
}

use anyhow::Result;
use college_mobility::{AnalysisEngine, CliConfig, LocalStorage, MobilityPipeline};
use httpmock::prelude::*;
use tempfile::TempDir;

const MOBILITY_CSV: &str = "\
super_opeid,name,iclevel,tier,count,par_q1,kq1_cond_parq1,kq2_cond_parq1,kq3_cond_parq1,kq4_cond_parq1,kq5_cond_parq1,k_married
1,Alpha College,1,1,1000,0.1,0.3,0.2,0.15,0.2,0.1,0.4
2,Beta University,1,5,1100,0.2,0.3,0.2,0.15,0.3,0.15,0.4
";

const COST_CSV: &str = "\
super_opeid,iclevel,sticker_price_2013,scorecard_netprice_2013
1,1,50000,30000
2,1,35000,22000
";

fn config_with_urls(server: &MockServer) -> CliConfig {
    CliConfig {
        mobility_file: "data/mrc_table2.csv".to_string(),
        cost_file: "data/mrc_table10.csv".to_string(),
        mobility_url: Some(server.url("/mrc_table2.csv")),
        cost_url: Some(server.url("/mrc_table10.csv")),
        output_path: "output".to_string(),
        formats: vec!["json".to_string()],
        level: None,
        group: None,
        min_q1_share: 5.0,
        archive: false,
        archive_name: "mobility_report.zip".to_string(),
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_missing_datasets_are_downloaded_and_cached() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let server = MockServer::start();
    let mobility_mock = server.mock(|when, then| {
        when.method(GET).path("/mrc_table2.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(MOBILITY_CSV);
    });
    let cost_mock = server.mock(|when, then| {
        when.method(GET).path("/mrc_table10.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(COST_CSV);
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let pipeline = MobilityPipeline::new(storage, config_with_urls(&server));
    let engine = AnalysisEngine::new(pipeline);

    engine.run().await?;
    mobility_mock.assert();
    cost_mock.assert();

    // Downloads are cached back to the local dataset paths
    let cached_mobility = temp_dir.path().join("data").join("mrc_table2.csv");
    let cached_cost = temp_dir.path().join("data").join("mrc_table10.csv");
    assert_eq!(std::fs::read_to_string(cached_mobility)?, MOBILITY_CSV);
    assert_eq!(std::fs::read_to_string(cached_cost)?, COST_CSV);

    assert!(temp_dir.path().join("output").join("summary.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_local_files_win_over_download() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("data");
    std::fs::create_dir_all(&data_dir)?;
    std::fs::write(data_dir.join("mrc_table2.csv"), MOBILITY_CSV)?;
    std::fs::write(data_dir.join("mrc_table10.csv"), COST_CSV)?;

    let server = MockServer::start();
    let mobility_mock = server.mock(|when, then| {
        when.method(GET).path("/mrc_table2.csv");
        then.status(200).body(MOBILITY_CSV);
    });
    let cost_mock = server.mock(|when, then| {
        when.method(GET).path("/mrc_table10.csv");
        then.status(200).body(COST_CSV);
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let pipeline = MobilityPipeline::new(storage, config_with_urls(&server));
    let engine = AnalysisEngine::new(pipeline);

    engine.run().await?;
    mobility_mock.assert_hits(0);
    cost_mock.assert_hits(0);

    Ok(())
}

#[tokio::test]
async fn test_download_failure_maps_to_network_error() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let mobility_mock = server.mock(|when, then| {
        when.method(GET).path("/mrc_table2.csv");
        then.status(404);
    });

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let pipeline = MobilityPipeline::new(storage, config_with_urls(&server));
    let engine = AnalysisEngine::new(pipeline);

    let error = engine.run().await.unwrap_err();
    mobility_mock.assert();

    assert!(matches!(
        error,
        college_mobility::MobilityError::HttpError(_)
    ));
    assert_eq!(
        error.severity(),
        college_mobility::utils::error::ErrorSeverity::Medium
    );
}

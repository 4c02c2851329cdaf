use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use college_mobility::dashboard::{configure, DashboardState};
use college_mobility::domain::model::{
    AffordabilityScatter, Institution, LadderComparison, LadderDistribution, Level, MergeStats,
    QuadrantReport,
};
use college_mobility::domain::tiers::Tier;

fn institution(
    super_opeid: i64,
    name: &str,
    level: Level,
    tier: Tier,
    par_q1: f64,
    kq4: f64,
    kq5: f64,
    price: f64,
) -> Institution {
    Institution {
        super_opeid,
        name: name.to_string(),
        level,
        tier,
        cohort_count: Some(1000.0),
        par_q1: Some(par_q1),
        kq1_cond_parq1: Some(0.3),
        kq2_cond_parq1: Some(0.2),
        kq3_cond_parq1: Some(0.15),
        kq4_cond_parq1: Some(kq4),
        kq5_cond_parq1: Some(kq5),
        k_married: Some(0.4),
        sticker_price_2013: Some(price),
        scorecard_netprice_2013: Some(price * 0.6),
    }
}

fn sample_state() -> DashboardState {
    let institutions = vec![
        institution(
            1,
            "Alpha College",
            Level::FourYear,
            Tier::IvyPlus,
            0.10,
            0.25,
            0.20,
            48000.0,
        ),
        institution(
            2,
            "Beta University",
            Level::FourYear,
            Tier::OtherElite,
            0.03,
            0.20,
            0.15,
            45000.0,
        ),
        institution(
            3,
            "Gamma Community College",
            Level::TwoYear,
            Tier::TwoYear,
            0.30,
            0.10,
            0.05,
            8000.0,
        ),
        institution(
            4,
            "Delta State",
            Level::FourYear,
            Tier::SelectivePublic,
            0.12,
            0.15,
            0.08,
            20000.0,
        ),
    ];

    DashboardState {
        institutions,
        merge: MergeStats {
            mobility_rows: 4,
            cost_rows: 4,
            merged: 4,
            ..Default::default()
        },
        default_min_q1_share: 5.0,
    }
}

macro_rules! dashboard_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(sample_state()))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_index_serves_html() {
    let app = dashboard_app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("US College Mobility Dashboard"));
    assert!(html.contains("/api/ladder"));
}

#[actix_web::test]
async fn test_health_reports_counts() {
    let app = dashboard_app!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let health: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(health["service"], "college-mobility");
    assert_eq!(health["institutions"], 4);
    assert_eq!(health["merge"]["merged"], 4);
}

#[actix_web::test]
async fn test_tiers_lists_full_taxonomy() {
    let app = dashboard_app!();

    let req = test::TestRequest::get().uri("/api/tiers").to_request();
    let tiers: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let tiers = tiers.as_array().unwrap();
    assert_eq!(tiers.len(), 10);
    assert_eq!(tiers[0]["code"], 1);
    assert_eq!(tiers[0]["name"], "Ivy Plus");
    assert_eq!(tiers[8]["name"], "Two-year (public and private)");
    assert_eq!(tiers[8]["group"], "Two-year");
    assert_eq!(tiers[9]["name"], "Four-year for-profit");
}

#[actix_web::test]
async fn test_summary_applies_default_share_threshold() {
    let app = dashboard_app!();

    // Beta University (3%) falls below the default 5% threshold
    let req = test::TestRequest::get().uri("/api/summary").to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["stats"]["institutions"], 3);
    assert_eq!(summary["selection"]["min_q1_share"], 5.0);

    let req = test::TestRequest::get()
        .uri("/api/summary?min_q1_share=0")
        .to_request();
    let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["stats"]["institutions"], 4);
}

#[actix_web::test]
async fn test_summary_rejects_bad_filters() {
    let app = dashboard_app!();

    let req = test::TestRequest::get()
        .uri("/api/summary?group=Unknown")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/summary?min_q1_share=75")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_ladder_defaults_to_whole_population() {
    let app = dashboard_app!();

    // The ladder view applies no access-share threshold by default
    let req = test::TestRequest::get().uri("/api/ladder").to_request();
    let ladder: LadderDistribution = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ladder.label, "All");
    assert_eq!(ladder.institutions, 4);
    assert_eq!(ladder.steps.len(), 5);
    assert_eq!(ladder.steps[4].description, "Move to Top Quintile");
    assert_eq!(ladder.steps[4].income_range, "Top 20%");
}

#[actix_web::test]
async fn test_ladder_selects_by_tier_name() {
    let app = dashboard_app!();

    let req = test::TestRequest::get()
        .uri("/api/ladder?tier=Ivy%20Plus")
        .to_request();
    let ladder: LadderDistribution = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ladder.label, "Ivy Plus");
    assert_eq!(ladder.institutions, 1);

    let req = test::TestRequest::get()
        .uri("/api/ladder?tier=Community%20college")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_compare_builds_both_series() {
    let app = dashboard_app!();

    let req = test::TestRequest::get()
        .uri("/api/compare?a=Ivy%20Plus&b=Selective%20public")
        .to_request();
    let comparison: LadderComparison = test::call_and_read_body_json(&app, req).await;

    assert_eq!(comparison.series.len(), 2);
    assert_eq!(comparison.series[0].label, "Ivy Plus");
    assert_eq!(comparison.series[0].institutions, 1);
    assert_eq!(comparison.series[1].label, "Selective public");
    // Top-down cumulative shares end pinned at 1 for non-empty cohorts
    assert_eq!(comparison.series[0].cumulative[4], Some(1.0));

    let req = test::TestRequest::get()
        .uri("/api/compare?a=Ivy%20Plus&b=Hogwarts")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Both cohorts are required
    let req = test::TestRequest::get()
        .uri("/api/compare?a=Ivy%20Plus")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_affordability_scopes_points_but_not_medians() {
    let app = dashboard_app!();

    let req = test::TestRequest::get()
        .uri("/api/affordability?group=Elite")
        .to_request();
    let scatter: AffordabilityScatter = test::call_and_read_body_json(&app, req).await;

    // Only Alpha is Elite and above the default share threshold
    assert_eq!(scatter.points.len(), 1);
    assert_eq!(scatter.points[0].name, "Alpha College");
    // Medians span every group passing the share threshold:
    // Alpha, Gamma and Delta
    assert_eq!(scatter.median_price, Some(20000.0));
    assert_eq!(scatter.median_mobility, Some(0.23));
}

#[actix_web::test]
async fn test_quadrants_span_every_group() {
    let app = dashboard_app!();

    let req = test::TestRequest::get()
        .uri("/api/quadrants?group=Elite")
        .to_request();
    let report: QuadrantReport = test::call_and_read_body_json(&app, req).await;

    assert_eq!(report.median_price, Some(20000.0));
    // Delta State sits exactly on both of its own median lines
    assert_eq!(report.classified, 2);
    assert_eq!(report.buckets.len(), 4);
    // Alpha: high mobility, high cost. Gamma: low mobility, low cost.
    assert_eq!(report.buckets[1].count, 1);
    assert_eq!(report.buckets[1].institutions[0].name, "Alpha College");
    assert_eq!(report.buckets[2].count, 1);
    assert_eq!(
        report.buckets[2].institutions[0].name,
        "Gamma Community College"
    );
}

#[actix_web::test]
async fn test_institutions_ranking_and_limit() {
    let app = dashboard_app!();

    let req = test::TestRequest::get()
        .uri("/api/institutions?min_q1_share=0&limit=2")
        .to_request();
    let listing: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listing["total"], 4);
    let rows = listing["institutions"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Alpha College");
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[1]["name"], "Beta University");

    let req = test::TestRequest::get()
        .uri("/api/institutions?limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

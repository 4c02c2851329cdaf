//! HTTP dashboard serving the merged mobility data as JSON views.

use crate::analysis::affordability::{rank_institutions, scatter, summary_stats};
use crate::analysis::ladder::{compare, ladder_distribution};
use crate::analysis::quadrants::quadrant_report;
use crate::domain::model::{Institution, Level, MergeStats, Selection, SummaryStats};
use crate::domain::tiers::{Tier, TierGroup};
use crate::utils::error::Result;
use crate::utils::validation;
use actix_cors::Cors;
use actix_web::{dev::Server, get, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>US College Mobility Dashboard</title></head>
<body>
<h1>US College Mobility Dashboard</h1>
<p>Economic mobility and affordability across US colleges, built from the
mobility report card preferred estimates and cost tables.</p>
<ul>
<li><code>GET /api/health</code></li>
<li><code>GET /api/tiers</code></li>
<li><code>GET /api/summary?level=&amp;group=&amp;min_q1_share=</code></li>
<li><code>GET /api/ladder?tier=</code></li>
<li><code>GET /api/compare?a=&amp;b=</code></li>
<li><code>GET /api/affordability?level=&amp;group=&amp;min_q1_share=</code></li>
<li><code>GET /api/quadrants?level=&amp;min_q1_share=</code></li>
<li><code>GET /api/institutions?level=&amp;group=&amp;min_q1_share=&amp;limit=</code></li>
</ul>
</body>
</html>
"#;

pub struct DashboardState {
    pub institutions: Vec<Institution>,
    pub merge: MergeStats,
    /// Access-share threshold the affordability views fall back to when the
    /// request does not pass one. The mobility ladder views default to no
    /// threshold instead, so they describe the entire population.
    pub default_min_q1_share: f64,
}

fn build_selection(
    level: Option<&str>,
    group: Option<&str>,
    min_q1_share: Option<f64>,
    default_share: Option<f64>,
) -> Result<Selection> {
    let level = level.map(Level::from_str).transpose()?;
    let group = group.map(TierGroup::from_str).transpose()?;
    let min_q1_share = min_q1_share.or(default_share);
    if let Some(share) = min_q1_share {
        validation::validate_range("min_q1_share", share, 0.0, 50.0)?;
    }
    Ok(Selection {
        level,
        group,
        min_q1_share,
    })
}

/// Resolves a tier label into its cohort. `None` and "All" mean every
/// institution; anything else must be a known tier name or code.
fn resolve_cohort(
    institutions: &[Institution],
    label: Option<&str>,
) -> Result<(String, Vec<Institution>)> {
    match label {
        None => Ok(("All".to_string(), institutions.to_vec())),
        Some(raw) if raw.trim().eq_ignore_ascii_case("all") => {
            Ok(("All".to_string(), institutions.to_vec()))
        }
        Some(raw) => {
            let tier = raw.parse::<Tier>()?;
            let cohort = institutions
                .iter()
                .filter(|institution| institution.tier == tier)
                .cloned()
                .collect();
            Ok((tier.name().to_string(), cohort))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectionQuery {
    level: Option<String>,
    group: Option<String>,
    min_q1_share: Option<f64>,
}

impl SelectionQuery {
    fn selection(&self, default_share: Option<f64>) -> Result<Selection> {
        build_selection(
            self.level.as_deref(),
            self.group.as_deref(),
            self.min_q1_share,
            default_share,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct LadderQuery {
    tier: Option<String>,
    min_q1_share: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    a: String,
    b: String,
    min_q1_share: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct InstitutionsQuery {
    level: Option<String>,
    group: Option<String>,
    min_q1_share: Option<f64>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    service: &'static str,
    version: &'static str,
    institutions: usize,
    merge: MergeStats,
}

#[derive(Serialize)]
struct TierInfo {
    code: u8,
    name: &'static str,
    group: &'static str,
    subgroup: &'static str,
}

#[derive(Serialize)]
struct SummaryResponse {
    selection: Selection,
    stats: SummaryStats,
}

#[derive(Serialize)]
struct InstitutionsResponse {
    selection: Selection,
    total: usize,
    institutions: Vec<crate::domain::model::RankedInstitution>,
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/health")]
async fn health(data: web::Data<DashboardState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        institutions: data.institutions.len(),
        merge: data.merge,
    })
}

#[get("/tiers")]
async fn tiers() -> impl Responder {
    let taxonomy: Vec<TierInfo> = Tier::ALL
        .iter()
        .map(|tier| TierInfo {
            code: tier.code(),
            name: tier.name(),
            group: tier.group().name(),
            subgroup: tier.subgroup(),
        })
        .collect();
    HttpResponse::Ok().json(taxonomy)
}

#[get("/summary")]
async fn summary(
    data: web::Data<DashboardState>,
    query: web::Query<SelectionQuery>,
) -> impl Responder {
    let selection = match query.selection(Some(data.default_min_q1_share)) {
        Ok(selection) => selection,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let selected = selection.filter(&data.institutions);
    HttpResponse::Ok().json(SummaryResponse {
        stats: summary_stats(&selected),
        selection,
    })
}

#[get("/ladder")]
async fn mobility_ladder(
    data: web::Data<DashboardState>,
    query: web::Query<LadderQuery>,
) -> impl Responder {
    let share_filter = match build_selection(None, None, query.min_q1_share, None) {
        Ok(selection) => selection,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let (label, cohort) = match resolve_cohort(&data.institutions, query.tier.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let cohort = share_filter.filter(&cohort);
    HttpResponse::Ok().json(ladder_distribution(&label, &cohort))
}

#[get("/compare")]
async fn compare_ladders(
    data: web::Data<DashboardState>,
    query: web::Query<CompareQuery>,
) -> impl Responder {
    let share_filter = match build_selection(None, None, query.min_q1_share, None) {
        Ok(selection) => selection,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let (label_a, cohort_a) = match resolve_cohort(&data.institutions, Some(&query.a)) {
        Ok(resolved) => resolved,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let (label_b, cohort_b) = match resolve_cohort(&data.institutions, Some(&query.b)) {
        Ok(resolved) => resolved,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let cohort_a = share_filter.filter(&cohort_a);
    let cohort_b = share_filter.filter(&cohort_b);
    HttpResponse::Ok().json(compare(&label_a, &cohort_a, &label_b, &cohort_b))
}

#[get("/affordability")]
async fn affordability(
    data: web::Data<DashboardState>,
    query: web::Query<SelectionQuery>,
) -> impl Responder {
    let selection = match query.selection(Some(data.default_min_q1_share)) {
        Ok(selection) => selection,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let selected = selection.filter(&data.institutions);
    let reference = selection.without_group().filter(&data.institutions);
    HttpResponse::Ok().json(scatter(&selected, &reference))
}

#[get("/quadrants")]
async fn quadrants(
    data: web::Data<DashboardState>,
    query: web::Query<SelectionQuery>,
) -> impl Responder {
    let selection = match query.selection(Some(data.default_min_q1_share)) {
        Ok(selection) => selection,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    // Quadrant membership always spans every group, so the median lines
    // describe the whole population an institution competes in.
    let population = selection.without_group().filter(&data.institutions);
    HttpResponse::Ok().json(quadrant_report(&population))
}

#[get("/institutions")]
async fn list_institutions(
    data: web::Data<DashboardState>,
    query: web::Query<InstitutionsQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(10);
    if let Err(e) = validation::validate_positive_number("limit", limit, 1) {
        return HttpResponse::BadRequest().body(e.to_string());
    }
    let selection = match build_selection(
        query.level.as_deref(),
        query.group.as_deref(),
        query.min_q1_share,
        Some(data.default_min_q1_share),
    ) {
        Ok(selection) => selection,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };

    let selected = selection.filter(&data.institutions);
    let mut rankings = rank_institutions(&selected);
    rankings.truncate(limit);

    HttpResponse::Ok().json(InstitutionsResponse {
        selection,
        total: selected.len(),
        institutions: rankings,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(
        web::scope("/api")
            .service(health)
            .service(tiers)
            .service(summary)
            .service(mobility_ladder)
            .service(compare_ladders)
            .service(affordability)
            .service(quadrants)
            .service(list_institutions),
    );
}

pub fn start_server(state: DashboardState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

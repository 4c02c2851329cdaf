use crate::domain::model::{CostRow, Institution, Level, MergeStats, MobilityRow, SourceTables};
use crate::domain::tiers::Tier;
use crate::utils::error::Result;
use std::collections::HashMap;

pub fn parse_mobility_csv(data: &[u8]) -> Result<Vec<MobilityRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn parse_cost_csv(data: &[u8]) -> Result<Vec<CostRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Inner-joins the mobility and cost tables on (super_opeid, level).
/// Rows outside the two/four-year levels or with an unknown tier code are
/// dropped and counted in the stats.
pub fn merge_datasets(tables: SourceTables) -> Result<(Vec<Institution>, MergeStats)> {
    let SourceTables { mobility, cost } = tables;
    let mut stats = MergeStats {
        mobility_rows: mobility.len(),
        cost_rows: cost.len(),
        ..MergeStats::default()
    };

    let mut cost_by_key: HashMap<(i64, Level), &CostRow> = HashMap::new();
    for row in &cost {
        if let Some(level) = Level::from_raw(row.iclevel) {
            cost_by_key.insert((row.super_opeid, level), row);
        }
    }

    let mut institutions = Vec::with_capacity(mobility.len());
    for row in mobility {
        let Some(level) = Level::from_raw(row.iclevel) else {
            stats.skipped_level += 1;
            continue;
        };
        let Some(tier) = Tier::from_code(row.tier) else {
            stats.skipped_tier += 1;
            tracing::warn!(
                "⚠️ Skipping '{}' (super_opeid {}): unknown tier code {}",
                row.name,
                row.super_opeid,
                row.tier
            );
            continue;
        };
        let Some(cost_row) = cost_by_key.get(&(row.super_opeid, level)) else {
            stats.unmatched += 1;
            continue;
        };

        institutions.push(Institution {
            super_opeid: row.super_opeid,
            name: row.name,
            level,
            tier,
            cohort_count: row.count,
            par_q1: row.par_q1,
            kq1_cond_parq1: row.kq1_cond_parq1,
            kq2_cond_parq1: row.kq2_cond_parq1,
            kq3_cond_parq1: row.kq3_cond_parq1,
            kq4_cond_parq1: row.kq4_cond_parq1,
            kq5_cond_parq1: row.kq5_cond_parq1,
            k_married: row.k_married,
            sticker_price_2013: cost_row.sticker_price_2013,
            scorecard_netprice_2013: cost_row.scorecard_netprice_2013,
        });
    }

    stats.merged = institutions.len();
    tracing::info!(
        "🔗 Merged {} institutions from {} mobility and {} cost rows ({} unmatched, {} outside two/four-year levels, {} with unknown tiers)",
        stats.merged,
        stats.mobility_rows,
        stats.cost_rows,
        stats.unmatched,
        stats.skipped_level,
        stats.skipped_tier
    );

    Ok((institutions, stats))
}

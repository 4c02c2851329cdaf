use crate::analysis::stats;
use crate::domain::model::{
    AffordabilityScatter, Institution, RankedInstitution, ScatterPoint, SummaryStats,
};
use std::cmp::Ordering;

/// Headline statistics for a set of institutions. Each statistic ignores
/// institutions missing that particular field.
pub fn summary_stats(institutions: &[Institution]) -> SummaryStats {
    SummaryStats {
        institutions: institutions.len(),
        avg_cohort_size: stats::mean(
            institutions
                .iter()
                .filter_map(|institution| institution.cohort_count),
        ),
        median_mobility_rate: stats::median(
            institutions
                .iter()
                .filter_map(|institution| institution.mobility_rate()),
        ),
        avg_q1_share: stats::mean(
            institutions
                .iter()
                .filter_map(|institution| institution.par_q1),
        ),
        median_sticker_price: stats::median(
            institutions
                .iter()
                .filter_map(|institution| institution.sticker_price_2013),
        ),
        mean_sticker_price: stats::mean(
            institutions
                .iter()
                .filter_map(|institution| institution.sticker_price_2013),
        ),
        avg_married_share: stats::mean(
            institutions
                .iter()
                .filter_map(|institution| institution.k_married),
        ),
        price_mobility_correlation: stats::pearson(institutions.iter().filter_map(
            |institution| {
                Some((
                    institution.sticker_price_2013?,
                    institution.mobility_rate()?,
                ))
            },
        )),
    }
}

/// Price/mobility scatter for the selected institutions. Median reference
/// lines come from `reference`, which is the selection with the group filter
/// lifted, so a group is always positioned against the full population.
pub fn scatter(selected: &[Institution], reference: &[Institution]) -> AffordabilityScatter {
    let points = selected
        .iter()
        .filter_map(|institution| {
            Some(ScatterPoint {
                super_opeid: institution.super_opeid,
                name: institution.name.clone(),
                subgroup: institution.subgroup().to_string(),
                sticker_price_2013: institution.sticker_price_2013?,
                mobility_rate: institution.mobility_rate()?,
                par_q1: institution.par_q1,
            })
        })
        .collect();

    AffordabilityScatter {
        points,
        median_price: stats::median(
            reference
                .iter()
                .filter_map(|institution| institution.sticker_price_2013),
        ),
        median_mobility: stats::median(
            reference
                .iter()
                .filter_map(|institution| institution.mobility_rate()),
        ),
    }
}

/// Institutions ordered by mobility rate, best first. Ties break on name so
/// the ranking is stable; institutions without a mobility rate sort last.
pub fn rank_institutions(institutions: &[Institution]) -> Vec<RankedInstitution> {
    let mut ordered: Vec<&Institution> = institutions.iter().collect();
    ordered.sort_by(|a, b| match (a.mobility_rate(), b.mobility_rate()) {
        (Some(rate_a), Some(rate_b)) => rate_b
            .total_cmp(&rate_a)
            .then_with(|| a.name.cmp(&b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.cmp(&b.name),
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, institution)| RankedInstitution {
            rank: index + 1,
            super_opeid: institution.super_opeid,
            name: institution.name.clone(),
            subgroup: institution.subgroup().to_string(),
            sticker_price_2013: institution.sticker_price_2013,
            scorecard_netprice_2013: institution.scorecard_netprice_2013,
            mobility_rate: institution.mobility_rate(),
            par_q1: institution.par_q1,
            cohort_count: institution.cohort_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Level;
    use crate::domain::tiers::Tier;

    fn institution(
        name: &str,
        tier: Tier,
        price: Option<f64>,
        kq4: Option<f64>,
        kq5: Option<f64>,
    ) -> Institution {
        Institution {
            super_opeid: 1,
            name: name.to_string(),
            level: Level::FourYear,
            tier,
            cohort_count: Some(500.0),
            par_q1: Some(0.1),
            kq1_cond_parq1: Some(0.3),
            kq2_cond_parq1: Some(0.2),
            kq3_cond_parq1: Some(0.2),
            kq4_cond_parq1: kq4,
            kq5_cond_parq1: kq5,
            k_married: Some(0.4),
            sticker_price_2013: price,
            scorecard_netprice_2013: price.map(|p| p * 0.6),
        }
    }

    #[test]
    fn test_summary_stats_skip_missing_fields() {
        let cohort = vec![
            institution("A", Tier::IvyPlus, Some(40000.0), Some(0.2), Some(0.1)),
            institution("B", Tier::IvyPlus, None, Some(0.3), Some(0.2)),
        ];
        let summary = summary_stats(&cohort);

        assert_eq!(summary.institutions, 2);
        // Only one sticker price available
        assert_eq!(summary.median_sticker_price, Some(40000.0));
        assert_eq!(summary.mean_sticker_price, Some(40000.0));
        let median_mobility = summary.median_mobility_rate.unwrap();
        assert!((median_mobility - 0.4).abs() < 1e-9);
        // Correlation needs two complete pairs
        assert_eq!(summary.price_mobility_correlation, None);
    }

    #[test]
    fn test_summary_stats_empty() {
        let summary = summary_stats(&[]);
        assert_eq!(summary.institutions, 0);
        assert_eq!(summary.median_mobility_rate, None);
        assert_eq!(summary.avg_cohort_size, None);
    }

    #[test]
    fn test_scatter_drops_incomplete_points_but_keeps_reference_medians() {
        let selected = vec![
            institution("A", Tier::IvyPlus, Some(40000.0), Some(0.2), Some(0.1)),
            institution("B", Tier::IvyPlus, None, Some(0.3), Some(0.2)),
        ];
        let reference = vec![
            institution("A", Tier::IvyPlus, Some(40000.0), Some(0.2), Some(0.1)),
            institution("B", Tier::IvyPlus, None, Some(0.3), Some(0.2)),
            institution("C", Tier::SelectivePublic, Some(20000.0), Some(0.1), Some(0.05)),
        ];
        let scatter = scatter(&selected, &reference);

        assert_eq!(scatter.points.len(), 1);
        assert_eq!(scatter.points[0].name, "A");
        assert_eq!(scatter.median_price, Some(30000.0));
    }

    #[test]
    fn test_ranking_orders_by_mobility_desc_with_missing_last() {
        let cohort = vec![
            institution("Low", Tier::IvyPlus, Some(10000.0), Some(0.05), Some(0.05)),
            institution("High", Tier::IvyPlus, Some(30000.0), Some(0.3), Some(0.2)),
            institution("Unknown", Tier::IvyPlus, Some(20000.0), None, Some(0.2)),
            institution("Mid", Tier::IvyPlus, Some(20000.0), Some(0.1), Some(0.1)),
        ];
        let ranked = rank_institutions(&cohort);

        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low", "Unknown"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[3].rank, 4);
        assert_eq!(ranked[3].mobility_rate, None);
    }

    #[test]
    fn test_ranking_is_numeric_not_lexicographic() {
        // 2% must rank below 10% even though "2" > "1" as text
        let cohort = vec![
            institution("Two", Tier::IvyPlus, Some(10000.0), Some(0.01), Some(0.01)),
            institution("Ten", Tier::IvyPlus, Some(10000.0), Some(0.05), Some(0.05)),
        ];
        let ranked = rank_institutions(&cohort);
        assert_eq!(ranked[0].name, "Ten");
        assert_eq!(ranked[1].name, "Two");
    }
}

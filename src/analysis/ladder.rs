use crate::analysis::stats;
use crate::domain::model::{Institution, LadderComparison, LadderDistribution, LadderSeries, LadderStep};

const QUINTILES: [&str; 5] = ["Q1", "Q2", "Q3", "Q4", "Q5"];

const DESCRIPTIONS: [&str; 5] = [
    "Remain in Bottom Quintile",
    "Move to Lower Middle",
    "Move to Middle",
    "Move to Upper Middle",
    "Move to Top Quintile",
];

const INCOME_RANGES: [&str; 5] = [
    "Bottom 20%",
    "20-40th percentile",
    "40-60th percentile",
    "60-80th percentile",
    "Top 20%",
];

/// Mean probability that a child lands in each income quintile, given
/// parents in the bottom quintile, averaged over the institutions.
pub fn ladder_distribution(label: &str, institutions: &[Institution]) -> LadderDistribution {
    let probabilities = quintile_means(institutions);

    let steps = QUINTILES
        .iter()
        .zip(probabilities)
        .enumerate()
        .map(|(index, (quintile, probability))| LadderStep {
            quintile: quintile.to_string(),
            probability,
            description: DESCRIPTIONS[index].to_string(),
            income_range: INCOME_RANGES[index].to_string(),
        })
        .collect::<Vec<_>>();

    let total_probability = steps
        .iter()
        .map(|step| step.probability)
        .sum::<Option<f64>>();
    let is_complete = total_probability
        .map(|total| (0.99..=1.01).contains(&total))
        .unwrap_or(false);

    if !institutions.is_empty() && !is_complete {
        match total_probability {
            Some(total) => tracing::warn!(
                "⚠️ Mobility ladder probabilities for '{}' sum to {:.3}, expected ~1.0",
                label,
                total
            ),
            None => tracing::warn!(
                "⚠️ Mobility ladder for '{}' has missing quintile probabilities",
                label
            ),
        }
    }

    LadderDistribution {
        label: label.to_string(),
        institutions: institutions.len(),
        steps,
        total_probability,
        is_complete,
    }
}

/// Ladder rendered for tier comparisons: top quintile first, with running
/// cumulative shares. The final cumulative entry is pinned to 1 whenever the
/// cohort is non-empty, since every student lands in some quintile.
pub fn ladder_series(label: &str, institutions: &[Institution]) -> LadderSeries {
    let [q1, q2, q3, q4, q5] = quintile_means(institutions);
    let avg_q1_share = stats::mean(institutions.iter().filter_map(|institution| institution.par_q1));

    let individual = vec![q5, q4, q3, q2, q1];
    let cumulative = vec![
        q5,
        sum2(q5, q4),
        sum2(sum2(q5, q4), q3),
        sum2(sum2(sum2(q5, q4), q3), q2),
        if institutions.is_empty() { None } else { Some(1.0) },
    ];

    LadderSeries {
        label: label.to_string(),
        institutions: institutions.len(),
        avg_q1_share,
        quintiles: QUINTILES.iter().rev().map(|q| q.to_string()).collect(),
        individual,
        cumulative,
    }
}

/// Side-by-side ladder series for two cohorts (typically two tiers).
pub fn compare(
    label_a: &str,
    cohort_a: &[Institution],
    label_b: &str,
    cohort_b: &[Institution],
) -> LadderComparison {
    LadderComparison {
        series: vec![
            ladder_series(label_a, cohort_a),
            ladder_series(label_b, cohort_b),
        ],
    }
}

fn quintile_means(institutions: &[Institution]) -> [Option<f64>; 5] {
    let mut means = [None; 5];
    for (index, mean) in means.iter_mut().enumerate() {
        *mean = stats::mean(
            institutions
                .iter()
                .filter_map(|institution| institution.ladder_shares()[index]),
        );
    }
    means
}

fn sum2(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    }
}

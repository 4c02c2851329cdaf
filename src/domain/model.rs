use crate::domain::tiers::{Tier, TierGroup};
use crate::utils::error::MobilityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Institution level (iclevel in the published tables, remapped so the code
/// matches the years of study: 4 = four-year, 2 = two-year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Four Year")]
    FourYear,
    #[serde(rename = "Two Year")]
    TwoYear,
}

impl Level {
    /// Raw iclevel codes: 1 = four-year, 2 = two-year. Anything else
    /// (less-than-two-year schools) falls outside the analysis.
    pub fn from_raw(code: u8) -> Option<Level> {
        match code {
            1 => Some(Level::FourYear),
            2 => Some(Level::TwoYear),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Level::FourYear => 4,
            Level::TwoYear => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Level::FourYear => "Four Year",
            Level::TwoYear => "Two Year",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = MobilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "four year" | "four-year" | "four_year" | "4" => Ok(Level::FourYear),
            "two year" | "two-year" | "two_year" | "2" => Ok(Level::TwoYear),
            _ => Err(MobilityError::ValidationError {
                message: format!(
                    "Unknown institution level: '{}'. Expected 'four-year' or 'two-year'",
                    s
                ),
            }),
        }
    }
}

/// Numeric cell from the published CSV tables. Blank, NA and NaN cells
/// all parse to None.
fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(cell) if cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") => {
            Ok(None)
        }
        Some(cell) => cell
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// One row of the preferred-estimates mobility table (mrc_table2).
/// Quintile probabilities are fractions in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilityRow {
    pub super_opeid: i64,
    pub name: String,
    pub iclevel: u8,
    pub tier: u8,
    #[serde(default, deserialize_with = "optional_number")]
    pub count: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub par_q1: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub kq1_cond_parq1: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub kq2_cond_parq1: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub kq3_cond_parq1: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub kq4_cond_parq1: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub kq5_cond_parq1: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub k_married: Option<f64>,
}

/// One row of the cost table (mrc_table10), trimmed to the columns we join on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRow {
    pub super_opeid: i64,
    pub iclevel: u8,
    #[serde(default, deserialize_with = "optional_number")]
    pub sticker_price_2013: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub scorecard_netprice_2013: Option<f64>,
}

/// Raw parsed datasets before the merge.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub mobility: Vec<MobilityRow>,
    pub cost: Vec<CostRow>,
}

/// A single institution after merging mobility and cost data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    pub super_opeid: i64,
    pub name: String,
    pub level: Level,
    pub tier: Tier,
    pub cohort_count: Option<f64>,
    pub par_q1: Option<f64>,
    pub kq1_cond_parq1: Option<f64>,
    pub kq2_cond_parq1: Option<f64>,
    pub kq3_cond_parq1: Option<f64>,
    pub kq4_cond_parq1: Option<f64>,
    pub kq5_cond_parq1: Option<f64>,
    pub k_married: Option<f64>,
    pub sticker_price_2013: Option<f64>,
    pub scorecard_netprice_2013: Option<f64>,
}

impl Institution {
    /// Share of bottom-quintile students reaching the top two quintiles.
    /// Missing if either conditional probability is missing.
    pub fn mobility_rate(&self) -> Option<f64> {
        match (self.kq4_cond_parq1, self.kq5_cond_parq1) {
            (Some(kq4), Some(kq5)) => Some(kq4 + kq5),
            _ => None,
        }
    }

    /// Quintile outcome probabilities in ladder order Q1 through Q5.
    pub fn ladder_shares(&self) -> [Option<f64>; 5] {
        [
            self.kq1_cond_parq1,
            self.kq2_cond_parq1,
            self.kq3_cond_parq1,
            self.kq4_cond_parq1,
            self.kq5_cond_parq1,
        ]
    }

    pub fn group(&self) -> TierGroup {
        self.tier.group()
    }

    pub fn subgroup(&self) -> &'static str {
        self.tier.subgroup()
    }
}

/// Counters describing how the merge went.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MergeStats {
    pub mobility_rows: usize,
    pub cost_rows: usize,
    pub merged: usize,
    pub skipped_level: usize,
    pub skipped_tier: usize,
    pub unmatched: usize,
}

/// Which slice of the merged data an analysis run looks at.
///
/// `min_q1_share` is a percentage (0 to 50). When it is None no access-share
/// filter is applied at all, which also keeps institutions with a missing
/// par_q1; a threshold of Some(0.0) still drops those rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Selection {
    pub level: Option<Level>,
    pub group: Option<TierGroup>,
    pub min_q1_share: Option<f64>,
}

impl Selection {
    pub fn matches(&self, institution: &Institution) -> bool {
        if self.level.is_some_and(|level| institution.level != level) {
            return false;
        }
        if self.group.is_some_and(|group| institution.group() != group) {
            return false;
        }
        match self.min_q1_share {
            Some(min) => institution
                .par_q1
                .is_some_and(|q1| q1 * 100.0 >= min),
            None => true,
        }
    }

    pub fn filter(&self, institutions: &[Institution]) -> Vec<Institution> {
        institutions
            .iter()
            .filter(|institution| self.matches(institution))
            .cloned()
            .collect()
    }

    /// Same selection with the group filter lifted, for baseline comparisons.
    pub fn without_group(&self) -> Selection {
        Selection {
            level: self.level,
            group: None,
            min_q1_share: self.min_q1_share,
        }
    }

    pub fn group_label(&self) -> String {
        match self.group {
            Some(group) => group.name().to_string(),
            None => "All".to_string(),
        }
    }
}

/// Headline numbers for the selected institutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub institutions: usize,
    pub avg_cohort_size: Option<f64>,
    pub median_mobility_rate: Option<f64>,
    pub avg_q1_share: Option<f64>,
    pub median_sticker_price: Option<f64>,
    pub mean_sticker_price: Option<f64>,
    pub avg_married_share: Option<f64>,
    pub price_mobility_correlation: Option<f64>,
}

/// One rung of the mobility ladder for a cohort of institutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderStep {
    pub quintile: String,
    pub probability: Option<f64>,
    pub description: String,
    pub income_range: String,
}

/// Average quintile-outcome distribution over a set of institutions,
/// rendered bottom-up (Q1 first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderDistribution {
    pub label: String,
    pub institutions: usize,
    pub steps: Vec<LadderStep>,
    pub total_probability: Option<f64>,
    pub is_complete: bool,
}

/// Ladder rendered top-down (Q5 first) with running cumulative shares,
/// the shape used for side-by-side tier comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderSeries {
    pub label: String,
    pub institutions: usize,
    pub avg_q1_share: Option<f64>,
    pub quintiles: Vec<String>,
    pub individual: Vec<Option<f64>>,
    pub cumulative: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderComparison {
    pub series: Vec<LadderSeries>,
}

/// One plottable institution: both axes are required, bubble size is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub super_opeid: i64,
    pub name: String,
    pub subgroup: String,
    pub sticker_price_2013: f64,
    pub mobility_rate: f64,
    pub par_q1: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityScatter {
    pub points: Vec<ScatterPoint>,
    pub median_price: Option<f64>,
    pub median_mobility: Option<f64>,
}

/// Cost/mobility quadrants relative to the median lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    #[serde(rename = "High Mobility, Low Cost")]
    HighMobilityLowCost,
    #[serde(rename = "High Mobility, High Cost")]
    HighMobilityHighCost,
    #[serde(rename = "Low Mobility, Low Cost")]
    LowMobilityLowCost,
    #[serde(rename = "Low Mobility, High Cost")]
    LowMobilityHighCost,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::HighMobilityLowCost,
        Quadrant::HighMobilityHighCost,
        Quadrant::LowMobilityLowCost,
        Quadrant::LowMobilityHighCost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::HighMobilityLowCost => "High Mobility, Low Cost",
            Quadrant::HighMobilityHighCost => "High Mobility, High Cost",
            Quadrant::LowMobilityLowCost => "Low Mobility, Low Cost",
            Quadrant::LowMobilityHighCost => "Low Mobility, High Cost",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An institution with its position in a mobility-rate ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedInstitution {
    pub rank: usize,
    pub super_opeid: i64,
    pub name: String,
    pub subgroup: String,
    pub sticker_price_2013: Option<f64>,
    pub scorecard_netprice_2013: Option<f64>,
    pub mobility_rate: Option<f64>,
    pub par_q1: Option<f64>,
    pub cohort_count: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantBucket {
    pub quadrant: Quadrant,
    pub count: usize,
    pub institutions: Vec<RankedInstitution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantReport {
    pub median_price: Option<f64>,
    pub median_mobility: Option<f64>,
    pub classified: usize,
    pub buckets: Vec<QuadrantBucket>,
}

/// Everything the transform stage produces for one selection.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub selection: Selection,
    pub merge: MergeStats,
    pub institutions: Vec<Institution>,
    pub summary: SummaryStats,
    pub ladder: LadderDistribution,
    pub baseline_ladder: LadderDistribution,
    pub scatter: AffordabilityScatter,
    pub quadrants: QuadrantReport,
    pub rankings: Vec<RankedInstitution>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn institution(tier: Tier, par_q1: Option<f64>) -> Institution {
        Institution {
            super_opeid: 1,
            name: "Test College".to_string(),
            level: Level::FourYear,
            tier,
            cohort_count: Some(100.0),
            par_q1,
            kq1_cond_parq1: Some(0.3),
            kq2_cond_parq1: Some(0.25),
            kq3_cond_parq1: Some(0.2),
            kq4_cond_parq1: Some(0.15),
            kq5_cond_parq1: Some(0.1),
            k_married: Some(0.4),
            sticker_price_2013: Some(40000.0),
            scorecard_netprice_2013: Some(20000.0),
        }
    }

    #[test]
    fn test_mobility_rate_requires_both_quintiles() {
        let complete = institution(Tier::IvyPlus, Some(0.1));
        assert_eq!(complete.mobility_rate(), Some(0.25));

        let mut partial = institution(Tier::IvyPlus, Some(0.1));
        partial.kq5_cond_parq1 = None;
        assert_eq!(partial.mobility_rate(), None);
    }

    #[test]
    fn test_level_raw_codes() {
        assert_eq!(Level::from_raw(1), Some(Level::FourYear));
        assert_eq!(Level::from_raw(2), Some(Level::TwoYear));
        assert_eq!(Level::from_raw(3), None);
        assert_eq!(Level::FourYear.code(), 4);
        assert_eq!(Level::TwoYear.code(), 2);
    }

    #[test]
    fn test_selection_share_threshold_is_percent() {
        let selection = Selection {
            level: None,
            group: None,
            min_q1_share: Some(5.0),
        };
        assert!(selection.matches(&institution(Tier::IvyPlus, Some(0.05))));
        assert!(!selection.matches(&institution(Tier::IvyPlus, Some(0.049))));
    }

    #[test]
    fn test_selection_missing_share_excluded_even_at_zero() {
        let zero_threshold = Selection {
            level: None,
            group: None,
            min_q1_share: Some(0.0),
        };
        assert!(!zero_threshold.matches(&institution(Tier::IvyPlus, None)));

        let no_filter = Selection::default();
        assert!(no_filter.matches(&institution(Tier::IvyPlus, None)));
    }

    #[test]
    fn test_selection_group_filter() {
        let selection = Selection {
            level: None,
            group: Some(TierGroup::Elite),
            min_q1_share: None,
        };
        assert!(selection.matches(&institution(Tier::OtherElite, Some(0.1))));
        assert!(!selection.matches(&institution(Tier::SelectivePublic, Some(0.1))));
        assert!(selection.without_group().matches(&institution(
            Tier::SelectivePublic,
            Some(0.1)
        )));
    }
}

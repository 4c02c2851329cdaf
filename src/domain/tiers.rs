use crate::utils::error::MobilityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectivity tier from the mobility report card tables (codes 1 through 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Ivy Plus")]
    IvyPlus,
    #[serde(rename = "Other elite schools")]
    OtherElite,
    #[serde(rename = "Highly selective public")]
    HighlySelectivePublic,
    #[serde(rename = "Highly selective private")]
    HighlySelectivePrivate,
    #[serde(rename = "Selective public")]
    SelectivePublic,
    #[serde(rename = "Selective private")]
    SelectivePrivate,
    #[serde(rename = "Nonselective 4-year public")]
    NonselectivePublic,
    #[serde(rename = "Nonselective 4-year private")]
    NonselectivePrivate,
    #[serde(rename = "Two-year (public and private)")]
    TwoYear,
    #[serde(rename = "Four-year for-profit")]
    ForProfit,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::IvyPlus,
        Tier::OtherElite,
        Tier::HighlySelectivePublic,
        Tier::HighlySelectivePrivate,
        Tier::SelectivePublic,
        Tier::SelectivePrivate,
        Tier::NonselectivePublic,
        Tier::NonselectivePrivate,
        Tier::TwoYear,
        Tier::ForProfit,
    ];

    pub fn from_code(code: u8) -> Option<Tier> {
        match code {
            1 => Some(Tier::IvyPlus),
            2 => Some(Tier::OtherElite),
            3 => Some(Tier::HighlySelectivePublic),
            4 => Some(Tier::HighlySelectivePrivate),
            5 => Some(Tier::SelectivePublic),
            6 => Some(Tier::SelectivePrivate),
            7 => Some(Tier::NonselectivePublic),
            8 => Some(Tier::NonselectivePrivate),
            9 => Some(Tier::TwoYear),
            10 => Some(Tier::ForProfit),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Tier::IvyPlus => 1,
            Tier::OtherElite => 2,
            Tier::HighlySelectivePublic => 3,
            Tier::HighlySelectivePrivate => 4,
            Tier::SelectivePublic => 5,
            Tier::SelectivePrivate => 6,
            Tier::NonselectivePublic => 7,
            Tier::NonselectivePrivate => 8,
            Tier::TwoYear => 9,
            Tier::ForProfit => 10,
        }
    }

    /// Display name as it appears in the published tables.
    pub fn name(&self) -> &'static str {
        match self {
            Tier::IvyPlus => "Ivy Plus",
            Tier::OtherElite => "Other elite schools",
            Tier::HighlySelectivePublic => "Highly selective public",
            Tier::HighlySelectivePrivate => "Highly selective private",
            Tier::SelectivePublic => "Selective public",
            Tier::SelectivePrivate => "Selective private",
            Tier::NonselectivePublic => "Nonselective 4-year public",
            Tier::NonselectivePrivate => "Nonselective 4-year private",
            Tier::TwoYear => "Two-year (public and private)",
            Tier::ForProfit => "Four-year for-profit",
        }
    }

    pub fn group(&self) -> TierGroup {
        match self {
            Tier::IvyPlus | Tier::OtherElite => TierGroup::Elite,
            Tier::HighlySelectivePublic | Tier::HighlySelectivePrivate => {
                TierGroup::HighlySelective
            }
            Tier::SelectivePublic | Tier::SelectivePrivate => TierGroup::Selective,
            Tier::NonselectivePublic | Tier::NonselectivePrivate => TierGroup::Nonselective,
            Tier::TwoYear => TierGroup::TwoYear,
            Tier::ForProfit => TierGroup::ForProfit,
        }
    }

    pub fn subgroup(&self) -> &'static str {
        match self {
            Tier::IvyPlus => "Ivy Plus",
            Tier::OtherElite => "Other Elite",
            Tier::HighlySelectivePublic
            | Tier::SelectivePublic
            | Tier::NonselectivePublic => "Public",
            Tier::HighlySelectivePrivate
            | Tier::SelectivePrivate
            | Tier::NonselectivePrivate => "Private",
            Tier::TwoYear => "Two-year",
            Tier::ForProfit => "For-profit",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = MobilityError;

    /// Accepts either the numeric tier code or the published tier name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<u8>() {
            return Tier::from_code(code).ok_or_else(|| MobilityError::ValidationError {
                message: format!("Unknown tier code '{}', expected 1 through 10", code),
            });
        }

        let normalized = s.trim().to_lowercase();
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| tier.name().to_lowercase() == normalized)
            .ok_or_else(|| MobilityError::ValidationError {
                message: format!("Unknown tier name: '{}'", s),
            })
    }
}

/// Coarse grouping of tiers used by the affordability filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierGroup {
    #[serde(rename = "Elite")]
    Elite,
    #[serde(rename = "Highly Selective")]
    HighlySelective,
    #[serde(rename = "Selective")]
    Selective,
    #[serde(rename = "Nonselective")]
    Nonselective,
    #[serde(rename = "Two-year")]
    TwoYear,
    #[serde(rename = "Four-year for-profit")]
    ForProfit,
}

impl TierGroup {
    pub const ALL: [TierGroup; 6] = [
        TierGroup::Elite,
        TierGroup::HighlySelective,
        TierGroup::Selective,
        TierGroup::Nonselective,
        TierGroup::TwoYear,
        TierGroup::ForProfit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TierGroup::Elite => "Elite",
            TierGroup::HighlySelective => "Highly Selective",
            TierGroup::Selective => "Selective",
            TierGroup::Nonselective => "Nonselective",
            TierGroup::TwoYear => "Two-year",
            TierGroup::ForProfit => "Four-year for-profit",
        }
    }
}

impl fmt::Display for TierGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TierGroup {
    type Err = MobilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elite" => Ok(TierGroup::Elite),
            "highly selective" | "highly-selective" => Ok(TierGroup::HighlySelective),
            "selective" => Ok(TierGroup::Selective),
            "nonselective" | "non-selective" => Ok(TierGroup::Nonselective),
            "two-year" | "two year" => Ok(TierGroup::TwoYear),
            "four-year for-profit" | "for-profit" => Ok(TierGroup::ForProfit),
            _ => Err(MobilityError::ValidationError {
                message: format!(
                    "Unknown institution group: '{}'. Expected one of: {}",
                    s,
                    TierGroup::ALL
                        .iter()
                        .map(|group| group.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        }
    }
}

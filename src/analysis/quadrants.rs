use crate::analysis::{affordability, stats};
use crate::domain::model::{Institution, Quadrant, QuadrantBucket, QuadrantReport};

/// Places one institution relative to the median lines. Strict comparisons:
/// an institution sitting exactly on a median line lands in no quadrant.
pub fn classify(
    price: f64,
    mobility: f64,
    median_price: f64,
    median_mobility: f64,
) -> Option<Quadrant> {
    if mobility > median_mobility && price < median_price {
        Some(Quadrant::HighMobilityLowCost)
    } else if mobility > median_mobility && price > median_price {
        Some(Quadrant::HighMobilityHighCost)
    } else if mobility < median_mobility && price < median_price {
        Some(Quadrant::LowMobilityLowCost)
    } else if mobility < median_mobility && price > median_price {
        Some(Quadrant::LowMobilityHighCost)
    } else {
        None
    }
}

/// Splits the institutions into cost/mobility quadrants around their own
/// medians, with each bucket ranked by mobility rate.
pub fn quadrant_report(institutions: &[Institution]) -> QuadrantReport {
    let median_price = stats::median(
        institutions
            .iter()
            .filter_map(|institution| institution.sticker_price_2013),
    );
    let median_mobility = stats::median(
        institutions
            .iter()
            .filter_map(|institution| institution.mobility_rate()),
    );

    let (Some(price_line), Some(mobility_line)) = (median_price, median_mobility) else {
        return QuadrantReport {
            median_price,
            median_mobility,
            classified: 0,
            buckets: Quadrant::ALL
                .iter()
                .map(|&quadrant| QuadrantBucket {
                    quadrant,
                    count: 0,
                    institutions: Vec::new(),
                })
                .collect(),
        };
    };

    let mut members: [Vec<Institution>; 4] = Default::default();
    for institution in institutions {
        let (Some(price), Some(mobility)) =
            (institution.sticker_price_2013, institution.mobility_rate())
        else {
            continue;
        };
        if let Some(quadrant) = classify(price, mobility, price_line, mobility_line) {
            let slot = match quadrant {
                Quadrant::HighMobilityLowCost => 0,
                Quadrant::HighMobilityHighCost => 1,
                Quadrant::LowMobilityLowCost => 2,
                Quadrant::LowMobilityHighCost => 3,
            };
            members[slot].push(institution.clone());
        }
    }

    let classified = members.iter().map(Vec::len).sum();
    let buckets = Quadrant::ALL
        .iter()
        .zip(members)
        .map(|(&quadrant, cohort)| QuadrantBucket {
            quadrant,
            count: cohort.len(),
            institutions: affordability::rank_institutions(&cohort),
        })
        .collect();

    QuadrantReport {
        median_price,
        median_mobility,
        classified,
        buckets,
    }
}

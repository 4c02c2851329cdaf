pub mod affordability;
pub mod ladder;
pub mod quadrants;
pub mod stats;

// Domain layer: models, the tier taxonomy, and ports (interfaces).
// No external dependencies beyond std/serde when needed.

pub mod model;
pub mod ports;
pub mod tiers;

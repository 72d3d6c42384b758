mod config;
mod forces;
mod placement;
mod quadtree;
mod simulation;
mod tiers;

pub use config::{CanvasSize, LayoutConfig, TierBands};
pub use placement::{SimNode, initial_placement};
pub use simulation::{Simulation, StepOutcome};
pub use tiers::{Tiers, UNREACHED_TIER, assign_tiers};

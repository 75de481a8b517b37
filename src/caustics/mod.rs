//! Caustic light patterns projected onto the sea floor.

mod projector;
mod refract;
mod splat;

pub use projector::CausticProjector;
pub use refract::{floor_hit, incident_direction, refract, surface_normal, MIN_DESCENT};
pub use splat::{blur, deposit_bilinear, BlurKernel, MAX_BLUR_RADIUS};

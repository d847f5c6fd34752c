pub mod geo;
pub mod ids;
pub mod precision;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
pub use ids::*;
pub use precision::*;
pub use time::*;

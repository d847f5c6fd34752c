pub mod deferred;
pub mod metrics;
pub mod notices;
pub mod tick;

pub use deferred::*;
pub use metrics::*;
pub use notices::*;
pub use tick::*;

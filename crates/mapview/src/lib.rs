//! Map-state core: keeps a declarative viewport in step with a gesture-driven
//! rendering engine, runs follow mode, and augments freshly loaded styles.

pub mod config;
pub mod engine;
pub mod follow;
pub mod session;
pub mod sim;
pub mod viewport;

pub use config::*;
pub use engine::*;
pub use follow::*;
pub use session::*;
pub use viewport::*;

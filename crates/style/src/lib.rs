pub mod augment;
pub mod document;
pub mod extrusion;
pub mod labels;
pub mod layer;
pub mod mode;
pub mod registry;

pub use augment::*;
pub use document::*;
pub use layer::*;
pub use mode::*;
pub use registry::*;

use serde::{Deserialize, Serialize};

/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn is_after(&self, other: Time) -> bool {
        self.0 > other.0
    }
}

use serde::{Deserialize, Serialize};

/// Monotonic generation counter.
///
/// Used to tell one rendering surface (and the style it loaded) apart from the
/// one it replaced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub const fn new(n: u64) -> Self {
        Generation(n)
    }

    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Generation;

    #[test]
    fn next_is_strictly_greater() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next(), Generation::new(2));
    }
}

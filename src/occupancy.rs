use serde::{Deserialize, Serialize};

/// Occupancy tag carried by every octree leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    /// Traversable space.
    #[default]
    Free,
    /// Space the agent must never enter.
    Obstacle,
    /// Caller-defined label. The search treats it as non-traversable.
    ///
    /// Only labels up to [`Occupancy::MAX_LABEL`] survive the numeric encoding.
    Label(u32),
}

impl Occupancy {
    /// Largest label with a distinct numeric code.
    pub const MAX_LABEL: u32 = u32::MAX - 2;

    /// A `Label(n)`, or `None` when `n` exceeds [`Occupancy::MAX_LABEL`].
    pub fn label(n: u32) -> Option<Occupancy> {
        (n <= Self::MAX_LABEL).then_some(Occupancy::Label(n))
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Occupancy::Free)
    }

    /// Numeric code used across the WASM boundary.
    ///
    /// Labels above [`Occupancy::MAX_LABEL`] saturate to `u32::MAX` and do not
    /// round trip through [`Occupancy::from_code`].
    pub fn code(&self) -> u32 {
        match self {
            Occupancy::Free => 0,
            Occupancy::Obstacle => 1,
            Occupancy::Label(n) => n.saturating_add(2),
        }
    }

    pub fn from_code(code: u32) -> Occupancy {
        match code {
            0 => Occupancy::Free,
            1 => Occupancy::Obstacle,
            n => Occupancy::Label(n - 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_up_to_max_label() {
        for tag in [
            Occupancy::Free,
            Occupancy::Obstacle,
            Occupancy::Label(0),
            Occupancy::Label(Occupancy::MAX_LABEL),
        ] {
            assert_eq!(Occupancy::from_code(tag.code()), tag);
        }
        assert_eq!(Occupancy::Label(Occupancy::MAX_LABEL).code(), u32::MAX);
    }

    #[test]
    fn test_label_rejects_unencodable_values() {
        assert_eq!(Occupancy::label(7), Some(Occupancy::Label(7)));
        assert_eq!(Occupancy::label(Occupancy::MAX_LABEL), Some(Occupancy::Label(Occupancy::MAX_LABEL)));
        assert_eq!(Occupancy::label(Occupancy::MAX_LABEL + 1), None);
        assert_eq!(Occupancy::label(u32::MAX), None);
    }
}

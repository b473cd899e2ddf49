//! Collision layers for filtering geometry queries.
//!
//! Every collider carries the layers it belongs to, and every query carries
//! the mask of layers it wants to see. A query hits a collider when the two
//! share at least one bit.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitset of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// No layers.
    pub const NONE: Self = Self(0);

    /// Static level geometry: floors, walls, ramps, ceilings.
    pub const SOLID: Self = Self(1 << 0);

    /// Moving platforms the character can ride.
    pub const PLATFORM: Self = Self(1 << 1);

    /// Surfaces that hurt on contact but still block movement.
    pub const HAZARD: Self = Self(1 << 2);

    /// Volumes that only report overlap and never block.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Default mask for character movement probes.
    pub const MASK_CHARACTER: Self = Self(Self::SOLID.0 | Self::PLATFORM.0 | Self::HAZARD.0);

    /// Checks if all layers of `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Checks if `self` and `other` share at least one layer.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns true when no layer is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the mask with the layers of `other` removed.
    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LayerMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_mask_layers() {
        let mask = LayerMask::MASK_CHARACTER;
        assert!(mask.contains(LayerMask::SOLID));
        assert!(mask.contains(LayerMask::PLATFORM));
        assert!(!mask.intersects(LayerMask::TRIGGER));
    }

    #[test]
    fn test_bit_ops() {
        let mut mask = LayerMask::SOLID | LayerMask::TRIGGER;
        assert!(mask.intersects(LayerMask::TRIGGER));
        mask = mask.without(LayerMask::TRIGGER);
        assert_eq!(mask, LayerMask::SOLID);
        mask |= LayerMask::HAZARD;
        assert_eq!(mask & LayerMask::HAZARD, LayerMask::HAZARD);
        assert!(LayerMask::NONE.is_empty());
    }

    #[test]
    fn test_serializes_as_integer() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mask: LayerMask,
        }

        let text = toml::to_string(&Wrapper {
            mask: LayerMask::SOLID | LayerMask::PLATFORM,
        })
        .expect("serialize");
        assert_eq!(text.trim(), "mask = 3");

        let back: Wrapper = toml::from_str("mask = 5").expect("deserialize");
        assert_eq!(back.mask, LayerMask::SOLID | LayerMask::HAZARD);
    }
}

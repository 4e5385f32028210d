/*!
Collision layers as a typed bitmask.

Surfaces carry a [`LayerMask`] describing what they are; movers carry one
describing what they collide with. A sweep considers a surface only when the
two masks overlap. The mask container is generic over its backing integer so
smaller masks can reuse the same machinery.
*/

use num_traits::{One, PrimInt};

/// Trait implemented by flag enums that index bits in a [`BitmaskFlags`].
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// The backing integer type is chosen via the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // Equivalent to: 1 << index
        // NOTE: Ensure your `bit_index()` is < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over any primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// The empty mask: overlaps with nothing.
    pub fn none() -> Self {
        Self { bits: T::zero() }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    /// True when the two masks share at least one bit.
    pub fn overlaps(&self, other: &Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    /// Build a mask from a list of flags.
    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(tags: &[U]) -> Self {
        let bits = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        Self { bits }
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```rust
/// use specter2d::define_bitmask_flags;
///
/// define_bitmask_flags!(ZoneTag, u8, {
///     Checkpoint,
///     Hazard,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::layers::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

// Layer roles:
// - Terrain: ordinary level geometry.
// - MovingPlatform: geometry driven by a platform mover.
// - Pushable: grabbable, pushable bodies.
// - Hazard: deadly zones; sensed, never collided with.
// - SafeGround: terrain that also counts as a respawn-safe stand.
// - Sensor: non-solid sensor geometry (plates, zones).
define_bitmask_flags!(Layer, u32, {
    Terrain,
    MovingPlatform,
    Pushable,
    Hazard,
    SafeGround,
    Sensor,
});

/// Mask over the [`Layer`] bits.
pub type LayerMask = BitmaskFlags<u32>;

impl LayerMask {
    /// Everything a grounded body collides with by default.
    pub fn solid_default() -> Self {
        Self::from_flags(&[Layer::Terrain, Layer::MovingPlatform, Layer::Pushable])
    }

    /// Every defined layer.
    pub fn everything() -> Self {
        Self::new(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_and_query_single_layers() {
        let mut mask = LayerMask::none();
        assert!(!mask.has(Layer::Terrain));

        mask.add(Layer::Terrain);
        mask.add(Layer::SafeGround);
        assert!(mask.has(Layer::Terrain));
        assert!(mask.has(Layer::SafeGround));
        assert!(!mask.has(Layer::Hazard));

        mask.remove(Layer::Terrain);
        assert!(!mask.has(Layer::Terrain));
        assert!(mask.has(Layer::SafeGround));
    }

    #[test]
    fn overlap_requires_a_shared_bit() {
        let solid = LayerMask::solid_default();
        let sensor_only = LayerMask::from_flags(&[Layer::Sensor]);
        let terrain = LayerMask::from_flags(&[Layer::Terrain, Layer::SafeGround]);

        assert!(!solid.overlaps(&sensor_only));
        assert!(solid.overlaps(&terrain));
        assert!(LayerMask::everything().overlaps(&sensor_only));
        assert!(!LayerMask::none().overlaps(&LayerMask::everything()));
    }

    #[test]
    fn macro_defined_layers_have_distinct_bits() {
        use crate::layers::FlagBitmask as _;
        let all = [
            Layer::Terrain,
            Layer::MovingPlatform,
            Layer::Pushable,
            Layer::Hazard,
            Layer::SafeGround,
            Layer::Sensor,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.mask(), b.mask());
            }
        }
    }
}

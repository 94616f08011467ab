//! # Object Types
//!
//! The closed set of things the world can materialize. Per-type tables are
//! fixed arrays indexed by [`ObjectType`], so "for every type" loops are
//! exhaustive by construction.

use std::ops::{Index, IndexMut};

/// Every kind of pooled world object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObjectType {
    /// Water terrain tile.
    WaterTile = 0,
    /// Sand terrain tile.
    SandTile = 1,
    /// Grass terrain tile.
    GrassTile = 2,
    /// Small oak.
    LittleOak = 3,
    /// Wide oak.
    BigOak = 4,
    /// Tall oak.
    HeightOak = 5,
    /// Dead small oak.
    DeadLittleOak = 6,
    /// Dead wide oak.
    DeadBigOak = 7,
    /// Dead tall oak.
    DeadHeightOak = 8,
    /// The player character.
    Player = 9,
    /// Slime creature.
    Slime = 10,
    /// Fireball projectile.
    Fireball = 11,
}

impl ObjectType {
    /// Number of object types.
    pub const COUNT: usize = 12;

    /// All object types in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::WaterTile,
        Self::SandTile,
        Self::GrassTile,
        Self::LittleOak,
        Self::BigOak,
        Self::HeightOak,
        Self::DeadLittleOak,
        Self::DeadBigOak,
        Self::DeadHeightOak,
        Self::Player,
        Self::Slime,
        Self::Fireball,
    ];

    /// Terrain tile types.
    pub const TILES: [Self; 3] = [Self::WaterTile, Self::SandTile, Self::GrassTile];

    /// Tree types, from most common to rarest.
    pub const TREES: [Self; 6] = [
        Self::LittleOak,
        Self::BigOak,
        Self::HeightOak,
        Self::DeadLittleOak,
        Self::DeadBigOak,
        Self::DeadHeightOak,
    ];

    /// Table index of this type.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for terrain tiles.
    #[inline]
    #[must_use]
    pub const fn is_tile(self) -> bool {
        matches!(self, Self::WaterTile | Self::SandTile | Self::GrassTile)
    }

    /// Returns true for trees.
    #[inline]
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(
            self,
            Self::LittleOak
                | Self::BigOak
                | Self::HeightOak
                | Self::DeadLittleOak
                | Self::DeadBigOak
                | Self::DeadHeightOak
        )
    }

    /// Stable lowercase name, as used in config files and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WaterTile => "water",
            Self::SandTile => "sand",
            Self::GrassTile => "grass",
            Self::LittleOak => "littleOak",
            Self::BigOak => "bigOak",
            Self::HeightOak => "heightOak",
            Self::DeadLittleOak => "deadLittleOak",
            Self::DeadBigOak => "deadBigOak",
            Self::DeadHeightOak => "deadHeightOak",
            Self::Player => "player",
            Self::Slime => "slime",
            Self::Fireball => "fireball",
        }
    }
}

/// Fixed-size table holding one `T` per [`ObjectType`].
#[derive(Clone, Debug, PartialEq)]
pub struct PerType<T>([T; ObjectType::COUNT]);

impl<T> PerType<T> {
    /// Builds a table by calling `f` once per type, in declaration order.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(ObjectType) -> T) -> Self {
        Self(std::array::from_fn(|i| f(ObjectType::ALL[i])))
    }

    /// Iterates `(type, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectType, &T)> {
        ObjectType::ALL.into_iter().zip(self.0.iter())
    }

    /// Iterates `(type, value)` pairs mutably in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectType, &mut T)> {
        ObjectType::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T: Default> Default for PerType<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<ObjectType> for PerType<T> {
    type Output = T;

    #[inline]
    fn index(&self, kind: ObjectType) -> &T {
        &self.0[kind.index()]
    }
}

impl<T> IndexMut<ObjectType> for PerType<T> {
    #[inline]
    fn index_mut(&mut self, kind: ObjectType) -> &mut T {
        &mut self.0[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_index() {
        for (i, kind) in ObjectType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_categories_are_disjoint() {
        for kind in ObjectType::ALL {
            assert!(!(kind.is_tile() && kind.is_tree()), "{kind:?}");
        }
        assert!(ObjectType::TILES.iter().all(|k| k.is_tile()));
        assert!(ObjectType::TREES.iter().all(|k| k.is_tree()));
        assert!(!ObjectType::Slime.is_tile() && !ObjectType::Slime.is_tree());
    }

    #[test]
    fn test_per_type_table() {
        let mut table: PerType<u32> = PerType::default();
        table[ObjectType::Slime] += 3;
        table[ObjectType::WaterTile] = 1;

        let total: u32 = table.iter().map(|(_, v)| *v).sum();
        assert_eq!(total, 4);
        assert_eq!(table.iter().next(), Some((ObjectType::WaterTile, &1)));
    }
}

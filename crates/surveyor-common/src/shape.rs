use serde::{Deserialize, Serialize};

/// The vertical extent of a world: an inclusive floor and a total height.
/// Both are multiples of 16, so every world maps onto a whole number of
/// 16-block sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldShape {
    pub min_y: i32,
    pub height: i32,
}

impl WorldShape {
    pub fn new(min_y: i32, height: i32) -> Self {
        WorldShape { min_y, height }
    }

    /// The modern overworld: Y in [-64, 320).
    pub fn overworld() -> Self {
        WorldShape::new(-64, 384)
    }

    /// Roofed dimensions: Y in [0, 256).
    pub fn nether() -> Self {
        WorldShape::new(0, 256)
    }

    /// Exclusive upper bound on Y.
    pub fn max_y(self) -> i32 {
        self.min_y + self.height
    }

    pub fn section_count(self) -> usize {
        (self.height >> 4) as usize
    }

    /// Section coordinate of the lowest section.
    pub fn bottom_section(self) -> i32 {
        self.min_y >> 4
    }

    /// Maps a declared section coordinate (the `Y` byte of a serialized
    /// section) to a slot in the section array. May be out of range.
    pub fn section_slot(self, section_y: i32) -> i32 {
        section_y - self.bottom_section()
    }

    /// Slot of the section containing the given block Y.
    pub fn section_slot_at(self, y: i32) -> i32 {
        self.section_slot(y >> 4)
    }

    pub fn contains_y(self, y: i32) -> bool {
        y >= self.min_y && y < self.max_y()
    }
}

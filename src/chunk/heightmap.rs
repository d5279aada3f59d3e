use crate::chunk::palette::ceil_log2;
use crate::chunk::section::Section;
use surveyor_common::shape::WorldShape;

/// Per-column surface cache: for each of the 256 horizontal cells, one
/// above the topmost non-air Y. Values are stored relative to the world
/// floor in the same packed long layout records use, so a stored
/// heightmap can be adopted without repacking.
#[derive(Debug)]
pub struct Heightmap {
    data: Vec<u64>,
    bits: u32,
    min_y: i32,
}

const CELLS: usize = 16 * 16;

impl Heightmap {
    fn bits_for(shape: WorldShape) -> u32 {
        // values range over 0..=height
        ceil_log2(shape.height as usize + 1)
    }

    fn empty(shape: WorldShape) -> Self {
        let bits = Self::bits_for(shape);
        let values_per_long = (64 / bits) as usize;
        Heightmap {
            data: vec![0; CELLS.div_ceil(values_per_long)],
            bits,
            min_y: shape.min_y,
        }
    }

    /// Adopts a stored heightmap long array. Length mismatches are
    /// tolerated; missing words read as "empty column".
    pub fn from_longs(longs: &[i64], shape: WorldShape) -> Self {
        let mut heightmap = Self::empty(shape);
        for (slot, &long) in heightmap.data.iter_mut().zip(longs.iter()) {
            *slot = long as u64;
        }
        heightmap
    }

    /// Recomputes the heightmap by scanning sections top-down per cell.
    /// `sections` is indexed by section slot, bottom first.
    pub fn populate(sections: &[Option<Section>], shape: WorldShape) -> Self {
        let mut heightmap = Self::empty(shape);

        for z in 0..16 {
            for x in 0..16 {
                'column: for slot in (0..sections.len()).rev() {
                    let section = match &sections[slot] {
                        Some(section) if !section.is_empty() => section,
                        _ => continue,
                    };

                    for y in (0..16).rev() {
                        if !section.block_state(x, y, z).is_air() {
                            let top = shape.min_y + (slot as i32) * 16 + y;
                            heightmap.set(x, z, top + 1);
                            break 'column;
                        }
                    }
                }
            }
        }

        heightmap
    }

    /// One above the topmost non-air Y at the cell, or the world floor
    /// for an empty column.
    pub fn get(&self, x: i32, z: i32) -> i32 {
        let index = (x & 15) as usize + ((z & 15) as usize) * 16;
        let values_per_long = (64 / self.bits) as usize;
        let word = self.data[index / values_per_long];
        let shift = (index % values_per_long) as u32 * self.bits;
        let mask = (1u64 << self.bits) - 1;

        self.min_y + ((word >> shift) & mask) as i32
    }

    fn set(&mut self, x: i32, z: i32, surface_y: i32) {
        let index = (x & 15) as usize + ((z & 15) as usize) * 16;
        let values_per_long = (64 / self.bits) as usize;
        let shift = (index % values_per_long) as u32 * self.bits;
        let mask = (1u64 << self.bits) - 1;
        let value = (surface_y - self.min_y) as u64 & mask;

        let word = &mut self.data[index / values_per_long];
        *word = (*word & !(mask << shift)) | (value << shift);
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::block::BlockState;
    use crate::chunk::palette::{pack_values, PalettedData};
    use crate::chunk::section::{Section, BIOMES_PER_SECTION, BLOCKS_PER_SECTION};
    use std::sync::Arc;

    fn section_with_block(x: i32, y: i32, z: i32, name: &str) -> Section {
        let mut values = vec![0u64; BLOCKS_PER_SECTION];
        values[((y as usize) << 8) | ((z as usize) << 4) | (x as usize)] = 1;
        let (blocks, _) = PalettedData::from_parts(
            vec![BlockState::air(), BlockState::new(name)],
            Some(pack_values(&values, 4)),
            BLOCKS_PER_SECTION,
            4,
        )
        .unwrap();
        Section::new(
            blocks,
            PalettedData::single(Arc::from("minecraft:plains"), BIOMES_PER_SECTION),
        )
    }

    #[test]
    fn test_set_get_roundtrip() {
        let shape = WorldShape::overworld();
        let mut heightmap = Heightmap::empty(shape);
        heightmap.set(0, 0, 64);
        heightmap.set(15, 15, -63);
        heightmap.set(7, 3, 319);

        assert_eq!(heightmap.get(0, 0), 64);
        assert_eq!(heightmap.get(15, 15), -63);
        assert_eq!(heightmap.get(7, 3), 319);
        // untouched cells read as the floor
        assert_eq!(heightmap.get(1, 1), -64);
    }

    #[test]
    fn test_overworld_packing_width() {
        // 385 distinct values need 9 bits; 7 values per long, 256 cells
        let shape = WorldShape::overworld();
        let heightmap = Heightmap::empty(shape);
        assert_eq!(heightmap.bits, 9);
        assert_eq!(heightmap.data.len(), 37);
    }

    #[test]
    fn test_from_longs_adopts_stored_packing() {
        // pack 256 cell values at 9 bits the way records store them
        let shape = WorldShape::overworld();
        let cells: Vec<u64> = (0..256).map(|i| (i * 16) % 384).collect();
        let longs: Vec<i64> = pack_values(&cells, 9)
            .into_iter()
            .map(|word| word as i64)
            .collect();

        let adopted = Heightmap::from_longs(&longs, shape);
        for z in 0..16i32 {
            for x in 0..16i32 {
                let cell = (x + z * 16) as usize;
                assert_eq!(adopted.get(x, z), -64 + cells[cell] as i32);
            }
        }
    }

    #[test]
    fn test_from_longs_short_array() {
        let shape = WorldShape::overworld();
        let heightmap = Heightmap::from_longs(&[0b1_0000_0000], shape);
        // first cell carries 256 above the floor, rest read as empty
        assert_eq!(heightmap.get(0, 0), -64 + 256);
        assert_eq!(heightmap.get(15, 15), -64);
    }

    #[test]
    fn test_populate_from_sections() {
        let shape = WorldShape::overworld();
        let mut sections: Vec<Option<Section>> = Vec::new();
        for _ in 0..shape.section_count() {
            sections.push(None);
        }
        // stone at local (0,0) of the section covering Y 0..16, at y=10
        sections[4] = Some(section_with_block(0, 10, 0, "minecraft:stone"));
        // bedrock at local (1,1) in the bottom section, at y=-64
        sections[0] = Some(section_with_block(1, 0, 1, "minecraft:bedrock"));

        let heightmap = Heightmap::populate(&sections, shape);
        assert_eq!(heightmap.get(0, 0), 11);
        assert_eq!(heightmap.get(1, 1), -63);
        assert_eq!(heightmap.get(5, 5), -64);
    }
}

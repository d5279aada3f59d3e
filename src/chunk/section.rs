use crate::chunk::block::BlockState;
use crate::chunk::palette::PalettedData;
use std::sync::Arc;

pub const BLOCKS_PER_SECTION: usize = 16 * 16 * 16;
pub const BIOMES_PER_SECTION: usize = 4 * 4 * 4;

pub const DEFAULT_BIOME: &str = "minecraft:plains";

/// One 16-block vertical band of a chunk column: a paletted block-state
/// array at full resolution and a paletted biome array at 4-block
/// granularity.
#[derive(Debug)]
pub struct Section {
    block_states: PalettedData<BlockState>,
    biomes: PalettedData<Arc<str>>,
    non_air_count: u32,
}

impl Section {
    pub fn new(block_states: PalettedData<BlockState>, biomes: PalettedData<Arc<str>>) -> Self {
        let non_air_count = if block_states.bits() == 0 {
            if block_states.palette()[0].is_air() {
                0
            } else {
                BLOCKS_PER_SECTION as u32
            }
        } else {
            (0..BLOCKS_PER_SECTION)
                .filter(|&i| !block_states.get(i).is_air())
                .count() as u32
        };

        Section {
            block_states,
            biomes,
            non_air_count,
        }
    }

    /// True when the section holds no blocks worth querying; callers
    /// short-circuit to air without touching the palette.
    pub fn is_empty(&self) -> bool {
        self.non_air_count == 0
    }

    /// Block state at section-local coordinates, each in [0, 16).
    pub fn block_state(&self, x: i32, y: i32, z: i32) -> &BlockState {
        let index = ((y as usize) << 8) | ((z as usize) << 4) | (x as usize);
        self.block_states.get(index)
    }

    /// Biome at section-local block coordinates (internally 4x4x4).
    pub fn biome(&self, x: i32, y: i32, z: i32) -> &str {
        let index = (((y as usize) >> 2) << 4) | (((z as usize) >> 2) << 2) | ((x as usize) >> 2);
        self.biomes.get(index)
    }
}

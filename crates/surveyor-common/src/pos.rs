use serde::{Deserialize, Serialize};

/// Identity of a chunk column: its horizontal position in chunk units.
/// Region coordinates use the same packing, shifted by 5 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPos { x, z }
    }

    pub fn at_block(block_x: i32, block_z: i32) -> Self {
        ChunkPos::new(block_x >> 4, block_z >> 4)
    }

    /// Packs both coordinates into one i64 map key.
    pub fn as_long(self) -> i64 {
        (self.x as i64 & 0xFFFF_FFFF) | ((self.z as i64) << 32)
    }

    /// The region this chunk is stored in (32x32 chunks per region).
    pub fn region(self) -> (i32, i32) {
        (self.x >> 5, self.z >> 5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPos { x, y, z }
    }

    /// Chunk-local coordinates come from masking the low 4 bits.
    pub fn local_x(self) -> i32 {
        self.x & 15
    }

    pub fn local_z(self) -> i32 {
        self.z & 15
    }
}

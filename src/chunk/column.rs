use crate::chunk::block::{BlockState, FluidState};
use crate::chunk::heightmap::Heightmap;
use crate::chunk::section::{Section, DEFAULT_BIOME};
use crate::host::ColumnView;
use std::sync::Arc;
use surveyor_common::pos::{BlockPos, ChunkPos};
use surveyor_common::shape::WorldShape;

/// A chunk column reconstructed from its stored record: read only,
/// ephemeral, and never written back. There are no mutation entry
/// points on this type at all; the live/loaded case is a separate
/// `Column` variant rather than a subtype of anything mutable.
#[derive(Debug)]
pub struct DecodedColumn {
    pos: ChunkPos,
    shape: WorldShape,
    sections: Vec<Option<Section>>,
    heightmap: Heightmap,
}

impl DecodedColumn {
    /// `sections` is indexed by section slot, bottom first, and must
    /// have exactly `shape.section_count()` entries. The heightmap is
    /// mandatory: a column is never constructed without one.
    pub fn new(
        pos: ChunkPos,
        shape: WorldShape,
        sections: Vec<Option<Section>>,
        heightmap: Heightmap,
    ) -> Self {
        debug_assert_eq!(sections.len(), shape.section_count());
        DecodedColumn {
            pos,
            shape,
            sections,
            heightmap,
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn shape(&self) -> WorldShape {
        self.shape
    }

    fn section_at(&self, y: i32) -> Option<&Section> {
        if !self.shape.contains_y(y) {
            return None;
        }
        let slot = self.shape.section_slot_at(y);
        self.sections.get(slot as usize)?.as_ref()
    }

    /// Biome at the given position, `minecraft:plains` outside populated
    /// sections.
    pub fn biome(&self, pos: BlockPos) -> &str {
        match self.section_at(pos.y) {
            Some(section) => section.biome(pos.local_x(), pos.y & 15, pos.local_z()),
            None => DEFAULT_BIOME,
        }
    }
}

impl ColumnView for DecodedColumn {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        match self.section_at(pos.y) {
            Some(section) if !section.is_empty() => section
                .block_state(pos.local_x(), pos.y & 15, pos.local_z())
                .clone(),
            _ => BlockState::air(),
        }
    }

    fn fluid_state(&self, pos: BlockPos) -> FluidState {
        match self.section_at(pos.y) {
            Some(section) if !section.is_empty() => section
                .block_state(pos.local_x(), pos.y & 15, pos.local_z())
                .fluid_state(),
            _ => FluidState::Empty,
        }
    }

    fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.heightmap.get(x, z)
    }
}

/// How a column reached the renderer: live from the host runtime, or
/// decoded from storage. Selected at the access-session boundary.
#[derive(Clone)]
pub enum Column {
    Live(Arc<dyn ColumnView>),
    Decoded(Arc<DecodedColumn>),
}

impl Column {
    pub fn block_state(&self, pos: BlockPos) -> BlockState {
        match self {
            Column::Live(view) => view.block_state(pos),
            Column::Decoded(column) => column.block_state(pos),
        }
    }

    pub fn fluid_state(&self, pos: BlockPos) -> FluidState {
        match self {
            Column::Live(view) => view.fluid_state(pos),
            Column::Decoded(column) => column.fluid_state(pos),
        }
    }

    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        match self {
            Column::Live(view) => view.surface_height(x, z),
            Column::Decoded(column) => column.surface_height(x, z),
        }
    }
}

use crate::chunk::block::BlockState;
use surveyor_common::pos::BlockPos;

/// A map material color: a stable id plus the base RGB it paints with.
/// Ids and colors follow the vanilla map palette, which keeps rendered
/// tiles consistent with in-game maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapColor {
    pub id: u8,
    pub rgb: u32,
}

impl MapColor {
    pub const CLEAR: MapColor = MapColor { id: 0, rgb: 0 };
    pub const GRASS: MapColor = MapColor { id: 1, rgb: 0x7FB238 };
    pub const SAND: MapColor = MapColor { id: 2, rgb: 0xF7E9A3 };
    pub const WOOL: MapColor = MapColor { id: 3, rgb: 0xC7C7C7 };
    pub const FIRE: MapColor = MapColor { id: 4, rgb: 0xFF0000 };
    pub const ICE: MapColor = MapColor { id: 5, rgb: 0xA0A0FF };
    pub const METAL: MapColor = MapColor { id: 6, rgb: 0xA7A7A7 };
    pub const PLANT: MapColor = MapColor { id: 7, rgb: 0x007C00 };
    pub const SNOW: MapColor = MapColor { id: 8, rgb: 0xFFFFFF };
    pub const CLAY: MapColor = MapColor { id: 9, rgb: 0xA4A8B8 };
    pub const DIRT: MapColor = MapColor { id: 10, rgb: 0x976D4D };
    pub const STONE: MapColor = MapColor { id: 11, rgb: 0x707070 };
    pub const WATER: MapColor = MapColor { id: 12, rgb: 0x4040FF };
    pub const WOOD: MapColor = MapColor { id: 13, rgb: 0x8F7748 };
    pub const NETHER: MapColor = MapColor { id: 35, rgb: 0x700200 };

    /// Clear materials are skipped by the surface search and paint as
    /// fully transparent pixels.
    pub fn is_clear(self) -> bool {
        self.id == 0
    }
}

/// Channel order of the packed 32-bit pixels a tile is rendered into.
/// Pick whichever matches the target image encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    Argb,
    #[default]
    Abgr,
}

/// Brightness multipliers for the three shade levels plus the fourth
/// slot the vanilla palette reserves.
const SHADE_MULTIPLIERS: [u32; 4] = [180, 220, 255, 135];

/// Packs a material color and shade level into a 32-bit pixel. Clear
/// materials produce a fully transparent pixel regardless of shade.
pub fn render_color(color: MapColor, shade: usize, format: PixelFormat) -> u32 {
    if color.is_clear() {
        return 0;
    }

    let multiplier = SHADE_MULTIPLIERS[shade];
    let r = ((color.rgb >> 16) & 0xFF) * multiplier / 255;
    let g = ((color.rgb >> 8) & 0xFF) * multiplier / 255;
    let b = (color.rgb & 0xFF) * multiplier / 255;

    match format {
        PixelFormat::Argb => 0xFF00_0000 | (r << 16) | (g << 8) | b,
        PixelFormat::Abgr => 0xFF00_0000 | (b << 16) | (g << 8) | r,
    }
}

/// Swaps the red and blue channels of a packed pixel, converting
/// between the two supported formats in either direction.
pub fn swap_channels(pixel: u32) -> u32 {
    (pixel & 0xFF00_FF00) | ((pixel & 0x00FF_0000) >> 16) | ((pixel & 0x0000_00FF) << 16)
}

/// Maps decoded block states to map materials. Supplied by the caller,
/// since the full block-to-material table lives in the host runtime's
/// data and not in this crate.
pub trait BlockClassifier: Send + Sync {
    fn map_color(&self, state: &BlockState, pos: BlockPos) -> MapColor;

    /// Whether the block presents a full solid upward face. Partial
    /// fluid cells rely on this to still paint as fluid.
    fn is_solid_full_face(&self, state: &BlockState) -> bool {
        !state.is_air() && state.fluid_state().is_empty()
    }
}

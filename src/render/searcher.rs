use crate::chunk::block::BlockState;
use crate::render::color::{BlockClassifier, MapColor};
use crate::render::tile::Lump;
use surveyor_common::pos::BlockPos;
use surveyor_common::shape::WorldShape;

/// Downward scan through one column cell for the first block worth
/// painting. One searcher is reused across all 256 cells of a tile;
/// after each search the found height, state and position stay readable
/// until the next one.
pub struct BlockSearcher<'a> {
    classifier: &'a dyn BlockClassifier,
    shape: WorldShape,
    height: i32,
    water_depth: i32,
    pos: BlockPos,
    state: BlockState,
    broke_through: bool,
}

impl<'a> BlockSearcher<'a> {
    pub fn new(classifier: &'a dyn BlockClassifier, shape: WorldShape) -> Self {
        BlockSearcher {
            classifier,
            shape,
            height: shape.min_y,
            water_depth: 0,
            pos: BlockPos::new(0, shape.min_y, 0),
            state: BlockState::air(),
            broke_through: false,
        }
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    pub fn water_depth(&self) -> i32 {
        self.water_depth
    }

    /// Whether the last ceiling-aware search actually escaped the roof.
    pub fn broke_through(&self) -> bool {
        self.broke_through
    }

    pub fn is_visible_fluid(&self) -> bool {
        !self.state.fluid_state().is_empty()
    }

    pub fn map_color(&self) -> MapColor {
        self.classifier.map_color(&self.state, self.pos)
    }

    /// Finds the first non-clear block at or below the surface. An
    /// effectively empty cell (nothing above the floor layer) reports
    /// bedrock at the world floor.
    pub fn search(&mut self, lump: &Lump, x: i32, z: i32) {
        self.broke_through = false;
        self.height = lump.column().surface_height(x & 15, z & 15);
        self.pos = BlockPos::new(lump.global_x(x), self.height, lump.global_z(z));

        if self.height <= self.shape.min_y + 1 {
            self.height = self.shape.min_y;
            self.pos.y = self.height;
            self.state = BlockState::bedrock();
            return;
        }

        loop {
            self.height -= 1;
            self.pos.y = self.height;
            self.state = lump.column().block_state(self.pos);

            if !self.map_color().is_clear() || self.height <= self.shape.min_y {
                return;
            }
        }
    }

    /// Ceiling-aware variant for roofed dimensions: first tunnels
    /// through the solid roof, then looks for terrain the way `search`
    /// does. A cell that is solid all the way down reverts to the
    /// original roof block, with `broke_through` false.
    pub fn search_under_ceiling(&mut self, lump: &Lump, x: i32, z: i32) {
        self.height = lump.column().surface_height(x & 15, z & 15) - 1;
        let initial_height = self.height;
        self.pos = BlockPos::new(lump.global_x(x), self.height, lump.global_z(z));

        let first_state = lump.column().block_state(self.pos);
        self.state = first_state.clone();
        self.broke_through = first_state.is_air();

        while (!self.broke_through || self.map_color().is_clear())
            && self.height > self.shape.min_y
        {
            self.height -= 1;
            self.pos.y = self.height;
            self.state = lump.column().block_state(self.pos);

            if self.state.is_air() {
                self.broke_through = true;
            }
        }

        if !self.broke_through {
            self.state = first_state;
            self.height = initial_height;
            self.pos.y = initial_height;
        }
    }

    /// Counts consecutive fluid cells beneath the found block, surface
    /// cell included. When the found block is itself a partial fluid
    /// cell, it is substituted by the fluid's solid-equivalent render
    /// block so the pixel still paints as fluid.
    pub fn calculate_water_depth(&mut self, lump: &Lump) {
        let mut test_height = self.height - 1;
        let mut test_pos = self.pos;
        self.water_depth = 0;

        loop {
            test_pos.y = test_height;
            test_height -= 1;
            let below = lump.column().block_state(test_pos);
            self.water_depth += 1;

            if test_height <= self.shape.min_y || below.fluid_state().is_empty() {
                break;
            }
        }

        let fluid = self.state.fluid_state();
        if !fluid.is_empty() && !self.classifier.is_solid_full_face(&self.state) {
            self.state = fluid.block_state();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::chunk::block::FluidState;
    use crate::chunk::column::Column;
    use crate::host::ColumnView;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Sparse column backed by a coordinate map, with the surface
    /// heightmap derived from the stored blocks.
    pub(crate) struct MockColumn {
        blocks: HashMap<(i32, i32, i32), BlockState>,
        shape: WorldShape,
    }

    impl MockColumn {
        pub(crate) fn new(shape: WorldShape) -> Self {
            MockColumn {
                blocks: HashMap::new(),
                shape,
            }
        }

        pub(crate) fn set(&mut self, x: i32, y: i32, z: i32, name: &str) {
            self.blocks.insert((x, y, z), BlockState::new(name));
        }

        pub(crate) fn fill(&mut self, x: i32, z: i32, from_y: i32, to_y: i32, name: &str) {
            for y in from_y..=to_y {
                self.set(x, y, z, name);
            }
        }
    }

    impl ColumnView for MockColumn {
        fn block_state(&self, pos: BlockPos) -> BlockState {
            self.blocks
                .get(&(pos.local_x(), pos.y, pos.local_z()))
                .cloned()
                .unwrap_or_else(BlockState::air)
        }

        fn fluid_state(&self, pos: BlockPos) -> FluidState {
            self.block_state(pos).fluid_state()
        }

        fn surface_height(&self, x: i32, z: i32) -> i32 {
            let top = self
                .blocks
                .iter()
                .filter(|((bx, _, bz), state)| *bx == (x & 15) && *bz == (z & 15) && !state.is_air())
                .map(|((_, y, _), _)| *y)
                .max();
            match top {
                Some(y) => y + 1,
                None => self.shape.min_y,
            }
        }
    }

    pub(crate) struct TestClassifier;

    impl BlockClassifier for TestClassifier {
        fn map_color(&self, state: &BlockState, _pos: BlockPos) -> MapColor {
            match state.name().strip_prefix("minecraft:").unwrap_or(state.name()) {
                "air" | "cave_air" | "void_air" => MapColor::CLEAR,
                "water" | "kelp" | "seagrass" => MapColor::WATER,
                "grass_block" => MapColor::GRASS,
                "sand" => MapColor::SAND,
                "stone" | "bedrock" => MapColor::STONE,
                "netherrack" => MapColor::NETHER,
                _ => MapColor::DIRT,
            }
        }
    }

    fn lump_of(column: MockColumn) -> Lump {
        Lump::new(
            Column::Live(Arc::new(column) as Arc<dyn ColumnView>),
            0,
            0,
        )
    }

    #[test]
    fn test_search_finds_surface_block() {
        let mut column = MockColumn::new(WorldShape::overworld());
        column.set(0, -64, 0, "minecraft:bedrock");
        column.set(0, 10, 0, "minecraft:stone");
        column.set(1, -64, 1, "minecraft:bedrock");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, WorldShape::overworld());

        searcher.search(&lump, 0, 0);
        assert_eq!(searcher.height(), 10);
        assert_eq!(searcher.state().name(), "minecraft:stone");

        // only a floor layer: reported as bedrock at the world floor
        searcher.search(&lump, 1, 1);
        assert_eq!(searcher.height(), -64);
        assert_eq!(searcher.state().name(), "minecraft:bedrock");
    }

    #[test]
    fn test_search_empty_cell_reports_floor() {
        let lump = lump_of(MockColumn::new(WorldShape::overworld()));
        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, WorldShape::overworld());

        searcher.search(&lump, 5, 5);
        assert_eq!(searcher.height(), -64);
        assert_eq!(searcher.state().name(), "minecraft:bedrock");
    }

    #[test]
    fn test_ceiling_search_breaks_through_roof() {
        let shape = WorldShape::nether();
        let mut column = MockColumn::new(shape);
        // roof 40..=50, open air 21..=39, grass at 20, solid below
        column.fill(0, 0, 40, 50, "minecraft:netherrack");
        column.set(0, 20, 0, "minecraft:grass_block");
        column.fill(0, 0, 0, 19, "minecraft:netherrack");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, shape);
        searcher.search_under_ceiling(&lump, 0, 0);

        assert!(searcher.broke_through());
        assert_eq!(searcher.height(), 20);
        assert_eq!(searcher.state().name(), "minecraft:grass_block");
    }

    #[test]
    fn test_ceiling_search_solid_column_reverts() {
        let shape = WorldShape::nether();
        let mut column = MockColumn::new(shape);
        column.fill(3, 3, 0, 50, "minecraft:netherrack");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, shape);
        searcher.search_under_ceiling(&lump, 3, 3);

        assert!(!searcher.broke_through());
        // the original probed roof cell, one below the surface
        assert_eq!(searcher.height(), 50);
        assert_eq!(searcher.state().name(), "minecraft:netherrack");
    }

    #[test]
    fn test_ceiling_search_open_sky_matches_plain_search() {
        let shape = WorldShape::overworld();
        let mut column = MockColumn::new(shape);
        column.set(4, 12, 7, "minecraft:grass_block");
        column.fill(4, 7, -64, 11, "minecraft:stone");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut plain = BlockSearcher::new(&classifier, shape);
        plain.search(&lump, 4, 7);

        let mut ceiling = BlockSearcher::new(&classifier, shape);
        ceiling.search_under_ceiling(&lump, 4, 7);

        assert_eq!(plain.height(), ceiling.height());
        assert_eq!(plain.state(), ceiling.state());
    }

    #[test]
    fn test_water_depth_counts_fluid_run() {
        let shape = WorldShape::overworld();
        let mut column = MockColumn::new(shape);
        // 5 water cells at 60..=64 over sand
        column.fill(0, 0, 60, 64, "minecraft:water");
        column.set(0, 59, 0, "minecraft:sand");
        column.fill(0, 0, -64, 58, "minecraft:stone");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, shape);
        searcher.search(&lump, 0, 0);
        assert!(searcher.is_visible_fluid());

        searcher.calculate_water_depth(&lump);
        assert!(searcher.water_depth() >= 5);
    }

    #[test]
    fn test_water_depth_terminates_at_floor() {
        let shape = WorldShape::overworld();
        let mut column = MockColumn::new(shape);
        column.fill(0, 0, -64, 64, "minecraft:water");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, shape);
        searcher.search(&lump, 0, 0);
        searcher.calculate_water_depth(&lump);
        assert!(searcher.water_depth() > 0);
    }

    #[test]
    fn test_partial_fluid_paints_as_fluid() {
        let shape = WorldShape::overworld();
        let mut column = MockColumn::new(shape);
        // kelp is a fluid-carrying plant without a solid full face
        column.set(0, 62, 0, "minecraft:kelp");
        column.fill(0, 0, 58, 61, "minecraft:water");
        column.set(0, 57, 0, "minecraft:sand");
        let lump = lump_of(column);

        let classifier = TestClassifier;
        let mut searcher = BlockSearcher::new(&classifier, shape);
        searcher.search(&lump, 0, 0);
        searcher.calculate_water_depth(&lump);

        assert_eq!(searcher.state().name(), "minecraft:water");
    }
}

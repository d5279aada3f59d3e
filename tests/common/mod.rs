#![allow(dead_code)]

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use surveyor::chunk::block::{BlockState, FluidState};
use surveyor::{BlockClassifier, BlockPos, ChunkPos, ColumnView, MapColor, WorldHost, WorldShape};
use surveyor_nbt::{NbtFile, Tag};

/// Host double backed by in-memory serialized records and optional
/// live columns. Counts storage fetches so tests can assert how often
/// records are actually read.
pub struct MockHost {
    records: Mutex<HashMap<i64, Bytes>>,
    loaded: Mutex<HashMap<i64, Arc<dyn ColumnView>>>,
    fetches: AtomicUsize,
}

impl MockHost {
    pub fn new() -> Self {
        MockHost {
            records: Mutex::new(HashMap::new()),
            loaded: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn put_record(&self, chunk_x: i32, chunk_z: i32, raw: Bytes) {
        self.records
            .lock()
            .unwrap()
            .insert(ChunkPos::new(chunk_x, chunk_z).as_long(), raw);
    }

    pub fn put_loaded(&self, chunk_x: i32, chunk_z: i32, column: Arc<dyn ColumnView>) {
        self.loaded
            .lock()
            .unwrap()
            .insert(ChunkPos::new(chunk_x, chunk_z).as_long(), column);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl WorldHost for MockHost {
    fn is_loaded(&self, chunk_x: i32, chunk_z: i32) -> bool {
        self.loaded
            .lock()
            .unwrap()
            .contains_key(&ChunkPos::new(chunk_x, chunk_z).as_long())
    }

    fn loaded_column(&self, chunk_x: i32, chunk_z: i32) -> Option<Arc<dyn ColumnView>> {
        self.loaded
            .lock()
            .unwrap()
            .get(&ChunkPos::new(chunk_x, chunk_z).as_long())
            .cloned()
    }

    fn fetch_raw_record(
        &self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> BoxFuture<'static, std::io::Result<Option<Bytes>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let record = self
            .records
            .lock()
            .unwrap()
            .get(&ChunkPos::new(chunk_x, chunk_z).as_long())
            .cloned();
        async move { Ok(record) }.boxed()
    }
}

/// Name-based material table covering the handful of blocks the tests
/// place.
pub struct TestClassifier;

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

/// In-memory live column for exercising the loaded-chunk path.
pub struct MemoryColumn {
    blocks: HashMap<(i32, i32, i32), BlockState>,
    shape: WorldShape,
}

impl MemoryColumn {
    pub fn new(shape: WorldShape) -> Self {
        MemoryColumn {
            blocks: HashMap::new(),
            shape,
        }
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, name: &str) {
        self.blocks.insert((x, y, z), BlockState::new(name));
    }

    pub fn fill(&mut self, x: i32, z: i32, from_y: i32, to_y: i32, name: &str) {
        for y in from_y..=to_y {
            self.set(x, y, z, name);
        }
    }
}

impl ColumnView for MemoryColumn {
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
        self.blocks
            .iter()
            .filter(|((bx, _, bz), state)| *bx == (x & 15) && *bz == (z & 15) && !state.is_air())
            .map(|((_, y, _), _)| *y)
            .max()
            .map(|top| top + 1)
            .unwrap_or(self.shape.min_y)
    }
}

/// Builds serialized chunk records in the modern on-disk layout:
/// paletted sections under "sections", zlib-framed NBT.
pub struct ChunkRecordBuilder {
    status: String,
    blocks: Vec<(i32, i32, i32, String)>,
}

impl Default for ChunkRecordBuilder {
    fn default() -> Self {
        ChunkRecordBuilder::new()
    }
}

impl ChunkRecordBuilder {
    pub fn new() -> Self {
        ChunkRecordBuilder {
            status: "minecraft:full".to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn block(mut self, x: i32, y: i32, z: i32, name: &str) -> Self {
        self.blocks.push((x, y, z, name.to_string()));
        self
    }

    pub fn fill(mut self, x: i32, z: i32, from_y: i32, to_y: i32, name: &str) -> Self {
        for y in from_y..=to_y {
            self.blocks.push((x, y, z, name.to_string()));
        }
        self
    }

    pub fn layer(mut self, y: i32, name: &str) -> Self {
        for z in 0..16 {
            for x in 0..16 {
                self.blocks.push((x, y, z, name.to_string()));
            }
        }
        self
    }

    pub fn build(self) -> Bytes {
        // group placed blocks by section
        let mut by_section: HashMap<i32, Vec<(usize, String)>> = HashMap::new();
        for (x, y, z, name) in self.blocks {
            let index = (((y & 15) as usize) << 8) | ((z as usize) << 4) | (x as usize);
            by_section
                .entry(y >> 4)
                .or_default()
                .push((index, name));
        }

        let mut sections = Vec::new();
        for (section_y, placed) in by_section {
            let mut palette = vec!["minecraft:air".to_string()];
            let mut values = vec![0u64; 4096];
            for (index, name) in placed {
                let palette_index = match palette.iter().position(|entry| *entry == name) {
                    Some(found) => found,
                    None => {
                        palette.push(name);
                        palette.len() - 1
                    }
                };
                values[index] = palette_index as u64;
            }

            let bits = bits_for(palette.len()).max(4);
            let palette_tags = palette
                .into_iter()
                .map(|name| {
                    let mut entry = HashMap::new();
                    entry.insert("Name".to_string(), Tag::String(name));
                    Tag::Compound(entry)
                })
                .collect();

            let mut block_states = HashMap::new();
            block_states.insert("palette".to_string(), Tag::List(palette_tags));
            block_states.insert("data".to_string(), Tag::LongArray(pack(&values, bits)));

            let mut section = HashMap::new();
            section.insert("Y".to_string(), Tag::Byte(section_y as i8));
            section.insert("block_states".to_string(), Tag::Compound(block_states));
            sections.push(Tag::Compound(section));
        }

        let mut root = HashMap::new();
        root.insert("Status".to_string(), Tag::String(self.status));
        root.insert("sections".to_string(), Tag::List(sections));

        let file = NbtFile::new(String::new(), Tag::Compound(root));
        let mut buf = Vec::new();
        file.write_zlib(&mut buf).unwrap();
        Bytes::from(buf)
    }
}

fn bits_for(palette_len: usize) -> u32 {
    if palette_len <= 1 {
        0
    } else {
        usize::BITS - (palette_len - 1).leading_zeros()
    }
}

fn pack(values: &[u64], bits: u32) -> Vec<i64> {
    let values_per_long = (64 / bits) as usize;
    let mut longs = vec![0u64; values.len().div_ceil(values_per_long)];
    let mask = (1u64 << bits) - 1;

    for (index, &value) in values.iter().enumerate() {
        let shift = (index % values_per_long) as u32 * bits;
        longs[index / values_per_long] |= (value & mask) << shift;
    }

    longs.into_iter().map(|long| long as i64).collect()
}

use crate::cache::LruCache;
use crate::chunk::fetch::{Fetcher, Session};
use crate::host::WorldHost;
use crate::render::color::{BlockClassifier, PixelFormat};
use crate::render::searcher::BlockSearcher;
use crate::render::tile::{render_colors, Lump, PIXELS_PER_TILE};
use crate::world::context::WorldConfig;
use std::sync::{Arc, Mutex};
use surveyor_common::pos::{BlockPos, ChunkPos};
use surveyor_common::shape::WorldShape;

const PRELOAD_CACHE_SIZE: usize = 128;

/// One renderable world: the host handle, the fetch machinery and the
/// render parameters for a single dimension, plus a bounded cache of
/// recently resolved columns so neighbouring tiles do not re-decode the
/// same records.
pub struct Plane {
    id: String,
    shape: WorldShape,
    has_ceiling: bool,
    classifier: Arc<dyn BlockClassifier>,
    pixel_format: PixelFormat,
    session: Session,
    preload_cache: Mutex<LruCache<i64, Arc<Lump>>>,
}

impl Plane {
    pub fn new(
        id: String,
        host: Arc<dyn WorldHost>,
        classifier: Arc<dyn BlockClassifier>,
        config: WorldConfig,
    ) -> Self {
        let fetcher = Arc::new(Fetcher::new(host, config.region_dir, config.shape));
        Plane {
            id,
            shape: config.shape,
            has_ceiling: config.has_ceiling,
            classifier,
            pixel_format: config.pixel_format,
            session: fetcher.session(),
            preload_cache: Mutex::new(LruCache::new(PRELOAD_CACHE_SIZE)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape(&self) -> WorldShape {
        self.shape
    }

    pub fn has_ceiling(&self) -> bool {
        self.has_ceiling
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn classifier(&self) -> &Arc<dyn BlockClassifier> {
        &self.classifier
    }

    /// Synchronous column lookup: serves preloaded columns from the
    /// cache, otherwise only columns resident in the host. Never reads
    /// storage, and never caches what it finds.
    pub fn lump(&self, x: i32, z: i32) -> Option<Arc<Lump>> {
        let key = ChunkPos::new(x, z).as_long();
        if let Some(lump) = self.preload_cache.lock().unwrap().get(&key) {
            return Some(Arc::clone(lump));
        }

        let column = self.session.get_sync(x, z)?;
        Some(Arc::new(Lump::new(column, x, z)))
    }

    /// Resolves a column, reading and decoding its stored record if it
    /// is not resident, and keeps the result in the preload cache.
    pub async fn preload_lump(&self, x: i32, z: i32) -> Option<Arc<Lump>> {
        let key = ChunkPos::new(x, z).as_long();
        if let Some(lump) = self.preload_cache.lock().unwrap().get(&key) {
            return Some(Arc::clone(lump));
        }

        let column = self.session.get_async(x, z).await?;
        let lump = Arc::new(Lump::new(column, x, z));
        self.preload_cache
            .lock()
            .unwrap()
            .insert(key, Arc::clone(&lump));
        Some(lump)
    }

    /// Renders the tile for a chunk from already-resident data.
    pub fn render_tile(&self, x: i32, z: i32) -> Option<[u32; PIXELS_PER_TILE]> {
        let lump = self.lump(x, z)?;
        Some(render_colors(self, &lump))
    }

    /// Renders the tile for a chunk, reading from storage as needed.
    /// The northern neighbour is resolved alongside the target, and
    /// both complete before any pixel is computed.
    pub async fn render_tile_async(&self, x: i32, z: i32) -> Option<[u32; PIXELS_PER_TILE]> {
        let (lump, _north) = futures::join!(self.preload_lump(x, z), self.preload_lump(x, z - 1));
        let lump = lump?;
        Some(render_colors(self, &lump))
    }

    /// Probe for whether a tile has any chunk data at all, at the given
    /// zoom shift.
    pub fn tile_exists(&self, tile_x: i32, tile_z: i32, zoom_shift: i32) -> bool {
        self.session.fetcher().tile_exists(tile_x, tile_z, zoom_shift)
    }

    /// Position of the surface block at the given block coordinates,
    /// ceiling-aware in roofed dimensions. `None` when the column is
    /// not resident.
    pub fn floor_at_block(&self, block_x: i32, block_z: i32) -> Option<BlockPos> {
        let chunk = ChunkPos::at_block(block_x, block_z);
        let lump = self.lump(chunk.x, chunk.z)?;

        let mut searcher = BlockSearcher::new(self.classifier.as_ref(), self.shape);
        if self.has_ceiling {
            searcher.search_under_ceiling(&lump, block_x & 15, block_z & 15);
        } else {
            searcher.search(&lump, block_x & 15, block_z & 15);
        }
        Some(searcher.pos())
    }
}

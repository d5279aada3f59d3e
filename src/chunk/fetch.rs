use crate::chunk::column::{Column, DecodedColumn};
use crate::chunk::decode::{decode_column, parse_record};
use crate::host::WorldHost;
use crate::logger::{log, LogSeverity};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use surveyor_common::error::DecodeError;
use surveyor_common::pos::ChunkPos;
use surveyor_common::shape::WorldShape;

/// At this zoom shift one tile covers exactly one region file.
pub const TILE_TO_REGION_SHIFT: i32 = 5;
/// At zoom shift zero one tile covers exactly one chunk.
pub const TILE_TO_CHUNK_SHIFT: i32 = 0;

/// Right shift that turns into a left shift for negative amounts, so the
/// same expression converts between tile, chunk and region scales at any
/// zoom.
pub fn shift_right_reversible(value: i32, shift: i32) -> i32 {
    if shift >= 0 {
        value >> shift
    } else {
        value << -shift
    }
}

/// Per-world access to chunk columns, live or persisted. Owns the
/// cache of regions known to exist on disk; that cache only grows,
/// since region files are created and never removed.
pub struct Fetcher {
    host: Arc<dyn WorldHost>,
    region_dir: PathBuf,
    shape: WorldShape,
    valid_regions: Mutex<HashSet<i64>>,
}

impl Fetcher {
    pub fn new(host: Arc<dyn WorldHost>, region_dir: PathBuf, shape: WorldShape) -> Self {
        Fetcher {
            host,
            region_dir,
            shape,
            valid_regions: Mutex::new(HashSet::new()),
        }
    }

    pub fn shape(&self) -> WorldShape {
        self.shape
    }

    /// Starts a fetch session: one logical burst of chunk accesses that
    /// shares in-flight decodes and their results.
    pub fn session(self: &Arc<Self>) -> Session {
        Session {
            fetcher: Arc::clone(self),
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn region_file_exists(&self, region_x: i32, region_z: i32) -> bool {
        self.region_dir
            .join(format!("r.{}.{}.mca", region_x, region_z))
            .exists()
    }

    /// Cheap synchronous probe for "does this tile have any data". May
    /// answer `false` for a tile whose chunks exist but would need an
    /// asynchronous storage read to confirm.
    pub fn tile_exists(&self, tile_x: i32, tile_z: i32, zoom_shift: i32) -> bool {
        let region_shift = TILE_TO_REGION_SHIFT - zoom_shift;
        let region_span = shift_right_reversible(1, region_shift).max(1);
        let region_x = shift_right_reversible(tile_x, region_shift);
        let region_z = shift_right_reversible(tile_z, region_shift);

        let mut region_found = false;
        {
            let mut valid = self.valid_regions.lock().unwrap();
            'regions: for off_x in 0..region_span {
                for off_z in 0..region_span {
                    let key = ChunkPos::new(region_x + off_x, region_z + off_z).as_long();
                    if valid.contains(&key) {
                        region_found = true;
                        break 'regions;
                    }
                    if self.region_file_exists(region_x + off_x, region_z + off_z) {
                        valid.insert(key);
                        region_found = true;
                        break 'regions;
                    }
                }
            }
        }
        if !region_found {
            return false;
        }

        // A tile covering one or more whole regions is settled by the
        // region file check alone.
        if shift_right_reversible(1, region_shift) >= 1 {
            return true;
        }

        // Below region scale the tile sits inside a single region, and
        // the answer hinges on its first chunk: loaded means yes, a
        // validated region means yes, and anything else would need an
        // asynchronous storage read this probe cannot perform.
        let chunk_shift = TILE_TO_CHUNK_SHIFT - zoom_shift;
        let chunk_x = shift_right_reversible(tile_x, chunk_shift);
        let chunk_z = shift_right_reversible(tile_z, chunk_shift);

        if self.host.is_loaded(chunk_x, chunk_z) {
            return true;
        }
        let (region_x, region_z) = ChunkPos::new(chunk_x, chunk_z).region();
        let region_key = ChunkPos::new(region_x, region_z).as_long();
        self.valid_regions.lock().unwrap().contains(&region_key)
    }
}

type SharedDecode = Shared<BoxFuture<'static, Option<Arc<DecodedColumn>>>>;

/// One burst of chunk accesses against a fetcher. Concurrent requests
/// for the same column share a single in-flight storage read and
/// decode; entries leave the map as soon as they resolve, so longer
/// term reuse belongs to the caller's bounded cache and a re-saved
/// record is picked up on the next request.
pub struct Session {
    fetcher: Arc<Fetcher>,
    pending: Mutex<HashMap<i64, SharedDecode>>,
}

impl Session {
    pub fn fetcher(&self) -> &Arc<Fetcher> {
        &self.fetcher
    }

    /// Synchronous lookup: only columns already resident in the host
    /// can be returned, storage is never touched.
    pub fn get_sync(&self, chunk_x: i32, chunk_z: i32) -> Option<Column> {
        if self.fetcher.host.is_loaded(chunk_x, chunk_z) {
            // is_loaded can report true before the column is usable
            if let Some(view) = self.fetcher.host.loaded_column(chunk_x, chunk_z) {
                return Some(Column::Live(view));
            }
        }
        None
    }

    /// Lookup that falls back to reading and decoding the stored record
    /// when the column is not resident. Resolves to `None` for columns
    /// that do not exist, are not fully generated, or fail to decode.
    pub async fn get_async(&self, chunk_x: i32, chunk_z: i32) -> Option<Column> {
        if let Some(column) = self.get_sync(chunk_x, chunk_z) {
            return Some(column);
        }

        let pos = ChunkPos::new(chunk_x, chunk_z);
        let shared = {
            let mut pending = self.pending.lock().unwrap();
            pending
                .entry(pos.as_long())
                .or_insert_with(|| {
                    let fetcher = Arc::clone(&self.fetcher);
                    fetch_and_decode(fetcher, pos).boxed().shared()
                })
                .clone()
        };

        let column = shared.await;

        // Drop the entry now that it has resolved, but leave a fresh
        // in-flight future another caller may have raced in.
        {
            let mut pending = self.pending.lock().unwrap();
            if pending
                .get(&pos.as_long())
                .is_some_and(|entry| entry.peek().is_some())
            {
                pending.remove(&pos.as_long());
            }
        }

        column.map(Column::Decoded)
    }
}

async fn fetch_and_decode(fetcher: Arc<Fetcher>, pos: ChunkPos) -> Option<Arc<DecodedColumn>> {
    let raw = match fetcher.host.fetch_raw_record(pos.x, pos.z).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log(
                format!("Failed to read chunk record [{}, {}]: {}", pos.x, pos.z, err),
                LogSeverity::Error,
            );
            return None;
        }
    };

    let root = match parse_record(&raw) {
        Ok(root) => root,
        Err(err) => {
            log(
                format!("Failed to parse chunk record [{}, {}]: {}", pos.x, pos.z, err),
                LogSeverity::Error,
            );
            return None;
        }
    };

    match decode_column(&root, pos, fetcher.shape) {
        Ok(column) => Some(Arc::new(column)),
        Err(DecodeError::NotGenerated) => {
            log(
                format!("Chunk [{}, {}] is not fully generated, skipping", pos.x, pos.z),
                LogSeverity::Debug,
            );
            None
        }
        Err(err) => {
            log(
                format!("Discarding chunk [{}, {}]: {}", pos.x, pos.z, err),
                LogSeverity::Error,
            );
            None
        }
    }
}

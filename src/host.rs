use crate::chunk::block::{BlockState, FluidState};
use bytes::Bytes;
use futures::future::BoxFuture;
use std::sync::Arc;
use surveyor_common::pos::BlockPos;

/// Read-only random access into one chunk column. Implemented by the
/// decoder's reconstructed column and by whatever the host runtime wraps
/// its live columns in; the renderer never needs more than this.
pub trait ColumnView: Send + Sync {
    fn block_state(&self, pos: BlockPos) -> BlockState;

    fn fluid_state(&self, pos: BlockPos) -> FluidState;

    /// One above the topmost non-air Y of the column cell, from the
    /// world-surface heightmap. Cell coordinates are chunk-local.
    fn surface_height(&self, x: i32, z: i32) -> i32;
}

/// The world-management runtime this crate renders against. It owns the
/// live chunks and the storage layer; everything here is consumed at the
/// interface boundary and never reimplemented.
pub trait WorldHost: Send + Sync {
    /// Whether the column is resident in memory. Documented as
    /// occasionally a false positive for "fully usable".
    fn is_loaded(&self, chunk_x: i32, chunk_z: i32) -> bool;

    /// Best-effort access to a live column. Must not block; returns
    /// `None` when `is_loaded` lied and no usable column exists yet.
    fn loaded_column(&self, chunk_x: i32, chunk_z: i32) -> Option<Arc<dyn ColumnView>>;

    /// Fetches the raw serialized record for a column from storage.
    /// Resolves to `Ok(None)` when no record exists on disk.
    fn fetch_raw_record(
        &self,
        chunk_x: i32,
        chunk_z: i32,
    ) -> BoxFuture<'static, std::io::Result<Option<Bytes>>>;
}

use crate::host::WorldHost;
use crate::render::color::{BlockClassifier, PixelFormat};
use crate::render::tile::PIXELS_PER_TILE;
use crate::world::plane::Plane;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use surveyor_common::error::RenderError;
use surveyor_common::shape::WorldShape;

/// Static parameters of one attached world.
pub struct WorldConfig {
    /// Directory holding the world's region files.
    pub region_dir: PathBuf,
    pub shape: WorldShape,
    /// Roofed dimensions get the ceiling-aware surface search.
    pub has_ceiling: bool,
    pub pixel_format: PixelFormat,
}

impl WorldConfig {
    pub fn new(region_dir: PathBuf, shape: WorldShape) -> Self {
        WorldConfig {
            region_dir,
            shape,
            has_ceiling: false,
            pixel_format: PixelFormat::default(),
        }
    }

    pub fn with_ceiling(mut self, has_ceiling: bool) -> Self {
        self.has_ceiling = has_ceiling;
        self
    }

    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }
}

/// Entry point for tile rendering: the set of attached worlds, each
/// with its own host handle and render parameters. Worlds attach and
/// detach explicitly; nothing here is process-global.
#[derive(Default)]
pub struct Surveyor {
    planes: RwLock<HashMap<String, Arc<Plane>>>,
}

impl Surveyor {
    pub fn new() -> Self {
        Surveyor::default()
    }

    /// Registers a world under an identifier, replacing any previous
    /// attachment under the same one.
    pub fn attach_world(
        &self,
        id: &str,
        host: Arc<dyn WorldHost>,
        classifier: Arc<dyn BlockClassifier>,
        config: WorldConfig,
    ) {
        let plane = Arc::new(Plane::new(id.to_string(), host, classifier, config));
        self.planes
            .write()
            .unwrap()
            .insert(id.to_string(), plane);
    }

    pub fn detach_world(&self, id: &str) {
        self.planes.write().unwrap().remove(id);
    }

    pub fn plane(&self, id: &str) -> Option<Arc<Plane>> {
        self.planes.read().unwrap().get(id).cloned()
    }

    fn plane_or_err(&self, id: &str) -> Result<Arc<Plane>, RenderError> {
        self.plane(id)
            .ok_or_else(|| RenderError::UnknownWorld(id.to_string()))
    }

    /// Renders a chunk's tile from already-resident data. A column with
    /// no resolvable data yields an all-transparent tile; only an
    /// unknown world identifier is an error.
    pub fn render_tile(
        &self,
        world: &str,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<[u32; PIXELS_PER_TILE], RenderError> {
        let plane = self.plane_or_err(world)?;
        Ok(plane
            .render_tile(chunk_x, chunk_z)
            .unwrap_or([0u32; PIXELS_PER_TILE]))
    }

    /// Renders a chunk's tile, reading from storage as needed.
    pub async fn render_tile_async(
        &self,
        world: &str,
        chunk_x: i32,
        chunk_z: i32,
    ) -> Result<[u32; PIXELS_PER_TILE], RenderError> {
        let plane = self.plane_or_err(world)?;
        Ok(plane
            .render_tile_async(chunk_x, chunk_z)
            .await
            .unwrap_or([0u32; PIXELS_PER_TILE]))
    }

    /// Cheap probe for whether a tile is worth rendering at all.
    pub fn tile_has_data(
        &self,
        world: &str,
        tile_x: i32,
        tile_z: i32,
        zoom_shift: i32,
    ) -> Result<bool, RenderError> {
        let plane = self.plane_or_err(world)?;
        Ok(plane.tile_exists(tile_x, tile_z, zoom_shift))
    }
}

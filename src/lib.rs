pub mod cache;
pub mod chunk;
pub mod host;
pub mod logger;
pub mod render;
pub mod world;

// Re-export the types callers wire together
pub use chunk::column::{Column, DecodedColumn};
pub use host::{ColumnView, WorldHost};
pub use logger::{log, LogSeverity};
pub use render::color::{render_color, swap_channels, BlockClassifier, MapColor, PixelFormat};
pub use render::tile::{Lump, PIXELS_PER_TILE, TILE_WIDTH};
pub use world::context::{Surveyor, WorldConfig};
pub use world::plane::Plane;

pub use surveyor_common::error::{DecodeError, RenderError};
pub use surveyor_common::pos::{BlockPos, ChunkPos};
pub use surveyor_common::shape::WorldShape;

pub mod error;
pub mod pos;
pub mod shape;

pub use error::{DecodeError, RenderError};
pub use pos::{BlockPos, ChunkPos};
pub use shape::WorldShape;

pub mod block;
pub mod column;
pub mod decode;
pub mod fetch;
pub mod heightmap;
pub mod palette;
pub mod section;
pub mod status;

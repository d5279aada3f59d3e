pub mod color;
pub mod searcher;
pub mod tile;

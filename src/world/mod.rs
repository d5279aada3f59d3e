pub mod context;
pub mod plane;

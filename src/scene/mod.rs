//! Scene module - NES picture plane
//!
//! - Background grid (four nametables) and OAM sprite list
//! - Camera-ray to scene-pixel mapping
//! - Hover resolution across both layers
//! - Persistent selection and palette bank

mod tile;
mod store;
mod mapper;
mod highlight;
mod selection;
mod palette;
mod snapshot;

pub use tile::*;
pub use store::*;
pub use mapper::*;
pub use highlight::*;
pub use selection::*;
pub use palette::*;
pub use snapshot::*;

//! Compositor - turns scene state into backend draw calls

mod backend;
mod frame;
mod mesh;
mod software;

pub use backend::*;
pub use frame::*;
pub use mesh::*;
pub use software::*;

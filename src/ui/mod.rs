//! Input layer

mod input;

pub use input::*;

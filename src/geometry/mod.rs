//! Geometry primitives: affine transforms, arc approximation, absolute path
//! iteration, the canonical path writer and length estimation.

pub mod arc;
pub mod length;
pub mod matrix;
pub mod path;
pub mod writer;

pub use length::{count_commands, estimate_length};
pub use matrix::{parse_transform_list, AffineMatrix};
pub use writer::PathWriter;

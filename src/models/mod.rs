pub mod common;
pub mod image;
pub mod quota;

pub use common::*;
pub use image::*;
pub use quota::*;

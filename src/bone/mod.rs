pub mod id;
pub mod mask;
pub mod tree;

pub use id::*;
pub use mask::*;
pub use tree::*;

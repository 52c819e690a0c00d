pub mod budget;
pub mod compiler;
pub mod matcher;
pub mod overlay;
pub mod render;
pub mod selector;
pub mod timeline;
pub mod trip;

pub use compiler::*;
pub use timeline::*;

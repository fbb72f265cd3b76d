pub mod commands;
pub mod export;
pub mod path;
pub mod pointer;
pub mod queue;
pub mod render;
pub mod state;
pub mod util;

pub use path::{FrozenPath, LivePath};
pub use util::Point;

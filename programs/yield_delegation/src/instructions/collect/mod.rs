pub mod initialize;
pub mod process;

pub use initialize::*;
pub use process::*;

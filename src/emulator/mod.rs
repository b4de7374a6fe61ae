mod installer;
mod runner;

pub use installer::*;
pub use runner::*;

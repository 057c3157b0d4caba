pub mod hierarchy;
pub mod runner;
pub mod traits;

pub use runner::default_runner;

pub mod average;
pub mod config;
pub mod engine;
pub mod sequence;
pub mod strategy;

pub use average::Average;
pub use config::*;
pub use engine::{train, Engine};
pub use mc_gameplay::ErrorKind;
pub use sequence::{SequenceTable, ILLEGAL, LEAF};
pub use strategy::{sample, Strategy};

/// number of worker threads to spawn when the caller has no preference.
pub fn default_thread_count() -> usize {
    num_cpus::get()
}

//! Record/replay of port interactions for offline runs and tests.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::Cassette;

pub mod journal;
pub mod migrate;
pub mod models;

pub use journal::Journal;

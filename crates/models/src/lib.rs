pub mod catalog;
pub mod error;
pub mod review;
pub mod search;
pub mod stats;
pub mod subject;
pub mod viewer;
pub mod wizard;

#[cfg(feature = "database")]
mod value;

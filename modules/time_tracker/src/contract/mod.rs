pub mod client;
pub mod error;
pub mod model;

pub use client::TimeTrackerApi;
pub use error::TimeTrackerError;
pub use model::*;

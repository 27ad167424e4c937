pub mod clock;
pub mod enrichment;
pub mod error;
pub mod hours;
pub mod passport;
pub mod ports;
pub mod repo;
pub mod service;
pub mod tracker;

//! Core business logic abstractions

pub mod config;
pub mod log;
pub mod period;
pub mod rates;
pub mod selection;
pub mod stats;

// Re-export main types for cleaner imports
pub use period::LookbackPeriod;
pub use rates::{Catalog, DateWindow, HistorySeries, RatePoint, RateProvider};
pub use selection::{Amount, Selection};
pub use stats::{Conversion, DerivedView, RateStats};

pub mod chart;
pub mod convert;
pub mod currencies;
pub mod panel;
pub mod setup;
pub mod ui;
pub mod watch;

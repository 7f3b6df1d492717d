pub mod budget;
pub mod calculators;
pub mod currencies;
pub mod setup;
pub mod ui;

pub mod floatrates;

pub use floatrates::FloatRatesProvider;

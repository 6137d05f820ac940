// import modules
mod inverse_probability;
mod margin;
mod ratio;

// make measures public
pub use inverse_probability::InverseProbability;
pub use margin::Margin;
pub use ratio::Ratio;

pub mod core;

pub use self::core::Measure;
pub use self::core::NonConformityMeasure;

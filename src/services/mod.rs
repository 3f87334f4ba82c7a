pub mod classifier;
pub mod decoder;
pub mod detector;
pub mod validation;

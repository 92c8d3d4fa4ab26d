pub mod demo;
pub mod fit;

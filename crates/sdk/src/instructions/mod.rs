pub mod builder;
pub mod sale;

pub use builder::*;
pub use sale::*;

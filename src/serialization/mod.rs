pub mod facade;
pub mod formats;
pub mod options;

pub use facade::*;
pub use formats::*;
pub use options::*;

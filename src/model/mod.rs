pub mod conversion;
pub mod definition;
mod editing;

pub use conversion::*;
pub use definition::*;

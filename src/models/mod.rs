pub mod analysis;
pub mod case;
pub mod document;
pub mod section;

pub use analysis::*;
pub use case::*;
pub use document::*;
pub use section::*;

pub mod backend;
pub mod client;
pub mod gemini;
pub mod prompts;
pub mod retry;
pub mod validation;

pub use backend::*;
pub use client::*;
pub use gemini::*;
pub use prompts::*;
pub use retry::*;
pub use validation::*;

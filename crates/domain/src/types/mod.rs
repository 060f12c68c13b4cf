//! Domain type definitions

pub mod classification;
pub mod goal;
pub mod insights;
pub mod progress;
pub mod session;
pub mod template;

pub use classification::*;
pub use goal::*;
pub use insights::*;
pub use progress::*;
pub use session::*;
pub use template::*;

//! External process plumbing: running formatter tools and probing whether
//! they exist on the search path.

pub mod probe;
pub mod runner;

pub use probe::is_available;
pub use runner::{run, RunOutput};

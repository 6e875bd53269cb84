//! Read-only collaborators the engine consumes: the item catalog and the difficulty settings.

pub mod catalog;
pub mod settings;

pub use catalog::*;
pub use settings::*;

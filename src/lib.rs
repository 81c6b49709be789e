//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates as `blockfall::{core,input,term,types}` and
//! holds the pieces that touch the outside world: environment settings, the
//! high score file and log setup.

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;

pub mod highscore;
pub mod logging;
pub mod settings;

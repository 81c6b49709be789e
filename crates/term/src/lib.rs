//! Terminal "game renderer" module.
//!
//! Renders a [`GameSnapshot`](crate::core::GameSnapshot) into a plain
//! framebuffer of styled characters, then flushes only the changed runs to the
//! terminal. Rendering is pure and unit-tested; only [`TerminalRenderer`]
//! touches the terminal.
//!
//! Board cells are drawn 2 columns wide to compensate for the usual terminal
//! glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{palette, AnchorY, GameView, Viewport, FLASH_MS};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

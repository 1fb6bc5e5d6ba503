//! UI module for the shell TUI

pub mod render;
pub mod theme;

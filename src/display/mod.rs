//! Terminal styling for report output.

pub mod theme;

pub use theme::{THEME, Theme};

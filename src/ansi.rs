//! ANSI escape sequence functionality for 4-bit terminal color output.
//!
//! This module provides the low-level SGR sequence generation used by the
//! [`Ansi`](crate::Ansi) writer. Arbitrary RGB colors are folded onto the
//! 16-color palette before a code is chosen.

use crate::Color;
use crate::palette;
use std::fmt;
use std::io;

/// Resets every SGR attribute.
pub const ANSI_RESET: &str = "\x1B[0m";

/// Formats the SGR sequence selecting `color` on a 16-color terminal.
///
/// If `bg` is true, then the color is treated as a background color.
/// Otherwise, it's treated as a foreground color.
pub fn ansi_code(color: Color, bg: bool) -> String {
    let code = if bg {
        palette::background_code(color)
    } else {
        palette::foreground_code(color)
    };
    format!("\x1B[{code}m")
}

/// Writes the SGR sequence selecting `color` on a 16-color terminal.
///
/// If `bg` is true, then the color is treated as a background color.
/// Otherwise, it's treated as a foreground color.
///
/// The caller must provide their own `io::Write` to write to. Callers should
/// prefer higher level types in this crate, such as
/// [`IoHub`](crate::IoHub).
pub fn ansi_color<W: io::Write>(
    mut wtr: W,
    color: Color,
    bg: bool,
) -> io::Result<()> {
    wtr.write_all(ansi_code(color, bg).as_bytes())
}

/// A convenience function for creating a color pair that can be formatted
/// to an ANSI color string.
pub fn ansi_color_only(fg: Option<Color>, bg: Option<Color>) -> AnsiColor {
    AnsiColor { fg, bg }
}

/// A color pair that can be formatted to an ANSI color string.
///
/// This is created by the `ansi_color_only` function.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnsiColor {
    fg: Option<Color>,
    bg: Option<Color>,
}

impl fmt::Display for AnsiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.fg {
            f.write_str(&ansi_code(c, false))?;
        }
        if let Some(c) = self.bg {
            f.write_str(&ansi_code(c, true))?;
        }
        Ok(())
    }
}

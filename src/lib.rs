/*!
This crate provides a console I/O hub for interactive command line
applications: a single object owning the input, output and error streams of
a session, which writes styled text with optional foreground and background
colors.

Colors are arbitrary RGB values. Terminals are not assumed to support true
color: when colors are enabled, every color is folded onto the nearest entry
of a fixed 16-color palette and written as a 4-bit ANSI SGR sequence. When
colors are disabled, text is written verbatim.

# Organization

`PrintUnit` is a piece of text with its colors. `IoHub` writes units to its
streams, through either the `NoColor` or the `Ansi` writer, picked once at
construction from the `ColorChoice` in a `HubConfig`.

The `WriteStyled` trait is the contract both writers satisfy. A writer turns
a unit into an ordered list of fragments, and each fragment is written to the
stream as its own write. The blocking (`std::io::Write`) and async
(`tokio::io::AsyncWrite`) paths share that fragment list.

The `palette` module holds the nearest-color search and the SGR code table.

# Example: writing to standard output

```rust,no_run
# fn test() -> iohub::Result<()> {
use iohub::{Color, ColorChoice, HubConfig, IoHub, OutputType, PrintUnit};

let mut config = HubConfig::new();
config.set_color_choice(ColorChoice::Always);
let mut hub = IoHub::stdio(config);
hub.write(&PrintUnit::new("orange-ish text").fg(Color::new(250, 160, 20)))?;
hub.write_line("all good", OutputType::AllOk)?;
hub.flush()?;
# Ok(()) }
```
*/

pub mod ansi;
mod config;
mod error;
mod hub;
pub mod palette;
mod traits;
mod types;
mod writers;

pub use ansi::{ANSI_RESET, AnsiColor, ansi_color, ansi_color_only};
pub use config::{
    COLOR_ENV, HubConfig, PromptContext, PromptFormatter,
    default_prompt_formatter,
};
pub use error::{HubError, Result};
pub use hub::{IoHub, StdioHub, TokioStdioHub};
pub use palette::PaletteEntry;
pub use traits::WriteStyled;
pub use types::{
    Color, ColorChoice, ColorChoiceParseError, ColorSetting, ConsoleColor,
    OutputType, ParseColorError, PrintUnit, Tier,
};
pub use writers::{Ansi, NoColor, Writer};

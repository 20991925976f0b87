use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// ColorChoice represents the color preferences of an end user.
///
/// The `Default` implementation for this type will select `Auto`, which tries
/// to do the right thing based on the current environment.
///
/// The `FromStr` implementation for this type converts a lowercase kebab-case
/// string of the variant name to the corresponding variant. Any other string
/// results in an error.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorChoice {
    /// Try very hard to emit colors. This includes enabling virtual terminal
    /// processing on Windows consoles.
    Always,
    /// AlwaysAnsi is like Always, except it never touches the console mode
    /// and emits ANSI color codes unconditionally.
    AlwaysAnsi,
    /// Try to use colors, but don't force the issue. If `TERM` is unset or
    /// `dumb`, or if `NO_COLOR` is defined, then don't use colors.
    #[default]
    Auto,
    /// Never emit colors.
    Never,
}

impl FromStr for ColorChoice {
    type Err = ColorChoiceParseError;

    fn from_str(s: &str) -> Result<ColorChoice, ColorChoiceParseError> {
        match s.to_lowercase().as_str() {
            "always" => Ok(ColorChoice::Always),
            "always-ansi" => Ok(ColorChoice::AlwaysAnsi),
            "never" => Ok(ColorChoice::Never),
            "auto" => Ok(ColorChoice::Auto),
            unknown => Err(ColorChoiceParseError {
                unknown_choice: unknown.to_string(),
            }),
        }
    }
}

impl ColorChoice {
    /// Returns true if we should attempt to write colored output.
    pub(crate) fn should_attempt_color(&self) -> bool {
        match *self {
            ColorChoice::Always => true,
            ColorChoice::AlwaysAnsi => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.env_allows_color(),
        }
    }

    #[cfg(not(windows))]
    fn env_allows_color(&self) -> bool {
        match env::var_os("TERM") {
            // If TERM isn't set, then we are in a weird environment that
            // probably doesn't support colors.
            None => return false,
            Some(k) => {
                if k == "dumb" {
                    return false;
                }
            }
        }
        env::var_os("NO_COLOR").is_none()
    }

    #[cfg(windows)]
    fn env_allows_color(&self) -> bool {
        // Windows consoles rarely set TERM, so its absence says nothing.
        if let Some(k) = env::var_os("TERM") {
            if k == "dumb" {
                return false;
            }
        }
        env::var_os("NO_COLOR").is_none()
    }

    /// Returns true if this choice should emit ANSI codes even when virtual
    /// terminal processing could not be enabled.
    #[cfg(windows)]
    pub(crate) fn should_force_ansi(&self) -> bool {
        match *self {
            ColorChoice::Always => false,
            ColorChoice::AlwaysAnsi => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => match env::var("TERM") {
                Ok(term) => term != "dumb" && term != "cygwin",
                Err(_) => false,
            },
        }
    }
}

/// An error that occurs when parsing a `ColorChoice` fails.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error(
    "unrecognized color choice '{unknown_choice}': valid choices are: \
     always, always-ansi, never, auto"
)]
pub struct ColorChoiceParseError {
    unknown_choice: String,
}

impl ColorChoiceParseError {
    /// Return the string that couldn't be parsed as a valid color choice.
    pub fn invalid_choice(&self) -> &str {
        &self.unknown_choice
    }
}

/// The output tier a hub settled on at construction.
///
/// The tier is never re-evaluated per write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    /// Text is written verbatim and colors are dropped.
    Plain,
    /// Colors are folded onto the 16-color palette and written as SGR codes.
    Ansi4Bit,
}

/// An RGB color with 8-bit channels.
///
/// This type has a `FromStr` impl that can parse colors from their human
/// readable form. The format is as follows:
///
/// 1. Any of the 16 console color names, matched case insensitively and with
///    `-` or `_` allowed between words (`dark-gray`, `DarkGray`).
/// 2. A `#rrggbb` hexadecimal literal.
/// 3. A triple of 8-bit integers separated by a comma, where each integer is
///    in decimal or hexadecimal format. Hexadecimal numbers are written with
///    a `0x` prefix.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[allow(missing_docs)]
impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const DARK_BLUE: Color = Color::new(0, 0, 139);
    pub const DARK_GREEN: Color = Color::new(0, 100, 0);
    pub const DARK_CYAN: Color = Color::new(0, 139, 139);
    pub const DARK_RED: Color = Color::new(139, 0, 0);
    pub const DARK_MAGENTA: Color = Color::new(139, 0, 139);
    pub const DARK_YELLOW: Color = Color::new(255, 165, 0);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(169, 169, 169);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GREEN: Color = Color::new(0, 128, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
}

impl Color {
    /// Create a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Parses a numeric color string, either `#rrggbb` or `r,g,b`.
    fn from_str_numeric(s: &str) -> Result<Color, ParseColorError> {
        fn parse_number(s: &str) -> Option<u8> {
            let s = s.trim();
            if s.starts_with('+') {
                return None;
            }
            if let Some(hex_str) = s.strip_prefix("0x") {
                if hex_str.starts_with('+') {
                    return None;
                }
                u8::from_str_radix(hex_str, 16).ok()
            } else {
                s.parse::<u8>().ok()
            }
        }

        if let Some(hex) = s.strip_prefix('#') {
            let err = || ParseColorError {
                kind: ParseColorErrorKind::InvalidHex,
                given: s.to_string(),
            };
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err())
            };
            return Ok(Color::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let codes: Vec<&str> = s.split(',').collect();
        if codes.len() == 3 {
            let mut v = [0u8; 3];
            for (slot, code) in v.iter_mut().zip(codes) {
                *slot = parse_number(code).ok_or_else(|| ParseColorError {
                    kind: ParseColorErrorKind::InvalidRgb,
                    given: s.to_string(),
                })?;
            }
            Ok(Color::new(v[0], v[1], v[2]))
        } else if s.contains(',') {
            Err(ParseColorError {
                kind: ParseColorErrorKind::InvalidRgb,
                given: s.to_string(),
            })
        } else {
            Err(ParseColorError {
                kind: ParseColorErrorKind::InvalidName,
                given: s.to_string(),
            })
        }
    }
}

impl From<ConsoleColor> for Color {
    fn from(cc: ConsoleColor) -> Color {
        cc.rgb()
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Color, ParseColorError> {
        match ConsoleColor::from_name(s) {
            Some(cc) => Ok(cc.rgb()),
            None => Color::from_str_numeric(s),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// An error from parsing an invalid color specification.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{kind} '{given}'")]
pub struct ParseColorError {
    kind: ParseColorErrorKind,
    given: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum ParseColorErrorKind {
    InvalidName,
    InvalidHex,
    InvalidRgb,
}

impl fmt::Display for ParseColorErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ParseColorErrorKind::*;
        match *self {
            InvalidName => f.write_str(
                "unrecognized color name, choose one of the 16 console \
                 colors (black, dark-blue, ..., white)",
            ),
            InvalidHex => {
                f.write_str("invalid hex color, should be '#rrggbb', but is")
            }
            InvalidRgb => f.write_str(
                "unrecognized RGB color triple, should be \
                 '[0-255],[0-255],[0-255]' (or a hex triple), but is",
            ),
        }
    }
}

impl ParseColorError {
    /// Return the string that couldn't be parsed as a valid color.
    pub fn invalid(&self) -> &str {
        &self.given
    }
}

/// The 16 named terminal colors.
///
/// Declaration order is the palette enumeration order; nearest-color ties
/// resolve to whichever entry comes first.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConsoleColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl ConsoleColor {
    /// Every console color, in palette enumeration order.
    pub const ALL: [ConsoleColor; 16] = [
        ConsoleColor::Black,
        ConsoleColor::DarkBlue,
        ConsoleColor::DarkGreen,
        ConsoleColor::DarkCyan,
        ConsoleColor::DarkRed,
        ConsoleColor::DarkMagenta,
        ConsoleColor::DarkYellow,
        ConsoleColor::Gray,
        ConsoleColor::DarkGray,
        ConsoleColor::Blue,
        ConsoleColor::Green,
        ConsoleColor::Cyan,
        ConsoleColor::Red,
        ConsoleColor::Magenta,
        ConsoleColor::Yellow,
        ConsoleColor::White,
    ];

    /// The RGB value this name stands for in the palette.
    pub const fn rgb(self) -> Color {
        match self {
            ConsoleColor::Black => Color::BLACK,
            ConsoleColor::DarkBlue => Color::DARK_BLUE,
            ConsoleColor::DarkGreen => Color::DARK_GREEN,
            ConsoleColor::DarkCyan => Color::DARK_CYAN,
            ConsoleColor::DarkRed => Color::DARK_RED,
            ConsoleColor::DarkMagenta => Color::DARK_MAGENTA,
            ConsoleColor::DarkYellow => Color::DARK_YELLOW,
            ConsoleColor::Gray => Color::GRAY,
            ConsoleColor::DarkGray => Color::DARK_GRAY,
            ConsoleColor::Blue => Color::BLUE,
            ConsoleColor::Green => Color::GREEN,
            ConsoleColor::Cyan => Color::CYAN,
            ConsoleColor::Red => Color::RED,
            ConsoleColor::Magenta => Color::MAGENTA,
            ConsoleColor::Yellow => Color::YELLOW,
            ConsoleColor::White => Color::WHITE,
        }
    }

    /// The SGR foreground code for this name.
    ///
    /// This table is not arithmetic: `Gray` is bright black (90) and
    /// `DarkGray` is plain white (37).
    pub const fn foreground_code(self) -> u8 {
        match self {
            ConsoleColor::Black => 30,
            ConsoleColor::DarkBlue => 34,
            ConsoleColor::DarkGreen => 32,
            ConsoleColor::DarkCyan => 36,
            ConsoleColor::DarkRed => 31,
            ConsoleColor::DarkMagenta => 35,
            ConsoleColor::DarkYellow => 33,
            ConsoleColor::Gray => 90,
            ConsoleColor::DarkGray => 37,
            ConsoleColor::Blue => 94,
            ConsoleColor::Green => 92,
            ConsoleColor::Cyan => 96,
            ConsoleColor::Red => 91,
            ConsoleColor::Magenta => 95,
            ConsoleColor::Yellow => 93,
            ConsoleColor::White => 97,
        }
    }

    /// The SGR background code for this name.
    pub const fn background_code(self) -> u8 {
        self.foreground_code() + 10
    }

    /// The canonical name, e.g. `DarkYellow`.
    pub const fn name(self) -> &'static str {
        match self {
            ConsoleColor::Black => "Black",
            ConsoleColor::DarkBlue => "DarkBlue",
            ConsoleColor::DarkGreen => "DarkGreen",
            ConsoleColor::DarkCyan => "DarkCyan",
            ConsoleColor::DarkRed => "DarkRed",
            ConsoleColor::DarkMagenta => "DarkMagenta",
            ConsoleColor::DarkYellow => "DarkYellow",
            ConsoleColor::Gray => "Gray",
            ConsoleColor::DarkGray => "DarkGray",
            ConsoleColor::Blue => "Blue",
            ConsoleColor::Green => "Green",
            ConsoleColor::Cyan => "Cyan",
            ConsoleColor::Red => "Red",
            ConsoleColor::Magenta => "Magenta",
            ConsoleColor::Yellow => "Yellow",
            ConsoleColor::White => "White",
        }
    }

    /// Looks up a name ignoring case, `-` and `_`.
    fn from_name(s: &str) -> Option<ConsoleColor> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        ConsoleColor::ALL
            .into_iter()
            .find(|cc| cc.name().eq_ignore_ascii_case(&folded))
    }
}

impl fmt::Display for ConsoleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A piece of text along with the colors it should be written in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PrintUnit {
    pub text: String,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl PrintUnit {
    /// Create an unstyled unit.
    pub fn new(text: impl Into<String>) -> PrintUnit {
        PrintUnit { text: text.into(), foreground: None, background: None }
    }

    /// Set the foreground color.
    pub fn fg(mut self, color: impl Into<Color>) -> PrintUnit {
        self.foreground = Some(color.into());
        self
    }

    /// Set the background color.
    pub fn bg(mut self, color: impl Into<Color>) -> PrintUnit {
        self.background = Some(color.into());
        self
    }

    /// Returns true if either color is set.
    pub fn is_styled(&self) -> bool {
        self.foreground.is_some() || self.background.is_some()
    }
}

impl From<&str> for PrintUnit {
    fn from(text: &str) -> PrintUnit {
        PrintUnit::new(text)
    }
}

impl From<String> for PrintUnit {
    fn from(text: String) -> PrintUnit {
        PrintUnit::new(text)
    }
}

/// What a line of output means, used to pick its color from a
/// [`ColorSetting`].
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OutputType {
    #[default]
    Default,
    Prompt,
    Error,
    AllOk,
    Title,
    Info,
    System,
    Warning,
}

/// The color theme of a hub.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColorSetting {
    pub default: Color,
    pub prompt: Color,
    pub error: Color,
    pub all_ok: Color,
    pub title: Color,
    pub info: Color,
    pub system: Color,
    pub warning: Color,
    pub background: Option<Color>,
}

impl Default for ColorSetting {
    fn default() -> ColorSetting {
        ColorSetting {
            default: Color::WHITE,
            prompt: Color::MAGENTA,
            error: Color::RED,
            all_ok: Color::GREEN,
            title: Color::YELLOW,
            info: Color::DARK_CYAN,
            system: Color::DARK_YELLOW,
            warning: Color::DARK_YELLOW,
            background: None,
        }
    }
}

impl ColorSetting {
    /// The foreground color for the given kind of output.
    pub fn color_of(&self, kind: OutputType) -> Color {
        match kind {
            OutputType::Default => self.default,
            OutputType::Prompt => self.prompt,
            OutputType::Error => self.error,
            OutputType::AllOk => self.all_ok,
            OutputType::Title => self.title,
            OutputType::Info => self.info,
            OutputType::System => self.system,
            OutputType::Warning => self.warning,
        }
    }

    /// Wrap `text` in a unit colored for `kind`.
    pub fn paint(&self, text: impl Into<String>, kind: OutputType) -> PrintUnit {
        let unit = PrintUnit::new(text).fg(self.color_of(kind));
        match self.background {
            Some(bg) => unit.bg(bg),
            None => unit,
        }
    }
}

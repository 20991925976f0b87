//! Nearest-color matching against the fixed 16-color terminal palette.
//!
//! Terminals without true-color support only understand the 16 classic SGR
//! colors. Every RGB color handed to the 4-bit tier is folded onto the entry
//! of [`PALETTE`] closest to it by squared Euclidean distance in RGB space.

use crate::{Color, ConsoleColor};

/// One named entry of the terminal palette.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaletteEntry {
    pub name: ConsoleColor,
    pub rgb: Color,
}

macro_rules! palette {
    ($($name:ident),+ $(,)?) => {
        [$(PaletteEntry {
            name: ConsoleColor::$name,
            rgb: ConsoleColor::$name.rgb(),
        }),+]
    };
}

/// The palette, in enumeration order.
///
/// Order matters: when two entries are equally close to a color, the earlier
/// one wins.
pub static PALETTE: [PaletteEntry; 16] = palette![
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
];

/// Squared Euclidean distance between two colors.
#[inline]
pub fn distance(a: Color, b: Color) -> u32 {
    let d = |x: u8, y: u8| {
        let d = u32::from(x.abs_diff(y));
        d * d
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
}

/// Returns the palette name closest to `target`.
///
/// An exact match returns immediately. Otherwise the first entry reaching
/// the minimum distance wins.
pub fn resolve(target: Color) -> ConsoleColor {
    let mut best = PALETTE[0].name;
    let mut delta = u32::MAX;
    for entry in PALETTE.iter() {
        let t = distance(entry.rgb, target);
        if t == 0 {
            return entry.name;
        }
        if t < delta {
            delta = t;
            best = entry.name;
        }
    }
    tracing::trace!(
        color = %target,
        resolved = %best,
        distance = delta,
        "color folded onto palette"
    );
    best
}

/// The SGR foreground code for the palette entry closest to `target`.
pub fn foreground_code(target: Color) -> u8 {
    resolve(target).foreground_code()
}

/// The SGR background code for the palette entry closest to `target`.
pub fn background_code(target: Color) -> u8 {
    resolve(target).background_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn palette_matches_enumeration_order() {
        let names: Vec<ConsoleColor> = PALETTE.iter().map(|e| e.name).collect();
        assert_eq!(names, ConsoleColor::ALL);
    }

    #[test]
    fn exact_palette_colors_resolve_to_themselves() {
        for entry in PALETTE.iter() {
            assert_eq!(resolve(entry.rgb), entry.name);
        }
    }

    #[test]
    fn reference_points() {
        assert_eq!(resolve(Color::new(0, 0, 0)), ConsoleColor::Black);
        assert_eq!(resolve(Color::new(255, 255, 255)), ConsoleColor::White);
        assert_eq!(resolve(Color::new(128, 128, 128)), ConsoleColor::Gray);
        assert_eq!(resolve(Color::new(200, 0, 0)), ConsoleColor::Red);
        assert_eq!(resolve(Color::new(100, 0, 0)), ConsoleColor::DarkRed);
        assert_eq!(resolve(Color::new(148, 148, 148)), ConsoleColor::Gray);
        assert_eq!(resolve(Color::new(149, 149, 149)), ConsoleColor::DarkGray);
        assert_eq!(resolve(Color::new(200, 100, 0)), ConsoleColor::DarkYellow);
        assert_eq!(resolve(Color::new(20, 200, 200)), ConsoleColor::Cyan);
    }

    #[test]
    fn ties_go_to_the_earlier_entry() {
        // 2500 from both Black and DarkGreen.
        assert_eq!(resolve(Color::new(0, 50, 0)), ConsoleColor::Black);
        // 196 from both DarkGreen and Green.
        assert_eq!(resolve(Color::new(0, 114, 0)), ConsoleColor::DarkGreen);
        // 3364 from both DarkBlue and Blue.
        assert_eq!(resolve(Color::new(0, 0, 197)), ConsoleColor::DarkBlue);
    }

    #[test]
    fn codes_follow_the_table() {
        assert_eq!(foreground_code(Color::RED), 91);
        assert_eq!(background_code(Color::BLUE), 104);
        assert_eq!(foreground_code(Color::DARK_GRAY), 37);
        assert_eq!(foreground_code(Color::GRAY), 90);
        assert_eq!(background_code(Color::new(1, 1, 1)), 40);
    }

    fn color() -> impl Strategy<Value = Color> {
        any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::new(r, g, b))
    }

    proptest! {
        #[test]
        fn resolve_is_first_minimum(c in color()) {
            let got = resolve(c);
            let min = PALETTE.iter().map(|e| distance(e.rgb, c)).min().unwrap();
            let first = PALETTE.iter().find(|e| distance(e.rgb, c) == min).unwrap();
            prop_assert_eq!(got, first.name);
        }

        #[test]
        fn background_is_foreground_plus_ten(c in color()) {
            prop_assert_eq!(background_code(c), foreground_code(c) + 10);
        }

        #[test]
        fn distance_is_symmetric(a in color(), b in color()) {
            prop_assert_eq!(distance(a, b), distance(b, a));
        }
    }
}

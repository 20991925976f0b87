use crate::ansi::{self, ANSI_RESET};
use crate::{PrintUnit, Tier, WriteStyled};
use std::borrow::Cow;

/// Satisfies `WriteStyled` but ignores all color options.
#[derive(Clone, Debug)]
pub struct NoColor<W>(pub W);

impl<W> NoColor<W> {
    /// Create a new writer that satisfies `WriteStyled` but drops all color
    /// information.
    pub fn new(wtr: W) -> NoColor<W> {
        NoColor(wtr)
    }

    /// Consume this `NoColor` value and return the inner writer.
    pub fn into_inner(self) -> W {
        self.0
    }

    /// Return a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.0
    }
}

impl<W> WriteStyled for NoColor<W> {
    type Inner = W;

    #[inline]
    fn supports_color(&self) -> bool {
        false
    }

    #[inline]
    fn fragments<'a>(&self, unit: &'a PrintUnit) -> Vec<Cow<'a, str>> {
        vec![Cow::Borrowed(unit.text.as_str())]
    }

    #[inline]
    fn get_mut(&mut self) -> &mut W {
        &mut self.0
    }
}

/// Satisfies `WriteStyled` using 4-bit ANSI escape sequences.
///
/// Colors are folded onto the 16-color palette. A styled unit is written as
/// foreground, background, text and reset, each as its own write.
#[derive(Clone, Debug)]
pub struct Ansi<W>(pub W);

impl<W> Ansi<W> {
    /// Create a new writer that satisfies `WriteStyled` using 4-bit ANSI
    /// escape sequences.
    pub fn new(wtr: W) -> Ansi<W> {
        Ansi(wtr)
    }

    /// Consume this `Ansi` value and return the inner writer.
    pub fn into_inner(self) -> W {
        self.0
    }

    /// Return a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.0
    }
}

impl<W> WriteStyled for Ansi<W> {
    type Inner = W;

    #[inline]
    fn supports_color(&self) -> bool {
        true
    }

    fn fragments<'a>(&self, unit: &'a PrintUnit) -> Vec<Cow<'a, str>> {
        let mut frags = Vec::with_capacity(4);
        if let Some(c) = unit.foreground {
            frags.push(Cow::Owned(ansi::ansi_code(c, false)));
        }
        if let Some(c) = unit.background {
            frags.push(Cow::Owned(ansi::ansi_code(c, true)));
        }
        frags.push(Cow::Borrowed(unit.text.as_str()));
        if unit.is_styled() {
            frags.push(Cow::Borrowed(ANSI_RESET));
        }
        frags
    }

    #[inline]
    fn get_mut(&mut self) -> &mut W {
        &mut self.0
    }
}

/// Writer is a (limited) generic representation of a styled writer whose
/// tier is picked at runtime.
#[derive(Clone, Debug)]
pub enum Writer<W> {
    NoColor(NoColor<W>),
    Ansi(Ansi<W>),
}

impl<W> Writer<W> {
    /// Wrap `wtr` in the writer for `tier`.
    pub fn new(tier: Tier, wtr: W) -> Writer<W> {
        match tier {
            Tier::Plain => Writer::NoColor(NoColor(wtr)),
            Tier::Ansi4Bit => Writer::Ansi(Ansi(wtr)),
        }
    }

    /// The tier this writer was built for.
    pub fn tier(&self) -> Tier {
        match *self {
            Writer::NoColor(_) => Tier::Plain,
            Writer::Ansi(_) => Tier::Ansi4Bit,
        }
    }

    /// Return a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        match *self {
            Writer::NoColor(ref wtr) => wtr.get_ref(),
            Writer::Ansi(ref wtr) => wtr.get_ref(),
        }
    }

    /// Consume this writer and return the inner writer.
    pub fn into_inner(self) -> W {
        match self {
            Writer::NoColor(wtr) => wtr.into_inner(),
            Writer::Ansi(wtr) => wtr.into_inner(),
        }
    }
}

impl<W> WriteStyled for Writer<W> {
    type Inner = W;

    #[inline]
    fn supports_color(&self) -> bool {
        match *self {
            Writer::NoColor(ref wtr) => wtr.supports_color(),
            Writer::Ansi(ref wtr) => wtr.supports_color(),
        }
    }

    #[inline]
    fn fragments<'a>(&self, unit: &'a PrintUnit) -> Vec<Cow<'a, str>> {
        match *self {
            Writer::NoColor(ref wtr) => wtr.fragments(unit),
            Writer::Ansi(ref wtr) => wtr.fragments(unit),
        }
    }

    #[inline]
    fn get_mut(&mut self) -> &mut W {
        match *self {
            Writer::NoColor(ref mut wtr) => wtr.get_mut(),
            Writer::Ansi(ref mut wtr) => wtr.get_mut(),
        }
    }
}

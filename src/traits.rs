use crate::PrintUnit;
use std::borrow::Cow;
use std::io::{self, Write as _};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// This trait describes writers that emit [`PrintUnit`]s to a stream.
///
/// Implementors only decide which fragments a unit turns into. Each fragment
/// is then written with its own `write_all` call, in order, by both the
/// blocking and the async path. Fragments are never coalesced, so an escape
/// sequence and the text it styles stay distinct writes on the stream.
pub trait WriteStyled {
    /// The stream this writer wraps.
    type Inner;

    /// Returns true if and only if this writer emits colors.
    fn supports_color(&self) -> bool;

    /// The fragments `unit` is written as, in emission order.
    fn fragments<'a>(&self, unit: &'a PrintUnit) -> Vec<Cow<'a, str>>;

    /// Return a mutable reference to the wrapped stream.
    fn get_mut(&mut self) -> &mut Self::Inner;

    /// Write `unit` to the wrapped stream, blocking on each fragment.
    ///
    /// A failed write is returned immediately; the remaining fragments are
    /// not attempted.
    fn write_unit(&mut self, unit: &PrintUnit) -> io::Result<()>
    where
        Self::Inner: io::Write,
    {
        for frag in self.fragments(unit) {
            self.get_mut().write_all(frag.as_bytes())?;
        }
        Ok(())
    }

    /// Write `unit` to the wrapped stream, yielding at each fragment.
    #[allow(async_fn_in_trait)]
    async fn write_unit_async(&mut self, unit: &PrintUnit) -> io::Result<()>
    where
        Self::Inner: AsyncWrite + Unpin,
    {
        for frag in self.fragments(unit) {
            self.get_mut().write_all(frag.as_bytes()).await?;
        }
        Ok(())
    }
}

impl<T: ?Sized + WriteStyled> WriteStyled for &mut T {
    type Inner = T::Inner;

    fn supports_color(&self) -> bool {
        (**self).supports_color()
    }
    fn fragments<'a>(&self, unit: &'a PrintUnit) -> Vec<Cow<'a, str>> {
        (**self).fragments(unit)
    }
    fn get_mut(&mut self) -> &mut T::Inner {
        (**self).get_mut()
    }
}

use std::fmt;
use std::io::{self, BufRead, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use crate::config::{HubConfig, PromptContext, PromptFormatter};
use crate::error::{HubError, Result};
use crate::{ColorChoice, ColorSetting, OutputType, PrintUnit, Tier, WriteStyled, Writer};

/// A hub over blocking standard streams.
pub type StdioHub = IoHub<Box<dyn BufRead + Send>, Box<dyn Write + Send>>;

/// A hub over tokio's standard streams.
pub type TokioStdioHub = IoHub<
    Box<dyn AsyncBufRead + Send + Unpin>,
    Box<dyn AsyncWrite + Send + Unpin>,
>;

/// Serves the input and output of an interactive console session.
///
/// The hub owns an input stream, an output stream and an error stream, plus
/// the session's color theme, prompt formatter and prefix stack. Whether
/// colors are emitted is decided once, when the hub is built, from the
/// config's [`ColorChoice`].
///
/// Blocking methods are available when the streams implement `std::io`
/// traits, and `*_async` methods when they implement tokio's. The hub does
/// no locking: callers sharing one between tasks must serialize access.
pub struct IoHub<R, W> {
    input: R,
    output: Writer<W>,
    error: Writer<W>,
    color_setting: ColorSetting,
    prompt_formatter: PromptFormatter,
    prefix: Vec<String>,
}

impl<R, W> fmt::Debug for IoHub<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoHub")
            .field("tier", &self.tier())
            .field("color_setting", &self.color_setting)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl StdioHub {
    /// Create a hub over stdin, stdout and stderr.
    pub fn stdio(config: HubConfig) -> StdioHub {
        let tier = console_tier(config.color_choice);
        let input: Box<dyn BufRead + Send> =
            Box::new(io::BufReader::new(io::stdin()));
        let output: Box<dyn Write + Send> = Box::new(io::stdout());
        let error: Box<dyn Write + Send> = Box::new(io::stderr());
        IoHub::with_tier(tier, config, input, output, error)
    }
}

impl TokioStdioHub {
    /// Create a hub over tokio's stdin, stdout and stderr.
    pub fn tokio_stdio(config: HubConfig) -> TokioStdioHub {
        let tier = console_tier(config.color_choice);
        let input: Box<dyn AsyncBufRead + Send + Unpin> =
            Box::new(tokio::io::BufReader::new(tokio::io::stdin()));
        let output: Box<dyn AsyncWrite + Send + Unpin> =
            Box::new(tokio::io::stdout());
        let error: Box<dyn AsyncWrite + Send + Unpin> =
            Box::new(tokio::io::stderr());
        IoHub::with_tier(tier, config, input, output, error)
    }
}

impl<R, W> IoHub<R, W> {
    /// Create a hub over the given streams.
    ///
    /// The streams are not consoles, so `Always` and `AlwaysAnsi` behave
    /// alike here.
    pub fn new(config: HubConfig, input: R, output: W, error: W) -> IoHub<R, W> {
        let tier = resolve_tier(config.color_choice);
        IoHub::with_tier(tier, config, input, output, error)
    }

    fn with_tier(
        tier: Tier,
        config: HubConfig,
        input: R,
        output: W,
        error: W,
    ) -> IoHub<R, W> {
        debug!(?tier, choice = ?config.color_choice, "io hub created");
        IoHub {
            input,
            output: Writer::new(tier, output),
            error: Writer::new(tier, error),
            color_setting: config.color_setting,
            prompt_formatter: config.prompt_formatter,
            prefix: Vec::new(),
        }
    }

    /// The output tier picked at construction.
    pub fn tier(&self) -> Tier {
        self.output.tier()
    }

    /// Returns true if and only if this hub emits colors.
    pub fn supports_color(&self) -> bool {
        self.output.supports_color()
    }

    /// Get the color theme.
    pub fn color_setting(&self) -> &ColorSetting {
        &self.color_setting
    }

    /// Replace the color theme. Takes effect on the next write.
    pub fn set_color_setting(&mut self, setting: ColorSetting) {
        self.color_setting = setting;
    }

    /// Get the prompt formatter.
    pub fn prompt_formatter(&self) -> &PromptFormatter {
        &self.prompt_formatter
    }

    /// Replace the prompt formatter.
    pub fn set_prompt_formatter<F>(&mut self, f: F)
    where
        F: Fn(&PromptContext<'_>) -> String + Send + Sync + 'static,
    {
        self.prompt_formatter = std::sync::Arc::new(f);
    }

    /// Run the prompt formatter against the current state.
    pub fn format_prompt(&self) -> String {
        let ctx = PromptContext {
            prefix: &self.prefix,
            color_setting: &self.color_setting,
        };
        (self.prompt_formatter)(&ctx)
    }

    /// The prefix stack, outermost first.
    pub fn prefix(&self) -> &[String] {
        &self.prefix
    }

    /// Push a prefix onto the stack.
    pub fn push_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix.push(prefix.into());
    }

    /// Pop the innermost prefix.
    pub fn pop_prefix(&mut self) -> Option<String> {
        self.prefix.pop()
    }

    /// Empty the prefix stack.
    pub fn clear_prefix(&mut self) {
        self.prefix.clear();
    }

    /// Return a mutable reference to the input stream.
    pub fn input_mut(&mut self) -> &mut R {
        &mut self.input
    }

    /// Return a mutable reference to the output stream.
    ///
    /// Bytes written here bypass styling.
    pub fn output_mut(&mut self) -> &mut W {
        self.output.get_mut()
    }

    /// Return a mutable reference to the error stream.
    pub fn error_mut(&mut self) -> &mut W {
        self.error.get_mut()
    }

    /// Consume the hub and return its input, output and error streams.
    pub fn into_parts(self) -> (R, W, W) {
        (self.input, self.output.into_inner(), self.error.into_inner())
    }

    fn line_units(&self, text: &str, kind: OutputType) -> [PrintUnit; 2] {
        [self.color_setting.paint(text, kind), PrintUnit::new("\n")]
    }
}

impl<R, W: io::Write> IoHub<R, W> {
    /// Write `unit` to the output stream.
    pub fn write(&mut self, unit: &PrintUnit) -> Result<()> {
        trace!(len = unit.text.len(), styled = unit.is_styled(), "write");
        self.output.write_unit(unit)?;
        Ok(())
    }

    /// Write `unit` to the error stream.
    pub fn write_error(&mut self, unit: &PrintUnit) -> Result<()> {
        trace!(len = unit.text.len(), styled = unit.is_styled(), "write error");
        self.error.write_unit(unit)?;
        Ok(())
    }

    /// Write `text` in the theme color for `kind`, then a newline.
    pub fn write_line(&mut self, text: &str, kind: OutputType) -> Result<()> {
        for unit in &self.line_units(text, kind) {
            self.write(unit)?;
        }
        Ok(())
    }

    /// Write the formatted prompt in the theme's prompt color.
    pub fn write_prompt(&mut self) -> Result<()> {
        let unit = self.color_setting.paint(self.format_prompt(), OutputType::Prompt);
        self.write(&unit)?;
        self.flush()
    }

    /// Flush the output and error streams.
    pub fn flush(&mut self) -> Result<()> {
        self.output.get_mut().flush()?;
        self.error.get_mut().flush()?;
        Ok(())
    }
}

impl<R, W: AsyncWrite + Unpin> IoHub<R, W> {
    /// Write `unit` to the output stream, yielding between fragments.
    pub async fn write_async(&mut self, unit: &PrintUnit) -> Result<()> {
        trace!(len = unit.text.len(), styled = unit.is_styled(), "write");
        self.output.write_unit_async(unit).await?;
        Ok(())
    }

    /// Write `unit` to the error stream, yielding between fragments.
    pub async fn write_error_async(&mut self, unit: &PrintUnit) -> Result<()> {
        trace!(len = unit.text.len(), styled = unit.is_styled(), "write error");
        self.error.write_unit_async(unit).await?;
        Ok(())
    }

    /// Write `text` in the theme color for `kind`, then a newline.
    pub async fn write_line_async(
        &mut self,
        text: &str,
        kind: OutputType,
    ) -> Result<()> {
        for unit in &self.line_units(text, kind) {
            self.write_async(unit).await?;
        }
        Ok(())
    }

    /// Write the formatted prompt in the theme's prompt color.
    pub async fn write_prompt_async(&mut self) -> Result<()> {
        let unit = self.color_setting.paint(self.format_prompt(), OutputType::Prompt);
        self.write_async(&unit).await?;
        self.flush_async().await
    }

    /// Flush the output and error streams.
    pub async fn flush_async(&mut self) -> Result<()> {
        self.output.get_mut().flush().await?;
        self.error.get_mut().flush().await?;
        Ok(())
    }
}

impl<R: BufRead, W> IoHub<R, W> {
    /// Read one line of input without its line terminator.
    ///
    /// Returns `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(HubError::StreamRead)?;
        Ok(finish_line(n, line))
    }
}

impl<R: AsyncBufRead + Unpin, W> IoHub<R, W> {
    /// Read one line of input without its line terminator.
    ///
    /// Returns `None` at end of input.
    pub async fn read_line_async(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .await
            .map_err(HubError::StreamRead)?;
        Ok(finish_line(n, line))
    }
}

fn finish_line(n: usize, mut line: String) -> Option<String> {
    if n == 0 {
        return None;
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Some(line)
}

fn resolve_tier(choice: ColorChoice) -> Tier {
    if choice.should_attempt_color() { Tier::Ansi4Bit } else { Tier::Plain }
}

/// Pick a tier for a hub writing to the process console.
#[cfg(not(windows))]
fn console_tier(choice: ColorChoice) -> Tier {
    resolve_tier(choice)
}

/// Pick a tier for a hub writing to the process console.
///
/// ANSI is only used if virtual terminal processing could be enabled, or if
/// the choice forces it.
#[cfg(windows)]
fn console_tier(choice: ColorChoice) -> Tier {
    use winapi_util::console::Console;

    if !choice.should_attempt_color() {
        return Tier::Plain;
    }
    if choice == ColorChoice::AlwaysAnsi {
        return Tier::Ansi4Bit;
    }
    let enabled_virtual = Console::stdout()
        .and_then(|mut con| con.set_virtual_terminal_processing(true))
        .is_ok();
    if enabled_virtual || choice.should_force_ansi() {
        Tier::Ansi4Bit
    } else {
        Tier::Plain
    }
}

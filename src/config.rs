use std::env;
use std::ffi::OsString;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::{ColorChoice, ColorSetting};

/// Environment variable consulted by [`HubConfig::from_env`].
pub const COLOR_ENV: &str = "IOHUB_COLOR";

/// What a prompt formatter gets to look at.
#[derive(Clone, Copy, Debug)]
pub struct PromptContext<'a> {
    /// The hub's prefix stack, outermost first.
    pub prefix: &'a [String],
    /// The hub's current color theme.
    pub color_setting: &'a ColorSetting,
}

/// Builds the prompt string shown before reading input.
pub type PromptFormatter =
    Arc<dyn Fn(&PromptContext<'_>) -> String + Send + Sync>;

/// The prompt used when none is configured: the prefix stack joined with
/// `/`, followed by `> `.
pub fn default_prompt_formatter() -> PromptFormatter {
    Arc::new(|ctx: &PromptContext<'_>| format!("{}> ", ctx.prefix.join("/")))
}

/// Settings a hub is built from.
#[derive(Clone)]
pub struct HubConfig {
    pub(crate) color_choice: ColorChoice,
    pub(crate) color_setting: ColorSetting,
    pub(crate) prompt_formatter: PromptFormatter,
}

impl Default for HubConfig {
    fn default() -> HubConfig {
        HubConfig {
            color_choice: ColorChoice::default(),
            color_setting: ColorSetting::default(),
            prompt_formatter: default_prompt_formatter(),
        }
    }
}

impl fmt::Debug for HubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubConfig")
            .field("color_choice", &self.color_choice)
            .field("color_setting", &self.color_setting)
            .finish_non_exhaustive()
    }
}

impl HubConfig {
    /// Create a config with every setting at its default.
    pub fn new() -> HubConfig {
        HubConfig::default()
    }

    /// Default config, with the color choice taken from `IOHUB_COLOR` when
    /// it holds a valid choice. An invalid value is logged and ignored.
    pub fn from_env() -> HubConfig {
        HubConfig::try_from_env().unwrap_or_else(|err| {
            warn!(%err, "ignoring {COLOR_ENV}");
            HubConfig::default()
        })
    }

    /// Like `from_env`, but an invalid `IOHUB_COLOR` is an error.
    pub fn try_from_env() -> Result<HubConfig> {
        let mut config = HubConfig::default();
        config.color_choice = color_choice_from(env::var_os(COLOR_ENV))?;
        Ok(config)
    }

    /// Get the color choice.
    pub fn color_choice(&self) -> ColorChoice {
        self.color_choice
    }

    /// Set the color choice.
    pub fn set_color_choice(&mut self, choice: ColorChoice) -> &mut HubConfig {
        self.color_choice = choice;
        self
    }

    /// Get the color theme.
    pub fn color_setting(&self) -> &ColorSetting {
        &self.color_setting
    }

    /// Set the color theme.
    pub fn set_color_setting(
        &mut self,
        setting: ColorSetting,
    ) -> &mut HubConfig {
        self.color_setting = setting;
        self
    }

    /// Set the prompt formatter.
    pub fn set_prompt_formatter<F>(&mut self, f: F) -> &mut HubConfig
    where
        F: Fn(&PromptContext<'_>) -> String + Send + Sync + 'static,
    {
        self.prompt_formatter = Arc::new(f);
        self
    }

    /// Run a one-shot configuration step and return the result.
    pub fn configure(mut self, f: impl FnOnce(&mut HubConfig)) -> HubConfig {
        f(&mut self);
        self
    }
}

/// Parses a raw `IOHUB_COLOR` value. Unset means `Auto`.
fn color_choice_from(raw: Option<OsString>) -> Result<ColorChoice> {
    match raw {
        Some(raw) => Ok(raw.to_string_lossy().parse()?),
        None => Ok(ColorChoice::default()),
    }
}

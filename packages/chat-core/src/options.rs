//! Display and behavior options for the chat widget.
//!
//! `ChatOptions` is the flat option bag a host fills in (in code or from a
//! TOML file). Every field is optional with a documented default. The bag is
//! validated once into `ValidatedOptions`, which the rendering layer reads.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::Rgba8;
use crate::date::DatePattern;
use crate::ConfigError;

pub const DEFAULT_DATE_FORMAT: &str = "HH:mm DD/MM/YYYY";
pub const DEFAULT_INPUT_MAX_LENGTH: usize = 5000;
pub const DEFAULT_LONG_PRESS_MS: u64 = 500;

/// Whether the layout shifts to keep the composer above an on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardAvoidance {
    /// Enabled on iOS targets, disabled elsewhere
    #[default]
    Auto,
    Always,
    Never,
}

impl KeyboardAvoidance {
    pub fn is_enabled(self) -> bool {
        match self {
            KeyboardAvoidance::Auto => cfg!(target_os = "ios"),
            KeyboardAvoidance::Always => true,
            KeyboardAvoidance::Never => false,
        }
    }
}

/// Option bag as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatOptions {
    // Composer behavior
    pub keep_keyboard_on_send: bool,
    pub always_show_send: bool,
    pub hide_send_button: bool,
    pub hide_input: bool,
    pub hide_right_input_element: bool,
    pub hide_left_input_element: bool,
    pub hide_top_element: bool,
    pub no_divider: bool,
    pub input_max_length: usize,
    pub default_input_value: String,
    /// Placeholder text; the localized default is used when unset
    pub input_placeholder: Option<String>,

    // Bubble behavior
    pub hide_bubble_date: bool,
    pub hide_user_avatar: bool,
    pub hide_other_user_avatar: bool,
    pub disable_bubble_press_opacity: bool,
    pub date_format: String,
    pub long_press_ms: u64,

    // Color tokens
    pub user_bubble_color: String,
    pub other_user_bubble_color: String,
    pub background_color: String,
    pub divider_color: String,
    pub text_color: String,
    pub date_text_color: String,
    pub link_color: String,
    pub input_placeholder_color: Option<String>,

    pub keyboard_avoidance: KeyboardAvoidance,
    /// Log swallowed media probe failures
    pub debug: bool,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            keep_keyboard_on_send: false,
            always_show_send: false,
            hide_send_button: false,
            hide_input: false,
            hide_right_input_element: false,
            hide_left_input_element: false,
            hide_top_element: false,
            no_divider: false,
            input_max_length: DEFAULT_INPUT_MAX_LENGTH,
            default_input_value: String::new(),
            input_placeholder: None,

            hide_bubble_date: false,
            hide_user_avatar: false,
            hide_other_user_avatar: false,
            disable_bubble_press_opacity: false,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            long_press_ms: DEFAULT_LONG_PRESS_MS,

            user_bubble_color: "lightgray".to_string(),
            other_user_bubble_color: "lightblue".to_string(),
            background_color: "white".to_string(),
            divider_color: "lightgray".to_string(),
            text_color: "black".to_string(),
            date_text_color: "gray".to_string(),
            link_color: "blue".to_string(),
            input_placeholder_color: None,

            keyboard_avoidance: KeyboardAvoidance::Auto,
            debug: true,
        }
    }
}

impl ChatOptions {
    /// Parse options from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load options from the default location, or defaults if no file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Get the default options file path.
    ///
    /// Can be overridden with the `CUSTOMIZABLE_CHAT_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("CUSTOMIZABLE_CHAT_CONFIG") {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        directories::ProjectDirs::from("", "", "customizable-chat")
            .map(|dirs| dirs.config_dir().join("chat.toml"))
            .unwrap_or_else(|| PathBuf::from("chat.toml"))
    }

    /// Check every field once and resolve tokens into typed values.
    pub fn validate(self) -> Result<ValidatedOptions, ConfigError> {
        if self.input_max_length == 0 {
            return Err(ConfigError::ZeroMaxLength);
        }

        let default_len = self.default_input_value.chars().count();
        if default_len > self.input_max_length {
            return Err(ConfigError::DefaultInputTooLong {
                len: default_len,
                max: self.input_max_length,
            });
        }

        if self.long_press_ms == 0 {
            return Err(ConfigError::ZeroLongPress);
        }

        let date_pattern = DatePattern::parse(&self.date_format)?;

        let palette = Palette {
            user_bubble: color("user_bubble_color", &self.user_bubble_color)?,
            other_user_bubble: color("other_user_bubble_color", &self.other_user_bubble_color)?,
            background: color("background_color", &self.background_color)?,
            divider: color("divider_color", &self.divider_color)?,
            text: color("text_color", &self.text_color)?,
            date_text: color("date_text_color", &self.date_text_color)?,
            link: color("link_color", &self.link_color)?,
            input_placeholder: self
                .input_placeholder_color
                .as_deref()
                .map(|value| color("input_placeholder_color", value))
                .transpose()?,
        };

        Ok(ValidatedOptions {
            date_pattern,
            palette,
            long_press: Duration::from_millis(self.long_press_ms),
            options: self,
        })
    }
}

fn color(field: &'static str, value: &str) -> Result<Rgba8, ConfigError> {
    Rgba8::parse(value).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

/// Resolved color tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub user_bubble: Rgba8,
    pub other_user_bubble: Rgba8,
    pub background: Rgba8,
    pub divider: Rgba8,
    pub text: Rgba8,
    pub date_text: Rgba8,
    pub link: Rgba8,
    pub input_placeholder: Option<Rgba8>,
}

/// Options that passed validation. Immutable once built.
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
    options: ChatOptions,
    date_pattern: DatePattern,
    palette: Palette,
    long_press: Duration,
}

impl ValidatedOptions {
    pub fn options(&self) -> &ChatOptions {
        &self.options
    }

    pub fn date_pattern(&self) -> &DatePattern {
        &self.date_pattern
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn long_press(&self) -> Duration {
        self.long_press
    }
}

impl std::ops::Deref for ValidatedOptions {
    type Target = ChatOptions;

    fn deref(&self) -> &ChatOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = ChatOptions::default();
        assert_eq!(options.input_max_length, 5000);
        assert_eq!(options.date_format, "HH:mm DD/MM/YYYY");
        assert_eq!(options.user_bubble_color, "lightgray");
        assert_eq!(options.other_user_bubble_color, "lightblue");
        assert!(options.debug);
        assert!(!options.always_show_send);

        let validated = options.validate().unwrap();
        assert_eq!(validated.palette().user_bubble, Rgba8::rgb(211, 211, 211));
        assert_eq!(validated.palette().other_user_bubble, Rgba8::rgb(173, 216, 230));
        assert_eq!(validated.palette().input_placeholder, None);
        assert_eq!(validated.long_press(), Duration::from_millis(500));
    }

    #[test]
    fn test_from_toml_partial() {
        let options = ChatOptions::from_toml_str(
            r##"
            hide_bubble_date = true
            user_bubble_color = "#562800"
            input_max_length = 280
            keyboard_avoidance = "always"
            "##,
        )
        .unwrap();

        assert!(options.hide_bubble_date);
        assert_eq!(options.input_max_length, 280);
        assert_eq!(options.keyboard_avoidance, KeyboardAvoidance::Always);
        // Untouched keys keep their defaults
        assert_eq!(options.other_user_bubble_color, "lightblue");

        let validated = options.validate().unwrap();
        assert_eq!(validated.palette().user_bubble, Rgba8::rgb(0x56, 0x28, 0x00));
        assert!(validated.keyboard_avoidance.is_enabled());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ChatOptions::from_toml_str("input_max_length = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_validation_errors() {
        let zero = ChatOptions {
            input_max_length: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroMaxLength)));

        let too_long = ChatOptions {
            input_max_length: 3,
            default_input_value: "hello".into(),
            ..Default::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(ConfigError::DefaultInputTooLong { len: 5, max: 3 })
        ));

        let bad_color = ChatOptions {
            divider_color: "#zzz".into(),
            ..Default::default()
        };
        match bad_color.validate() {
            Err(ConfigError::InvalidColor { field, value }) => {
                assert_eq!(field, "divider_color");
                assert_eq!(value, "#zzz");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let empty_format = ChatOptions {
            date_format: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(
            empty_format.validate(),
            Err(ConfigError::InvalidDateFormat(_))
        ));

        let no_long_press = ChatOptions {
            long_press_ms: 0,
            ..Default::default()
        };
        assert!(matches!(no_long_press.validate(), Err(ConfigError::ZeroLongPress)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "no_divider = true").unwrap();
        writeln!(file, "input_placeholder_color = \"#FFE0C2\"").unwrap();

        let options = ChatOptions::load(file.path()).unwrap();
        assert!(options.no_divider);

        let validated = options.validate().unwrap();
        assert_eq!(
            validated.palette().input_placeholder,
            Some(Rgba8::rgb(0xff, 0xe0, 0xc2))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChatOptions::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_keyboard_avoidance() {
        assert!(KeyboardAvoidance::Always.is_enabled());
        assert!(!KeyboardAvoidance::Never.is_enabled());
        assert_eq!(KeyboardAvoidance::Auto.is_enabled(), cfg!(target_os = "ios"));
    }
}

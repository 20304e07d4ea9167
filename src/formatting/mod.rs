use crate::scoring::RiskLevel;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("NO_COLOR").ok().as_deref(),
            env::var("CLICOLOR").ok().as_deref(),
            env::var("CLICOLOR_FORCE").ok().as_deref(),
        )
    }

    // NO_COLOR (no-color.org), then CLICOLOR=0, then CLICOLOR_FORCE=1 wins
    fn from_vars(no_color: Option<&str>, clicolor: Option<&str>, force: Option<&str>) -> Self {
        let mut config = Self::default();
        if no_color.is_some() {
            config.color = ColorMode::Never;
        }
        if clicolor == Some("0") {
            config.color = ColorMode::Never;
        }
        if force == Some("1") {
            config.color = ColorMode::Always;
        }
        config
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }
}

/// Applies the configured colour policy to terminal text.
#[derive(Debug, Clone, Copy)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        colored::control::set_override(enabled);
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    pub fn good(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub fn bad(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    /// Label padded to `width` before colouring so columns stay aligned.
    pub fn risk_label(&self, level: RiskLevel, width: usize) -> String {
        let padded = format!("{:<width$}", level.as_str(), width = width);
        match level {
            RiskLevel::High => self.paint(&padded, |t| t.red().bold()),
            RiskLevel::Medium => self.paint(&padded, |t| t.yellow()),
            RiskLevel::Low => self.paint(&padded, |t| t.green()),
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}

//! UI Theme Module - Consistent color palette and style helpers
//!
//! Centralized theme for the fwlens TUI: palette tokens (not hard-coded
//! colors) plus style helpers for severities, rule actions, and chrome.

use ratatui::style::{Color, Modifier, Style};

use fwlens_core::model::{RuleAction, Severity};

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Main background color
    pub bg: Color,
    /// Panel border color
    pub panel_border: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (secondary info)
    pub text_dim: Color,
    /// Muted text (tertiary info, disabled)
    pub text_muted: Color,
    /// Accent color (highlights, focus)
    pub accent: Color,
    /// Success state (allow, healthy)
    pub success: Color,
    /// Warning state (medium severity)
    pub warn: Color,
    /// Error state (deny, high/critical severity, fetch failures)
    pub error: Color,
    /// Info state
    pub info: Color,
    /// Selection background
    pub selection_bg: Color,
    /// Selection foreground
    pub selection_fg: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    /// Dark terminal default
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            panel_border: Color::Rgb(60, 60, 60),
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(79, 193, 255),
            success: Color::Rgb(78, 201, 176),
            warn: Color::Rgb(220, 180, 100),
            error: Color::Rgb(244, 135, 113),
            info: Color::Rgb(156, 220, 254),
            selection_bg: Color::Rgb(38, 79, 120),
            selection_fg: Color::White,
            key_hint: Color::Rgb(206, 145, 120),
        }
    }

    /// Light terminal variant
    pub fn light() -> Self {
        Self {
            bg: Color::Reset,
            panel_border: Color::Rgb(180, 180, 180),
            text: Color::Rgb(40, 40, 40),
            text_dim: Color::Rgb(100, 100, 100),
            text_muted: Color::Rgb(150, 150, 150),
            accent: Color::Rgb(0, 90, 158),
            success: Color::Rgb(0, 128, 96),
            warn: Color::Rgb(160, 110, 0),
            error: Color::Rgb(190, 40, 30),
            info: Color::Rgb(0, 110, 160),
            selection_bg: Color::Rgb(200, 220, 240),
            selection_fg: Color::Black,
            key_hint: Color::Rgb(150, 80, 40),
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

/// Style helpers over a palette
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Informational => Style::default().fg(self.palette.text_dim),
            Severity::Low => Style::default().fg(self.palette.info),
            Severity::Medium => Style::default().fg(self.palette.warn),
            Severity::High => Style::default().fg(self.palette.error),
            Severity::Critical => Style::default()
                .fg(self.palette.error)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn action_style(&self, action: RuleAction) -> Style {
        match action {
            RuleAction::Allow => Style::default().fg(self.palette.success),
            RuleAction::Deny | RuleAction::Drop => Style::default().fg(self.palette.error),
            RuleAction::ResetClient | RuleAction::ResetServer | RuleAction::ResetBoth => {
                Style::default().fg(self.palette.warn)
            }
        }
    }

    pub fn tab_style(&self, active: bool) -> Style {
        if active {
            Style::default()
                .fg(self.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.text_dim)
        }
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.palette.panel_border)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.palette.selection_bg)
            .fg(self.palette.selection_fg)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn text_muted_style(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }

    pub fn warn_style(&self) -> Style {
        Style::default().fg(self.palette.warn)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.palette.success)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .add_modifier(Modifier::BOLD)
    }
}

/// Global theme instance, set once at startup from config/flags
static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Install the theme. Later calls are ignored; the first one wins.
pub fn init(name: &str) {
    let _ = THEME.set(Theme::new(Palette::by_name(name)));
}

/// Get the active theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
pub mod styles {
    use super::*;

    pub fn severity(severity: Severity) -> Style {
        theme().severity_style(severity)
    }

    pub fn action(action: RuleAction) -> Style {
        theme().action_style(action)
    }

    pub fn tab(active: bool) -> Style {
        theme().tab_style(active)
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn border() -> Style {
        theme().border_style()
    }

    pub fn selection() -> Style {
        theme().selection_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }

    pub fn text_muted() -> Style {
        theme().text_muted_style()
    }

    pub fn accent() -> Style {
        theme().accent_style()
    }

    pub fn error() -> Style {
        theme().error_style()
    }

    pub fn warn() -> Style {
        theme().warn_style()
    }

    pub fn success() -> Style {
        theme().success_style()
    }

    pub fn title() -> Style {
        theme().title_style()
    }
}

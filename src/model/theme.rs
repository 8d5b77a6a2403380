use ratatui::style::Color;

use super::ToolStatus;

pub struct Theme;

impl Theme {
    // ── Base palette ────────────────────────────────────────────
    pub const BACKGROUND: Color = Color::Rgb(18, 18, 24);
    pub const TEXT: Color = Color::Rgb(225, 225, 235);
    pub const MUTED_TEXT: Color = Color::Rgb(100, 105, 120);
    pub const SEPARATOR: Color = Color::Rgb(45, 45, 58);

    // ── Accent colors ───────────────────────────────────────────
    pub const ACCENT: Color = Color::Rgb(80, 200, 200);
    pub const ACCENT_WARM: Color = Color::Rgb(230, 160, 60);

    // ── Semantic colors ─────────────────────────────────────────
    pub const SUCCESS: Color = Color::Rgb(80, 210, 120);
    pub const WARNING: Color = Color::Rgb(230, 180, 60);
    pub const ERROR: Color = Color::Rgb(230, 80, 80);
    pub const INFO: Color = Color::Rgb(80, 180, 220);

    // ── UI chrome ───────────────────────────────────────────────
    pub const HEADER_BG: Color = Color::Rgb(24, 24, 32);
    pub const FOOTER_BG: Color = Color::Rgb(24, 24, 32);
    pub const PANEL_BORDER: Color = Color::Rgb(50, 50, 65);
    pub const ACTIVE_BORDER: Color = Color::Rgb(80, 200, 200); // = ACCENT
    pub const SELECTION_BG: Color = Color::Rgb(40, 55, 75);

    // ── Speakers ────────────────────────────────────────────────
    pub const HUMAN: Color = Color::Rgb(80, 140, 230);
    pub const ASSISTANT: Color = Color::Rgb(170, 130, 255);
    pub const TOOL: Color = Color::Rgb(230, 160, 60); // = ACCENT_WARM

    /// Color for a tool result status
    pub fn tool_status_color(status: ToolStatus) -> Color {
        match status {
            ToolStatus::Pending => Self::MUTED_TEXT,
            ToolStatus::Success => Self::SUCCESS,
            ToolStatus::Error => Self::ERROR,
        }
    }

    /// Glyph for a tool result status
    pub fn tool_status_icon(status: ToolStatus) -> &'static str {
        match status {
            ToolStatus::Pending => "⋯",
            ToolStatus::Success => "✓",
            ToolStatus::Error => "✗",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_status_colors_defined() {
        assert_eq!(Theme::tool_status_color(ToolStatus::Pending), Theme::MUTED_TEXT);
        assert_eq!(Theme::tool_status_color(ToolStatus::Success), Theme::SUCCESS);
        assert_eq!(Theme::tool_status_color(ToolStatus::Error), Theme::ERROR);
    }

    #[test]
    fn tool_status_icons_distinct() {
        assert_ne!(
            Theme::tool_status_icon(ToolStatus::Success),
            Theme::tool_status_icon(ToolStatus::Error)
        );
        assert_eq!(Theme::tool_status_icon(ToolStatus::Pending), "⋯");
    }
}

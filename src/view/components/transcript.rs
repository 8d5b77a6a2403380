use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{AppState, PanelFocus, UiState};
use crate::model::{Theme, ToolResult, ToolStatus};
use crate::resolve::{build_render_plan, ExpansionKey, RenderItem, Resolution, ToolView};

use super::syntax::{
    highlight_code_block, highlight_json_output, lang_to_extension, split_fenced_blocks, TextBlock,
};

const BODY_INDENT: &str = "  ";
const OUTPUT_INDENT: &str = "    │ ";

/// Render the conversation transcript.
/// Tool results are shown inline under the turn that requested them.
pub fn render_transcript(frame: &mut Frame, area: Rect, state: &AppState) {
    let events = state.display_events();
    let plan = build_render_plan(&events);

    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let lines = build_transcript_lines(&plan, &state.ui, width);
    let offset = scroll_offset(lines.len(), height, &state.ui);

    let is_focused = state.ui.focus == PanelFocus::Transcript;
    let title = if state.ui.auto_scroll {
        "Transcript [auto-scroll]"
    } else {
        "Transcript"
    };

    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if is_focused {
                    Theme::ACTIVE_BORDER
                } else {
                    Theme::PANEL_BORDER
                }))
                .title(title),
        )
        .scroll((offset.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(transcript, area);
}

/// First visible line. Auto-scroll pins the view to the bottom.
pub fn scroll_offset(total_lines: usize, visible: usize, ui: &UiState) -> usize {
    let max = total_lines.saturating_sub(visible);
    if ui.auto_scroll {
        max
    } else {
        ui.transcript_scroll.min(max)
    }
}

/// Pure function: lay out the render plan as wrapped lines of `width` columns.
pub fn build_transcript_lines(
    plan: &[RenderItem<'_>],
    ui: &UiState,
    width: usize,
) -> Vec<Line<'static>> {
    if plan.is_empty() {
        return vec![
            Line::from(Span::styled(
                "No messages yet",
                Style::default().fg(Theme::MUTED_TEXT),
            )),
            Line::from(Span::styled(
                "Press i to start a conversation",
                Style::default().fg(Theme::MUTED_TEXT),
            )),
        ];
    }

    let mut builder = TranscriptBuilder {
        lines: Vec::new(),
        ui,
        width,
        slot: 0,
    };

    for item in plan {
        let has_invalid = item.has_invalid();
        match item {
            RenderItem::Human(turn) => {
                builder.speaker("You", Theme::HUMAN);
                builder.body(&turn.text, BODY_INDENT, Theme::TEXT);
            }
            RenderItem::Assistant {
                turn,
                tools,
                invalid,
            } => {
                builder.speaker("Assistant", Theme::ASSISTANT);
                if has_invalid {
                    builder.lines.push(Line::from(Span::styled(
                        format!("{}⚠ Invalid Tool Calls", BODY_INDENT),
                        Style::default().fg(Theme::ERROR).add_modifier(Modifier::BOLD),
                    )));
                    for malformed in invalid.iter() {
                        builder.lines.push(Line::from(Span::styled(
                            format!("{}  ✗ {}", BODY_INDENT, malformed.display_name()),
                            Style::default().fg(Theme::ERROR),
                        )));
                        if let Some(error) = &malformed.error_description {
                            builder.body(error, "      ", Theme::MUTED_TEXT);
                        }
                    }
                }
                if let Some(text) = turn.text.as_deref().filter(|t| !t.trim().is_empty()) {
                    builder.markdown(text);
                }
                for tool in tools {
                    builder.invocation(tool);
                }
            }
            RenderItem::StandaloneResult(result) => {
                builder.speaker("Tool", Theme::TOOL);
                builder.standalone(result);
            }
        }
        builder.lines.push(Line::default());
    }

    builder.lines
}

struct TranscriptBuilder<'u> {
    lines: Vec<Line<'static>>,
    ui: &'u UiState,
    width: usize,
    /// Next expandable output index, matching `expandable_keys` order
    slot: usize,
}

impl TranscriptBuilder<'_> {
    fn speaker(&mut self, label: &str, color: ratatui::style::Color) {
        self.lines.push(Line::from(Span::styled(
            format!("▌ {}", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }

    fn body(&mut self, text: &str, indent: &str, color: ratatui::style::Color) {
        let available = self.width.saturating_sub(indent.width()).max(1);
        for row in wrap_text(text, available) {
            self.lines.push(Line::from(vec![
                Span::styled(indent.to_string(), Style::default().fg(Theme::MUTED_TEXT)),
                Span::styled(row, Style::default().fg(color)),
            ]));
        }
    }

    /// Prose is wrapped; fenced code is highlighted and left unwrapped.
    fn markdown(&mut self, text: &str) {
        for block in split_fenced_blocks(text) {
            match block {
                TextBlock::Prose(prose) => self.body(&prose, BODY_INDENT, Theme::TEXT),
                TextBlock::Code { lang, lines } => {
                    let ext = lang.as_deref().map(lang_to_extension).unwrap_or_default();
                    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
                    self.highlighted(highlight_code_block(&lines, &ext), BODY_INDENT);
                }
            }
        }
    }

    fn highlighted(&mut self, lines: Vec<Line<'static>>, indent: &str) {
        for line in lines {
            let mut spans = vec![Span::raw(indent.to_string())];
            spans.extend(line.spans);
            self.lines.push(Line::from(spans));
        }
    }

    fn invocation(&mut self, tool: &ToolView<'_>) {
        let key = tool.expansion_key();
        self.tool_row(tool.display_name(), tool.resolution, key);
    }

    fn standalone(&mut self, result: &ToolResult) {
        let name = result
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Tool");
        self.tool_row(
            name,
            Resolution::Resolved(result),
            Some(ExpansionKey::Result(result.id.clone())),
        );
    }

    fn tool_row(&mut self, name: &str, resolution: Resolution<'_>, key: Option<ExpansionKey>) {
        let status = resolution.status();
        let (selected, expanded) = match &key {
            Some(key) => {
                let selected = self.ui.tool_cursor == Some(self.slot);
                self.slot += 1;
                (selected, self.ui.expanded.contains(key))
            }
            None => (false, false),
        };

        let cursor = if selected { "▶ " } else { BODY_INDENT };
        let mut spans = vec![
            Span::styled(cursor.to_string(), Style::default().fg(Theme::ACCENT)),
            Span::styled(
                format!("{} ", Theme::tool_status_icon(status)),
                Style::default().fg(Theme::tool_status_color(status)),
            ),
            Span::styled(
                name.to_string(),
                Style::default().fg(Theme::TOOL).add_modifier(Modifier::BOLD),
            ),
        ];

        if resolution.is_pending() {
            spans.push(Span::styled(
                " Executing",
                Style::default()
                    .fg(Theme::INFO)
                    .add_modifier(Modifier::ITALIC),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {}", status_label(status)),
                Style::default().fg(Theme::tool_status_color(status)),
            ));
        }

        if key.is_some() {
            spans.push(Span::styled(
                if expanded { " [-]" } else { " [+]" },
                Style::default().fg(Theme::MUTED_TEXT),
            ));
        }

        let line = Line::from(spans);
        self.lines.push(if selected {
            line.style(Style::default().bg(Theme::SELECTION_BG))
        } else {
            line
        });

        if expanded {
            if let Some(result) = resolution.result() {
                if let Some(lines) = highlight_json_output(&result.text) {
                    self.highlighted(lines, "    ");
                } else if result.text.is_empty() {
                    self.body("(no output)", OUTPUT_INDENT, Theme::MUTED_TEXT);
                } else {
                    self.body(&result.text, OUTPUT_INDENT, Theme::MUTED_TEXT);
                }
            }
        }
    }
}

fn status_label(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Pending => "pending",
        ToolStatus::Success => "done",
        ToolStatus::Error => "failed",
    }
}

/// Greedy word wrap on display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let sep = usize::from(row_width > 0);
            if row_width + sep + word_width <= width {
                if sep == 1 {
                    row.push(' ');
                }
                row.push_str(word);
                row_width += sep + word_width;
                continue;
            }

            if row_width > 0 {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            if word_width <= width {
                row.push_str(word);
                row_width = word_width;
                continue;
            }

            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if row_width > 0 && row_width + char_width > width {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(c);
                row_width += char_width;
            }
        }
        rows.push(row);
    }

    rows
}

use std::sync::LazyLock;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

use crate::model::Theme;

const MAX_HIGHLIGHT_LINES: usize = 200;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// A run of message text: prose, or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    Prose(String),
    Code { lang: Option<String>, lines: Vec<String> },
}

/// Split message text on ``` fences. An unclosed fence runs to the end.
pub fn split_fenced_blocks(text: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut code: Option<(Option<String>, Vec<String>)> = None;

    for line in text.lines() {
        let fence = line.trim_start().strip_prefix("```");
        match code.take() {
            Some((lang, mut lines)) => {
                if fence.is_some() {
                    blocks.push(TextBlock::Code { lang, lines });
                } else {
                    lines.push(line.to_string());
                    code = Some((lang, lines));
                }
            }
            None => match fence {
                Some(lang) => {
                    if !prose.is_empty() {
                        blocks.push(TextBlock::Prose(prose.join("\n")));
                        prose.clear();
                    }
                    let lang = Some(lang.trim().to_string()).filter(|l| !l.is_empty());
                    code = Some((lang, Vec::new()));
                }
                None => prose.push(line),
            },
        }
    }

    if let Some((lang, lines)) = code {
        blocks.push(TextBlock::Code { lang, lines });
    }
    if !prose.is_empty() {
        blocks.push(TextBlock::Prose(prose.join("\n")));
    }
    blocks
}

/// Pretty-printed, highlighted JSON when `text` is a JSON object or array.
pub fn highlight_json_output(text: &str) -> Option<Vec<Line<'static>>> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
    let pretty = serde_json::to_string_pretty(&value).ok()?;
    let lines: Vec<&str> = pretty.lines().collect();
    Some(highlight_code_block(&lines, "json"))
}

/// Highlight a code block with syntax coloring and line numbers.
pub fn highlight_code_block(lines: &[&str], extension: &str) -> Vec<Line<'static>> {
    let count = lines.len().min(MAX_HIGHLIGHT_LINES);
    let gutter_w = digit_width(count);

    let ss = &*SYNTAX_SET;
    let syntax = ss
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| ss.find_syntax_plain_text());
    let mut highlighter = best_theme().map(|theme| HighlightLines::new(syntax, theme));

    lines[..count]
        .iter()
        .enumerate()
        .map(|(i, code)| {
            let mut spans = vec![gutter_span(i + 1, gutter_w)];
            match highlighter.as_mut() {
                Some(h) => spans.extend(highlight_line_spans(h, code, ss)),
                None => spans.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Theme::TEXT),
                )),
            }
            Line::from(spans)
        })
        .collect()
}

/// Map markdown language hint to file extension for syntect.
pub fn lang_to_extension(lang: &str) -> String {
    let lower = lang.trim().to_ascii_lowercase();
    match lower.as_str() {
        "rust" | "rs" => "rs",
        "javascript" | "js" | "typescript" | "ts" | "tsx" => "js",
        "python" | "py" => "py",
        "go" | "golang" => "go",
        "bash" | "sh" | "shell" | "zsh" => "sh",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "sql" => "sql",
        "html" => "html",
        "markdown" | "md" => "md",
        other => return other.to_string(),
    }
    .to_string()
}

fn best_theme() -> Option<&'static syntect::highlighting::Theme> {
    let ts = &*THEME_SET;
    ts.themes
        .get("base16-eighties.dark")
        .or_else(|| ts.themes.get("base16-ocean.dark"))
        .or_else(|| ts.themes.values().next())
}

fn gutter_span(line_num: usize, width: usize) -> Span<'static> {
    Span::styled(
        format!("{:>w$} │ ", line_num, w = width),
        Style::default()
            .fg(Theme::MUTED_TEXT)
            .add_modifier(Modifier::DIM),
    )
}

fn digit_width(count: usize) -> usize {
    count.max(1).to_string().len().max(2)
}

fn highlight_line_spans(
    h: &mut HighlightLines,
    line: &str,
    ss: &SyntaxSet,
) -> Vec<Span<'static>> {
    // load_defaults_newlines syntaxes only match newline-terminated lines.
    let line_nl = format!("{}\n", line);
    h.highlight_line(&line_nl, ss)
        .unwrap_or_default()
        .into_iter()
        .map(|(style, text)| {
            let fg = style.foreground;
            Span::styled(
                text.trim_end_matches('\n').to_string(),
                Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
            )
        })
        .filter(|span| !span.content.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn split_prose_only() {
        assert_eq!(
            split_fenced_blocks("one\ntwo"),
            vec![TextBlock::Prose("one\ntwo".into())]
        );
    }

    #[test]
    fn split_extracts_fenced_code() {
        let text = "Try this:\n```rust\nfn main() {}\n```\nDone.";
        assert_eq!(
            split_fenced_blocks(text),
            vec![
                TextBlock::Prose("Try this:".into()),
                TextBlock::Code {
                    lang: Some("rust".into()),
                    lines: vec!["fn main() {}".into()],
                },
                TextBlock::Prose("Done.".into()),
            ]
        );
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let blocks = split_fenced_blocks("```\nstill streaming");
        assert_eq!(
            blocks,
            vec![TextBlock::Code {
                lang: None,
                lines: vec!["still streaming".into()],
            }]
        );
    }

    #[test]
    fn json_output_is_pretty_printed() {
        let lines = highlight_json_output(r#"{"temp":8,"sky":"rain"}"#).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().any(|l| text_of(l).contains("\"temp\": 8")));
        assert!(lines[0].spans[0].content.contains("│"));
    }

    #[test]
    fn plain_output_is_not_json() {
        assert!(highlight_json_output("rainy, 8C").is_none());
        assert!(highlight_json_output("{not json").is_none());
        assert!(highlight_json_output("42").is_none());
    }

    #[test]
    fn highlight_code_block_caps_at_max() {
        let code: Vec<&str> = (0..300).map(|_| "let x = 1;").collect();
        assert_eq!(highlight_code_block(&code, "rs").len(), MAX_HIGHLIGHT_LINES);
    }

    #[test]
    fn lang_to_extension_maps_known() {
        assert_eq!(lang_to_extension("Rust"), "rs");
        assert_eq!(lang_to_extension("haskell"), "haskell");
    }
}

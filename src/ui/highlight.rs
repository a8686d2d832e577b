//! Syntax highlighting for the detail pane.

use crate::error::{Result, SnipError};
use crate::models::SnippetLanguage;
use crate::ui::input::TAB_WIDTH;
use once_cell::sync::Lazy;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use syntect::{
    easy::HighlightLines,
    highlighting::{FontStyle, ThemeSet},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Turns raw snippet content into styled text.
pub trait Highlighter {
    fn render(&self, content: &str, language: &SnippetLanguage) -> Result<Text<'static>>;
}

pub struct SyntectHighlighter {
    theme: String,
}

impl SyntectHighlighter {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn render(&self, content: &str, language: &SnippetLanguage) -> Result<Text<'static>> {
        let theme = THEME_SET
            .themes
            .get(&self.theme)
            .ok_or_else(|| SnipError::Render(format!("unknown syntax theme '{}'", self.theme)))?;

        let syntax = language
            .syntax_name()
            .and_then(|name| SYNTAX_SET.find_syntax_by_name(name))
            .or_else(|| SYNTAX_SET.find_syntax_by_token(language.tag()))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(content) {
            let ranges = highlighter
                .highlight_line(line, &SYNTAX_SET)
                .map_err(|err| SnipError::Render(err.to_string()))?;

            let spans: Vec<Span<'static>> = ranges
                .into_iter()
                .map(|(style, text)| {
                    let mut ratatui_style = Style::default().fg(Color::Rgb(
                        style.foreground.r,
                        style.foreground.g,
                        style.foreground.b,
                    ));
                    if style.font_style.contains(FontStyle::BOLD) {
                        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
                    }
                    if style.font_style.contains(FontStyle::ITALIC) {
                        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
                    }
                    Span::styled(clean_segment(text), ratatui_style)
                })
                .collect();

            lines.push(Line::from(spans));
        }

        Ok(Text::from(lines))
    }
}

/// No colours, just the content. Used when highlighting is switched off and
/// as the fallback when highlighting fails.
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn render(&self, content: &str, _language: &SnippetLanguage) -> Result<Text<'static>> {
        Ok(plain_text(content))
    }
}

pub fn plain_text(content: &str) -> Text<'static> {
    Text::from(
        content
            .lines()
            .map(|line| Line::raw(clean_segment(line)))
            .collect::<Vec<_>>(),
    )
}

fn clean_segment(text: &str) -> String {
    text.trim_end_matches(['\n', '\r'])
        .replace('\t', &" ".repeat(TAB_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(rendered: &Text) -> Vec<String> {
        rendered
            .lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_syntect_preserves_content() {
        let highlighter = SyntectHighlighter::new("base16-mocha.dark");
        let rendered = highlighter
            .render("fn main() {\n\tprintln!(\"hi\");\n}\n", &SnippetLanguage::Rust)
            .unwrap();

        assert_eq!(
            text_of(&rendered),
            vec!["fn main() {", "    println!(\"hi\");", "}"]
        );
    }

    #[test]
    fn test_syntect_colours_keywords() {
        let highlighter = SyntectHighlighter::new("base16-mocha.dark");
        let rendered = highlighter
            .render("func f() {}", &SnippetLanguage::Go)
            .unwrap();

        let styles: Vec<_> = rendered.lines[0].spans.iter().map(|s| s.style.fg).collect();
        assert!(styles.iter().all(|fg| fg.is_some()));
        assert!(rendered.lines[0].spans.len() > 1);
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_syntax() {
        let highlighter = SyntectHighlighter::new("base16-mocha.dark");
        let rendered = highlighter
            .render("const x = 1;", &SnippetLanguage::Other("zig".into()))
            .unwrap();
        assert_eq!(text_of(&rendered), vec!["const x = 1;"]);
    }

    #[test]
    fn test_unknown_theme_is_render_error() {
        let highlighter = SyntectHighlighter::new("no-such-theme");
        let result = highlighter.render("x", &SnippetLanguage::Text);
        assert!(matches!(result, Err(SnipError::Render(_))));
    }

    #[test]
    fn test_plain_highlighter() {
        let rendered = PlainHighlighter
            .render("a\r\n\tb", &SnippetLanguage::Text)
            .unwrap();
        assert_eq!(text_of(&rendered), vec!["a", "    b"]);
    }
}

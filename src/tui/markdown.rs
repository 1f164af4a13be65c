//! Just enough markdown for backend feedback and cover letters: headings,
//! lists, quotes, rules, fenced code and inline emphasis.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

static INLINE: OnceLock<Regex> = OnceLock::new();
static ORDERED: OnceLock<Regex> = OnceLock::new();

fn inline_re() -> &'static Regex {
    INLINE.get_or_init(|| {
        Regex::new(r"\*\*[^*]+\*\*|__[^_]+__|`[^`]+`|\*[^*\s][^*]*\*|_[^_\s][^_]*_")
            .expect("inline markdown pattern")
    })
}

fn ordered_re() -> &'static Regex {
    ORDERED.get_or_init(|| Regex::new(r"^(\d+[.)])\s+(.*)$").expect("ordered list pattern"))
}

pub fn render(text: &str, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(10));
    let mut lines = Vec::new();
    let mut in_code = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            lines.push(Line::from(Span::styled(
                raw.to_string(),
                Style::default().fg(Color::Gray),
            )));
            continue;
        }

        if trimmed.is_empty() {
            lines.push(Line::default());
        } else if let Some((level, title)) = heading(trimmed) {
            let color = if level <= 2 { Color::Cyan } else { Color::Yellow };
            lines.push(Line::from(Span::styled(
                title.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        } else if is_rule(trimmed) {
            lines.push(Line::from(Span::styled(
                "─".repeat(width),
                Style::default().fg(Color::DarkGray),
            )));
        } else if let Some(quote) = trimmed.strip_prefix('>') {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    quote.trim().to_string(),
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        } else if let Some(item) = ["- ", "* ", "+ "]
            .iter()
            .find_map(|marker| trimmed.strip_prefix(marker))
        {
            list_item(&mut lines, "• ", item, width);
        } else if let Some(caps) = ordered_re().captures(trimmed) {
            let marker = format!("{} ", &caps[1]);
            list_item(&mut lines, &marker, &caps[2], width);
        } else {
            lines.push(inline(trimmed));
        }
    }

    lines
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..]
        .strip_prefix(' ')
        .map(|title| (level, title.trim()))
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && (compact.chars().all(|c| c == '-')
            || compact.chars().all(|c| c == '*')
            || compact.chars().all(|c| c == '_'))
}

/// Wraps a list item with a hanging indent under its marker.
fn list_item(lines: &mut Vec<Line<'static>>, marker: &str, body: &str, width: usize) {
    let indent = " ".repeat(marker.chars().count());
    let options = textwrap::Options::new(width)
        .initial_indent(marker)
        .subsequent_indent(&indent);
    for wrapped in textwrap::wrap(body, options) {
        lines.push(inline(&wrapped));
    }
}

fn inline(text: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in inline_re().find_iter(text) {
        if m.start() > last {
            spans.push(Span::raw(text[last..m.start()].to_string()));
        }
        let token = m.as_str();
        let span = if let Some(inner) = token
            .strip_prefix("**")
            .and_then(|t| t.strip_suffix("**"))
            .or_else(|| token.strip_prefix("__").and_then(|t| t.strip_suffix("__")))
        {
            Span::styled(inner.to_string(), Style::default().add_modifier(Modifier::BOLD))
        } else if let Some(inner) = token.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
            Span::styled(inner.to_string(), Style::default().fg(Color::LightGreen))
        } else {
            let inner = &token[1..token.len() - 1];
            Span::styled(
                inner.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )
        };
        spans.push(span);
        last = m.end();
    }

    if last < text.len() {
        spans.push(Span::raw(text[last..].to_string()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn headings_drop_hashes_and_are_bold() {
        let lines = render("## Strengths\nClear layout", 80);
        assert_eq!(plain(&lines[0]), "Strengths");
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(plain(&lines[1]), "Clear layout");
    }

    #[test]
    fn inline_emphasis_is_styled() {
        let lines = render("Your **impact** section uses `metrics` _well_.", 80);
        let spans = &lines[0].spans;
        assert_eq!(plain(&lines[0]), "Your impact section uses metrics well.");
        assert_eq!(spans[1].content, "impact");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "metrics");
        assert_eq!(spans[5].content, "well");
        assert!(spans[5].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn list_items_wrap_with_hanging_indent() {
        let lines = render(
            "- Quantify achievements with numbers wherever you possibly can",
            24,
        );
        assert!(lines.len() > 1);
        assert!(plain(&lines[0]).starts_with("• Quantify"));
        assert!(lines[1..].iter().all(|l| plain(l).starts_with("  ")));
    }

    #[test]
    fn ordered_items_keep_their_numbers() {
        let lines = render("1. Tailor the summary\n2) Trim old roles", 80);
        assert_eq!(plain(&lines[0]), "1. Tailor the summary");
        assert_eq!(plain(&lines[1]), "2) Trim old roles");
    }

    #[test]
    fn fenced_code_is_verbatim() {
        let lines = render("```\n**not bold**\n```\nafter", 80);
        assert_eq!(lines.len(), 2);
        assert_eq!(plain(&lines[0]), "**not bold**");
        assert_eq!(plain(&lines[1]), "after");
    }

    #[test]
    fn rules_and_blank_lines() {
        let lines = render("intro\n\n---\noutro", 12);
        assert_eq!(plain(&lines[1]), "");
        assert_eq!(plain(&lines[2]), "─".repeat(12));
    }
}

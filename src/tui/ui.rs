use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph,
        Tabs, Wrap,
    },
    Frame,
};

use crate::app::{App, BackendStatus, InputMode};
use crate::models::{JobLink, QaPair, Section};
use crate::services::export::{COVER_LETTER_FILE, INTERVIEW_FILE};
use crate::workflow::{Intent, NotificationKind};

use super::markdown;

const PREVIEW_LINES: usize = 12;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Min(0),    // Active section
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_navigation(frame, app, chunks[0]);

    match app.section {
        Section::Home => render_home(frame, app, chunks[1]),
        Section::Feedback => render_feedback(frame, app, chunks[1]),
        Section::CoverLetter => render_cover_letter(frame, app, chunks[1]),
        Section::Interview => render_interview(frame, app, chunks[1]),
        Section::JobLinks => render_job_links(frame, app, chunks[1]),
    }

    render_status(frame, app, chunks[2]);

    if app.input_mode != InputMode::Normal {
        render_input(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }

    if app.notification.is_some() {
        render_notification(frame, app);
    }
}

fn render_navigation(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let style = if app.gate(*section, Intent::Navigate).is_open() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!("{} {}", i + 1, section.label()), style))
        })
        .collect();

    let backend = match &app.backend_status {
        BackendStatus::Connecting => "Connecting...".to_string(),
        BackendStatus::Connected(message) => message.clone(),
        BackendStatus::Unreachable => "Failed to connect to backend".to_string(),
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Resume Coach ")
                .title_bottom(Line::from(format!(" {backend} ")).right_aligned())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.section.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn section_block(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

/// The "nothing to do here yet" view.
fn render_locked(frame: &mut Frame, area: Rect, title: &str, headline: &str, hint: &str) {
    let text = vec![
        Line::default(),
        Line::from(Span::styled(
            headline.to_string(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(section_block(title, Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn call_to_action(app: &App, section: Section, label: &str) -> Line<'static> {
    let enabled = app.gate(section, Intent::Trigger).is_open();
    let style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(format!(" [Enter] {label} "), style))
}

fn loading_line(app: &App, section: Section) -> Option<Line<'static>> {
    let kind = section.artifact();
    app.workflow.loading.get(kind).then(|| {
        Line::from(Span::styled(
            format!("{} {}", app.spinner(), kind.loading_label()),
            Style::default().fg(Color::Yellow),
        ))
    })
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let mut text = vec![
        Line::from(Span::styled(
            "AI Job & Resume Coach",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(
            "Upload your PDF resume to unlock feedback, cover letters, interview practice and job listings.",
        ),
        Line::default(),
        call_to_action(app, Section::Home, "Upload resume (PDF)"),
        Line::default(),
    ];

    if let Some(line) = loading_line(app, Section::Home) {
        text.push(line);
    }

    if app.workflow.resume.is_present() {
        let name = app
            .workflow
            .file
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or("resume");
        text.push(Line::from(Span::styled(
            format!(
                "✓ Resume loaded: {name} ({} characters)",
                app.workflow.resume.text.chars().count()
            ),
            Style::default().fg(Color::Green),
        )));
        text.push(Line::default());
        for line in app.workflow.resume.text.lines().take(PREVIEW_LINES) {
            text.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(text)
        .block(section_block(Section::Home.label(), Color::Cyan))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_feedback(frame: &mut Frame, app: &App, area: Rect) {
    let title = Section::Feedback.label();
    if !app.workflow.resume.is_present() {
        render_locked(
            frame,
            area,
            title,
            "Please upload your resume first to get feedback",
            "Go back to the Home section to upload your PDF resume",
        );
        return;
    }

    let block = section_block(title, Color::Magenta);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let scores = &app.workflow.scores;
    let chart_height = if scores.is_empty() { 0 } else { 12 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(chart_height),
            Constraint::Min(0),
        ])
        .split(inner);

    let mut header = vec![call_to_action(app, Section::Feedback, "Get Feedback")];
    if let Some(line) = loading_line(app, Section::Feedback) {
        header.push(line);
    }
    frame.render_widget(Paragraph::new(header), chunks[0]);

    if !scores.is_empty() {
        render_score_chart(frame, app, chunks[1]);
    }

    if !app.workflow.feedback.is_empty() {
        let mut lines = vec![Line::from(Span::styled(
            "AI Feedback",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))];
        lines.extend(markdown::render(&app.workflow.feedback, chunks[2].width));
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0));
        frame.render_widget(paragraph, chunks[2]);
    }
}

fn render_score_chart(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.workflow.scores.entries();
    let bars: Vec<Bar> = entries
        .iter()
        .map(|entry| {
            Bar::default()
                .value((entry.score * 10.0).round() as u64)
                .text_value(format!("{:.1}", entry.score))
                .label(Line::from(entry.category.clone()))
        })
        .collect();

    let gap = 2u16;
    let count = entries.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / count)
        .saturating_sub(gap)
        .clamp(3, 18);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Resume Score (0-10) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap)
        .max(100)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

fn render_cover_letter(frame: &mut Frame, app: &App, area: Rect) {
    let title = Section::CoverLetter.label();
    if !app.workflow.resume.is_present() {
        render_locked(
            frame,
            area,
            title,
            "Please upload your resume first to generate a cover letter",
            "Go back to the Home section to upload your PDF resume",
        );
        return;
    }

    let block = section_block(title, Color::Green);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    render_job_description(frame, app, chunks[0]);

    let mut header = vec![call_to_action(app, Section::CoverLetter, "Generate Cover Letter")];
    if let Some(line) = loading_line(app, Section::CoverLetter) {
        header.push(line);
    }
    frame.render_widget(Paragraph::new(header), chunks[1]);

    if !app.workflow.cover_letter.is_empty() {
        let letter = Paragraph::new(markdown::render(
            &app.workflow.cover_letter,
            chunks[2].width.saturating_sub(2),
        ))
        .block(
            Block::default()
                .title(" Your Cover Letter ")
                .title_bottom(Line::from(format!(" s: save as {COVER_LETTER_FILE} ")).right_aligned())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
        frame.render_widget(letter, chunks[2]);
    }
}

fn render_job_description(frame: &mut Frame, app: &App, area: Rect) {
    let job = &app.workflow.job_description;
    let content = if job.trim().is_empty() {
        Paragraph::new(Span::styled(
            "Press 'e' to paste the job description here...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(job.as_str()).style(Style::default().fg(Color::White))
    };

    let paragraph = content
        .block(
            Block::default()
                .title(" Job Description ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_interview(frame: &mut Frame, app: &App, area: Rect) {
    let title = Section::Interview.label();
    if !app.workflow.resume.is_present() {
        render_locked(
            frame,
            area,
            title,
            "Please upload your resume first to practice interview questions",
            "Go back to the Home section to upload your PDF resume",
        );
        return;
    }
    if !app.workflow.has_job_description() {
        render_locked(
            frame,
            area,
            title,
            "Please add a job description to generate relevant interview questions",
            "Go to the Cover Letter section to paste a job description",
        );
        return;
    }

    let block = section_block(title, Color::Blue);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let mut header = vec![call_to_action(app, Section::Interview, "Generate Q&A")];
    if let Some(line) = loading_line(app, Section::Interview) {
        header.push(line);
    }
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let qa = &app.workflow.qa;
    if qa.is_empty() {
        return;
    }

    // Leave room for the highlight symbol
    let text_width = usize::from(chunks[1].width.saturating_sub(2)).max(10);
    let mut items = Vec::new();
    let mut selected = None;

    let groups = [
        (0, qa.resume_based(), "based on your resume"),
        (qa.resume_based().len(), qa.job_based(), "based on the job description"),
    ];
    for (offset, pairs, basis) in groups {
        if pairs.is_empty() {
            continue;
        }
        items.push(ListItem::new(vec![
            Line::default(),
            Line::from(Span::styled(
                format!("These {} questions are {basis}:", pairs.len()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ]));
        for (i, pair) in pairs.iter().enumerate() {
            let index = offset + i;
            if index == app.qa_cursor {
                selected = Some(items.len());
            }
            items.push(qa_item(pair, qa.is_expanded(index), text_width));
        }
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(Span::styled(
                    " Sample Interview Q&A ",
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .title_bottom(
                    Line::from(format!(" space: show/hide answer  s: save as {INTERVIEW_FILE} "))
                        .right_aligned(),
                ),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    // The list scrolls by whole items, so a wrapped answer never pushes the
    // selected question out of view.
    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// One question with its answer underneath when expanded, pre-wrapped to
/// `width` columns.
fn qa_item(pair: &QaPair, expanded: bool, width: usize) -> ListItem<'static> {
    let arrow = if expanded { "▾ " } else { "▸ " };
    let question = textwrap::Options::new(width)
        .initial_indent(arrow)
        .subsequent_indent("  ");
    let mut lines: Vec<Line> = textwrap::wrap(&pair.question, question)
        .into_iter()
        .map(|line| {
            Line::from(Span::styled(
                line.into_owned(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    if expanded {
        let answer = textwrap::Options::new(width)
            .initial_indent("    ")
            .subsequent_indent("    ");
        for paragraph in pair.answer.lines() {
            lines.extend(textwrap::wrap(paragraph, &answer).into_iter().map(|line| {
                Line::from(Span::styled(
                    line.into_owned(),
                    Style::default().fg(Color::Cyan),
                ))
            }));
        }
    }

    ListItem::new(lines)
}

fn render_job_links(frame: &mut Frame, app: &App, area: Rect) {
    let title = Section::JobLinks.label();
    if !app.workflow.resume.is_present() {
        render_locked(
            frame,
            area,
            title,
            "Please upload your resume first to find matching jobs",
            "Go back to the Home section to upload your PDF resume",
        );
        return;
    }

    let block = section_block(title, Color::Yellow);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let search = &app.workflow.job_search;
    let mut header = vec![call_to_action(app, Section::JobLinks, "Find Jobs")];
    if let Some(line) = loading_line(app, Section::JobLinks) {
        header.push(line);
    } else if let Some(title) = &search.job_title {
        let location = search.location.as_deref().unwrap_or("anywhere");
        header.push(Line::from(Span::styled(
            format!("Searching for: {title} ({location})"),
            Style::default().fg(Color::Gray),
        )));
    }
    frame.render_widget(Paragraph::new(header), chunks[0]);

    if search.is_empty() {
        return;
    }

    let items: Vec<ListItem> = search.links.iter().map(link_item).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title_bottom(Line::from(" o: open in browser ").right_aligned()),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.link_cursor));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn link_item(link: &JobLink) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<16}", link.platform),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(link.url.clone(), Style::default().fg(Color::Blue)),
    ]))
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.section {
        Section::Home => "u/Enter:upload  1-5:sections  Tab:next  ?:help  q:quit",
        Section::Feedback => "Enter:get feedback  j/k:scroll  Tab:next  ?:help  q:quit",
        Section::CoverLetter => "e:edit job  Enter:generate  s:save  Tab:next  ?:help  q:quit",
        Section::Interview => "Enter:generate  j/k:select  space:answer  s:save  ?:help  q:quit",
        Section::JobLinks => "Enter:find jobs  j/k:select  o:open  Tab:next  ?:help  q:quit",
    };

    let generated = app
        .workflow
        .completed_at(app.section.artifact())
        .map(|at| format!(" | ✓ Generated {}", at.format("%H:%M")))
        .unwrap_or_default();

    let text = format!("{hints}{generated}");
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App) {
    let (title, area) = match app.input_mode {
        InputMode::JobDescription => (
            " Job description (Enter: save, Alt+Enter: newline, Esc: cancel) ",
            centered_rect(70, 50, frame.area()),
        ),
        _ => (
            " Path to your PDF resume (Enter: upload, Esc: cancel) ",
            centered_rect(60, 20, frame.area()),
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    // Clear the area first
    frame.render_widget(Clear, area);

    let input_text = format!("> {}_", app.input);
    let paragraph = Paragraph::new(input_text)
        .block(block)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_notification(frame: &mut Frame, app: &App) {
    let Some(note) = &app.notification else {
        return;
    };

    let color = match note.kind {
        NotificationKind::Advisory => Color::Red,
        NotificationKind::Info => Color::Green,
    };

    let full = frame.area();
    let width = (full.width * 3 / 5).max(30).min(full.width);
    let area = Rect {
        x: full.x + (full.width.saturating_sub(width)) / 2,
        y: full.y + 3.min(full.height.saturating_sub(3)),
        width,
        height: 3,
    }
    .intersection(full);
    if area.is_empty() {
        return;
    }

    let paragraph = Paragraph::new(note.message.as_str())
        .alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Sections:",
        "   1-5        Jump to section",
        "   Tab        Next section",
        "   Shift+Tab  Previous section",
        "",
        " Actions:",
        "   u          Upload resume (PDF)",
        "   Enter / g  Run the section's action",
        "   e          Edit job description",
        "   j / ↓      Move down / scroll",
        "   k / ↑      Move up / scroll",
        "   PgUp/PgDn  Scroll faster",
        "   space      Show/hide interview answer",
        "   o          Open job link in browser",
        "   s          Save cover letter / Q&A as .txt",
        "",
        " General:",
        "   ?          Toggle this help",
        "   q          Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

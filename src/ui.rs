use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;
use crate::app::App;
use crate::message::{Message, Role};

const TITLE: &str = " Manage your Tasks with Tickle 🤖 ";
const PLACEHOLDER: &str = "Type your message...";

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c != '*' || chars.peek() != Some(&'*') {
            current_text.push(c);
            continue;
        }
        chars.next();

        let mut bold_text = String::new();
        let mut found_close = false;
        while let Some(c) = chars.next() {
            if c == '*' && chars.peek() == Some(&'*') {
                chars.next();
                found_close = true;
                break;
            }
            bold_text.push(c);
        }

        if found_close && !bold_text.is_empty() {
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }
            spans.push(Span::styled(bold_text, Style::default().add_modifier(Modifier::BOLD)));
        } else {
            // No closing **, keep it literal
            current_text.push_str("**");
            current_text.push_str(&bold_text);
            if found_close {
                current_text.push_str("**");
            }
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

fn role_style(role: Role) -> Style {
    let color = match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Yellow,
        Role::Error => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(msg.role.label(), role_style(msg.role)))];

    match msg.role {
        Role::User => {
            lines.extend(msg.content.lines().map(|l| Line::from(l.to_string())));
        }
        Role::Assistant => {
            lines.extend(msg.content.lines().map(parse_markdown_line));
        }
        Role::Error => {
            let style = Style::default().fg(Color::Red);
            lines.extend(msg.content.lines().map(|l| Line::from(Span::styled(l.to_string(), style))));
        }
    }

    lines.push(Line::default());
    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

/// The chat pane contents, wrapped as drawn. Shared with the scroll maths in
/// `App` so both agree on the number of lines.
pub fn chat_paragraph(app: &App) -> Paragraph<'static> {
    let in_flight = app.conversation.is_in_flight();
    let messages = app.conversation.messages();

    let chat_text = if messages.is_empty() && !in_flight {
        Text::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let mut lines: Vec<Line<'static>> = messages.iter().flat_map(message_lines).collect();

        if in_flight {
            lines.push(Line::from(Span::styled(
                Role::Assistant.label(),
                role_style(Role::Assistant),
            )));
            // Animated dots: ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                dots,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )));
        }

        Text::from(lines)
    };

    Paragraph::new(chat_text).wrap(Wrap { trim: false })
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, for scroll calculations
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);
    app.sync_chat_scroll();

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.client.endpoint()));

    let chat = chat_paragraph(app)
        .block(chat_block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

/// Slice of the draft that fits in `width` columns with the cursor visible.
/// Returns the text and the cursor's column within it.
fn visible_input(draft: &str, cursor: usize, width: usize) -> (String, u16) {
    let widths: Vec<usize> = draft
        .chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .collect();
    let cursor = cursor.min(widths.len());

    // Drop leading chars until everything up to the cursor, plus the cursor
    // cell itself, fits
    let mut start = 0;
    let mut cursor_col: usize = widths[..cursor].iter().sum();
    while start < cursor && cursor_col + 1 > width {
        cursor_col -= widths[start];
        start += 1;
    }

    let mut used = 0;
    let visible: String = draft
        .chars()
        .zip(&widths)
        .skip(start)
        .take_while(|(_, w)| {
            used += **w;
            used <= width
        })
        .map(|(c, _)| c)
        .collect();

    (visible, cursor_col as u16)
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let [field_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(7),
    ])
    .areas(area);

    let in_flight = app.conversation.is_in_flight();
    let can_submit = app.conversation.can_submit();

    let field_color = if in_flight { Color::DarkGray } else { Color::Yellow };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(field_color))
        .title(" Message ");

    let inner_width = field_area.width.saturating_sub(2) as usize;
    let draft = app.conversation.draft();
    let (visible_text, cursor_x) = visible_input(draft, app.conversation.cursor(), inner_width);

    let input = if draft.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let style = if in_flight {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Paragraph::new(visible_text).style(style)
    };
    frame.render_widget(input.block(input_block), field_area);

    let button_style = if can_submit {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(Line::from(Span::styled(" ➤ ", button_style)).centered())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if can_submit { Color::Cyan } else { Color::DarkGray })),
        );
    frame.render_widget(button, button_area);

    if !in_flight {
        frame.set_cursor_position((field_area.x + cursor_x + 1, field_area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (status, status_style) = if app.conversation.is_in_flight() {
        (" WAITING ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        (" READY ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let footer_content = Line::from(vec![
        Span::styled(status, status_style),
        Span::styled(" ", label_style),
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

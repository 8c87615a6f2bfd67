use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::comments::CommentsState;
use crate::config::ColorConfig;
use crate::domain::{FeedKind, Story};
use crate::feed::FeedDisplay;
use crate::format::{date_label, host_from_url, now_millis, strip_html, time_ago};
use crate::tui::app::{InputMode, PicksState, TuiApp, SHOW_HN_RULES_URL};

/// Lines per story row in the list.
const STORY_ROWS: u16 = 2;

const SHOW_HN_INTRO: &str = "Show HN is for something you've made that other people can try. \
The community can give feedback and ask questions in the thread.";

const SHOW_HN_SECTIONS: [(&str, &[&str]); 3] = [
    (
        "On-topic",
        &["Things people can run on their computers or hold in their hands. \
For hardware, a video or detailed article is fine. For books, a sample chapter is okay."],
    ),
    (
        "Off-topic",
        &["Blog posts, sign-up pages, newsletters, lists, and other reading-only material. \
If it can't be tried out, it can't be a Show HN."],
    ),
    (
        "Best practices",
        &[
            "- Make it easy for users to try your thing without barriers like signups or emails.",
            "- Be around to discuss and answer questions.",
            "- Don't ask friends to upvote or comment.",
            "- Major overhauls are okay; small updates usually aren't.",
        ],
    ),
];

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Feed tabs and filters
            Constraint::Length(3), // Best picks
            Constraint::Min(6),    // Stories
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0], colors);
    render_picks(frame, app, chunks[1], colors);
    render_stories(frame, app, chunks[2], colors);
    render_status_bar(frame, app, chunks[3], colors);

    if app.comments.is_open() {
        render_comments(frame, app, frame.area(), colors);
    } else if app.rules_open {
        render_rules(frame, frame.area(), colors);
    }
}

fn render_header(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(44)])
        .split(area);

    let kind = app.view.kind();
    let titles: Vec<Line> = FeedKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, k)| Line::from(format!("{} {}", idx + 1, k.label())))
        .collect();
    let selected = FeedKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Hacker News ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.active_border)),
        )
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(colors.tab_active)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let filter = app.view.filter();
    let mut spans = Vec::new();
    if kind.uses_date_filter() {
        spans.push(Span::styled(
            format!("< {} >", date_label(filter.selected_date)),
            Style::default().fg(colors.tab_active),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw(format!(
        "range:{}",
        filter.range.map(|r| r.as_str()).unwrap_or("all")
    )));
    if kind.supports_sort() {
        spans.push(Span::raw(format!("  sort:{}", filter.sort.label())));
    }
    if !filter.search.trim().is_empty() {
        spans.push(Span::styled(
            format!("  /{}", filter.search.trim()),
            Style::default().fg(colors.notice),
        ));
    }

    let info = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Filters ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.inactive_border)),
    );
    frame.render_widget(info, chunks[1]);
}

fn render_picks(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let line = match &app.picks {
        PicksState::Loading => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(colors.metadata),
        )),
        PicksState::Failed(e) => Line::from(Span::styled(
            format!("Failed to load picks: {}", e),
            Style::default().fg(colors.error),
        )),
        PicksState::Loaded(stories) if stories.is_empty() => Line::from("No picks"),
        PicksState::Loaded(stories) => {
            let mut spans = Vec::new();
            for (idx, story) in stories.iter().enumerate() {
                if idx > 0 {
                    spans.push(Span::styled(" | ", Style::default().fg(colors.metadata)));
                }
                spans.push(Span::styled(
                    format!("{} ", story.score.unwrap_or(0)),
                    Style::default().fg(colors.score),
                ));
                spans.push(Span::styled(
                    story.title.clone(),
                    Style::default().fg(colors.title),
                ));
            }
            Line::from(spans)
        }
    };

    let block = Block::default()
        .title(" Best picks ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.inactive_border));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_stories(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = !app.comments.is_open() && !app.rules_open;
    let border_style = if is_active {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    };
    app.list_capacity = (area.height.saturating_sub(2) / STORY_ROWS).max(1) as usize;

    let notice = |text: String, color| {
        Paragraph::new(Span::styled(text, Style::default().fg(color)))
            .wrap(Wrap { trim: true })
    };

    let body = match &app.display {
        FeedDisplay::Stories(_) => None,
        FeedDisplay::Loading => Some(notice("Loading...".into(), colors.metadata)),
        FeedDisplay::Failed(e) => Some(notice(format!("Failed to load stories: {}", e), colors.error)),
        FeedDisplay::Searching {
            date,
            pages_scanned,
        } => Some(notice(
            format!(
                "Searching for stories on {} ({} pages scanned)...",
                date_label(*date),
                pages_scanned
            ),
            colors.notice,
        )),
        FeedDisplay::NoQualifyingYet { date } => Some(notice(
            format!(
                "No top stories on {} in the loaded pages. Try another date.",
                date_label(*date)
            ),
            colors.notice,
        )),
        FeedDisplay::Empty => Some(notice("No stories".into(), colors.metadata)),
    };

    let title = format!(
        " {} ({}) [{}/{}]{} ",
        app.view.kind().label(),
        app.stories().len(),
        app.story_index + 1,
        app.stories().len().max(1),
        if app.view.is_fetching() { " loading" } else { "" }
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(paragraph) = body {
        frame.render_widget(paragraph.block(block), area);
        return;
    }

    let now = now_millis();
    let items: Vec<ListItem> = app
        .stories()
        .iter()
        .map(|story| story_item(story, now, colors))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn story_item(story: &Story, now: i64, colors: &ColorConfig) -> ListItem<'static> {
    let title = Line::from(vec![
        Span::styled(story.title.clone(), Style::default().fg(colors.title)),
        Span::styled(
            format!(" ({})", host_from_url(story.url.as_deref())),
            Style::default().fg(colors.host),
        ),
    ]);

    let age = story.time.map(|t| time_ago(t, now)).unwrap_or_default();
    let meta = Line::from(vec![
        Span::styled(
            format!("  {} points", story.score.unwrap_or(0)),
            Style::default().fg(colors.score),
        ),
        Span::styled(
            format!(
                " by {} {} | {} comments",
                story.author(),
                age,
                story.comment_count()
            ),
            Style::default().fg(colors.metadata),
        ),
    ]);

    ListItem::new(Text::from(vec![title, meta]))
}

fn render_comments(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let popup = centered_rect(80, 80, area);
    frame.render_widget(Clear, popup);

    let title = app
        .comments
        .story()
        .map(|s| format!(" {} ", s.title))
        .unwrap_or_else(|| " Comments ".to_string());

    let mut lines = Vec::new();
    match app.comments.state() {
        CommentsState::Idle | CommentsState::Loading => {
            lines.push(Line::from(Span::styled(
                "Loading comments...",
                Style::default().fg(colors.metadata),
            )));
        }
        CommentsState::Failed(e) => {
            lines.push(Line::from(Span::styled(
                format!("Failed to load comments: {}", e),
                Style::default().fg(colors.error),
            )));
        }
        CommentsState::Loaded(comments) if comments.is_empty() => {
            lines.push(Line::from("No comments yet"));
        }
        CommentsState::Loaded(comments) => {
            let now = now_millis();
            for comment in comments {
                let age = comment.time.map(|t| time_ago(t, now)).unwrap_or_default();
                lines.push(Line::from(Span::styled(
                    format!("{} {}", comment.author(), age),
                    Style::default()
                        .fg(colors.host)
                        .add_modifier(Modifier::BOLD),
                )));
                let body = comment.text.as_deref().map(strip_html).unwrap_or_default();
                for line in body.lines() {
                    lines.push(Line::from(line.to_string()));
                }
                lines.push(Line::from(""));
            }
        }
    }

    let block = Block::default()
        .title(title)
        .title_bottom(" j/k:Scroll  o:Open  Esc:Close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.active_border));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.comments.scroll(), 0));

    frame.render_widget(paragraph, popup);
}

fn render_rules(frame: &mut Frame, area: Rect, colors: &ColorConfig) {
    let popup = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(Span::styled(SHOW_HN_INTRO, Style::default().fg(colors.metadata))),
        Line::from(""),
    ];
    for (heading, body) in SHOW_HN_SECTIONS {
        lines.push(Line::from(Span::styled(
            heading,
            Style::default()
                .fg(colors.tab_active)
                .add_modifier(Modifier::BOLD),
        )));
        lines.extend(body.iter().map(|text| Line::from(*text)));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("Full details: {}", SHOW_HN_RULES_URL),
        Style::default().fg(colors.host),
    )));

    let block = Block::default()
        .title(" Show HN: rules and tips ")
        .title_bottom(" o:Open official page  Esc:Close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.active_border));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if app.input_mode == InputMode::Search {
        format!("/{}_  (Enter:Apply  Esc:Clear)", app.search_input)
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if let Some(e) = app.view.error().filter(|_| !app.stories().is_empty()) {
        format!("Failed to load more: {} (R to retry)", e)
    } else {
        "j/k:Nav  Tab/1-6:Feed  /:Search  h/l:Day  t:Today  g:Range  S:Sort  c:Comments  o:Open  ?:Rules  R:Refresh  q:Quit"
            .to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

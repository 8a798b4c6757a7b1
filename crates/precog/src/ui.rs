//! Rendering
//!
//! Drawing is a pure function of the session. The only thing it hands back
//! is the [`HitMap`] of where the choices ended up, for mouse picks.

use path_replay::journey;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};
use ratatui::Frame;
use std::time::Instant;

use crate::error::ViewError;
use crate::input::{HitMap, InputEvent, KeyMap};
use crate::session::Session;
use crate::theme::Theme;

/// Rows given to each choice card
const CHOICE_HEIGHT: u16 = 5;

/// Draw a full frame
pub fn draw(
    frame: &mut Frame,
    session: &Session,
    theme: &Theme,
    keys: &KeyMap,
    now: Instant,
) -> HitMap {
    let mut hits = HitMap::new();
    let screen = frame.area();
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(screen);

    draw_header(frame, header, session, theme);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    draw_situation(frame, left, session, theme);
    if session.is_exploring() {
        draw_choices(frame, right, session, theme, keys, &mut hits);
    } else {
        draw_journey(frame, right, session, theme);
    }

    draw_footer(frame, footer, session, theme, keys);

    if session.is_replay_open() {
        // The modal covers the choices
        hits.clear();
        draw_replay(frame, screen, session, theme, keys);
    }

    draw_toasts(frame, screen, session, theme, now);
    hits
}

fn draw_header(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let tree = session.tree();
    let mut spans = vec![Span::styled(" PreCog ", theme.heading_style())];
    if !tree.scenario().is_empty() {
        spans.push(Span::styled(tree.scenario().to_string(), theme.text_style()));
    }
    if let Some(months) = tree.time_horizon_months() {
        spans.push(Span::styled(
            format!("  ·  {months} month horizon"),
            theme.muted_style(),
        ));
    }
    if !session.is_exploring() {
        spans.push(Span::styled("  ·  shared journey", theme.muted_style()));
    }
    frame.render_widget(Line::from(spans), area);
}

/// Left panel: the world before any choice, or the latest world update
fn draw_situation(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();

    let title = match session.current_node() {
        None => {
            let world = session.tree().world_state();
            if !world.current_date.is_empty() {
                lines.push(Line::styled(world.current_date.clone(), theme.muted_style()));
                lines.push(Line::default());
            }
            lines.push(Line::styled(world.description.clone(), theme.text_style()));

            for (label, items) in [
                ("Key events", &world.key_events),
                ("Key players", &world.key_players),
                ("Factors", &world.contextual_factors),
            ] {
                if items.is_empty() {
                    continue;
                }
                lines.push(Line::default());
                lines.push(Line::styled(label, theme.heading_style()));
                lines.extend(
                    items
                        .iter()
                        .map(|item| Line::styled(format!("• {item}"), theme.text_style())),
                );
            }
            " Current world ".to_string()
        }
        Some(node) => {
            lines.push(Line::from(vec![
                Span::styled(
                    node.branch_type.label(),
                    Style::default().fg(theme.branch(node.branch_type)),
                ),
                Span::styled(format!("  {}", node.timeline_date), theme.muted_style()),
            ]));
            lines.push(Line::default());
            lines.push(Line::styled(
                node.title.clone(),
                theme.text_style().add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::default());
            lines.push(Line::styled(node.world_update.clone(), theme.text_style()));
            if node.is_leaf() {
                lines.push(Line::default());
                lines.push(Line::styled(
                    "This is where this future ends.",
                    theme.muted_style(),
                ));
            }
            format!(" Step {} ", session.path().len())
        }
    };

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Line::styled(title, theme.heading_style()));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

/// Right panel while exploring: numbered, branch-colored choices
fn draw_choices(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    theme: &Theme,
    keys: &KeyMap,
    hits: &mut HitMap,
) {
    let choices = session.current_choices();
    let outer = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Line::styled(" What happens next? ", theme.heading_style()));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if choices.is_empty() {
        let hint = format!(
            "No further choices. Press {} to watch your journey or {} to start over.",
            keys.label(InputEvent::OpenReplay),
            keys.label(InputEvent::Reset)
        );
        frame.render_widget(
            Paragraph::new(hint)
                .style(theme.muted_style())
                .wrap(Wrap { trim: true }),
            inner.inner(Margin::new(1, 1)),
        );
        return;
    }

    let pending = session.pending_index();
    let rows = Layout::vertical(
        choices
            .iter()
            .map(|_| Constraint::Length(CHOICE_HEIGHT))
            .chain(std::iter::once(Constraint::Min(0))),
    )
    .split(inner);

    for (index, (choice, row)) in choices.iter().zip(rows.iter()).enumerate() {
        let color = theme.branch(choice.branch_type);
        let is_pending = pending == Some(index);
        let border = if is_pending {
            Style::default()
                .fg(theme.pending)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        let block = Block::bordered()
            .border_type(if is_pending {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(border)
            .title(Line::from(vec![
                Span::styled(format!(" {} ", index + 1), border),
                Span::styled(
                    format!("{} ", choice.branch_type.label()),
                    Style::default().fg(color),
                ),
            ]));

        let text = Text::from(vec![
            Line::styled(
                choice.title.clone(),
                theme.text_style().add_modifier(Modifier::BOLD),
            ),
            Line::styled(choice.description.clone(), theme.muted_style()),
        ]);
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
            *row,
        );
        hits.push(*row, index);
    }
}

/// Right panel for a shared path: the steps taken
fn draw_journey(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let tree = session.tree();
    let mut lines: Vec<Line> = Vec::new();

    for (step, id) in session.path().iter().enumerate() {
        let Some(node) = tree.node_by_id(id) else {
            continue;
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", step + 1), theme.muted_style()),
            Span::styled(
                node.title.clone(),
                Style::default()
                    .fg(theme.branch(node.branch_type))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", node.timeline_date), theme.muted_style()),
        ]));
        lines.push(Line::styled(
            format!("    {}", node.world_update),
            theme.text_style(),
        ));
    }

    if lines.is_empty() {
        lines.push(Line::styled("No journey to display", theme.muted_style()));
    }

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Line::styled(" Journey ", theme.heading_style()));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme, keys: &KeyMap) {
    let numeric = session.numeric_path();
    let path_line = if numeric.is_empty() {
        Line::styled(" Start your journey...", theme.muted_style())
    } else {
        Line::from(vec![
            Span::styled(" Path: ", theme.muted_style()),
            Span::styled(numeric, theme.heading_style()),
        ])
    };

    let mut hints = Vec::new();
    if session.is_exploring() {
        hints.push("1-9 choose".to_string());
        hints.push(format!("{} back", keys.label(InputEvent::Back)));
        hints.push(format!("{} reset", keys.label(InputEvent::Reset)));
    }
    hints.push(format!("{} replay", keys.label(InputEvent::OpenReplay)));
    hints.push(format!("{} quit", keys.label(InputEvent::Quit)));

    frame.render_widget(
        Paragraph::new(vec![
            path_line,
            Line::styled(format!(" {}", hints.join("  ·  ")), theme.muted_style()),
        ]),
        area,
    );
}

/// Replay overlay, revealing one level at a time
fn draw_replay(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme, keys: &KeyMap) {
    let area = centered(area, 80, 80);
    let levels = journey::levels(session.tree(), session.path());
    let sequencer = session.sequencer();
    let mut lines: Vec<Line> = Vec::new();

    for (index, level) in levels.iter().enumerate() {
        let reveal = sequencer.reveal(index);
        if !reveal.alternatives {
            continue;
        }

        let edge = if reveal.chosen_edge {
            Span::styled(
                " ──▶ ",
                Style::default().fg(theme.branch(level.incoming())),
            )
        } else {
            Span::raw("     ")
        };

        let mut spans = vec![
            Span::styled(format!("{:>2}", index + 1), theme.muted_style()),
            edge,
        ];
        for (alt_index, alt) in level.alternatives.iter().enumerate() {
            let color = theme.branch(alt.branch_type);
            let chosen = alt_index == level.chosen_index;
            let style = if chosen && reveal.chosen_node {
                Style::default()
                    .fg(color)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if chosen && reveal.chosen_edge {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };
            spans.push(Span::styled(format!(" {} ", alt.title), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));

        if reveal.chosen_node {
            lines.push(Line::styled(
                format!("       {}  {}", level.chosen.timeline_date, level.chosen.world_update),
                theme.muted_style(),
            ));
        }
        lines.push(Line::default());
    }

    let clock = sequencer.clock();
    let status = if clock.is_running() {
        format!(" step {}/{} ", clock.step(), clock.total_steps())
    } else {
        format!(" {} ", session.numeric_path())
    };

    let block = Block::bordered()
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.accent))
        .title(Line::styled(" Your journey ", theme.heading_style()))
        .title_bottom(Line::from(vec![
            Span::styled(status, theme.heading_style()),
            Span::styled(
                format!(
                    " {} share · {} close ",
                    keys.label(InputEvent::Share),
                    keys.label(InputEvent::Close)
                ),
                theme.muted_style(),
            ),
        ]));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn draw_toasts(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme, now: Instant) {
    let width = area.width.min(48);
    let mut y = area.y + 1;

    for toast in session.toasts().visible(now) {
        let height = if toast.body.is_some() { 4 } else { 3 };
        if y + height > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
        y += height;

        let color = theme.toast(toast.kind);
        let block = Block::bordered()
            .border_style(Style::default().fg(color))
            .title(Line::styled(
                format!(" {} ", toast.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        let body = toast.body.clone().unwrap_or_default();

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(body)
                .style(theme.text_style())
                .wrap(Wrap { trim: false })
                .block(block),
            rect,
        );
    }
}

/// Blocking error screen
pub fn draw_error(frame: &mut Frame, error: &ViewError, theme: &Theme, keys: &KeyMap) {
    let area = centered(frame.area(), 60, 40);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error))
        .title(Line::styled(
            format!(" {} ", error.title()),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::styled(error.to_string(), theme.text_style()),
        Line::default(),
        Line::styled(
            format!("Press {} to quit.", keys.label(InputEvent::Quit)),
            theme.muted_style(),
        ),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn centered(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Percentage(height_percent)])
        .flex(Flex::Center)
        .areas(area);
    area
}

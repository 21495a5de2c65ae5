//! Math quiz rendering.
//!
//! Layout: header + phase body + message log. Popups are drawn centred on
//! top; overlays (profile, leaderboard) are full-screen replacements.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::time::now_ms;
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::leaderboard::{Leaderboard, Period};
use super::scoring::format_winnings;
use super::state::{Level, LevelState, Outcome, Phase, Popup, Resolution, Round};
use super::stats::GameStatsSummary;
use super::{Overlay, QuizGame, GROUP_TAB_WINDOW};

const GRID_COLUMNS: u32 = 10;

pub fn render(game: &QuizGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    if let Some(overlay) = game.overlay {
        match overlay {
            Overlay::Profile => render_profile(game, f, area, click_state),
            Overlay::Leaderboard => render_leaderboard(game, f, area, click_state),
            Overlay::Account => render_account_form(game, f, area, click_state),
        }
        return;
    }

    let borders = borders_for(area.width);
    let log_h = if is_narrow_layout(area.width) { 4 } else { 6 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(log_h),
        ])
        .split(area);

    render_header(game, f, chunks[0], borders);
    match game.engine.phase() {
        Phase::LevelSelect => render_level_select(game, f, chunks[1], borders, click_state),
        Phase::InRound(round) => render_round(game, round, f, chunks[1], borders, click_state),
        Phase::Resolved(resolution) => {
            render_resolution(game, resolution, f, chunks[1], borders, click_state)
        }
    }
    render_log(game, f, chunks[2], borders);

    if let Some(popup) = game.engine.popup() {
        render_popup(popup, f, area, click_state);
    }
}

// ── Helpers ─────────────────────────────────────────────────

/// `█` for the share left, `░` for the rest.
fn meter(fraction: f64, width: usize) -> (String, Color) {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let bar = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(empty);
    let color = if fraction > 0.5 {
        Color::Green
    } else if fraction > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };
    (bar, color)
}

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    }
}

fn panel(borders: Borders, title: &str, color: Color) -> Block<'static> {
    Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn level_style(state: LevelState) -> Style {
    match state {
        LevelState::Completed => Style::default().fg(Color::Green),
        LevelState::Current => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LevelState::Open => Style::default().fg(Color::White),
        LevelState::Locked => Style::default().fg(Color::DarkGray),
    }
}

fn blank(cl: &mut ClickableList) {
    cl.push(Line::from(""));
}

// ── Header ──────────────────────────────────────────────────

fn render_header(game: &QuizGame, f: &mut Frame, area: Rect, borders: Borders) {
    let feed = game.feed.borrow();
    let line = Line::from(vec![
        Span::styled(
            format!(" Lv.{}", feed.current_level),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  Unlocked {}/{}",
                feed.max_unlocked_level,
                game.engine.config().level_count
            ),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("  Score {}", game.engine.session_score()),
            Style::default().fg(Color::White),
        ),
    ]);
    let title = if is_narrow_layout(area.width) { "Quiz" } else { "Math Quiz" };
    f.render_widget(Paragraph::new(line).block(panel(borders, title, Color::Cyan)), area);
}

// ── Level grid ──────────────────────────────────────────────

fn render_level_select(
    game: &QuizGame,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(7),
        ])
        .split(area);

    let config = game.engine.config();
    let narrow = is_narrow_layout(area.width);
    let mut cs = click_state.borrow_mut();

    // Group tabs
    let window_start = game.tab_window_start();
    let window_end = (window_start + GROUP_TAB_WINDOW).min(config.group_count());
    let mut tabs = TabBar::new("\u{2502}").block(
        Block::default()
            .borders(borders)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    for (slot, group) in (window_start..window_end).enumerate() {
        let levels = config.group_levels(group);
        let label = if narrow {
            (group + 1).to_string()
        } else {
            format!("{}-{}", levels.start(), levels.end())
        };
        tabs = tabs.tab(label, GROUP_TAB_BASE + slot as u16);
    }
    tabs.active(game.page.saturating_sub(window_start) as usize)
        .render(f, chunks[0], &mut cs);

    // Grid
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let levels = game.page_levels();
    let first = *levels.start();
    let last = *levels.end();
    let cell_w = (inner.width / GRID_COLUMNS as u16).max(1);
    let rows_total = (last - first + 1).div_ceil(GRID_COLUMNS);
    let visible = inner.height as u32;

    // keep the row holding the current level on screen
    let current = game.engine.progress().current_level();
    let focus_row = if levels.contains(&current) {
        (current - first) / GRID_COLUMNS
    } else {
        0
    };
    let top = focus_row
        .saturating_sub(visible.saturating_sub(1))
        .min(rows_total.saturating_sub(visible));

    let mut lines = Vec::new();
    for row in top..(top + visible).min(rows_total) {
        let mut spans = Vec::new();
        for col in 0..GRID_COLUMNS {
            let level = first + row * GRID_COLUMNS + col;
            if level > last {
                break;
            }
            spans.push(Span::styled(
                grid_label(level, first, cell_w),
                level_style(game.engine.level_state(level)),
            ));
            cs.add_click_target(
                Rect::new(
                    inner.x + col as u16 * cell_w,
                    inner.y + (row - top) as u16,
                    cell_w,
                    1,
                ),
                level_action(level, first),
            );
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), inner);

    // Controls
    let last_page = config.group_count() - 1;
    let mut cl = ClickableList::new();
    cl.push_choice('s', format!("Play level {current}"), PLAY_CURRENT);
    if game.page > 0 {
        cl.push_choice('<', "Previous levels", PREV_GROUP);
    } else {
        cl.push_choice_dim('<', "Previous levels", PREV_GROUP);
    }
    if game.page < last_page {
        cl.push_choice('>', "Next levels", NEXT_GROUP);
    } else {
        cl.push_choice_dim('>', "Next levels", NEXT_GROUP);
    }
    cl.push_choice('p', "Profile", OPEN_PROFILE);
    cl.push_choice('t', "Leaderboard", OPEN_LEADERBOARD);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    cl.register_targets(chunks[2], &mut cs, 1, 1, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), chunks[2]);
}

/// Centred level number; falls back to the position within the page when
/// the full number does not fit the cell.
fn grid_label(level: Level, first_on_page: Level, cell_w: u16) -> String {
    let width = cell_w as usize;
    let mut label = level.to_string();
    if label.len() > width {
        label = (level - first_on_page + 1).to_string();
    }
    format!("{label:^width$}")
}

// ── Round ───────────────────────────────────────────────────

fn render_round(
    game: &QuizGame,
    round: &Round,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let question = &round.question;
    let bar_w = if is_narrow_layout(area.width) { 12 } else { 24 };
    let (bar, color) = meter(round.timer.fraction_left(), bar_w);
    let seconds = game.feed.borrow().time_left;

    let mut cl = ClickableList::new();
    blank(&mut cl);
    cl.push(Line::from(Span::styled(
        format!(" {}", question.prompt),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    blank(&mut cl);
    cl.push(Line::from(vec![
        Span::styled(" Time ", Style::default().fg(Color::Gray)),
        Span::styled(bar, Style::default().fg(color)),
        Span::styled(format!(" {seconds}s"), Style::default().fg(Color::White)),
    ]));
    blank(&mut cl);
    for (i, option) in question.options.iter().enumerate() {
        cl.push_choice((b'1' + i as u8) as char, option.clone(), ANSWER_BASE + i as u16);
    }
    blank(&mut cl);
    cl.push_choice_dim('q', "Leave round", LEAVE_ROUND);

    let block = panel(borders, &format!("Level {}", question.level), Color::Cyan);
    let inner_width = block.inner(area).width;
    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, inner_width);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Resolution ──────────────────────────────────────────────

fn render_resolution(
    game: &QuizGame,
    resolution: &Resolution,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let question = &resolution.question;
    let result = &resolution.result;

    let mut cl = ClickableList::new();
    blank(&mut cl);
    let (verdict, color) = match resolution.outcome {
        Outcome::Correct => (" \u{2714} Correct!", Color::Green),
        Outcome::Wrong { .. } => (" \u{2718} Wrong answer", Color::Red),
        Outcome::TimedOut => (" \u{231b} Time's up", Color::Red),
    };
    cl.push(Line::from(Span::styled(
        verdict,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    blank(&mut cl);
    cl.push(Line::from(Span::styled(
        format!(" {}", question.prompt.replace('?', question.correct_text())),
        Style::default().fg(Color::White),
    )));
    if let Outcome::Wrong { chosen } = resolution.outcome {
        cl.push(Line::from(Span::styled(
            format!(" You answered {}", question.options[chosen]),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if result.won {
        cl.push(Line::from(vec![
            Span::styled(" Winnings ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_winnings(result.winnings),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]));
        cl.push(Line::from(Span::styled(
            format!(
                " Score {}  {}s left",
                result.score, result.time_left_seconds
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }
    blank(&mut cl);

    if result.won {
        if result.level < game.engine.config().level_count {
            cl.push_choice('n', format!("Next level ({})", result.level + 1), NEXT_LEVEL);
        } else {
            cl.push_choice_dim('n', "Every level cleared", NEXT_LEVEL);
        }
    } else {
        cl.push_choice('r', "Retry", RETRY);
    }
    cl.push_choice('b', "Back to levels", BACK_TO_LEVELS);

    let block = panel(borders, &format!("Level {}", result.level), color);
    let inner_width = block.inner(area).width;
    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, inner_width);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Log ─────────────────────────────────────────────────────

fn render_log(game: &QuizGame, f: &mut Frame, area: Rect, borders: Borders) {
    let feed = game.feed.borrow();
    let max_lines = area.height.saturating_sub(2) as usize;
    let start = feed.entries.len().saturating_sub(max_lines);
    let lines: Vec<Line> = feed.entries[start..]
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(format!(" > {}", entry.text), style))
        })
        .collect();
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ── Popups ──────────────────────────────────────────────────

fn popup_lines(popup: &Popup) -> (&'static str, ClickableList<'static>) {
    let text = Style::default().fg(Color::White);
    let mut cl = ClickableList::new();
    let title = match popup {
        Popup::UnlockRequired {
            requested,
            playable,
        } => {
            cl.push(Line::from(Span::styled(
                format!(" Level {requested} is still locked."),
                text,
            )));
            cl.push(Line::from(Span::styled(
                format!(" Level {playable} is the furthest you can play."),
                text,
            )));
            blank(&mut cl);
            cl.push_choice('p', format!("Play level {playable}"), POPUP_PLAY);
            cl.push_choice('c', "Close", POPUP_CLOSE);
            "Level locked"
        }
        Popup::TimeUp {
            level,
            correct_answer,
        } => {
            cl.push(Line::from(Span::styled(
                format!(" Level {level} ran out of time."),
                text,
            )));
            cl.push(Line::from(Span::styled(
                format!(" The answer was {correct_answer}."),
                text,
            )));
            blank(&mut cl);
            cl.push_choice('c', "Back to levels", POPUP_CLOSE);
            "Time's up"
        }
    };
    (title, cl)
}

fn render_popup(
    popup: &Popup,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let width = area.width.saturating_sub(4).min(48);
    let inner_width = width.saturating_sub(2);

    // measure on a throwaway copy so the real list can register targets first
    let (_, measure) = popup_lines(popup);
    let text_rows = Paragraph::new(measure.into_lines())
        .wrap(Wrap { trim: false })
        .line_count(inner_width);
    let rect = centered(area, width, text_rows as u16 + 2);

    let (title, cl) = popup_lines(popup);
    let mut cs = click_state.borrow_mut();
    // tapping outside the box closes it
    cs.add_click_target(area, POPUP_CLOSE);
    cl.register_targets(rect, &mut cs, 1, 1, inner_width);
    drop(cs);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(panel(Borders::ALL, title, Color::Yellow))
            .wrap(Wrap { trim: false }),
        rect,
    );
}

// ── Profile overlay ─────────────────────────────────────────

fn render_profile(
    game: &QuizGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let borders = borders_for(area.width);
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::White);
    let dim = Style::default().fg(Color::DarkGray);
    let mut cl = ClickableList::new();

    let user = game.accounts.current_user();
    match &user {
        Some(user) => {
            let stats = &user.stats;
            cl.push(Line::from(vec![
                Span::styled(format!(" {}", user.name), heading),
                Span::styled(format!("  {}", user.email), dim),
            ]));
            cl.push(Line::from(Span::styled(
                format!(
                    " Games {}  Won {}  Win rate {}%",
                    stats.total_games,
                    stats.games_won,
                    stats.win_rate()
                ),
                text,
            )));
            cl.push(Line::from(Span::styled(
                format!(
                    " Highest level {}  Streak {} (best {})",
                    stats.highest_level, stats.current_streak, stats.best_streak
                ),
                text,
            )));
            cl.push(Line::from(Span::styled(
                format!(" Total winnings {}", format_winnings(stats.total_winnings)),
                Style::default().fg(Color::Yellow),
            )));
            let rate = stats.progress_rate();
            let (bar, color) = meter(rate as f64 / 100.0, 20);
            cl.push(Line::from(vec![
                Span::styled(" Progress ", Style::default().fg(Color::Gray)),
                Span::styled(bar, Style::default().fg(color)),
                Span::styled(format!(" {rate}%"), text),
            ]));

            blank(&mut cl);
            cl.push(Line::from(Span::styled(" Recent games", heading)));
            if stats.match_history.is_empty() {
                cl.push(Line::from(Span::styled("  none yet", dim)));
            }
            for record in stats.match_history.iter().take(5) {
                let (mark, style) = if record.won {
                    ("\u{2714}", Style::default().fg(Color::Green))
                } else {
                    ("\u{2718}", Style::default().fg(Color::Red))
                };
                cl.push(Line::from(vec![
                    Span::styled(format!("  {mark} "), style),
                    Span::styled(
                        format!(
                            "Lv.{}  {}",
                            record.level,
                            format_winnings(record.winnings)
                        ),
                        text,
                    ),
                ]));
            }
        }
        None => {
            cl.push(Line::from(Span::styled(" Playing as guest", heading)));
            cl.push(Line::from(Span::styled(
                " Wins go on the leaderboard as anonymous.",
                dim,
            )));
        }
    }

    blank(&mut cl);
    let summary = GameStatsSummary::load(game.engine.store().as_ref());
    cl.push(Line::from(Span::styled(" This device", heading)));
    cl.push(Line::from(Span::styled(
        format!(
            "  {} games  {} correct  {} won",
            summary.games_played,
            summary.correct_answers,
            format_winnings(summary.total_winnings)
        ),
        text,
    )));

    let players = game.accounts.players_by_activity();
    if !players.is_empty() {
        blank(&mut cl);
        cl.push(Line::from(Span::styled(" Most active players", heading)));
        for player in players.iter().take(5) {
            cl.push(Line::from(Span::styled(
                format!(
                    "  {}  Lv.{}  {} games",
                    player.name, player.stats.highest_level, player.stats.total_games
                ),
                text,
            )));
        }
    }

    blank(&mut cl);
    if user.is_some() {
        cl.push_choice('o', "Sign out", SIGN_OUT);
    } else {
        cl.push_choice('i', "Sign in", SIGN_IN);
        cl.push_choice('u', "Sign up", SIGN_UP);
    }
    cl.push_choice('c', "Close", CLOSE_OVERLAY);

    let block = panel(borders, "Profile", Color::Cyan);
    let inner_width = block.inner(area).width;
    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, inner_width);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Account form ────────────────────────────────────────────

fn render_account_form(
    game: &QuizGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let form = &game.form;
    let borders = borders_for(area.width);
    let label_style = Style::default().fg(Color::Gray);
    let mut cl = ClickableList::new();

    cl.push(Line::from(Span::styled(
        " Type into the marked field. Tab or Enter moves on.",
        Style::default().fg(Color::DarkGray),
    )));
    blank(&mut cl);
    for i in 0..form.field_count() {
        let focused = i == form.focus;
        let (marker, value_style) = if focused {
            ("\u{25b6}", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            (" ", Style::default().fg(Color::White))
        };
        let cursor = if focused { "_" } else { "" };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" {marker} {:<9}", form.label(i)), label_style),
                Span::styled(format!("{}{cursor}", form.shown_value(i)), value_style),
            ]),
            FORM_FIELD_BASE + i as u16,
        );
    }

    blank(&mut cl);
    if let Some(error) = &form.error {
        cl.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
        blank(&mut cl);
    }
    cl.push_clickable(
        Line::from(Span::styled(
            format!(" \u{2192} {}", form.mode.title()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        FORM_SUBMIT,
    );
    cl.push_clickable(
        Line::from(Span::styled(
            format!(" \u{21c4} {} instead", form.mode.other().title()),
            Style::default().fg(Color::Cyan),
        )),
        FORM_SWITCH,
    );
    cl.push_clickable(
        Line::from(Span::styled(" \u{2190} Back", Style::default().fg(Color::DarkGray))),
        CLOSE_OVERLAY,
    );

    let block = panel(borders, form.mode.title(), Color::Cyan);
    let inner_width = block.inner(area).width;
    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, inner_width);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ── Leaderboard overlay ─────────────────────────────────────

fn render_leaderboard(
    game: &QuizGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let borders = borders_for(area.width);
    let narrow = is_narrow_layout(area.width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let mut cs = click_state.borrow_mut();

    let mut tabs = TabBar::new("\u{2502}").block(panel(borders, "Leaderboard", Color::Cyan));
    for (i, period) in Period::ALL.iter().enumerate() {
        tabs = tabs.tab(period.label(), PERIOD_TAB_BASE + i as u16);
    }
    let active = Period::ALL
        .iter()
        .position(|p| *p == game.period)
        .unwrap_or(0);
    tabs.active(active).render(f, chunks[0], &mut cs);

    let board = Leaderboard::load(
        game.engine.store().as_ref(),
        game.engine.config().leaderboard_limit,
    );
    let ranked = board.ranked(game.period, now_ms());

    let mut cl = ClickableList::new();
    if ranked.is_empty() {
        cl.push(Line::from(Span::styled(
            " No wins recorded for this period.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let name_w = if narrow { 10 } else { 18 };
    // leave room for the hint and close lines plus borders
    let rows = chunks[1].height.saturating_sub(5) as usize;
    for (i, entry) in ranked.iter().take(rows).enumerate() {
        let style = match i {
            0 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            1 | 2 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::White),
        };
        let name: String = entry.name.chars().take(name_w).collect();
        let line = if narrow {
            format!(" {:>2}. {name:<name_w$} Lv.{}", i + 1, entry.level)
        } else {
            format!(
                " {:>3}. {name:<name_w$} Lv.{:<5} {:>4} pts  {}",
                i + 1,
                entry.level,
                entry.score,
                format_winnings(entry.winnings)
            )
        };
        cl.push(Line::from(Span::styled(line, style)));
    }

    blank(&mut cl);
    cl.push(Line::from(Span::styled(
        " D daily  W weekly  A all time",
        Style::default().fg(Color::DarkGray),
    )));
    cl.push_choice('c', "Close", CLOSE_OVERLAY);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    cl.register_targets(chunks[1], &mut cs, 1, 1, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_fills_share_left() {
        let (bar, color) = meter(0.5, 10);
        assert_eq!(bar, "\u{2588}".repeat(5) + &"\u{2591}".repeat(5));
        assert_eq!(color, Color::Yellow);
        assert_eq!(meter(1.0, 4).1, Color::Green);
        assert_eq!(meter(0.1, 4).1, Color::Red);
        assert_eq!(meter(2.0, 4).0.chars().count(), 4);
    }

    #[test]
    fn grid_labels_fit_cells() {
        assert_eq!(grid_label(7, 1, 5), "  7  ");
        assert_eq!(grid_label(1000, 901, 3), "100");
        assert_eq!(grid_label(905, 901, 6), " 905  ");
    }

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 80, 30);
        assert_eq!(centered(area, 40, 10), Rect::new(20, 10, 40, 10));
        assert_eq!(centered(area, 100, 50), area);
    }

    #[test]
    fn popup_offers_redirect() {
        let (title, cl) = popup_lines(&Popup::UnlockRequired {
            requested: 9,
            playable: 4,
        });
        assert_eq!(title, "Level locked");
        let text: Vec<String> = cl
            .into_lines()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.contains(&" [P] Play level 4".to_string()));
    }
}

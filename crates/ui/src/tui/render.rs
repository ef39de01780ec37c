//! Отрисовка: чистая функция от `AppState`

use super::state::{AppState, Tab};
use client::tabs::format_currency;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_tabs(f, chunks[0], state);
    match state.active_tab {
        Tab::Nns => render_nns(f, chunks[1], state),
        Tab::Finances => render_finances(f, chunks[1], state),
        Tab::HorseBets => render_bets(f, chunks[1], state),
        Tab::Todo => render_todo(f, chunks[1], state),
        Tab::Habits => render_habits(f, chunks[1], state),
        Tab::Planning => render_plans(f, chunks[1], state),
    }
    render_status_bar(f, chunks[2], state);
}

fn block<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(title)
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn render_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let caller = state.principal.as_deref().unwrap_or("not logged in");
    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .block(block(format!("KCloud Dashboard | {caller}")))
        .select(state.active_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_nns(f: &mut Frame, area: Rect, state: &AppState) {
    let lines = match &state.view.nns {
        Some(nns) => vec![
            Line::from(vec![
                Span::styled("Staked: ", header_style()),
                Span::raw(nns.staked.clone()),
                Span::styled(
                    format!("  (updated {})", nns.staked_updated),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(vec![
                Span::styled("Maturity earned: ", header_style()),
                Span::raw(nns.earned.clone()),
            ]),
            Line::from(vec![
                Span::styled("Earned per day: ", header_style()),
                Span::raw(nns.earned_per_day.clone()),
            ]),
            Line::from(vec![
                Span::styled("Projected in 30 days: ", header_style()),
                Span::raw(nns.projected.clone()),
                Span::styled(
                    format!("  (updated {})", nns.maturity_updated),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ],
        None => vec![Line::from("Loading NNS data...")],
    };

    let paragraph = Paragraph::new(lines)
        .block(block("NNS Progress"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_finances(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let summary: Vec<Span> = state
        .view
        .summary
        .iter()
        .flat_map(|(label, value)| {
            [
                Span::styled(format!("{label}: "), header_style()),
                Span::raw(format!("{value}   ")),
            ]
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(summary)).block(block("Summary")),
        chunks[0],
    );

    let rows = state.view.bills.iter().map(|bill| {
        let status = if bill.is_paid {
            Cell::from("Paid").style(Style::default().fg(Color::Green))
        } else {
            Cell::from("Unpaid").style(Style::default().fg(Color::Red))
        };
        Row::new(vec![
            Cell::from(bill.id.to_string()),
            Cell::from(bill.title.clone()),
            Cell::from(bill.total.clone()),
            Cell::from(bill.paid.clone()),
            Cell::from(bill.remaining.clone()),
            Cell::from(format!("{}%", bill.progress)),
            status,
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["#", "Bill", "Total", "Paid", "Remaining", "%", "Status"])
            .style(header_style()),
    )
    .block(block("Bills"));
    f.render_widget(table, chunks[1]);
}

fn render_bets(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let stats = match &state.view.bet_stats {
        Some(stats) => {
            let pl_color = if stats.in_profit { Color::Green } else { Color::Red };
            Line::from(vec![
                Span::styled("Bets: ", header_style()),
                Span::raw(format!("{}   ", stats.total_bets)),
                Span::styled("W / L: ", header_style()),
                Span::raw(format!("{}   ", stats.record)),
                Span::styled("Staked: ", header_style()),
                Span::raw(format!("{}   ", stats.total_amount)),
                Span::styled("P/L: ", header_style()),
                Span::styled(stats.profit_loss.clone(), Style::default().fg(pl_color)),
            ])
        }
        None => Line::from("Loading bet stats..."),
    };
    f.render_widget(Paragraph::new(stats).block(block("Stats")), chunks[0]);

    let rows = state.view.bets.iter().map(|bet| {
        let result = if bet.is_win {
            Cell::from("Win").style(Style::default().fg(Color::Green))
        } else {
            Cell::from("Loss").style(Style::default().fg(Color::Red))
        };
        Row::new(vec![
            Cell::from(bet.horse_name.clone()),
            Cell::from(format_currency(bet.amount)),
            Cell::from(format!("{:.2}", bet.odds)),
            result,
            Cell::from(format_currency(bet.net_result())),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(12),
        ],
    )
    .header(Row::new(vec!["Horse", "Amount", "Odds", "Result", "Net"]).style(header_style()))
    .block(block("Bets"));
    f.render_widget(table, chunks[1]);
}

fn render_todo(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let active: Vec<ListItem> = state
        .view
        .active_tasks
        .iter()
        .map(|task| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", task.priority_label()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(format!("#{} {} ", task.id, task.title)),
                Span::styled(
                    format!("({})", task.category),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    f.render_widget(
        List::new(active).block(block(format!(
            "Active ({})",
            state.view.active_tasks.len()
        ))),
        chunks[0],
    );

    let completed: Vec<ListItem> = state
        .view
        .completed_tasks
        .iter()
        .map(|task| {
            ListItem::new(Span::styled(
                format!("✓ {}", task.title),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            ))
        })
        .collect();
    f.render_widget(
        List::new(completed).block(block(format!(
            "Completed ({})",
            state.view.completed_tasks.len()
        ))),
        chunks[1],
    );
}

fn render_habits(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let counts = state.view.habit_counts;
    let line = Line::from(vec![
        Span::styled("Total: ", header_style()),
        Span::raw(format!("{}   ", counts.total)),
        Span::styled("Active: ", header_style()),
        Span::raw(format!("{}   ", counts.active)),
        Span::styled("Goal reached: ", header_style()),
        Span::raw(counts.goal_reached.to_string()),
    ]);
    f.render_widget(Paragraph::new(line).block(block("Overview")), chunks[0]);

    let rows = state.view.habits.iter().map(|habit| {
        let progress_style = if habit.is_goal_reached() {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(habit.name.clone()),
            Cell::from(format!("{}/{}", habit.progress, habit.goal)).style(progress_style),
            Cell::from(format!("{:.0}%", habit.completion_percent())),
            Cell::from(habit.streak.to_string()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["Habit", "Progress", "%", "Streak"]).style(header_style()))
    .block(block("Habits"));
    f.render_widget(table, chunks[1]);
}

fn render_plans(f: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = state
        .view
        .plans
        .iter()
        .map(|plan| {
            let mut lines = vec![Line::from(Span::styled(
                format!("#{} {}", plan.id, plan.title),
                header_style(),
            ))];
            if let Some(first) = plan.notes.lines().next() {
                lines.push(Line::from(format!("  {first}")));
            }
            lines.extend(plan.links.iter().map(|link| {
                Line::from(Span::styled(
                    format!("  -> {link}"),
                    Style::default().fg(Color::Blue),
                ))
            }));
            ListItem::new(lines)
        })
        .collect();

    f.render_widget(
        List::new(items).block(block(format!("Plans ({})", state.view.plans.len()))),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let status_text = if let Some(ref error) = state.error_message {
        Line::from(vec![
            Span::styled(
                "ERROR: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(error.clone(), Style::default().fg(Color::Red)),
        ])
    } else {
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Cyan)),
            Span::raw(state.status_message.clone()),
            Span::raw(" | "),
            Span::styled(
                format!(
                    "cache {} hit / {} miss",
                    state.cache_stats.hits, state.cache_stats.misses
                ),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(" | "),
            Span::styled(
                "←/→ switch tab, 'r' refresh, 'l' logout, 'q' quit",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(Style::default().fg(Color::White));
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::TabData;
    use client::CacheStats;
    use domain::{Bill, BillSummary};
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_all_tab_titles() {
        let state = AppState::new(Some("alice".to_string()));
        let text = rendered_text(&state);

        for tab in Tab::ALL {
            assert!(text.contains(tab.title()), "missing tab {}", tab.title());
        }
        assert!(text.contains("Loading NNS data"));
    }

    #[test]
    fn test_renders_bills_and_errors() {
        let mut state = AppState::new(Some("alice".to_string()));
        state.active_tab = Tab::Finances;
        let bills = vec![Bill::new("Electricity", 80.0, "")];
        state.view.apply(TabData::Finances {
            summary: BillSummary::from_bills(&bills),
            bills,
        });
        state.set_error("Network error");

        let text = rendered_text(&state);
        assert!(text.contains("Electricity"));
        assert!(text.contains("€80.00"));
        assert!(text.contains("ERROR: Network error"));
    }

    #[test]
    fn test_status_bar_shows_cache_stats() {
        let mut state = AppState::new(Some("alice".to_string()));
        state.cache_stats = CacheStats {
            hits: 7,
            misses: 3,
            invalidations: 1,
        };

        let text = rendered_text(&state);
        assert!(text.contains("cache 7 hit / 3 miss"));
    }
}

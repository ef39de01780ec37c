use super::{
    events::{EventHandler, TuiEvent},
    render::render,
    state::{Action, AppState, Tab, TabData},
};
use client::Dashboard;
use common::DashboardResult;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, warn};

type Backend = CrosstermBackend<Stdout>;

/// Загрузить данные вкладки через кэш запросов
pub async fn load_tab(dashboard: &Dashboard, tab: Tab) -> DashboardResult<TabData> {
    let data = match tab {
        Tab::Nns => TabData::Nns(dashboard.full_nns_data().await?),
        Tab::Finances => TabData::Finances {
            summary: dashboard.bill_summary().await?,
            bills: dashboard.bills().await?,
        },
        Tab::HorseBets => TabData::HorseBets {
            stats: dashboard.bet_stats().await?,
            bets: dashboard.horse_bets().await?,
        },
        Tab::Todo => TabData::Todo(dashboard.tasks().await?),
        Tab::Habits => TabData::Habits(dashboard.habits().await?),
        Tab::Planning => TabData::Planning(dashboard.plans().await?),
    };
    Ok(data)
}

/// Завершение работы TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    LoggedOut,
}

pub struct DashboardApp {
    terminal: Terminal<Backend>,
    event_handler: EventHandler,
    state: AppState,
    dashboard: Dashboard,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard) -> DashboardResult<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let principal = dashboard.session().principal().map(|p| p.to_string());
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(250)),
            state: AppState::new(principal),
            dashboard,
        })
    }

    pub async fn run(&mut self) -> DashboardResult<Exit> {
        self.reload().await;

        while !self.state.should_quit {
            let state = &self.state;
            self.terminal.draw(|f| render(f, state))?;

            let Some(event) = self.event_handler.next().await else {
                break;
            };
            match event {
                TuiEvent::Key(key) => match self.state.handle_key(key) {
                    Action::SwitchTab => self.reload().await,
                    Action::Refresh => {
                        self.dashboard.refresh(&self.state.active_tab.query_keys());
                        self.reload().await;
                    }
                    Action::Logout => {
                        self.dashboard.logout()?;
                        return Ok(Exit::LoggedOut);
                    }
                    Action::Quit | Action::None => {}
                },
                TuiEvent::Resize(width, height) => {
                    debug!("Terminal resized to {width}x{height}");
                }
                TuiEvent::Tick => {}
            }
        }

        Ok(Exit::Quit)
    }

    async fn reload(&mut self) {
        let tab = self.state.active_tab;
        self.state.set_status(format!("Loading {}...", tab.title()));

        let loaded = load_tab(&self.dashboard, tab).await;
        self.state.cache_stats = self.dashboard.queries().cache().stats();

        match loaded {
            Ok(data) => {
                self.state.view.apply(data);
                self.state.set_status(format!("{} loaded", tab.title()));
            }
            Err(e) => {
                warn!("Failed to load {}: {}", tab.title(), e);
                self.state.set_error(e.to_string());
            }
        }
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        // Восстановление терминала даже при ошибке
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

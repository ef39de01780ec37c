use super::events::should_quit;
use client::tabs::bets::StatsView;
use client::tabs::finances::{summary_cards, BillRow};
use client::tabs::habits::HabitCounts;
use client::tabs::nns::NnsView;
use client::tabs::todo::split_tasks;
use client::{CacheStats, QueryKey};
use crossterm::event::{KeyCode, KeyEvent};
use domain::{BetStats, Bill, BillSummary, FullNnsData, Habit, HorseBet, Plan, Task};

/// Вкладки в порядке отображения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Nns,
    Finances,
    HorseBets,
    Todo,
    Habits,
    Planning,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Nns,
        Tab::Finances,
        Tab::HorseBets,
        Tab::Todo,
        Tab::Habits,
        Tab::Planning,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Nns => "NNS Progress",
            Tab::Finances => "Finances",
            Tab::HorseBets => "Horse Bets",
            Tab::Todo => "To-Do List",
            Tab::Habits => "Habit Tracker",
            Tab::Planning => "Planning",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Запросы, которые показывает вкладка
    pub fn query_keys(&self) -> Vec<QueryKey> {
        match self {
            Tab::Nns => vec![QueryKey::FullNnsData, QueryKey::NnsState, QueryKey::NnsMaturity],
            Tab::Finances => vec![QueryKey::Bills, QueryKey::BillSummary],
            Tab::HorseBets => vec![QueryKey::HorseBets, QueryKey::BetStats],
            Tab::Todo => vec![QueryKey::Tasks],
            Tab::Habits => vec![QueryKey::Habits],
            Tab::Planning => vec![QueryKey::Plans],
        }
    }
}

/// Загруженные данные одной вкладки
#[derive(Debug, Clone)]
pub enum TabData {
    Nns(FullNnsData),
    Finances {
        summary: BillSummary,
        bills: Vec<Bill>,
    },
    HorseBets {
        stats: BetStats,
        bets: Vec<HorseBet>,
    },
    Todo(Vec<Task>),
    Habits(Vec<Habit>),
    Planning(Vec<Plan>),
}

/// Данные для отрисовки всех вкладок
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub nns: Option<NnsView>,
    pub summary: Vec<(&'static str, String)>,
    pub bills: Vec<BillRow>,
    pub bet_stats: Option<StatsView>,
    pub bets: Vec<HorseBet>,
    pub active_tasks: Vec<Task>,
    pub completed_tasks: Vec<Task>,
    pub habit_counts: HabitCounts,
    pub habits: Vec<Habit>,
    pub plans: Vec<Plan>,
}

impl DashboardView {
    pub fn apply(&mut self, data: TabData) {
        match data {
            TabData::Nns(data) => self.nns = Some(NnsView::from(&data)),
            TabData::Finances { summary, bills } => {
                self.summary = summary_cards(&summary).to_vec();
                self.bills = bills.iter().map(BillRow::from).collect();
            }
            TabData::HorseBets { stats, bets } => {
                self.bet_stats = Some(StatsView::from(&stats));
                self.bets = bets;
            }
            TabData::Todo(tasks) => {
                let (active, completed) = split_tasks(&tasks);
                self.active_tasks = active.into_iter().cloned().collect();
                self.completed_tasks = completed.into_iter().cloned().collect();
            }
            TabData::Habits(habits) => {
                self.habit_counts = HabitCounts::from_habits(&habits);
                self.habits = habits;
            }
            TabData::Planning(plans) => self.plans = plans,
        }
    }
}

/// Что приложение должно сделать после нажатия клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    SwitchTab,
    Refresh,
    Logout,
    Quit,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: Tab,
    pub view: DashboardView,
    pub principal: Option<String>,
    pub status_message: String,
    pub error_message: Option<String>,
    pub cache_stats: CacheStats,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(principal: Option<String>) -> Self {
        Self {
            principal,
            status_message: "Ready".to_string(),
            ..Self::default()
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if should_quit(&key) {
            self.quit();
            return Action::Quit;
        }

        match key.code {
            KeyCode::Right | KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                Action::SwitchTab
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.active_tab = self.active_tab.previous();
                Action::SwitchTab
            }
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('l') => Action::Logout,
            _ => Action::None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.error_message = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::TaskPriority;

    #[test]
    fn test_tab_order_and_wrapping() {
        let titles: Vec<_> = Tab::ALL.iter().map(Tab::title).collect();
        assert_eq!(
            titles,
            vec![
                "NNS Progress",
                "Finances",
                "Horse Bets",
                "To-Do List",
                "Habit Tracker",
                "Planning"
            ]
        );
        assert_eq!(Tab::default(), Tab::Nns);
        assert_eq!(Tab::Planning.next(), Tab::Nns);
        assert_eq!(Tab::Nns.previous(), Tab::Planning);
    }

    #[test]
    fn test_key_handling() {
        let mut state = AppState::new(Some("alice".to_string()));

        assert_eq!(state.handle_key(KeyCode::Right.into()), Action::SwitchTab);
        assert_eq!(state.active_tab, Tab::Finances);
        assert_eq!(state.handle_key(KeyCode::Tab.into()), Action::SwitchTab);
        assert_eq!(state.active_tab, Tab::HorseBets);
        assert_eq!(state.handle_key(KeyCode::Left.into()), Action::SwitchTab);
        assert_eq!(state.active_tab, Tab::Finances);

        assert_eq!(state.handle_key(KeyCode::Char('r').into()), Action::Refresh);
        assert_eq!(state.handle_key(KeyCode::Char('l').into()), Action::Logout);
        assert_eq!(state.handle_key(KeyCode::Char('x').into()), Action::None);
        assert!(!state.should_quit);

        assert_eq!(state.handle_key(KeyCode::Esc.into()), Action::Quit);
        assert!(state.should_quit);
    }

    #[test]
    fn test_refresh_keys_per_tab() {
        assert!(Tab::Nns.query_keys().contains(&QueryKey::FullNnsData));
        assert_eq!(Tab::Planning.query_keys(), vec![QueryKey::Plans]);
    }

    #[test]
    fn test_apply_todo_splits_tasks() {
        let mut done = Task::new("Done", "", "Home", TaskPriority::Low);
        done.is_complete = true;
        let tasks = vec![Task::new("Open", "", "Home", TaskPriority::High), done];

        let mut view = DashboardView::default();
        view.apply(TabData::Todo(tasks));
        assert_eq!(view.active_tasks.len(), 1);
        assert_eq!(view.completed_tasks[0].title, "Done");
    }

    #[test]
    fn test_apply_finances() {
        let mut view = DashboardView::default();
        let bills = vec![Bill::new("Rent", 500.0, "")];
        view.apply(TabData::Finances {
            summary: BillSummary::from_bills(&bills),
            bills,
        });

        assert_eq!(view.summary[0], ("Total Owed", "€500.00".to_string()));
        assert_eq!(view.bills[0].progress, 0);
    }
}

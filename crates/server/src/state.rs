use backend::DashboardService;
use std::sync::Arc;

/// Общее состояние обработчиков
#[derive(Clone)]
pub struct State {
    pub service: Arc<DashboardService>,
}

impl State {
    pub fn new(service: DashboardService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

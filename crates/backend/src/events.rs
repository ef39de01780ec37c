use domain::{EntityId, Principal, UserRole};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::warn;

/// Буфер событий на подписчика; отставший подписчик теряет старые события
pub const EVENT_BUFFER: usize = 256;

/// Событие об успешной мутации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    CallerRegistered { principal: Principal, role: UserRole },
    RoleAssigned { principal: Principal, role: UserRole },
    ProfileSaved { owner: Principal },
    NnsStateUpdated { owner: Principal },
    NnsMaturityUpdated { owner: Principal },
    BillAdded { owner: Principal, bill_id: EntityId },
    BillEdited { owner: Principal, bill_id: EntityId },
    PaymentAdded {
        owner: Principal,
        bill_id: EntityId,
        payment_id: EntityId,
        bill_paid: bool,
    },
    HorseBetAdded { owner: Principal, bet_id: EntityId },
    TaskAdded { owner: Principal, task_id: EntityId },
    TaskCompleted { owner: Principal, task_id: EntityId },
    HabitAdded { owner: Principal, habit_id: EntityId },
    HabitProgressUpdated {
        owner: Principal,
        habit_id: EntityId,
        goal_reached: bool,
    },
    PlanAdded { owner: Principal, plan_id: EntityId },
    PlanUpdated { owner: Principal, plan_id: EntityId },
    PlanDeleted { owner: Principal, plan_id: EntityId },
}

impl DashboardEvent {
    /// Владелец затронутых данных
    pub fn owner(&self) -> &Principal {
        match self {
            DashboardEvent::CallerRegistered { principal, .. }
            | DashboardEvent::RoleAssigned { principal, .. } => principal,
            DashboardEvent::ProfileSaved { owner }
            | DashboardEvent::NnsStateUpdated { owner }
            | DashboardEvent::NnsMaturityUpdated { owner }
            | DashboardEvent::BillAdded { owner, .. }
            | DashboardEvent::BillEdited { owner, .. }
            | DashboardEvent::PaymentAdded { owner, .. }
            | DashboardEvent::HorseBetAdded { owner, .. }
            | DashboardEvent::TaskAdded { owner, .. }
            | DashboardEvent::TaskCompleted { owner, .. }
            | DashboardEvent::HabitAdded { owner, .. }
            | DashboardEvent::HabitProgressUpdated { owner, .. }
            | DashboardEvent::PlanAdded { owner, .. }
            | DashboardEvent::PlanUpdated { owner, .. }
            | DashboardEvent::PlanDeleted { owner, .. } => owner,
        }
    }
}

/// Поток событий сервиса. Видит только события, отправленные после подписки.
pub struct DashboardEventStream {
    rx: broadcast::Receiver<DashboardEvent>,
}

impl DashboardEventStream {
    pub(crate) fn new(rx: broadcast::Receiver<DashboardEvent>) -> Self {
        Self { rx }
    }

    /// Получить следующее событие; None когда сервис закрыт
    pub async fn next(&mut self) -> Option<DashboardEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event subscriber lagged, dropped oldest events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Забрать событие без ожидания
    pub fn try_next(&mut self) -> Option<DashboardEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event subscriber lagged, dropped oldest events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

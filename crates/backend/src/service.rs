use crate::cache::OwnerCache;
use crate::events::{DashboardEvent, DashboardEventStream, EVENT_BUFFER};
use crate::outcall::{transform, HttpOutcall, ReqwestOutcall};
use common::{DashboardError, DashboardResult, ValidationError};
use domain::config::DashboardConfig;
use domain::{
    now_nanos, BetStats, Bill, BillSummary, EntityId, FullNnsData, Habit, HorseBet,
    HttpResponsePayload, NnsMaturity, NnsState, Payment, Plan, Principal, Task, Time,
    TransformArgs, UserProfile, UserRole,
};
use std::sync::Arc;
use store::DashboardStore;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, trace, warn};

/// Метка времени: значение клиента, либо текущее время если не задано
fn stamp(time: Time) -> Time {
    if time > 0 {
        time
    } else {
        now_nanos()
    }
}

/// Backend дашборда: контроль доступа, бизнес-правила, кэши и события
pub struct DashboardService {
    // Хранилище с пулом соединений
    store: DashboardStore,
    // Исполнитель HTTP outcall'ов
    outcall: Arc<dyn HttpOutcall>,
    // LRU кэши агрегатов по владельцу
    summary_cache: OwnerCache<BillSummary>,
    stats_cache: OwnerCache<BetStats>,
    // Канал событий для реактивности
    events_tx: broadcast::Sender<DashboardEvent>,
}

impl DashboardService {
    pub fn new(store: DashboardStore, outcall: Arc<dyn HttpOutcall>, cache_size: usize) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        Self {
            store,
            outcall,
            summary_cache: OwnerCache::new(cache_size),
            stats_cache: OwnerCache::new(cache_size),
            events_tx,
        }
    }

    /// Собрать сервис по конфигурации: SQLite хранилище и reqwest outcall
    pub async fn from_config(config: &DashboardConfig) -> DashboardResult<Self> {
        let store = store::open_store(&config.storage).await?;
        let outcall = Arc::new(ReqwestOutcall::new(&config.outcall)?);

        info!(
            "DashboardService initialized (db: {})",
            config.storage.db_path.display()
        );
        Ok(Self::new(store, outcall, config.storage.summary_cache_size))
    }

    /// Подписаться на события мутаций, начиная с текущего момента
    pub fn subscribe(&self) -> DashboardEventStream {
        DashboardEventStream::new(self.events_tx.subscribe())
    }

    /// Отправить событие; без подписчиков оно никуда не сохраняется
    fn emit_event(&self, event: DashboardEvent) {
        if self.events_tx.send(event).is_err() {
            trace!("No event subscribers");
        }
    }

    fn invalidate_bills(&self, owner: &Principal) {
        self.summary_cache.invalidate(owner);
    }

    fn invalidate_bets(&self, owner: &Principal) {
        self.stats_cache.invalidate(owner);
    }

    // === Access control ===

    /// Роль вызывающего; неизвестный principal регистрируется
    async fn role_of(&self, caller: &Principal) -> DashboardResult<UserRole> {
        if caller.is_anonymous() {
            return Ok(UserRole::Guest);
        }
        if let Some(role) = self.store.get_role(caller).await? {
            return Ok(role);
        }

        let role = self.store.register_caller(caller).await?;
        self.emit_event(DashboardEvent::CallerRegistered {
            principal: caller.clone(),
            role,
        });
        Ok(role)
    }

    async fn require_user(&self, caller: &Principal, action: &str) -> DashboardResult<UserRole> {
        let role = self.role_of(caller).await?;
        if !role.has_user_access() {
            warn!(caller = %caller, action, "Rejected call from guest");
            return Err(DashboardError::Unauthorized(format!(
                "Only users can {action}"
            )));
        }
        Ok(role)
    }

    pub async fn get_caller_user_role(&self, caller: &Principal) -> DashboardResult<UserRole> {
        self.role_of(caller).await
    }

    pub async fn is_caller_admin(&self, caller: &Principal) -> DashboardResult<bool> {
        Ok(self.role_of(caller).await? == UserRole::Admin)
    }

    #[instrument(skip(self), fields(caller = %caller))]
    pub async fn assign_caller_user_role(
        &self,
        caller: &Principal,
        user: &Principal,
        role: UserRole,
    ) -> DashboardResult<()> {
        if self.role_of(caller).await? != UserRole::Admin {
            return Err(DashboardError::Unauthorized(
                "Only admins can assign user roles".to_string(),
            ));
        }
        if user.is_anonymous() {
            return Err(ValidationError::InvalidInput {
                field: "user".to_string(),
                reason: "the anonymous principal is always a guest".to_string(),
            }
            .into());
        }

        self.store.set_role(user, role).await?;
        self.emit_event(DashboardEvent::RoleAssigned {
            principal: user.clone(),
            role,
        });
        info!("Assigned role {} to {}", role, user);
        Ok(())
    }

    pub async fn get_caller_user_profile(
        &self,
        caller: &Principal,
    ) -> DashboardResult<Option<UserProfile>> {
        self.require_user(caller, "view profiles").await?;
        self.store.get_profile(caller).await
    }

    pub async fn save_caller_user_profile(
        &self,
        caller: &Principal,
        profile: UserProfile,
    ) -> DashboardResult<()> {
        self.require_user(caller, "save profiles").await?;
        if profile.name.trim().is_empty() {
            return Err(domain::DomainError::EmptyField("Name").into());
        }

        self.store.save_profile(caller, &profile).await?;
        self.emit_event(DashboardEvent::ProfileSaved {
            owner: caller.clone(),
        });
        Ok(())
    }

    pub async fn get_user_profile(
        &self,
        caller: &Principal,
        user: &Principal,
    ) -> DashboardResult<Option<UserProfile>> {
        let role = self.require_user(caller, "view profiles").await?;
        if caller != user && role != UserRole::Admin {
            return Err(DashboardError::Unauthorized(
                "Can only view your own profile".to_string(),
            ));
        }
        self.store.get_profile(user).await
    }

    // === NNS ===

    pub async fn get_nns_state(&self, caller: &Principal) -> DashboardResult<NnsState> {
        self.require_user(caller, "view NNS state").await?;
        Ok(self.store.get_nns_state(caller).await?.unwrap_or_default())
    }

    pub async fn update_nns_state(
        &self,
        caller: &Principal,
        mut state: NnsState,
    ) -> DashboardResult<NnsState> {
        self.require_user(caller, "update NNS state").await?;
        state.validate()?;
        state.last_updated = stamp(state.last_updated);

        self.store.put_nns_state(caller, &state).await?;
        self.emit_event(DashboardEvent::NnsStateUpdated {
            owner: caller.clone(),
        });
        Ok(state)
    }

    pub async fn get_nns_maturity(&self, caller: &Principal) -> DashboardResult<NnsMaturity> {
        self.require_user(caller, "view NNS maturity").await?;
        Ok(self.store.get_nns_maturity(caller).await?.unwrap_or_default())
    }

    pub async fn update_nns_maturity(
        &self,
        caller: &Principal,
        mut maturity: NnsMaturity,
    ) -> DashboardResult<NnsMaturity> {
        self.require_user(caller, "update NNS maturity").await?;
        maturity.validate()?;
        maturity.last_updated = stamp(maturity.last_updated);

        self.store.put_nns_maturity(caller, &maturity).await?;
        self.emit_event(DashboardEvent::NnsMaturityUpdated {
            owner: caller.clone(),
        });
        Ok(maturity)
    }

    pub async fn get_full_nns_data(&self, caller: &Principal) -> DashboardResult<FullNnsData> {
        self.require_user(caller, "view NNS data").await?;
        Ok(FullNnsData {
            nns_state: self.store.get_nns_state(caller).await?.unwrap_or_default(),
            maturity: self.store.get_nns_maturity(caller).await?.unwrap_or_default(),
        })
    }

    /// Получить живые данные NNS: GET через outcall, transform, тело как UTF-8
    #[instrument(skip(self), fields(caller = %caller))]
    pub async fn fetch_nns_live_data(&self, caller: &Principal, url: &str) -> DashboardResult<String> {
        self.require_user(caller, "fetch NNS data").await?;

        let response = self.outcall.get(url).await?;
        let clean = self.transform(TransformArgs {
            response,
            context: Vec::new(),
        });
        if !clean.is_success() {
            warn!(url, status = clean.status, "NNS outcall returned non-success status");
        }

        Ok(String::from_utf8_lossy(&clean.body).into_owned())
    }

    pub fn transform(&self, args: TransformArgs) -> HttpResponsePayload {
        transform(args)
    }

    // === Bills ===

    pub async fn get_bills(&self, caller: &Principal) -> DashboardResult<Vec<Bill>> {
        self.require_user(caller, "view bills").await?;
        self.store.list_bills(caller).await
    }

    async fn existing_bill(&self, caller: &Principal, bill_id: EntityId) -> DashboardResult<Bill> {
        self.store
            .get_bill(caller, bill_id)
            .await?
            .ok_or_else(|| DashboardError::NotFound(format!("Bill {bill_id}")))
    }

    #[instrument(skip(self, bill), fields(caller = %caller))]
    pub async fn add_bill(&self, caller: &Principal, bill: Bill) -> DashboardResult<Bill> {
        self.require_user(caller, "add bills").await?;
        bill.validate()?;

        let bill = Bill {
            id: 0,
            remaining_balance: bill.total_amount,
            is_paid: false,
            created_at: stamp(bill.created_at),
            ..bill
        };
        let created = self.store.insert_bill(caller, bill).await?;

        self.invalidate_bills(caller);
        self.emit_event(DashboardEvent::BillAdded {
            owner: caller.clone(),
            bill_id: created.id,
        });
        debug!("Created bill: {} ({})", created.title, created.id);
        Ok(created)
    }

    #[instrument(skip(self, updated), fields(caller = %caller))]
    pub async fn edit_bill(
        &self,
        caller: &Principal,
        bill_id: EntityId,
        updated: Bill,
    ) -> DashboardResult<Bill> {
        self.require_user(caller, "edit bills").await?;
        let bill = self.store.revise_bill(caller, bill_id, &updated).await?;

        self.invalidate_bills(caller);
        self.emit_event(DashboardEvent::BillEdited {
            owner: caller.clone(),
            bill_id,
        });
        Ok(bill)
    }

    #[instrument(skip(self, payment), fields(caller = %caller, bill_id = payment.bill_id))]
    pub async fn add_payment(&self, caller: &Principal, payment: Payment) -> DashboardResult<Payment> {
        self.require_user(caller, "add payments").await?;

        let payment = Payment {
            id: 0,
            timestamp: stamp(payment.timestamp),
            ..payment
        };
        let (bill, stored) = self.store.record_payment(caller, payment).await?;

        self.invalidate_bills(caller);
        self.emit_event(DashboardEvent::PaymentAdded {
            owner: caller.clone(),
            bill_id: bill.id,
            payment_id: stored.id,
            bill_paid: bill.is_paid,
        });
        if bill.is_paid {
            info!("Bill {} fully paid", bill.id);
        }
        Ok(stored)
    }

    pub async fn get_bill_payments(
        &self,
        caller: &Principal,
        bill_id: EntityId,
    ) -> DashboardResult<Vec<Payment>> {
        self.require_user(caller, "view payments").await?;
        self.existing_bill(caller, bill_id).await?;
        self.store.list_payments(caller, bill_id).await
    }

    /// Сводка по счетам с LRU кэшем на владельца
    pub async fn get_bill_summary(&self, caller: &Principal) -> DashboardResult<BillSummary> {
        self.require_user(caller, "view bill summary").await?;

        let seen = match self.summary_cache.lookup(caller) {
            Ok(summary) => return Ok(summary),
            Err(generation) => generation,
        };

        let bills = self.store.list_bills(caller).await?;
        let summary = BillSummary::from_bills(&bills);
        if !self.summary_cache.put_if_current(caller, summary.clone(), seen) {
            debug!("Bill summary of {} changed while computing, not cached", caller);
        }
        Ok(summary)
    }

    // === Horse bets ===

    pub async fn get_horse_bets(&self, caller: &Principal) -> DashboardResult<Vec<HorseBet>> {
        self.require_user(caller, "view bets").await?;
        self.store.list_bets(caller).await
    }

    pub async fn add_horse_bet(&self, caller: &Principal, bet: HorseBet) -> DashboardResult<HorseBet> {
        self.require_user(caller, "add bets").await?;
        bet.validate()?;

        let bet = HorseBet {
            id: 0,
            timestamp: stamp(bet.timestamp),
            ..bet
        };
        let created = self.store.insert_bet(caller, bet).await?;

        self.invalidate_bets(caller);
        self.emit_event(DashboardEvent::HorseBetAdded {
            owner: caller.clone(),
            bet_id: created.id,
        });
        Ok(created)
    }

    /// Статистика ставок с LRU кэшем на владельца
    pub async fn get_bet_stats(&self, caller: &Principal) -> DashboardResult<BetStats> {
        self.require_user(caller, "view bet stats").await?;

        let seen = match self.stats_cache.lookup(caller) {
            Ok(stats) => return Ok(stats),
            Err(generation) => generation,
        };

        let bets = self.store.list_bets(caller).await?;
        let stats = BetStats::from_bets(&bets);
        if !self.stats_cache.put_if_current(caller, stats.clone(), seen) {
            debug!("Bet stats of {} changed while computing, not cached", caller);
        }
        Ok(stats)
    }

    // === Tasks ===

    pub async fn get_tasks(&self, caller: &Principal) -> DashboardResult<Vec<Task>> {
        self.require_user(caller, "view tasks").await?;
        self.store.list_tasks(caller).await
    }

    pub async fn add_task(&self, caller: &Principal, task: Task) -> DashboardResult<Task> {
        self.require_user(caller, "add tasks").await?;
        task.validate()?;

        let task = Task {
            id: 0,
            is_complete: false,
            timestamp: stamp(task.timestamp),
            ..task
        };
        let created = self.store.insert_task(caller, task).await?;

        self.emit_event(DashboardEvent::TaskAdded {
            owner: caller.clone(),
            task_id: created.id,
        });
        Ok(created)
    }

    /// Отметить задачу выполненной; повторный вызов ничего не меняет
    pub async fn complete_task(&self, caller: &Principal, task_id: EntityId) -> DashboardResult<Task> {
        self.require_user(caller, "complete tasks").await?;

        let task = self
            .store
            .get_task(caller, task_id)
            .await?
            .ok_or_else(|| DashboardError::NotFound(format!("Task {task_id}")))?;
        if task.is_complete {
            return Ok(task);
        }

        // Событие шлёт только тот вызов, который действительно перевёл задачу
        if self.store.complete_task(caller, task_id).await? {
            self.emit_event(DashboardEvent::TaskCompleted {
                owner: caller.clone(),
                task_id,
            });
        }
        Ok(Task {
            is_complete: true,
            ..task
        })
    }

    // === Habits ===

    pub async fn get_habits(&self, caller: &Principal) -> DashboardResult<Vec<Habit>> {
        self.require_user(caller, "view habits").await?;
        self.store.list_habits(caller).await
    }

    pub async fn add_habit(&self, caller: &Principal, habit: Habit) -> DashboardResult<Habit> {
        self.require_user(caller, "add habits").await?;
        habit.validate()?;

        let habit = Habit {
            id: 0,
            progress: 0,
            streak: 0,
            last_updated: stamp(habit.last_updated),
            ..habit
        };
        let created = self.store.insert_habit(caller, habit).await?;

        self.emit_event(DashboardEvent::HabitAdded {
            owner: caller.clone(),
            habit_id: created.id,
        });
        Ok(created)
    }

    pub async fn update_habit_progress(
        &self,
        caller: &Principal,
        habit_id: EntityId,
        progress: u64,
    ) -> DashboardResult<Habit> {
        self.require_user(caller, "update habits").await?;

        let habit = self
            .store
            .record_habit_progress(caller, habit_id, progress, now_nanos())
            .await?;

        self.emit_event(DashboardEvent::HabitProgressUpdated {
            owner: caller.clone(),
            habit_id,
            goal_reached: habit.is_goal_reached(),
        });
        Ok(habit)
    }

    // === Plans ===

    pub async fn get_plans(&self, caller: &Principal) -> DashboardResult<Vec<Plan>> {
        self.require_user(caller, "view plans").await?;
        self.store.list_plans(caller).await
    }

    pub async fn add_plan(&self, caller: &Principal, plan: Plan) -> DashboardResult<Plan> {
        self.require_user(caller, "add plans").await?;
        plan.validate()?;

        let plan = Plan {
            id: 0,
            title: plan.title.trim().to_string(),
            links: plan.normalized_links()?,
            timestamp: stamp(plan.timestamp),
            ..plan
        };
        let created = self.store.insert_plan(caller, plan).await?;

        self.emit_event(DashboardEvent::PlanAdded {
            owner: caller.clone(),
            plan_id: created.id,
        });
        Ok(created)
    }

    pub async fn update_plan(
        &self,
        caller: &Principal,
        plan_id: EntityId,
        updated: Plan,
    ) -> DashboardResult<Plan> {
        self.require_user(caller, "update plans").await?;
        updated.validate()?;

        let existing = self
            .store
            .get_plan(caller, plan_id)
            .await?
            .ok_or_else(|| DashboardError::NotFound(format!("Plan {plan_id}")))?;

        let plan = Plan {
            id: existing.id,
            title: updated.title.trim().to_string(),
            notes: updated.notes.clone(),
            links: updated.normalized_links()?,
            timestamp: now_nanos(),
        };
        self.store.update_plan(caller, &plan).await?;

        self.emit_event(DashboardEvent::PlanUpdated {
            owner: caller.clone(),
            plan_id,
        });
        Ok(plan)
    }

    pub async fn delete_plan(&self, caller: &Principal, plan_id: EntityId) -> DashboardResult<()> {
        self.require_user(caller, "delete plans").await?;

        if !self.store.delete_plan(caller, plan_id).await? {
            return Err(DashboardError::NotFound(format!("Plan {plan_id}")));
        }

        self.emit_event(DashboardEvent::PlanDeleted {
            owner: caller.clone(),
            plan_id,
        });
        Ok(())
    }
}

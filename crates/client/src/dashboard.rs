use crate::actor::Actor;
use crate::mutation::Mutation;
use crate::query::{QueryClient, QueryKey};
use crate::session::Session;
use crate::transport::{HttpTransport, Transport};
use common::DashboardResult;
use domain::config::ClientConfig;
use domain::{
    BetStats, Bill, BillSummary, EntityId, FullNnsData, Habit, HorseBet, NnsMaturity, NnsState,
    Payment, Plan, Principal, Task, UserProfile, UserRole,
};
use std::sync::Arc;
use tracing::debug;

/// Запросы через кэш и мутации с инвалидацией поверх `Actor`
pub struct Dashboard {
    actor: Actor,
    queries: QueryClient,
}

impl Dashboard {
    pub fn new(actor: Actor, queries: QueryClient) -> Self {
        let cache = queries.cache().clone();
        actor.session().on_clear(move || cache.clear());
        Self { actor, queries }
    }

    /// HTTP транспорт и файл сессии из конфигурации
    pub fn connect(config: &ClientConfig) -> DashboardResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        let session = Arc::new(Session::load(config.session_path()));
        Self::new(
            Actor::new(transport, session),
            QueryClient::from_config(config),
        )
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn session(&self) -> &Arc<Session> {
        self.actor.session()
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn login(&self, principal: Principal) -> DashboardResult<()> {
        self.session().login(principal)
    }

    pub fn logout(&self) -> DashboardResult<()> {
        self.session().logout()
    }

    /// Сделать ключи устаревшими (кнопка обновления)
    pub fn refresh(&self, keys: &[QueryKey]) {
        self.queries.invalidate(keys);
    }

    fn after(&self, mutation: Mutation) {
        debug!("Mutation {} succeeded", mutation.name());
        self.queries.invalidate_for(&mutation);
    }

    // === Queries ===

    pub async fn profile(&self) -> DashboardResult<Option<UserProfile>> {
        self.queries
            .query(QueryKey::CurrentUserProfile, || {
                self.actor.get_caller_user_profile()
            })
            .await
    }

    pub async fn caller_role(&self) -> DashboardResult<UserRole> {
        self.queries
            .query(QueryKey::CallerRole, || self.actor.get_caller_user_role())
            .await
    }

    pub async fn nns_state(&self) -> DashboardResult<NnsState> {
        self.queries
            .query(QueryKey::NnsState, || self.actor.get_nns_state())
            .await
    }

    pub async fn nns_maturity(&self) -> DashboardResult<NnsMaturity> {
        self.queries
            .query(QueryKey::NnsMaturity, || self.actor.get_nns_maturity())
            .await
    }

    pub async fn full_nns_data(&self) -> DashboardResult<FullNnsData> {
        self.queries
            .query(QueryKey::FullNnsData, || self.actor.get_full_nns_data())
            .await
    }

    pub async fn bills(&self) -> DashboardResult<Vec<Bill>> {
        self.queries
            .query(QueryKey::Bills, || self.actor.get_bills())
            .await
    }

    pub async fn bill_summary(&self) -> DashboardResult<BillSummary> {
        self.queries
            .query(QueryKey::BillSummary, || self.actor.get_bill_summary())
            .await
    }

    pub async fn bill_payments(&self, bill_id: EntityId) -> DashboardResult<Vec<Payment>> {
        self.queries
            .query(QueryKey::BillPayments(bill_id), || {
                self.actor.get_bill_payments(bill_id)
            })
            .await
    }

    pub async fn horse_bets(&self) -> DashboardResult<Vec<HorseBet>> {
        self.queries
            .query(QueryKey::HorseBets, || self.actor.get_horse_bets())
            .await
    }

    pub async fn bet_stats(&self) -> DashboardResult<BetStats> {
        self.queries
            .query(QueryKey::BetStats, || self.actor.get_bet_stats())
            .await
    }

    pub async fn tasks(&self) -> DashboardResult<Vec<Task>> {
        self.queries
            .query(QueryKey::Tasks, || self.actor.get_tasks())
            .await
    }

    pub async fn habits(&self) -> DashboardResult<Vec<Habit>> {
        self.queries
            .query(QueryKey::Habits, || self.actor.get_habits())
            .await
    }

    pub async fn plans(&self) -> DashboardResult<Vec<Plan>> {
        self.queries
            .query(QueryKey::Plans, || self.actor.get_plans())
            .await
    }

    // === Mutations ===

    pub async fn save_profile(&self, profile: UserProfile) -> DashboardResult<()> {
        self.actor.save_caller_user_profile(profile).await?;
        self.after(Mutation::SaveProfile);
        Ok(())
    }

    pub async fn assign_role(&self, user: Principal, role: UserRole) -> DashboardResult<()> {
        self.actor.assign_caller_user_role(user, role).await?;
        self.after(Mutation::AssignRole);
        Ok(())
    }

    pub async fn update_nns_state(&self, state: NnsState) -> DashboardResult<NnsState> {
        let saved = self.actor.update_nns_state(state).await?;
        self.after(Mutation::UpdateNnsState);
        Ok(saved)
    }

    pub async fn update_nns_maturity(&self, maturity: NnsMaturity) -> DashboardResult<NnsMaturity> {
        let saved = self.actor.update_nns_maturity(maturity).await?;
        self.after(Mutation::UpdateNnsMaturity);
        Ok(saved)
    }

    pub async fn add_bill(&self, bill: Bill) -> DashboardResult<Bill> {
        let created = self.actor.add_bill(bill).await?;
        self.after(Mutation::AddBill);
        Ok(created)
    }

    pub async fn edit_bill(&self, bill_id: EntityId, bill: Bill) -> DashboardResult<Bill> {
        let saved = self.actor.edit_bill(bill_id, bill).await?;
        self.after(Mutation::EditBill);
        Ok(saved)
    }

    pub async fn add_payment(&self, payment: Payment) -> DashboardResult<Payment> {
        let bill_id = payment.bill_id;
        let stored = self.actor.add_payment(payment).await?;
        self.after(Mutation::AddPayment { bill_id });
        Ok(stored)
    }

    pub async fn add_horse_bet(&self, bet: HorseBet) -> DashboardResult<HorseBet> {
        let created = self.actor.add_horse_bet(bet).await?;
        self.after(Mutation::AddHorseBet);
        Ok(created)
    }

    pub async fn add_task(&self, task: Task) -> DashboardResult<Task> {
        let created = self.actor.add_task(task).await?;
        self.after(Mutation::AddTask);
        Ok(created)
    }

    pub async fn complete_task(&self, task_id: EntityId) -> DashboardResult<Task> {
        let task = self.actor.complete_task(task_id).await?;
        self.after(Mutation::CompleteTask);
        Ok(task)
    }

    pub async fn add_habit(&self, habit: Habit) -> DashboardResult<Habit> {
        let created = self.actor.add_habit(habit).await?;
        self.after(Mutation::AddHabit);
        Ok(created)
    }

    pub async fn update_habit_progress(
        &self,
        habit_id: EntityId,
        progress: u64,
    ) -> DashboardResult<Habit> {
        let habit = self.actor.update_habit_progress(habit_id, progress).await?;
        self.after(Mutation::UpdateHabitProgress);
        Ok(habit)
    }

    pub async fn add_plan(&self, plan: Plan) -> DashboardResult<Plan> {
        let created = self.actor.add_plan(plan).await?;
        self.after(Mutation::AddPlan);
        Ok(created)
    }

    pub async fn update_plan(&self, plan_id: EntityId, plan: Plan) -> DashboardResult<Plan> {
        let saved = self.actor.update_plan(plan_id, plan).await?;
        self.after(Mutation::UpdatePlan);
        Ok(saved)
    }

    pub async fn delete_plan(&self, plan_id: EntityId) -> DashboardResult<()> {
        self.actor.delete_plan(plan_id).await?;
        self.after(Mutation::DeletePlan);
        Ok(())
    }
}

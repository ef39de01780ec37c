//! Типизированный фасад над транспортом: один метод на операцию backend'а

use crate::session::Session;
use crate::transport::Transport;
use common::{DashboardError, DashboardResult};
use domain::{
    BetStats, Bill, BillSummary, Call, EntityId, FullNnsData, Habit, HorseBet,
    HttpResponsePayload, NnsMaturity, NnsState, Payment, Plan, Principal, Task, TransformArgs,
    UserProfile, UserRole,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct Actor {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl Actor {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn caller(&self) -> DashboardResult<Principal> {
        self.session
            .principal()
            .ok_or_else(|| DashboardError::ActorUnavailable("not logged in".to_string()))
    }

    /// Выполнить вызов без декодирования ответа
    pub async fn call_raw(&self, call: Call) -> DashboardResult<Value> {
        let caller = self.caller()?;
        self.transport.call(&caller, call).await
    }

    async fn call<T: DeserializeOwned>(&self, call: Call) -> DashboardResult<T> {
        let value = self.call_raw(call).await?;
        Ok(serde_json::from_value(value)?)
    }

    // === Access control ===

    pub async fn get_caller_user_role(&self) -> DashboardResult<UserRole> {
        self.call(Call::GetCallerUserRole).await
    }

    pub async fn is_caller_admin(&self) -> DashboardResult<bool> {
        self.call(Call::IsCallerAdmin).await
    }

    pub async fn assign_caller_user_role(
        &self,
        user: Principal,
        role: UserRole,
    ) -> DashboardResult<()> {
        self.call(Call::AssignCallerUserRole { user, role }).await
    }

    pub async fn get_caller_user_profile(&self) -> DashboardResult<Option<UserProfile>> {
        self.call(Call::GetCallerUserProfile).await
    }

    pub async fn save_caller_user_profile(&self, profile: UserProfile) -> DashboardResult<()> {
        self.call(Call::SaveCallerUserProfile { profile }).await
    }

    pub async fn get_user_profile(&self, user: Principal) -> DashboardResult<Option<UserProfile>> {
        self.call(Call::GetUserProfile { user }).await
    }

    // === NNS ===

    pub async fn get_nns_state(&self) -> DashboardResult<NnsState> {
        self.call(Call::GetNnsState).await
    }

    pub async fn update_nns_state(&self, state: NnsState) -> DashboardResult<NnsState> {
        self.call(Call::UpdateNnsState { state }).await
    }

    pub async fn get_nns_maturity(&self) -> DashboardResult<NnsMaturity> {
        self.call(Call::GetNnsMaturity).await
    }

    pub async fn update_nns_maturity(&self, maturity: NnsMaturity) -> DashboardResult<NnsMaturity> {
        self.call(Call::UpdateNnsMaturity { maturity }).await
    }

    pub async fn get_full_nns_data(&self) -> DashboardResult<FullNnsData> {
        self.call(Call::GetFullNnsData).await
    }

    pub async fn fetch_nns_live_data(&self, url: impl Into<String>) -> DashboardResult<String> {
        self.call(Call::FetchNnsLiveData { url: url.into() }).await
    }

    pub async fn transform(&self, input: TransformArgs) -> DashboardResult<HttpResponsePayload> {
        self.call(Call::Transform { input }).await
    }

    // === Bills ===

    pub async fn get_bills(&self) -> DashboardResult<Vec<Bill>> {
        self.call(Call::GetBills).await
    }

    pub async fn add_bill(&self, bill: Bill) -> DashboardResult<Bill> {
        self.call(Call::AddBill { bill }).await
    }

    pub async fn edit_bill(&self, bill_id: EntityId, updated_bill: Bill) -> DashboardResult<Bill> {
        self.call(Call::EditBill {
            bill_id,
            updated_bill,
        })
        .await
    }

    pub async fn add_payment(&self, payment: Payment) -> DashboardResult<Payment> {
        self.call(Call::AddPayment { payment }).await
    }

    pub async fn get_bill_payments(&self, bill_id: EntityId) -> DashboardResult<Vec<Payment>> {
        self.call(Call::GetBillPayments { bill_id }).await
    }

    pub async fn get_bill_summary(&self) -> DashboardResult<BillSummary> {
        self.call(Call::GetBillSummary).await
    }

    // === Horse bets ===

    pub async fn get_horse_bets(&self) -> DashboardResult<Vec<HorseBet>> {
        self.call(Call::GetHorseBets).await
    }

    pub async fn add_horse_bet(&self, bet: HorseBet) -> DashboardResult<HorseBet> {
        self.call(Call::AddHorseBet { bet }).await
    }

    pub async fn get_bet_stats(&self) -> DashboardResult<BetStats> {
        self.call(Call::GetBetStats).await
    }

    // === Tasks ===

    pub async fn get_tasks(&self) -> DashboardResult<Vec<Task>> {
        self.call(Call::GetTasks).await
    }

    pub async fn add_task(&self, task: Task) -> DashboardResult<Task> {
        self.call(Call::AddTask { task }).await
    }

    pub async fn complete_task(&self, task_id: EntityId) -> DashboardResult<Task> {
        self.call(Call::CompleteTask { task_id }).await
    }

    // === Habits ===

    pub async fn get_habits(&self) -> DashboardResult<Vec<Habit>> {
        self.call(Call::GetHabits).await
    }

    pub async fn add_habit(&self, habit: Habit) -> DashboardResult<Habit> {
        self.call(Call::AddHabit { habit }).await
    }

    pub async fn update_habit_progress(
        &self,
        habit_id: EntityId,
        progress: u64,
    ) -> DashboardResult<Habit> {
        self.call(Call::UpdateHabitProgress { habit_id, progress }).await
    }

    // === Plans ===

    pub async fn get_plans(&self) -> DashboardResult<Vec<Plan>> {
        self.call(Call::GetPlans).await
    }

    pub async fn add_plan(&self, plan: Plan) -> DashboardResult<Plan> {
        self.call(Call::AddPlan { plan }).await
    }

    pub async fn update_plan(&self, plan_id: EntityId, updated_plan: Plan) -> DashboardResult<Plan> {
        self.call(Call::UpdatePlan {
            plan_id,
            updated_plan,
        })
        .await
    }

    pub async fn delete_plan(&self, plan_id: EntityId) -> DashboardResult<()> {
        self.call(Call::DeletePlan { plan_id }).await
    }
}

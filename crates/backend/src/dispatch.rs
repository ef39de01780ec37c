use crate::service::DashboardService;
use common::{DashboardResult, OperationTimer};
use domain::{Call, Principal};
use serde_json::Value;

impl DashboardService {
    /// Выполнить один RPC вызов от имени `caller`
    pub async fn dispatch(&self, caller: &Principal, call: Call) -> DashboardResult<Value> {
        let mut timer = OperationTimer::new(call.method());
        timer.add_field("caller", caller.as_str());
        timer.add_field("mutation", call.is_mutation());

        let result = self.route(caller, call).await;
        timer.finish_with_result(&result);
        result
    }

    async fn route(&self, caller: &Principal, call: Call) -> DashboardResult<Value> {
        let value = match call {
            // === Access control ===
            Call::GetCallerUserRole => to_value(self.get_caller_user_role(caller).await?)?,
            Call::IsCallerAdmin => to_value(self.is_caller_admin(caller).await?)?,
            Call::AssignCallerUserRole { user, role } => {
                to_value(self.assign_caller_user_role(caller, &user, role).await?)?
            }
            Call::GetCallerUserProfile => to_value(self.get_caller_user_profile(caller).await?)?,
            Call::SaveCallerUserProfile { profile } => {
                to_value(self.save_caller_user_profile(caller, profile).await?)?
            }
            Call::GetUserProfile { user } => to_value(self.get_user_profile(caller, &user).await?)?,

            // === NNS ===
            Call::GetNnsState => to_value(self.get_nns_state(caller).await?)?,
            Call::UpdateNnsState { state } => to_value(self.update_nns_state(caller, state).await?)?,
            Call::GetNnsMaturity => to_value(self.get_nns_maturity(caller).await?)?,
            Call::UpdateNnsMaturity { maturity } => {
                to_value(self.update_nns_maturity(caller, maturity).await?)?
            }
            Call::GetFullNnsData => to_value(self.get_full_nns_data(caller).await?)?,
            Call::FetchNnsLiveData { url } => to_value(self.fetch_nns_live_data(caller, &url).await?)?,
            Call::Transform { input } => to_value(self.transform(input))?,

            // === Bills ===
            Call::GetBills => to_value(self.get_bills(caller).await?)?,
            Call::AddBill { bill } => to_value(self.add_bill(caller, bill).await?)?,
            Call::EditBill {
                bill_id,
                updated_bill,
            } => to_value(self.edit_bill(caller, bill_id, updated_bill).await?)?,
            Call::AddPayment { payment } => to_value(self.add_payment(caller, payment).await?)?,
            Call::GetBillPayments { bill_id } => {
                to_value(self.get_bill_payments(caller, bill_id).await?)?
            }
            Call::GetBillSummary => to_value(self.get_bill_summary(caller).await?)?,

            // === Horse bets ===
            Call::GetHorseBets => to_value(self.get_horse_bets(caller).await?)?,
            Call::AddHorseBet { bet } => to_value(self.add_horse_bet(caller, bet).await?)?,
            Call::GetBetStats => to_value(self.get_bet_stats(caller).await?)?,

            // === Tasks ===
            Call::GetTasks => to_value(self.get_tasks(caller).await?)?,
            Call::AddTask { task } => to_value(self.add_task(caller, task).await?)?,
            Call::CompleteTask { task_id } => to_value(self.complete_task(caller, task_id).await?)?,

            // === Habits ===
            Call::GetHabits => to_value(self.get_habits(caller).await?)?,
            Call::AddHabit { habit } => to_value(self.add_habit(caller, habit).await?)?,
            Call::UpdateHabitProgress { habit_id, progress } => {
                to_value(self.update_habit_progress(caller, habit_id, progress).await?)?
            }

            // === Plans ===
            Call::GetPlans => to_value(self.get_plans(caller).await?)?,
            Call::AddPlan { plan } => to_value(self.add_plan(caller, plan).await?)?,
            Call::UpdatePlan {
                plan_id,
                updated_plan,
            } => to_value(self.update_plan(caller, plan_id, updated_plan).await?)?,
            Call::DeletePlan { plan_id } => to_value(self.delete_plan(caller, plan_id).await?)?,
        };
        Ok(value)
    }
}

fn to_value<T: serde::Serialize>(value: T) -> DashboardResult<Value> {
    Ok(serde_json::to_value(value)?)
}

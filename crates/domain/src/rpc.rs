//! Типизированный RPC-конверт backend'а
//!
//! Вызов сериализуется как `{"method": "<name>", "args": {...}}`, ответ как
//! `{"ok": <value>}` либо `{"err": {"code": ..., "message": ...}}`.
//! Имена методов и полей совпадают с интерфейсом backend'а.

use crate::entities::{
    Bill, Habit, HorseBet, NnsMaturity, NnsState, Payment, Plan, Principal, Task,
    TransformArgs, UserProfile, UserRole,
};
use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Один вызов backend'а
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "method",
    content = "args",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Call {
    // === Access control ===
    GetCallerUserRole,
    IsCallerAdmin,
    AssignCallerUserRole { user: Principal, role: UserRole },
    GetCallerUserProfile,
    SaveCallerUserProfile { profile: UserProfile },
    GetUserProfile { user: Principal },

    // === NNS ===
    #[serde(rename = "getNNSState")]
    GetNnsState,
    #[serde(rename = "updateNNSState")]
    UpdateNnsState { state: NnsState },
    #[serde(rename = "getNNSMaturity")]
    GetNnsMaturity,
    #[serde(rename = "updateNNSMaturity")]
    UpdateNnsMaturity { maturity: NnsMaturity },
    #[serde(rename = "getFullNNSData")]
    GetFullNnsData,
    #[serde(rename = "fetchNNSLiveData")]
    FetchNnsLiveData { url: String },
    Transform { input: TransformArgs },

    // === Bills ===
    GetBills,
    AddBill { bill: Bill },
    EditBill { bill_id: EntityId, updated_bill: Bill },
    AddPayment { payment: Payment },
    GetBillPayments { bill_id: EntityId },
    GetBillSummary,

    // === Horse bets ===
    GetHorseBets,
    AddHorseBet { bet: HorseBet },
    GetBetStats,

    // === Tasks ===
    GetTasks,
    AddTask { task: Task },
    CompleteTask { task_id: EntityId },

    // === Habits ===
    GetHabits,
    AddHabit { habit: Habit },
    UpdateHabitProgress { habit_id: EntityId, progress: u64 },

    // === Plans ===
    GetPlans,
    AddPlan { plan: Plan },
    UpdatePlan { plan_id: EntityId, updated_plan: Plan },
    DeletePlan { plan_id: EntityId },
}

impl Call {
    /// Имя метода для логов и метрик
    pub fn method(&self) -> &'static str {
        match self {
            Call::GetCallerUserRole => "getCallerUserRole",
            Call::IsCallerAdmin => "isCallerAdmin",
            Call::AssignCallerUserRole { .. } => "assignCallerUserRole",
            Call::GetCallerUserProfile => "getCallerUserProfile",
            Call::SaveCallerUserProfile { .. } => "saveCallerUserProfile",
            Call::GetUserProfile { .. } => "getUserProfile",
            Call::GetNnsState => "getNNSState",
            Call::UpdateNnsState { .. } => "updateNNSState",
            Call::GetNnsMaturity => "getNNSMaturity",
            Call::UpdateNnsMaturity { .. } => "updateNNSMaturity",
            Call::GetFullNnsData => "getFullNNSData",
            Call::FetchNnsLiveData { .. } => "fetchNNSLiveData",
            Call::Transform { .. } => "transform",
            Call::GetBills => "getBills",
            Call::AddBill { .. } => "addBill",
            Call::EditBill { .. } => "editBill",
            Call::AddPayment { .. } => "addPayment",
            Call::GetBillPayments { .. } => "getBillPayments",
            Call::GetBillSummary => "getBillSummary",
            Call::GetHorseBets => "getHorseBets",
            Call::AddHorseBet { .. } => "addHorseBet",
            Call::GetBetStats => "getBetStats",
            Call::GetTasks => "getTasks",
            Call::AddTask { .. } => "addTask",
            Call::CompleteTask { .. } => "completeTask",
            Call::GetHabits => "getHabits",
            Call::AddHabit { .. } => "addHabit",
            Call::UpdateHabitProgress { .. } => "updateHabitProgress",
            Call::GetPlans => "getPlans",
            Call::AddPlan { .. } => "addPlan",
            Call::UpdatePlan { .. } => "updatePlan",
            Call::DeletePlan { .. } => "deletePlan",
        }
    }

    /// Меняет ли вызов состояние backend'а
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::AssignCallerUserRole { .. }
                | Call::SaveCallerUserProfile { .. }
                | Call::UpdateNnsState { .. }
                | Call::UpdateNnsMaturity { .. }
                | Call::AddBill { .. }
                | Call::EditBill { .. }
                | Call::AddPayment { .. }
                | Call::AddHorseBet { .. }
                | Call::AddTask { .. }
                | Call::CompleteTask { .. }
                | Call::AddHabit { .. }
                | Call::UpdateHabitProgress { .. }
                | Call::AddPlan { .. }
                | Call::UpdatePlan { .. }
                | Call::DeletePlan { .. }
        )
    }
}

/// Ошибка в формате провода
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub code: String,
    pub message: String,
}

/// Ответ backend'а
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply {
    Ok(serde_json::Value),
    Err(WireError),
}

impl Reply {
    pub fn err(code: impl Into<String>, message: impl Into<String>) -> Self {
        Reply::Err(WireError {
            code: code.into(),
            message: message.into(),
        })
    }

    pub fn into_result(self) -> Result<serde_json::Value, WireError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_call_wire_format() {
        let value = serde_json::to_value(Call::GetNnsState).unwrap();
        assert_eq!(value, json!({"method": "getNNSState"}));

        let parsed: Call = serde_json::from_value(json!({"method": "getBills"})).unwrap();
        assert_eq!(parsed, Call::GetBills);
    }

    #[test]
    fn test_call_with_args_wire_format() {
        let call = Call::UpdateHabitProgress {
            habit_id: 3,
            progress: 5,
        };
        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(
            value,
            json!({"method": "updateHabitProgress", "args": {"habitId": 3, "progress": 5}})
        );
        assert_eq!(call.method(), "updateHabitProgress");
        assert!(call.is_mutation());
    }

    #[test]
    fn test_method_matches_serde_tag() {
        let calls = vec![
            Call::GetFullNnsData,
            Call::FetchNnsLiveData {
                url: "https://x".into(),
            },
            Call::GetBillPayments { bill_id: 1 },
            Call::DeletePlan { plan_id: 2 },
        ];
        for call in calls {
            let value = serde_json::to_value(&call).unwrap();
            assert_eq!(value["method"], call.method());
        }
    }

    #[test]
    fn test_reply_wire_format() {
        let ok = Reply::Ok(json!(true));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"ok": true}));

        let err = Reply::err("NOT_FOUND", "Bill not found");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"err": {"code": "NOT_FOUND", "message": "Bill not found"}})
        );
        assert!(err.into_result().is_err());
    }
}

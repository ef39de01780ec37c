use crate::query::QueryKey;
use domain::EntityId;

/// Мутации клиента и ключи, которые они делают устаревшими
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    SaveProfile,
    AssignRole,
    UpdateNnsState,
    UpdateNnsMaturity,
    AddBill,
    EditBill,
    AddPayment { bill_id: EntityId },
    AddHorseBet,
    AddTask,
    CompleteTask,
    AddHabit,
    UpdateHabitProgress,
    AddPlan,
    UpdatePlan,
    DeletePlan,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SaveProfile => "saveCallerUserProfile",
            Mutation::AssignRole => "assignCallerUserRole",
            Mutation::UpdateNnsState => "updateNNSState",
            Mutation::UpdateNnsMaturity => "updateNNSMaturity",
            Mutation::AddBill => "addBill",
            Mutation::EditBill => "editBill",
            Mutation::AddPayment { .. } => "addPayment",
            Mutation::AddHorseBet => "addHorseBet",
            Mutation::AddTask => "addTask",
            Mutation::CompleteTask => "completeTask",
            Mutation::AddHabit => "addHabit",
            Mutation::UpdateHabitProgress => "updateHabitProgress",
            Mutation::AddPlan => "addPlan",
            Mutation::UpdatePlan => "updatePlan",
            Mutation::DeletePlan => "deletePlan",
        }
    }

    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::SaveProfile => vec![QueryKey::CurrentUserProfile],
            Mutation::AssignRole => vec![QueryKey::CallerRole],
            Mutation::UpdateNnsState => vec![QueryKey::NnsState, QueryKey::FullNnsData],
            Mutation::UpdateNnsMaturity => vec![QueryKey::NnsMaturity, QueryKey::FullNnsData],
            Mutation::AddBill | Mutation::EditBill => vec![QueryKey::Bills, QueryKey::BillSummary],
            Mutation::AddPayment { bill_id } => vec![
                QueryKey::Bills,
                QueryKey::BillSummary,
                QueryKey::BillPayments(*bill_id),
            ],
            Mutation::AddHorseBet => vec![QueryKey::HorseBets, QueryKey::BetStats],
            Mutation::AddTask | Mutation::CompleteTask => vec![QueryKey::Tasks],
            Mutation::AddHabit | Mutation::UpdateHabitProgress => vec![QueryKey::Habits],
            Mutation::AddPlan | Mutation::UpdatePlan | Mutation::DeletePlan => {
                vec![QueryKey::Plans]
            }
        }
    }
}

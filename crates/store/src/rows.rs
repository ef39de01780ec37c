//! Разбор строк результата в сущности домена

use domain::{Bill, Habit, HorseBet, NnsMaturity, NnsState, Payment, Plan, Task};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) const BILL_COLUMNS: &str =
    "id, title, description, total_amount, remaining_balance, is_paid, created_at";
pub(crate) const PAYMENT_COLUMNS: &str = "id, bill_id, amount, timestamp";
pub(crate) const BET_COLUMNS: &str = "id, horse_name, amount, odds, is_win, timestamp";
pub(crate) const TASK_COLUMNS: &str =
    "id, title, description, category, priority, is_complete, timestamp";
pub(crate) const HABIT_COLUMNS: &str = "id, name, goal, progress, streak, last_updated";
pub(crate) const PLAN_COLUMNS: &str = "id, title, notes, links, timestamp";

fn get_u64(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

pub(crate) fn bill(row: &Row) -> rusqlite::Result<Bill> {
    Ok(Bill {
        id: get_u64(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        total_amount: row.get(3)?,
        remaining_balance: row.get(4)?,
        is_paid: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub(crate) fn payment(row: &Row) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: get_u64(row, 0)?,
        bill_id: get_u64(row, 1)?,
        amount: row.get(2)?,
        timestamp: row.get(3)?,
    })
}

pub(crate) fn bet(row: &Row) -> rusqlite::Result<HorseBet> {
    Ok(HorseBet {
        id: get_u64(row, 0)?,
        horse_name: row.get(1)?,
        amount: row.get(2)?,
        odds: row.get(3)?,
        is_win: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

pub(crate) fn task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: get_u64(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        priority: get_u64(row, 4)?,
        is_complete: row.get(5)?,
        timestamp: row.get(6)?,
    })
}

pub(crate) fn habit(row: &Row) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: get_u64(row, 0)?,
        name: row.get(1)?,
        goal: get_u64(row, 2)?,
        progress: get_u64(row, 3)?,
        streak: get_u64(row, 4)?,
        last_updated: row.get(5)?,
    })
}

pub(crate) fn plan(row: &Row) -> rusqlite::Result<Plan> {
    let links_json: String = row.get(3)?;
    let links = serde_json::from_str::<Vec<String>>(&links_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Plan {
        id: get_u64(row, 0)?,
        title: row.get(1)?,
        notes: row.get(2)?,
        links,
        timestamp: row.get(4)?,
    })
}

pub(crate) fn nns_state(row: &Row) -> rusqlite::Result<NnsState> {
    Ok(NnsState {
        staked_icp: row.get(0)?,
        last_updated: row.get(1)?,
    })
}

pub(crate) fn nns_maturity(row: &Row) -> rusqlite::Result<NnsMaturity> {
    Ok(NnsMaturity {
        earned: row.get(0)?,
        earned_per_day: row.get(1)?,
        last_updated: row.get(2)?,
    })
}

use crate::db_error::DbResultExt;
use crate::rows::{
    self, BET_COLUMNS, BILL_COLUMNS, HABIT_COLUMNS, PAYMENT_COLUMNS, PLAN_COLUMNS, TASK_COLUMNS,
};
use crate::schema::init_schema;
use common::{DashboardError, DashboardResult};
use domain::{
    now_nanos, Bill, EntityId, Habit, HorseBet, NnsMaturity, NnsState, Payment, Plan, Principal,
    Task, Time, UserProfile, UserRole,
};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub type DbPool = Pool<SqliteConnectionManager>;

/// Сколько соединение ждёт блокировку записи, прежде чем вернуть SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Хранилище всех сущностей дашборда с пулом соединений
#[derive(Clone)]
pub struct DashboardStore {
    pool: Arc<DbPool>,
}

impl DashboardStore {
    /// Создать хранилище с пулом соединений
    pub async fn new<P: AsRef<Path>>(path: P, pool_size: u32) -> DashboardResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let store = Self::from_manager(manager, pool_size)?;
        info!("Opened dashboard store at {}", path.display());
        Ok(store)
    }

    /// Хранилище в памяти; одно соединение, иначе каждое видит свою базу
    pub fn in_memory() -> DashboardResult<Self> {
        Self::from_manager(SqliteConnectionManager::memory(), 1)
    }

    fn from_manager(manager: SqliteConnectionManager, pool_size: u32) -> DashboardResult<Self> {
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build(manager)
            .db()?;

        {
            let conn = pool.get().db()?;
            init_schema(&conn).db()?;
        }

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    fn conn(&self) -> DashboardResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().db()
    }

    /// Пишущая транзакция: блокировка записи берётся на BEGIN, до первого чтения
    fn write_tx(
        conn: &mut PooledConnection<SqliteConnectionManager>,
    ) -> DashboardResult<Transaction<'_>> {
        conn.transaction_with_behavior(TransactionBehavior::Immediate)
            .db()
    }

    /// Следующий id владельца в таблице
    fn next_id(tx: &Transaction<'_>, table: &str, owner: &Principal) -> DashboardResult<EntityId> {
        let sql = format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {table} WHERE owner = ?1");
        let id: i64 = tx
            .query_row(&sql, params![owner.as_str()], |row| row.get(0))
            .db()?;
        Ok(id as EntityId)
    }

    fn list<T>(
        &self,
        sql: &str,
        owner: &Principal,
        map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
    ) -> DashboardResult<Vec<T>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).db()?;
        let items = stmt
            .query_map(params![owner.as_str()], map)
            .db()?
            .collect::<Result<Vec<_>, _>>()
            .db()?;
        Ok(items)
    }

    fn get_one<T>(
        &self,
        sql: &str,
        owner: &Principal,
        id: EntityId,
        map: fn(&rusqlite::Row) -> rusqlite::Result<T>,
    ) -> DashboardResult<Option<T>> {
        let conn = self.conn()?;
        conn.query_row(sql, params![owner.as_str(), id as i64], map)
            .optional()
            .db()
    }

    // === Access control ===

    /// Зарегистрировать вызывающего при первом обращении.
    /// Первый зарегистрированный становится admin, остальные user.
    #[instrument(skip(self), fields(principal = %principal))]
    pub async fn register_caller(&self, principal: &Principal) -> DashboardResult<UserRole> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT role FROM principals WHERE principal = ?1",
                params![principal.as_str()],
                |row| row.get(0),
            )
            .optional()
            .db()?;

        if let Some(role) = existing {
            return UserRole::from_str(&role).map_err(DashboardError::from);
        }

        let registered: i64 = tx
            .query_row("SELECT COUNT(*) FROM principals", [], |row| row.get(0))
            .db()?;
        let role = if registered == 0 {
            UserRole::Admin
        } else {
            UserRole::User
        };

        tx.execute(
            "INSERT INTO principals (principal, role, registered_at) VALUES (?1, ?2, ?3)",
            params![principal.as_str(), role.to_string(), now_nanos()],
        )
        .db()?;
        tx.commit().db()?;

        info!("Registered principal {} as {}", principal, role);
        Ok(role)
    }

    pub async fn get_role(&self, principal: &Principal) -> DashboardResult<Option<UserRole>> {
        let conn = self.conn()?;
        let role: Option<String> = conn
            .query_row(
                "SELECT role FROM principals WHERE principal = ?1",
                params![principal.as_str()],
                |row| row.get(0),
            )
            .optional()
            .db()?;

        role.map(|r| UserRole::from_str(&r).map_err(DashboardError::from))
            .transpose()
    }

    pub async fn set_role(&self, principal: &Principal, role: UserRole) -> DashboardResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO principals (principal, role, registered_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(principal) DO UPDATE SET role = excluded.role",
            params![principal.as_str(), role.to_string(), now_nanos()],
        )
        .db()?;
        debug!("Role of {} set to {}", principal, role);
        Ok(())
    }

    pub async fn get_profile(&self, principal: &Principal) -> DashboardResult<Option<UserProfile>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT name, email FROM profiles WHERE principal = ?1",
            params![principal.as_str()],
            |row| {
                Ok(UserProfile {
                    name: row.get(0)?,
                    email: row.get(1)?,
                })
            },
        )
        .optional()
        .db()
    }

    pub async fn save_profile(
        &self,
        principal: &Principal,
        profile: &UserProfile,
    ) -> DashboardResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO profiles (principal, name, email) VALUES (?1, ?2, ?3)
             ON CONFLICT(principal) DO UPDATE SET name = excluded.name, email = excluded.email",
            params![principal.as_str(), profile.name, profile.email],
        )
        .db()?;
        Ok(())
    }

    // === NNS ===

    pub async fn get_nns_state(&self, owner: &Principal) -> DashboardResult<Option<NnsState>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT staked_icp, last_updated FROM nns_state WHERE owner = ?1",
            params![owner.as_str()],
            rows::nns_state,
        )
        .optional()
        .db()
    }

    pub async fn put_nns_state(&self, owner: &Principal, state: &NnsState) -> DashboardResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO nns_state (owner, staked_icp, last_updated) VALUES (?1, ?2, ?3)",
            params![owner.as_str(), state.staked_icp, state.last_updated],
        )
        .db()?;
        Ok(())
    }

    pub async fn get_nns_maturity(&self, owner: &Principal) -> DashboardResult<Option<NnsMaturity>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT earned, earned_per_day, last_updated FROM nns_maturity WHERE owner = ?1",
            params![owner.as_str()],
            rows::nns_maturity,
        )
        .optional()
        .db()
    }

    pub async fn put_nns_maturity(
        &self,
        owner: &Principal,
        maturity: &NnsMaturity,
    ) -> DashboardResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO nns_maturity (owner, earned, earned_per_day, last_updated)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                owner.as_str(),
                maturity.earned,
                maturity.earned_per_day,
                maturity.last_updated
            ],
        )
        .db()?;
        Ok(())
    }

    // === Bills & payments ===

    pub async fn list_bills(&self, owner: &Principal) -> DashboardResult<Vec<Bill>> {
        self.list(
            &format!("SELECT {BILL_COLUMNS} FROM bills WHERE owner = ?1 ORDER BY id ASC"),
            owner,
            rows::bill,
        )
    }

    pub async fn get_bill(&self, owner: &Principal, id: EntityId) -> DashboardResult<Option<Bill>> {
        self.get_one(
            &format!("SELECT {BILL_COLUMNS} FROM bills WHERE owner = ?1 AND id = ?2"),
            owner,
            id,
            rows::bill,
        )
    }

    /// Вставить счёт, присвоив ему id владельца
    #[instrument(skip(self, bill), fields(owner = %owner))]
    pub async fn insert_bill(&self, owner: &Principal, mut bill: Bill) -> DashboardResult<Bill> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        bill.id = Self::next_id(&tx, "bills", owner)?;
        tx.execute(
            "INSERT INTO bills (owner, id, title, description, total_amount, remaining_balance, is_paid, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                owner.as_str(),
                bill.id as i64,
                bill.title,
                bill.description,
                bill.total_amount,
                bill.remaining_balance,
                bill.is_paid,
                bill.created_at
            ],
        )
        .db()?;
        tx.commit().db()?;

        debug!("Created bill {}", bill.id);
        Ok(bill)
    }

    fn bill_in(tx: &Transaction<'_>, owner: &Principal, id: EntityId) -> DashboardResult<Bill> {
        tx.query_row(
            &format!("SELECT {BILL_COLUMNS} FROM bills WHERE owner = ?1 AND id = ?2"),
            params![owner.as_str(), id as i64],
            rows::bill,
        )
        .optional()
        .db()?
        .ok_or_else(|| DashboardError::NotFound(format!("Bill {id}")))
    }

    fn write_bill(tx: &Transaction<'_>, owner: &Principal, bill: &Bill) -> DashboardResult<()> {
        tx.execute(
            "UPDATE bills SET title = ?3, description = ?4, total_amount = ?5,
             remaining_balance = ?6, is_paid = ?7
             WHERE owner = ?1 AND id = ?2",
            params![
                owner.as_str(),
                bill.id as i64,
                bill.title,
                bill.description,
                bill.total_amount,
                bill.remaining_balance,
                bill.is_paid
            ],
        )
        .db()?;
        Ok(())
    }

    /// Пересчитать счёт по новым полям. Счёт читается внутри пишущей
    /// транзакции, так что уже внесённые платежи не теряются.
    #[instrument(skip(self, updated), fields(owner = %owner))]
    pub async fn revise_bill(
        &self,
        owner: &Principal,
        bill_id: EntityId,
        updated: &Bill,
    ) -> DashboardResult<Bill> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        let mut bill = Self::bill_in(&tx, owner, bill_id)?;
        bill.revise(updated)?;
        Self::write_bill(&tx, owner, &bill)?;
        tx.commit().db()?;

        debug!("Revised bill {}", bill.id);
        Ok(bill)
    }

    /// Атомарно применить платёж к текущему остатку счёта и сохранить его.
    /// Возвращает обновлённый счёт и платёж с присвоенным id.
    #[instrument(skip(self, payment), fields(owner = %owner, bill_id = payment.bill_id))]
    pub async fn record_payment(
        &self,
        owner: &Principal,
        mut payment: Payment,
    ) -> DashboardResult<(Bill, Payment)> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        let mut bill = Self::bill_in(&tx, owner, payment.bill_id)?;
        bill.apply_payment(payment.amount)?;
        Self::write_bill(&tx, owner, &bill)?;

        payment.id = Self::next_id(&tx, "payments", owner)?;
        tx.execute(
            "INSERT INTO payments (owner, id, bill_id, amount, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                owner.as_str(),
                payment.id as i64,
                payment.bill_id as i64,
                payment.amount,
                payment.timestamp
            ],
        )
        .db()?;
        tx.commit().db()?;

        debug!(
            "Recorded payment {} for bill {}, remaining {:.2}",
            payment.id, bill.id, bill.remaining_balance
        );
        Ok((bill, payment))
    }

    pub async fn list_payments(
        &self,
        owner: &Principal,
        bill_id: EntityId,
    ) -> DashboardResult<Vec<Payment>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments WHERE owner = ?1 AND bill_id = ?2 ORDER BY id ASC"
            ))
            .db()?;
        let payments = stmt
            .query_map(params![owner.as_str(), bill_id as i64], rows::payment)
            .db()?
            .collect::<Result<Vec<_>, _>>()
            .db()?;
        Ok(payments)
    }

    // === Horse bets ===

    pub async fn list_bets(&self, owner: &Principal) -> DashboardResult<Vec<HorseBet>> {
        self.list(
            &format!("SELECT {BET_COLUMNS} FROM horse_bets WHERE owner = ?1 ORDER BY id ASC"),
            owner,
            rows::bet,
        )
    }

    pub async fn insert_bet(&self, owner: &Principal, mut bet: HorseBet) -> DashboardResult<HorseBet> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        bet.id = Self::next_id(&tx, "horse_bets", owner)?;
        tx.execute(
            "INSERT INTO horse_bets (owner, id, horse_name, amount, odds, is_win, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                owner.as_str(),
                bet.id as i64,
                bet.horse_name,
                bet.amount,
                bet.odds,
                bet.is_win,
                bet.timestamp
            ],
        )
        .db()?;
        tx.commit().db()?;
        Ok(bet)
    }

    // === Tasks ===

    pub async fn list_tasks(&self, owner: &Principal) -> DashboardResult<Vec<Task>> {
        self.list(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner = ?1 ORDER BY id ASC"),
            owner,
            rows::task,
        )
    }

    pub async fn get_task(&self, owner: &Principal, id: EntityId) -> DashboardResult<Option<Task>> {
        self.get_one(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner = ?1 AND id = ?2"),
            owner,
            id,
            rows::task,
        )
    }

    pub async fn insert_task(&self, owner: &Principal, mut task: Task) -> DashboardResult<Task> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        task.id = Self::next_id(&tx, "tasks", owner)?;
        tx.execute(
            "INSERT INTO tasks (owner, id, title, description, category, priority, is_complete, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                owner.as_str(),
                task.id as i64,
                task.title,
                task.description,
                task.category,
                task.priority as i64,
                task.is_complete,
                task.timestamp
            ],
        )
        .db()?;
        tx.commit().db()?;
        Ok(task)
    }

    /// Отметить задачу выполненной; false если задачи нет или она уже выполнена
    pub async fn complete_task(&self, owner: &Principal, id: EntityId) -> DashboardResult<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE tasks SET is_complete = 1 WHERE owner = ?1 AND id = ?2 AND is_complete = 0",
                params![owner.as_str(), id as i64],
            )
            .db()?;
        Ok(changed > 0)
    }

    // === Habits ===

    pub async fn list_habits(&self, owner: &Principal) -> DashboardResult<Vec<Habit>> {
        self.list(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE owner = ?1 ORDER BY id ASC"),
            owner,
            rows::habit,
        )
    }

    pub async fn insert_habit(&self, owner: &Principal, mut habit: Habit) -> DashboardResult<Habit> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        habit.id = Self::next_id(&tx, "habits", owner)?;
        tx.execute(
            "INSERT INTO habits (owner, id, name, goal, progress, streak, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                owner.as_str(),
                habit.id as i64,
                habit.name,
                habit.goal as i64,
                habit.progress as i64,
                habit.streak as i64,
                habit.last_updated
            ],
        )
        .db()?;
        tx.commit().db()?;
        Ok(habit)
    }

    /// Записать прогресс привычки; серия считается от значения в базе
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn record_habit_progress(
        &self,
        owner: &Principal,
        habit_id: EntityId,
        progress: u64,
        now: Time,
    ) -> DashboardResult<Habit> {
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        let mut habit = tx
            .query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE owner = ?1 AND id = ?2"),
                params![owner.as_str(), habit_id as i64],
                rows::habit,
            )
            .optional()
            .db()?
            .ok_or_else(|| DashboardError::NotFound(format!("Habit {habit_id}")))?;

        habit.record_progress(progress, now);
        tx.execute(
            "UPDATE habits SET progress = ?3, streak = ?4, last_updated = ?5
             WHERE owner = ?1 AND id = ?2",
            params![
                owner.as_str(),
                habit.id as i64,
                habit.progress as i64,
                habit.streak as i64,
                habit.last_updated
            ],
        )
        .db()?;
        tx.commit().db()?;
        Ok(habit)
    }

    // === Plans ===

    pub async fn list_plans(&self, owner: &Principal) -> DashboardResult<Vec<Plan>> {
        self.list(
            &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE owner = ?1 ORDER BY id ASC"),
            owner,
            rows::plan,
        )
    }

    pub async fn get_plan(&self, owner: &Principal, id: EntityId) -> DashboardResult<Option<Plan>> {
        self.get_one(
            &format!("SELECT {PLAN_COLUMNS} FROM plans WHERE owner = ?1 AND id = ?2"),
            owner,
            id,
            rows::plan,
        )
    }

    pub async fn insert_plan(&self, owner: &Principal, mut plan: Plan) -> DashboardResult<Plan> {
        let links = serde_json::to_string(&plan.links)?;
        let mut conn = self.conn()?;
        let tx = Self::write_tx(&mut conn)?;

        plan.id = Self::next_id(&tx, "plans", owner)?;
        tx.execute(
            "INSERT INTO plans (owner, id, title, notes, links, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                owner.as_str(),
                plan.id as i64,
                plan.title,
                plan.notes,
                links,
                plan.timestamp
            ],
        )
        .db()?;
        tx.commit().db()?;
        Ok(plan)
    }

    pub async fn update_plan(&self, owner: &Principal, plan: &Plan) -> DashboardResult<bool> {
        let links = serde_json::to_string(&plan.links)?;
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE plans SET title = ?3, notes = ?4, links = ?5, timestamp = ?6
                 WHERE owner = ?1 AND id = ?2",
                params![
                    owner.as_str(),
                    plan.id as i64,
                    plan.title,
                    plan.notes,
                    links,
                    plan.timestamp
                ],
            )
            .db()?;
        Ok(changed > 0)
    }

    pub async fn delete_plan(&self, owner: &Principal, id: EntityId) -> DashboardResult<bool> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "DELETE FROM plans WHERE owner = ?1 AND id = ?2",
                params![owner.as_str(), id as i64],
            )
            .db()?;
        Ok(changed > 0)
    }
}

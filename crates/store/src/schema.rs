use rusqlite::Connection;

/// Инициализация схемы; идемпотентна
pub(crate) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Контроль доступа
        CREATE TABLE IF NOT EXISTS principals (
            principal TEXT PRIMARY KEY,
            role TEXT NOT NULL,
            registered_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS profiles (
            principal TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT
        );

        -- NNS: одна строка на владельца
        CREATE TABLE IF NOT EXISTS nns_state (
            owner TEXT PRIMARY KEY,
            staked_icp REAL NOT NULL,
            last_updated INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS nns_maturity (
            owner TEXT PRIMARY KEY,
            earned REAL NOT NULL,
            earned_per_day REAL NOT NULL,
            last_updated INTEGER NOT NULL
        );

        -- Финансы
        CREATE TABLE IF NOT EXISTS bills (
            owner TEXT NOT NULL,
            id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            total_amount REAL NOT NULL,
            remaining_balance REAL NOT NULL,
            is_paid BOOLEAN NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (owner, id)
        );

        CREATE TABLE IF NOT EXISTS payments (
            owner TEXT NOT NULL,
            id INTEGER NOT NULL,
            bill_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            timestamp INTEGER NOT NULL,
            PRIMARY KEY (owner, id)
        );

        CREATE TABLE IF NOT EXISTS horse_bets (
            owner TEXT NOT NULL,
            id INTEGER NOT NULL,
            horse_name TEXT NOT NULL,
            amount REAL NOT NULL,
            odds REAL NOT NULL,
            is_win BOOLEAN NOT NULL DEFAULT 0,
            timestamp INTEGER NOT NULL,
            PRIMARY KEY (owner, id)
        );

        -- Продуктивность
        CREATE TABLE IF NOT EXISTS tasks (
            owner TEXT NOT NULL,
            id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            priority INTEGER NOT NULL,
            is_complete BOOLEAN NOT NULL DEFAULT 0,
            timestamp INTEGER NOT NULL,
            PRIMARY KEY (owner, id)
        );

        CREATE TABLE IF NOT EXISTS habits (
            owner TEXT NOT NULL,
            id INTEGER NOT NULL,
            name TEXT NOT NULL,
            goal INTEGER NOT NULL,
            progress INTEGER NOT NULL DEFAULT 0,
            streak INTEGER NOT NULL DEFAULT 0,
            last_updated INTEGER NOT NULL,
            PRIMARY KEY (owner, id)
        );

        CREATE TABLE IF NOT EXISTS plans (
            owner TEXT NOT NULL,
            id INTEGER NOT NULL,
            title TEXT NOT NULL,
            notes TEXT NOT NULL,
            links TEXT NOT NULL DEFAULT '[]',
            timestamp INTEGER NOT NULL,
            PRIMARY KEY (owner, id)
        );

        CREATE INDEX IF NOT EXISTS idx_payments_bill ON payments(owner, bill_id);

        -- Включаем оптимизации SQLite
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
        "#,
    )
}

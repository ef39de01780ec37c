use common::{DashboardError, DashboardResult, DatabaseError};
use rusqlite::ErrorCode;

/// Перевод ошибок rusqlite/r2d2 в иерархию `DashboardError`
pub(crate) trait DbResultExt<T> {
    fn db(self) -> DashboardResult<T>;
}

impl<T> DbResultExt<T> for Result<T, rusqlite::Error> {
    fn db(self) -> DashboardResult<T> {
        self.map_err(|err| {
            let db_err = match err.sqlite_error_code() {
                Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                    DatabaseError::Locked(err.to_string())
                }
                Some(ErrorCode::DatabaseCorrupt) | Some(ErrorCode::NotADatabase) => {
                    DatabaseError::Corrupted(err.to_string())
                }
                _ => DatabaseError::QueryFailed(err.to_string()),
            };
            DashboardError::Database(db_err)
        })
    }
}

impl<T> DbResultExt<T> for Result<T, r2d2::Error> {
    fn db(self) -> DashboardResult<T> {
        self.map_err(|err| DashboardError::Database(DatabaseError::ConnectionFailed(err.to_string())))
    }
}

use sqlx::SqlitePool;

use super::{now_timestamp, Result};
use crate::session::{new_token, Principal, Session};

pub async fn create_session(pool: &SqlitePool, principal: Principal) -> Result<Session> {
    let session = Session {
        token: new_token(),
        principal,
        created_at: now_timestamp(),
    };

    sqlx::query("INSERT INTO sessions (token, kind, subject_id, created_at) VALUES (?, ?, ?, ?)")
        .bind(&session.token)
        .bind(session.principal.kind())
        .bind(session.principal.subject_id())
        .bind(&session.created_at)
        .execute(pool)
        .await?;

    Ok(session)
}

pub async fn find_session(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    let row = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT token, kind, subject_id, created_at FROM sessions WHERE token = ? LIMIT 1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(|(token, kind, subject_id, created_at)| {
        let principal = Principal::from_parts(&kind, subject_id);
        if principal.is_none() {
            log::warn!("Ignoring session with unknown kind '{kind}'");
        }
        principal.map(|principal| Session {
            token,
            principal,
            created_at,
        })
    }))
}

/// Returns whether a session was removed.
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

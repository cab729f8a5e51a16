use serde::Serialize;
use sqlx::SqlitePool;

use super::{new_id, now_timestamp, DbError, Result};
use crate::models::{Appointment, AppointmentRow, AppointmentStatus, NewAppointment};

const APPOINTMENT_COLUMNS: &str = r#"id, salon_id, user_id, user_name, user_phone, personnel_id,
       personnel_name, services, date, time, status, created_at, updated_at"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentCounts {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub completed: i64,
}

/// Stores a new booking as `pending`. No overlap check is made.
pub async fn create_appointment(pool: &SqlitePool, draft: &NewAppointment) -> Result<Appointment> {
    let id = new_id();
    sqlx::query(
        r#"INSERT INTO appointments
           (id, salon_id, user_id, user_name, user_phone, personnel_id, personnel_name,
            services, date, time, status, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)"#,
    )
    .bind(&id)
    .bind(&draft.salon_id)
    .bind(&draft.user_id)
    .bind(&draft.user_name)
    .bind(&draft.user_phone)
    .bind(&draft.personnel_id)
    .bind(&draft.personnel_name)
    .bind(serde_json::to_string(&draft.services)?)
    .bind(&draft.date)
    .bind(&draft.time)
    .bind(AppointmentStatus::Pending.as_str())
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    get_appointment(pool, &id).await
}

pub async fn get_appointment(pool: &SqlitePool, id: &str) -> Result<Appointment> {
    sqlx::query_as::<_, AppointmentRow>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ? LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(Appointment::from)
    .ok_or_else(|| DbError::NotFound {
        entity: "Appointment",
        id: id.to_string(),
    })
}

async fn list_where(pool: &SqlitePool, column: &str, value: &str) -> Result<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE {column} = ?
         ORDER BY created_at DESC, rowid DESC"
    ))
    .bind(value)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Appointment::from).collect())
}

/// Newest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Appointment>> {
    list_where(pool, "user_id", user_id).await
}

pub async fn list_for_salon(pool: &SqlitePool, salon_id: &str) -> Result<Vec<Appointment>> {
    list_where(pool, "salon_id", salon_id).await
}

pub async fn list_for_personnel(pool: &SqlitePool, personnel_id: &str) -> Result<Vec<Appointment>> {
    list_where(pool, "personnel_id", personnel_id).await
}

/// Writes the status as given. Callers decide whether the change is allowed.
pub async fn set_status(pool: &SqlitePool, id: &str, status: AppointmentStatus) -> Result<()> {
    let result = sqlx::query("UPDATE appointments SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(now_timestamp())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            entity: "Appointment",
            id: id.to_string(),
        });
    }
    Ok(())
}

pub async fn count_by_status(pool: &SqlitePool, salon_id: &str) -> Result<AppointmentCounts> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM appointments WHERE salon_id = ? GROUP BY status",
    )
    .bind(salon_id)
    .fetch_all(pool)
    .await?;

    let mut counts = AppointmentCounts::default();
    for (status, count) in rows {
        counts.total += count;
        match status.parse::<AppointmentStatus>() {
            Ok(AppointmentStatus::Pending) | Err(_) => counts.pending += count,
            Ok(AppointmentStatus::Confirmed) => counts.confirmed += count,
            Ok(AppointmentStatus::Cancelled) => counts.cancelled += count,
            Ok(AppointmentStatus::Completed) => counts.completed += count,
        }
    }
    Ok(counts)
}

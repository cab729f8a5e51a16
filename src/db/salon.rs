use sqlx::SqlitePool;

use super::{now_timestamp, DbError, Result};
use crate::models::{Salon, SalonRow, SalonUpdate};

const SALON_COLUMNS: &str = r#"id, name, kind, owner_name, owner_surname, owner_phone, owner_email,
       owner_role, founded_year, staff_count, phone, whatsapp, address, about,
       working_hours, social_media, images, created_at, updated_at"#;

pub async fn get_salon(pool: &SqlitePool, id: &str) -> Result<Option<Salon>> {
    let row = sqlx::query_as::<_, SalonRow>(&format!(
        "SELECT {SALON_COLUMNS} FROM salons WHERE id = ? LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Salon::from))
}

pub async fn insert_salon(pool: &SqlitePool, salon: &Salon) -> Result<()> {
    sqlx::query(
        r#"INSERT INTO salons
           (id, name, kind, owner_name, owner_surname, owner_phone, owner_email, owner_role,
            founded_year, staff_count, phone, whatsapp, address, about,
            working_hours, social_media, images, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)"#,
    )
    .bind(&salon.id)
    .bind(&salon.name)
    .bind(&salon.kind)
    .bind(&salon.owner.name)
    .bind(&salon.owner.surname)
    .bind(&salon.owner.phone)
    .bind(&salon.owner.email)
    .bind(&salon.owner.role)
    .bind(&salon.founded_year)
    .bind(&salon.staff_count)
    .bind(&salon.phone)
    .bind(&salon.whatsapp)
    .bind(&salon.address)
    .bind(&salon.about)
    .bind(serde_json::to_string(&salon.working_hours)?)
    .bind(serde_json::to_string(&salon.social_media)?)
    .bind(serde_json::to_string(&salon.images)?)
    .bind(&salon.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Writes the owner-editable fields and stamps `updated_at`.
pub async fn update_salon(pool: &SqlitePool, id: &str, update: &SalonUpdate) -> Result<()> {
    let result = sqlx::query(
        r#"UPDATE salons
           SET name = ?, phone = ?, address = ?, about = ?, updated_at = ?
           WHERE id = ?"#,
    )
    .bind(&update.name)
    .bind(&update.phone)
    .bind(&update.address)
    .bind(&update.about)
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            entity: "Salon",
            id: id.to_string(),
        });
    }
    Ok(())
}

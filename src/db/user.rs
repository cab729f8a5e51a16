use sqlx::SqlitePool;

use super::{new_id, now_timestamp, DbError, Result};
use crate::models::{User, ROLE_CUSTOMER};

/// An existing customer keeps their stored name.
pub async fn create_or_get_by_phone(
    pool: &SqlitePool,
    phone: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    let inserted = sqlx::query(
        r#"INSERT INTO users (id, first_name, last_name, phone, created_at)
           VALUES (?, ?, ?, ?, ?)
           ON CONFLICT(phone) DO NOTHING"#,
    )
    .bind(new_id())
    .bind(first_name)
    .bind(last_name)
    .bind(phone)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 1 {
        log::info!("Registered new customer {phone}");
    }

    get_user_by_phone(pool, phone)
        .await?
        .ok_or_else(|| DbError::NotFound {
            entity: "User",
            id: phone.to_string(),
        })
}

pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        "SELECT id, first_name, last_name, phone, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DbError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

pub async fn get_user_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, first_name, last_name, phone, created_at FROM users WHERE phone = ? LIMIT 1",
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Deletes the customer with their appointments and sessions in one transaction.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM appointments WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sessions WHERE kind = ? AND subject_id = ?")
        .bind(ROLE_CUSTOMER)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(DbError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{appointment, test_pool};
    use crate::models::NewAppointment;

    #[actix_web::test]
    async fn same_phone_returns_same_user() {
        let pool = test_pool().await;
        let first = create_or_get_by_phone(&pool, "+905557654321", "Ayşe", "Yılmaz")
            .await
            .unwrap();
        let second = create_or_get_by_phone(&pool, "+905557654321", "Başka", "İsim")
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(second.first_name, "Ayşe");
    }

    #[actix_web::test]
    async fn delete_removes_appointments() {
        let pool = test_pool().await;
        let user = create_or_get_by_phone(&pool, "+905557654321", "Ayşe", "Yılmaz")
            .await
            .unwrap();
        let draft = NewAppointment {
            salon_id: "tasarimhane".into(),
            user_id: Some(user.id.clone()),
            user_name: user.full_name(),
            user_phone: user.phone.clone(),
            personnel_id: "p1".into(),
            personnel_name: "İsmet Yiğit".into(),
            services: vec!["Saç Kesimi".into()],
            date: "2024-06-20".into(),
            time: "10:00".into(),
        };
        appointment::create_appointment(&pool, &draft).await.unwrap();

        delete_user(&pool, &user.id).await.unwrap();

        assert!(appointment::list_for_user(&pool, &user.id)
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            get_user(&pool, &user.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            delete_user(&pool, &user.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}

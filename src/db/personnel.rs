use sqlx::SqlitePool;

use super::{new_id, now_timestamp, DbError, Result};
use crate::models::{Personnel, PersonnelInput, PersonnelRow, ROLE_EMPLOYEE};

const PERSONNEL_COLUMNS: &str = r#"id, salon_id, name, surname, phone, role, image, services,
       working_hours, day_off, about, created_at, updated_at"#;

/// Personnel of a salon ordered by first name.
pub async fn list_personnel(pool: &SqlitePool, salon_id: &str) -> Result<Vec<Personnel>> {
    let rows = sqlx::query_as::<_, PersonnelRow>(&format!(
        "SELECT {PERSONNEL_COLUMNS} FROM personnel WHERE salon_id = ? ORDER BY name ASC, surname ASC"
    ))
    .bind(salon_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Personnel::from).collect())
}

pub async fn get_personnel(pool: &SqlitePool, id: &str) -> Result<Option<Personnel>> {
    let row = sqlx::query_as::<_, PersonnelRow>(&format!(
        "SELECT {PERSONNEL_COLUMNS} FROM personnel WHERE id = ? LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Personnel::from))
}

pub async fn create_personnel(
    pool: &SqlitePool,
    salon_id: &str,
    input: &PersonnelInput,
) -> Result<String> {
    let id = new_id();
    sqlx::query(
        r#"INSERT INTO personnel
           (id, salon_id, name, surname, phone, role, image, services,
            working_hours, day_off, about, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)"#,
    )
    .bind(&id)
    .bind(salon_id)
    .bind(&input.name)
    .bind(&input.surname)
    .bind(input.phone.as_deref().unwrap_or_default())
    .bind(&input.role)
    .bind(&input.image)
    .bind(serde_json::to_string(&input.services)?)
    .bind(&input.working_hours)
    .bind(&input.day_off)
    .bind(&input.about)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Overwrites the profile fields. A `None` phone or image keeps the stored value.
pub async fn update_personnel(pool: &SqlitePool, id: &str, input: &PersonnelInput) -> Result<()> {
    let result = sqlx::query(
        r#"UPDATE personnel
           SET name = ?, surname = ?, phone = COALESCE(?, phone), role = ?,
               image = COALESCE(?, image), services = ?, working_hours = ?,
               day_off = ?, about = ?, updated_at = ?
           WHERE id = ?"#,
    )
    .bind(&input.name)
    .bind(&input.surname)
    .bind(&input.phone)
    .bind(&input.role)
    .bind(&input.image)
    .bind(serde_json::to_string(&input.services)?)
    .bind(&input.working_hours)
    .bind(&input.day_off)
    .bind(&input.about)
    .bind(now_timestamp())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound {
            entity: "Personnel",
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Deletes the staff member and ends their sessions in one transaction.
/// Appointments keep their copied personnel name.
pub async fn delete_personnel(pool: &SqlitePool, id: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM sessions WHERE kind = ? AND subject_id = ?")
        .bind(ROLE_EMPLOYEE)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM personnel WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(DbError::NotFound {
            entity: "Personnel",
            id: id.to_string(),
        });
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{session, test_pool};
    use crate::session::Principal;

    fn input(name: &str, surname: &str) -> PersonnelInput {
        PersonnelInput {
            name: name.into(),
            surname: surname.into(),
            phone: Some("+905551000009".into()),
            role: "Kuaför".into(),
            services: vec!["Saç Kesimi".into()],
            working_hours: "10:00 - 22:00".into(),
            day_off: "Pazar".into(),
            ..PersonnelInput::default()
        }
    }

    #[actix_web::test]
    async fn personnel_crud() {
        let pool = test_pool().await;

        let zeynep = create_personnel(&pool, "s1", &input("Zeynep", "Ak")).await.unwrap();
        let ahmet = create_personnel(&pool, "s1", &input("Ahmet", "Kara")).await.unwrap();
        create_personnel(&pool, "s2", &input("Burak", "Er")).await.unwrap();

        let names: Vec<String> = list_personnel(&pool, "s1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ahmet", "Zeynep"]);

        let mut edit = input("Zeynep", "Aksoy");
        edit.phone = None;
        edit.services = vec!["Manikür".into(), "Pedikür".into()];
        update_personnel(&pool, &zeynep, &edit).await.unwrap();
        let stored = get_personnel(&pool, &zeynep).await.unwrap().unwrap();
        assert_eq!(stored.surname, "Aksoy");
        assert_eq!(stored.phone, "+905551000009");
        assert_eq!(stored.services, vec!["Manikür", "Pedikür"]);
        assert!(stored.updated_at.is_some());

        let employee = session::create_session(
            &pool,
            Principal::Employee {
                personnel_id: ahmet.clone(),
            },
        )
        .await
        .unwrap();
        let colleague = session::create_session(
            &pool,
            Principal::Employee {
                personnel_id: zeynep.clone(),
            },
        )
        .await
        .unwrap();

        delete_personnel(&pool, &ahmet).await.unwrap();
        assert!(get_personnel(&pool, &ahmet).await.unwrap().is_none());
        assert!(session::find_session(&pool, &employee.token)
            .await
            .unwrap()
            .is_none());
        assert!(session::find_session(&pool, &colleague.token)
            .await
            .unwrap()
            .is_some());
        assert!(matches!(
            delete_personnel(&pool, &ahmet).await,
            Err(DbError::NotFound { .. })
        ));
    }
}

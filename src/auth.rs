use actix_web::{
    dev::ServiceRequest,
    http::header::Header,
    web, Error, HttpMessage, HttpRequest,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{self, personnel, salon},
    error::AppError,
    models::{Personnel, Salon, ROLE_CUSTOMER, ROLE_EMPLOYEE, ROLE_OWNER},
    phone,
    session::Session,
    state::AppState,
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", content = "data", rename_all = "lowercase")]
pub enum StaffLogin {
    Owner(Salon),
    Employee(Personnel),
}

/// Owner first, then personnel. The owner may also be listed as personnel.
pub async fn resolve_staff(
    pool: &SqlitePool,
    salon_id: &str,
    raw_phone: &str,
) -> db::Result<Option<StaffLogin>> {
    if let Some(salon) = salon::get_salon(pool, salon_id).await? {
        if phone::same_number(&salon.owner.phone, raw_phone) {
            return Ok(Some(StaffLogin::Owner(salon)));
        }
    }

    let staff = personnel::list_personnel(pool, salon_id).await?;
    Ok(staff
        .into_iter()
        .find(|person| phone::same_number(&person.phone, raw_phone))
        .map(StaffLogin::Employee))
}

async fn authenticate(req: &ServiceRequest, credentials: &BearerAuth) -> Result<Session, Error> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(AppError::Unauthorized)?;
    lookup_session(state, credentials.token())
        .await?
        .ok_or_else(|| AppError::Unauthorized.into())
}

async fn lookup_session(state: &AppState, token: &str) -> Result<Option<Session>, AppError> {
    Ok(db::session::find_session(&state.db, token).await?)
}

async fn validate_role(
    req: ServiceRequest,
    credentials: BearerAuth,
    role: Option<&'static str>,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    match authenticate(&req, &credentials).await {
        Ok(session) => {
            if let Some(role) = role {
                if session.principal.kind() != role {
                    return Err((AppError::Unauthorized.into(), req));
                }
            }
            req.extensions_mut().insert(session);
            Ok(req)
        }
        Err(err) => Err((err, req)),
    }
}

pub async fn session_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    validate_role(req, credentials, None).await
}

pub async fn customer_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    validate_role(req, credentials, Some(ROLE_CUSTOMER)).await
}

pub async fn owner_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    validate_role(req, credentials, Some(ROLE_OWNER)).await
}

pub async fn employee_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    validate_role(req, credentials, Some(ROLE_EMPLOYEE)).await
}

// No header means anonymous; an unknown token is still a 401.
pub async fn optional_session(
    state: &AppState,
    req: &HttpRequest,
) -> Result<Option<Session>, AppError> {
    if req.headers().get(actix_web::http::header::AUTHORIZATION).is_none() {
        return Ok(None);
    }
    let auth = Authorization::<Bearer>::parse(req).map_err(|_| AppError::Unauthorized)?;
    let token = auth.into_scheme();
    match lookup_session(state, token.token()).await? {
        Some(session) => Ok(Some(session)),
        None => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed, test_pool};

    async fn seeded() -> SqlitePool {
        let pool = test_pool().await;
        seed::seed_defaults(&pool, "tasarimhane").await.unwrap();
        pool
    }

    #[actix_web::test]
    async fn owner_phone_wins_over_matching_personnel() {
        let pool = seeded().await;
        let login = resolve_staff(&pool, "tasarimhane", "0 (555) 123 45 67")
            .await
            .unwrap();
        assert!(matches!(login, Some(StaffLogin::Owner(ref salon)) if salon.id == "tasarimhane"));
    }

    #[actix_web::test]
    async fn personnel_phone_routes_to_employee() {
        let pool = seeded().await;
        let login = resolve_staff(&pool, "tasarimhane", "555 100 00 03").await.unwrap();
        match login {
            Some(StaffLogin::Employee(person)) => assert_eq!(person.name, "İsmet"),
            other => panic!("expected employee, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn unknown_phone_is_not_registered() {
        let pool = seeded().await;
        let login = resolve_staff(&pool, "tasarimhane", "+905559999999").await.unwrap();
        assert!(login.is_none());
    }

    #[test]
    fn login_serializes_as_tagged_variant() {
        let value = serde_json::to_value(StaffLogin::Owner(Salon::placeholder("s"))).unwrap();
        assert_eq!(value["role"], "owner");
        assert_eq!(value["data"]["id"], "s");
    }
}

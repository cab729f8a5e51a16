use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::{
    auth::{customer_validator, session_validator},
    db::{appointment, session, user},
    error::AppError,
    session::{Principal, Session},
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/logout")
            .wrap(HttpAuthentication::bearer(session_validator))
            .route(web::post().to(logout)),
    )
    .service(
        web::scope("/me")
            .wrap(HttpAuthentication::bearer(customer_validator))
            .service(
                web::resource("")
                    .route(web::get().to(profile))
                    .route(web::delete().to(delete_account)),
            )
            .service(web::resource("/appointments").route(web::get().to(my_appointments))),
    );
}

fn customer_id(session: &Session) -> Result<&str, AppError> {
    match &session.principal {
        Principal::Customer { user_id } => Ok(user_id),
        _ => Err(AppError::Unauthorized),
    }
}

async fn logout(state: web::Data<AppState>, auth: web::ReqData<Session>) -> Result<HttpResponse> {
    session::delete_session(&state.db, &auth.token)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::NoContent().finish())
}

async fn profile(state: web::Data<AppState>, auth: web::ReqData<Session>) -> Result<HttpResponse> {
    let user = user::get_user(&state.db, customer_id(&auth)?)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(user))
}

/// Removes the customer, their appointments, and every session they hold.
async fn delete_account(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let user_id = customer_id(&auth)?;
    user::delete_user(&state.db, user_id)
        .await
        .map_err(AppError::from)?;
    log::info!("Customer {user_id} deleted their account");
    Ok(HttpResponse::NoContent().finish())
}

async fn my_appointments(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let appointments = appointment::list_for_user(&state.db, customer_id(&auth)?)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(appointments))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Duration, Local};
    use serde_json::json;

    use crate::db::personnel;
    use crate::routes::{
        self,
        test_support::{bearer, json_body, seeded_state},
    };

    use super::*;

    #[actix_web::test]
    async fn customer_lifecycle() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes::configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/customers/entry")
                .set_json(json!({ "phone": "+90 555 765 43 21", "full_name": "Ayşe Yılmaz" }))
                .to_request(),
        )
        .await;
        let token = json_body(resp).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let staff = personnel::list_personnel(&state.db, "tasarimhane").await.unwrap();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/appointments")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "personnel_id": staff[0].id,
                    "services": ["Cilt Bakımı"],
                    "date": Local::now().date_naive() + Duration::days(3),
                    "time": "12:00",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me/appointments")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        let list = json_body(resp).await;
        assert_eq!(list.as_array().map(Vec::len), Some(1));
        assert_eq!(list[0]["services"], json!(["Cilt Bakımı"]));

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(json_body(resp).await["last_name"], "Yılmaz");

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/me")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(appointment::list_for_salon(&state.db, "tasarimhane")
            .await
            .unwrap()
            .is_empty());

        // The session went with the account.
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_ends_the_session() {
        let state = seeded_state().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes::configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/staff/login")
                .set_json(json!({ "phone": "+905551000002" }))
                .to_request(),
        )
        .await;
        let token = json_body(resp).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/me")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/logout")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(session::find_session(&state.db, &token)
            .await
            .unwrap()
            .is_none());
    }
}

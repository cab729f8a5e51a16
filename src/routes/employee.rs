use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Serialize;

use crate::{
    auth::employee_validator,
    db::{appointment, personnel},
    error::AppError,
    models::{Appointment, AppointmentStatus, PersonnelInput},
    privacy::{censor_name, censor_phone},
    session::{Principal, Session},
    state::AppState,
};

/// An appointment as staff see it: customer identity is masked.
#[derive(Serialize)]
struct StaffAppointment {
    id: String,
    user_name: String,
    user_phone: String,
    services: Vec<String>,
    date: String,
    time: String,
    status: AppointmentStatus,
    created_at: String,
}

impl From<Appointment> for StaffAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            user_name: censor_name(&appointment.user_name),
            user_phone: censor_phone(&appointment.user_phone),
            services: appointment.services,
            date: appointment.date,
            time: appointment.time,
            status: appointment.status,
            created_at: appointment.created_at,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employee")
            .wrap(HttpAuthentication::bearer(employee_validator))
            .service(
                web::resource("/profile")
                    .route(web::get().to(profile))
                    .route(web::put().to(update_profile)),
            )
            .service(web::resource("/appointments").route(web::get().to(appointments))),
    );
}

fn personnel_id(session: &Session) -> Result<&str, AppError> {
    match &session.principal {
        Principal::Employee { personnel_id } => Ok(personnel_id),
        _ => Err(AppError::Unauthorized),
    }
}

async fn profile(state: web::Data<AppState>, auth: web::ReqData<Session>) -> Result<HttpResponse> {
    let id = personnel_id(&auth)?;
    let person = personnel::get_personnel(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Personnel {id}")))?;
    Ok(HttpResponse::Ok().json(person))
}

/// Staff edit their own card but not the phone they log in with or the photo.
async fn update_profile(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    body: web::Json<PersonnelInput>,
) -> Result<HttpResponse> {
    let id = personnel_id(&auth)?;
    let input = PersonnelInput {
        phone: None,
        image: None,
        ..body.into_inner()
    }
    .normalized();
    if !input.has_required_names() {
        return Err(AppError::Validation("Name and surname are required.".to_string()).into());
    }

    personnel::update_personnel(&state.db, id, &input)
        .await
        .map_err(AppError::from)?;
    let person = personnel::get_personnel(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Personnel {id}")))?;
    Ok(HttpResponse::Ok().json(person))
}

async fn appointments(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let list: Vec<StaffAppointment> = appointment::list_for_personnel(&state.db, personnel_id(&auth)?)
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(StaffAppointment::from)
        .collect();
    Ok(HttpResponse::Ok().json(list))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    use crate::db::{session, user};
    use crate::models::NewAppointment;
    use crate::routes::{
        self,
        test_support::{bearer, json_body, seeded_state},
    };

    use super::*;

    async fn staff_token(state: &AppState, phone: &str) -> String {
        let staff = personnel::list_personnel(&state.db, "tasarimhane").await.unwrap();
        let person = staff.into_iter().find(|p| p.phone == phone).unwrap();
        session::create_session(
            &state.db,
            Principal::Employee {
                personnel_id: person.id,
            },
        )
        .await
        .unwrap()
        .token
    }

    #[actix_web::test]
    async fn employee_sees_masked_customers() {
        let state = seeded_state().await;
        let staff = personnel::list_personnel(&state.db, "tasarimhane").await.unwrap();
        let ismet = staff.iter().find(|p| p.name == "İsmet").unwrap();
        let customer = user::create_or_get_by_phone(&state.db, "+905557654321", "Ali Veli", "Kaya")
            .await
            .unwrap();
        appointment::create_appointment(
            &state.db,
            &NewAppointment {
                salon_id: "tasarimhane".into(),
                user_id: Some(customer.id.clone()),
                user_name: customer.full_name(),
                user_phone: customer.phone.clone(),
                personnel_id: ismet.id.clone(),
                personnel_name: ismet.full_name(),
                services: vec!["Saç Kesimi".into()],
                date: "2030-02-01".into(),
                time: "11:30".into(),
            },
        )
        .await
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes::configure),
        )
        .await;
        let token = staff_token(&state, &ismet.phone).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/employee/appointments")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let list = json_body(resp).await;
        assert_eq!(list[0]["user_name"], "A*i V**i K**a");
        assert_eq!(list[0]["user_phone"], "5*******21");
        assert_eq!(list[0]["time"], "11:30");
        assert!(list[0].get("user_id").is_none());

        // Another staff member sees none of İsmet's bookings.
        let other = staff_token(&state, "+905551000002").await;
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/employee/appointments")
                .insert_header(bearer(&other))
                .to_request(),
        )
        .await;
        assert_eq!(json_body(resp).await, json!([]));
    }

    #[actix_web::test]
    async fn profile_edit_keeps_phone_and_image() {
        let state = seeded_state().await;
        let token = staff_token(&state, "+905551000003").await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes::configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/employee/profile")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "name": "İsmet",
                    "surname": "Yıldız",
                    "phone": "+905559999999",
                    "image": "/images/other.jpg",
                    "about": "Renk uzmanı",
                    "services": ["Boya"],
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["surname"], "Yıldız");
        assert_eq!(body["about"], "Renk uzmanı");
        assert_eq!(body["phone"], "+905551000003");
        assert_ne!(body["image"], "/images/other.jpg");

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/employee/profile")
                .insert_header(bearer(&token))
                .set_json(json!({ "name": "İsmet", "surname": "" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/employee/profile")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(json_body(resp).await["surname"], "Yıldız");
    }
}

use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Serialize;
use serde_json::json;

use crate::{
    auth::owner_validator,
    db::{
        appointment::{self, AppointmentCounts},
        personnel, salon,
    },
    error::AppError,
    models::{AppointmentStatus, PersonnelInput, Salon, SalonUpdate},
    routes::events,
    session::{Principal, Session},
    state::AppState,
};

#[derive(Serialize)]
struct Dashboard {
    salon: Salon,
    personnel_count: usize,
    appointments: AppointmentCounts,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/owner")
            .wrap(HttpAuthentication::bearer(owner_validator))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(web::resource("/salon").route(web::put().to(update_salon)))
            .service(
                web::resource("/personnel")
                    .route(web::get().to(list_personnel))
                    .route(web::post().to(create_personnel)),
            )
            .service(
                web::resource("/personnel/{id}")
                    .route(web::put().to(update_personnel))
                    .route(web::delete().to(delete_personnel)),
            )
            .service(web::resource("/appointments").route(web::get().to(list_appointments)))
            .service(
                web::resource("/appointments/{id}/confirm").route(web::post().to(confirm_appointment)),
            )
            .service(
                web::resource("/appointments/{id}/cancel").route(web::post().to(cancel_appointment)),
            )
            .service(web::resource("/events").route(web::get().to(events::stream_events))),
    );
}

pub(crate) fn owner_salon_id(session: &Session) -> Result<&str, AppError> {
    match &session.principal {
        Principal::Owner { salon_id } => Ok(salon_id),
        _ => Err(AppError::Unauthorized),
    }
}

async fn dashboard(state: web::Data<AppState>, auth: web::ReqData<Session>) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    let salon = salon::get_salon(&state.db, salon_id)
        .await
        .map_err(AppError::from)?
        .unwrap_or_else(|| Salon::placeholder(salon_id));
    let personnel_count = personnel::list_personnel(&state.db, salon_id)
        .await
        .map_err(AppError::from)?
        .len();
    let appointments = appointment::count_by_status(&state.db, salon_id)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(Dashboard {
        salon,
        personnel_count,
        appointments,
    }))
}

async fn update_salon(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    body: web::Json<SalonUpdate>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    salon::update_salon(&state.db, salon_id, &body)
        .await
        .map_err(AppError::from)?;
    let salon = salon::get_salon(&state.db, salon_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Salon {salon_id}")))?;
    Ok(HttpResponse::Ok().json(salon))
}

async fn list_personnel(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let staff = personnel::list_personnel(&state.db, owner_salon_id(&auth)?)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(staff))
}

fn validated(input: PersonnelInput) -> Result<PersonnelInput, AppError> {
    let input = input.normalized();
    if !input.has_required_names() {
        return Err(AppError::Validation(
            "Name and surname are required.".to_string(),
        ));
    }
    Ok(input)
}

async fn create_personnel(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    body: web::Json<PersonnelInput>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    let input = validated(body.into_inner())?;
    let id = personnel::create_personnel(&state.db, salon_id, &input)
        .await
        .map_err(AppError::from)?;
    log::info!("Added personnel {} {} ({id})", input.name, input.surname);
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

/// Loads a staff member and checks it belongs to the owner's salon.
async fn owned_personnel(state: &AppState, salon_id: &str, id: &str) -> Result<(), AppError> {
    personnel::get_personnel(&state.db, id)
        .await?
        .filter(|person| person.salon_id == salon_id)
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Personnel {id}")))
}

async fn update_personnel(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    path: web::Path<String>,
    body: web::Json<PersonnelInput>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    let id = path.into_inner();
    owned_personnel(&state, salon_id, &id).await?;
    let input = validated(body.into_inner())?;
    personnel::update_personnel(&state.db, &id, &input)
        .await
        .map_err(AppError::from)?;
    let updated = personnel::get_personnel(&state.db, &id)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Existing appointments keep their copied personnel name.
async fn delete_personnel(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    let id = path.into_inner();
    owned_personnel(&state, salon_id, &id).await?;
    personnel::delete_personnel(&state.db, &id)
        .await
        .map_err(AppError::from)?;
    log::info!("Deleted personnel {id}");
    Ok(HttpResponse::NoContent().finish())
}

async fn list_appointments(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let appointments = appointment::list_for_salon(&state.db, owner_salon_id(&auth)?)
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(appointments))
}

async fn change_status(
    state: &AppState,
    salon_id: &str,
    appointment_id: &str,
    next: AppointmentStatus,
) -> Result<HttpResponse, AppError> {
    let current = appointment::get_appointment(&state.db, appointment_id).await?;
    if current.salon_id != salon_id {
        return Err(AppError::NotFound(format!("Appointment {appointment_id}")));
    }
    let next = current
        .status
        .transition_to(next)
        .ok_or_else(|| AppError::InvalidTransition {
            from: current.status.to_string(),
            to: next.to_string(),
        })?;

    appointment::set_status(&state.db, appointment_id, next).await?;
    let updated = appointment::get_appointment(&state.db, appointment_id).await?;

    log::info!("Appointment {appointment_id} is now {next}");
    state.publish("appointment_updated", &updated);

    Ok(HttpResponse::Ok().json(updated))
}

async fn confirm_appointment(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    Ok(change_status(&state, salon_id, &path, AppointmentStatus::Confirmed).await?)
}

async fn cancel_appointment(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?;
    Ok(change_status(&state, salon_id, &path, AppointmentStatus::Cancelled).await?)
}

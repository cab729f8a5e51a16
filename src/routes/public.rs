use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    auth::{optional_session, resolve_staff, StaffLogin},
    booking::{BookingFlow, BookingSummary, Customer},
    catalog,
    db::{appointment, personnel, salon, session, user},
    error::AppError,
    models::{Appointment, Salon, User},
    phone, schedule,
    session::{Principal, Session},
    state::AppState,
};

#[derive(Deserialize)]
struct CalendarQuery {
    year: Option<i32>,
    month: Option<u32>,
}

#[derive(Deserialize)]
struct BookingRequest {
    personnel_id: String,
    services: Vec<String>,
    date: NaiveDate,
    time: String,
}

#[derive(Serialize)]
struct BookingResponse {
    appointment: Appointment,
    summary: BookingSummary,
}

#[derive(Deserialize)]
struct EntryRequest {
    phone: String,
    full_name: String,
}

#[derive(Serialize)]
struct EntryResponse {
    token: String,
    display_phone: String,
    user: User,
}

#[derive(Deserialize)]
struct StaffLoginRequest {
    phone: String,
}

#[derive(Serialize)]
struct StaffLoginResponse {
    token: String,
    #[serde(flatten)]
    login: StaffLogin,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/salon").route(web::get().to(show_salon)))
        .service(web::resource("/personnel").route(web::get().to(list_personnel)))
        .service(web::resource("/personnel/{id}").route(web::get().to(show_personnel)))
        .service(web::resource("/services").route(web::get().to(list_services)))
        .service(web::resource("/booking/calendar").route(web::get().to(calendar)))
        .service(web::resource("/booking/slots").route(web::get().to(time_slots)))
        .service(web::resource("/appointments").route(web::post().to(create_booking)))
        .service(web::resource("/customers/entry").route(web::post().to(customer_entry)))
        .service(web::resource("/staff/login").route(web::post().to(staff_login)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn show_salon(state: web::Data<AppState>) -> Result<HttpResponse> {
    let salon = salon::get_salon(&state.db, state.salon_id())
        .await
        .map_err(AppError::from)?
        .unwrap_or_else(|| Salon::placeholder(state.salon_id()));
    Ok(HttpResponse::Ok().json(salon))
}

async fn list_personnel(state: web::Data<AppState>) -> Result<HttpResponse> {
    let staff = personnel::list_personnel(&state.db, state.salon_id())
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(staff))
}

async fn show_personnel(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let person = personnel::get_personnel(&state.db, &id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Personnel {id}")))?;
    Ok(HttpResponse::Ok().json(person))
}

async fn list_services() -> HttpResponse {
    HttpResponse::Ok().json(catalog::all())
}

async fn calendar(query: web::Query<CalendarQuery>) -> Result<HttpResponse> {
    let today = today();
    let current = schedule::CalendarMonth::containing(today);
    let month = schedule::CalendarMonth::new(
        query.year.unwrap_or(current.year),
        query.month.unwrap_or(current.month),
    )
    .ok_or_else(|| AppError::Validation("Invalid calendar month.".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "calendar": month.view(today),
        "previous": month.previous(),
        "next": month.next(),
    })))
}

async fn time_slots() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "slots": schedule::default_time_slots() }))
}

async fn create_booking(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<BookingRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    let customer = match optional_session(&state, &req).await? {
        Some(Session {
            principal: Principal::Customer { user_id },
            ..
        }) => {
            let user = user::get_user(&state.db, &user_id)
                .await
                .map_err(AppError::from)?;
            Customer::from(&user)
        }
        Some(_) => return Err(AppError::Unauthorized.into()),
        None => Customer::guest(),
    };

    let person = personnel::get_personnel(&state.db, &body.personnel_id)
        .await
        .map_err(AppError::from)?
        .filter(|person| person.salon_id == state.salon_id())
        .ok_or_else(|| AppError::NotFound(format!("Personnel {}", body.personnel_id)))?;

    let flow = BookingFlow::replay(today(), person, &body.services, body.date, &body.time)
        .map_err(AppError::from)?;
    let summary = flow.summary().map_err(AppError::from)?;
    let draft = flow
        .confirm(state.salon_id(), &customer)
        .map_err(AppError::from)?;

    let appointment = appointment::create_appointment(&state.db, &draft)
        .await
        .map_err(AppError::from)?;

    log::info!(
        "Appointment {} booked with {} on {} {}",
        appointment.id,
        appointment.personnel_name,
        appointment.date,
        appointment.time
    );
    state.publish("appointment_created", &appointment);

    Ok(HttpResponse::Created().json(BookingResponse {
        appointment,
        summary,
    }))
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Splits a full name into first and last name. The last word is the last
/// name. Characters other than letters and spaces are dropped.
fn split_full_name(full_name: &str) -> Option<(String, String)> {
    let cleaned: String = full_name
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();
    let words: Vec<String> = cleaned.split_whitespace().map(capitalize_word).collect();
    let (last, rest) = words.split_last()?;
    if rest.is_empty() {
        return None;
    }
    Some((rest.join(" "), last.clone()))
}

async fn customer_entry(
    state: web::Data<AppState>,
    body: web::Json<EntryRequest>,
) -> Result<HttpResponse> {
    let stored_phone = phone::to_e164(&body.phone)
        .ok_or_else(|| AppError::Validation("Please enter a valid phone number.".to_string()))?;
    let (first_name, last_name) = split_full_name(&body.full_name).ok_or_else(|| {
        AppError::Validation("Please enter your first and last name.".to_string())
    })?;

    let user = user::create_or_get_by_phone(&state.db, &stored_phone, &first_name, &last_name)
        .await
        .map_err(AppError::from)?;
    let session = session::create_session(
        &state.db,
        Principal::Customer {
            user_id: user.id.clone(),
        },
    )
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(EntryResponse {
        token: session.token,
        display_phone: phone::format_display(&user.phone),
        user,
    }))
}

async fn staff_login(
    state: web::Data<AppState>,
    body: web::Json<StaffLoginRequest>,
) -> Result<HttpResponse> {
    if !phone::is_valid(&body.phone) {
        return Err(AppError::Validation("Please enter a valid phone number.".to_string()).into());
    }

    let login = resolve_staff(&state.db, state.salon_id(), &body.phone)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::NotRegistered)?;

    let principal = match &login {
        StaffLogin::Owner(salon) => Principal::Owner {
            salon_id: salon.id.clone(),
        },
        StaffLogin::Employee(person) => Principal::Employee {
            personnel_id: person.id.clone(),
        },
    };
    let session = session::create_session(&state.db, principal)
        .await
        .map_err(AppError::from)?;

    log::info!("Staff login as {}", session.principal.kind());

    Ok(HttpResponse::Ok().json(StaffLoginResponse {
        token: session.token,
        login,
    }))
}

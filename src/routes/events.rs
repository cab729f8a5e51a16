use actix_web::{http::header, web, HttpResponse, Result};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::{
    routes::owner::owner_salon_id,
    session::Session,
    state::{AppState, AppointmentEvent},
};

/// Live booking updates for the owner dashboard, scoped to the owner's salon.
///
/// Lagging receivers silently skip the events they missed.
pub async fn stream_events(
    state: web::Data<AppState>,
    auth: web::ReqData<Session>,
) -> Result<HttpResponse> {
    let salon_id = owner_salon_id(&auth)?.to_string();
    let rx = state.events.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.salon_id == salon_id => {
            Some(Ok::<web::Bytes, actix_web::Error>(event_to_bytes(&event)))
        }
        _ => None,
    });

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream))
}

fn event_to_bytes(event: &AppointmentEvent) -> web::Bytes {
    let payload = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    web::Bytes::from(format!("event: update\ndata: {}\n\n", payload))
}

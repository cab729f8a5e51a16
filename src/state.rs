use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::{config::Config, models::Appointment};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub events: broadcast::Sender<AppointmentEvent>,
    pub config: Config,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self { db, events, config }
    }

    pub fn salon_id(&self) -> &str {
        &self.config.salon_id
    }

    /// Publishes to owner dashboards. Having no listeners is not an error.
    pub fn publish(&self, kind: &str, appointment: &Appointment) {
        let _ = self
            .events
            .send(AppointmentEvent::from_appointment(kind, appointment));
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AppointmentEvent {
    pub kind: String,
    pub appointment_id: String,
    pub salon_id: String,
    pub status: String,
    pub user_name: String,
    pub personnel_id: String,
    pub personnel_name: String,
    pub services: Vec<String>,
    pub date: String,
    pub time: String,
}

impl AppointmentEvent {
    pub fn from_appointment(kind: &str, appointment: &Appointment) -> Self {
        Self {
            kind: kind.to_string(),
            appointment_id: appointment.id.clone(),
            salon_id: appointment.salon_id.clone(),
            status: appointment.status.to_string(),
            user_name: appointment.user_name.clone(),
            personnel_id: appointment.personnel_id.clone(),
            personnel_name: appointment.personnel_name.clone(),
            services: appointment.services.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_CUSTOMER: &str = "customer";

pub const GUEST_NAME: &str = "Misafir";
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    /// Accepted from stored data; nothing in the service produces it.
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Owner actions only move a pending appointment to confirmed or cancelled.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed) | (Self::Pending, Self::Cancelled)
        )
    }

    pub fn transition_to(self, next: AppointmentStatus) -> Option<AppointmentStatus> {
        self.can_transition_to(next).then_some(next)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown appointment status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    pub day: String,
    pub hours: String,
    pub is_open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Salon {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub owner: Owner,
    pub founded_year: String,
    pub staff_count: String,
    pub phone: String,
    pub whatsapp: String,
    pub address: String,
    pub about: String,
    pub working_hours: Vec<WorkingDay>,
    pub social_media: SocialMedia,
    pub images: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Salon {
    /// Stand-in shown when the salon record is missing.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: PLACEHOLDER.to_string(),
            kind: PLACEHOLDER.to_string(),
            owner: Owner {
                name: PLACEHOLDER.to_string(),
                surname: String::new(),
                phone: PLACEHOLDER.to_string(),
                email: None,
                role: String::new(),
            },
            founded_year: PLACEHOLDER.to_string(),
            staff_count: PLACEHOLDER.to_string(),
            phone: PLACEHOLDER.to_string(),
            whatsapp: PLACEHOLDER.to_string(),
            address: PLACEHOLDER.to_string(),
            about: PLACEHOLDER.to_string(),
            working_hours: Vec::new(),
            social_media: SocialMedia::default(),
            images: Vec::new(),
            created_at: String::new(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Personnel {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub role: String,
    pub image: Option<String>,
    pub services: Vec<String>,
    pub working_hours: String,
    pub day_off: String,
    pub about: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Personnel {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    pub fn offers(&self, service: &str) -> bool {
        self.services.iter().any(|offered| offered == service)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub created_at: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: String,
    pub salon_id: String,
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub personnel_id: String,
    pub personnel_name: String,
    pub services: Vec<String>,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub salon_id: String,
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub personnel_id: String,
    pub personnel_name: String,
    pub services: Vec<String>,
    pub date: String,
    pub time: String,
}

/// Editable personnel fields, shared by owner add/edit and employee self-edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonnelInput {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub working_hours: String,
    #[serde(default)]
    pub day_off: String,
    #[serde(default)]
    pub about: String,
}

impl PersonnelInput {
    /// Trims every field and drops empty or repeated service names.
    pub fn normalized(self) -> Self {
        let mut services: Vec<String> = Vec::new();
        for service in self.services {
            let service = service.trim();
            if !service.is_empty() && !services.iter().any(|s| s == service) {
                services.push(service.to_string());
            }
        }
        Self {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            phone: self.phone.map(|p| p.trim().to_string()),
            role: self.role.trim().to_string(),
            image: self
                .image
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty()),
            services,
            working_hours: self.working_hours.trim().to_string(),
            day_off: self.day_off.trim().to_string(),
            about: self.about.trim().to_string(),
        }
    }

    pub fn has_required_names(&self) -> bool {
        !self.name.trim().is_empty() && !self.surname.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SalonUpdate {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub about: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalonRow {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub owner_name: String,
    pub owner_surname: String,
    pub owner_phone: String,
    pub owner_email: Option<String>,
    pub owner_role: String,
    pub founded_year: String,
    pub staff_count: String,
    pub phone: String,
    pub whatsapp: String,
    pub address: String,
    pub about: String,
    pub working_hours: String,
    pub social_media: String,
    pub images: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<SalonRow> for Salon {
    fn from(row: SalonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            kind: row.kind,
            owner: Owner {
                name: row.owner_name,
                surname: row.owner_surname,
                phone: row.owner_phone,
                email: row.owner_email,
                role: row.owner_role,
            },
            founded_year: row.founded_year,
            staff_count: row.staff_count,
            phone: row.phone,
            whatsapp: row.whatsapp,
            address: row.address,
            about: row.about,
            working_hours: decode_json_column(&row.working_hours),
            social_media: decode_json_column(&row.social_media),
            images: decode_json_column(&row.images),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonnelRow {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub role: String,
    pub image: Option<String>,
    pub services: String,
    pub working_hours: String,
    pub day_off: String,
    pub about: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<PersonnelRow> for Personnel {
    fn from(row: PersonnelRow) -> Self {
        Self {
            id: row.id,
            salon_id: row.salon_id,
            name: row.name,
            surname: row.surname,
            phone: row.phone,
            role: row.role,
            image: row.image,
            services: decode_json_column(&row.services),
            working_hours: row.working_hours,
            day_off: row.day_off,
            about: row.about,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: String,
    pub salon_id: String,
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub personnel_id: String,
    pub personnel_name: String,
    pub services: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        let status = row.status.parse().unwrap_or_else(|err| {
            log::warn!("Appointment {} has {err}; treating as pending", row.id);
            AppointmentStatus::Pending
        });
        Self {
            id: row.id,
            salon_id: row.salon_id,
            user_id: row.user_id,
            user_name: row.user_name,
            user_phone: row.user_phone,
            personnel_id: row.personnel_id,
            personnel_name: row.personnel_name,
            services: decode_json_column(&row.services),
            date: row.date,
            time: row.time,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Malformed JSON columns degrade to the empty value instead of failing the read.
fn decode_json_column<T>(raw: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    serde_json::from_str(raw).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed JSON column: {err}");
        T::default()
    })
}

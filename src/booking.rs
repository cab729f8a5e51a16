use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::{self, Totals},
    models::{NewAppointment, Personnel, User, GUEST_NAME},
    schedule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    PersonnelSelection,
    ServiceSelection,
    DateTimeSelection,
    Summary,
}

impl BookingStep {
    fn previous(self) -> Option<Self> {
        match self {
            Self::PersonnelSelection => None,
            Self::ServiceSelection => Some(Self::PersonnelSelection),
            Self::DateTimeSelection => Some(Self::ServiceSelection),
            Self::Summary => Some(Self::DateTimeSelection),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please choose a staff member.")]
    NoPersonnel,
    #[error("Please select at least one service.")]
    NoServices,
    #[error("Please pick a time.")]
    NoTimeSlot,
    #[error("{0} is not offered by this staff member.")]
    ServiceNotOffered(String),
    #[error("{0} is in the past.")]
    PastDate(NaiveDate),
    #[error("{0} is not a bookable time.")]
    UnknownSlot(String),
    #[error("Not available during {actual:?}; expected {expected:?}.")]
    WrongStep {
        expected: BookingStep,
        actual: BookingStep,
    },
}

/// Who the appointment is for. Bookings without a session are guest bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
}

impl Customer {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            name: GUEST_NAME.to_string(),
            phone: String::new(),
        }
    }
}

impl From<&User> for Customer {
    fn from(user: &User) -> Self {
        Self {
            user_id: Some(user.id.clone()),
            name: user.full_name(),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    pub personnel_id: String,
    pub personnel_name: String,
    pub services: Vec<String>,
    pub date: NaiveDate,
    pub time: String,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    step: BookingStep,
    today: NaiveDate,
    personnel: Option<Personnel>,
    services: Vec<String>,
    date: NaiveDate,
    time: Option<String>,
}

impl BookingFlow {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: BookingStep::PersonnelSelection,
            today,
            personnel: None,
            services: Vec::new(),
            date: today,
            time: None,
        }
    }

    /// Walks a full submission through every step, ending on the summary.
    pub fn replay(
        today: NaiveDate,
        personnel: Personnel,
        services: &[String],
        date: NaiveDate,
        time: &str,
    ) -> Result<Self, BookingError> {
        let mut flow = Self::new(today);
        flow.select_personnel(personnel)?;
        for service in services {
            if !flow.services.contains(service) {
                flow.toggle_service(service)?;
            }
        }
        flow.advance()?;
        flow.select_date(date)?;
        flow.select_time(time)?;
        flow.advance()?;
        Ok(flow)
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn selected_services(&self) -> &[String] {
        &self.services
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    fn expect_step(&self, expected: BookingStep) -> Result<(), BookingError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(BookingError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Picking a staff member resets the service selection.
    pub fn select_personnel(&mut self, personnel: Personnel) -> Result<(), BookingError> {
        self.expect_step(BookingStep::PersonnelSelection)?;
        self.personnel = Some(personnel);
        self.services.clear();
        self.step = BookingStep::ServiceSelection;
        Ok(())
    }

    /// Adds the service if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle_service(&mut self, service: &str) -> Result<bool, BookingError> {
        self.expect_step(BookingStep::ServiceSelection)?;
        if let Some(index) = self.services.iter().position(|s| s == service) {
            self.services.remove(index);
            return Ok(false);
        }
        let personnel = self.personnel.as_ref().ok_or(BookingError::NoPersonnel)?;
        if !personnel.offers(service) {
            return Err(BookingError::ServiceNotOffered(service.to_string()));
        }
        self.services.push(service.to_string());
        Ok(true)
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), BookingError> {
        self.expect_step(BookingStep::DateTimeSelection)?;
        if !schedule::is_selectable(date, self.today) {
            return Err(BookingError::PastDate(date));
        }
        self.date = date;
        Ok(())
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), BookingError> {
        self.expect_step(BookingStep::DateTimeSelection)?;
        if !schedule::is_offered_slot(time) {
            return Err(BookingError::UnknownSlot(time.to_string()));
        }
        self.time = Some(time.to_string());
        Ok(())
    }

    /// Moves to the next step. On a failed guard the step is unchanged.
    pub fn advance(&mut self) -> Result<BookingStep, BookingError> {
        let next = match self.step {
            BookingStep::PersonnelSelection => {
                if self.personnel.is_none() {
                    return Err(BookingError::NoPersonnel);
                }
                BookingStep::ServiceSelection
            }
            BookingStep::ServiceSelection => {
                if self.services.is_empty() {
                    return Err(BookingError::NoServices);
                }
                BookingStep::DateTimeSelection
            }
            BookingStep::DateTimeSelection => {
                if self.time.is_none() {
                    return Err(BookingError::NoTimeSlot);
                }
                BookingStep::Summary
            }
            BookingStep::Summary => {
                return Err(BookingError::WrongStep {
                    expected: BookingStep::DateTimeSelection,
                    actual: BookingStep::Summary,
                })
            }
        };
        self.step = next;
        Ok(next)
    }

    /// Steps back. Returns `false` on the first step, where the caller leaves the flow.
    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> Result<BookingSummary, BookingError> {
        self.expect_step(BookingStep::Summary)?;
        let personnel = self.personnel.as_ref().ok_or(BookingError::NoPersonnel)?;
        let time = self.time.clone().ok_or(BookingError::NoTimeSlot)?;
        Ok(BookingSummary {
            personnel_id: personnel.id.clone(),
            personnel_name: personnel.full_name(),
            services: self.services.clone(),
            date: self.date,
            time,
            totals: catalog::totals(&self.services),
        })
    }

    pub fn confirm(&self, salon_id: &str, customer: &Customer) -> Result<NewAppointment, BookingError> {
        let summary = self.summary()?;
        Ok(NewAppointment {
            salon_id: salon_id.to_string(),
            user_id: customer.user_id.clone(),
            user_name: customer.name.clone(),
            user_phone: customer.phone.clone(),
            personnel_id: summary.personnel_id,
            personnel_name: summary.personnel_name,
            services: summary.services,
            date: summary.date.format("%Y-%m-%d").to_string(),
            time: summary.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn stylist() -> Personnel {
        Personnel {
            id: "p1".into(),
            salon_id: "tasarimhane".into(),
            name: "İsmet".into(),
            surname: "Yiğit".into(),
            phone: "+905551000003".into(),
            role: "Kuaför".into(),
            image: None,
            services: vec!["Saç Kesimi".into(), "Saç Boyama".into()],
            working_hours: "10:00 - 22:00".into(),
            day_off: "Salı".into(),
            about: String::new(),
            created_at: String::new(),
            updated_at: None,
        }
    }

    #[test]
    fn empty_service_selection_blocks_advance() {
        let mut flow = BookingFlow::new(today());
        flow.select_personnel(stylist()).unwrap();
        assert_eq!(flow.advance(), Err(BookingError::NoServices));
        assert_eq!(flow.step(), BookingStep::ServiceSelection);
    }

    #[test]
    fn missing_time_blocks_advance() {
        let mut flow = BookingFlow::new(today());
        flow.select_personnel(stylist()).unwrap();
        flow.toggle_service("Saç Kesimi").unwrap();
        flow.advance().unwrap();
        assert_eq!(flow.advance(), Err(BookingError::NoTimeSlot));
        assert_eq!(flow.step(), BookingStep::DateTimeSelection);
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut flow = BookingFlow::new(today());
        flow.select_personnel(stylist()).unwrap();
        assert_eq!(flow.toggle_service("Saç Boyama"), Ok(true));
        assert_eq!(flow.toggle_service("Saç Boyama"), Ok(false));
        assert!(flow.selected_services().is_empty());
        assert_eq!(
            flow.toggle_service("Manikür"),
            Err(BookingError::ServiceNotOffered("Manikür".into()))
        );
    }

    #[test]
    fn no_skipping_ahead() {
        let mut flow = BookingFlow::new(today());
        assert!(matches!(
            flow.select_time("10:00"),
            Err(BookingError::WrongStep { .. })
        ));
        assert_eq!(flow.advance(), Err(BookingError::NoPersonnel));
        assert!(flow.confirm("s", &Customer::guest()).is_err());
    }

    #[test]
    fn back_returns_through_every_step_and_reselect_clears_services() {
        let mut flow = BookingFlow::replay(
            today(),
            stylist(),
            &["Saç Kesimi".to_string()],
            today(),
            "10:30",
        )
        .unwrap();
        assert_eq!(flow.step(), BookingStep::Summary);
        assert!(flow.back());
        assert!(flow.back());
        assert!(flow.back());
        assert_eq!(flow.step(), BookingStep::PersonnelSelection);
        assert!(!flow.back());

        flow.select_personnel(stylist()).unwrap();
        assert!(flow.selected_services().is_empty());
        assert_eq!(flow.selected_time(), Some("10:30"));
    }

    #[test]
    fn past_dates_and_off_grid_times_are_rejected() {
        let yesterday = today().pred_opt().unwrap();
        let err = BookingFlow::replay(
            today(),
            stylist(),
            &["Saç Kesimi".to_string()],
            yesterday,
            "10:00",
        )
        .unwrap_err();
        assert_eq!(err, BookingError::PastDate(yesterday));

        let err = BookingFlow::replay(
            today(),
            stylist(),
            &["Saç Kesimi".to_string()],
            today(),
            "10:15",
        )
        .unwrap_err();
        assert_eq!(err, BookingError::UnknownSlot("10:15".into()));
    }

    #[test]
    fn confirm_copies_names_for_display() {
        let flow = BookingFlow::replay(
            today(),
            stylist(),
            &["Saç Kesimi".to_string(), "Saç Boyama".to_string()],
            NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            "21:30",
        )
        .unwrap();
        let summary = flow.summary().unwrap();
        assert_eq!(summary.totals.price, 1950);
        assert_eq!(summary.totals.duration_minutes, 90);

        let draft = flow.confirm("tasarimhane", &Customer::guest()).unwrap();
        assert_eq!(draft.personnel_name, "İsmet Yiğit");
        assert_eq!(draft.user_name, "Misafir");
        assert_eq!(draft.user_id, None);
        assert_eq!(draft.date, "2024-06-20");
        assert_eq!(draft.services, vec!["Saç Kesimi", "Saç Boyama"]);
    }
}

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;

pub const OPENING: (u32, u32) = (10, 0);
pub const LAST_SLOT: (u32, u32) = (21, 30);
pub const SLOT_MINUTES: i64 = 30;

pub const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

pub const WEEKDAY_HEADER_TR: [&str; 7] = ["Pt", "Sa", "Ça", "Pe", "Cu", "Ct", "Pz"];

/// `HH:MM` slots from `start` through `end` inclusive.
pub fn time_slots(start: NaiveTime, end: NaiveTime, step_minutes: i64) -> Vec<String> {
    let mut slots = Vec::new();
    if step_minutes <= 0 {
        return slots;
    }
    let step = Duration::minutes(step_minutes);
    let mut current = start;
    while current <= end {
        slots.push(current.format("%H:%M").to_string());
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    slots
}

pub fn default_time_slots() -> Vec<String> {
    match (
        NaiveTime::from_hms_opt(OPENING.0, OPENING.1, 0),
        NaiveTime::from_hms_opt(LAST_SLOT.0, LAST_SLOT.1, 0),
    ) {
        (Some(start), Some(end)) => time_slots(start, end, SLOT_MINUTES),
        _ => Vec::new(),
    }
}

pub fn is_offered_slot(time: &str) -> bool {
    default_time_slots().iter().any(|slot| slot == time)
}

/// Days before `today` cannot be picked. No other rule applies.
pub fn is_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub disabled: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub weekdays: [&'static str; 7],
    /// Monday-first grid; `None` pads the first week.
    pub cells: Vec<Option<DayCell>>,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(self) -> u32 {
        let next = self.next();
        match (self.first_day(), next.first_day()) {
            (Some(first), Some(following)) => (following - first).num_days() as u32,
            _ => 0,
        }
    }

    /// Number of empty cells before the 1st in a Monday-first week.
    pub fn leading_blanks(self) -> usize {
        self.first_day()
            .map(|first| first.weekday().num_days_from_monday() as usize)
            .unwrap_or(0)
    }

    pub fn title(self) -> String {
        let name = MONTHS_TR
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or_default();
        format!("{name} {}", self.year)
    }

    pub fn view(self, today: NaiveDate) -> CalendarView {
        let mut cells: Vec<Option<DayCell>> = vec![None; self.leading_blanks()];
        for day in 1..=self.days_in_month() {
            let Some(date) = NaiveDate::from_ymd_opt(self.year, self.month, day) else {
                continue;
            };
            cells.push(Some(DayCell {
                date,
                day,
                disabled: !is_selectable(date, today),
                is_today: date == today,
            }));
        }
        CalendarView {
            year: self.year,
            month: self.month,
            title: self.title(),
            weekdays: WEEKDAY_HEADER_TR,
            cells,
        }
    }
}

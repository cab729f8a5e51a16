use serde::Serialize;
use uuid::Uuid;

use crate::models::{ROLE_CUSTOMER, ROLE_EMPLOYEE, ROLE_OWNER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Principal {
    Customer { user_id: String },
    Owner { salon_id: String },
    Employee { personnel_id: String },
}

impl Principal {
    pub fn kind(&self) -> &'static str {
        match self {
            Principal::Customer { .. } => ROLE_CUSTOMER,
            Principal::Owner { .. } => ROLE_OWNER,
            Principal::Employee { .. } => ROLE_EMPLOYEE,
        }
    }

    pub fn subject_id(&self) -> &str {
        match self {
            Principal::Customer { user_id } => user_id,
            Principal::Owner { salon_id } => salon_id,
            Principal::Employee { personnel_id } => personnel_id,
        }
    }

    pub fn from_parts(kind: &str, subject_id: String) -> Option<Self> {
        match kind {
            ROLE_CUSTOMER => Some(Principal::Customer {
                user_id: subject_id,
            }),
            ROLE_OWNER => Some(Principal::Owner {
                salon_id: subject_id,
            }),
            ROLE_EMPLOYEE => Some(Principal::Employee {
                personnel_id: subject_id,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub principal: Principal,
    pub created_at: String,
}

pub fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

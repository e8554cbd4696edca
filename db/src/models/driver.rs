use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Driver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub license_number: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// Driver row joined with the names on its user account.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DriverProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub driver: Driver,
    pub username: String,
    pub user_first_name: String,
    pub user_last_name: String,
}

impl DriverProfile {
    /// Name from the user account, or "Unknown Driver" when the account has none.
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.user_first_name, self.user_last_name)
            .trim()
            .to_string();
        if name.is_empty() {
            "Unknown Driver".to_string()
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: &str, last: &str) -> DriverProfile {
        DriverProfile {
            driver: Driver {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                first_name: "Row".to_string(),
                last_name: "Name".to_string(),
                phone_number: "555-0000".to_string(),
                license_number: "DL123456".to_string(),
                active: true,
                created_at: chrono::Utc::now().naive_utc(),
            },
            username: "testdriver".to_string(),
            user_first_name: first.to_string(),
            user_last_name: last.to_string(),
        }
    }

    #[test]
    fn full_name_comes_from_the_user_account() {
        assert_eq!(profile("Test", "Driver").full_name(), "Test Driver");
        assert_eq!(profile("Solo", "").full_name(), "Solo");
        assert_eq!(profile("", "").full_name(), "Unknown Driver");
    }
}

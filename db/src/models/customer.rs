use chrono::NaiveDateTime;
use common::misc::Country;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone_number: String,
    pub address_unit: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    #[sqlx(try_from = "String")]
    pub address_country: Country,
    pub company_name: Option<String>,
    pub is_business: bool,
    pub preferred_pickup_address: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl Customer {
    /// Structured address joined into one line:
    /// `Unit 4, 123 Main St, Toronto, ON, M5V 3L9, Canada`. Blank parts are skipped.
    pub fn full_address(&self) -> String {
        let unit = self
            .address_unit
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(|u| format!("Unit {}", u.trim()));

        unit.into_iter()
            .chain(
                [
                    &self.address_street,
                    &self.address_city,
                    &self.address_state,
                    &self.address_postal_code,
                ]
                .into_iter()
                .filter_map(|part| part.as_deref())
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string),
            )
            .chain(std::iter::once(self.address_country.name().to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Preferred pickup address, if one is set and not blank.
    pub fn preferred_pickup(&self) -> Option<&str> {
        self.preferred_pickup_address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
    }
}

/// Customer row joined with its user account.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CustomerProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl CustomerProfile {
    /// Company name for business customers, else the person's name, else the username.
    pub fn display_name(&self) -> String {
        if self.customer.is_business {
            if let Some(company) = self
                .customer
                .company_name
                .as_deref()
                .filter(|c| !c.trim().is_empty())
            {
                return company.to_string();
            }
        }
        let full_name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            phone_number: "555-1111".to_string(),
            address_unit: None,
            address_street: Some("123 Customer St".to_string()),
            address_city: Some("Test City".to_string()),
            address_state: Some("Test State".to_string()),
            address_postal_code: Some("12345".to_string()),
            address_country: Country::Us,
            company_name: None,
            is_business: false,
            preferred_pickup_address: None,
            active: true,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn profile(customer: Customer) -> CustomerProfile {
        CustomerProfile {
            customer,
            username: "customer1".to_string(),
            email: "c1@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn full_address_joins_present_parts() {
        assert_eq!(
            customer().full_address(),
            "123 Customer St, Test City, Test State, 12345, United States"
        );
    }

    #[test]
    fn full_address_includes_unit_and_skips_blanks() {
        let mut c = customer();
        c.address_unit = Some("4B".to_string());
        c.address_state = Some("  ".to_string());
        c.address_country = Country::Ca;
        assert_eq!(
            c.full_address(),
            "Unit 4B, 123 Customer St, Test City, 12345, Canada"
        );
    }

    #[test]
    fn display_name_prefers_company_for_businesses() {
        let mut c = customer();
        c.company_name = Some("Acme Movers".to_string());
        assert_eq!(profile(c.clone()).display_name(), "customer1");

        c.is_business = true;
        assert_eq!(profile(c).display_name(), "Acme Movers");

        let mut p = profile(customer());
        p.first_name = "Jane".to_string();
        p.last_name = "Doe".to_string();
        assert_eq!(p.display_name(), "Jane Doe");
    }

    #[test]
    fn blank_preferred_pickup_is_ignored() {
        let mut c = customer();
        c.preferred_pickup_address = Some("   ".to_string());
        assert_eq!(c.preferred_pickup(), None);
        c.preferred_pickup_address = Some("1 Dock Rd".to_string());
        assert_eq!(c.preferred_pickup(), Some("1 Dock Rd"));
    }
}

use common::error::{AppError, Res};
use common::jwt::JwtClaims;
use db::models::{customer::Customer, delivery::DeliveryStatus};
use sqlx::PgPool;
use uuid::Uuid;

/// Which deliveries a caller may touch.
#[derive(Debug, Clone)]
pub enum Scope {
    Staff,
    Customer(Customer),
}

impl Scope {
    /// Staff see everything; other callers need a customer profile.
    pub async fn of(pool: &PgPool, claims: &JwtClaims) -> Res<Self> {
        if claims.is_staff {
            return Ok(Scope::Staff);
        }
        match db::customer::find_customer_by_user(pool, claims.user_id).await? {
            Some(customer) => Ok(Scope::Customer(customer)),
            None => Err(AppError::Forbidden(
                "Only customers and staff can access deliveries".to_string(),
            )),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Scope::Staff)
    }

    /// Customer id to filter lists by, `None` for staff.
    pub fn customer_filter(&self) -> Option<Uuid> {
        match self {
            Scope::Staff => None,
            Scope::Customer(customer) => Some(customer.id),
        }
    }

    pub fn owns(&self, customer_id: Uuid) -> bool {
        match self {
            Scope::Staff => true,
            Scope::Customer(customer) => customer.id == customer_id,
        }
    }

    /// Customers may keep a status or cancel; any other move is staff work.
    pub fn authorize_status_change(
        &self,
        current: DeliveryStatus,
        requested: DeliveryStatus,
    ) -> Res<()> {
        match self {
            Scope::Customer(_)
                if requested != current && requested != DeliveryStatus::Cancelled =>
            {
                Err(AppError::Forbidden(
                    "Customers can only cancel deliveries".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Whether the caller may read or edit the customer profile owned by `owner_user_id`.
pub fn can_access_profile(claims: &JwtClaims, owner_user_id: Uuid) -> bool {
    claims.is_staff || claims.user_id == owner_user_id
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use common::jwt::TokenType;
    use common::misc::Country;

    use super::*;

    fn claims(user_id: Uuid, is_staff: bool) -> JwtClaims {
        JwtClaims {
            user_id,
            is_staff,
            token_type: TokenType::Access,
            jti: Uuid::new_v4(),
            iat: 0,
            exp: 0,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            phone_number: "555-1234".to_string(),
            address_unit: None,
            address_street: None,
            address_city: None,
            address_state: None,
            address_postal_code: None,
            address_country: Country::Us,
            company_name: None,
            is_business: false,
            preferred_pickup_address: None,
            active: true,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn customers_only_own_their_deliveries() {
        let customer = customer();
        let own_id = customer.id;
        let scope = Scope::Customer(customer);

        assert!(scope.owns(own_id));
        assert!(!scope.owns(Uuid::new_v4()));
        assert_eq!(scope.customer_filter(), Some(own_id));
        assert!(!scope.is_staff());
    }

    #[test]
    fn customers_may_only_cancel() {
        let scope = Scope::Customer(customer());
        assert!(
            scope
                .authorize_status_change(DeliveryStatus::Pending, DeliveryStatus::Cancelled)
                .is_ok()
        );
        assert!(
            scope
                .authorize_status_change(DeliveryStatus::EnRoute, DeliveryStatus::EnRoute)
                .is_ok()
        );
        assert!(matches!(
            scope.authorize_status_change(DeliveryStatus::Pending, DeliveryStatus::EnRoute),
            Err(AppError::Forbidden(_))
        ));
        assert!(
            Scope::Staff
                .authorize_status_change(DeliveryStatus::Pending, DeliveryStatus::EnRoute)
                .is_ok()
        );
    }

    #[test]
    fn staff_own_everything() {
        assert!(Scope::Staff.owns(Uuid::new_v4()));
        assert_eq!(Scope::Staff.customer_filter(), None);
    }

    #[test]
    fn profiles_are_visible_to_owner_and_staff() {
        let owner = Uuid::new_v4();
        assert!(can_access_profile(&claims(owner, false), owner));
        assert!(can_access_profile(&claims(Uuid::new_v4(), true), owner));
        assert!(!can_access_profile(&claims(Uuid::new_v4(), false), owner));
    }
}

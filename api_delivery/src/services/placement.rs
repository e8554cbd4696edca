//! Pure delivery rules applied on every save: draft building, pickup/dropoff
//! derivation from the customer profile, required fields and status lifecycle.

use common::error::{FieldErrors, Res};
use common::misc::non_blank;
use db::{
    dtos::delivery::DeliveryFields,
    models::{
        customer::Customer,
        delivery::{Delivery, DeliveryStatus},
    },
};
use rust_decimal::RoundingStrategy;
use uuid::Uuid;

use crate::dtos::delivery::DeliveryRequest;

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Fields for a new delivery owned by `customer_id`.
pub fn draft_new(req: DeliveryRequest, customer_id: Uuid) -> DeliveryFields {
    DeliveryFields {
        customer_id,
        pickup_location: text(req.pickup_location),
        dropoff_location: text(req.dropoff_location),
        same_pickup_as_customer: req.same_pickup_as_customer.unwrap_or(false),
        use_preferred_pickup: req.use_preferred_pickup.unwrap_or(false),
        same_dropoff_as_customer: req.same_dropoff_as_customer.unwrap_or(false),
        item_description: text(req.item_description),
        status: req.status.unwrap_or_default(),
        delivery_date: req.delivery_date,
        delivery_time: req.delivery_time,
        special_instructions: non_blank(req.special_instructions.as_deref()).map(str::to_string),
        estimated_cost: req.estimated_cost,
    }
}

/// Stored delivery with the supplied fields laid over it.
pub fn draft_update(req: DeliveryRequest, current: &Delivery) -> DeliveryFields {
    let keep = |value: Option<String>, stored: &str| match value {
        Some(v) => v.trim().to_string(),
        None => stored.to_string(),
    };
    DeliveryFields {
        customer_id: req.customer_id.unwrap_or(current.customer_id),
        pickup_location: keep(req.pickup_location, &current.pickup_location),
        dropoff_location: keep(req.dropoff_location, &current.dropoff_location),
        same_pickup_as_customer: req
            .same_pickup_as_customer
            .unwrap_or(current.same_pickup_as_customer),
        use_preferred_pickup: req.use_preferred_pickup.unwrap_or(current.use_preferred_pickup),
        same_dropoff_as_customer: req
            .same_dropoff_as_customer
            .unwrap_or(current.same_dropoff_as_customer),
        item_description: keep(req.item_description, &current.item_description),
        status: req.status.unwrap_or(current.status),
        delivery_date: req.delivery_date.or(current.delivery_date),
        delivery_time: req.delivery_time.or(current.delivery_time),
        special_instructions: match req.special_instructions {
            Some(v) => non_blank(Some(&v)).map(str::to_string),
            None => current.special_instructions.clone(),
        },
        estimated_cost: req.estimated_cost.or(current.estimated_cost),
    }
}

/// Overwrites pickup and dropoff from the customer's profile when the
/// corresponding flag is set. `same_pickup_as_customer` wins over
/// `use_preferred_pickup`; a blank preferred address leaves pickup untouched.
pub fn apply_customer_locations(fields: &mut DeliveryFields, customer: &Customer) {
    if fields.same_pickup_as_customer {
        fields.pickup_location = customer.full_address();
    } else if fields.use_preferred_pickup {
        if let Some(preferred) = customer.preferred_pickup() {
            fields.pickup_location = preferred.trim().to_string();
        }
    }

    if fields.same_dropoff_as_customer {
        fields.dropoff_location = customer.full_address();
    }
}

/// Checks the derived fields and the status change from `previous`, if any.
/// The estimated cost is rounded to cents.
pub fn validate(fields: &mut DeliveryFields, previous: Option<DeliveryStatus>) -> Res<()> {
    let mut errors = FieldErrors::new();
    errors.require("pickup_location", Some(&fields.pickup_location));
    errors.require("dropoff_location", Some(&fields.dropoff_location));
    errors.require("item_description", Some(&fields.item_description));

    if let Some(cost) = fields.estimated_cost {
        if cost.is_sign_negative() {
            errors.add("estimated_cost", "Ensure this value is greater than or equal to 0.");
        } else {
            fields.estimated_cost =
                Some(cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero));
        }
    }

    if let Some(previous) = previous {
        if !previous.can_transition_to(fields.status) {
            errors.add(
                "status",
                format!(
                    "Cannot change status from {} to {}.",
                    previous.as_str(),
                    fields.status.as_str()
                ),
            );
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use common::error::AppError;
    use common::misc::Country;
    use rust_decimal::Decimal;

    use super::*;

    fn customer() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            phone_number: "555-1234".to_string(),
            address_unit: None,
            address_street: Some("123 Customer St".to_string()),
            address_city: Some("Test City".to_string()),
            address_state: Some("Test State".to_string()),
            address_postal_code: Some("12345".to_string()),
            address_country: Country::Us,
            company_name: None,
            is_business: false,
            preferred_pickup_address: Some("77 Warehouse Way".to_string()),
            active: true,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn request(pickup: &str, dropoff: &str) -> DeliveryRequest {
        DeliveryRequest {
            pickup_location: Some(pickup.to_string()),
            dropoff_location: Some(dropoff.to_string()),
            item_description: Some("Test package".to_string()),
            ..Default::default()
        }
    }

    fn stored(fields: &DeliveryFields) -> Delivery {
        let now = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Delivery {
            id: Uuid::new_v4(),
            customer_id: fields.customer_id,
            pickup_location: fields.pickup_location.clone(),
            dropoff_location: fields.dropoff_location.clone(),
            same_pickup_as_customer: fields.same_pickup_as_customer,
            use_preferred_pickup: fields.use_preferred_pickup,
            same_dropoff_as_customer: fields.same_dropoff_as_customer,
            item_description: fields.item_description.clone(),
            status: fields.status,
            delivery_date: fields.delivery_date,
            delivery_time: fields.delivery_time,
            special_instructions: fields.special_instructions.clone(),
            estimated_cost: fields.estimated_cost,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn same_pickup_uses_customer_address() {
        let customer = customer();
        let mut req = request("", "321 New End Ave");
        req.same_pickup_as_customer = Some(true);
        let mut fields = draft_new(req, customer.id);

        apply_customer_locations(&mut fields, &customer);
        validate(&mut fields, None).unwrap();

        assert_eq!(
            fields.pickup_location,
            "123 Customer St, Test City, Test State, 12345, United States"
        );
        assert_eq!(fields.dropoff_location, "321 New End Ave");
        assert_eq!(fields.status, DeliveryStatus::Pending);
    }

    #[test]
    fn preferred_pickup_applies_when_set() {
        let customer = customer();
        let mut req = request("1 Somewhere Rd", "321 New End Ave");
        req.use_preferred_pickup = Some(true);
        let mut fields = draft_new(req, customer.id);

        apply_customer_locations(&mut fields, &customer);
        assert_eq!(fields.pickup_location, "77 Warehouse Way");
    }

    #[test]
    fn blank_preferred_pickup_keeps_supplied_pickup() {
        let mut customer = customer();
        customer.preferred_pickup_address = Some(" ".to_string());
        let mut req = request("1 Somewhere Rd", "321 New End Ave");
        req.use_preferred_pickup = Some(true);
        let mut fields = draft_new(req, customer.id);

        apply_customer_locations(&mut fields, &customer);
        assert_eq!(fields.pickup_location, "1 Somewhere Rd");
    }

    #[test]
    fn same_pickup_wins_over_preferred() {
        let customer = customer();
        let mut req = request("", "");
        req.same_pickup_as_customer = Some(true);
        req.use_preferred_pickup = Some(true);
        req.same_dropoff_as_customer = Some(true);
        let mut fields = draft_new(req, customer.id);

        apply_customer_locations(&mut fields, &customer);
        assert_eq!(fields.pickup_location, customer.full_address());
        assert_eq!(fields.dropoff_location, customer.full_address());
    }

    #[test]
    fn flags_are_reapplied_on_update() {
        let mut customer = customer();
        let mut req = request("", "321 New End Ave");
        req.same_pickup_as_customer = Some(true);
        let mut fields = draft_new(req, customer.id);
        apply_customer_locations(&mut fields, &customer);
        let current = stored(&fields);

        customer.address_street = Some("500 Moved Blvd".to_string());
        let mut updated = draft_update(
            DeliveryRequest {
                pickup_location: Some("ignored".to_string()),
                ..Default::default()
            },
            &current,
        );
        apply_customer_locations(&mut updated, &customer);

        assert!(updated.pickup_location.starts_with("500 Moved Blvd"));
        assert_eq!(updated.item_description, "Test package");
    }

    #[test]
    fn missing_locations_and_description_are_rejected() {
        let mut fields = draft_new(DeliveryRequest::default(), Uuid::new_v4());
        match validate(&mut fields, None) {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains("pickup_location"));
                assert!(errors.contains("dropoff_location"));
                assert!(errors.contains("item_description"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn status_changes_follow_the_lifecycle() {
        let mut fields = draft_new(request("a", "b"), Uuid::new_v4());
        fields.status = DeliveryStatus::EnRoute;
        assert!(validate(&mut fields, Some(DeliveryStatus::Pending)).is_ok());

        fields.status = DeliveryStatus::Pending;
        match validate(&mut fields, Some(DeliveryStatus::Completed)) {
            Err(AppError::Validation(errors)) => assert!(errors.contains("status")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn cost_is_rounded_and_must_not_be_negative() {
        let mut fields = draft_new(request("a", "b"), Uuid::new_v4());
        fields.estimated_cost = Some(Decimal::new(12345, 3));
        validate(&mut fields, None).unwrap();
        assert_eq!(fields.estimated_cost, Some(Decimal::new(1235, 2)));

        fields.estimated_cost = Some(Decimal::new(-100, 2));
        assert!(validate(&mut fields, None).is_err());
    }
}

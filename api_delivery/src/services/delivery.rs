use common::error::{AppError, Res};
use common::http::{Page, PageQuery};
use common::jwt::JwtClaims;
use db::models::customer::Customer;
use db::models::delivery::Delivery;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::delivery::DeliveryRequest;
use crate::services::access::Scope;
use crate::services::placement;

pub async fn list_deliveries(
    pool: &PgPool,
    claims: &JwtClaims,
    query: PageQuery,
) -> Res<Page<Delivery>> {
    query.validate()?;
    let scope = Scope::of(pool, claims).await?;
    let customer_id = scope.customer_filter();
    let count = db::delivery::count_deliveries(pool, customer_id).await?;
    let deliveries =
        db::delivery::list_deliveries(pool, customer_id, query.limit(), query.offset()).await?;
    Page::new(query, count, deliveries)
}

/// Delivery within the caller's scope. Deliveries of other customers are reported as missing.
async fn scoped_delivery(pool: &PgPool, scope: &Scope, delivery_id: Uuid) -> Res<Delivery> {
    let delivery = db::delivery::get_delivery_by_id(pool, delivery_id)
        .await
        .map_err(|e| e.not_found_as("Delivery"))?;
    if !scope.owns(delivery.customer_id) {
        return Err(AppError::NotFound("Delivery not found".to_string()));
    }
    Ok(delivery)
}

pub async fn get_delivery(pool: &PgPool, claims: &JwtClaims, delivery_id: Uuid) -> Res<Delivery> {
    let scope = Scope::of(pool, claims).await?;
    scoped_delivery(pool, &scope, delivery_id).await
}

/// Customer named by staff in a request body. A missing one is a `customer_id` field error.
async fn customer_for_staff(pool: &PgPool, customer_id: Uuid) -> Res<Customer> {
    db::customer::get_customer_by_id(pool, customer_id)
        .await
        .map_err(|e| match e.not_found_as("Customer") {
            AppError::NotFound(message) => AppError::field("customer_id", message),
            other => other,
        })
}

/// Staff name the customer in the body; customers always create for themselves.
pub async fn create_delivery(
    pool: &PgPool,
    claims: &JwtClaims,
    req: DeliveryRequest,
) -> Res<Delivery> {
    let scope = Scope::of(pool, claims).await?;
    let customer = match &scope {
        Scope::Customer(customer) => customer.clone(),
        Scope::Staff => {
            let customer_id = req
                .customer_id
                .ok_or_else(|| AppError::field("customer_id", "This field is required."))?;
            customer_for_staff(pool, customer_id).await?
        }
    };

    let mut req = req;
    if !scope.is_staff() {
        req.status = None;
    }
    let mut fields = placement::draft_new(req, customer.id);
    placement::apply_customer_locations(&mut fields, &customer);
    placement::validate(&mut fields, None)?;

    let delivery = db::delivery::insert_delivery(pool, &fields).await?;
    log::info!("Delivery {} created for customer {}", delivery.id, customer.id);
    Ok(delivery)
}

/// Customer-facing request form: always a new `Pending` delivery for the caller's own profile.
pub async fn request_delivery(
    pool: &PgPool,
    claims: &JwtClaims,
    req: DeliveryRequest,
) -> Res<Delivery> {
    let customer = db::customer::find_customer_by_user(pool, claims.user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Only customers can request deliveries".to_string()))?;

    let req = DeliveryRequest {
        customer_id: None,
        status: None,
        estimated_cost: None,
        ..req
    };
    let mut fields = placement::draft_new(req, customer.id);
    placement::apply_customer_locations(&mut fields, &customer);
    placement::validate(&mut fields, None)?;

    let delivery = db::delivery::insert_delivery(pool, &fields).await?;
    log::info!("Delivery {} requested by customer {}", delivery.id, customer.id);
    Ok(delivery)
}

/// Customers may edit their own deliveries and cancel them; only staff move them
/// along the lifecycle or reassign them to another customer.
pub async fn update_delivery(
    pool: &PgPool,
    claims: &JwtClaims,
    delivery_id: Uuid,
    req: DeliveryRequest,
) -> Res<Delivery> {
    let scope = Scope::of(pool, claims).await?;
    let current = scoped_delivery(pool, &scope, delivery_id).await?;

    let mut req = req;
    if let Some(status) = req.status {
        scope.authorize_status_change(current.status, status)?;
    }
    if !scope.is_staff() {
        req.customer_id = None;
    }

    let mut fields = placement::draft_update(req, &current);
    let customer = match &scope {
        Scope::Customer(customer) => customer.clone(),
        Scope::Staff => customer_for_staff(pool, fields.customer_id).await?,
    };
    placement::apply_customer_locations(&mut fields, &customer);
    placement::validate(&mut fields, Some(current.status))?;

    let delivery = db::delivery::update_delivery(pool, delivery_id, &fields).await?;
    if delivery.status != current.status {
        log::info!(
            "Delivery {} moved from {} to {}",
            delivery.id,
            current.status.as_str(),
            delivery.status.as_str()
        );
    }
    Ok(delivery)
}

pub async fn delete_delivery(pool: &PgPool, claims: &JwtClaims, delivery_id: Uuid) -> Res<()> {
    let scope = Scope::of(pool, claims).await?;
    scoped_delivery(pool, &scope, delivery_id).await?;
    db::delivery::delete_delivery(pool, delivery_id).await?;
    log::info!("Delivery {} deleted by {}", delivery_id, claims.user_id);
    Ok(())
}

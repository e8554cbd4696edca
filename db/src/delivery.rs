use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::{delivery::DeliveryFields, fleet::AssignmentFields},
    models::delivery::{Delivery, DeliveryAssignment},
};

pub async fn insert_delivery<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &DeliveryFields,
) -> Res<Delivery> {
    sqlx::query_as::<_, Delivery>(
        r#"
        INSERT INTO deliveries (
            customer_id, pickup_location, dropoff_location, same_pickup_as_customer,
            use_preferred_pickup, same_dropoff_as_customer, item_description, status,
            delivery_date, delivery_time, special_instructions, estimated_cost
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(data.customer_id)
    .bind(&data.pickup_location)
    .bind(&data.dropoff_location)
    .bind(data.same_pickup_as_customer)
    .bind(data.use_preferred_pickup)
    .bind(data.same_dropoff_as_customer)
    .bind(&data.item_description)
    .bind(data.status.as_str())
    .bind(data.delivery_date)
    .bind(data.delivery_time)
    .bind(&data.special_instructions)
    .bind(data.estimated_cost)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_delivery_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    delivery_id: Uuid,
) -> Res<Delivery> {
    sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
        .bind(delivery_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Counts deliveries, restricted to one customer when `customer_id` is set.
pub async fn count_deliveries<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_id: Option<Uuid>,
) -> Res<i64> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM deliveries WHERE ($1::uuid IS NULL OR customer_id = $1)",
    )
    .bind(customer_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_deliveries<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Res<Vec<Delivery>> {
    sqlx::query_as::<_, Delivery>(
        r#"
        SELECT * FROM deliveries
        WHERE ($1::uuid IS NULL OR customer_id = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(customer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_delivery<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    delivery_id: Uuid,
    data: &DeliveryFields,
) -> Res<Delivery> {
    sqlx::query_as::<_, Delivery>(
        r#"
        UPDATE deliveries SET
            customer_id = $2, pickup_location = $3, dropoff_location = $4,
            same_pickup_as_customer = $5, use_preferred_pickup = $6, same_dropoff_as_customer = $7,
            item_description = $8, status = $9, delivery_date = $10, delivery_time = $11,
            special_instructions = $12, estimated_cost = $13, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(delivery_id)
    .bind(data.customer_id)
    .bind(&data.pickup_location)
    .bind(&data.dropoff_location)
    .bind(data.same_pickup_as_customer)
    .bind(data.use_preferred_pickup)
    .bind(data.same_dropoff_as_customer)
    .bind(&data.item_description)
    .bind(data.status.as_str())
    .bind(data.delivery_date)
    .bind(data.delivery_time)
    .bind(&data.special_instructions)
    .bind(data.estimated_cost)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_delivery<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    delivery_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM deliveries WHERE id = $1")
        .bind(delivery_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

pub async fn insert_assignment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: &AssignmentFields,
) -> Res<DeliveryAssignment> {
    sqlx::query_as::<_, DeliveryAssignment>(
        r#"
        INSERT INTO delivery_assignments (delivery_id, driver_id, vehicle_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(data.delivery_id)
    .bind(data.driver_id)
    .bind(data.vehicle_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_assignment_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    assignment_id: Uuid,
) -> Res<DeliveryAssignment> {
    sqlx::query_as::<_, DeliveryAssignment>("SELECT * FROM delivery_assignments WHERE id = $1")
        .bind(assignment_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn count_assignments<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM delivery_assignments")
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_assignments<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<DeliveryAssignment>> {
    sqlx::query_as::<_, DeliveryAssignment>(
        "SELECT * FROM delivery_assignments ORDER BY assigned_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_assignment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    assignment_id: Uuid,
    data: &AssignmentFields,
) -> Res<DeliveryAssignment> {
    sqlx::query_as::<_, DeliveryAssignment>(
        r#"
        UPDATE delivery_assignments SET delivery_id = $2, driver_id = $3, vehicle_id = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(assignment_id)
    .bind(data.delivery_id)
    .bind(data.driver_id)
    .bind(data.vehicle_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_assignment<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    assignment_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM delivery_assignments WHERE id = $1")
        .bind(assignment_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

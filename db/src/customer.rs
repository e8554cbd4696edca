use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::customer::CustomerFields,
    models::customer::{Customer, CustomerProfile},
};

const PROFILE_SELECT: &str = r#"
    SELECT c.*, u.username, u.email, u.first_name, u.last_name
    FROM customers c
    JOIN users u ON u.id = c.user_id
"#;

pub async fn insert_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    data: &CustomerFields,
) -> Res<Customer> {
    sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (
            user_id, phone_number, address_unit, address_street, address_city, address_state,
            address_postal_code, address_country, company_name, is_business,
            preferred_pickup_address, active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&data.phone_number)
    .bind(&data.address_unit)
    .bind(&data.address_street)
    .bind(&data.address_city)
    .bind(&data.address_state)
    .bind(&data.address_postal_code)
    .bind(data.address_country.code())
    .bind(&data.company_name)
    .bind(data.is_business)
    .bind(&data.preferred_pickup_address)
    .bind(data.active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_customer_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_id: Uuid,
) -> Res<Customer> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
        .bind(customer_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn find_customer_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<Customer>> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_profile_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_id: Uuid,
) -> Res<CustomerProfile> {
    sqlx::query_as::<_, CustomerProfile>(&format!("{PROFILE_SELECT} WHERE c.id = $1"))
        .bind(customer_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_profile_by_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<CustomerProfile> {
    sqlx::query_as::<_, CustomerProfile>(&format!("{PROFILE_SELECT} WHERE c.user_id = $1"))
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Counts customers, restricted to one user's profile when `user_id` is set.
pub async fn count_customers<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Option<Uuid>,
) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE ($1::uuid IS NULL OR user_id = $1)")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_profiles<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Res<Vec<CustomerProfile>> {
    sqlx::query_as::<_, CustomerProfile>(&format!(
        "{PROFILE_SELECT} WHERE ($1::uuid IS NULL OR c.user_id = $1)
         ORDER BY c.created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_id: Uuid,
    data: &CustomerFields,
) -> Res<Customer> {
    sqlx::query_as::<_, Customer>(
        r#"
        UPDATE customers SET
            phone_number = $2, address_unit = $3, address_street = $4, address_city = $5,
            address_state = $6, address_postal_code = $7, address_country = $8,
            company_name = $9, is_business = $10, preferred_pickup_address = $11, active = $12
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(customer_id)
    .bind(&data.phone_number)
    .bind(&data.address_unit)
    .bind(&data.address_street)
    .bind(&data.address_city)
    .bind(&data.address_state)
    .bind(&data.address_postal_code)
    .bind(data.address_country.code())
    .bind(&data.company_name)
    .bind(data.is_business)
    .bind(&data.preferred_pickup_address)
    .bind(data.active)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Returns the number of rows removed.
pub async fn delete_customer<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(customer_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::address::{AddressResult, LogCreateRequest, StatusCounts},
    models::address::{AddressValidationLog, ValidatedAddress},
};

/// Creates the row a validation run reports into, in `pending` state.
pub async fn insert_pending_address<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    original_address: &str,
    country: &str,
    validated_by: Option<Uuid>,
) -> Res<ValidatedAddress> {
    sqlx::query_as::<_, ValidatedAddress>(
        r#"
        INSERT INTO validated_addresses (original_address, country, validation_status, validated_by)
        VALUES ($1, $2, 'pending', $3)
        RETURNING *
        "#,
    )
    .bind(original_address)
    .bind(country)
    .bind(validated_by)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_address_result<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Uuid,
    data: &AddressResult,
) -> Res<ValidatedAddress> {
    sqlx::query_as::<_, ValidatedAddress>(
        r#"
        UPDATE validated_addresses SET
            unit = $2, street_number = $3, street_name = $4, street_type = $5, city = $6,
            state_province = $7, postal_code = $8, country = $9, normalized_address = $10,
            validation_status = $11, validation_source = $12, confidence_score = $13,
            latitude = $14, longitude = $15, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(address_id)
    .bind(&data.unit)
    .bind(&data.street_number)
    .bind(&data.street_name)
    .bind(&data.street_type)
    .bind(&data.city)
    .bind(&data.state_province)
    .bind(&data.postal_code)
    .bind(&data.country)
    .bind(&data.normalized_address)
    .bind(data.validation_status.as_str())
    .bind(data.validation_source.as_str())
    .bind(data.confidence_score)
    .bind(data.latitude)
    .bind(data.longitude)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn mark_address_invalid<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Uuid,
) -> Res<ValidatedAddress> {
    sqlx::query_as::<_, ValidatedAddress>(
        r#"
        UPDATE validated_addresses SET validation_status = 'invalid', updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(address_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_address_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Uuid,
) -> Res<ValidatedAddress> {
    sqlx::query_as::<_, ValidatedAddress>("SELECT * FROM validated_addresses WHERE id = $1")
        .bind(address_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn count_addresses<'e, E: Executor<'e, Database = Postgres>>(executor: E) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM validated_addresses")
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_addresses<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Res<Vec<ValidatedAddress>> {
    sqlx::query_as::<_, ValidatedAddress>(
        "SELECT * FROM validated_addresses ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn status_counts<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
) -> Res<StatusCounts> {
    sqlx::query_as::<_, StatusCounts>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE validation_status = 'valid') AS valid,
            COUNT(*) FILTER (WHERE validation_status = 'invalid') AS invalid,
            COUNT(*) FILTER (WHERE validation_status = 'partial') AS partial,
            COUNT(*) FILTER (WHERE validation_status = 'pending') AS pending
        FROM validated_addresses
        "#,
    )
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_validation_log<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    log: LogCreateRequest,
) -> Res<()> {
    sqlx::query(
        "INSERT INTO address_validation_logs (address_id, validation_source, request_data, response_data, success, error_message, processing_time)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(log.address_id)
    .bind(log.validation_source.as_str())
    .bind(log.request_data)
    .bind(log.response_data)
    .bind(log.success)
    .bind(log.error_message)
    .bind(log.processing_time)
    .execute(executor)
    .await
    .map_err(AppError::from)?;

    Ok(())
}

pub async fn get_log_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    log_id: Uuid,
) -> Res<AddressValidationLog> {
    sqlx::query_as::<_, AddressValidationLog>(
        "SELECT * FROM address_validation_logs WHERE id = $1",
    )
    .bind(log_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

fn push_log_filter(qb: &mut QueryBuilder<'_, Postgres>, address_id: Option<Uuid>) {
    if let Some(address_id) = address_id {
        qb.push(" WHERE address_id = ").push_bind(address_id);
    }
}

pub async fn count_logs<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Option<Uuid>,
) -> Res<i64> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM address_validation_logs");
    push_log_filter(&mut qb, address_id);

    qb.build_query_scalar::<i64>()
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn list_logs<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    address_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Res<Vec<AddressValidationLog>> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM address_validation_logs");
    push_log_filter(&mut qb, address_id);
    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    qb.build_query_as::<AddressValidationLog>()
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}

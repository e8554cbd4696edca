use std::time::Instant;

use common::error::Res;
use common::http::{Page, PageQuery};
use common::jwt::JwtClaims;
use db::dtos::address::{AddressResponse, LogCreateRequest};
use db::models::address::{AddressValidationLog, ValidatedAddress};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::address::{ValidateRequest, ValidationStatistics};
use crate::services::validator::{AddressValidator, ValidationOutcome};

/// Validates an address and stores the result with one log row per attempt.
///
/// The pending row is created before any lookup so attempts always have an
/// address to point at. If storing the outcome fails the address is left `invalid`.
pub async fn validate_address(
    pool: &PgPool,
    validator: &AddressValidator,
    claims: &JwtClaims,
    req: ValidateRequest,
) -> Res<AddressResponse> {
    let original = req.address()?;
    let country = req.country();

    let pending =
        db::address::insert_pending_address(pool, &original, country.name(), Some(claims.user_id))
            .await?;
    let outcome = validator.run(&original, country).await;
    let address = record_outcome(pool, &pending, outcome).await?;

    log::info!(
        "Address {} validated as {} by {}",
        address.id,
        address.validation_status.as_str(),
        address.validation_source.as_str()
    );
    Ok(AddressResponse::from(address))
}

/// Writes the attempt logs, then the result. A rejected result adds one failed
/// log row and leaves the address `invalid`.
pub async fn record_outcome(
    pool: &PgPool,
    pending: &ValidatedAddress,
    outcome: ValidationOutcome,
) -> Res<ValidatedAddress> {
    let source = outcome.result.validation_source;
    let started = Instant::now();
    match store_outcome(pool, pending.id, outcome).await {
        Ok(address) => Ok(address),
        Err(e) => {
            log::error!("Storing validation of address {} failed: {}", pending.id, e);
            let failure = LogCreateRequest {
                address_id: pending.id,
                validation_source: source,
                request_data: json!({ "original_address": pending.original_address }),
                response_data: json!({}),
                success: false,
                error_message: Some(e.to_string()),
                processing_time: started.elapsed().as_secs_f64().max(1e-6),
            };
            if let Err(log_err) = db::address::insert_validation_log(pool, failure).await {
                log::error!("Logging failed store of address {}: {}", pending.id, log_err);
            }
            db::address::mark_address_invalid(pool, pending.id).await
        }
    }
}

async fn store_outcome(
    pool: &PgPool,
    address_id: Uuid,
    outcome: ValidationOutcome,
) -> Res<ValidatedAddress> {
    for attempt in outcome.attempts {
        db::address::insert_validation_log(pool, attempt.into_log(address_id)).await?;
    }
    db::address::update_address_result(pool, address_id, &outcome.result).await
}

pub async fn statistics(pool: &PgPool) -> Res<ValidationStatistics> {
    let counts = db::address::status_counts(pool).await?;
    Ok(ValidationStatistics::from(counts))
}

pub async fn list_addresses(pool: &PgPool, query: PageQuery) -> Res<Page<AddressResponse>> {
    query.validate()?;
    let count = db::address::count_addresses(pool).await?;
    let addresses = db::address::list_addresses(pool, query.limit(), query.offset()).await?;
    Ok(Page::new(query, count, addresses)?.map(AddressResponse::from))
}

pub async fn get_address(pool: &PgPool, address_id: Uuid) -> Res<AddressResponse> {
    db::address::get_address_by_id(pool, address_id)
        .await
        .map(AddressResponse::from)
        .map_err(|e| e.not_found_as("Validated address"))
}

pub async fn list_logs(
    pool: &PgPool,
    address_id: Option<Uuid>,
    query: PageQuery,
) -> Res<Page<AddressValidationLog>> {
    query.validate()?;
    let count = db::address::count_logs(pool, address_id).await?;
    let logs = db::address::list_logs(pool, address_id, query.limit(), query.offset()).await?;
    Page::new(query, count, logs)
}

pub async fn get_log(pool: &PgPool, log_id: Uuid) -> Res<AddressValidationLog> {
    db::address::get_log_by_id(pool, log_id)
        .await
        .map_err(|e| e.not_found_as("Validation log"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use common::misc::Country;
    use db::models::address::{ValidationSource, ValidationStatus};

    use super::*;
    use crate::services::geocoding::canned::Canned;

    async fn validate(
        pool: &PgPool,
        validator: &AddressValidator,
        text: &str,
    ) -> (ValidatedAddress, Vec<AddressValidationLog>) {
        let pending = db::address::insert_pending_address(pool, text, Country::Us.name(), None)
            .await
            .unwrap();
        let outcome = validator.run(text, Country::Us).await;
        let address = record_outcome(pool, &pending, outcome).await.unwrap();
        let logs = db::address::list_logs(pool, Some(address.id), 10, 0).await.unwrap();
        (address, logs)
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn local_parse_stores_one_log(pool: PgPool) {
        let validator = AddressValidator::new(None);
        let (address, logs) = validate(&pool, &validator, "123 Main St, Springfield, IL 62701").await;

        assert_eq!(address.validation_status, ValidationStatus::Partial);
        assert_eq!(address.city.as_deref(), Some("Springfield"));
        assert_eq!(logs.len(), 1);
        assert!(logs[0].success);
        assert!(logs[0].processing_time > 0.0);
        assert_eq!(logs[0].validation_source, ValidationSource::Usaddress);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn no_results_store_one_failed_log(pool: PgPool) {
        let validator = AddressValidator::new(Some(Arc::new(Canned::geocoding(Ok(None)))));
        let (address, logs) = validate(&pool, &validator, "nowhere at all").await;

        assert_eq!(address.validation_status, ValidationStatus::Invalid);
        assert_eq!(logs.len(), 1);
        assert!(!logs[0].success);
        assert_eq!(logs[0].error_message.as_deref(), Some("No geocoding results found"));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn geocoder_error_stores_both_attempts(pool: PgPool) {
        let validator =
            AddressValidator::new(Some(Arc::new(Canned::geocoding(Err("timeout".to_string())))));
        let (address, logs) = validate(&pool, &validator, "123 Main St, Springfield, IL 62701").await;

        assert_eq!(address.validation_source, ValidationSource::Usaddress);
        assert_eq!(address.confidence_score, Some(0.6));
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().any(|l| l.validation_source == ValidationSource::Google && !l.success));
        assert!(logs.iter().any(|l| l.validation_source == ValidationSource::Usaddress && l.success));
        assert!(logs.iter().all(|l| l.processing_time > 0.0));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn long_components_are_stored(pool: PgPool) {
        let city = "X".repeat(120);
        let text = format!("123 Main St, {city}, IL 62701");
        let (address, logs) = validate(&pool, &AddressValidator::new(None), &text).await;

        assert_eq!(address.validation_status, ValidationStatus::Partial);
        assert_eq!(address.city.as_deref(), Some(city.as_str()));
        assert_eq!(logs.len(), 1);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn rejected_result_keeps_attempt_logs(pool: PgPool) {
        let text = "123 Main St, Springfield, IL 62701";
        let pending = db::address::insert_pending_address(&pool, text, Country::Us.name(), None)
            .await
            .unwrap();
        let mut outcome = AddressValidator::new(None).run(text, Country::Us).await;
        // confidence_score is constrained to 0..=1
        outcome.result.confidence_score = Some(2.0);

        let address = record_outcome(&pool, &pending, outcome).await.unwrap();
        assert_eq!(address.validation_status, ValidationStatus::Invalid);

        let logs = db::address::list_logs(&pool, Some(address.id), 10, 0).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs.iter().filter(|l| l.success).count(), 1);
        assert!(logs.iter().any(|l| !l.success && l.error_message.is_some()));
    }
}

use common::error::{AppError, FieldErrors, Res};

/// Records `"<what> not found"` on `field` when `result` is a missing row.
/// Other database failures propagate.
pub fn missing_as_field<T>(
    result: Res<T>,
    field: &str,
    what: &str,
    errors: &mut FieldErrors,
) -> Res<()> {
    match result {
        Ok(_) => Ok(()),
        Err(AppError::Database(sqlx::Error::RowNotFound)) => {
            errors.add(field, format!("{what} not found"));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_rows_become_field_errors() {
        let mut errors = FieldErrors::new();
        missing_as_field::<()>(Ok(()), "driver_id", "Driver", &mut errors).unwrap();
        assert!(errors.is_empty());

        missing_as_field::<()>(
            Err(AppError::Database(sqlx::Error::RowNotFound)),
            "driver_id",
            "Driver",
            &mut errors,
        )
        .unwrap();
        assert!(errors.contains("driver_id"));

        let failure = missing_as_field::<()>(
            Err(AppError::Internal("down".to_string())),
            "vehicle_id",
            "Vehicle",
            &mut errors,
        );
        assert!(failure.is_err());
        assert!(!errors.contains("vehicle_id"));
    }
}

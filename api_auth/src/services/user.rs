use common::error::{FieldErrors, Res};
use common::misc::non_blank;
use db::dtos::customer::CustomerFields;
use db::dtos::fleet::DriverFields;
use db::dtos::user::UserCreateRequest;
use db::models::customer::CustomerProfile;
use db::models::driver::DriverProfile;
use db::models::user::{AuthCredentials, User};
use sqlx::{PgPool, Postgres, Transaction};

use crate::dtos::auth::{CustomerRegisterRequest, DriverRegisterRequest};
use crate::services::auth::hash_password;

/// Account fields shared by every registration form.
struct Account<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

impl Account<'_> {
    fn require(&self, errors: &mut FieldErrors) {
        errors.require("username", Some(self.username));
        errors.require("email", Some(self.email));
        errors.require("password", Some(self.password));
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
    }

    async fn check_duplicates(&self, pool: &PgPool, errors: &mut FieldErrors) -> Res<()> {
        if let Some(username) = non_blank(Some(self.username)) {
            if db::user::exists_user_by_username(pool, username).await? {
                errors.add("username", "A user with that username already exists.");
            }
        }
        if let Some(email) = non_blank(Some(self.email)) {
            if db::user::exists_user_by_email(pool, email).await? {
                errors.add("email", "A user with that email already exists.");
            }
        }
        Ok(())
    }

    /// Inserts the user and its password hash inside `tx`.
    async fn insert(&self, tx: &mut Transaction<'_, Postgres>) -> Res<User> {
        let user = db::user::insert_user(
            &mut **tx,
            UserCreateRequest {
                username: self.username.trim().to_string(),
                email: self.email.trim().to_string(),
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                is_staff: false,
            },
        )
        .await?;

        db::user::insert_user_with_credentials(
            &mut **tx,
            AuthCredentials {
                user_id: user.id,
                password_hash: hash_password(self.password)?,
            },
        )
        .await?;

        Ok(user)
    }
}

fn customer_account(req: &CustomerRegisterRequest) -> Account<'_> {
    Account {
        username: &req.username,
        email: &req.email,
        password: &req.password,
        first_name: &req.first_name,
        last_name: &req.last_name,
    }
}

fn driver_account(req: &DriverRegisterRequest) -> Account<'_> {
    Account {
        username: &req.username,
        email: &req.email,
        password: &req.password,
        first_name: &req.first_name,
        last_name: &req.last_name,
    }
}

pub fn customer_fields(req: &CustomerRegisterRequest) -> CustomerFields {
    let owned = |value: &Option<String>| non_blank(value.as_deref()).map(str::to_string);
    CustomerFields {
        phone_number: req.phone_number.trim().to_string(),
        address_unit: owned(&req.address_unit),
        address_street: owned(&req.address_street),
        address_city: owned(&req.address_city),
        address_state: owned(&req.address_state),
        address_postal_code: owned(&req.address_postal_code),
        address_country: req.address_country,
        company_name: owned(&req.company_name),
        is_business: req.is_business,
        preferred_pickup_address: owned(&req.preferred_pickup_address),
        active: true,
    }
}

/// Field checks that need no database: required account fields, phone and postal code.
pub fn validate_customer_request(req: &CustomerRegisterRequest) -> (CustomerFields, FieldErrors) {
    let mut errors = FieldErrors::new();
    customer_account(req).require(&mut errors);
    let mut fields = customer_fields(req);
    fields.validate(&mut errors);
    (fields, errors)
}

pub fn validate_driver_request(req: &DriverRegisterRequest) -> (DriverFields, FieldErrors) {
    let mut errors = FieldErrors::new();
    driver_account(req).require(&mut errors);
    errors.require("phone_number", Some(&req.phone_number));
    errors.require("license_number", Some(&req.license_number));
    let fields = DriverFields {
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        phone_number: req.phone_number.trim().to_string(),
        license_number: req.license_number.trim().to_string(),
        active: true,
    };
    (fields, errors)
}

/// Creates the user account and its customer profile in one transaction.
pub async fn register_customer(pool: &PgPool, req: &CustomerRegisterRequest) -> Res<CustomerProfile> {
    let account = customer_account(req);
    let (fields, mut errors) = validate_customer_request(req);
    account.check_duplicates(pool, &mut errors).await?;
    errors.into_result()?;

    let mut tx = pool.begin().await?;
    let user = account.insert(&mut tx).await?;
    let customer = db::customer::insert_customer(&mut *tx, user.id, &fields).await?;
    let profile = db::customer::get_profile_by_id(&mut *tx, customer.id).await?;
    tx.commit().await?;

    log::info!("Registered customer {} for user {}", customer.id, user.username);
    Ok(profile)
}

/// Creates the user account and its driver profile in one transaction.
pub async fn register_driver(pool: &PgPool, req: &DriverRegisterRequest) -> Res<DriverProfile> {
    let account = driver_account(req);
    let (fields, mut errors) = validate_driver_request(req);
    account.check_duplicates(pool, &mut errors).await?;
    if !fields.license_number.is_empty()
        && db::driver::exists_driver_by_license(pool, &fields.license_number, None).await?
    {
        errors.add("license_number", "A driver with this license number already exists.");
    }
    errors.into_result()?;

    let mut tx = pool.begin().await?;
    let user = account.insert(&mut tx).await?;
    let driver = db::driver::insert_driver(&mut *tx, user.id, &fields).await?;
    let profile = db::driver::get_profile_by_id(&mut *tx, driver.id).await?;
    tx.commit().await?;

    log::info!("Registered driver {} for user {}", driver.id, user.username);
    Ok(profile)
}

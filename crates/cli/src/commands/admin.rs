//! Admin user management command.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use rand::Rng;

use velour_api::db::AdminRepository;
use velour_core::Email;

use super::{CommandError, connect};

/// Length of generated admin passwords.
const GENERATED_PASSWORD_LENGTH: usize = 20;

/// Create an admin account.
///
/// When no password is given, a random one is generated and logged once.
///
/// # Errors
///
/// Returns `CommandError` for an invalid email, a duplicate account, or a
/// database failure.
pub async fn create(email: &str, name: &str, password: Option<&str>) -> Result<(), CommandError> {
    let email = Email::parse(email)
        .map_err(|e| CommandError::InvalidInput(format!("invalid email: {e}")))?;

    let (password, generated) = match password {
        Some(p) => (p.to_owned(), false),
        None => (generate_password(), true),
    };

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CommandError::InvalidInput(format!("password hashing failed: {e}")))?
        .to_string();

    let pool = connect().await?;
    let admin = AdminRepository::new(&pool)
        .create(name, &email, &password_hash)
        .await?;

    tracing::info!(admin_id = %admin.id, email = %email, "Admin created");
    if generated {
        tracing::info!("Generated password: {password}");
    }

    Ok(())
}

/// Generate a random alphanumeric password.
fn generate_password() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
                                     ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                     0123456789";
            let idx = rng.random_range(0..CHARSET.len());
            char::from(CHARSET[idx])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

//! Admin account management.
//!
//! Registration always creates customer accounts; promotion to admin is a
//! deliberate operator action done here.

/// Promote a registered account to the admin role.
///
/// # Errors
///
/// Returns an error if the account doesn't exist or the database is
/// unreachable.
pub async fn promote(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let result = sqlx::query("UPDATE users SET role = 'admin', updated_at = now() WHERE email = $1")
        .bind(email)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(format!("No account found for {email}").into());
    }

    tracing::info!(email, "account promoted to admin");
    Ok(())
}

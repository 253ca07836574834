//! Account creation.

use keepsake_core::config::AppConfig;
use keepsake_core::result::AppResult;

use super::Credentials;
use crate::output;

/// Create an account. The new account is not signed in.
pub async fn execute(creds: &Credentials, config: AppConfig) -> AppResult<()> {
    let services = super::connect(config).await?;
    let password = super::read_password(true)?;
    let user = services.auth.sign_up(&creds.email, &password).await?;
    output::print_success(&format!("Account created for {}", user.email));
    Ok(())
}

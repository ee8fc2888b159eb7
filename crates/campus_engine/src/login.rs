use campus_logging::campus_info;

use crate::config::PortalConfig;
use crate::fetch::PageSource;
use crate::types::PortalError;

/// Portal account credentials, consumed once at crawl start.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Submits the portal login form.
///
/// A successful login redirects off the login page; staying on it means the
/// portal rejected the credentials, with the reason in its error block.
pub async fn login(
    source: &dyn PageSource,
    config: &PortalConfig,
    credentials: &Credentials,
) -> Result<(), PortalError> {
    let form = [
        ("username".to_string(), credentials.username.clone()),
        ("password".to_string(), credentials.password.clone()),
    ];
    let landing = source.post_form(&config.login_url(), &form).await?;

    if landing.url().contains(&config.login_path) {
        let message = landing
            .first_text("#loginerrormessage, .loginerrors, .alert-danger")
            .unwrap_or_else(|| "login form still present".to_string());
        return Err(PortalError::LoginRejected(message));
    }

    campus_info!("login accepted, landed on {}", landing.url());
    Ok(())
}

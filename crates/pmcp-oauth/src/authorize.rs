//! Authorization URL construction for the browser consent flow

use pmcp_config::AppConfig;

/// Build the Pinterest authorization URL the user must visit to grant
/// access.
///
/// Redirect URI and scope list are percent-encoded; scopes are joined with
/// commas as Pinterest expects.
pub fn authorization_url(config: &AppConfig) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
        config.authorize_url,
        config.app_id,
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&config.scopes.join(","))
    )
}

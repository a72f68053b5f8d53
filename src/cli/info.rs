use serde_json::json;

use crate::{
    Res,
    cli::{Output, credential_store},
    config, info, warning,
};

/// Shows where configuration lives, which endpoints are in use and whether
/// credentials are stored.
pub async fn info(output: Output) -> Res<()> {
    let store = credential_store();
    let authenticated = match store.load().await {
        Ok(creds) => Some(creds.is_authenticated()),
        Err(e) => {
            warning!("Credentials file unreadable: {}", e);
            None
        }
    };

    let env_file = config::app_dir().join(".env");
    if output.is_json() {
        return output.print_json(&json!({
            "version": env!("CARGO_PKG_VERSION"),
            "config_dir": config::app_dir(),
            "env_file": env_file,
            "env_file_present": env_file.is_file(),
            "credentials_path": store.path(),
            "authenticated": authenticated,
            "api_base_url": config::api_base_url(),
            "api_version": config::api_version(),
            "redirect_uri": config::redirect_uri(),
        }));
    }

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Config directory: {}", config::app_dir().display());
    info!(
        "Environment file: {}{}",
        env_file.display(),
        if env_file.is_file() { "" } else { " (not present)" }
    );
    info!("Credentials file: {}", store.path().display());
    info!(
        "API endpoint: {}/{}",
        config::api_base_url(),
        config::api_version()
    );
    info!("OAuth redirect URI: {}", config::redirect_uri());
    match authenticated {
        Some(true) => info!("Authenticated: yes"),
        Some(false) => info!("Authenticated: no (run: gads-cli auth login)"),
        None => info!("Authenticated: unknown"),
    }
    Ok(())
}

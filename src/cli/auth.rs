use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use chrono::Utc;

use crate::{
    Res,
    ads::AuthorizationFlow,
    cli::{credential_store, http_client, oauth_config, session, spinner},
    config, info,
    management::parse_credentials_file,
    success,
    utils::mask_secret,
    warning,
};

/// Values supplied on the command line for `auth login`.
#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
    pub credentials_file: Option<PathBuf>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub developer_token: Option<String>,
    pub manager_account: Option<String>,
}

pub async fn login(opts: LoginOptions) -> Res<()> {
    let store = credential_store();
    let mut creds = match store.load().await {
        Ok(c) => c,
        Err(e) => {
            warning!("Ignoring unreadable credentials file: {}", e);
            Default::default()
        }
    };

    if let Some(path) = &opts.credentials_file {
        let (client_id, client_secret) = parse_credentials_file(path).await?;
        creds.client_id = client_id;
        creds.client_secret = client_secret;
        info!("Loaded client credentials from {}", path.display());
    }
    if let Some(id) = opts.client_id {
        creds.client_id = id;
    }
    if let Some(secret) = opts.client_secret {
        creds.client_secret = secret;
    }
    if let Some(token) = opts.developer_token {
        creds.developer_token = token;
    }
    if let Some(manager) = opts.manager_account {
        creds.manager_customer_id = manager;
    }

    if creds.client_id.is_empty() {
        creds.client_id = prompt_required("Client ID: ")?;
    }
    if creds.client_secret.is_empty() {
        creds.client_secret = prompt_required("Client Secret: ")?;
    }
    if creds.developer_token.is_empty() {
        creds.developer_token = prompt_required("Developer Token: ")?;
    }
    if creds.manager_customer_id.is_empty() {
        creds.manager_customer_id = prompt_required("Manager Account (MCC) Customer ID: ")?;
    }

    info!("Starting OAuth2 authorization flow...");
    let flow = AuthorizationFlow::new(oauth_config(&creds), http_client()?)
        .with_port(config::callback_port());
    let minutes = flow.timeout().as_secs() / 60;

    let creds = flow
        .login(&store, creds, |url| {
            info!("Opening browser to authorize access...");
            if webbrowser::open(url).is_err() {
                warning!("Failed to open browser.");
            }
            println!("If the browser doesn't open, visit:\n{}\n", url);
            info!("Waiting for authorization ({} minute timeout)...", minutes);
        })
        .await?;

    success!("Authentication successful!");
    info!("Credentials saved to: {}", store.path().display());
    info!("Manager account: {}", creds.manager_customer_id);
    Ok(())
}

pub async fn status() -> Res<()> {
    let store = credential_store();
    let creds = store.load().await?;

    println!("Config file: {}\n", store.path().display());
    if !creds.is_authenticated() {
        println!("Status: not authenticated");
        println!("\nRun: gads-cli auth login");
        return Ok(());
    }

    println!("Status:           authenticated");
    println!("Client ID:        {}", mask_secret(&creds.client_id));
    println!("Developer Token:  {}", mask_secret(&creds.developer_token));
    println!("Manager Account:  {}", creds.manager_customer_id);
    if let Some(expiry) = creds.token_expiry {
        println!("Token Expiry:     {}", expiry.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

pub async fn token() -> Res<()> {
    let creds = credential_store().load().await?;
    if !creds.is_authenticated() {
        return Err(crate::error::Error::NotAuthenticated.into());
    }

    println!("Access Token:   {}", mask_secret(&creds.access_token));
    println!("Refresh Token:  {}", mask_secret(&creds.refresh_token));
    println!("Token Type:     {}", creds.token_type);
    if let Some(expiry) = creds.token_expiry {
        println!("Token Expiry:   {}", expiry.format("%Y-%m-%d %H:%M:%S UTC"));
        if Utc::now() > expiry {
            println!("Status:         EXPIRED (will refresh on next use)");
        } else {
            println!("Status:         valid");
        }
    }
    Ok(())
}

pub async fn check() -> Res<()> {
    let client = session().await?;

    let pb = spinner("Checking credentials...");
    let result = client.list_accessible_customers().await;
    pb.finish_and_clear();

    let accounts = result.map_err(|e| format!("credentials check failed: {}", e))?;
    success!(
        "Credentials valid. Found {} accessible account(s).",
        accounts.len()
    );
    Ok(())
}

pub async fn logout() -> Res<()> {
    credential_store().clear().await?;
    success!("Credentials removed.");
    Ok(())
}

fn prompt_required(message: &str) -> Res<String> {
    let stdin = io::stdin();
    loop {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(format!("no value given for {}", message.trim_end_matches(": ")).into());
        }
        let value = line.trim();
        if !value.is_empty() {
            return Ok(value.to_string());
        }
        println!("  (value required)");
    }
}

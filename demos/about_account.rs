//! Example: Show the authenticated user's account
//!
//! Prints the display name and email of the account that owns the token.
//!
//! Run with: DROPBOX_TOKEN=... cargo run --example about_account

use dropbox_rs::{Client, DropboxError};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let token = env::var("DROPBOX_TOKEN").expect("DROPBOX_TOKEN not found in environment");

    // Credentials travel with the reqwest client, not the Dropbox client
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    let http = reqwest::Client::builder().default_headers(headers).build()?;
    let client = Client::with_http_client(http);

    match client.users().get_current_account().await {
        Ok(response) => {
            let account = response.into_value();
            println!("Account: {}", account.account_id);
            println!("Name:    {}", account.name.display_name);
            println!("Email:   {}", account.email);
            if !account.country.is_empty() {
                println!("Country: {}", account.country);
            }
        }
        Err(DropboxError::Remote { status, reason }) => {
            eprintln!("Dropbox rejected the request ({status}): {reason}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

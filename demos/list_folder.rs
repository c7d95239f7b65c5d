//! Example: List a folder
//!
//! Streams every entry of a folder, following the listing cursor across
//! pages as they are consumed.
//!
//! Run with: DROPBOX_TOKEN=... cargo run --example list_folder -- /Photos
//!
//! The path defaults to the root folder. `/` is accepted as an alias for it.

use dropbox_rs::Client;
use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let token = env::var("DROPBOX_TOKEN").expect("DROPBOX_TOKEN not found in environment");
    let path = match env::args().nth(1).as_deref() {
        None | Some("/") => String::new(),
        Some(path) => path.to_string(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    let http = reqwest::Client::builder().default_headers(headers).build()?;
    let client = Client::with_http_client(http);

    let entries = client.files().list_folder_stream(&path);
    futures_util::pin_mut!(entries);

    let mut count = 0;
    while let Some(entry) = entries.next().await {
        println!("{}", entry?.name);
        count += 1;
    }
    println!("\n{count} entries");

    Ok(())
}

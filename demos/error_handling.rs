//! Example demonstrating error handling.
//!
//! This example shows how to:
//! - Match on the error kinds a call can produce
//! - Access raw response data on errors
//! - Plug in a reachability oracle
//!
//! Run with: `cargo run --example error_handling`

use lightnet::{Client, ConnectionStatus, Endpoint, Error, LogLevel};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    id: u32,
    title: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("lightnet=info")
        .init();

    let client = Client::new("https://jsonplaceholder.typicode.com", LogLevel::Info)?;

    println!("=== Example 1: Handling bad status codes ===");
    match client.fetch::<Post>(&Endpoint::get("/posts/999999")).await {
        Ok(post) => println!("Success: {:?}", post),
        Err(Error::BadStatusCode {
            status,
            raw_response,
        }) => {
            println!("Bad status code!");
            println!("  Status: {}", status);
            println!("  Is client error (4xx): {}", status.is_client_error());
            println!("  Raw response: {}", raw_response);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Handling decoding errors ===");
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct WrongSchema {
        nonexistent_field: String,
    }

    match client.fetch::<WrongSchema>(&Endpoint::get("/posts/1")).await {
        Ok(_) => println!("Unexpected success"),
        Err(Error::DecodingFailed {
            raw_response,
            serde_error,
        }) => {
            println!("Decoding failed!");
            println!("  Serde error: {}", serde_error);
            println!(
                "  Raw response (first 200 chars): {}",
                raw_response.chars().take(200).collect::<String>()
            );
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Transport failures ===");
    let bad_client = Client::new("https://this-domain-does-not-exist-12345.com", LogLevel::Off)?;
    match bad_client.request(&Endpoint::get("/")).await {
        Ok(_) => println!("Unexpected success"),
        Err(Error::NoResponse(Some(e))) => {
            println!("No response!");
            println!("  Error: {}", e);
            println!("  Is connect error: {}", e.is_connect());
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 4: Offline ===");
    let offline = Client::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .reachability(|| ConnectionStatus::Unavailable)
        .build()?;
    match offline.request(&Endpoint::get("/posts/1")).await {
        Err(Error::NoNetwork) => println!("No network, nothing was sent"),
        other => println!("Unexpected: {:?}", other.map(|b| b.len())),
    }

    Ok(())
}

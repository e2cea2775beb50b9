//! Example demonstrating a multipart upload with progress reporting.
//!
//! This example shows how to:
//! - Attach an image payload to an endpoint
//! - Observe upload progress through a per-call callback
//! - Cancel a slow upload with a cancellation token
//!
//! Run with: `cargo run --example upload_progress`

use lightnet::{CallOptions, Client, Endpoint, Error, LogLevel, Upload, UploadKind};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("lightnet=info,upload_progress=info")
        .init();

    let client = Client::new("https://httpbin.org", LogLevel::Info)?;

    // A fake 256 KiB "photo".
    let photo: Vec<u8> = (0..256 * 1024).map(|i| (i % 256) as u8).collect();
    let upload = Upload::new(UploadKind::Image, photo);

    let endpoint = Endpoint::post("/post")
        .with_body_param("caption", "Sunrise over the harbor")
        .with_body_param("album", 12);

    println!("=== Upload with progress ===");
    let options = CallOptions::new().on_progress(Arc::new(|fraction| {
        println!("  {:>5.1}% sent", fraction * 100.0);
    }));
    let body = client.upload_with(&endpoint, &upload, options).await?;
    println!("Server echoed {} bytes", body.len());
    println!();

    println!("=== Cancelling an upload ===");
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let options = CallOptions::new()
        .timeout(Duration::from_secs(5))
        .cancel_token(token);
    match client.upload_with(&endpoint, &upload, options).await {
        Ok(_) => println!("Upload finished before it could be cancelled"),
        Err(Error::Cancelled) => println!("Upload cancelled"),
        Err(e) => println!("Other error: {}", e),
    }

    Ok(())
}

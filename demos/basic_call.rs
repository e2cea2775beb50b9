//! Basic example demonstrating GET and POST endpoints.
//!
//! This example shows how to:
//! - Create a client with request logging enabled
//! - Describe calls as endpoints with URL and body parameters
//! - Decode JSON responses into typed structs
//!
//! Run with: `cargo run --example basic_call`

use lightnet::{Client, Endpoint, Error, LogLevel};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("lightnet=debug,basic_call=info")
        .init();

    let client = Client::new("https://jsonplaceholder.typicode.com", LogLevel::Debug)?;

    println!("=== GET with URL parameters ===");
    let endpoint = Endpoint::get("/posts").with_url_param("userId", 1);
    let posts: Vec<Post> = client.fetch(&endpoint).await?;
    println!("User 1 has {} posts", posts.len());
    if let Some(first) = posts.first() {
        println!("First title: {}", first.title);
    }
    println!();

    println!("=== POST with a JSON body ===");
    let mut endpoint = Endpoint::post("/posts");
    endpoint.add_body_param("title", "My New Post");
    endpoint.add_body_param("body", "This is the content of my new post!");
    endpoint.add_body_param("userId", 1);

    let created: Post = client.fetch(&endpoint).await?;
    println!("Created post ID: {}", created.id);
    println!("Title: {}", created.title);
    println!();

    println!("=== Raw bytes ===");
    let raw = client.request(&Endpoint::get("/posts/1")).await?;
    println!("Raw response length: {} bytes", raw.len());

    Ok(())
}

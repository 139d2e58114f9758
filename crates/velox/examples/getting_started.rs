//! Getting Started Example
//!
//! Registers a few routes, a parameterized route, and a nested group, then
//! exercises the boundary behaviors (404, 405, derived HEAD, synthesized
//! OPTIONS) through the in-process test client.
//!
//! Run with: cargo run --example getting_started -p velox

use serde::Serialize;
use serde_json::json;
use velox::prelude::*;
use velox::testing::TestClient;

#[derive(Debug, Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
}

fn main() -> Result<(), RouteConflict> {
    println!("velox Getting Started\n");

    let mut app = App::new();

    app.router().get("/", |_req, res, _ctx| async move {
        res.send_json(
            StatusCode::OK,
            &ServiceInfo {
                name: "demo",
                version: "0.1.0",
            },
        );
        Ok(())
    })?;

    app.router().get("/hello/:name", |_req, res, ctx| async move {
        let name = ctx.param("name").unwrap_or("world").to_string();
        res.send_text(StatusCode::OK, &format!("Hello, {name}!"));
        Ok(())
    })?;

    app.router().group("/api", Vec::new(), |api| {
        api.get("/search", |_req, res, ctx| async move {
            let q = ctx.query().get("q").unwrap_or("").to_string();
            res.send_json(StatusCode::OK, &json!({ "query": q, "results": [] }));
            Ok(())
        })?;
        api.post("/items", |_req, res, _ctx| async move {
            res.send_json(StatusCode::CREATED, &json!({ "created": true }));
            Ok(())
        })
    })?;

    let client = TestClient::new(app);

    println!("1. Root route:");
    let response = client.get("/");
    println!("   GET / -> {:?} ({})", response.status(), response.text());
    assert_eq!(response.status(), Some(StatusCode::OK));

    println!("\n2. Path parameters:");
    let response = client.get("/hello/velox");
    println!("   GET /hello/velox -> {}", response.text());
    assert_eq!(response.text(), "Hello, velox!");

    println!("\n3. Query strings:");
    let response = client.get("/api/search?q=fast%20routing");
    println!("   GET /api/search?q=fast%20routing -> {}", response.text());
    assert_eq!(
        response.json().ok(),
        Some(json!({ "query": "fast routing", "results": [] }))
    );

    println!("\n4. Unknown paths get a canonical 404:");
    let response = client.get("/nope");
    println!("   GET /nope -> {:?} ({})", response.status(), response.text());
    assert_eq!(response.status(), Some(StatusCode::NOT_FOUND));

    println!("\n5. Wrong method gets a 405 with Allow:");
    let response = client.delete("/api/items");
    println!(
        "   DELETE /api/items -> {:?} (Allow: {})",
        response.status(),
        response.header("Allow").unwrap_or("-")
    );
    assert_eq!(response.status(), Some(StatusCode::METHOD_NOT_ALLOWED));

    println!("\n6. HEAD is derived from GET, body suppressed:");
    let response = client.head("/hello/velox");
    println!(
        "   HEAD /hello/velox -> {:?} (body {} bytes)",
        response.status(),
        response.body().len()
    );
    assert_eq!(response.status(), Some(StatusCode::OK));
    assert!(response.body().is_empty());

    println!("\n7. OPTIONS is synthesized:");
    let response = client.options("/api/items");
    println!(
        "   OPTIONS /api/items -> {:?} (Allow: {})",
        response.status(),
        response.header("Allow").unwrap_or("-")
    );
    assert_eq!(response.status(), Some(StatusCode::NO_CONTENT));

    println!("\nAll getting started checks passed!");
    Ok(())
}

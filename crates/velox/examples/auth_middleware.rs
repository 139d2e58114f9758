//! Authentication Middleware Example
//!
//! Demonstrates continuation-passing middleware on a route group:
//! - a bearer-token guard that halts the chain with a 401 by dropping `Next`
//! - a user-loading middleware that passes typed state to the handler
//! - public routes outside the group that never see the guard
//!
//! Run with: cargo run --example auth_middleware -p velox

use serde_json::json;
use velox::prelude::*;
use velox::testing::TestClient;
use velox::{BoxMiddleware, middleware_fn};

/// The token accepted by the demo guard. A real application would validate
/// against a session store.
const SECRET_TOKEN: &str = "demo_secret_token_12345";

/// The authenticated user, stashed in the route context by the loader
/// middleware and read back by handlers.
#[derive(Debug, Clone)]
struct CurrentUser {
    name: String,
}

fn bearer_guard() -> BoxMiddleware {
    middleware_fn(|req, res, _ctx, next| async move {
        let token = req
            .headers()
            .get("authorization")
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        match token {
            Some(token) if token == SECRET_TOKEN => next.run().await,
            // `next` is dropped without running; the chain halts on the 401.
            _ => {
                res.send_unauthorized("missing or invalid bearer token");
                Ok(())
            }
        }
    })
}

fn user_loader() -> BoxMiddleware {
    middleware_fn(|_req, _res, ctx, next| async move {
        ctx.insert_extension(CurrentUser {
            name: "demo_user".to_string(),
        });
        next.run().await
    })
}

fn main() -> Result<(), RouteConflict> {
    println!("velox Authentication Middleware Example");
    println!("=======================================\n");

    let mut app = App::new();

    app.router().get("/public", |_req, res, _ctx| async move {
        res.send_json(StatusCode::OK, &json!({ "message": "open to everyone" }));
        Ok(())
    })?;

    app.router()
        .group("/account", vec![bearer_guard(), user_loader()], |account| {
            account.get("/profile", |_req, res, ctx| async move {
                match ctx.extension::<CurrentUser>() {
                    Some(user) => {
                        res.send_json(StatusCode::OK, &json!({ "username": user.name }));
                    }
                    None => res.send_server_error(),
                }
                Ok(())
            })?;
            account.delete("/sessions", |_req, res, _ctx| async move {
                res.send_json(StatusCode::OK, &json!({ "revoked": true }));
                Ok(())
            })
        })?;

    let client = TestClient::new(app);

    println!("1. Public endpoint - no auth required");
    let response = client.get("/public");
    println!("   GET /public -> {:?}", response.status());
    assert_eq!(response.status(), Some(StatusCode::OK));

    println!("\n2. Protected endpoint - without token");
    let response = client.get("/account/profile");
    println!("   GET /account/profile -> {:?}", response.status());
    assert_eq!(response.status(), Some(StatusCode::UNAUTHORIZED));

    println!("\n3. Protected endpoint - with valid token");
    let mut request = Request::new(Method::Get, "/account/profile");
    request
        .headers_mut()
        .insert("Authorization", format!("Bearer {SECRET_TOKEN}").into_bytes());
    let response = client.send(request);
    println!(
        "   GET /account/profile -> {:?} ({})",
        response.status(),
        response.text()
    );
    assert_eq!(response.status(), Some(StatusCode::OK));
    assert_eq!(response.json().ok(), Some(json!({ "username": "demo_user" })));

    println!("\n4. Protected endpoint - with invalid token");
    let mut request = Request::new(Method::Get, "/account/profile");
    request
        .headers_mut()
        .insert("Authorization", b"Bearer wrong_token".to_vec());
    let response = client.send(request);
    println!("   GET /account/profile -> {:?}", response.status());
    assert_eq!(response.status(), Some(StatusCode::UNAUTHORIZED));

    println!("\n5. The guard covers every route in the group");
    let response = client.delete("/account/sessions");
    println!("   DELETE /account/sessions -> {:?}", response.status());
    assert_eq!(response.status(), Some(StatusCode::UNAUTHORIZED));

    println!("\nAll authentication middleware checks passed!");
    Ok(())
}

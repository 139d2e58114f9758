//! End-to-end routing behavior through the app boundary.

use serde_json::json;
use std::sync::Arc;
use velox::prelude::*;
use velox::testing::{TestClient, TestResponse};
use velox::{BoxMiddleware, middleware_fn};

fn assert_status(res: &TestResponse, expected: u16) {
    assert_eq!(res.status().map(StatusCode::as_u16), Some(expected));
}

#[test]
fn unknown_path_is_404_with_canonical_body() {
    let mut app = App::new();
    app.router()
        .get("/known", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "known");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.get("/unknown");
    assert_status(&res, 404);
    assert_eq!(res.json().unwrap(), json!({"error": "Not found"}));
    assert_eq!(res.header("Allow"), None);
}

#[test]
fn wrong_method_is_405_with_allow_and_empty_body() {
    let mut app = App::new();
    app.router()
        .get("/things", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "list");
            Ok(())
        })
        .unwrap();
    app.router()
        .post("/things", |_req, res, _ctx| async move {
            res.send_text(StatusCode::CREATED, "made");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.delete("/things");
    assert_status(&res, 405);
    assert_eq!(res.header("Allow"), Some("GET, HEAD, POST, OPTIONS"));
    assert!(res.body().is_empty());
}

#[test]
fn unbound_options_gets_synthesized_204() {
    let mut app = App::new();
    app.router()
        .get("/things", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "list");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.options("/things");
    assert_status(&res, 204);
    assert_eq!(res.header("Allow"), Some("GET, HEAD, OPTIONS"));
    assert!(res.body().is_empty());
}

#[test]
fn explicit_options_binding_overrides_synthesis() {
    let mut app = App::new();
    app.router()
        .options("/things", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "custom preflight");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.options("/things");
    assert_status(&res, 200);
    assert_eq!(res.text(), "custom preflight");
}

#[test]
fn head_runs_get_chain_with_suppressed_body() {
    let mut app = App::new();
    app.router()
        .get("/doc", |_req, res, _ctx| async move {
            res.send_json(StatusCode::OK, &json!({"title": "velox"}));
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let get = client.get("/doc");
    let head = client.head("/doc");

    assert_status(&head, 200);
    assert_eq!(head.header("Content-Type"), get.header("Content-Type"));
    assert!(head.body().is_empty());
    assert!(!get.body().is_empty());
}

#[test]
fn head_without_get_is_405() {
    let mut app = App::new();
    app.router()
        .post("/upload", |_req, res, _ctx| async move {
            res.send_text(StatusCode::CREATED, "stored");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.head("/upload");
    assert_status(&res, 405);
    assert_eq!(res.header("Allow"), Some("POST, OPTIONS"));
}

#[test]
fn params_and_query_reach_the_handler() {
    let mut app = App::new();
    app.router()
        .get("/users/:id/posts/:post", |_req, res, ctx| async move {
            let id = ctx.param("id").unwrap_or_default().to_string();
            let post = ctx.param("post").unwrap_or_default().to_string();
            let sort = ctx.query().get("sort").unwrap_or("none").to_string();
            res.send_json(
                StatusCode::OK,
                &json!({"id": id, "post": post, "sort": sort}),
            );
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.get("/users/42/posts/7?sort=date&tag=a%20b");
    assert_eq!(
        res.json().unwrap(),
        json!({"id": "42", "post": "7", "sort": "date"})
    );
}

#[test]
fn literal_segment_beats_parameter() {
    let mut app = App::new();
    app.router()
        .get("/users/:id", |_req, res, ctx| async move {
            let id = ctx.param("id").unwrap_or_default().to_string();
            res.send_text(StatusCode::OK, &format!("user {id}"));
            Ok(())
        })
        .unwrap();
    app.router()
        .get("/users/me", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "current user");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    assert_eq!(client.get("/users/me").text(), "current user");
    assert_eq!(client.get("/users/42").text(), "user 42");
}

#[test]
fn conflicting_param_names_fail_at_registration() {
    let mut app = App::new();
    app.router()
        .get("/files/:name", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "file");
            Ok(())
        })
        .unwrap();

    let err = app
        .router()
        .delete("/files/:id", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "gone");
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.existing_param(), "name");
    assert_eq!(err.conflicting_param(), "id");
}

#[test]
fn middleware_can_short_circuit_with_401() {
    let guard: BoxMiddleware = middleware_fn(|req, res, _ctx, next| async move {
        match req.headers().get("authorization") {
            Some(_) => next.run().await,
            None => {
                res.send_unauthorized("missing credentials");
                Ok(())
            }
        }
    });

    let mut app = App::new();
    app.router()
        .group("/secure", vec![guard], |secure| {
            secure.get("/data", |_req, res, _ctx| async move {
                res.send_text(StatusCode::OK, "secret");
                Ok(())
            })
        })
        .unwrap();

    let client = TestClient::new(app);
    let denied = client.get("/secure/data");
    assert_status(&denied, 401);
    assert_eq!(denied.text(), "missing credentials");

    let mut authed = Request::new(Method::Get, "/secure/data");
    authed.headers_mut().insert("Authorization", b"Bearer t".to_vec());
    let allowed = client.send(authed);
    assert_status(&allowed, 200);
    assert_eq!(allowed.text(), "secret");
}

#[test]
fn failing_handler_degrades_to_500() {
    let mut app = App::new();
    app.router()
        .get("/broken", |_req, _res, _ctx| async {
            Err(HandlerError::new("database unreachable"))
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.get("/broken");
    assert_status(&res, 500);
    assert_eq!(res.json().unwrap(), json!({"error": "Internal Server Error"}));
}

#[test]
fn handler_response_survives_late_error() {
    let mut app = App::new();
    app.router()
        .get("/flaky", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "already sent");
            Err(HandlerError::new("post-send failure"))
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.get("/flaky");
    assert_status(&res, 200);
    assert_eq!(res.text(), "already sent");
}

#[test]
fn nested_groups_compose_prefixes_and_middleware_order() {
    let order = Arc::new(trace::Trace::default());

    let mut app = App::new();
    let outer = order.tag("outer");
    let inner = order.tag("inner");
    let route_order = Arc::clone(&order);
    app.router()
        .group("/api", vec![outer], |api| {
            api.group("/v1", vec![inner], |v1| {
                let route_order = Arc::clone(&route_order);
                v1.get("/status", move |_req, res, _ctx| {
                    let route_order = Arc::clone(&route_order);
                    async move {
                        route_order.push("handler");
                        res.send_text(StatusCode::OK, "ok");
                        Ok(())
                    }
                })
            })
        })
        .unwrap();

    let client = TestClient::new(app);
    let res = client.get("/api/v1/status");
    assert_status(&res, 200);
    assert_eq!(order.snapshot(), vec!["outer", "inner", "handler"]);

    // The prefix applies only inside the group.
    assert_status(&client.get("/status"), 404);
}

#[test]
fn middleware_can_pass_typed_state_to_the_handler() {
    #[derive(Clone, PartialEq, Debug)]
    struct CurrentUser(String);

    let loader: BoxMiddleware = middleware_fn(|_req, _res, ctx, next| async move {
        ctx.insert_extension(CurrentUser("ada".to_string()));
        next.run().await
    });

    let mut app = App::new();
    app.router()
        .group("/me", vec![loader], |me| {
            me.get("", |_req, res, ctx| async move {
                match ctx.extension::<CurrentUser>() {
                    Some(user) => res.send_text(StatusCode::OK, &user.0),
                    None => res.send_server_error(),
                }
                Ok(())
            })
        })
        .unwrap();

    let client = TestClient::new(app);
    assert_eq!(client.get("/me").text(), "ada");
}

#[test]
fn routes_registered_through_group_are_visible_on_the_parent() {
    let mut app = App::new();
    app.router()
        .group("/admin", Vec::new(), |admin| {
            admin.post("/reload", |_req, res, _ctx| async move {
                res.send_text(StatusCode::OK, "reloaded");
                Ok(())
            })
        })
        .unwrap();
    // Sibling registration on the parent, same subtree.
    app.router()
        .get("/admin/reload", |_req, res, _ctx| async move {
            res.send_text(StatusCode::OK, "status");
            Ok(())
        })
        .unwrap();

    let client = TestClient::new(app);
    assert_eq!(client.post("/admin/reload", Vec::<u8>::new()).text(), "reloaded");
    assert_eq!(client.get("/admin/reload").text(), "status");
}

/// Tiny ordered trace shared between middleware closures.
mod trace {
    use parking_lot::Mutex;
    use std::sync::Arc;
    use velox::{BoxMiddleware, middleware_fn};

    #[derive(Default)]
    pub struct Trace {
        entries: Mutex<Vec<&'static str>>,
    }

    impl Trace {
        pub fn push(&self, label: &'static str) {
            self.entries.lock().push(label);
        }

        pub fn snapshot(&self) -> Vec<&'static str> {
            self.entries.lock().clone()
        }

        pub fn tag(self: &Arc<Self>, label: &'static str) -> BoxMiddleware {
            let trace = Arc::clone(self);
            middleware_fn(move |_req, _res, _ctx, next| {
                let trace = Arc::clone(&trace);
                async move {
                    trace.push(label);
                    next.run().await
                }
            })
        }
    }
}

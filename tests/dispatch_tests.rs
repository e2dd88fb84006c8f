//! Request lifecycle tests: method gating, authorization, throttling,
//! fault containment and response normalization, driven through
//! `Router::handle` without a socket.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use restview::{
    outcome, AuthContext, Authorizer, Call, KeyedAuthorizer, Method, NoopAuthorizer, NoopThrottle,
    Outcome, Override, Request, RequestInfo, RequestLog, Resource, Response, Router, StrictThrottle,
    Throttle,
};
use serde_json::{json, Value};

// ── Fixtures ──────────────────────────────────────────────────────────────────

struct DenyAll;

impl Authorizer for DenyAll {
    fn name(&self) -> &str { "Deny" }
    fn authenticate(&self, _req: &Request) -> Option<AuthContext> { None }
}

struct Exploding;

impl Throttle for Exploding {
    fn should_throttle(&self, _resource: &str, _mode: Override) -> bool {
        panic!("limiter offline")
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(Method, String)>>>);

impl Recorder {
    fn entries(&self) -> Vec<(Method, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl RequestLog for Recorder {
    fn record(&self, _started: Instant, info: &RequestInfo, outcome: &str) {
        self.0.lock().unwrap().push((info.method, outcome.to_owned()));
    }
}

async fn list(_call: Call) -> Outcome {
    Outcome::ok(json!([{ "id": 1 }, { "id": 2 }]))
}

async fn create(_call: Call) -> Outcome {
    Outcome::new(outcome::CREATED).with_header("Location", "/v1/items/3")
}

async fn rejecting(_call: Call) -> Outcome {
    Outcome::new(outcome::BAD_REQUEST).with_body("missing filter")
}

async fn failing(_call: Call) -> Result<Outcome, io::Error> {
    Err(io::Error::other("disk gone"))
}

async fn panicking(_call: Call) -> Outcome {
    panic!("handler bug")
}

async fn denies_object(_call: Call) -> Outcome {
    Outcome::new(outcome::UNAUTHORIZED)
}

async fn denies_with_reason(_call: Call) -> Outcome {
    Outcome::new(outcome::UNAUTHORIZED).with_body("not your item")
}

async fn whoami(call: Call) -> Outcome {
    Outcome::ok(call.auth().get_str("user_name").unwrap_or("anonymous").to_owned())
}

fn items() -> Resource {
    Resource::builder("items")
        .allow([Method::Get, Method::Post])
        .get(list)
        .post(create)
        .build()
}

fn router(resource: Resource) -> Router {
    Router::new().resource("v1", resource)
}

async fn send(router: &Router, method: Method, path: &str) -> Response {
    router.handle(Request::new(method, path)).await
}

fn text(res: &Response) -> &str {
    std::str::from_utf8(res.body()).unwrap()
}

// ── Method check ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn undeclared_verbs_get_405_with_allow() {
    let app = router(items());
    for method in [Method::Put, Method::Delete, Method::Patch, Method::Trace, Method::Connect] {
        for path in ["/v1/items/", "/v1/items/7", "/v1/items/1;3"] {
            let res = send(&app, method, path).await;
            assert_eq!(res.status_code(), 405, "{method} {path}");
            assert_eq!(res.header("allow"), Some("GET, HEAD, OPTIONS, POST"), "{method} {path}");
            assert_eq!(text(&res), "Method Not Allowed");
        }
    }
}

#[tokio::test]
async fn declared_verb_without_handler_is_501() {
    let resource = Resource::builder("items")
        .allow([Method::Get, Method::Put])
        .get(list)
        .build();
    let res = send(&router(resource), Method::Put, "/v1/items/3").await;
    assert_eq!(res.status_code(), 501);
    assert_eq!(text(&res), "Not Implemented");
}

#[tokio::test]
async fn options_ignores_auth_and_throttle() {
    let resource = Resource::builder("items")
        .allow([Method::Get, Method::Delete])
        .authorize(DenyAll)
        .throttle(StrictThrottle, Override::Inherit)
        .get(list)
        .build();
    let app = router(resource);

    for path in ["/v1/items/", "/v1/items/9"] {
        let res = send(&app, Method::Options, path).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("allow"), Some("DELETE, GET, HEAD, OPTIONS"));
        assert_eq!(text(&res), "OK");
    }
}

// ── HEAD ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn head_mirrors_get_status_without_body() {
    for handler_app in [
        router(items()),
        router(Resource::builder("items").allow([Method::Get]).get(rejecting).build()),
        router(Resource::builder("items").allow([Method::Get]).get(failing).build()),
    ] {
        let get = send(&handler_app, Method::Get, "/v1/items/").await;
        let head = send(&handler_app, Method::Head, "/v1/items/").await;
        assert_eq!(head.status_code(), get.status_code());
        assert!(!get.body().is_empty());
        assert!(head.body().is_empty());
    }
}

#[tokio::test]
async fn head_without_get_is_not_allowed() {
    let resource = Resource::builder("items").allow([Method::Post]).post(create).build();
    let res = send(&router(resource), Method::Head, "/v1/items/").await;
    assert_eq!(res.status_code(), 405);
    assert_eq!(res.header("allow"), Some("HEAD, OPTIONS, POST"));
}

#[tokio::test]
async fn head_with_unimplemented_get_is_501() {
    let resource = Resource::builder("items").allow([Method::Get]).build();
    let res = send(&router(resource), Method::Head, "/v1/items/").await;
    assert_eq!(res.status_code(), 501);
}

#[tokio::test]
async fn explicit_head_handler_wins() {
    let resource = Resource::builder("items")
        .allow([Method::Get])
        .get(list)
        .head(create)
        .build();
    let res = send(&router(resource), Method::Head, "/v1/items/").await;
    assert_eq!(res.status_code(), 201);
    assert_eq!(res.header("location"), Some("/v1/items/3"));
}

// ── Authorization ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_auth_sends_the_challenge() {
    let resource = Resource::builder("items")
        .allow([Method::Get])
        .authorize(DenyAll)
        .get(panicking)
        .build();
    let res = send(&router(resource), Method::Get, "/v1/items/").await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.header("www-authenticate"), Some("Deny"));
    assert_eq!(text(&res), "Unauthorized");
}

#[tokio::test]
async fn auth_context_reaches_the_handler() {
    let resource = Resource::builder("me")
        .allow([Method::Get])
        .authorize(KeyedAuthorizer::example())
        .get(whoami)
        .build();
    let app = router(resource);

    let req = Request::new(Method::Get, "/v1/me/")
        .with_header("Authorization", "ExampleAuth not-so-random-access-key-123456");
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(text(&res), "Jane");

    let req = Request::new(Method::Get, "/v1/me/").with_header("Authorization", "OnlyOneToken");
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.header("www-authenticate"), Some("ExampleAuth"));
}

#[tokio::test]
async fn handler_level_denial_uses_the_challenge() {
    let resource = Resource::builder("items")
        .allow([Method::Get, Method::Delete])
        .get(denies_object)
        .delete(denies_with_reason)
        .build();
    let app = router(resource);

    let res = send(&app, Method::Get, "/v1/items/4").await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.header("www-authenticate"), Some("Noop"));

    // With a body the outcome goes through the regular mapping.
    let res = send(&app, Method::Delete, "/v1/items/4").await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.header("www-authenticate"), None);
    assert_eq!(text(&res), "not your item");
}

// ── Throttling ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn strict_throttle_without_override_rejects() {
    let resource = Resource::builder("items")
        .allow([Method::Get, Method::Post])
        .throttle(StrictThrottle, Override::Inherit)
        .throttle_for(Method::Get, StrictThrottle, Override::Off)
        .get(list)
        .post(create)
        .build();
    let app = router(resource);

    let res = send(&app, Method::Post, "/v1/items/").await;
    assert_eq!(res.status_code(), 503);
    assert_eq!(text(&res), "Service Unavailable");

    let res = send(&app, Method::Get, "/v1/items/").await;
    assert_eq!(res.status_code(), 200);
}

#[tokio::test]
async fn noop_throttle_lets_everything_through() {
    let resource = Resource::builder("items")
        .allow([Method::Get])
        .throttle(NoopThrottle, Override::On)
        .get(list)
        .build();
    assert_eq!(send(&router(resource), Method::Get, "/v1/items/").await.status_code(), 200);
}

// ── Fault containment ─────────────────────────────────────────────────────────

#[tokio::test]
async fn handler_errors_become_500() {
    let resource = Resource::builder("items").allow([Method::Get]).get(failing).build();
    let res = send(&router(resource), Method::Get, "/v1/items/").await;
    assert_eq!(res.status_code(), 500);
    assert_eq!(text(&res), "Internal Server Error");
}

#[tokio::test]
async fn handler_panics_become_500() {
    let resource = Resource::builder("items").allow([Method::Get]).get(panicking).build();
    let res = send(&router(resource), Method::Get, "/v1/items/").await;
    assert_eq!(res.status_code(), 500);
}

#[tokio::test]
async fn dispatcher_faults_become_500() {
    let resource = Resource::builder("items")
        .allow([Method::Get])
        .throttle(Exploding, Override::Inherit)
        .get(list)
        .build();
    let app = router(resource);

    let res = send(&app, Method::Get, "/v1/items/").await;
    assert_eq!(res.status_code(), 500);
    assert_eq!(text(&res), "Internal Server Error");

    // The router keeps serving afterwards.
    assert_eq!(send(&app, Method::Options, "/v1/items/").await.status_code(), 200);
}

// ── Normalization ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn outcome_headers_and_json_bodies_are_kept() {
    let app = router(items());

    let res = send(&app, Method::Post, "/v1/items/").await;
    assert_eq!(res.status_code(), 201);
    assert_eq!(res.header("location"), Some("/v1/items/3"));
    assert_eq!(text(&res), "Created");

    let res = send(&app, Method::Get, "/v1/items/").await;
    assert_eq!(res.header("content-type"), Some("application/json; charset=utf-8"));
    let body: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body, json!([{ "id": 1 }, { "id": 2 }]));
}

#[tokio::test]
async fn debug_mode_reports_processing_time() {
    let res = send(&router(items()).debug(true), Method::Get, "/v1/items/").await;
    let elapsed: f64 = res.header("processing-time").unwrap().parse().unwrap();
    assert!(elapsed >= 0.0);

    let res = send(&router(items()), Method::Get, "/v1/items/").await;
    assert_eq!(res.header("processing-time"), None);
}

#[tokio::test]
async fn every_request_is_logged_once_with_its_outcome() {
    let recorder = Recorder::default();
    let resource = Resource::builder("items")
        .allow([Method::Get, Method::Post])
        .authorize_for(Method::Post, DenyAll)
        .authorize_for(Method::Get, NoopAuthorizer)
        .get(list)
        .build();
    let app = router(resource).log(recorder.clone());

    send(&app, Method::Get, "/v1/items/").await;
    send(&app, Method::Post, "/v1/items/").await;
    send(&app, Method::Delete, "/v1/items/2").await;
    send(&app, Method::Options, "/v1/items/").await;
    // Unrouted requests never reach the hook.
    send(&app, Method::Get, "/v1/items/1;x").await;

    assert_eq!(
        recorder.entries(),
        vec![
            (Method::Get, outcome::ALL_OK.to_owned()),
            (Method::Post, outcome::UNAUTHORIZED.to_owned()),
            (Method::Delete, outcome::NOT_ALLOWED.to_owned()),
            (Method::Options, outcome::ALL_OK.to_owned()),
        ]
    );
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_paths_are_404() {
    let app = router(items());
    assert_eq!(send(&app, Method::Get, "/v1/nothing/").await.status_code(), 404);
    assert_eq!(send(&app, Method::Get, "/v2/items/").await.status_code(), 404);
    assert_eq!(send(&app, Method::Get, "/v1/items/not-a-number").await.status_code(), 404);
}

#[tokio::test]
async fn malformed_ranges_do_not_match() {
    let app = router(items());
    for path in ["/v1/items/1;x", "/v1/items/;", "/v1/items/a;5"] {
        assert_eq!(send(&app, Method::Get, path).await.status_code(), 404, "{path}");
    }
}

#[tokio::test]
async fn well_formed_ranges_still_go_through_auth() {
    let resource = Resource::builder("items")
        .allow([Method::Delete])
        .authorize(KeyedAuthorizer::example())
        .delete(create)
        .build();
    let app = router(resource);

    let res = send(&app, Method::Delete, "/v1/items/1;5").await;
    assert_eq!(res.status_code(), 401);
    assert_eq!(res.header("www-authenticate"), Some("ExampleAuth"));

    let res = send(&app, Method::Delete, "/v1/items/1;x").await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn oversized_windows_are_400() {
    async fn count(call: Call) -> Outcome {
        match call.window() {
            Some(window) => Outcome::ok(json!(window.end - window.start)),
            None => Outcome::new(outcome::BAD_REQUEST),
        }
    }
    let resource = Resource::builder("items")
        .allow([Method::Get])
        .max_window(10)
        .get(count)
        .build();
    let app = router(resource);

    let res = send(&app, Method::Get, "/v1/items/1;11").await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(text(&res), "10");

    assert_eq!(send(&app, Method::Get, "/v1/items/1;12").await.status_code(), 400);
    assert_eq!(send(&app, Method::Get, "/v1/items/1;100000000000").await.status_code(), 400);
}

//! `rest_example`, version 1: a single read-only object.

use serde_json::json;

use crate::auth::NoopAuthorizer;
use crate::call::Call;
use crate::method::Method;
use crate::outcome::Outcome;
use crate::resource::Resource;
use crate::throttle::{Override, StrictThrottle};

pub fn resource() -> Resource {
    Resource::builder("rest_example")
        .allow([Method::Get])
        .authorize(NoopAuthorizer)
        .throttle(StrictThrottle, Override::Off)
        .collection_only()
        .get(get)
        .build()
}

async fn get(_call: Call) -> Outcome {
    Outcome::ok(json!({
        "example_obj_id": 1,
        "example_obj_data": "API v1 example handler text data",
    }))
}

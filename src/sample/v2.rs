//! `rest_example`, version 2: a generated collection of example objects.
//!
//! | request | outcome |
//! |---|---|
//! | `GET /v2/rest_example/` | objects 0..4 (default window of 5) |
//! | `GET /v2/rest_example/{lower};{upper}` | objects `lower-1 .. upper-1`, at most 100 |
//! | `GET /v2/rest_example/{id}` | one object |
//! | `POST /v2/rest_example/` | `CREATED`, body = caller's user name |
//! | `PUT /v2/rest_example/{id}` | the object as `GET` shows it |
//! | `DELETE /v2/rest_example/{id}` | `DELETED` |
//!
//! `GET` is open; every other verb needs `ExampleAuth`. Nothing is stored:
//! writes are acknowledged and forgotten.

use serde::Serialize;
use thiserror::Error;

use crate::auth::{KeyedAuthorizer, NoopAuthorizer};
use crate::call::{Call, ResourceId, Target};
use crate::method::Method;
use crate::outcome::{self, Outcome};
use crate::resource::{IdKind, Resource};
use crate::throttle::{Override, StrictThrottle};

pub const DEFAULT_WINDOW: i64 = 5;
pub const MAX_WINDOW: i64 = 100;

pub fn resource() -> Resource {
    Resource::builder("rest_example")
        .allow([Method::Get, Method::Post, Method::Put, Method::Delete])
        .authorize(KeyedAuthorizer::example())
        .authorize_for(Method::Get, NoopAuthorizer)
        .throttle(StrictThrottle, Override::Off)
        .throttle_for(Method::Get, StrictThrottle, Override::Off)
        .id_kind(IdKind::Int)
        .default_window(DEFAULT_WINDOW)
        .max_window(MAX_WINDOW)
        .get(get)
        .post(post)
        .put(put)
        .delete(delete)
        .build()
}

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("auth context has no `{0}`")]
    MissingClaim(&'static str),

    #[error("encoding response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ExampleObject {
    example_obj_id: ResourceId,
    example_obj_data: String,
}

impl ExampleObject {
    fn new(id: ResourceId) -> Self {
        let example_obj_data = format!("API v2 example handler text data for ID {id}");
        Self { example_obj_id: id, example_obj_data }
    }
}

async fn get(call: Call) -> Result<Outcome, SampleError> {
    read(&call)
}

fn read(call: &Call) -> Result<Outcome, SampleError> {
    if let Some(id) = call.id() {
        return Ok(Outcome::json(outcome::ALL_OK, &ExampleObject::new(id.clone()))?);
    }
    let Some(window) = call.window() else {
        return Ok(Outcome::new(outcome::BAD_REQUEST));
    };
    let objects: Vec<_> = window.map(|i| ExampleObject::new(ResourceId::Int(i))).collect();
    Ok(Outcome::json(outcome::ALL_OK, &objects)?)
}

async fn post(call: Call) -> Result<Outcome, SampleError> {
    if *call.target() != Target::Collection {
        return Ok(Outcome::new(outcome::BAD_REQUEST));
    }
    let user = call.auth()
        .get_str("user_name")
        .ok_or(SampleError::MissingClaim("user_name"))?;
    Ok(Outcome::new(outcome::CREATED).with_body(user))
}

async fn put(call: Call) -> Result<Outcome, SampleError> {
    if call.id().is_none() {
        return Ok(Outcome::new(outcome::BAD_REQUEST));
    }
    read(&call)
}

async fn delete(call: Call) -> Outcome {
    if call.id().is_none() {
        return Outcome::new(outcome::BAD_REQUEST);
    }
    Outcome::new(outcome::DELETED)
}

//! The sample API — two versions of `rest_example` plus `/ping`.
//!
//! Run with:
//!   RUST_LOG=info RESTVIEW_DEBUG=1 cargo run --example sample_api
//!
//! Try:
//!   curl -i http://localhost:3000/ping
//!   curl -i http://localhost:3000/v1/rest_example/
//!   curl -i http://localhost:3000/v2/rest_example/
//!   curl -i 'http://localhost:3000/v2/rest_example/2;6'
//!   curl -i http://localhost:3000/v2/rest_example/42
//!   curl -i -X OPTIONS http://localhost:3000/v2/rest_example/
//!   curl -i -X POST http://localhost:3000/v2/rest_example/ \
//!        -H 'Authorization: ExampleAuth not-so-random-access-key-qwerty'
//!   curl -i -X DELETE http://localhost:3000/v2/rest_example/42   # 401, no key

use restview::{sample, Config, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), restview::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let app = sample::router(&config);

    Server::from_config(&config).serve(app).await
}

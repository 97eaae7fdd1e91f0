//! AWS Lambda handler for the outrights HTTP surface
//!
//! Every route is served by [`Api::handle`]; this adapter only converts the
//! Lambda request and response shapes. Supports Lambda Function URLs.

use std::sync::Arc;

use funds_outrights::api::{Api, ApiResponse, CORS_HEADERS};
use funds_outrights::AppConfig;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::info;

fn to_response(reply: ApiResponse) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(reply.status)
        .header("Content-Type", reply.content_type);

    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }

    if let Some(file_name) = &reply.attachment {
        builder = builder.header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        );
    }

    let body = if reply.is_json() {
        Body::Text(String::from_utf8_lossy(&reply.body).into_owned())
    } else {
        Body::Binary(reply.body)
    };

    Ok(builder.body(body)?)
}

/// Lambda handler function
async fn handler(api: &Api, event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    let body = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let method = event.method().as_str();
    let path = event.uri().path();
    let reply = api.handle(method, path, &body);

    info!(
        "{} {} -> {} in {}ms",
        method,
        path,
        reply.status,
        start.elapsed().as_millis()
    );
    to_response(reply)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = AppConfig::from_env();
    info!(
        "Serving {} with cases at {}",
        config.year,
        config.cases_path.display()
    );
    let api = Arc::new(Api::new(config));

    run(service_fn(move |event: Request| {
        let api = Arc::clone(&api);
        async move { handler(&api, event).await }
    }))
    .await
}

//! Route dispatch for the metrics server.
//!
//! | Method | Path                            | Success            |
//! |--------|---------------------------------|--------------------|
//! | POST   | `/update/{kind}/{name}/{value}` | 200, empty         |
//! | GET    | `/value/{kind}/{name}`          | 200, scalar        |
//! | GET    | `/`                             | 200, HTML listing  |

use crate::protocol::{render_listing, render_value, route, Route};
use crate::storage::Storage;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use tracing::debug;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Handle an incoming request. Never fails; every outcome is a response.
pub async fn handle_request<B>(
    req: Request<B>,
    storage: &dyn Storage,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = respond(req.method(), req.uri().path(), storage);

    debug!(
        method = %req.method(),
        path = %req.uri().path(),
        status = response.status().as_u16(),
        "handled request"
    );

    Ok(response)
}

/// Build the response for a method and path against `storage`.
pub fn respond(method: &Method, path: &str, storage: &dyn Storage) -> Response<Full<Bytes>> {
    match route(path) {
        Route::Update { kind, name, value } => {
            if method != Method::POST {
                return method_not_allowed("POST");
            }
            match storage.update(kind, name, value) {
                Ok(()) => response(StatusCode::OK, None, Bytes::new()),
                Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
            }
        }
        Route::Value { kind, name } => {
            if method != Method::GET {
                return method_not_allowed("GET");
            }
            match render_value(storage, kind, name) {
                Ok(body) => response(StatusCode::OK, Some(TEXT_PLAIN), Bytes::from(body)),
                Err(e) => error_response(StatusCode::NOT_FOUND, &e.to_string()),
            }
        }
        Route::Index => {
            if method != Method::GET {
                return method_not_allowed("GET");
            }
            let body = render_listing(&storage.get_metrics());
            response(StatusCode::OK, Some(TEXT_HTML), Bytes::from(body))
        }
        Route::NotFound => error_response(StatusCode::NOT_FOUND, "404 page not found"),
    }
}

fn response(
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Bytes,
) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body));
    *resp.status_mut() = status;
    if let Some(content_type) = content_type {
        resp.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    resp
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    response(status, Some(TEXT_PLAIN), Bytes::from(format!("{}\n", message)))
}

fn method_not_allowed(allow: &'static str) -> Response<Full<Bytes>> {
    let mut resp = error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
    resp.headers_mut()
        .insert(ALLOW, HeaderValue::from_static(allow));
    resp
}

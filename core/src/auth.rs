//! Authorized fetch: one outbound call with the API's auth header.
//!
//! Both helpers set `Authorization: BootDev <token>`, send the request
//! through a `Transport`, treat any status above 299 as failure and return
//! the full response body. The response is dropped on every exit path,
//! which releases the connection.

use std::io::Read;

use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::http::{HttpRequest, Transport};

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "BootDev";

const JSON: &str = "application/json";

pub fn authorization_value(token: &str) -> String {
    format!("{AUTH_SCHEME} {token}")
}

/// Send `request` with the auth header and return the raw body.
pub fn fetch<T>(transport: &T, mut request: HttpRequest, token: &str) -> ApiResult<Vec<u8>>
where
    T: Transport + ?Sized,
{
    request.set_header("Authorization", authorization_value(token));
    execute(transport, request)
}

/// Like [`fetch`], but first encodes `payload` as the JSON request body.
pub fn fetch_with_payload<T, P>(
    transport: &T,
    mut request: HttpRequest,
    token: &str,
    payload: &P,
) -> ApiResult<Vec<u8>>
where
    T: Transport + ?Sized,
    P: Serialize + ?Sized,
{
    request.set_header("Authorization", authorization_value(token));
    request.set_header("Content-Type", JSON);
    request.set_header("Accept", JSON);
    request.body = Some(serde_json::to_vec(payload).map_err(ApiError::Serialization)?);
    execute(transport, request)
}

fn execute<T>(transport: &T, request: HttpRequest) -> ApiResult<Vec<u8>>
where
    T: Transport + ?Sized,
{
    let method = request.method;
    let mut response = transport.send(request)?;

    if response.status > 299 {
        debug!(method = method.as_str(), status = response.status, "rejecting response");
        return Err(ApiError::HttpStatus {
            status: response.status,
        });
    }

    let mut body = Vec::new();
    response.body.read_to_end(&mut body)?;
    Ok(body)
}

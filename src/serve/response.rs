//! Conversion of middleware responses to `tiny_http` responses.

use crate::error::AssetError;
use crate::response::{Body, HttpResponse};
use crate::utils::mime::{self, types::PLAIN};
use anyhow::{Result, anyhow};
use std::io::{self, ErrorKind, Read};
use tiny_http::{Header, Request, Response, StatusCode};

/// Send `response` as the answer to `request`.
pub fn respond(request: Request, response: HttpResponse) -> Result<()> {
    let headers = build_headers(&response.headers)?;
    let (reader, len) = body_reader(response.body);

    let response = Response::new(StatusCode(response.status), headers, reader, Some(len), None);
    request.respond(response)?;
    Ok(())
}

/// Reader and length for an outbound body.
///
/// Bodiless responses get an explicit zero length. `tiny_http` always frames
/// a response, either with `Content-Length` or chunked encoding, so a 304 goes
/// out with `Content-Length: 0` and no body bytes.
fn body_reader(body: Option<Body>) -> (Box<dyn Read + Send>, usize) {
    match body {
        Some(body) => {
            let len = usize::try_from(body.len()).unwrap_or(usize::MAX);
            (body.into_reader(), len)
        }
        None => (Box::new(io::empty()), 0),
    }
}

/// Convert header pairs, leaving `Content-Length` to `tiny_http`, which
/// derives it from the body.
pub fn build_headers(headers: &[(String, String)]) -> Result<Vec<Header>> {
    headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Length"))
        .map(|(name, value)| {
            Header::from_bytes(name.as_bytes(), value.as_bytes())
                .map_err(|()| anyhow!("invalid header `{name}: {value}`"))
        })
        .collect()
}

/// Default handler for requests the middleware passes through.
pub fn not_found(_: &Request) -> HttpResponse {
    plain(404, "404 Not Found")
}

/// Status code for an asset that matched but could not be served.
pub fn status_for(error: &AssetError) -> u16 {
    match error {
        AssetError::DisallowedMediaType { .. } => 403,
        AssetError::AssetRead { source, .. } if source.kind() == ErrorKind::NotFound => 404,
        AssetError::AssetRead { source, .. } if source.kind() == ErrorKind::PermissionDenied => {
            403
        }
        _ => 500,
    }
}

/// Plain-text error response. Paths are not exposed to the client.
pub fn error_response(error: &AssetError) -> HttpResponse {
    let status = status_for(error);
    let message = match status {
        403 => "403 Forbidden",
        404 => "404 Not Found",
        _ => "500 Internal Server Error",
    };
    plain(status, message)
}

fn plain(status: u16, message: &str) -> HttpResponse {
    HttpResponse::new(status)
        .with_header("Content-Type", mime::content_type(PLAIN))
        .with_body(Body::Bytes(message.as_bytes().to_vec()))
}

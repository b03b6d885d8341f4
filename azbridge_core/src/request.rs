/*
 * Copyright (c) 2025 William Stadtwald Demchick <william.demchick@gmail.com>
 *
 * Permission to use, copy, modify, and distribute this software for any
 * purpose with or without fee is hereby granted, provided that the above
 * copyright notice and this permission notice appear in all copies.
 *
 * THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHOR DISCLAIMS ALL WARRANTIES
 * WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
 * MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR
 * ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
 * WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
 * ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
 * OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.
 */

use http::{Method, Request, Uri};
use thiserror::Error;

use crate::headers::{translate_headers, InvalidHeader};
use crate::platform::{PlatformRequest, ORIGINAL_URL_HEADER};

/// The platform request lacks the original URL header, which means the
/// function app (or whatever proxies to it) is not set up to forward it.
#[derive(Clone, Copy, Debug, Error)]
#[error("Deployment misconfigured: request has no x-ms-original-url header")]
pub struct MissingOriginalUrl;

#[derive(Clone, Debug, Error)]
pub enum InvalidPlatformRequest {
    #[error("{0}")]
    Misconfigured(#[source] #[from] MissingOriginalUrl),

    #[error("Original URL {0:?} is not an absolute URL")]
    InvalidOriginalUrl(String),

    #[error("Request method {0:?} is not a valid HTTP method")]
    InvalidMethod(String),

    #[error("{0}")]
    InvalidHeader(#[source] #[from] InvalidHeader)
}

/// Generic request as consumed by request handlers.
pub type GenericRequest = Request<Vec<u8>>;

// Same set the fetch standard normalizes to upper case.
const NORMALIZED_METHODS: [Method; 6] = [Method::DELETE, Method::GET, Method::HEAD, Method::OPTIONS, Method::POST, Method::PUT];

/// Resolves the platform's method string. Missing or empty means GET.
pub fn resolve_method(method: Option<&str>) -> Result<Method, InvalidPlatformRequest> {
    let method =
        match method {
            Some(method) if method.len() > 0 => method,
            _ => return Ok(Method::GET)
        };

    if let Some(normalized) = NORMALIZED_METHODS.iter().find(|x| x.as_str().eq_ignore_ascii_case(method)) {
        Ok(normalized.clone())
    } else {
        Method::from_bytes(method.as_bytes()).map_err(|_| InvalidPlatformRequest::InvalidMethod(method.to_owned()))
    }
}

fn method_allows_body(method: &Method) -> bool {
    method != Method::GET && method != Method::HEAD
}

/// Turns a platform request into a generic request.
///
/// The body is only carried over when it is non-empty and the method is
/// neither GET nor HEAD.
pub fn translate_request(platform_request: &PlatformRequest) -> Result<GenericRequest, InvalidPlatformRequest> {
    let url =
        match platform_request.headers.get(ORIGINAL_URL_HEADER) {
            Some(url) if url.len() > 0 => url,
            _ => Err(MissingOriginalUrl)?
        };

    let uri: Uri = url.parse().map_err(|_| InvalidPlatformRequest::InvalidOriginalUrl(url.to_owned()))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        Err(InvalidPlatformRequest::InvalidOriginalUrl(url.to_owned()))?
    }
    let method = resolve_method(platform_request.method.as_deref())?;
    let headers = translate_headers(&platform_request.headers)?;

    let body =
        match platform_request.body {
            Some(ref body) if body.len() > 0 && method_allows_body(&method) => body.as_bytes().to_owned(),
            _ => Vec::new()
        };

    let mut request = Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.headers_mut() = headers;

    Ok(request)
}

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

use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::platform::PlatformHeaders;

#[derive(Clone, Debug, Error)]
pub enum InvalidHeader {
    #[error("Header name {0:?} is not a valid HTTP header name")]
    Name(String),

    #[error("Header {0:?} has a value which is not valid in HTTP")]
    Value(String)
}

/// Builds a generic header map from platform headers.
///
/// Entries without a value, or with an empty value, are dropped. Later
/// entries overwrite earlier ones with the same (case-insensitive) name.
pub fn translate_headers(platform_headers: &PlatformHeaders) -> Result<HeaderMap, InvalidHeader> {
    let mut headers = HeaderMap::with_capacity(platform_headers.len());

    for (name, value) in platform_headers.iter() {
        let value =
            match value {
                Some(value) if value.len() > 0 => value,
                _ => continue
            };

        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| InvalidHeader::Name(name.to_owned()))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| InvalidHeader::Value(name.to_owned()))?;

        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Flattens a generic header map into plain name/value pairs. Repeated
/// headers are joined with ", " in the order they were added.
pub fn extract_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut extracted = BTreeMap::new();

    for name in headers.keys() {
        let joined =
            headers.get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<String>>()
                .join(", ");
        extracted.insert(name.as_str().to_owned(), joined);
    }

    extracted
}

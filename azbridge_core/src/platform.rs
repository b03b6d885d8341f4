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

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Formatter;

/// Header carrying the URL the client originally requested. The Functions
/// platform does not expose the URL any other way.
pub const ORIGINAL_URL_HEADER: &'static str = "x-ms-original-url";

/// Header map as handed over by the platform. Names are kept verbatim and
/// values may be missing. Entries keep the order they were set in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlatformHeaders(Vec<(String, Option<String>)>);

impl PlatformHeaders {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets `name`, replacing an entry with exactly the same name.
    pub fn insert<N: Into<String>>(&mut self, name: N, value: Option<String>) -> () {
        let name = name.into();
        if let Some(entry) = self.0.iter_mut().find(|(existing, _)| existing == &name) {
            entry.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    pub fn with<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Case-insensitive lookup. When several entries match, the last one set wins.
    pub fn get<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.0.iter()
            .rev()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for PlatformHeaders {
    fn from_iter<T: IntoIterator<Item = (N, Option<String>)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl Serialize for PlatformHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct PlatformHeadersVisitor;

impl<'de> Visitor<'de> for PlatformHeadersVisitor {
    type Value = PlatformHeaders;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a map of header names to optional strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PlatformHeaders, A::Error> {
        let mut headers = PlatformHeaders::new();
        while let Some((name, value)) = access.next_entry::<String, Option<String>>()? {
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl<'de> Deserialize<'de> for PlatformHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PlatformHeadersVisitor)
    }
}

/// HTTP request in the shape the Functions platform delivers it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PlatformRequest {
    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub headers: PlatformHeaders,

    #[serde(default)]
    pub body: Option<String>
}

impl PlatformRequest {
    pub fn new(original_url: &str) -> Self {
        Self {
            method: None,
            headers: PlatformHeaders::new().with(ORIGINAL_URL_HEADER, original_url),
            body: None
        }
    }

    pub fn with_method<M: Into<String>>(mut self, method: M) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.insert(name, Some(value.into()));
        self
    }

    pub fn with_body<B: Into<String>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP response in the shape the Functions platform expects back.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PlatformResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String
}

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

mod adapter;
mod handler;

pub use crate::adapter::{translate_response, Adapter, AdapterError, AdapterSettings, BoxError, LoadContextFn};
pub use crate::handler::{handler_fn, HandlerFn, RequestHandler, ServerBuild};
pub use azbridge_core::invocation::InvocationContext;
pub use azbridge_core::mode::Mode;
pub use azbridge_core::platform::{PlatformHeaders, PlatformRequest, PlatformResponse, ORIGINAL_URL_HEADER};
pub use azbridge_core::request::{GenericRequest, InvalidPlatformRequest, MissingOriginalUrl};

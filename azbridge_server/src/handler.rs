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

use azbridge_core::mode::Mode;
use azbridge_core::request::GenericRequest;
use http::Response;
use http_body::Body;

use crate::adapter::BoxError;

/// Produces responses for generic requests. This is the one thing the
/// adapter needs from a web framework.
pub trait RequestHandler<C>: Send + Sync {
    type ResponseBody: Body<Data: Send, Error: Into<BoxError>> + Send;

    fn handle_request(&self, request: GenericRequest, load_context: Option<C>) -> impl Future<Output = anyhow::Result<Response<Self::ResponseBody>>> + Send;
}

/// A compiled application which can be turned into a request handler
/// for a given mode.
pub trait ServerBuild<C> {
    type Handler: RequestHandler<C>;

    fn create_request_handler(self, mode: Mode) -> Self::Handler;
}

#[derive(Clone, Copy, Debug)]
pub struct HandlerFn<F>(F);

/// Wraps an async function as a request handler. The result is its own
/// server build and ignores the mode.
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

impl<C, F, Fut, B> RequestHandler<C> for HandlerFn<F>
where
    F: Fn(GenericRequest, Option<C>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Response<B>>> + Send,
    B: Body<Data: Send, Error: Into<BoxError>> + Send
{
    type ResponseBody = B;

    fn handle_request(&self, request: GenericRequest, load_context: Option<C>) -> impl Future<Output = anyhow::Result<Response<B>>> + Send {
        (self.0)(request, load_context)
    }
}

impl<C, F> ServerBuild<C> for HandlerFn<F>
where
    HandlerFn<F>: RequestHandler<C>
{
    type Handler = Self;

    fn create_request_handler(self, _mode: Mode) -> Self {
        self
    }
}

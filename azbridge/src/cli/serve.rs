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

use clap::Args;
use std::net::{IpAddr, SocketAddr};

use axum::serve;
use azbridge_axum::*;
use tokio::net::TcpListener;

use crate::diagnostics;

#[derive(Clone, Debug)]
#[derive(Args)]
pub struct Serve {
    /// What address to listen for invocations on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// What port to listen for invocations on (the Functions host sets this)
    #[arg(long, default_value_t = 3000, env = "FUNCTIONS_CUSTOMHANDLER_PORT")]
    pub port: u16,

    /// Mode to run the application in: development, production or test
    #[arg(long, default_value = "production", env = "AZBRIDGE_MODE")]
    pub mode: Mode,

    /// Name of the HTTP trigger input binding in function.json
    #[arg(long, default_value = "req")]
    pub request_binding: String,

    /// Name of the HTTP output binding in function.json
    #[arg(long, default_value = "res")]
    pub response_binding: String,

    /// Use the trigger URL when requests arrive without x-ms-original-url
    #[arg(long)]
    pub original_url_fallback: bool
}

impl Serve {
    pub fn run(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        rt.block_on(self.serve())
    }

    async fn serve(self) -> anyhow::Result<()> {
        if self.request_binding.len() < 1 {
            Err(anyhow::anyhow!("Request binding name must not be empty"))
        } else if self.response_binding.len() < 1 {
            Err(anyhow::anyhow!("Response binding name must not be empty"))
        } else {
            let adapter =
                AdapterSettings::new(RouterBuild(diagnostics::router()))
                    .with_load_context(diagnostics::load_session)
                    .with_mode(self.mode)
                    .build_adapter();

            let mut settings =
                InvocationSettings::new()
                    .with_request_binding(self.request_binding)
                    .with_response_binding(self.response_binding);

            if self.original_url_fallback {
                settings = settings.with_original_url_fallback();
            }

            let listen = SocketAddr::new(self.host, self.port);
            let listener = TcpListener::bind(listen).await?;

            tracing::info!(%listen, mode = %self.mode, "listening for invocations");

            serve(listener, invocation_router(adapter, settings)).await?;

            Ok(())
        }
    }
}

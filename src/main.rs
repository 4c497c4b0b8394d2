// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::process::ExitCode;

use aircon_bridge::Config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let config = Config::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    tracing::debug!(?config, "Configuration loaded");

    match aircon_bridge::server::serve(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

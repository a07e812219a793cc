// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, sync::Arc};

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use ses_event_logs::{config::Config, log_store::CloudWatchLogStore, report_server::ReportServer};

#[tokio::main]
pub async fn main() {
    let log_level = env::var("SES_LOGS_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!(
        "h2=off,hyper=off,rustls=off,aws_smithy_runtime=off,aws_config=off,{}",
        log_level
    );

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Error creating config on SES report server startup: {e}");
            return;
        }
    };

    // no retries: a failed read ends that stream, a failed listing fails the request
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .retry_config(RetryConfig::disabled());
    if let Some(endpoint_url) = &config.endpoint_url {
        debug!("Using CloudWatch Logs endpoint {endpoint_url}");
        loader = loader.endpoint_url(endpoint_url);
    }
    let sdk_config = loader.load().await;
    let client = aws_sdk_cloudwatchlogs::Client::new(&sdk_config);
    let log_store = Arc::new(CloudWatchLogStore::new(client));

    let report_server = ReportServer {
        config: Arc::clone(&config),
        log_store,
    };

    if let Err(e) = report_server.start_report_server().await {
        error!("Error when running SES report server: {e:?}");
    }
}

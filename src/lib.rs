use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

pub mod channel;
pub mod config;
pub mod dialog;
pub mod metrics;
pub mod render;
pub mod session;
pub mod telegram;

use crate::config::{BotConfig, Transport};
use crate::dialog::{Command, DialogController, SystemClock};
use crate::render::CertificateRenderer;
use crate::session::MemorySessionStore;
use crate::telegram::webhook::{self, WebhookState};
use crate::telegram::{polling, TelegramClient};

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BotConfig::from_env().context("Failed to load configuration")?;

    let http_client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(900))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;
    let telegram = Arc::new(TelegramClient::new(
        http_client,
        &config.api_url,
        &config.bot_token,
    ));

    let renderer = CertificateRenderer::new(config.template_path.clone(), config.output_dir.clone());
    if !renderer.template_path().exists() {
        log::warn!(
            "Template {} not found; certificate requests will fail until it is provided",
            renderer.template_path().display()
        );
    }

    let controller = Arc::new(DialogController::new(
        Arc::new(MemorySessionStore::new(config.session_idle_timeout)),
        telegram.clone(),
        Arc::new(renderer),
        Arc::new(SystemClock),
        config.session_idle_timeout,
    ));

    if let Err(e) = telegram.set_my_commands(&Command::MENU).await {
        log::warn!("Failed to register command menu: {}", e);
    }

    match config.transport {
        Transport::Webhook {
            public_url,
            secret_token,
            listen_addr,
            port,
        } => {
            telegram
                .set_webhook(&public_url, secret_token.as_deref())
                .await
                .context("Failed to register webhook")?;

            let path = webhook::webhook_path(&public_url);
            let state = web::Data::new(WebhookState::new(controller, secret_token));

            log::info!(
                "Webhook registered at {}, listening on {}:{}{}",
                public_url,
                listen_addr,
                port,
                path
            );

            HttpServer::new(move || {
                App::new()
                    .app_data(state.clone())
                    .configure(|cfg| webhook::config(cfg, &path))
            })
            .bind((listen_addr.as_str(), port))?
            .run()
            .await?;
        }
        Transport::Polling { timeout_secs } => {
            telegram
                .delete_webhook()
                .await
                .context("Failed to remove webhook before polling")?;
            polling::run(telegram, controller, timeout_secs).await;
        }
    }

    Ok(())
}

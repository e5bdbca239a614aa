//! Component factory: builds the remote clients, stores and the handler chain from config.
//! Kept apart from [`crate::facade`] so tests can assemble a chain around fake services.

use std::sync::Arc;

use anyhow::{Context, Result};
use assistant_gateway::{AssistantGateway, OpenAIAssistantGateway};
use bsc_client::{BalanceClient, BscClient};
use dbot_core::Bot;
use handler_chain::HandlerChain;
use openai_client::OpenAIClient;
use tracing::{info, instrument};

use crate::config::{AssistantSettings, BotConfig, BscSettings};
use crate::crypto::CryptoCapability;
use crate::handlers::AssistantHandler;
use crate::run_resolver::RunResolver;
use crate::store::{ConfiguredAssistantStore, InMemoryUserStore};

/// Remote services the handler talks to.
#[derive(Clone)]
pub struct Services {
    pub gateway: Arc<dyn AssistantGateway>,
    pub balance: Arc<dyn BalanceClient>,
}

pub fn build_gateway(settings: &AssistantSettings) -> OpenAIAssistantGateway {
    let client = match settings.base_url {
        Some(ref base_url) => OpenAIClient::with_base_url(settings.api_key.clone(), base_url.clone()),
        None => OpenAIClient::new(settings.api_key.clone()),
    };
    OpenAIAssistantGateway::new(client)
}

pub fn build_balance_client(settings: &BscSettings) -> Result<BscClient> {
    BscClient::new(settings.client_config()).context("failed to build BSC client")
}

#[instrument(skip(config))]
pub fn build_services(config: &BotConfig) -> Result<Services> {
    Ok(Services {
        gateway: Arc::new(build_gateway(&config.assistant)),
        balance: Arc::new(build_balance_client(&config.bsc)?),
    })
}

/// Wires stores, resolver and capability into the assistant handler.
pub fn build_handler(config: &BotConfig, services: Services, bot: Arc<dyn Bot>) -> Arc<AssistantHandler> {
    let users = match config.seed_user.clone() {
        Some(user) => {
            info!(tg_user_id = user.tg_user_id, "Seeding user store");
            InMemoryUserStore::new().with_user(user)
        }
        None => InMemoryUserStore::new(),
    };
    let assistants = ConfiguredAssistantStore::new(config.assistant.assistant_id.clone());
    let resolver = RunResolver::new(services.gateway.clone(), config.assistant.poll);

    Arc::new(AssistantHandler::new(
        Arc::new(users),
        Arc::new(assistants),
        services.gateway,
        resolver,
        CryptoCapability::new(services.balance),
        bot,
    ))
}

pub fn build_handler_chain(handler: Arc<AssistantHandler>) -> HandlerChain {
    HandlerChain::new().add_handler(handler)
}

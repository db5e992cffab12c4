//! A terminal chat for the syllabi insights agent.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::sync::Arc;

use owo_colors::OwoColorize;
use syllabi_agent::SessionBuilder;
use syllabi_agent_openai::{
    OpenAIConfigBuilder, OpenAIProvider, VectorStoreClient,
};
use syllabi_agent_platform::{
    MessageStoreClient, PlatformConfigBuilder, TraceClient,
};
use tokio::io::{self, AsyncBufReadExt};
use uuid::Uuid;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };
    let mut config_builder = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config_builder = config_builder.with_model(model);
    }
    let config = config_builder.build();

    let reasoner = OpenAIProvider::new(config.clone());
    let store_id = env::var("OPENAI_VECTOR_STORE_ID").ok();
    let index = match VectorStoreClient::connect(config, store_id).await {
        Ok(index) => index,
        Err(err) => {
            eprintln!("failed to connect to the vector store: {err}");
            return;
        }
    };

    let mut session_builder =
        SessionBuilder::with_backends(reasoner, Arc::new(index));

    // The platform backend is optional: without it the agent runs with
    // no prior history and no remote tracing.
    if let Ok(base_url) = env::var("AGENTEX_BASE_URL") {
        let mut platform_builder =
            PlatformConfigBuilder::with_base_url(base_url);
        if let Ok(api_key) = env::var("AGENTEX_API_KEY") {
            platform_builder = platform_builder.with_api_key(api_key);
        }
        let platform_config = platform_builder.build();
        session_builder = session_builder
            .with_conversation_store(Arc::new(MessageStoreClient::new(
                platform_config.clone(),
            )))
            .with_tracer(Arc::new(TraceClient::new(platform_config)));
    }

    let session = session_builder.build();
    let conversation_id = format!("task:{}", Uuid::new_v4());
    info!("starting conversation {conversation_id}");

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };

        print!("{}🤖 ", BAR_CHAR.bright_cyan());
        std::io::stdout().flush().unwrap();

        let result = session
            .handle_message(&conversation_id, line.trim(), |fragment| {
                print!("{fragment}");
                std::io::stdout().flush().unwrap();
            })
            .await;
        println!();

        if let Err(err) = result {
            eprintln!("{}", err.to_string().bright_red());
        }
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

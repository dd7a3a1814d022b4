//! Command-line client for the Blockscan Chat API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use blockscan_chat::config::load_config_with_overrides;
use blockscan_chat::observability::logging::init_logging;
use blockscan_chat::{to_checksum_address, ChatClient, ChatError, GetAllMsgParams};

#[derive(Parser)]
#[command(name = "blockscan-chat")]
#[command(about = "Command-line client for the Blockscan Chat API", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key (overrides config and BLOCKSCAN_CHAT_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// API endpoint (overrides config and BLOCKSCAN_CHAT_API_URL)
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the checksum form of an address (offline)
    Checksum { address: String },
    #[command(flatten)]
    Api(ApiCommand),
}

/// Commands that need a connected client.
#[derive(Subcommand)]
enum ApiCommand {
    /// Verify the API key
    Ping,
    /// Unread message count, optionally from one address
    Unread {
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Id of the first message
    FirstId,
    /// Id of the last message
    LastId,
    /// List messages
    Messages {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        start_id: i64,
        /// 0 to 100
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// 0 to 2
        #[arg(long, default_value_t = 0)]
        ctype: u32,
    },
    /// Send a message
    Send { address: String, message: String },
    /// Send one message to several addresses, one at a time
    Broadcast {
        message: String,
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Mark all messages from an address as read
    MarkRead { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        config: config_path,
        api_key,
        url,
        command,
    } = Cli::parse();

    let command = match command {
        Commands::Checksum { address } => {
            println!("{}", to_checksum_address(&address)?);
            return Ok(());
        }
        Commands::Api(command) => command,
    };

    let config = load_config_with_overrides(config_path.as_deref(), |config| {
        if let Some(key) = api_key {
            config.api.api_key = key;
        }
        if let Some(url) = url {
            config.api.api_url = url;
        }
    })?;

    init_logging(&config.observability.log_level);
    tracing::debug!(api = ?config.api, "Configuration loaded");

    let client = ChatClient::connect(&config.api).await?;
    let output = run(&client, command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(client: &ChatClient, command: ApiCommand) -> Result<Value, ChatError> {
    let output = match command {
        ApiCommand::Ping => json!({ "status": "ok", "api_url": client.api_url().as_str() }),
        ApiCommand::Unread { address: None } => json!(client.get_local_msg_count().await?),
        ApiCommand::Unread {
            address: Some(address),
        } => json!(client.get_external_msg_count(&address).await?),
        ApiCommand::FirstId => json!(client.get_first_msg_id().await?),
        ApiCommand::LastId => json!(client.get_last_msg_id().await?),
        ApiCommand::Messages {
            start_id,
            offset,
            ctype,
        } => {
            let params = GetAllMsgParams {
                start_id,
                offset,
                c_type: ctype,
            };
            Value::Array(client.get_all_msg(params).await?)
        }
        ApiCommand::Send { address, message } => client.send_msg(&address, &message).await?,
        ApiCommand::Broadcast { message, addresses } => {
            let outcomes = client.send_msg_bulk(addresses.as_slice(), &message).await?;
            outcomes
                .into_iter()
                .map(|o| match o.result {
                    Ok(result) => json!({ "address": o.address.as_str(), "ok": true, "result": result }),
                    Err(e) => json!({ "address": o.address.as_str(), "ok": false, "error": e.to_string() }),
                })
                .collect()
        }
        ApiCommand::MarkRead { address } => client.mark_all_msg_as_read(&address).await?,
    };
    Ok(output)
}

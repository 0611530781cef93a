use anyhow::Context;
use clap::Parser;
use khl_gate::config::cli::{Command, LoadTarget};
use khl_gate::utils::logger;
use khl_gate::{
    Channel, CliArgs, Gateway, Guild, HttpRequester, LazyLoadable, LineReceiver, User,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if args.json_logs || config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }
    tracing::info!("Starting khl-gate against {}", config.client.base_url);

    let requester = HttpRequester::from_config(&config).context("building HTTP client")?;
    let receiver = LineReceiver::new(BufReader::new(tokio::io::stdin()));
    let gate = Gateway::new(requester, receiver).shared();

    let outcome = match args.command {
        Command::Load { target } => load(gate, target).await,
        Command::Replay => replay(gate).await,
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ khl-gate failed: {} (Category: {:?})",
            e,
            e.category()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    Ok(())
}

async fn load(gate: Arc<Gateway>, target: LoadTarget) -> khl_gate::Result<()> {
    let rendered = match target {
        LoadTarget::Channel { id } => {
            let mut channel = Channel::new(id, gate);
            channel.load().await?;
            serde_json::to_string_pretty(channel.info())?
        }
        LoadTarget::Guild { id } => {
            let mut guild = Guild::new(id, gate);
            guild.load().await?;
            serde_json::to_string_pretty(guild.info())?
        }
        LoadTarget::User { id } => {
            let mut user = User::new(id, gate);
            user.load().await?;
            serde_json::to_string_pretty(user.info())?
        }
    };
    println!("{}", rendered);
    Ok(())
}

async fn replay(gate: Arc<Gateway>) -> khl_gate::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let consumer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(event) = rx.recv().await {
            count += 1;
            tracing::info!("event #{}: {}", count, event);
        }
        count
    });

    let result = gate.run(tx).await;
    let count = consumer.await.unwrap_or_default();
    println!("✅ Replayed {} events", count);
    result
}

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use serde_json::json;
use steamsig::signature::{redirect_target, TEXT_X_POSITION};
use steamsig::{Action, Api, Config, Identifier, Signature};

use crate::cli::Cli;
use crate::error::AppError;

mod cli;
mod error;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Cli::parse();

    if let Err(e) = run(args).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .map_err(AppError::ConfigError)?;

    let mut api = Api::from_config(&config).map_err(AppError::ClientError)?;

    let identifier: Identifier = match args.identifier.parse() {
        Ok(identifier) => identifier,
        Err(e) => return print_signature(args.action, &Signature::from_error(&e)),
    };

    // aliases may have been renamed since they were cached
    let outcome = match &identifier {
        Identifier::Alias(_) => {
            api.set_cache_usage(false);
            let resolved = api.resolve(&identifier).await;
            api.set_cache_usage(config.cache_usage);
            resolved
        }
        Identifier::Canonical(steam_id) => Ok(steam_id.clone()),
    };

    let steam_id = match outcome {
        Ok(steam_id) => steam_id,
        Err(e) => return print_signature(args.action, &Signature::from_error(&e)),
    };
    log::debug!("{} resolved to {}", args.identifier, steam_id);

    if let (Some(base), Identifier::Alias(_)) = (&args.redirect_base, &identifier)
    {
        let target = redirect_target(base, &steam_id, args.action, args.rewrite)
            .map_err(AppError::RedirectError)?;
        println!("{}", target);
        return Ok(());
    }

    let profile = api
        .fetch_profile(&Identifier::Canonical(steam_id))
        .await;
    print_signature(args.action, &Signature::from_outcome(&profile))
}

fn print_signature(action: Action, signature: &Signature) -> anyhow::Result<()> {
    match action {
        Action::Go => {
            let target = signature
                .link_target()
                .context("No profile to link to")?;
            println!("{}", target);
        }
        Action::Img => {
            let headers: serde_json::Map<String, serde_json::Value> =
                Signature::headers(Utc::now())
                    .into_iter()
                    .map(|(name, value)| (name.to_owned(), value.into()))
                    .collect();
            let output = json!({
                "signature": signature,
                "badge": signature.state.badge.file_name(),
                "texts": signature.texts(),
                "text_x": TEXT_X_POSITION,
                "headers": headers,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(AppError::from)?
            );
        }
    }
    Ok(())
}

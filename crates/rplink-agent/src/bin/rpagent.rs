use std::sync::Arc;

use anyhow::anyhow;
use clap::{CommandFactory, FromArgMatches};

use rplink::provider::{DefaultOperationHandler, ProviderConfiguration, ProviderSession};
use rplink_agent::common::cli::{CheckConfigOpts, OutputMode, RootOptions, RunOpts, SubCommand};
use rplink_agent::common::secret::read_secret_file;
use rplink_agent::common::setup::setup_logging;
use rplink_agent::config::AgentConfig;
use rplink_agent::provider::{ReconnectPolicy, ResolvingEndpointDetector, run_provider};

// Commands

async fn command_run(opts: RunOpts) -> anyhow::Result<()> {
    let config = AgentConfig::load(&opts.config)?;
    let configuration = config.provider_configuration()?;
    let controller = opts.controller.or(config.controller).ok_or_else(|| {
        anyhow!("Controller address is not set, use --controller or `controller` in the configuration file")
    })?;
    let secret_key = opts
        .secret_file
        .or(config.secret_file)
        .map(|path| read_secret_file(&path))
        .transpose()?
        .map(Arc::new);
    if secret_key.is_none() {
        log::warn!("No secret key is set, the controller connection is not encrypted");
    }

    log::info!(
        "Starting provider {}/{} with resources {}",
        configuration.info.provider_type,
        configuration.info.name,
        configuration
            .resources
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    );
    let session_ref = ProviderSession::new_ref(configuration, Box::new(DefaultOperationHandler));
    let mut detector = ResolvingEndpointDetector::new(controller);
    let policy = ReconnectPolicy {
        interval: opts.reconnect_interval,
        max_reconnects: opts.max_reconnects,
    };

    tokio::select! {
        r = run_provider(&session_ref, &mut detector, &secret_key, policy) => r?,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received interrupt, stopping provider");
        }
    }
    session_ref.get_mut().disconnected();
    Ok(())
}

fn command_check_config(opts: CheckConfigOpts) -> anyhow::Result<()> {
    let config = AgentConfig::load(&opts.config)?;
    let configuration = config.provider_configuration()?;
    match opts.output_mode {
        OutputMode::Cli => print_configuration_cli(config.controller.as_deref(), &configuration),
        OutputMode::Json => {
            let value = serde_json::json!({
                "controller": config.controller,
                "secret_file": config.secret_file,
                "provider": configuration,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn print_configuration_cli(controller: Option<&str>, configuration: &ProviderConfiguration) {
    println!("Provider type: {}", configuration.info.provider_type);
    println!("Provider name: {}", configuration.info.name);
    println!("Controller: {}", controller.unwrap_or("<not set>"));
    println!(
        "Subscribe timeout: {}",
        configuration
            .subscribe_timeout
            .map(|d| humantime::format_duration(d).to_string())
            .unwrap_or_else(|| "never".to_string())
    );
    match &configuration.resources {
        Some(resources) => {
            println!("Resources:");
            for resource in resources {
                println!("  {resource}");
            }
        }
        None => println!("Resources: <none>"),
    }
    for reservation in &configuration.info.default_reservations {
        println!(
            "Default reservation: {} ({:?}{})",
            reservation.role,
            reservation.kind,
            reservation
                .principal
                .as_ref()
                .map(|p| format!(", principal {p}"))
                .unwrap_or_default()
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> rplink_agent::Result<()> {
    let matches = RootOptions::command().get_matches();
    let top_opts = match RootOptions::from_arg_matches(&matches) {
        Ok(opts) => opts,
        Err(error) => error.exit(),
    };

    setup_logging(top_opts.common.debug);

    let result = match top_opts.subcmd {
        SubCommand::Run(opts) => command_run(opts).await,
        SubCommand::CheckConfig(opts) => command_check_config(opts),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        std::process::exit(1);
    }

    Ok(())
}

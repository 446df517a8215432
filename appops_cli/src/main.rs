use anyhow::{Context, Result};
use appops_cli::config::{AppConfig, ConfigManager, get_config};
use appops_cli::error::CliError;
use appops_cli::orchestrators::{
    CheckinArgs, CheckoutArgs, DeployArgs, DeployOrchestrator, InstanceOrchestrator, ManageArgs,
    OrchestratorContext, VersioningOrchestrator,
};
use appops_cli::output::OutputFormat;
use appops_cli::progress::ProgressHandle;
use appops_cli::terminal;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "appops")]
#[command(author, version, about = "AppOps - Managed instance, versioning and deployment control", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Org alias from the configuration (defaults to `default_org`)
    #[arg(short = 'u', long = "target-org", global = true, value_name = "ALIAS")]
    target_org: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List managed instances
    Instances {
        /// Print every instance instead of a count
        #[arg(long)]
        print: bool,
    },

    /// Bring the target org under management
    Manage {
        /// Enable version control for the instance
        #[arg(long = "version", id = "versioning")]
        versioning: bool,

        /// Commit message for the initial version control commit
        #[arg(long, value_name = "MESSAGE")]
        commit_message: Option<String>,

        /// Version control access token
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// Name for the connection record created for the org
        #[arg(long)]
        label: Option<String>,
    },

    /// Remove an instance from management
    Unmanage {
        /// Managed instance ID (defaults to the target org's instance)
        #[arg(short = 'i', long = "instance", value_name = "ID")]
        instance: Option<String>,
    },

    /// Commit instance data to version control
    Checkin {
        /// Managed instance ID (defaults to the target org's instance)
        #[arg(short = 'i', long = "instance", value_name = "ID")]
        instance: Option<String>,

        /// Data set name or ID
        #[arg(long)]
        dataset: Option<String>,

        /// Deployment plan name or ID
        #[arg(long)]
        plan: Option<String>,

        /// Branch to commit to
        #[arg(long)]
        branch: Option<String>,

        /// Commit message
        #[arg(short, long)]
        message: Option<String>,

        /// Version control access token
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// Wait for the job to complete
        #[arg(long)]
        wait: bool,
    },

    /// Restore instance data from version control
    Checkout {
        /// Managed instance ID (defaults to the target org's instance)
        #[arg(short = 'i', long = "instance", value_name = "ID")]
        instance: Option<String>,

        /// Deactivate all triggers and events during the checkout
        #[arg(long)]
        deactivate: bool,

        /// Wait for the job to complete
        #[arg(long)]
        wait: bool,
    },

    /// Deploy a data set or deployment plan between instances
    Deploy {
        /// Deployment name
        #[arg(long)]
        name: Option<String>,

        /// Deployment notes
        #[arg(long)]
        notes: Option<String>,

        /// Source managed instance ID
        #[arg(long, value_name = "ID")]
        source: Option<String>,

        /// Destination managed instance ID
        #[arg(long, value_name = "ID")]
        destination: Option<String>,

        /// Data set name or ID
        #[arg(long)]
        dataset: Option<String>,

        /// Deployment plan name or ID
        #[arg(long)]
        plan: Option<String>,

        /// Name for connection records created while provisioning
        #[arg(long)]
        label: Option<String>,

        /// Deactivate all triggers and events during the deployment
        #[arg(long)]
        deactivate: bool,

        /// Run without committing any data
        #[arg(long)]
        simulation: bool,

        /// Query filter applied to the deployed records
        #[arg(long)]
        filter: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., client.job_poll_max_attempts)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., hub.instance_url)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let debug = cli.debug;

    // Initialize logging based on debug flag
    if debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("appops_client_core", log::LevelFilter::Debug)
            .filter_module("appops_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(error) = run(cli).await {
        let error = CliError::from(error);
        eprint!("{}", error.format_for_user(debug));
        std::process::exit(error.exit_code() as i32);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = OutputFormat::from_flag(cli.json);

    let command = match cli.command {
        Commands::Config { command } => return config_command(command),
        Commands::Completions { shell } => {
            generate_completions(shell);
            return Ok(());
        }
        other => other,
    };

    // Argument preconditions are checked before touching configuration
    if let Commands::Deploy {
        dataset, plan, ..
    } = &command
    {
        DeployArgs {
            dataset: dataset.clone(),
            plan: plan.clone(),
            ..Default::default()
        }
        .validate()?;
    }

    let config = get_config().context("Failed to load configuration")?;
    if !terminal::color_enabled(config.output.color_enabled) {
        colored::control::set_override(false);
    }
    let show_progress = format == OutputFormat::Text
        && config.output.progress_enabled
        && terminal::should_show_progress_by_default();
    let use_color = terminal::color_enabled(config.output.color_enabled);

    let progress = ProgressHandle::start(show_progress);
    let result = execute(command, cli.target_org, config, format, use_color, &progress).await;
    progress.finish().await;

    println!("{}", result?.trim_end());
    Ok(())
}

async fn execute(
    command: Commands,
    target_org: Option<String>,
    config: AppConfig,
    format: OutputFormat,
    use_color: bool,
    progress: &ProgressHandle,
) -> Result<String> {
    let ctx = OrchestratorContext::connect(config, progress.provider())?;
    let formatter = format.formatter(use_color);

    match command {
        Commands::Instances { print } => {
            let instances = InstanceOrchestrator::new(&ctx).list().await?;
            formatter.format_instances(&instances, print)
        }
        Commands::Manage {
            versioning,
            commit_message,
            token,
            label,
        } => {
            let args = ManageArgs {
                target_org,
                versioning,
                commit_message,
                vcs_token: token,
                label,
            };
            let instance = InstanceOrchestrator::new(&ctx).manage(&args).await?;
            formatter.format_instance(&instance)
        }
        Commands::Unmanage { instance } => {
            let removed = InstanceOrchestrator::new(&ctx)
                .unmanage(instance.as_deref(), target_org.as_deref())
                .await?;
            formatter.format_removed(&removed)
        }
        Commands::Checkin {
            instance,
            dataset,
            plan,
            branch,
            message,
            token,
            wait,
        } => {
            let args = CheckinArgs {
                instance_id: instance,
                target_org,
                dataset,
                plan,
                branch,
                message,
                vcs_token: token,
                wait,
            };
            let outcome = VersioningOrchestrator::new(&ctx).checkin(&args).await?;
            formatter.format_job(&outcome)
        }
        Commands::Checkout {
            instance,
            deactivate,
            wait,
        } => {
            let args = CheckoutArgs {
                instance_id: instance,
                target_org,
                deactivate_all: deactivate,
                wait,
            };
            let outcome = VersioningOrchestrator::new(&ctx).checkout(&args).await?;
            formatter.format_job(&outcome)
        }
        Commands::Deploy {
            name,
            notes,
            source,
            destination,
            dataset,
            plan,
            label,
            deactivate,
            simulation,
            filter,
        } => {
            let args = DeployArgs {
                name,
                notes,
                source,
                destination,
                dataset,
                plan,
                label,
                deactivate,
                simulation,
                filter,
                target_org,
            };
            let outcome = DeployOrchestrator::new(&ctx).deploy(&args).await?;
            formatter.format_job(&outcome)
        }
        Commands::Config { .. } | Commands::Completions { .. } => {
            anyhow::bail!("Command does not use the control plane")
        }
    }
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            println!("{}", manager.get(&key)?);
        }
        ConfigCommand::Set { key, value } => {
            manager.set(&key, &value)?;
            eprintln!("{}", format!("Set {key}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("{}", "Configuration:".bold().blue());
            eprintln!("Config file: {}", manager.get_config_path().display());
            eprintln!();

            // Group items by section
            let mut sections: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
            for (key, value) in items {
                let (section, display_key) = match key.split_once('.') {
                    Some((section, rest)) => (section.to_string(), rest.to_string()),
                    None => ("general".to_string(), key),
                };
                sections
                    .entry(section)
                    .or_default()
                    .push((display_key, value));
            }

            for (section, items) in sections {
                eprintln!("[{}]", section.yellow());
                for (key, value) in items {
                    eprintln!("  {} = {}", key.cyan(), value);
                }
                eprintln!();
            }
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

//! Command-line interface for cluster-complete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and flag overrides
//! - Building the cluster client and session scope
//! - Dispatching the `complete`, `completion`, `config` and `version` commands

pub mod completion;

use clap::{CommandFactory, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cluster::{ClusterClient, SessionScope, SnapshotClient};
use crate::completion::{CompletionEngine, CompletionRequest, Suggestions};
use crate::config::{Config, LogLevel};
use crate::error::Result;

/// Completion resolver for a cluster-facing developer CLI
#[derive(Parser, Debug)]
#[command(
    name = "cluster-complete",
    version,
    about = "Resolve shell completions against cluster state",
    long_about = "Resolves context-aware shell completions (service classes, plans,
parameters, link and unlink targets) for a cluster-facing developer CLI."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Cluster snapshot (JSON) to resolve against
    #[arg(long, value_name = "FILE", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Namespace (project) of the session
    #[arg(long, value_name = "NAME", global = true)]
    pub namespace: Option<String>,

    /// Application of the session
    #[arg(long, value_name = "NAME", global = true)]
    pub app: Option<String>,

    /// Current component
    #[arg(long, value_name = "NAME", global = true)]
    pub component: Option<String>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for cluster-complete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print completions for the words of a command line
    Complete {
        /// Words after the program name, the last one under the cursor
        #[arg(
            value_name = "WORDS",
            num_args = 0..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        words: Vec<String>,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,

        /// Program whose arguments are completed dynamically
        #[arg(long, value_name = "NAME")]
        program: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = match Config::load_from_file(args.config_file.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: Failed to load configuration: {}", e);
                Config::default()
            }
        };

        Self::apply_args_to_config(&mut config, args);

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
            Self::apply_logging_args(&mut config, args);
        }

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Session scope the completions run against
    pub fn scope(&self) -> SessionScope {
        self.config.session.scope()
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_session_args(config, args);
        Self::apply_logging_args(config, args);

        if let Some(path) = &args.snapshot {
            config.cluster.snapshot_path = Some(path.clone());
        }
    }

    fn apply_session_args(config: &mut Config, args: &CliArgs) {
        if let Some(namespace) = &args.namespace {
            config.session.namespace = namespace.clone();
        }
        if let Some(app) = &args.app {
            config.session.application = app.clone();
        }
        if let Some(component) = &args.component {
            config.session.component = component.clone();
        }
    }

    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Build the cluster client
    ///
    /// Without a configured snapshot the client sees an empty cluster.
    pub fn cluster_client(&self) -> Result<Arc<dyn ClusterClient>> {
        match &self.config.cluster.snapshot_path {
            Some(path) => Ok(Arc::new(SnapshotClient::from_path(path)?)),
            None => {
                debug!("No snapshot configured, resolving against an empty cluster");
                Ok(Arc::new(SnapshotClient::default()))
            }
        }
    }

    /// Handle the selected subcommand
    pub async fn handle_command(&self) -> Result<()> {
        match &self.args.command {
            Some(Commands::Complete { words }) => {
                let suggestions = self.complete(words).await;
                // complete always exits 0
                if let Err(e) = self.print_suggestions(&suggestions) {
                    debug!("Failed to print suggestions: {}", e);
                }
                Ok(())
            }
            Some(Commands::Completion { shell, program }) => {
                completion::generate_completion(shell, program.as_deref())
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)
            }
            Some(Commands::Version) => {
                self.show_version();
                Ok(())
            }
            None => {
                CliArgs::command().print_help()?;
                Ok(())
            }
        }
    }

    /// Resolve completions for the words of a command line
    ///
    /// Never fails: an unreadable snapshot is logged and treated as an
    /// empty cluster.
    pub async fn complete(&self, words: &[String]) -> Suggestions {
        let client: Arc<dyn ClusterClient> = match self.cluster_client() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to load cluster snapshot: {}", e);
                Arc::new(SnapshotClient::default())
            }
        };

        let engine = CompletionEngine::new(client).with_settings(self.config.completion.clone());
        let request = if words.is_empty() {
            CompletionRequest::from_words(&[String::new()])
        } else {
            CompletionRequest::from_words(words)
        };

        engine.complete(&request, &self.scope()).await
    }

    /// Print one suggestion per line; absent prints nothing
    fn print_suggestions(&self, suggestions: &Suggestions) -> Result<()> {
        let Some(items) = suggestions.candidates() else {
            return Ok(());
        };

        let mut stdout = io::stdout().lock();
        for item in items {
            writeln!(stdout, "{}", item)?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Show version information
    fn show_version(&self) {
        println!("cluster-complete version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file()?;
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("Configuration file does not exist, defaults apply");
            return Ok(());
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("Configuration is valid"),
                Err(e) => println!("Configuration validation failed: {}", e),
            },
            Err(e) => println!("Failed to load configuration: {}", e),
        }

        Ok(())
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("# Configuration file: {}", path.display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}

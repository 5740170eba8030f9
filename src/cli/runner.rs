//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands};
use crate::config::AthenaConfig;
use crate::connector::AthenaConnector;
use crate::error::{Error, Result};
use crate::messages::MessageWriter;
use crate::state::StateManager;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check { config_json } => self.check(config_json.as_deref()),
            Commands::Discover { config_json } => self.discover(config_json.as_deref()),
            Commands::Sync {
                catalog,
                state,
                state_json,
                config_json,
            } => self.sync(
                catalog,
                state.as_deref(),
                state_json.as_deref(),
                config_json.as_deref(),
            ),
        }
    }

    /// Load the tap config from inline JSON or the --config file
    fn load_config(&self, config_json: Option<&str>) -> Result<AthenaConfig> {
        if let Some(json) = config_json {
            return AthenaConfig::from_json(json);
        }
        if let Some(path) = &self.cli.config {
            return AthenaConfig::from_file(path);
        }
        Err(Error::config(
            "no configuration given; pass --config <file> or --config-json <json>",
        ))
    }

    fn spec(&self) -> Result<()> {
        let spec = AthenaConnector::spec();
        println!("{}", serde_json::to_string_pretty(&spec)?);
        Ok(())
    }

    fn check(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let connector = AthenaConnector::from_config(config);

        let result = connector.check();
        println!("{}", serde_json::to_string_pretty(&result)?);
        if result.success {
            Ok(())
        } else {
            Err(Error::connection(result.message.unwrap_or_default()))
        }
    }

    fn discover(&self, config_json: Option<&str>) -> Result<()> {
        let config = self.load_config(config_json)?;
        let connector = AthenaConnector::from_config(config);

        let catalog = connector.discover()?;
        tracing::info!("Discovered {} streams", catalog.streams.len());
        println!("{}", catalog.to_json_pretty());
        Ok(())
    }

    fn sync(
        &self,
        catalog_path: &Path,
        state_path: Option<&Path>,
        state_json: Option<&str>,
        config_json: Option<&str>,
    ) -> Result<()> {
        let config = self.load_config(config_json)?;
        let catalog = Catalog::from_file(catalog_path)?;
        let mut state = match (state_json, state_path) {
            (Some(json), _) => StateManager::from_json(json)?,
            (None, Some(path)) => StateManager::from_file(path)?,
            (None, None) => StateManager::in_memory(),
        };

        let connector = AthenaConnector::from_config(config);
        let mut writer = MessageWriter::stdout();
        let stats = connector.sync(&catalog, &mut state, &mut writer)?;

        tracing::info!(
            "Sync complete: {} streams, {} records",
            stats.streams_synced,
            stats.records_emitted
        );
        Ok(())
    }
}

// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide configuration.
//!
//! Configuration is read from `.config/jobreport.toml` in the workspace root, layered on top of
//! [`ReportConfig::DEFAULT_CONFIG`].

use crate::{errors::ConfigParseError, report::StatusConversion};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use jobreport_metadata::ReportFailureStatus;
use serde::Deserialize;
use std::collections::BTreeSet;
use swrite::{SWrite, swrite};
use tracing::{debug, warn};

/// Trait for handling configuration warnings.
pub trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        workspace_root: &Utf8Path,
        unknown: &BTreeSet<String>,
    );
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the tracing crate.
#[derive(Debug)]
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        workspace_root: &Utf8Path,
        unknown: &BTreeSet<String>,
    ) {
        let mut unknown_str = String::new();
        if let Some(key) = unknown.first()
            && unknown.len() == 1
        {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.push_str(key);
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                swrite!(unknown_str, "\n  - {ignored_key}");
            }
        }

        warn!(
            "in config file {}, ignoring unknown configuration {unknown_str}",
            config_file
                .strip_prefix(workspace_root)
                .unwrap_or(config_file),
        )
    }
}

/// Configuration for reporting test results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    workspace_root: Utf8PathBuf,
    failure_status: ReportFailureStatus,
    report_file: Option<Utf8PathBuf>,
}

impl ReportConfig {
    /// The default location of the config within the workspace root.
    pub const CONFIG_PATH: &'static str = ".config/jobreport.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the given file, or if not specified from `.config/jobreport.toml` in
    /// the workspace root.
    ///
    /// An explicitly specified file must exist. If no file is specified and the workspace root
    /// doesn't have `.config/jobreport.toml`, the default config is used.
    pub fn from_sources(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_warnings(workspace_root, config_file, &mut DefaultConfigWarnings)
    }

    /// Loads configuration from the given sources with custom warning handling.
    pub fn from_sources_with_warnings(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let workspace_root = workspace_root.into();
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = workspace_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };
        debug!("reading config from {config_file}");

        let builder = Self::make_default_config().add_source(source);
        let (deserialized, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|error| ConfigParseError::new(&config_file, error))?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(&config_file, &workspace_root, &unknown);
        }

        Ok(Self {
            workspace_root,
            failure_status: deserialized.failure_status,
            report_file: deserialized.report_file,
        })
    }

    /// Returns the default config, with no repository-specific configuration applied.
    pub fn default_config(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            failure_status: ReportFailureStatus::default(),
            report_file: None,
        }
    }

    /// Returns the workspace root this config was read for.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns the status that failed and errored tests are written with in report files.
    pub fn failure_status(&self) -> ReportFailureStatus {
        self.failure_status
    }

    /// Overrides the configured failure status.
    pub fn set_failure_status(&mut self, failure_status: ReportFailureStatus) -> &mut Self {
        self.failure_status = failure_status;
        self
    }

    /// Returns the status conversion used when writing report files for external consumers.
    pub fn status_conversion(&self) -> StatusConversion {
        StatusConversion::ConvertFailures(self.failure_status)
    }

    /// Returns the file combined reports are written to, if one is configured.
    ///
    /// Relative paths are resolved against the workspace root.
    pub fn report_file(&self) -> Option<Utf8PathBuf> {
        self.report_file
            .as_ref()
            .map(|report_file| self.workspace_root.join(report_file))
    }

    /// Overrides the configured report file.
    pub fn set_report_file(&mut self, report_file: Option<Utf8PathBuf>) -> &mut Self {
        self.report_file = report_file;
        self
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    /// This returns a tuple of (config, ignored paths).
    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReportConfigDeserialize, BTreeSet<String>), ConfigError> {
        let config = builder.build_cloned()?;

        let mut ignored = BTreeSet::new();
        let config: ReportConfigDeserialize =
            serde_ignored::deserialize(config, |path: serde_ignored::Path| {
                ignored.insert(path.to_string());
            })?;

        Ok((config, ignored))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigDeserialize {
    failure_status: ReportFailureStatus,
    #[serde(default)]
    report_file: Option<Utf8PathBuf>,
}

//! Application settings management
//!
//! Environments, collaborator tool names and identifier lookup tables are
//! stored in a plain JSON file. Nothing in here is secret.

use directories::ProjectDirs;
use indexmap::IndexMap;
use openapi_schema::SchemaSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExplorerError, Result};

/// Environment used when none is given; it is also the one that is not
/// spelled out in rendered commands
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// One description document of an environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSettings {
    /// Short name, used for the cache file name
    pub name: String,
    /// URL the document is fetched from
    pub url: String,
    /// Prefix prepended to every path of this document (e.g. "/v2")
    #[serde(default)]
    pub path_prefix: String,
}

/// A header asked for on every request, before schema-declared headers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSettings {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Settings for one target environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSettings {
    /// Base URL requests are sent to
    pub base_url: String,
    /// Documents merged, in order, into the schema for this environment
    #[serde(default)]
    pub schemas: Vec<SchemaSettings>,
    /// Headers collected before the schema-declared ones
    #[serde(default)]
    pub required_headers: Vec<HeaderSettings>,
    /// Overrides the global curl command
    #[serde(default)]
    pub curl_command: Option<String>,
    /// Header whose value scopes the identifier picker (e.g. "x-client-uuid")
    #[serde(default)]
    pub scope_header: Option<String>,
    /// Connection string handed to the database query tool
    #[serde(default)]
    pub database_url: Option<String>,
}

impl EnvironmentSettings {
    /// Check that every configured URL parses
    pub fn validate(&self) -> Result<()> {
        let urls = std::iter::once(&self.base_url).chain(self.schemas.iter().map(|s| &s.url));
        for raw in urls {
            url::Url::parse(raw).map_err(|e| ExplorerError::InvalidUrl(format!("{}: {}", raw, e)))?;
        }
        Ok(())
    }

    /// Sources for this environment's documents, cached as
    /// `<cache_dir>/<name>-<environment>.json`
    pub fn schema_sources(&self, environment: &str, cache_dir: &Path) -> Vec<SchemaSource> {
        self.schemas
            .iter()
            .map(|schema| SchemaSource {
                name: schema.name.clone(),
                url: schema.url.clone(),
                cache_file: cache_dir.join(format!("{}-{}.json", schema.name, environment)),
                path_prefix: schema.path_prefix.clone(),
            })
            .collect()
    }

    pub fn is_scope_header(&self, header: &str) -> bool {
        self.scope_header
            .as_deref()
            .map(|scope| scope.eq_ignore_ascii_case(header))
            .unwrap_or(false)
    }
}

/// External programs the explorer drives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    /// Fuzzy selector
    pub selector: String,
    /// Identifier picker
    pub id_picker: String,
    /// Database query tool
    pub database: String,
    /// Editor for body templates; `$VISUAL`/`$EDITOR` when unset
    pub editor: Option<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            selector: "fzf".to_string(),
            id_picker: "api-id-picker".to_string(),
            database: "psql".to_string(),
            editor: None,
        }
    }
}

/// How to find rows of one table and scope them to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableLookup {
    /// Most readable column, shown next to the uuid
    #[serde(default = "default_identifier")]
    pub identifier: String,
    /// JOIN clause(s) needed to reach the client
    #[serde(default)]
    pub joins: String,
    /// Column expression equal to the client identifier; empty when the
    /// table cannot be scoped
    #[serde(default)]
    pub client_filter: String,
}

fn default_identifier() -> String {
    "id".to_string()
}

/// Identifier picker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IdLookupSettings {
    /// Database schema qualifying table names
    pub schema: Option<String>,
    /// Maximum rows offered per table
    pub limit: usize,
    /// Table name -> lookup metadata
    pub tables: IndexMap<String, TableLookup>,
}

impl Default for IdLookupSettings {
    fn default() -> Self {
        Self {
            schema: None,
            limit: 200,
            tables: IndexMap::new(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Environment used when `--env` is not given
    pub default_environment: String,
    /// Command placed at the start of rendered command lines
    pub curl_command: String,
    /// Collaborator programs
    pub tools: ToolSettings,
    /// Environment name -> settings
    pub environments: IndexMap<String, EnvironmentSettings>,
    /// Identifier picker tables
    pub id_lookup: IdLookupSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        let mut environments = IndexMap::new();
        environments.insert(
            DEFAULT_ENVIRONMENT.to_string(),
            EnvironmentSettings {
                base_url: "http://localhost:8080".to_string(),
                schemas: vec![SchemaSettings {
                    name: "api".to_string(),
                    url: "http://localhost:8080/openapi.json".to_string(),
                    path_prefix: String::new(),
                }],
                required_headers: Vec::new(),
                curl_command: None,
                scope_header: None,
                database_url: None,
            },
        );

        Self {
            version: 1,
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
            curl_command: "curl".to_string(),
            tools: ToolSettings::default(),
            environments,
            id_lookup: IdLookupSettings::default(),
        }
    }

    /// Look up an environment by name
    pub fn environment(&self, name: &str) -> Result<&EnvironmentSettings> {
        self.environments
            .get(name)
            .ok_or_else(|| ExplorerError::UnknownEnvironment(name.to_string()))
    }

    /// Curl command for an environment, honouring its override
    pub fn curl_command_for<'a>(&'a self, environment: &'a EnvironmentSettings) -> &'a str {
        environment
            .curl_command
            .as_deref()
            .unwrap_or(&self.curl_command)
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load `settings.json` from a configuration directory
    pub fn new(config_dir: &Path) -> Result<Self> {
        Self::from_file(config_dir.join("settings.json"))
    }

    /// Load settings from an explicit file; defaults when it does not exist
    pub fn from_file(settings_file: PathBuf) -> Result<Self> {
        let settings = Self::load_from_file(&settings_file)?;
        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Get the default configuration directory
    pub fn default_config_dir() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default schema cache directory
    pub fn default_cache_dir() -> Result<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "api-explorer", "api-explorer")
            .ok_or(ExplorerError::MissingDirectory("home"))
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found at {:?}, using defaults", path);
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(dir) = self.settings_file.parent() {
            std::fs::create_dir_all(dir)?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Path of the settings file
    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path()).unwrap();

        let settings = manager.get();
        assert_eq!(settings.default_environment, "local");
        assert_eq!(settings.tools.selector, "fzf");
        assert!(settings.environment("local").is_ok());
        assert!(matches!(
            settings.environment("prod"),
            Err(ExplorerError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::new(temp_dir.path()).unwrap();
            manager.get_mut().curl_command = "be-curl".to_string();
            manager.get_mut().id_lookup.tables.insert(
                "widgets".to_string(),
                TableLookup {
                    identifier: "name".to_string(),
                    joins: String::new(),
                    client_filter: "t.client_id".to_string(),
                },
            );
            manager.save().unwrap();
        }

        let manager = SettingsManager::new(temp_dir.path()).unwrap();
        assert_eq!(manager.get().curl_command, "be-curl");
        assert_eq!(manager.get().id_lookup.tables["widgets"].identifier, "name");
    }

    #[test]
    fn test_partial_settings_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{
                "environments": {
                    "test": {
                        "baseUrl": "https://api.test.example.com",
                        "schemas": [{"name": "core", "url": "https://api.test.example.com/schema.json", "pathPrefix": "/v2"}],
                        "requiredHeaders": [{"name": "x-client-uuid"}],
                        "scopeHeader": "X-Client-UUID"
                    }
                },
                "idLookup": {"tables": {"fund": {"clientFilter": "t.client_id"}}}
            }"#,
        )
        .unwrap();

        let manager = SettingsManager::from_file(path).unwrap();
        let settings = manager.get();

        assert_eq!(settings.curl_command, "curl");
        assert_eq!(settings.id_lookup.limit, 200);
        assert_eq!(settings.id_lookup.tables["fund"].identifier, "id");

        let test = settings.environment("test").unwrap();
        assert!(test.validate().is_ok());
        assert!(test.is_scope_header("x-client-uuid"));
        assert_eq!(test.required_headers[0].description, None);
    }

    #[test]
    fn test_invalid_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{").unwrap();

        assert!(SettingsManager::new(temp_dir.path()).is_err());
    }

    #[test]
    fn test_schema_sources_cache_paths() {
        let settings = Settings::new();
        let local = settings.environment("local").unwrap();

        let sources = local.schema_sources("local", Path::new("/tmp/cache"));
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].cache_file, PathBuf::from("/tmp/cache/api-local.json"));
        assert_eq!(sources[0].url, "http://localhost:8080/openapi.json");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut env = Settings::new().environment("local").unwrap().clone();
        env.base_url = "localhost without scheme".to_string();

        assert!(matches!(env.validate(), Err(ExplorerError::InvalidUrl(_))));
    }

    #[test]
    fn test_curl_command_override() {
        let settings = Settings::new();
        let mut env = settings.environment("local").unwrap().clone();
        assert_eq!(settings.curl_command_for(&env), "curl");

        env.curl_command = Some("dpl-curl".to_string());
        assert_eq!(settings.curl_command_for(&env), "dpl-curl");
    }
}

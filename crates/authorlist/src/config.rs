//! Run configuration.
//!
//! Every field has a default, so a configuration file only needs the keys it changes:
//!
//! ```toml
//! users_csv = "members/Users.csv"
//! orcid_links = false
//!
//! [fuzzy]
//! limit = 3
//! floor = 80
//! ```

use super::*;

/// Default location of the member database holding emails.
pub const DEFAULT_USERS_CSV: &str = "Users.csv";

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Member database with `Name` and `Email` columns
  pub users_csv:   PathBuf,
  /// Emit `\orcidlink{}` before each author that has an ORCID
  pub orcid_links: bool,
  /// Fuzzy resolution of infrastructure names
  pub fuzzy:       FuzzyConfig,
}

/// Settings for fuzzy name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzyConfig {
  /// Offer candidates for names without an exact match
  pub enabled: bool,
  /// Maximum number of candidates offered per name
  pub limit:   usize,
  /// Minimum confidence percentage a candidate needs to be offered
  pub floor:   u8,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      users_csv:   PathBuf::from(DEFAULT_USERS_CSV),
      orcid_links: true,
      fuzzy:       FuzzyConfig::default(),
    }
  }
}

impl Default for FuzzyConfig {
  fn default() -> Self { Self { enabled: true, limit: 2, floor: 70 } }
}

impl Config {
  /// Reads a TOML configuration file. Missing keys take their defaults.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
      std::io::ErrorKind::NotFound => AuthorListError::MissingFile(path.to_path_buf()),
      _ => AuthorListError::Io(e),
    })?;
    let config: Self = toml::from_str(&content)?;
    config.validate()?;
    debug!("Loaded configuration from {}: {config:?}", path.display());
    Ok(config)
  }

  /// Rejects settings that cannot produce a meaningful run.
  pub fn validate(&self) -> Result<()> {
    if self.fuzzy.limit == 0 {
      return Err(AuthorListError::Config("fuzzy.limit must be at least 1".to_string()));
    }
    if self.fuzzy.floor > 100 {
      return Err(AuthorListError::Config(format!(
        "fuzzy.floor is a percentage, got {}",
        self.fuzzy.floor
      )));
    }
    Ok(())
  }

  /// Sets the member database path.
  pub fn with_users_csv(mut self, path: impl AsRef<Path>) -> Self {
    self.users_csv = path.as_ref().to_path_buf();
    self
  }

  /// Enables or disables `\orcidlink{}` output.
  pub fn with_orcid_links(mut self, enabled: bool) -> Self {
    self.orcid_links = enabled;
    self
  }

  /// Enables or disables fuzzy resolution.
  pub fn with_fuzzy_matching(mut self, enabled: bool) -> Self {
    self.fuzzy.enabled = enabled;
    self
  }

  /// Sets how many fuzzy candidates are offered per name.
  pub fn with_fuzzy_limit(mut self, limit: usize) -> Self {
    self.fuzzy.limit = limit;
    self
  }

  /// Sets the minimum confidence percentage for fuzzy candidates.
  pub fn with_fuzzy_floor(mut self, floor: u8) -> Self {
    self.fuzzy.floor = floor;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_partial_file_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("authorlist.toml");
    std::fs::write(&path, "orcid_links = false\n\n[fuzzy]\nfloor = 85\n").unwrap();

    let config = Config::from_path(&path).unwrap();
    assert!(!config.orcid_links);
    assert_eq!(config.fuzzy.floor, 85);
    assert_eq!(config.fuzzy.limit, 2);
    assert!(config.fuzzy.enabled);
    assert_eq!(config.users_csv, PathBuf::from(DEFAULT_USERS_CSV));
  }

  #[test]
  fn test_unknown_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("authorlist.toml");
    std::fs::write(&path, "orcid_link = false\n").unwrap();
    assert!(matches!(Config::from_path(&path), Err(AuthorListError::TomlDe(_))));
  }

  #[test]
  fn test_invalid_values() {
    assert!(Config::default().with_fuzzy_limit(0).validate().is_err());
    assert!(Config::default().with_fuzzy_floor(101).validate().is_err());
    assert!(Config::default().validate().is_ok());
  }

  #[test]
  fn test_missing_file() {
    let result = Config::from_path("does/not/exist.toml");
    assert!(matches!(result, Err(AuthorListError::MissingFile(_))));
  }
}

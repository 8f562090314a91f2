//! `KEY=VALUE` configuration files
//!
//! One assignment per line. Whitespace around keys and values is ignored,
//! blank lines and `#` comments are skipped.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{Error, Result};

/// Raw key/value pairs read from a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueConfig {
    entries: HashMap<String, String>,
    base_dir: Option<PathBuf>,
}

impl KeyValueConfig {
    /// Read and parse a configuration file.
    ///
    /// Relative paths looked up through [`KeyValueConfig::get_path`] resolve
    /// against the directory containing `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| Error::io(format!("read config file {}", path.display()), source))?;
        let mut config = Self::parse(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigSyntax`] for a line that does not contain
    /// exactly one `=`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let syntax_error = || Error::ConfigSyntax {
                line_number: index + 1,
                line: line.to_string(),
            };
            let (key, value) = line.split_once('=').ok_or_else(syntax_error)?;
            if value.contains('=') {
                return Err(syntax_error());
            }
            let key = key.trim();
            if key.is_empty() {
                return Err(syntax_error());
            }
            // Later assignments win.
            entries.insert(key.to_string(), value.trim().to_string());
        }
        Ok(Self {
            entries,
            base_dir: None,
        })
    }

    /// Set the directory relative paths resolve against
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an optional string value
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a required string value
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get_str_opt(key).ok_or_else(|| Error::MissingConfigKey {
            key: key.to_string(),
        })
    }

    /// Look up and parse a required value
    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.get_str(key)?;
        parse_value(key, value)
    }

    /// Look up and parse an optional value; present but malformed is an error
    pub fn get_opt<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_str_opt(key)
            .map(|value| parse_value(key, value))
            .transpose()
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get(key)
    }

    pub fn get_usize(&self, key: &str) -> Result<usize> {
        self.get(key)
    }

    /// Look up a required path, resolved against the base directory
    pub fn get_path(&self, key: &str) -> Result<PathBuf> {
        let path = PathBuf::from(self.get_str(key)?);
        Ok(self.resolve(path))
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| Error::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

impl FromStr for KeyValueConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

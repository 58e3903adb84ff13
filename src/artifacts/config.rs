//! Repository configuration (`.git/config`)
//!
//! A small ini reader/writer:
//!
//! ```text
//! [core]
//! bare=false
//! repositoryformatversion=0
//! ```
//!
//! Keys are written back grouped by section, both sorted alphabetically.

use anyhow::Context;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

const SECTION_REGEX: &str = r"^\[\s*([^\]]*?)\s*\]";
const KEY_VALUE_REGEX: &str = r"^([^=]+?)\s*=\s*(.*?)$";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<(String, String), String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration written by `init`
    pub fn repository_default() -> Self {
        let mut config = Self::new();
        config.set("core", "repositoryformatversion", "0");
        config.set("core", "filemode", "false");
        config.set("core", "bare", "false");
        config
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .map(String::as_str)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let section_re = regex::Regex::new(SECTION_REGEX)?;
        let key_value_re = regex::Regex::new(KEY_VALUE_REGEX)?;

        let mut config = Self::new();
        let mut section = String::new();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(captures) = section_re.captures(line) {
                section = captures[1].to_string();
            } else if let Some(captures) = key_value_re.captures(line) {
                config.set(&section, captures[1].trim(), &captures[2]);
            }
        }

        Ok(config)
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_string())
            .with_context(|| format!("Unable to write config file {}", path.display()))
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        let mut current_section: Option<&str> = None;

        for ((section, key), value) in &self.values {
            if current_section != Some(section.as_str()) {
                writeln!(out, "[{section}]")?;
                current_section = Some(section);
            }
            writeln!(out, "{key}={value}")?;
        }

        f.write_str(&out)
    }
}

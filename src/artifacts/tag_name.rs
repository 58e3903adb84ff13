use anyhow::Context;

pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

const TAGS_PREFIX: &str = "refs/tags/";

/// A validated tag name, e.g. `v1.0` or `release/2024`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("tag name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_REF_NAME_REGEX)
            .with_context(|| format!("invalid ref name regex: {INVALID_REF_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid tag name: {}", name);
        } else {
            Ok(Self(name))
        }
    }

    /// Path of the loose ref, relative to the metadata directory
    pub fn ref_path(&self) -> String {
        format!("{TAGS_PREFIX}{}", self.0)
    }

    /// Strip the `refs/tags/` prefix from a full ref name
    pub fn strip_ref_prefix(ref_name: &str) -> Option<&str> {
        ref_name.strip_prefix(TAGS_PREFIX)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

use crate::errors::GitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Split a decompressed object into its type name and payload
    ///
    /// The declared size between the space and the NUL is not checked: the payload is
    /// everything after the NUL.
    pub fn split_object_header(data: &[u8]) -> anyhow::Result<(&str, &[u8])> {
        let space = data
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| GitError::malformed("object", "missing space after object type"))?;
        let nul = data[space..]
            .iter()
            .position(|&b| b == b'\0')
            .map(|offset| space + offset)
            .ok_or_else(|| GitError::malformed("object", "missing NUL after object size"))?;

        let object_type = std::str::from_utf8(&data[..space])
            .map_err(|_| GitError::malformed("object", "object type is not UTF-8"))?;

        Ok((object_type, &data[nul + 1..]))
    }

    /// Split a decompressed object into its type and payload
    pub fn parse_object_header(data: &[u8]) -> anyhow::Result<(ObjectType, &[u8])> {
        let (object_type, payload) = Self::split_object_header(data)?;

        Ok((ObjectType::try_from(object_type)?, payload))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(GitError::malformed("object", format!("unknown object type {value:?}")).into()),
        }
    }
}

impl std::str::FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        ObjectType::try_from(s)
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

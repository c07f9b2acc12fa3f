use std::fmt::{self, Display};

use rp_error::{Error, Result};

/// Name of a collection folder under the resources root.
///
/// Always a single path segment, so it can be joined onto the root without
/// escaping it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(String);

impl CollectionId {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::validation("Collection identifier must not be empty"));
        }
        if raw == "." || raw == ".." {
            return Err(Error::validation(format!(
                "Collection identifier '{raw}' is reserved"
            )));
        }
        if raw.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
            return Err(Error::validation(format!(
                "Collection identifier '{raw}' must not contain path separators"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Builds the internal identifier `<name>_<timestamp_millis>` of a newly
    /// created collection.
    pub fn synthesize(name: &str, timestamp_millis: i64) -> Result<Self> {
        let requested = Self::parse(name)?;
        Ok(Self(format!("{}_{timestamp_millis}", requested.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

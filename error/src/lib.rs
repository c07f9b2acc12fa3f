use serde_json::Value;

/// Failures shared by the descriptor store, the backend client and the
/// schema mirror.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Collection {0} is not found")]
    NotFound(String),

    #[error("Property {property} is not found in collection {collection}")]
    PropertyNotFound { collection: String, property: String },

    #[error("Collection {0} already exists")]
    AlreadyExists(String),

    #[error("Descriptor of collection {collection} is corrupt: {message}")]
    Corrupt { collection: String, message: String },

    #[error("Backend is unreachable: {0}")]
    BackendUnreachable(String),

    /// The backend answered, but not with a 2xx status. `body` is kept so it
    /// can be relayed to the client untouched.
    #[error("Backend responded with status {status}")]
    BackendError { status: u16, body: Value },

    #[error("{0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::PropertyNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Error;

    #[test]
    fn classifies_variants() {
        assert!(Error::NotFound("people_1".to_owned()).is_not_found());
        assert!(Error::PropertyNotFound {
            collection: "people_1".to_owned(),
            property: "age".to_owned(),
        }
        .is_not_found());
        assert!(!Error::AlreadyExists("people_1".to_owned()).is_not_found());
        assert!(!Error::BackendError {
            status: 404,
            body: json!({"message": "gone"}),
        }
        .is_not_found());
    }

    #[test]
    fn messages_name_the_subject() {
        let err = Error::PropertyNotFound {
            collection: "cars_17".to_owned(),
            property: "wheels".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Property wheels is not found in collection cars_17"
        );
    }
}

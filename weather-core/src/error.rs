use thiserror::Error;

/// Failures at the boundaries of the core: the weather provider and the
/// preference storage.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("city name must not be empty")]
    EmptyCity,

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("preference storage failed: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl WeatherError {
    pub fn storage<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Anything that ends a fetch without data.
    pub fn is_network(&self) -> bool {
        !self.is_storage()
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_not_network_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = WeatherError::storage("cannot write preferences", io);

        assert!(err.is_storage());
        assert!(!err.is_network());
        assert!(err.to_string().contains("cannot write preferences"));
    }

    #[test]
    fn status_error_mentions_endpoint_and_status() {
        let err = WeatherError::Status {
            endpoint: "forecast",
            status: reqwest::StatusCode::NOT_FOUND,
            body: "city not found".into(),
        };

        assert!(err.is_network());
        let msg = err.to_string();
        assert!(msg.contains("forecast"));
        assert!(msg.contains("404"));
    }
}

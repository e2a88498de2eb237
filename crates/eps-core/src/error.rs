use eps_translator::TranslateError;

/// Failure talking to the remote catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Connectivity lost or request never reached the server
    #[error("Network error: {0}")]
    Network(String),

    /// Server rejected the request
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    pub fn is_network(&self) -> bool {
        matches!(self, CatalogError::Network(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode favorites: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode favorites: {0}")]
    Decode(serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Query is neither Bangla nor Korean, translation cannot pick a direction
    #[error("Please input text in Bangla or Korean")]
    UnsupportedInput,

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

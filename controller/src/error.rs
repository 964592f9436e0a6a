use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Mission(#[from] medroute_structs::Error),
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario {path}: {source}")]
    Scenario {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ControllerError {
    pub fn io(path: impl Into<String>) -> impl FnOnce(std::io::Error) -> ControllerError {
        let path = path.into();
        move |source| ControllerError::Io { path, source }
    }
}

use domain_repo::exception::RepoException;

pub type DeployResult<T> = Result<T, DeployException>;

#[derive(Debug, thiserror::Error)]
pub enum DeployException {
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The deploy is not in a state allowing the action, e.g. still running.
    #[error("{message}")]
    InvalidState { message: String },

    /// The primary action of an operation failed.
    #[error("{message}, {source}")]
    Failed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Repo(#[from] RepoException),

    #[error("deploy internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl DeployException {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Failed {
            message: message.into(),
            source: source.into(),
        }
    }

    /// HTTP-like status code of the failure.
    pub fn status(&self) -> u16 {
        match self {
            DeployException::Unauthorized { .. } => 401,
            DeployException::Forbidden { .. } => 403,
            DeployException::NotFound { .. } => 404,
            DeployException::BadRequest { .. } => 400,
            DeployException::InvalidState { .. } => 409,
            DeployException::Repo(e) => e.status(),
            DeployException::Failed { source, .. } => source
                .downcast_ref::<DeployException>()
                .map_or(500, DeployException::status),
            DeployException::InternalError { .. } => 500,
        }
    }
}

impl From<anyhow::Error> for DeployException {
    fn from(e: anyhow::Error) -> Self {
        DeployException::InternalError { source: e }
    }
}

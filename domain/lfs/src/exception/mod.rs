use domain_repo::exception::RepoException;

pub type LfsResult<T> = Result<T, LfsException>;

#[derive(Debug, thiserror::Error)]
pub enum LfsException {
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("already exists: {message}")]
    AlreadyExists { message: String },

    /// The caller may not remove a lock owned by someone else.
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("size mismatch for {oid}: expected {expected}, stored {actual}")]
    SizeMismatch { oid: String, expected: i64, actual: i64 },

    #[error(transparent)]
    Repo(#[from] RepoException),

    #[error("lfs internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl LfsException {
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

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            LfsException::Unauthorized { .. } => 401,
            LfsException::Forbidden { .. } | LfsException::PermissionDenied { .. } => 403,
            LfsException::NotFound { .. } => 404,
            LfsException::BadRequest { .. } => 400,
            LfsException::AlreadyExists { .. } => 409,
            LfsException::SizeMismatch { .. } => 422,
            LfsException::Repo(e) => e.status(),
            LfsException::InternalError { .. } => 500,
        }
    }
}

impl From<anyhow::Error> for LfsException {
    fn from(e: anyhow::Error) -> Self {
        LfsException::InternalError { source: e }
    }
}

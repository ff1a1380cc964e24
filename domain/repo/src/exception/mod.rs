pub type RepoResult<T> = Result<T, RepoException>;

#[derive(Debug, thiserror::Error)]
pub enum RepoException {
    #[error("user not found: {username}")]
    UserNotFound { username: String },

    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    #[error("namespace not found: {path}")]
    NamespaceNotFound { path: String },

    #[error("repo internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl RepoException {
    pub fn status(&self) -> u16 {
        match self {
            RepoException::UserNotFound { .. } => 401,
            RepoException::RepoNotFound { .. } | RepoException::NamespaceNotFound { .. } => 404,
            RepoException::InternalError { .. } => 500,
        }
    }
}

impl From<anyhow::Error> for RepoException {
    fn from(e: anyhow::Error) -> Self {
        RepoException::InternalError { source: e }
    }
}

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Authentication required")]
    AuthenticationRequired,
}

pub type Result<T> = std::result::Result<T, AuthError>;

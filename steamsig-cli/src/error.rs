use steamsig::SteamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Couldn't load configuration: {0}")]
    ConfigError(SteamError),

    #[error("Couldn't set up the Steam client: {0}")]
    ClientError(SteamError),

    #[error("Couldn't build redirect: {0}")]
    RedirectError(SteamError),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

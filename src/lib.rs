pub mod api;
pub mod cache;
pub mod config;
mod errors;
pub mod presence;
pub mod profile;
pub mod signature;

pub use api::{Api, HttpReply, HttpTransport, Transport};
pub use cache::{CacheStore, MemoryCache};
pub use config::Config;
pub use errors::{ErrorKind, Result, SteamError};
pub use presence::{classify, DisplayState};
pub use profile::{Identifier, Profile, SteamId};
pub use signature::{Action, Signature};

/// Looks up a profile and turns the outcome, success or failure, into
/// signature render parameters.
pub async fn signature_for<T: Transport, C: CacheStore>(
    api: &Api<T, C>,
    identifier: &Identifier,
) -> Signature {
    Signature::from_outcome(&api.fetch_profile(identifier).await)
}

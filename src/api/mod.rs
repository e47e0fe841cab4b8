mod transport;

use std::time::Duration;

use serde_json::{Map, Value};
use url::Url;

use crate::cache::{CacheStore, MemoryCache};
use crate::config::Config;
use crate::profile::{Identifier, PlayerSummary, Profile, SteamId};
use crate::{Result, SteamError};

pub use transport::{HttpReply, HttpTransport, Transport};

const FORMAT: &str = "json";

/// Namespace for every key this crate writes to a shared cache store
pub const CACHE_KEY_PREFIX: &str = "steamsig_";

/// Aliases practically never change owner
pub const VANITY_URL_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 15);
/// Presence changes often
pub const PLAYER_SUMMARY_TTL: Duration = Duration::from_secs(5 * 60);

const NO_MATCH: &str = "No match";

/// Client for the subset of the Steam Web API needed to draw a signature.
///
/// Lookups are read-through cached when a cache store is attached and
/// cache usage is enabled.
pub struct Api<T, C = MemoryCache> {
    key: String,
    base_url: String,
    transport: T,
    cache: Option<C>,
    cache_usage: bool,
}

impl Api<HttpTransport, MemoryCache> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut api = Api::new(
            config.api_key.clone(),
            HttpTransport::new()?,
            Some(MemoryCache::new("steam-api")),
        )
        .with_base_url(config.base_url.clone());
        api.set_cache_usage(config.cache_usage);
        Ok(api)
    }
}

impl<T: Transport, C: CacheStore> Api<T, C> {
    pub fn new(key: impl Into<String>, transport: T, cache: Option<C>) -> Self {
        Self {
            key: key.into(),
            base_url: crate::config::DEFAULT_BASE_URL.to_owned(),
            transport,
            cache,
            cache_usage: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Toggles reads from and writes to the cache store
    pub fn set_cache_usage(&mut self, enable: bool) -> &mut Self {
        self.cache_usage = enable;
        self
    }

    pub fn cache_usage(&self) -> bool {
        self.cache_usage
    }

    pub fn cache(&self) -> Option<&C> {
        self.cache.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves a vanity URL alias into a Steam ID.
    pub async fn resolve_vanity_url(&self, vanity_url: &str) -> Result<SteamId> {
        if vanity_url.is_empty() {
            return Err(SteamError::InvalidInput(
                "empty vanity URL".to_owned(),
            ));
        }

        let key = format!("alias:{}", vanity_url);
        if let Some(cached) = self.cached_value(&key) {
            match cached.parse::<SteamId>() {
                Ok(steam_id) => return Ok(steam_id),
                Err(e) => {
                    log::warn!("discarding cached value for {}: {}", key, e)
                }
            }
        }

        let url = self.build_request_url(
            "ISteamUser",
            "ResolveVanityURL",
            1,
            &[("vanityurl", vanity_url)],
        )?;
        let data = self.request(&url).await?;

        let steam_id = match data.get("steamid").and_then(Value::as_str) {
            Some(steam_id) => steam_id.parse::<SteamId>().map_err(|_| {
                SteamError::BadResponse(format!(
                    "response includes an invalid steamid \"{}\"",
                    steam_id
                ))
            })?,
            None => {
                if data.get("message").and_then(Value::as_str) == Some(NO_MATCH)
                {
                    return Err(SteamError::NotFound(vanity_url.to_owned()));
                }
                return Err(SteamError::BadResponse(format!(
                    "response does not include a steamid field: {}",
                    Value::Object(data)
                )));
            }
        };

        self.cache_value(&key, steam_id.to_string(), VANITY_URL_TTL);
        Ok(steam_id)
    }

    /// Fetches the player summary of a single Steam ID.
    pub async fn fetch_player_summary(&self, steam_id: &SteamId) -> Result<Profile> {
        let key = format!("profile:{}", steam_id);
        if let Some(cached) = self.cached_value(&key) {
            let profile = serde_json::from_str::<PlayerSummary>(&cached)
                .map_err(SteamError::from)
                .and_then(Profile::try_from);
            match profile {
                Ok(profile) => return Ok(profile),
                Err(e) => {
                    log::warn!("discarding cached value for {}: {}", key, e)
                }
            }
        }

        let url = self.build_request_url(
            "ISteamUser",
            "GetPlayerSummaries",
            2,
            &[("steamids", steam_id.as_str())],
        )?;
        let mut data = self.request(&url).await?;

        let record = match data.remove("players") {
            Some(Value::Array(players)) => players.into_iter().next(),
            _ => None,
        }
        .filter(|record| match record {
            Value::Null => false,
            Value::Object(fields) => !fields.is_empty(),
            _ => true,
        })
        .ok_or_else(|| SteamError::NotFound(steam_id.to_string()))?;

        let summary: PlayerSummary = serde_json::from_value(record)?;
        let raw = serde_json::to_string(&summary)?;
        let profile = Profile::try_from(summary)?;

        self.cache_value(&key, raw, PLAYER_SUMMARY_TTL);
        Ok(profile)
    }

    /// Turns an identifier into its canonical Steam ID, resolving aliases.
    pub async fn resolve(&self, identifier: &Identifier) -> Result<SteamId> {
        match identifier {
            Identifier::Canonical(steam_id) => Ok(steam_id.clone()),
            Identifier::Alias(alias) => self.resolve_vanity_url(alias).await,
        }
    }

    pub async fn fetch_profile(&self, identifier: &Identifier) -> Result<Profile> {
        let steam_id = self.resolve(identifier).await?;
        self.fetch_player_summary(&steam_id).await
    }

    /// Builds the URL of a Web API method call.
    pub fn build_request_url(
        &self,
        interface: &str,
        method: &str,
        version: u32,
        params: &[(&str, &str)],
    ) -> Result<Url> {
        let endpoint = format!(
            "{}/{}/{}/v{:04}/",
            self.base_url.trim_end_matches('/'),
            interface,
            method,
            version
        );
        let query = [("format", FORMAT), ("key", self.key.as_str())]
            .into_iter()
            .chain(params.iter().copied());
        Url::parse_with_params(&endpoint, query).map_err(|e| {
            SteamError::InvalidInput(format!("invalid request URL: {}", e))
        })
    }

    /// Performs a request and returns the payload inside the `response`
    /// envelope field.
    pub async fn request(&self, url: &Url) -> Result<Map<String, Value>> {
        log::debug!("requesting {}", url.path());

        let reply = self.transport.get(url).await?;
        if !reply.is_success() {
            return Err(SteamError::BadResponse(format!(
                "Steam Web API returned HTTP status {}",
                reply.status
            )));
        }
        if reply.body.trim().is_empty() {
            return Err(SteamError::BadResponse(
                "Steam Web API returned an empty body".to_owned(),
            ));
        }

        let mut result: Value =
            serde_json::from_str(&reply.body).map_err(|e| {
                SteamError::BadResponse(format!(
                    "JSON response could not be decoded: {}",
                    e
                ))
            })?;

        match result.get_mut("response").map(Value::take) {
            Some(Value::Object(payload)) => Ok(payload),
            _ => Err(SteamError::BadResponse(
                "JSON response does not include a response field".to_owned(),
            )),
        }
    }

    fn cached_value(&self, key: &str) -> Option<String> {
        if !self.cache_usage {
            return None;
        }
        self.cache
            .as_ref()?
            .get(&format!("{}{}", CACHE_KEY_PREFIX, key))
    }

    fn cache_value(&self, key: &str, value: String, ttl: Duration) -> bool {
        let cache = match (&self.cache, self.cache_usage) {
            (Some(cache), true) => cache,
            _ => return true,
        };
        let stored =
            cache.set(&format!("{}{}", CACHE_KEY_PREFIX, key), value, ttl);
        if !stored {
            log::warn!("cache rejected {}", key);
        }
        stored
    }
}

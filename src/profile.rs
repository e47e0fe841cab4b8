use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, SteamError};

/// Server address reported for sessions that are not on a multiplayer server.
pub const NO_SERVER: &str = "0.0.0.0:0";

/// Canonical 64-bit Steam community ID, kept in its decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SteamId(String);

impl SteamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SteamId {
    type Err = SteamError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SteamError::InvalidInput(format!(
                "\"{}\" is not a numeric Steam ID",
                s
            )));
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for SteamId {
    type Error = SteamError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SteamId> for String {
    fn from(id: SteamId) -> Self {
        id.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a caller asked for: either an ID or a vanity alias that still
/// needs to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Canonical(SteamId),
    Alias(String),
}

impl FromStr for Identifier {
    type Err = SteamError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SteamError::InvalidInput(
                "empty profile identifier".to_owned(),
            ));
        }
        match s.parse::<SteamId>() {
            Ok(id) => Ok(Identifier::Canonical(id)),
            Err(_) => Ok(Identifier::Alias(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
    /// A state newer than this client; any such state counts as online
    Unknown(i64),
}

impl PersonaState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaState::Offline => "offline",
            PersonaState::Online => "online",
            PersonaState::Busy => "busy",
            PersonaState::Away => "away",
            PersonaState::Snooze => "snooze",
            PersonaState::LookingToTrade => "looking to trade",
            PersonaState::LookingToPlay => "looking to play",
            PersonaState::Unknown(_) => "unknown status",
        }
    }

    pub fn is_online(&self) -> bool {
        *self != PersonaState::Offline
    }
}

impl From<i64> for PersonaState {
    fn from(value: i64) -> Self {
        match value {
            0 => PersonaState::Offline,
            1 => PersonaState::Online,
            2 => PersonaState::Busy,
            3 => PersonaState::Away,
            4 => PersonaState::Snooze,
            5 => PersonaState::LookingToTrade,
            6 => PersonaState::LookingToPlay,
            other => PersonaState::Unknown(other),
        }
    }
}

impl fmt::Display for PersonaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaState::Unknown(value) => {
                write!(f, "{}: {}", self.as_str(), value)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Community visibility of a profile.
///
/// Restricted data only exists for public profiles, so it lives inside
/// the `Public` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "visibility", rename_all = "snake_case")]
pub enum Visibility {
    Private,
    Public(Restricted),
}

impl Visibility {
    pub const WIRE_PUBLIC: i64 = 3;

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public(_) => "public",
        }
    }

    pub fn restricted(&self) -> Option<&Restricted> {
        match self {
            Visibility::Private => None,
            Visibility::Public(restricted) => Some(restricted),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub steam_id: SteamId,
    pub display_name: String,
    pub profile_url: String,
    pub avatar: String,
    pub avatar_medium: String,
    pub avatar_full: String,
    pub persona_state: PersonaState,
    pub visibility: Visibility,
    /// Whether the user has set up a community profile
    pub profile_configured: bool,
    pub last_logoff: Option<DateTime<Utc>>,
    pub comment_permission: bool,
}

impl Profile {
    pub fn is_private(&self) -> bool {
        matches!(self.visibility, Visibility::Private)
    }

    pub fn game(&self) -> Option<&GameSession> {
        self.visibility
            .restricted()
            .and_then(|restricted| restricted.game.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Restricted {
    pub real_name: Option<String>,
    pub primary_group_id: Option<String>,
    pub time_created: Option<DateTime<Utc>>,
    pub game: Option<GameSession>,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub country_code: Option<String>,
    pub state_code: Option<String>,
    pub city_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSession {
    pub id: Option<String>,
    pub server_ip: String,
    pub extra_info: String,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            id: None,
            server_ip: NO_SERVER.to_owned(),
            extra_info: String::new(),
        }
    }
}

impl GameSession {
    pub fn is_multiplayer(&self) -> bool {
        self.server_ip != NO_SERVER
    }

    /// A multiplayer session on a publicly routable IP address.
    pub fn is_joinable(&self) -> bool {
        if !self.is_multiplayer() {
            return false;
        }
        match server_host(&self.server_ip) {
            Some(ip) => is_public_ip(ip),
            None => false,
        }
    }

    /// `steam://connect/` link for joinable sessions.
    pub fn connect_url(&self) -> Option<String> {
        if !self.is_joinable() {
            return None;
        }
        Some(format!("steam://connect/{}", self.server_ip))
    }
}

fn server_host(address: &str) -> Option<IpAddr> {
    address
        .parse::<SocketAddr>()
        .map(|socket| socket.ip())
        .or_else(|_| address.parse::<IpAddr>())
        .ok()
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [first, second, ..] = v4.octets();
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || first == 0
                // carrier-grade NAT
                || (first == 100 && (64..128).contains(&second))
                || first >= 240)
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_public_ip(IpAddr::V4(v4));
            }
            let head = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                // unique local fc00::/7
                || (head & 0xfe00) == 0xfc00
                // link local fe80::/10
                || (head & 0xffc0) == 0xfe80)
        }
    }
}

/// A player record as returned by `GetPlayerSummaries`.
///
/// This is also the form profiles are cached in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    pub personaname: String,
    pub profileurl: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatarmedium: String,
    #[serde(default)]
    pub avatarfull: String,
    pub personastate: i64,
    pub communityvisibilitystate: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profilestate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastlogoff: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentpermission: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primaryclanid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecreated: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameserverip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameextrainfo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loccountrycode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locstatecode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loccityid: Option<i64>,
}

impl TryFrom<PlayerSummary> for Profile {
    type Error = SteamError;

    fn try_from(data: PlayerSummary) -> Result<Self> {
        let steam_id = data.steamid.parse::<SteamId>().map_err(|_| {
            SteamError::BadResponse(format!(
                "player record has an invalid steamid \"{}\"",
                data.steamid
            ))
        })?;
        let persona_state = PersonaState::from(data.personastate);
        let last_logoff = data.lastlogoff.map(timestamp).transpose()?;

        let visibility =
            if data.communityvisibilitystate == Visibility::WIRE_PUBLIC {
                Visibility::Public(restricted(&data)?)
            } else {
                Visibility::Private
            };

        Ok(Profile {
            steam_id,
            display_name: data.personaname,
            profile_url: data.profileurl,
            avatar: data.avatar,
            avatar_medium: data.avatarmedium,
            avatar_full: data.avatarfull,
            persona_state,
            visibility,
            profile_configured: data.profilestate.unwrap_or(0) != 0,
            last_logoff,
            comment_permission: data.commentpermission.unwrap_or(0) != 0,
        })
    }
}

fn restricted(data: &PlayerSummary) -> Result<Restricted> {
    let time_created = match data.timecreated {
        Some(0) | None => None,
        Some(secs) => Some(timestamp(secs)?),
    };

    let game_id = present(&data.gameid);
    let extra_info = present(&data.gameextrainfo);
    let game = if game_id.is_some() || extra_info.is_some() {
        Some(GameSession {
            id: game_id,
            server_ip: present(&data.gameserverip)
                .unwrap_or_else(|| NO_SERVER.to_owned()),
            extra_info: extra_info.unwrap_or_default(),
        })
    } else {
        None
    };

    Ok(Restricted {
        real_name: present(&data.realname),
        primary_group_id: present(&data.primaryclanid),
        time_created,
        game,
        location: Location {
            country_code: present(&data.loccountrycode),
            state_code: present(&data.locstatecode),
            city_id: data.loccityid.filter(|id| *id != 0),
        },
    })
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        SteamError::BadResponse(format!("timestamp {} is out of range", secs))
    })
}

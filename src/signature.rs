use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use url::Url;

use crate::presence::{classify, DisplayState};
use crate::profile::{Profile, SteamId};
use crate::{ErrorKind, Result, SteamError};

/// Longest text that fits on a signature line
pub const MAX_LINE_CHARS: usize = 40;
/// Horizontal offset of all texts, right of the avatar
pub const TEXT_X_POSITION: f32 = 48.0;
/// How long clients may keep a rendered signature
pub const MAX_AGE_SECS: i64 = 5 * 60;

const ELLIPSIS: &str = "...";

/// What the caller wants back for a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// The signature image
    #[default]
    Img,
    /// A redirect to the profile, or into the game session
    Go,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Img => "img",
            Action::Go => "go",
        }
    }
}

/// Anything but `go` asks for the image.
impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
        match s.trim() {
            "go" => Ok(Action::Go),
            "" | "img" => Ok(Action::Img),
            other => {
                log::debug!("unknown action \"{}\", serving the image", other);
                Ok(Action::Img)
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render parameters of one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub state: DisplayState,
    /// Avatar to draw, absent for error signatures
    pub avatar: Option<String>,
    pub profile_url: Option<String>,
    /// Set when the profile is in a joinable game; the renderer then
    /// overlays the connect badge
    pub connect_url: Option<String>,
}

impl Signature {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            state: classify(profile),
            avatar: Some(profile.avatar.clone()),
            profile_url: Some(profile.profile_url.clone()),
            connect_url: profile.game().and_then(|game| game.connect_url()),
        }
    }

    /// Error signature. The error itself only goes to the log.
    pub fn from_error(error: &SteamError) -> Self {
        match error.kind() {
            ErrorKind::NotFound => {
                log::debug!("signature for unknown profile: {}", error)
            }
            _ => log::warn!("signature failed: {}", error),
        }
        Self {
            state: DisplayState::from_error(error),
            avatar: None,
            profile_url: None,
            connect_url: None,
        }
    }

    pub fn from_outcome(outcome: &Result<Profile>) -> Self {
        match outcome {
            Ok(profile) => Self::from_profile(profile),
            Err(error) => Self::from_error(error),
        }
    }

    pub fn show_connect_badge(&self) -> bool {
        self.connect_url.is_some()
    }

    /// Where a click on the signature leads: into the game when it can be
    /// joined, to the profile otherwise.
    pub fn link_target(&self) -> Option<&str> {
        self.connect_url
            .as_deref()
            .or(self.profile_url.as_deref())
    }

    /// Header and content lines shortened to fit the image
    pub fn texts(&self) -> [String; 3] {
        [
            shorten_text(&self.state.header, MAX_LINE_CHARS),
            shorten_text(&self.state.line1, MAX_LINE_CHARS),
            self.state
                .line2
                .as_deref()
                .map(|line| shorten_text(line, MAX_LINE_CHARS))
                .unwrap_or_default(),
        ]
    }

    /// Caching headers of the image response
    pub fn headers(now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let expires = now + Duration::seconds(MAX_AGE_SECS);
        vec![
            ("Cache-Control", format!("max-age={}", MAX_AGE_SECS)),
            ("Expires", expires.format("%a, %d %b %Y %H:%M:%S").to_string()),
            ("Pragma", "cache".to_owned()),
        ]
    }
}

/// Cuts `text` down to at most `chars` characters at a word boundary and
/// appends "...".
pub fn shorten_text(text: &str, chars: usize) -> String {
    if text.chars().count() <= chars {
        return text.to_owned();
    }
    let padded = format!("{} ", text);
    let head: String = padded.chars().take(chars).collect();
    let cut = head.rfind(' ').unwrap_or(0);
    format!("{}{}", &head[..cut], ELLIPSIS)
}

/// Canonical signature URL to redirect an alias request to, once the alias
/// has been resolved.
///
/// `script` is the URL the request came in on. Its query keeps every other
/// parameter, with `id` and `action` replaced. With `rewrite`, the pretty
/// `profilesig/` form next to the script is used instead of a query.
pub fn redirect_target(
    script: &Url,
    steam_id: &SteamId,
    action: Action,
    rewrite: bool,
) -> Result<Url> {
    if !rewrite {
        let mut pairs: Vec<(String, String)> = script
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        let replaced = [("id", steam_id.as_str()), ("action", action.as_str())];
        for (name, value) in replaced {
            match pairs.iter_mut().find(|(key, _)| key == name) {
                Some(pair) => pair.1 = value.to_owned(),
                None => pairs.push((name.to_owned(), value.to_owned())),
            }
        }

        let mut url = script.clone();
        url.query_pairs_mut().clear().extend_pairs(&pairs);
        return Ok(url);
    }

    let path = match action {
        Action::Go => format!("profilesig/{}/go", steam_id),
        Action::Img => format!("profilesig/{}.png", steam_id),
    };
    script.join(&path).map_err(|e| {
        SteamError::InvalidInput(format!("invalid redirect base {}: {}", script, e))
    })
}

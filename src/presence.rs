//! Presence classification of a profile into the state a signature shows.

use serde::Serialize;

use crate::profile::{Profile, Visibility};
use crate::{ErrorKind, SteamError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Text colors of the header and of the content lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Palette {
    pub header: Color,
    pub content: Color,
}

impl Palette {
    pub const PRIVATE: Palette = Palette {
        header: Color::new(137, 137, 137),
        content: Color::new(242, 108, 79),
    };
    pub const IN_GAME: Palette = Palette {
        header: Color::new(177, 251, 80),
        content: Color::new(139, 197, 63),
    };
    pub const ONLINE: Palette = Palette {
        header: Color::new(111, 189, 255),
        content: Color::new(98, 167, 227),
    };
    pub const OFFLINE: Palette = Palette {
        header: Color::new(137, 137, 137),
        content: Color::new(137, 137, 137),
    };
    pub const ERROR: Palette = Palette {
        header: Color::new(238, 68, 68),
        content: Color::new(238, 68, 68),
    };
}

/// Status box drawn next to the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Offline,
    InGame,
    Online,
    Error,
}

impl Badge {
    pub fn file_name(&self) -> &'static str {
        match self {
            Badge::Offline => "box_offline.png",
            Badge::InGame => "box_ingame.png",
            Badge::Online => "box_online.png",
            Badge::Error => "box_error.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceKind {
    Private,
    InGame,
    Online,
    Offline,
    Error,
}

/// Everything the renderer needs to draw the text part of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DisplayState {
    pub kind: PresenceKind,
    pub palette: Palette,
    pub badge: Badge,
    pub header: String,
    pub line1: String,
    pub line2: Option<String>,
}

const ERROR_HEADER: &str = "Error";
const TRY_AGAIN: &str = "Please try again later";

impl DisplayState {
    fn new(
        kind: PresenceKind,
        palette: Palette,
        badge: Badge,
        header: &str,
        line1: impl Into<String>,
        line2: Option<String>,
    ) -> Self {
        Self {
            kind,
            palette,
            badge,
            header: sanitize_header(header),
            line1: line1.into(),
            line2,
        }
    }

    /// The state shown instead of a profile when fetching it failed.
    ///
    /// Only the error kind is shown, never the upstream error text.
    pub fn from_error(error: &SteamError) -> Self {
        Self::for_error_kind(error.kind())
    }

    pub fn for_error_kind(kind: ErrorKind) -> Self {
        let (line1, line2) = match kind {
            ErrorKind::Timeout => {
                ("Couldn't connect to Steam", Some(TRY_AGAIN.to_owned()))
            }
            ErrorKind::NotFound => ("Please check Steam ID", None),
            ErrorKind::BadResponse | ErrorKind::InvalidInput => (TRY_AGAIN, None),
        };
        Self::new(
            PresenceKind::Error,
            Palette::ERROR,
            Badge::Error,
            ERROR_HEADER,
            line1,
            line2,
        )
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.line1.as_str()).chain(self.line2.as_deref())
    }
}

/// Picks the display state of a profile. The first matching rule wins:
/// private, in a game, online, offline.
pub fn classify(profile: &Profile) -> DisplayState {
    let name = profile.display_name.as_str();

    let restricted = match &profile.visibility {
        Visibility::Private => {
            return DisplayState::new(
                PresenceKind::Private,
                Palette::PRIVATE,
                Badge::Offline,
                name,
                "This profile is private.",
                Some("Online status not available.".to_owned()),
            )
        }
        Visibility::Public(restricted) => restricted,
    };

    if let Some(game) = &restricted.game {
        let (line1, line2) = if game.extra_info.is_empty() {
            ("In-Game".to_owned(), None)
        } else {
            // addresses of servers nobody can join are not disclosed
            let address = game.is_joinable().then(|| game.server_ip.clone());
            (format!("Playing {}", game.extra_info), address)
        };
        return DisplayState::new(
            PresenceKind::InGame,
            Palette::IN_GAME,
            Badge::InGame,
            name,
            line1,
            line2,
        );
    }

    if profile.persona_state.is_online() {
        DisplayState::new(
            PresenceKind::Online,
            Palette::ONLINE,
            Badge::Online,
            name,
            "online",
            None,
        )
    } else {
        DisplayState::new(
            PresenceKind::Offline,
            Palette::OFFLINE,
            Badge::Offline,
            name,
            "offline",
            None,
        )
    }
}

/// Drops everything but printable ASCII, which is all the signature font
/// can draw.
pub fn sanitize_header(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use steamsig::presence::{Badge, PresenceKind};
    use steamsig::{
        signature_for, Api, HttpReply, Identifier, MemoryCache, Result,
        SteamError, Transport,
    };
    use url::Url;

    const STEAM_ID: &str = "76561197963139525";

    /// Serves canned replies in order and records the requested methods.
    struct ScriptedTransport {
        replies: Mutex<Vec<Result<HttpReply>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(mut replies: Vec<Result<HttpReply>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        async fn get(&self, url: &Url) -> Result<HttpReply> {
            self.requested
                .lock()
                .unwrap()
                .push(url.path().to_owned());
            self.replies.lock().unwrap().pop().unwrap_or_else(|| {
                Err(SteamError::Timeout("no more replies".to_owned()))
            })
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn api(replies: Vec<Result<HttpReply>>) -> Api<ScriptedTransport> {
        init_logger();
        Api::new(
            "KEY",
            ScriptedTransport::new(replies),
            Some(MemoryCache::new("integration")),
        )
    }

    fn player(extra: &str) -> Result<HttpReply> {
        Ok(HttpReply::ok(format!(
            r#"{{"response": {{"players": [{{
                "steamid": "{}",
                "personaname": "someone",
                "profileurl": "https://steamcommunity.com/id/someone/",
                "avatar": "a.jpg",
                "avatarmedium": "a_medium.jpg",
                "avatarfull": "a_full.jpg",
                {}
            }}]}}}}"#,
            STEAM_ID, extra
        )))
    }

    #[tokio::test]
    async fn unknown_alias_gives_check_id_signature() {
        let no_match = || {
            Ok(HttpReply::ok(
                r#"{"response": {"success": 42, "message": "No match"}}"#,
            ))
        };
        // misses are not cached, both lookups reach upstream
        let api = api(vec![no_match(), no_match()]);
        let identifier: Identifier = "no_such_user_xyz".parse().unwrap();

        let err = api.fetch_profile(&identifier).await.unwrap_err();
        assert_eq!(err, SteamError::NotFound("no_such_user_xyz".to_owned()));

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::Error);
        assert_eq!(signature.state.badge, Badge::Error);
        assert_eq!(signature.state.line1, "Please check Steam ID");
    }

    #[tokio::test]
    async fn public_online_profile() {
        let api = api(vec![player(
            r#""personastate": 1, "communityvisibilitystate": 3"#,
        )]);
        let identifier: Identifier = STEAM_ID.parse().unwrap();

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::Online);
        assert_eq!(signature.state.line1, "online");
        assert_eq!(signature.state.line2, None);
        assert_eq!(signature.avatar.as_deref(), Some("a.jpg"));
    }

    #[tokio::test]
    async fn unrecognized_persona_state_shows_online() {
        let api = api(vec![player(
            r#""personastate": 7, "communityvisibilitystate": 3"#,
        )]);
        let identifier: Identifier = STEAM_ID.parse().unwrap();

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::Online);
        assert_eq!(signature.state.badge, Badge::Online);
        assert_eq!(signature.state.line1, "online");
    }

    #[tokio::test]
    async fn joinable_game_session() {
        let api = api(vec![player(
            r#""personastate": 1, "communityvisibilitystate": 3,
               "gameid": "730", "gameserverip": "172.217.16.195:80",
               "gameextrainfo": "Generic Shooter""#,
        )]);
        let identifier: Identifier = STEAM_ID.parse().unwrap();

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::InGame);
        assert_eq!(signature.state.line1, "Playing Generic Shooter");
        assert_eq!(signature.state.line2.as_deref(), Some("172.217.16.195:80"));
        assert!(signature.show_connect_badge());
    }

    #[tokio::test]
    async fn loopback_game_session_hides_address() {
        let api = api(vec![player(
            r#""personastate": 1, "communityvisibilitystate": 3,
               "gameserverip": "127.0.0.1:80",
               "gameextrainfo": "Generic Shooter""#,
        )]);
        let identifier: Identifier = STEAM_ID.parse().unwrap();

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::InGame);
        assert_eq!(signature.state.line1, "Playing Generic Shooter");
        assert_eq!(signature.state.line2, None);
        assert!(!signature.show_connect_badge());
    }

    #[tokio::test]
    async fn private_profile_ignores_everything_else() {
        let api = api(vec![player(
            r#""personastate": 1, "communityvisibilitystate": 1,
               "gameserverip": "172.217.16.195:80",
               "gameextrainfo": "Generic Shooter",
               "realname": "Hidden""#,
        )]);
        let identifier: Identifier = STEAM_ID.parse().unwrap();

        let profile = api.fetch_profile(&identifier).await.unwrap();
        assert!(profile.visibility.restricted().is_none());

        // served from the cache, no second reply is scripted
        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::Private);
        assert_eq!(signature.state.line1, "This profile is private.");
        assert_eq!(
            signature.link_target(),
            Some("https://steamcommunity.com/id/someone/")
        );
    }

    #[tokio::test]
    async fn alias_then_summary() {
        let api = api(vec![
            Ok(HttpReply::ok(format!(
                r#"{{"response": {{"steamid": "{}", "success": 1}}}}"#,
                STEAM_ID
            ))),
            player(r#""personastate": 0, "communityvisibilitystate": 3"#),
        ]);
        let identifier: Identifier = "someone".parse().unwrap();

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.kind, PresenceKind::Offline);
        assert_eq!(
            *api.transport().requested.lock().unwrap(),
            vec![
                "/ISteamUser/ResolveVanityURL/v0001/",
                "/ISteamUser/GetPlayerSummaries/v0002/",
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_upstream() {
        let api = api(vec![]);
        let identifier: Identifier = STEAM_ID.parse().unwrap();

        let signature = signature_for(&api, &identifier).await;
        assert_eq!(signature.state.line1, "Couldn't connect to Steam");
        assert_eq!(
            signature.state.line2.as_deref(),
            Some("Please try again later")
        );
    }
}

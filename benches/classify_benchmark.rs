use criterion::{black_box, criterion_group, criterion_main, Criterion};
use steamsig::profile::{
    GameSession, PersonaState, Profile, Restricted, Visibility,
};
use steamsig::{classify, Signature};

fn profile(persona_state: PersonaState, visibility: Visibility) -> Profile {
    Profile {
        steam_id: "76561197963139525".parse().unwrap(),
        display_name: "someone with a fairly long display name ★".to_owned(),
        profile_url: "https://steamcommunity.com/id/someone/".to_owned(),
        avatar: "a.jpg".to_owned(),
        avatar_medium: "a_medium.jpg".to_owned(),
        avatar_full: "a_full.jpg".to_owned(),
        persona_state,
        visibility,
        profile_configured: true,
        last_logoff: None,
        comment_permission: true,
    }
}

fn in_game(server_ip: &str) -> Visibility {
    Visibility::Public(Restricted {
        game: Some(GameSession {
            id: Some("730".to_owned()),
            server_ip: server_ip.to_owned(),
            extra_info: "A Very Long Game Title: The Sequel To The Prequel"
                .to_owned(),
        }),
        ..Default::default()
    })
}

fn classify_benchmark(c: &mut Criterion) {
    let inputs = [
        ("private", profile(PersonaState::Online, Visibility::Private)),
        ("joinable", profile(PersonaState::Online, in_game("172.217.16.195:80"))),
        ("loopback", profile(PersonaState::Online, in_game("127.0.0.1:80"))),
        (
            "offline",
            profile(PersonaState::Offline, Visibility::Public(Restricted::default())),
        ),
    ];

    for (name, profile) in inputs.iter() {
        let mut group = c.benchmark_group(name.to_string());
        group.measurement_time(std::time::Duration::from_secs(5));

        group.bench_function("classify", |b| {
            b.iter(|| classify(black_box(profile)))
        });
        group.bench_function("signature_texts", |b| {
            b.iter(|| Signature::from_profile(black_box(profile)).texts())
        });

        group.finish();
    }
}

criterion_group!(benches, classify_benchmark);
criterion_main!(benches);

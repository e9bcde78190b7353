mod common;

use cardbound_engine::presentation::{character_sheet, Recorder};
use cardbound_engine::{
    AuthorityError, BoostRequest, CardId, CharacterForm, Class, CombatStatus, Game, Race,
    RoundAction, RoundOutcome, SessionError, StatName, UiEvent,
};
use common::{fight_started, ScriptedAuthority, Seen};
use serde_json::json;

type TestGame = Game<ScriptedAuthority, Recorder>;

fn game(seed: u64) -> TestGame {
    Game::new(ScriptedAuthority::new(seed), Recorder::new())
}

fn aria() -> CharacterForm {
    CharacterForm {
        name: "Aria".into(),
        race: Some(Race::Elf),
        class: Some(Class::Mage),
    }
}

async fn created(seed: u64) -> TestGame {
    let mut g = game(seed);
    g.create_character(&aria()).await.unwrap();
    g
}

#[tokio::test]
async fn create_boost_build_and_fight() {
    let mut g = created(7).await;

    g.authority().push_draw(Ok(3));
    g.choose_stat(StatName::Strength).unwrap();
    assert_eq!(g.draw_and_apply().await, Ok(1));
    g.authority().push_draw(Ok(1));
    g.choose_stat(StatName::Luck).unwrap();
    assert_eq!(g.draw_and_apply().await, Ok(2));
    assert!(g.boost().is_complete());

    g.toggle_card(CardId(3)).unwrap();
    g.toggle_card(CardId(1)).unwrap();

    g.authority().push_round(Ok(fight_started()));
    assert_eq!(g.start_combat().await, Ok(RoundOutcome::FightStarted));
    g.show_hand().unwrap();
    g.select_card(CardId(1)).unwrap();

    g.authority().push_round_json(json!({
        "result": "You cast Fireball for 10 damage",
        "playerHP": 30, "playerMana": 5,
        "enemyHP": 2, "combatOver": false
    }));
    assert_eq!(g.cast_spell().await, Ok(RoundOutcome::Continued));

    g.authority().push_round_json(json!({
        "result": "The Goblin hits you for 3. You finish it off.",
        "playerHP": 27, "playerMana": 5,
        "enemyHP": 0, "combatOver": true
    }));
    assert_eq!(g.attack().await, Ok(RoundOutcome::CombatOver));
    assert_eq!(g.combat().status(), CombatStatus::Ended);

    let actions: Vec<_> = g
        .authority()
        .round_requests()
        .into_iter()
        .map(|r| (r.action, r.card_id))
        .collect();
    assert_eq!(
        actions,
        [
            (RoundAction::Start, None),
            (RoundAction::CastSpell, Some(CardId(1))),
            (RoundAction::Attack, None),
        ]
    );

    let seen = g.authority().seen();
    assert!(matches!(seen[0], Seen::Create(_)));
    assert_eq!(
        &seen[1..5],
        [
            Seen::Randomize,
            Seen::Boost(BoostRequest {
                card: 3,
                chosen_stat: StatName::Strength
            }),
            Seen::Randomize,
            Seen::Boost(BoostRequest {
                card: 1,
                chosen_stat: StatName::Luck
            }),
        ]
    );

    assert_eq!(
        g.presenter().log_lines(),
        [
            "You cast Fireball for 10 damage",
            "The Goblin hits you for 3. You finish it off.",
        ]
    );
    let ch = g.character().get().unwrap();
    assert_eq!((ch.health, ch.mana), (27, 5));
}

#[tokio::test]
async fn sheet_reflects_applied_boosts() {
    let mut g = created(1).await;
    g.authority().push_draw(Ok(3));
    g.choose_stat(StatName::Strength).unwrap();
    g.draw_and_apply().await.unwrap();
    g.authority().push_draw(Ok(1));
    g.choose_stat(StatName::Luck).unwrap();
    g.draw_and_apply().await.unwrap();

    let sheet = character_sheet(g.character().get().unwrap());
    insta::assert_snapshot!(sheet.trim_end(), @r"
    Aria
    Elf Mage  level 1  xp 0
    HP 30 / 30  MP 10 / 10  gold 100
    armor: Wooden Barrel Plate
    weapon: Training Wooden Sword
    strength     22
    dexterity    8
    intelligence 8
    endurance    17
    perception   8
    wisdom       10
    agility      6
    luck         13
    ");
}

#[tokio::test]
async fn seeded_draws_repeat() {
    let mut a = created(42).await;
    let mut b = created(42).await;
    for stat in [StatName::Agility, StatName::Wisdom] {
        a.choose_stat(stat).unwrap();
        b.choose_stat(stat).unwrap();
        a.draw_and_apply().await.unwrap();
        b.draw_and_apply().await.unwrap();
    }
    let drawn = |g: &TestGame| -> Vec<u32> {
        g.authority()
            .seen()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Boost(req) => Some(req.card),
                _ => None,
            })
            .collect()
    };
    assert_eq!(drawn(&a), drawn(&b));
    assert!(drawn(&a).iter().all(|c| (1..=4).contains(c)));
}

#[tokio::test]
async fn unknown_player_load_reports_the_server_error() {
    let mut g = game(0);
    let err = g.load_progress("Nobody").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Authority(AuthorityError::Status { status: 404, .. })
    ));
    assert!(!g.character().is_loaded());
    assert!(g
        .presenter()
        .events
        .iter()
        .any(|e| matches!(e, UiEvent::Error(msg) if msg.contains("404"))));
}

#[tokio::test]
async fn loaded_character_skips_boosts_and_can_save() {
    let mut g = created(3).await;
    let mut fresh = game(3);
    fresh.load_progress("  Brom ").await.unwrap();
    assert_eq!(
        fresh.character().get().map(|c| c.name.as_str()),
        Some("Brom")
    );
    assert_eq!(fresh.authority().seen(), [Seen::Load("Brom".into())]);
    assert_eq!(
        fresh.choose_stat(StatName::Luck),
        Err(SessionError::BoostLocked)
    );
    assert!(fresh
        .presenter()
        .events
        .contains(&UiEvent::Notice("Progress loaded successfully!".into())));

    g.save_progress().await.unwrap();
    assert_eq!(g.authority().seen().last(), Some(&Seen::Save("Aria".into())));
    assert!(g
        .presenter()
        .events
        .contains(&UiEvent::Notice("Progress saved successfully".into())));
}

#[tokio::test]
async fn blank_load_name_sends_nothing() {
    let mut g = game(0);
    assert_eq!(
        g.load_progress("   ").await,
        Err(SessionError::MissingField("name"))
    );
    assert!(g.authority().seen().is_empty());
}

#[tokio::test]
async fn fight_needs_a_character() {
    let mut g = game(0);
    assert_eq!(g.start_combat().await, Err(SessionError::NoCharacter));
    assert!(g.authority().round_requests().is_empty());
}

#[tokio::test]
async fn lost_start_can_be_retried() {
    let mut g = created(5).await;
    let err = g.start_combat().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Authority(AuthorityError::Transport(_))
    ));
    assert_eq!(g.combat().status(), CombatStatus::Idle);
    assert!(!g.combat().is_round_pending());

    g.authority().push_round(Ok(fight_started()));
    assert_eq!(g.start_combat().await, Ok(RoundOutcome::FightStarted));
    assert_eq!(g.authority().round_requests().len(), 2);
}

#[tokio::test]
async fn toggling_announces_membership() {
    let mut g = game(0);
    g.toggle_card(CardId(2)).unwrap();
    g.toggle_card(CardId(2)).unwrap();
    let notices: Vec<_> = g
        .presenter()
        .events
        .iter()
        .filter_map(|e| match e {
            UiEvent::Notice(n) => Some(n.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        notices,
        ["Ice Shard added to deck", "Ice Shard removed from deck"]
    );
    assert_eq!(
        g.toggle_card(CardId(9)),
        Err(SessionError::UnknownCard(CardId(9)))
    );
    assert!(g.deck().is_empty());
}

#[tokio::test]
async fn removing_a_card_mid_fight_takes_it_out_of_the_hand() {
    let mut g = created(11).await;
    g.toggle_card(CardId(1)).unwrap();
    g.toggle_card(CardId(4)).unwrap();
    g.authority().push_round(Ok(fight_started()));
    g.start_combat().await.unwrap();
    g.show_hand().unwrap();
    g.select_card(CardId(1)).unwrap();

    g.toggle_card(CardId(1)).unwrap();

    assert!(!g.deck().contains(CardId(1)));
    let hand: Vec<CardId> = g.combat().hand().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(hand, [CardId(4)]);
    assert_eq!(g.combat().selected_card_id(), None);
    assert_eq!(
        g.select_card(CardId(1)),
        Err(SessionError::CardNotInHand(CardId(1)))
    );
    assert_eq!(g.cast_spell().await, Err(SessionError::NoCardSelected));
    assert_eq!(
        g.authority()
            .round_requests()
            .into_iter()
            .map(|r| r.action)
            .collect::<Vec<_>>(),
        [RoundAction::Start]
    );

    g.toggle_card(CardId(2)).unwrap();
    let hand: Vec<CardId> = g.combat().hand().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(hand, [CardId(2), CardId(4)]);
}

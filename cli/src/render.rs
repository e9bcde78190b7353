use cardbound_engine::presentation::card_line;
use cardbound_engine::{Affordances, BoostPrompt, Meter, Presenter, UiEvent, BOOST_ROUNDS};

const BAR_WIDTH: i64 = 20;

/// Prints engine events to stdout as plain text.
#[derive(Debug, Default)]
pub struct Terminal;

impl Presenter for Terminal {
    fn present(&mut self, event: UiEvent) {
        if let Some(text) = describe(&event) {
            println!("{}", text);
        }
    }
}

fn meter_label(meter: Meter) -> &'static str {
    match meter {
        Meter::PlayerHealth => "Your HP",
        Meter::PlayerMana => "Your MP",
        Meter::EnemyHealth => "Enemy HP",
    }
}

fn bar(value: i32, max: i32) -> String {
    let filled = if max > 0 {
        (i64::from(value.clamp(0, max)) * BAR_WIDTH / i64::from(max)) as usize
    } else {
        0
    };
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH as usize - filled)
    )
}

fn actions(a: &Affordances) -> Option<String> {
    let mut names = Vec::new();
    if a.start {
        names.push("fight");
    }
    if a.attack {
        names.push("attack");
    }
    if a.select_card {
        names.push("hand, select");
    }
    if a.cast_spell {
        names.push("cast");
    }
    if names.is_empty() {
        None
    } else {
        Some(format!("available: {}", names.join(", ")))
    }
}

/// Text for one event, or `None` when the event has no terminal rendering.
pub fn describe(event: &UiEvent) -> Option<String> {
    match event {
        UiEvent::LogAppended(line) => Some(line.clone()),
        UiEvent::Bar { meter, value, max } => Some(format!(
            "{:<9}{} {}/{}",
            meter_label(*meter),
            bar(*value, *max),
            value,
            max
        )),
        UiEvent::Delta(d) => Some(format!("  {} {} ({})", meter_label(d.meter), d.text(), d.color())),
        UiEvent::Affordances(a) => actions(a),
        UiEvent::FightStarted { enemy } => Some(format!("A {} blocks your way!", enemy)),
        UiEvent::FightConcluded => Some("The fight is over.".to_string()),
        UiEvent::HandShown(cards) if cards.is_empty() => {
            Some("Your hand is empty. Add cards with `toggle <id>`.".to_string())
        }
        UiEvent::HandShown(cards) => Some(
            cards
                .iter()
                .map(card_line)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        UiEvent::CardSelected(id) => Some(format!("Card {} selected", id)),
        UiEvent::Boost(BoostPrompt::ChooseStat { round }) => Some(format!(
            "Stat boost {}/{}: pick a stat with `choose <stat>`",
            round, BOOST_ROUNDS
        )),
        UiEvent::Boost(BoostPrompt::Draw { round, stat }) => Some(format!(
            "Stat boost {}/{}: `draw` a card for {}",
            round, BOOST_ROUNDS, stat
        )),
        UiEvent::Boost(BoostPrompt::Locked) => Some("All stat boosts are used.".to_string()),
        UiEvent::Notice(text) => Some(text.clone()),
        UiEvent::Error(text) => Some(format!("error: {}", text)),
        UiEvent::Boost(BoostPrompt::Waiting)
        | UiEvent::CharacterChanged(_)
        | UiEvent::HandHidden
        | UiEvent::DeckToggled { .. } => None,
    }
}

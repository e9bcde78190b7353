use anyhow::{anyhow, bail, Context, Result};
use cardbound_engine::presentation::{card_line, character_sheet};
use cardbound_engine::{
    CardId, CharacterForm, Class, CombatAuthority, Game, Race, SessionError, StatName,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::Terminal;

pub const HELP: &str = "\
commands:
  create <name> <race> <class>   races: human elf dwarf orc gnome; classes: warrior mage rogue
  load <name>                    load saved progress
  save                           save progress
  sheet                          show the character
  cards                          list the catalog and deck membership
  toggle <id>                    add or remove a card from the deck
  choose <stat>                  pick the stat for the next boost
  draw                           draw a boost card and apply it
  fight                          start a fight
  hand                           show the hand built from the deck
  select <id>                    select a hand card
  attack                         basic attack
  cast                           cast the selected card
  help                           this text
  quit                           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        name: String,
        race: Option<Race>,
        class: Option<Class>,
    },
    Load(String),
    Save,
    Sheet,
    Cards,
    Toggle(CardId),
    Choose(StatName),
    Draw,
    Fight,
    Hand,
    Select(CardId),
    Attack,
    Cast,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "create" => {
                // Missing parts are left to form validation.
                let name = rest.first().copied().unwrap_or_default().to_string();
                let race = rest.get(1).map(|s| s.parse()).transpose()?;
                let class = rest.get(2).map(|s| s.parse()).transpose()?;
                Command::Create { name, race, class }
            }
            "load" => Command::Load(rest.join(" ")),
            "save" => Command::Save,
            "sheet" => Command::Sheet,
            "cards" => Command::Cards,
            "toggle" => Command::Toggle(card_arg(&rest)?),
            "choose" => {
                let stat = rest.first().ok_or_else(|| anyhow!("usage: choose <stat>"))?;
                Command::Choose(stat.parse()?)
            }
            "draw" => Command::Draw,
            "fight" | "start" => Command::Fight,
            "hand" => Command::Hand,
            "select" => Command::Select(card_arg(&rest)?),
            "attack" => Command::Attack,
            "cast" => Command::Cast,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command '{}' (try `help`)", other),
        };
        Ok(Some(cmd))
    }
}

fn card_arg(rest: &[&str]) -> Result<CardId> {
    let raw = rest.first().ok_or_else(|| anyhow!("expected a card id"))?;
    let id = raw
        .parse::<u32>()
        .with_context(|| format!("'{}' is not a card id", raw))?;
    Ok(CardId(id))
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run<A: CombatAuthority>(game: &mut Game<A, Terminal>) -> Result<()> {
    println!("Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {:#}", e);
                continue;
            }
        };
        if cmd == Command::Quit {
            break;
        }
        if let Err(e) = dispatch(game, cmd).await {
            // Remote failures were already shown through the presenter.
            if !matches!(e, SessionError::Authority(_)) {
                println!("error: {}", e);
            }
        }
    }
    Ok(())
}

async fn dispatch<A: CombatAuthority>(
    game: &mut Game<A, Terminal>,
    cmd: Command,
) -> Result<(), SessionError> {
    match cmd {
        Command::Create { name, race, class } => {
            game.create_character(&CharacterForm { name, race, class })
                .await
        }
        Command::Load(name) => game.load_progress(&name).await,
        Command::Save => game.save_progress().await,
        Command::Sheet => {
            let c = game.character().get().ok_or(SessionError::NoCharacter)?;
            print!("{}", character_sheet(c));
            Ok(())
        }
        Command::Cards => {
            for card in game.catalog().iter() {
                println!(
                    "{}  <{}>",
                    card_line(card),
                    game.deck().button_label(card.id)
                );
            }
            Ok(())
        }
        Command::Toggle(id) => game.toggle_card(id).map(|_| ()),
        Command::Choose(stat) => game.choose_stat(stat),
        Command::Draw => game.draw_and_apply().await.map(|_| ()),
        Command::Fight => game.start_combat().await.map(|_| ()),
        Command::Hand => game.show_hand(),
        Command::Select(id) => game.select_card(id),
        Command::Attack => game.attack().await.map(|_| ()),
        Command::Cast => game.cast_spell().await.map(|_| ()),
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

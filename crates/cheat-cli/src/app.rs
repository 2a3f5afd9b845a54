//! Assembles a table from the command line and narrates the game.

use anyhow::{anyhow, bail};
use cheat_core::AppInfo;
use cheat_core::game::{DEFAULT_PLAYERS, GameState, MAX_PLAYERS, MIN_PLAYERS, TurnOutcome};
use cheat_core::strategy::{Console, HumanStrategy, Strategy, StrategyKind, ai_strategy};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::console::{StdioConsole, prompt_int_in};

/// Everything the flags decided; the gaps fall back to interactive prompts.
#[derive(Debug, Clone)]
pub struct GameOptions {
    pub players: Option<usize>,
    pub strategies: Vec<String>,
    pub seed: Option<u64>,
    pub auto: bool,
    pub max_turns: u32,
}

pub fn run(options: &GameOptions) -> anyhow::Result<()> {
    let mut console = StdioConsole::new();
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut roster_rng = StdRng::seed_from_u64(seed);

    console.line(&format!(
        "{} v{}, a game of lying about cards.",
        AppInfo::name(),
        AppInfo::version()
    ));
    console.line(&format!("Seed: {seed}"));

    let kinds = resolve_roster(&mut console, options, &mut roster_rng)?;
    tracing::info!(seed, players = kinds.len(), "table assembled");

    let strategies = build_strategies(&kinds)?;
    let mut game = GameState::with_seed(strategies, seed)?;
    console.line(&format!(
        "Dealt the whole deck around a table of {}, up to {} cards each.",
        game.player_count(),
        game.players()
            .iter()
            .map(|player| player.cards_left())
            .max()
            .unwrap_or(0)
    ));

    loop {
        if !options.auto {
            let entry = console.prompt_line("<Enter for the next turn, q to quit>");
            if console.eof() || entry.eq_ignore_ascii_case("q") || entry.eq_ignore_ascii_case("quit")
            {
                console.line("Game abandoned.");
                return Ok(());
            }
        }
        console.line(&format!(
            "Turn {} goes to player {}.",
            game.turn_number() + 1,
            game.current_player() + 1
        ));
        let outcome = game.play_turn();
        narrate(&mut console, &game, outcome);

        if let Some(winner) = game.winner() {
            let stats = game.challenges();
            console.line(&format!(
                "Player {} wins after {} turns ({} of {} cheat calls were right).",
                winner + 1,
                game.turn_number(),
                stats.correct,
                stats.total
            ));
            return Ok(());
        }
        if game.turn_number() >= options.max_turns {
            console.line(&format!(
                "Turn limit of {} reached with no winner.",
                options.max_turns
            ));
            return Ok(());
        }
    }
}

/// Decides how many seats there are and which strategy fills each one.
fn resolve_roster(
    console: &mut StdioConsole,
    options: &GameOptions,
    rng: &mut StdRng,
) -> anyhow::Result<Vec<StrategyKind>> {
    let count = if let Some(count) = options.players {
        count
    } else if !options.strategies.is_empty() {
        options.strategies.len()
    } else if options.auto {
        DEFAULT_PLAYERS
    } else {
        let picked = prompt_int_in(
            console,
            &format!(
                "How many players are sitting down ({MIN_PLAYERS}-{MAX_PLAYERS}, \
                 {DEFAULT_PLAYERS} recommended)?"
            ),
            MIN_PLAYERS as i64,
            MAX_PLAYERS as i64,
        )
        .ok_or_else(|| anyhow!("input ended before a player count was given"))?;
        picked as usize
    };
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        bail!("a table seats {MIN_PLAYERS} to {MAX_PLAYERS} players, got {count}");
    }

    let mut kinds = Vec::with_capacity(count);
    if !options.strategies.is_empty() {
        if options.strategies.len() != count {
            bail!(
                "{} strategies given for {count} players",
                options.strategies.len()
            );
        }
        for token in &options.strategies {
            let kind = StrategyKind::from_token(token)
                .ok_or_else(|| anyhow!("unknown strategy '{token}'"))?
                .resolve(rng);
            kinds.push(kind);
        }
        console.line(&format!(
            "Seats: {}.",
            kinds
                .iter()
                .map(|kind| kind.label())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    } else if options.auto {
        for seat in 0..count {
            let kind = StrategyKind::Random.resolve(rng);
            console.line(&format!("Player {} sits down as {kind}.", seat + 1));
            kinds.push(kind);
        }
    } else {
        console.line("Strategies: basic, thinker, master, human, random.");
        for seat in 0..count {
            loop {
                let token = console.prompt_line(&format!(
                    "What strategy does player {} of {count} use?",
                    seat + 1
                ));
                if console.eof() {
                    bail!("input ended before the table was filled");
                }
                match StrategyKind::from_token(&token) {
                    Some(kind) => {
                        let kind = kind.resolve(rng);
                        console.line(&format!("Player {} sits down as {kind}.", seat + 1));
                        kinds.push(kind);
                        break;
                    }
                    None => console.line(&format!("Strategy '{token}' not found.")),
                }
            }
        }
    }

    if options.auto && kinds.iter().any(|kind| kind.is_interactive()) {
        bail!("a human seat cannot join an --auto game");
    }
    Ok(kinds)
}

fn build_strategies(kinds: &[StrategyKind]) -> anyhow::Result<Vec<Box<dyn Strategy>>> {
    kinds
        .iter()
        .map(|&kind| {
            if kind.is_interactive() {
                Ok(Box::new(HumanStrategy::new(Box::new(StdioConsole::new())))
                    as Box<dyn Strategy>)
            } else {
                ai_strategy(kind).ok_or_else(|| anyhow!("strategy '{kind}' was never resolved"))
            }
        })
        .collect()
}

fn narrate(console: &mut StdioConsole, game: &GameState, outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::Passed { bidder, .. } => {
            console.line(&format!(
                "Player {} claims {}. Nobody calls cheat.",
                bidder + 1,
                game.current_bid()
            ));
        }
        TurnOutcome::Challenged {
            bidder,
            challenger,
            caught,
            pile_size,
        } => {
            console.line(&format!(
                "Player {} calls cheat on player {}.",
                challenger + 1,
                bidder + 1
            ));
            if caught {
                console.line(&format!(
                    "Caught. Player {} picks the {pile_size}-card pile back up.",
                    bidder + 1
                ));
            } else {
                console.line(&format!(
                    "An honest bid. Player {} takes the {pile_size}-card pile instead.",
                    challenger + 1
                ));
            }
        }
    }
    for player in game.players() {
        let left = player.cards_left();
        if left > 0 && left < 3 {
            console.line(&format!(
                "Player {} is down to {left} card(s).",
                player.index() + 1
            ));
        }
    }
}

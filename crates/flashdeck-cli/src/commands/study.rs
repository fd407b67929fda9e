use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use flashdeck_core::study::{RandomShuffler, SeededShuffler, Shuffler};
use flashdeck_core::{Actions, Event, StudyKey, StudySession, StudyState};

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum StudyAction {
    /// Start studying a deck (replaces any session in progress)
    Start {
        /// Deck ID
        deck_id: i64,
        /// Shuffle the cards first
        #[arg(long)]
        shuffle: bool,
        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the current card and progress
    Status,
    /// Show or hide the answer
    Flip,
    /// Go to the next card (finishes the session on the last card)
    Next,
    /// Go back one card
    Prev,
    /// Record an answer and move on
    Grade {
        #[arg(value_enum)]
        result: Grade,
    },
    /// Send a key press: space, arrowleft, arrowright, 1 or 2
    Key { key: String },
    /// Shuffle all cards and start over
    Shuffle {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Start over in the current order
    Restart,
    /// Print the result of the session
    Summary,
    /// Discard the session
    Exit,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Grade {
    Correct,
    Incorrect,
}

#[derive(Serialize)]
struct Summary {
    state: StudyState,
    correct: u32,
    incorrect: u32,
    total: u32,
    accuracy_pct: f64,
}

fn load_session(actions: &Actions<'_>) -> Result<StudySession, Box<dyn std::error::Error>> {
    let session = actions
        .load_study_session()?
        .ok_or("no study session in progress; run `flashdeck study start <deck-id>`")?;
    Ok(session)
}

fn shuffler(seed: Option<u64>) -> Box<dyn Shuffler> {
    match seed {
        Some(seed) => Box::new(SeededShuffler::new(seed)),
        None => Box::new(RandomShuffler),
    }
}

/// Apply one command to the saved session and print what happened: the
/// event if the command did something, else the current state.
fn step(
    actions: &Actions<'_>,
    command: impl FnOnce(&mut StudySession) -> Option<Event>,
) -> CmdResult {
    let mut session = load_session(actions)?;
    let event = command(&mut session);
    actions.save_study_session(&session)?;
    match event {
        Some(event) => print_json(&event)?,
        None => print_json(&session.snapshot())?,
    }
    Ok(())
}

pub fn run(action: StudyAction) -> CmdResult {
    let ctx = Context::load()?;
    let actions = ctx.actions();

    match action {
        StudyAction::Start {
            deck_id,
            shuffle,
            seed,
        } => {
            let shuffle = shuffle || seed.is_some() || ctx.config.study.shuffle_on_start;
            let mut shuffler = shuffler(seed);
            let shuffler: Option<&mut dyn Shuffler> = if shuffle {
                Some(shuffler.as_mut())
            } else {
                None
            };
            let session = actions.start_study(deck_id, shuffler)?;
            actions.save_study_session(&session)?;
            print_json(&session.snapshot())?;
        }
        StudyAction::Status => print_json(&load_session(&actions)?.snapshot())?,
        StudyAction::Flip => step(&actions, StudySession::flip)?,
        StudyAction::Next => step(&actions, StudySession::advance)?,
        StudyAction::Prev => step(&actions, StudySession::retreat)?,
        StudyAction::Grade { result } => {
            step(&actions, |s| s.grade(matches!(result, Grade::Correct)))?;
        }
        StudyAction::Key { key } => {
            let key: StudyKey = key.parse()?;
            step(&actions, |s| s.handle_key(key))?;
        }
        StudyAction::Shuffle { seed } => {
            step(&actions, |s| s.shuffle(shuffler(seed).as_mut()))?;
        }
        StudyAction::Restart => step(&actions, StudySession::restart)?,
        StudyAction::Summary => {
            let session = load_session(&actions)?;
            let tally = session.tally();
            print_json(&Summary {
                state: session.state(),
                correct: tally.correct,
                incorrect: tally.incorrect,
                total: tally.total(),
                accuracy_pct: tally.accuracy_pct(),
            })?;
        }
        StudyAction::Exit => {
            actions.clear_study_session()?;
            print_json(&serde_json::json!({ "type": "session_exited" }))?;
        }
    }
    Ok(())
}

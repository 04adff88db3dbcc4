//! Moving games between databases with per-conflict decisions.
//!
//! A conflict is a game whose name already exists in the destination. The
//! caller supplies a [`MoveDecider`] that is asked once per conflict; a
//! "to all" answer is remembered by the resolver for the rest of the batch,
//! so deciders carry no state of their own.

use std::collections::HashSet;

use msx_launcher_data::types::Game;
use rusqlite::{params, Connection};

use crate::action::{resolve_database_id, with_transaction};
use crate::error::{storage_failure, PersistenceError};
use crate::games::game_names;
use crate::store::CatalogStore;

/// Answer to a single move conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDecision {
    /// Move this game, replacing the destination's copy.
    Yes,
    /// Like `Yes`, for this and every later conflict.
    YesToAll,
    /// Leave this game where it is.
    No,
    /// Like `No`, for this and every later conflict.
    NoToAll,
    /// Stop evaluating; games already decided are still moved.
    Cancel,
}

/// Decides what to do when a moved game's name exists in the destination.
pub trait MoveDecider {
    fn decide(&mut self, game_name: &str) -> MoveDecision;
}

impl<F> MoveDecider for F
where
    F: FnMut(&str) -> MoveDecision,
{
    fn decide(&mut self, game_name: &str) -> MoveDecision {
        self(game_name)
    }
}

/// Games selected to move, and the destination names they replace.
#[derive(Debug, Default)]
pub(crate) struct MovePlan<'a> {
    pub to_move: Vec<&'a Game>,
    pub overridden: HashSet<&'a str>,
}

/// Walk `games` in order and decide which of them move.
///
/// A name listed more than once is planned, and asked about, only once.
pub(crate) fn plan_moves<'a>(
    games: &'a [Game],
    destination: &HashSet<String>,
    decider: &mut dyn MoveDecider,
) -> MovePlan<'a> {
    let mut plan = MovePlan::default();
    let mut seen: HashSet<&str> = HashSet::new();
    // Some(true) after yes-to-all, Some(false) after no-to-all.
    let mut blanket: Option<bool> = None;

    for game in games {
        if !seen.insert(&game.name) {
            continue;
        }
        if !destination.contains(&game.name) {
            plan.to_move.push(game);
            continue;
        }

        let decision = match blanket {
            Some(true) => MoveDecision::Yes,
            Some(false) => MoveDecision::No,
            None => decider.decide(&game.name),
        };

        match decision {
            MoveDecision::Yes | MoveDecision::YesToAll => {
                if decision == MoveDecision::YesToAll {
                    blanket = Some(true);
                }
                plan.to_move.push(game);
                plan.overridden.insert(&game.name);
            }
            MoveDecision::No => {}
            MoveDecision::NoToAll => blanket = Some(false),
            MoveDecision::Cancel => {
                log::debug!("Move cancelled at '{}'", game.name);
                break;
            }
        }
    }

    plan
}

/// Move `games` from `old_database` to `new_database`.
///
/// Returns the games that actually changed database. Moving a database onto
/// itself does nothing.
pub fn move_games(
    store: &CatalogStore,
    games: &[Game],
    old_database: &str,
    new_database: &str,
    decider: &mut dyn MoveDecider,
) -> Result<Vec<Game>, PersistenceError> {
    if old_database == new_database {
        return Ok(Vec::new());
    }

    with_transaction(store, |conn| {
        let old_id = resolve_database_id(conn, old_database);
        let new_id = resolve_database_id(conn, new_database);

        let destination = game_names(conn, new_id).map_err(storage_failure)?;
        let plan = plan_moves(games, &destination, decider);

        let moved = apply_plan(conn, &plan, old_id, new_id).map_err(storage_failure)?;
        log::info!(
            "Moved {} game(s) from '{old_database}' to '{new_database}'",
            moved.len()
        );
        Ok(moved)
    })
}

fn apply_plan(
    conn: &Connection,
    plan: &MovePlan<'_>,
    old_id: i64,
    new_id: i64,
) -> rusqlite::Result<Vec<Game>> {
    // Only replace a destination game when its source counterpart exists.
    let mut delete = conn.prepare_cached(
        "DELETE FROM game WHERE name = ?1 AND database_id = ?2
           AND EXISTS (SELECT 1 FROM game WHERE name = ?1 AND database_id = ?3)",
    )?;
    for name in &plan.overridden {
        delete.execute(params![name, new_id, old_id])?;
    }

    let mut update =
        conn.prepare_cached("UPDATE game SET database_id = ?1 WHERE name = ?2 AND database_id = ?3")?;
    let mut moved = Vec::with_capacity(plan.to_move.len());
    for game in &plan.to_move {
        if update.execute(params![new_id, game.name, old_id])? > 0 {
            moved.push((*game).clone());
        }
    }
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games(names: &[&str]) -> Vec<Game> {
        names.iter().map(|n| Game::new(*n, "msx2")).collect()
    }

    fn names(set: &[&str]) -> HashSet<String> {
        set.iter().map(|s| s.to_string()).collect()
    }

    fn moved_names(plan: &MovePlan<'_>) -> Vec<String> {
        plan.to_move.iter().map(|g| g.name.clone()).collect()
    }

    #[test]
    fn test_no_conflicts_never_asks() {
        let batch = games(&["A", "B"]);
        let mut asked = 0;
        let mut decider = |_: &str| {
            asked += 1;
            MoveDecision::No
        };
        let plan = plan_moves(&batch, &names(&["C"]), &mut decider);
        assert_eq!(moved_names(&plan), vec!["A", "B"]);
        assert!(plan.overridden.is_empty());
        assert_eq!(asked, 0);
    }

    #[test]
    fn test_yes_to_all_asks_once() {
        let batch = games(&["A", "B", "C"]);
        let mut asked = Vec::new();
        let mut decider = |name: &str| {
            asked.push(name.to_string());
            MoveDecision::YesToAll
        };
        let plan = plan_moves(&batch, &names(&["A", "B"]), &mut decider);
        assert_eq!(asked, vec!["A"]);
        assert_eq!(moved_names(&plan), vec!["A", "B", "C"]);
        assert_eq!(plan.overridden, HashSet::from(["A", "B"]));
    }

    #[test]
    fn test_no_to_all_skips_remaining_conflicts() {
        let batch = games(&["A", "B", "C"]);
        let mut asked = 0;
        let mut decider = |_: &str| {
            asked += 1;
            MoveDecision::NoToAll
        };
        let plan = plan_moves(&batch, &names(&["A", "B"]), &mut decider);
        assert_eq!(asked, 1);
        assert_eq!(moved_names(&plan), vec!["C"]);
        assert!(plan.overridden.is_empty());
    }

    #[test]
    fn test_yes_and_no_ask_every_conflict() {
        let batch = games(&["A", "B", "C"]);
        let mut answers = vec![MoveDecision::No, MoveDecision::Yes].into_iter();
        let mut decider = |_: &str| answers.next().unwrap_or(MoveDecision::Cancel);
        let plan = plan_moves(&batch, &names(&["A", "B"]), &mut decider);
        assert_eq!(moved_names(&plan), vec!["B", "C"]);
        assert_eq!(plan.overridden, HashSet::from(["B"]));
    }

    #[test]
    fn test_cancel_keeps_earlier_decisions() {
        let batch = games(&["X", "A", "B"]);
        let mut decider = |_: &str| MoveDecision::Cancel;
        let plan = plan_moves(&batch, &names(&["A"]), &mut decider);
        assert_eq!(moved_names(&plan), vec!["X"]);
    }

    #[test]
    fn test_duplicate_names_are_decided_once() {
        let batch = games(&["A", "A", "B", "B"]);
        let mut asked = 0;
        let mut decider = |_: &str| {
            asked += 1;
            MoveDecision::Yes
        };
        let plan = plan_moves(&batch, &names(&["A"]), &mut decider);
        assert_eq!(asked, 1);
        assert_eq!(moved_names(&plan), vec!["A", "B"]);
        assert_eq!(plan.overridden, HashSet::from(["A"]));
    }

    #[test]
    fn test_cancel_on_first_conflict_moves_nothing() {
        let batch = games(&["A", "B", "C"]);
        let mut decider = |_: &str| MoveDecision::Cancel;
        let plan = plan_moves(&batch, &names(&["A"]), &mut decider);
        assert!(plan.to_move.is_empty());
    }
}

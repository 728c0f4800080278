//! Move generator: turns a piece's normalized rules into the set of
//! legal destination squares on the current board.
//!
//! Pure: reads the board, never mutates it. Candidate squares are
//! produced per rule in ray order from nearest to farthest, then
//! filtered by grid bounds and blocking/jump semantics.

use crate::domain::rules::NormalizedRule;
use crate::domain::script::{GridSize, Position, StepSpec};
use crate::domain::state::GameObject;

/// What the ray walker found on a candidate square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Square {
    Empty,
    Own,
    Enemy { capturable: bool },
}

/// Ownership test between the mover and an occupant. User-id binding
/// happens at game start; before that seats stand in, so move
/// computation stays well-defined on unstarted boards too.
fn same_owner(mover: &GameObject, other: &GameObject) -> bool {
    match (&mover.player_user_id, &other.player_user_id) {
        (Some(a), Some(b)) => a == b,
        _ => mover.player == other.player,
    }
}

fn classify(board: &[GameObject], mover: &GameObject, pos: &Position) -> Square {
    let occupant = board
        .iter()
        .find(|o| o.object_id != mover.object_id && o.current_position == *pos);
    match occupant {
        None => Square::Empty,
        Some(other) if same_owner(mover, other) => Square::Own,
        Some(other) => Square::Enemy {
            capturable: other.is_capturable,
        },
    }
}

/// Resolve one rule into (row, column) offsets in ray order.
///
/// Single-axis rules are 1-D rays. Two-axis rules are diagonal rays:
/// equal-length finite lists pair index-wise, a finite list paired
/// with `Infinite` governs both axes (a diagonal advances equally on
/// both), and two `Infinite` specs walk outward one square at a time.
/// This replaces the zip-and-truncate of offset arrays; see DESIGN.md.
fn ray_offsets(rule: &NormalizedRule, grid: &GridSize) -> Vec<(i64, i64)> {
    // Longest possible walk for an unbounded ray.
    let max_walk = grid.rows.max(grid.columns);

    match (&rule.vertical, &rule.horizontal) {
        (Some((v, spec)), None) => distances(spec, max_walk)
            .into_iter()
            .map(|d| (d * v.sign(), 0))
            .collect(),
        (None, Some((h, spec))) => distances(spec, max_walk)
            .into_iter()
            .map(|d| (0, d * h.sign()))
            .collect(),
        (Some((v, vspec)), Some((h, hspec))) => {
            let pairs: Vec<(i64, i64)> = match (vspec, hspec) {
                (StepSpec::Steps(rows), StepSpec::Steps(cols)) => rows
                    .iter()
                    .zip(cols.iter())
                    .filter(|(r, c)| **r >= 1 && **c >= 1)
                    .map(|(r, c)| (*r, *c))
                    .collect(),
                (StepSpec::Steps(steps), StepSpec::Infinite)
                | (StepSpec::Infinite, StepSpec::Steps(steps)) => steps
                    .iter()
                    .filter(|s| **s >= 1)
                    .map(|s| (*s, *s))
                    .collect(),
                (StepSpec::Infinite, StepSpec::Infinite) => {
                    (1..=max_walk).map(|d| (d, d)).collect()
                }
            };
            pairs
                .into_iter()
                .map(|(r, c)| (r * v.sign(), c * h.sign()))
                .collect()
        }
        (None, None) => Vec::new(),
    }
}

fn distances(spec: &StepSpec, max_walk: i64) -> Vec<i64> {
    match spec {
        StepSpec::Steps(steps) => steps.iter().copied().filter(|s| *s >= 1).collect(),
        StepSpec::Infinite => (1..=max_walk).collect(),
    }
}

/// Compute the legal destination squares for `object` under its
/// normalized rules.
///
/// Per ray, nearest to farthest: out of bounds stops the ray; the
/// mover's own piece or a non-capturable enemy stops the ray without
/// yielding that square; a capturable enemy yields the square and
/// stops the ray; an empty square yields and continues. Jump-capable
/// pieces never stop for occupancy: the full sequence is generated
/// with own-piece and non-capturable-enemy squares individually
/// excluded.
pub fn legal_moves(
    object: &GameObject,
    rules: &[NormalizedRule],
    board: &[GameObject],
    grid: &GridSize,
) -> Vec<Position> {
    let from = object.current_position;
    let mut out: Vec<Position> = Vec::new();

    for rule in rules {
        for (dr, dc) in ray_offsets(rule, grid) {
            if dr == 0 && dc == 0 {
                continue;
            }
            let pos = Position::new(from.row + dr, from.column + dc);
            if !grid.contains(&pos) {
                break;
            }
            match classify(board, object, &pos) {
                Square::Empty => {
                    if !out.contains(&pos) {
                        out.push(pos);
                    }
                }
                Square::Own | Square::Enemy { capturable: false } => {
                    if object.can_jump {
                        continue;
                    }
                    break;
                }
                Square::Enemy { capturable: true } => {
                    if !out.contains(&pos) {
                        out.push(pos);
                    }
                    if object.can_jump {
                        continue;
                    }
                    break;
                }
            }
        }
    }

    out
}

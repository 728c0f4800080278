//! Turn sequencer: a cyclic state machine over the ordered player
//! sequence fixed at game start.

use crate::domain::state::PlayerTurn;

/// The player who acts after `current`. Wraps around the sequence; if
/// `current` is somehow missing from it (should not occur post-start),
/// the sequence restarts from its first entry.
pub fn next_turn(sequence: &[PlayerTurn], current: &PlayerTurn) -> Option<PlayerTurn> {
    if sequence.is_empty() {
        return None;
    }
    let next = match sequence
        .iter()
        .position(|p| p.player_num == current.player_num)
    {
        Some(index) => &sequence[(index + 1) % sequence.len()],
        None => &sequence[0],
    };
    Some(next.clone())
}

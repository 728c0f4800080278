//! Capture detection: does the destination square hold a capturable
//! enemy object?

use crate::domain::script::Position;
use crate::domain::state::GameObject;

/// Find the capturable enemy at `destination`, if any: a different
/// object, bound to a different user, with `is_capturable` set. At
/// most one such object exists per square (opposing capturable pieces
/// never coincide; move validation enforces it).
pub fn find_captured<'a>(
    board: &'a [GameObject],
    mover_object_id: &str,
    destination: &Position,
    mover_user_id: &str,
) -> Option<&'a GameObject> {
    board.iter().find(|o| {
        o.current_position == *destination
            && o.object_id != mover_object_id
            && o.player_user_id.as_deref() != Some(mover_user_id)
            && o.is_capturable
    })
}

/// Remove the captured object from the board and hand it back, so the
/// caller can append it to `captured_objects` within the same state
/// write.
pub fn take_captured(
    board: &mut Vec<GameObject>,
    mover_object_id: &str,
    destination: &Position,
    mover_user_id: &str,
) -> Option<GameObject> {
    let index = board.iter().position(|o| {
        o.current_position == *destination
            && o.object_id != mover_object_id
            && o.player_user_id.as_deref() != Some(mover_user_id)
            && o.is_capturable
    })?;
    Some(board.remove(index))
}

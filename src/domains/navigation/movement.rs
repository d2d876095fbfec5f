use super::ports::{ActuationAdapter, AgentBody};
use super::state::NavigationState;
use crate::common::Direction;

/// Cooperative wait for the action cooldown. Yields at most `max_waits` times and
/// reports whether the agent is ready to act.
pub fn wait_until_ready<B: ActuationAdapter + ?Sized>(body: &mut B, max_waits: u32) -> bool {
    let mut waits = 0;
    while !body.is_action_ready() {
        if waits >= max_waits {
            return false;
        }
        body.yield_turn();
        waits += 1;
    }
    true
}

/// Moves one cell if the target is free, not hazardous and the agent is ready.
/// Records the vacated cell on success.
pub(crate) fn try_step<B: AgentBody + ?Sized>(
    state: &mut NavigationState,
    body: &mut B,
    direction: Direction,
) -> bool {
    if direction == Direction::Center || !body.is_action_ready() {
        return false;
    }
    let here = body.position();
    let target = here.add(direction);
    if !body.can_occupy(target) || body.is_hazardous(target) {
        return false;
    }
    if body.attempt_move(direction) {
        state.set_previous_cell(here);
        true
    } else {
        false
    }
}

//! Bug navigation: greedy direct approach with a left-hand contour-following fallback.
//!
//! The approach keeps `best_distance_squared` monotonically non-increasing, so direct
//! moves alone can never oscillate. Contour following does not touch it; it only
//! carries the agent around the obstacle until a direct move improves on it again.
//!
//! How long to keep following a contour before switching to graph planning is up to
//! the caller (see [`Navigator`](super::Navigator)).

use super::movement::try_step;
use super::ports::AgentBody;
use super::state::NavigationState;
use crate::common::{Cell, Direction};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BugStep {
    /// Moved towards the destination and improved the best distance.
    Approached(Direction),
    /// Moved along the obstacle contour.
    Contoured(Direction),
    /// Standing on the destination.
    Arrived,
    /// The destination is adjacent but occupied; treated as arrival.
    ArrivedAdjacent,
    /// No direction admits a move this tick, or the agent is still on cooldown.
    Blocked,
}

/// Runs one bug-navigation step towards `destination`.
pub fn bug_step<B: AgentBody + ?Sized>(
    state: &mut NavigationState,
    body: &mut B,
    destination: Cell,
) -> BugStep {
    state.target(destination);
    let here = body.position();
    if here == destination {
        state.end_approach();
        return BugStep::Arrived;
    }

    if !body.is_action_ready() {
        trace!("on cooldown, nothing to do this tick");
        return BugStep::Blocked;
    }

    let best = state.init_best_distance(here.distance_squared_to(destination));
    let heading = here.direction_to(destination);
    let next = here.add(heading);

    if next.distance_squared_to(destination) < best {
        if try_step(state, body, heading) {
            let distance = body.position().distance_squared_to(destination);
            state.record_progress(distance);
            trace!(?heading, distance, "direct approach");
            return settle(state, body.position(), destination, BugStep::Approached(heading));
        }
        // Policy: an occupied destination next to us counts as reached. A free one
        // is not reached, and neither is a hazardous one.
        if next == destination && !body.can_occupy(destination) && !body.is_hazardous(destination) {
            debug!(%destination, "adjacent to occupied destination");
            state.end_approach();
            return BugStep::ArrivedAdjacent;
        }
    }

    state.enter_contour(heading);
    follow_contour(state, body, destination)
}

/// Scans clockwise from the search heading for the first legal move. After moving,
/// the heading is turned 90° to the left so the obstacle stays on the left-hand side.
fn follow_contour<B: AgentBody + ?Sized>(
    state: &mut NavigationState,
    body: &mut B,
    destination: Cell,
) -> BugStep {
    let mut direction = state.search_direction();
    for _ in 0..Direction::COMPASS.len() {
        if try_step(state, body, direction) {
            state.set_search_direction(direction.rotate_left().rotate_left());
            state.record_contour_step();
            trace!(?direction, steps = state.contour_steps(), "contour follow");
            return settle(state, body.position(), destination, BugStep::Contoured(direction));
        }
        direction = direction.rotate_right();
    }
    debug!(position = %body.position(), "boxed in, no legal move this tick");
    BugStep::Blocked
}

fn settle(state: &mut NavigationState, here: Cell, destination: Cell, step: BugStep) -> BugStep {
    if here == destination {
        state.end_approach();
        BugStep::Arrived
    } else {
        step
    }
}

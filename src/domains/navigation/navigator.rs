use super::bug::{bug_step, BugStep};
use super::graph::MapGraph;
use super::movement::{try_step, wait_until_ready};
use super::ports::AgentBody;
use super::state::NavigationState;
use crate::common::{Cell, Direction};
use crate::domains::hazard::HazardModel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteOutcome {
    Moved,
    Arrived,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSettings {
    /// Contour steps without direct progress before falling back to graph planning.
    /// `None` keeps following the contour indefinitely.
    pub contour_budget: Option<u32>,
    /// How many times to yield while waiting for the action cooldown.
    pub max_ready_waits: u32,
    /// Planned paths avoid cells that flood within this many ticks.
    pub hazard_lookahead: u32,
    pub initial_search_direction: Direction,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            contour_budget: Some(12),
            max_ready_waits: 1,
            hazard_lookahead: 10,
            initial_search_direction: Direction::North,
        }
    }
}

/// Per-agent navigation service: bug navigation by default, graph planning as the
/// fallback, path following once a plan exists.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: NavigationState,
    settings: NavigatorSettings,
    hazard: HazardModel,
}

impl Navigator {
    pub fn new(settings: NavigatorSettings, hazard: HazardModel) -> Self {
        Self {
            state: NavigationState::new(settings.initial_search_direction),
            settings,
            hazard,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    /// One tick of navigation towards `destination`.
    ///
    /// An active path is followed first; a failed step discards it. Otherwise the bug
    /// navigator moves, and a boxed-in agent or an exhausted contour budget triggers
    /// graph planning over the sensed neighbourhood. The best distance of the approach
    /// survives planning, and after an exhausted budget a route is only taken if it
    /// ends strictly closer than that.
    pub fn route_to<B: AgentBody + ?Sized>(&mut self, body: &mut B, destination: Cell) -> RouteOutcome {
        self.state.target(destination);
        if body.position() == destination {
            self.state.end_approach();
            self.state.clear_path();
            return RouteOutcome::Arrived;
        }
        if !wait_until_ready(body, self.settings.max_ready_waits) {
            return RouteOutcome::Blocked;
        }

        if self.state.has_path() {
            if self.proceed_along_path(body) {
                return self.moved(body, destination);
            }
            debug!(position = %body.position(), "path step failed, path discarded");
        }

        match bug_step(&mut self.state, body, destination) {
            BugStep::Arrived | BugStep::ArrivedAdjacent => RouteOutcome::Arrived,
            BugStep::Approached(_) => RouteOutcome::Moved,
            BugStep::Contoured(_) => {
                if self.contour_budget_exhausted() {
                    debug!(steps = self.state.contour_steps(), "contour budget exhausted, planning");
                    self.state.reset_contour_steps();
                    if !self.plan_improving_route(body, destination) {
                        debug!("no planned route beats the best distance, still following contour");
                    }
                }
                RouteOutcome::Moved
            }
            BugStep::Blocked => {
                if self.calculate_path_to(body, destination) && self.proceed_along_path(body) {
                    self.moved(body, destination)
                } else {
                    RouteOutcome::Blocked
                }
            }
        }
    }

    /// Continues the active path, or plans one if there is none. Planning consumes
    /// the call; the first step is taken on the next one.
    pub fn pathfind<B: AgentBody + ?Sized>(&mut self, body: &mut B, destination: Cell) -> bool {
        if !self.state.has_path() {
            return self.calculate_path_to(body, destination);
        }
        self.proceed_along_path(body)
    }

    /// Plans a route over the currently sensed cells. Cells that are occupied,
    /// hazardous, or will flood within the look-ahead window are left out.
    pub fn calculate_path_to<B: AgentBody + ?Sized>(&mut self, body: &B, destination: Cell) -> bool {
        let tick = body.current_tick();
        let origin = body.position();
        let hazard = self.hazard;
        let lookahead = self.settings.hazard_lookahead;

        let graph = MapGraph::build(origin, &body.sense_cells(), |sensed| {
            sensed.is_traversable() && !hazard.is_hazardous_within(tick, sensed.elevation, lookahead)
        });
        let path = graph.route(origin, destination).filter(|path| !path.is_empty());
        debug!(
            %origin,
            %destination,
            nodes = graph.node_count(),
            steps = path.as_ref().map(Vec::len),
            "planned over sensed graph"
        );
        self.state.set_path(path);
        self.state.has_path()
    }

    /// Takes the next step of the active path. Any failure invalidates the remainder.
    pub fn proceed_along_path<B: AgentBody + ?Sized>(&mut self, body: &mut B) -> bool {
        let Some(direction) = self.state.next_path_direction() else {
            self.state.clear_path();
            return false;
        };
        if try_step(&mut self.state, body, direction) {
            self.state.advance_path();
            if self.state.path_completed() {
                self.state.clear_path();
            }
            true
        } else {
            self.state.clear_path();
            false
        }
    }

    /// Moves in a random direction, rotating clockwise through all eight if needed.
    pub fn move_anywhere<B, R>(&mut self, body: &mut B, rng: &mut R) -> Option<Direction>
    where
        B: AgentBody + ?Sized,
        R: Rng + ?Sized,
    {
        self.state.clear_path();
        if !wait_until_ready(body, self.settings.max_ready_waits) {
            return None;
        }
        let mut direction = Direction::COMPASS[rng.gen_range(0..Direction::COMPASS.len())];
        for _ in 0..Direction::COMPASS.len() {
            if try_step(&mut self.state, body, direction) {
                return Some(direction);
            }
            direction = direction.rotate_right();
        }
        None
    }

    /// Keeps exploring along the search heading; picks a fresh random heading when
    /// the way is blocked.
    pub fn continue_search<B, R>(&mut self, body: &mut B, rng: &mut R) -> bool
    where
        B: AgentBody + ?Sized,
        R: Rng + ?Sized,
    {
        if self.continue_search_non_random(body) {
            return true;
        }
        let heading = Direction::COMPASS[rng.gen_range(0..Direction::COMPASS.len())];
        self.state.set_search_direction(heading);
        false
    }

    /// Moves along the search heading, reporting whether that was possible.
    pub fn continue_search_non_random<B: AgentBody + ?Sized>(&mut self, body: &mut B) -> bool {
        let heading = self.state.search_direction();
        wait_until_ready(body, self.settings.max_ready_waits) && try_step(&mut self.state, body, heading)
    }

    fn contour_budget_exhausted(&self) -> bool {
        self.settings
            .contour_budget
            .is_some_and(|budget| self.state.contour_steps() > budget)
    }

    /// Plans as [`calculate_path_to`](Self::calculate_path_to) does, but drops the route
    /// unless its end is strictly closer to `destination` than the best distance so far.
    fn plan_improving_route<B: AgentBody + ?Sized>(&mut self, body: &B, destination: Cell) -> bool {
        if !self.calculate_path_to(body, destination) {
            return false;
        }
        let end = self
            .state
            .active_path()
            .map(|path| path.iter().fold(body.position(), |cell, direction| cell.add(*direction)));
        let improves = match (end, self.state.best_distance_squared()) {
            (Some(end), Some(best)) => end.distance_squared_to(destination) < best,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !improves {
            self.state.clear_path();
        }
        improves
    }

    fn moved<B: AgentBody + ?Sized>(&mut self, body: &B, destination: Cell) -> RouteOutcome {
        let distance = body.position().distance_squared_to(destination);
        if self.state.best_distance_squared().is_some_and(|best| distance < best) {
            self.state.record_progress(distance);
        }
        if body.position() == destination {
            self.state.end_approach();
            RouteOutcome::Arrived
        } else {
            RouteOutcome::Moved
        }
    }
}

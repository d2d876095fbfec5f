use crate::common::{Cell, Direction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavMode {
    DirectApproach,
    ContourFollow,
}

/// Per-agent navigation record. Lives as long as the agent and is only mutated by
/// the navigator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationState {
    destination: Option<Cell>,
    best_distance_squared: Option<i64>,
    mode: NavMode,
    search_direction: Direction,
    /// Consecutive contour steps without direct progress.
    contour_steps: u32,
    previous_cell: Option<Cell>,
    active_path: Option<Vec<Direction>>,
    path_progress: usize,
}

impl NavigationState {
    pub fn new(search_direction: Direction) -> Self {
        let search_direction = match search_direction {
            Direction::Center => Direction::North,
            direction => direction,
        };
        Self {
            destination: None,
            best_distance_squared: None,
            mode: NavMode::DirectApproach,
            search_direction,
            contour_steps: 0,
            previous_cell: None,
            active_path: None,
            path_progress: 0,
        }
    }

    pub fn destination(&self) -> Option<Cell> {
        self.destination
    }

    pub fn best_distance_squared(&self) -> Option<i64> {
        self.best_distance_squared
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn search_direction(&self) -> Direction {
        self.search_direction
    }

    pub fn contour_steps(&self) -> u32 {
        self.contour_steps
    }

    pub fn previous_cell(&self) -> Option<Cell> {
        self.previous_cell
    }

    /// Starts a new session if `destination` differs from the current one. Switching
    /// destination cancels the approach and any active path.
    pub(crate) fn target(&mut self, destination: Cell) {
        if self.destination != Some(destination) {
            self.destination = Some(destination);
            self.end_approach();
            self.clear_path();
        }
    }

    pub(crate) fn init_best_distance(&mut self, distance: i64) -> i64 {
        *self.best_distance_squared.get_or_insert(distance)
    }

    pub(crate) fn record_progress(&mut self, distance: i64) {
        self.best_distance_squared = Some(distance);
        self.mode = NavMode::DirectApproach;
        self.contour_steps = 0;
    }

    /// Ends the current approach session; the next call re-initialises it.
    pub(crate) fn end_approach(&mut self) {
        self.best_distance_squared = None;
        self.mode = NavMode::DirectApproach;
        self.contour_steps = 0;
    }

    /// Switches to contour following. On the transition the search heading is seeded
    /// with the blocked direct heading so the obstacle ends up on the left.
    pub(crate) fn enter_contour(&mut self, blocked: Direction) {
        if self.mode == NavMode::DirectApproach {
            self.mode = NavMode::ContourFollow;
            if blocked != Direction::Center {
                self.search_direction = blocked;
            }
        }
    }

    /// Restarts the count towards the contour budget without leaving contour mode.
    pub(crate) fn reset_contour_steps(&mut self) {
        self.contour_steps = 0;
    }

    pub(crate) fn record_contour_step(&mut self) {
        self.contour_steps = self.contour_steps.saturating_add(1);
    }

    pub(crate) fn set_search_direction(&mut self, direction: Direction) {
        self.search_direction = direction;
    }

    pub(crate) fn set_previous_cell(&mut self, cell: Cell) {
        self.previous_cell = Some(cell);
    }

    pub fn has_path(&self) -> bool {
        self.active_path.is_some()
    }

    pub fn active_path(&self) -> Option<&[Direction]> {
        self.active_path.as_deref()
    }

    pub fn path_progress(&self) -> usize {
        self.path_progress
    }

    pub(crate) fn set_path(&mut self, path: Option<Vec<Direction>>) {
        self.active_path = path;
        self.path_progress = 0;
    }

    pub(crate) fn next_path_direction(&self) -> Option<Direction> {
        self.active_path
            .as_ref()
            .and_then(|path| path.get(self.path_progress).copied())
    }

    pub(crate) fn advance_path(&mut self) {
        self.path_progress += 1;
    }

    pub fn path_completed(&self) -> bool {
        self.active_path
            .as_ref()
            .map_or(true, |path| self.path_progress >= path.len())
    }

    pub(crate) fn clear_path(&mut self) {
        self.active_path = None;
        self.path_progress = 0;
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(Direction::North)
    }
}

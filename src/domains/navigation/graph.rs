use super::ports::SensedCell;
use crate::common::{closest_cell, Cell, Direction};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Forward half of the neighbourhood; the other half is covered from the neighbour's side.
const FORWARD_NEIGHBORS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
];

/// Visibility graph over the cells an agent can sense this tick.
///
/// Built fresh for every planning call and dropped with the path: the sensed set
/// changes every tick, so the graph is never carried over.
#[derive(Debug, Clone)]
pub struct MapGraph {
    graph: UnGraph<Cell, u32>,
    index: HashMap<Cell, NodeIndex>,
}

impl MapGraph {
    /// Builds the graph from `origin` plus every sensed cell accepted by `traversable`.
    /// Edges join 8-neighbours with unit weight.
    pub fn build<F>(origin: Cell, sensed: &[SensedCell], mut traversable: F) -> Self
    where
        F: FnMut(&SensedCell) -> bool,
    {
        let mut graph = UnGraph::<Cell, u32>::with_capacity(sensed.len() + 1, sensed.len() * 4);
        let mut index = HashMap::with_capacity(sensed.len() + 1);
        index.insert(origin, graph.add_node(origin));

        for sensed_cell in sensed {
            if sensed_cell.cell != origin && traversable(sensed_cell) {
                index
                    .entry(sensed_cell.cell)
                    .or_insert_with(|| graph.add_node(sensed_cell.cell));
            }
        }

        for node in graph.node_indices().collect::<Vec<_>>() {
            let cell = graph[node];
            for direction in FORWARD_NEIGHBORS {
                if let Some(&neighbor) = index.get(&cell.add(direction)) {
                    graph.add_edge(node, neighbor, 1);
                }
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    /// The graph node closest to `destination`; ties go to the node added first.
    pub fn nearest_to(&self, destination: Cell) -> Option<Cell> {
        closest_cell(self.graph.node_weights().copied(), destination)
    }

    /// Shortest unit-cost route from `origin` to the node nearest `destination`.
    ///
    /// `None` when no route makes progress: the target is unreachable in the sensed
    /// subgraph, or `origin` already is the closest known cell. An empty route means
    /// `origin == destination`.
    pub fn route(&self, origin: Cell, destination: Cell) -> Option<Vec<Direction>> {
        let start = *self.index.get(&origin)?;
        let target = self.nearest_to(destination)?;
        if target == origin {
            return (origin == destination).then(Vec::new);
        }
        let goal = self.index[&target];

        let (_, nodes) = astar(
            &self.graph,
            start,
            |node| node == goal,
            |edge| *edge.weight(),
            |node| self.graph[node].chebyshev_distance_to(target) as u32,
        )?;

        nodes
            .windows(2)
            .map(|pair| Direction::between(self.graph[pair[0]], self.graph[pair[1]]))
            .collect()
    }
}

/// Graph over the traversable sensed cells around `origin`.
pub fn build_graph(origin: Cell, sensed: &[SensedCell]) -> MapGraph {
    MapGraph::build(origin, sensed, SensedCell::is_traversable)
}

pub fn route(origin: Cell, destination: Cell, graph: &MapGraph) -> Option<Vec<Direction>> {
    graph.route(origin, destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(x: i32, y: i32) -> SensedCell {
        SensedCell { cell: Cell::new(x, y), occupied: false, hazardous: false, elevation: 0 }
    }

    fn wall(x: i32, y: i32) -> SensedCell {
        SensedCell { occupied: true, ..open(x, y) }
    }

    fn square(radius: i32, blocked: &[(i32, i32)]) -> Vec<SensedCell> {
        let mut cells = Vec::new();
        for y in -radius..=radius {
            for x in -radius..=radius {
                if (x, y) == (0, 0) {
                    continue;
                }
                if blocked.contains(&(x, y)) {
                    cells.push(wall(x, y));
                } else {
                    cells.push(open(x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn open_square_is_fully_connected() {
        let graph = build_graph(Cell::new(0, 0), &square(1, &[]));
        assert_eq!(graph.node_count(), 9);
        // 12 orthogonal + 8 diagonal adjacencies in a 3x3 block
        assert_eq!(graph.edge_count(), 20);
    }

    #[test]
    fn obstructed_cells_are_not_nodes() {
        let graph = build_graph(Cell::new(0, 0), &square(1, &[(1, 0)]));
        assert!(!graph.contains(Cell::new(1, 0)));
        assert!(graph.contains(Cell::new(1, 1)));
    }

    #[test]
    fn route_goes_around_a_wall() {
        let blocked = [(1, -1), (1, 0), (1, 1)];
        let graph = build_graph(Cell::new(0, 0), &square(2, &blocked));
        let path = graph.route(Cell::new(0, 0), Cell::new(2, 0)).expect("route exists");

        let mut here = Cell::new(0, 0);
        for step in &path {
            here = here.add(*step);
            assert!(!blocked.contains(&(here.x, here.y)));
        }
        assert_eq!(here, Cell::new(2, 0));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn unsensed_destination_routes_to_closest_sensed_cell() {
        let graph = build_graph(Cell::new(0, 0), &square(2, &[]));
        let path = graph.route(Cell::new(0, 0), Cell::new(10, 0)).expect("route exists");
        let end = path.iter().fold(Cell::new(0, 0), |cell, d| cell.add(*d));
        assert_eq!(end, Cell::new(2, 0));
    }

    #[test]
    fn enclosed_origin_has_no_route() {
        let ring: Vec<(i32, i32)> = Cell::new(0, 0).neighbors().map(|c| (c.x, c.y)).collect();
        let graph = build_graph(Cell::new(0, 0), &square(2, &ring));
        assert_eq!(graph.route(Cell::new(0, 0), Cell::new(2, 2)), None);
    }

    #[test]
    fn route_to_self_is_empty() {
        let graph = build_graph(Cell::new(0, 0), &square(1, &[]));
        assert_eq!(graph.route(Cell::new(0, 0), Cell::new(0, 0)), Some(Vec::new()));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door-mediated connectivity between spaces and areas.
//!
//! Builds an undirected multigraph where:
//! - **Nodes** = spaces or areas
//! - **Edges** = doors whose footprint overlaps both endpoints
//!
//! A door touching exactly one entity is an entrance; a door touching none is
//! a dangling annotation. Neither is an error, they are simply reported.
//! Reachability is a breadth-first worklist with a visited bitset over dense
//! node indices, so it terminates on cycles and never recurses.

use std::collections::VecDeque;

use plan_lite_geometry::{overlap_area, Polygon2D};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::classification::ClassificationScheme;
use crate::config::GeometryConfig;
use crate::keys::*;
use crate::layout::Layout;

/// Entities a door connects, sorted by key. Almost always one or two.
pub type ConnectedSet = SmallVec<[EntityKey; 2]>;

/// Connects each door to every entity its footprint overlaps by more than
/// `overlap_epsilon`.
///
/// The result does not depend on the order of either input: every set is
/// sorted by key.
pub fn per_door_connections<'a, D, E>(
    doors: D,
    entities: E,
    overlap_epsilon: f64,
) -> FxHashMap<OpeningKey, ConnectedSet>
where
    D: IntoIterator<Item = (OpeningKey, &'a Polygon2D)>,
    E: IntoIterator<Item = (EntityKey, &'a Polygon2D)>,
{
    let entities: Vec<(EntityKey, &Polygon2D)> = entities.into_iter().collect();

    doors
        .into_iter()
        .map(|(door, door_footprint)| {
            let mut connected: ConnectedSet = entities
                .iter()
                .filter(|(_, footprint)| overlap_area(door_footprint, footprint) > overlap_epsilon)
                .map(|(key, _)| *key)
                .collect();
            connected.sort_unstable();
            connected.dedup();
            (door, connected)
        })
        .collect()
}

/// Symmetric traversal map: entity -> list of `(door, other entity)`.
///
/// A door linking more than two entities contributes an entry for every pair.
pub fn adjacency(
    connections: &FxHashMap<OpeningKey, ConnectedSet>,
) -> FxHashMap<EntityKey, Vec<(OpeningKey, EntityKey)>> {
    let mut doors: Vec<OpeningKey> = connections.keys().copied().collect();
    doors.sort_unstable();

    let mut map: FxHashMap<EntityKey, Vec<(OpeningKey, EntityKey)>> = FxHashMap::default();
    for door in doors {
        let connected = &connections[&door];
        for (i, &a) in connected.iter().enumerate() {
            for &b in &connected[i + 1..] {
                map.entry(a).or_default().push((door, b));
                map.entry(b).or_default().push((door, a));
            }
        }
    }
    map
}

/// An edge of the connectivity graph.
#[derive(Debug, Clone, Copy)]
pub struct DoorEdge {
    /// Source node index.
    pub source: usize,
    /// Target node index.
    pub target: usize,
    /// The door this edge passes through.
    pub door: OpeningKey,
}

/// Door-mediated multigraph over spaces or areas.
#[derive(Debug, Clone)]
pub struct ConnectivityGraph {
    nodes: Vec<EntityKey>,
    edges: Vec<DoorEdge>,
    /// Adjacency list: node index → list of (neighbor index, edge index).
    adjacency: Vec<Vec<(usize, usize)>>,
    /// Map from entity key to node index for fast lookup.
    key_to_node: FxHashMap<EntityKey, usize>,
    connections: FxHashMap<OpeningKey, ConnectedSet>,
}

impl ConnectivityGraph {
    /// Builds the graph from explicit door and entity footprints.
    ///
    /// Every entity becomes a node, whether or not a door reaches it.
    pub fn build<'a, D, E>(doors: D, entities: E, overlap_epsilon: f64) -> Self
    where
        D: IntoIterator<Item = (OpeningKey, &'a Polygon2D)>,
        E: IntoIterator<Item = (EntityKey, &'a Polygon2D)>,
    {
        let entities: Vec<(EntityKey, &Polygon2D)> = entities.into_iter().collect();
        let connections = per_door_connections(doors, entities.iter().copied(), overlap_epsilon);

        let mut graph = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            key_to_node: FxHashMap::default(),
            connections: FxHashMap::default(),
        };
        for (key, _) in &entities {
            graph.add_node(*key);
        }

        let mut doors: Vec<OpeningKey> = connections.keys().copied().collect();
        doors.sort_unstable();
        for door in doors {
            let connected = &connections[&door];
            match connected.len() {
                0 => tracing::debug!(door = ?door, "door connects no entity"),
                1 => tracing::trace!(door = ?door, entity = ?connected[0], "entrance door"),
                2 => {}
                n => tracing::debug!(door = ?door, connections = n, "door connects more than two entities"),
            }
            for (i, a) in connected.iter().enumerate() {
                for b in &connected[i + 1..] {
                    if let (Some(&s), Some(&t)) = (graph.key_to_node.get(a), graph.key_to_node.get(b)) {
                        graph.add_edge(s, t, door);
                    }
                }
            }
        }
        graph.connections = connections;
        graph
    }

    /// Area-level graph of a layout's doors.
    pub fn from_areas(layout: &Layout, config: &GeometryConfig) -> Self {
        Self::build(
            layout.doors().map(|(k, o)| (k, &o.footprint)),
            layout.areas().map(|(k, a)| (EntityKey::Area(k), &a.footprint)),
            config.overlap_epsilon,
        )
    }

    /// Space-level graph of a layout's doors. Spaces without areas are left out.
    pub fn from_spaces(layout: &Layout, config: &GeometryConfig) -> Self {
        Self::build(
            layout.doors().map(|(k, o)| (k, &o.footprint)),
            layout
                .spaces()
                .filter(|(_, s)| !s.is_degenerate())
                .map(|(k, s)| (EntityKey::Space(k), &s.footprint)),
            config.overlap_epsilon,
        )
    }

    fn add_node(&mut self, key: EntityKey) -> usize {
        if let Some(&idx) = self.key_to_node.get(&key) {
            return idx;
        }
        let idx = self.nodes.len();
        self.key_to_node.insert(key, idx);
        self.nodes.push(key);
        self.adjacency.push(Vec::new());
        idx
    }

    fn add_edge(&mut self, source: usize, target: usize, door: OpeningKey) -> usize {
        let idx = self.edges.len();
        self.edges.push(DoorEdge { source, target, door });
        self.adjacency[source].push((target, idx));
        self.adjacency[target].push((source, idx));
        idx
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.key_to_node.contains_key(&key)
    }

    pub fn edges(&self) -> &[DoorEdge] {
        &self.edges
    }

    /// Entities connected to a door (empty for unknown doors).
    pub fn connections(&self, door: OpeningKey) -> &[EntityKey] {
        self.connections.get(&door).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// All door connections.
    pub fn per_door_connections(&self) -> &FxHashMap<OpeningKey, ConnectedSet> {
        &self.connections
    }

    /// Symmetric traversal map of this graph.
    pub fn adjacency(&self) -> FxHashMap<EntityKey, Vec<(OpeningKey, EntityKey)>> {
        adjacency(&self.connections)
    }

    /// `(door, neighbour)` pairs of an entity.
    pub fn neighbors(&self, key: EntityKey) -> Vec<(OpeningKey, EntityKey)> {
        self.key_to_node
            .get(&key)
            .map(|&node| {
                self.adjacency[node]
                    .iter()
                    .map(|&(neighbor, edge)| (self.edges[edge].door, self.nodes[neighbor]))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Doors connected to exactly one entity, sorted by key.
    pub fn entrances(&self) -> Vec<OpeningKey> {
        self.doors_with(|n| n == 1)
    }

    /// Doors connected to nothing, sorted by key.
    pub fn dangling_doors(&self) -> Vec<OpeningKey> {
        self.doors_with(|n| n == 0)
    }

    fn doors_with(&self, count: impl Fn(usize) -> bool) -> Vec<OpeningKey> {
        let mut doors: Vec<OpeningKey> = self
            .connections
            .iter()
            .filter(|(_, c)| count(c.len()))
            .map(|(k, _)| *k)
            .collect();
        doors.sort_unstable();
        doors
    }

    // =========================================================================
    // Reachability
    // =========================================================================

    /// Entities reachable from `seed` through doors, entering only entities
    /// in `allowed`.
    ///
    /// The seed itself is always part of the result when it is a node; an
    /// unknown seed reaches nothing.
    pub fn reachable(&self, seed: EntityKey, allowed: &FxHashSet<EntityKey>) -> FxHashSet<EntityKey> {
        self.reachable_where(seed, |k| allowed.contains(&k))
    }

    /// Like [`reachable`](Self::reachable) with a membership predicate.
    pub fn reachable_where(&self, seed: EntityKey, allowed: impl Fn(EntityKey) -> bool) -> FxHashSet<EntityKey> {
        let Some(&start) = self.key_to_node.get(&seed) else {
            return FxHashSet::default();
        };
        let visited = self.traverse(start, None, &allowed);
        visited
            .iter()
            .enumerate()
            .filter(|&(_, &seen)| seen)
            .map(|(i, _)| self.nodes[i])
            .collect()
    }

    /// Whether `target` is reachable from `seed`, stopping as soon as it is found.
    pub fn reaches(&self, seed: EntityKey, target: EntityKey, allowed: &FxHashSet<EntityKey>) -> bool {
        let (Some(&start), Some(&goal)) = (self.key_to_node.get(&seed), self.key_to_node.get(&target)) else {
            return false;
        };
        self.traverse(start, Some(goal), &|k| allowed.contains(&k))[goal]
    }

    /// Breadth-first worklist; returns the visited bitset.
    fn traverse(&self, start: usize, goal: Option<usize>, allowed: &dyn Fn(EntityKey) -> bool) -> Vec<bool> {
        let mut visited = vec![false; self.node_count()];
        let mut queue = VecDeque::new();

        visited[start] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            if Some(node) == goal {
                break;
            }
            for &(neighbor, _) in &self.adjacency[node] {
                if !visited[neighbor] && allowed(self.nodes[neighbor]) {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        visited
    }

    /// Public areas reachable from `seed` through public areas only.
    ///
    /// The seed may be private (a unit's hallway door, say); it is never part
    /// of the result unless the scheme classifies it as public.
    pub fn connected_public_areas(
        &self,
        layout: &Layout,
        scheme: &ClassificationScheme,
        seed: AreaKey,
    ) -> FxHashSet<AreaKey> {
        let is_public = |key: EntityKey| {
            key.as_area()
                .and_then(|k| layout.area(k))
                .is_some_and(|a| scheme.is_public(a.area_type))
        };
        self.reachable_where(EntityKey::Area(seed), is_public)
            .into_iter()
            .filter(|k| is_public(*k))
            .filter_map(|k| k.as_area())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::AreaType;
    use crate::entities::Opening;
    use crate::layout::LayoutBuilder;
    use slotmap::SlotMap;

    fn keys(n: usize) -> (Vec<EntityKey>, Vec<OpeningKey>) {
        let mut areas: SlotMap<AreaKey, ()> = SlotMap::with_key();
        let mut doors: SlotMap<OpeningKey, ()> = SlotMap::with_key();
        (
            (0..n).map(|_| EntityKey::Area(areas.insert(()))).collect(),
            (0..n).map(|_| doors.insert(())).collect(),
        )
    }

    /// Three rooms around a corner with doors A-B, B-C and C-A.
    fn triangle() -> (Vec<EntityKey>, Vec<OpeningKey>, Vec<Polygon2D>, Vec<Polygon2D>) {
        let (entities, doors) = keys(3);
        let rooms = vec![
            Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0),
            Polygon2D::rectangle(4.0, 0.0, 8.0, 4.0),
            Polygon2D::rectangle(0.0, 4.0, 8.0, 8.0),
        ];
        let openings = vec![
            Polygon2D::rectangle(3.9, 1.0, 4.1, 2.0),
            Polygon2D::rectangle(6.0, 3.9, 7.0, 4.1),
            Polygon2D::rectangle(1.0, 3.9, 2.0, 4.1),
        ];
        (entities, doors, rooms, openings)
    }

    #[test]
    fn three_cycle_reaches_everything_once() {
        let (entities, doors, rooms, openings) = triangle();
        let graph = ConnectivityGraph::build(
            doors.iter().copied().zip(openings.iter()),
            entities.iter().copied().zip(rooms.iter()),
            1e-6,
        );
        assert_eq!(graph.edge_count(), 3);

        let allowed: FxHashSet<EntityKey> = entities.iter().copied().collect();
        let reached = graph.reachable(entities[0], &allowed);
        assert_eq!(reached, allowed);
        assert_eq!(reached.len(), 3);
    }

    #[test]
    fn connections_are_order_independent() {
        let (entities, doors, rooms, openings) = triangle();
        let forward = per_door_connections(
            doors.iter().copied().zip(openings.iter()),
            entities.iter().copied().zip(rooms.iter()),
            1e-6,
        );
        let backward = per_door_connections(
            doors.iter().copied().zip(openings.iter()).rev(),
            entities.iter().copied().zip(rooms.iter()).rev(),
            1e-6,
        );
        assert_eq!(forward, backward);
        assert_eq!(forward[&doors[0]].as_slice(), &[entities[0], entities[1]]);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let (entities, doors, rooms, openings) = triangle();
        let connections = per_door_connections(
            doors.iter().copied().zip(openings.iter()),
            entities.iter().copied().zip(rooms.iter()),
            1e-6,
        );
        let map = adjacency(&connections);
        for (entity, links) in &map {
            for (door, other) in links {
                assert!(map[other].contains(&(*door, *entity)));
            }
        }
        assert_eq!(map[&entities[0]].len(), 2);
    }

    #[test]
    fn allowed_subset_blocks_traversal() {
        let (entities, doors, rooms, openings) = triangle();
        // Drop the C-A door so B is the only way to C
        let graph = ConnectivityGraph::build(
            doors.iter().copied().zip(openings.iter()).take(2),
            entities.iter().copied().zip(rooms.iter()),
            1e-6,
        );

        let allowed: FxHashSet<EntityKey> = [entities[0], entities[2]].into_iter().collect();
        let reached = graph.reachable(entities[0], &allowed);
        assert_eq!(reached.len(), 1);
        assert!(reached.contains(&entities[0]));
        assert!(!graph.reaches(entities[0], entities[2], &allowed));

        let everything: FxHashSet<EntityKey> = entities.iter().copied().collect();
        assert!(graph.reaches(entities[0], entities[2], &everything));
    }

    #[test]
    fn unknown_seed_reaches_nothing() {
        let (entities, doors, rooms, openings) = triangle();
        let graph = ConnectivityGraph::build(
            doors.iter().copied().zip(openings.iter()),
            entities.iter().copied().zip(rooms.iter()).take(2),
            1e-6,
        );
        let allowed: FxHashSet<EntityKey> = entities.iter().copied().collect();
        assert!(graph.reachable(entities[2], &allowed).is_empty());
    }

    #[test]
    fn entrances_and_dangling_doors() {
        let (entities, doors) = keys(3);
        let room = Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0);
        let entrance = Polygon2D::rectangle(1.0, -0.2, 2.0, 0.1);
        // Touching only along an edge is not a connection
        let touching = Polygon2D::rectangle(4.0, 1.0, 4.2, 2.0);
        let lost = Polygon2D::rectangle(10.0, 10.0, 11.0, 10.2);

        let graph = ConnectivityGraph::build(
            [(doors[0], &entrance), (doors[1], &touching), (doors[2], &lost)],
            [(entities[0], &room)],
            1e-6,
        );
        assert_eq!(graph.entrances(), vec![doors[0]]);
        let mut dangling = vec![doors[1], doors[2]];
        dangling.sort_unstable();
        assert_eq!(graph.dangling_doors(), dangling);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn door_over_three_rooms_links_every_pair() {
        let (entities, doors) = keys(3);
        let rooms = [
            Polygon2D::rectangle(0.0, 0.0, 2.0, 2.0),
            Polygon2D::rectangle(2.0, 0.0, 4.0, 2.0),
            Polygon2D::rectangle(0.0, 2.0, 4.0, 4.0),
        ];
        let hub = Polygon2D::rectangle(1.5, 1.5, 2.5, 2.5);
        let graph = ConnectivityGraph::build(
            [(doors[0], &hub)],
            entities.iter().copied().zip(rooms.iter()),
            1e-6,
        );
        assert_eq!(graph.connections(doors[0]).len(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors(entities[0]).len(), 2);
    }

    #[test]
    fn layout_graphs_ignore_windows_and_empty_spaces() {
        let config = GeometryConfig::default();
        let mut builder = LayoutBuilder::new();
        let left = builder.add_space(Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0));
        let right = builder.add_space(Polygon2D::rectangle(4.2, 0.0, 8.0, 4.0));
        let empty = builder.add_space(Polygon2D::rectangle(0.0, 4.2, 8.0, 8.0));
        let a = builder
            .add_area(left, Polygon2D::rectangle(0.0, 0.0, 4.0, 4.0), AreaType::Corridor, 1)
            .unwrap();
        let b = builder
            .add_area(right, Polygon2D::rectangle(4.2, 0.0, 8.0, 4.0), AreaType::Bedroom, 2)
            .unwrap();
        let door = builder.add_opening(Opening::door(Polygon2D::rectangle(3.9, 1.0, 4.3, 2.0)));
        builder.add_opening(Opening::window(Polygon2D::rectangle(3.9, 2.5, 4.3, 3.5)));
        let layout = builder.build(&config);

        let spaces = ConnectivityGraph::from_spaces(&layout, &config);
        assert_eq!(spaces.node_count(), 2);
        assert!(!spaces.contains(EntityKey::Space(empty)));
        assert_eq!(spaces.edge_count(), 1);

        let areas = ConnectivityGraph::from_areas(&layout, &config);
        assert_eq!(areas.per_door_connections().len(), 1);
        let mut expected = vec![EntityKey::Area(a), EntityKey::Area(b)];
        expected.sort_unstable();
        assert_eq!(areas.connections(door), expected.as_slice());
    }
}

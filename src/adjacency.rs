//! Adjacency is built in two phases: facts are first recorded in a dense
//! `[direction][a][b]` boolean cube, which is then compressed into sorted
//! per-node lists. Propagation only ever walks the compressed lists.

use crate::{Direction, NodeId};
use strum::{EnumCount, IntoEnumIterator};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseAdjacency {
  nodes: usize,
  table: Vec<bool>,
}

impl DenseAdjacency {
  pub fn new(nodes: usize) -> Self {
    Self {
      nodes,
      table: vec![false; Direction::COUNT * nodes * nodes],
    }
  }

  pub fn nodes(&self) -> usize {
    self.nodes
  }

  fn slot(&self, dir: Direction, a: NodeId, b: NodeId) -> usize {
    (dir.index() * self.nodes + a) * self.nodes + b
  }

  pub fn allow(&mut self, dir: Direction, a: NodeId, b: NodeId) {
    let slot = self.slot(dir, a, b);
    self.table[slot] = true;
  }

  pub fn allowed(&self, dir: Direction, a: NodeId, b: NodeId) -> bool {
    self.table[self.slot(dir, a, b)]
  }

  /// Records that `left`'s right edge matches `right`'s left edge, along with
  /// the facts implied by the symmetry of both nodes and the vertical pairing
  /// obtained by rotating both a quarter turn.
  ///
  /// `actions[n]` holds the eight rotation / reflection images of node `n`.
  pub fn declare(&mut self, left: NodeId, right: NodeId, actions: &[[NodeId; 8]]) {
    let (l, r) = (left, right);
    let d = actions[l][1];
    let u = actions[r][1];

    self.allow(Direction::Left, r, l);
    self.allow(Direction::Left, actions[r][6], actions[l][6]);
    self.allow(Direction::Left, actions[l][4], actions[r][4]);
    self.allow(Direction::Left, actions[l][2], actions[r][2]);

    self.allow(Direction::Up, u, d);
    self.allow(Direction::Up, actions[d][6], actions[u][6]);
    self.allow(Direction::Up, actions[u][4], actions[d][4]);
    self.allow(Direction::Up, actions[d][2], actions[u][2]);
  }

  pub fn mirror(&mut self) {
    for a in 0..self.nodes {
      for b in 0..self.nodes {
        let left = self.allowed(Direction::Left, a, b);
        let up = self.allowed(Direction::Up, a, b);

        let right = self.slot(Direction::Right, b, a);
        self.table[right] = left;
        let down = self.slot(Direction::Down, b, a);
        self.table[down] = up;
      }
    }
  }

  pub fn compress(&self) -> Adjacency {
    let lists = Direction::iter()
      .flat_map(|dir| {
        (0..self.nodes).map(move |a| {
          (0..self.nodes)
            .filter(|b| self.allowed(dir, a, *b))
            .collect::<Vec<NodeId>>()
        })
      })
      .collect();

    Adjacency {
      nodes: self.nodes,
      lists,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Adjacency {
  nodes: usize,
  lists: Vec<Vec<NodeId>>,
}

impl Adjacency {
  pub fn nodes(&self) -> usize {
    self.nodes
  }

  pub fn compatible(&self, dir: Direction, node: NodeId) -> &[NodeId] {
    &self.lists[dir.index() * self.nodes + node]
  }

  pub fn allowed(&self, dir: Direction, a: NodeId, b: NodeId) -> bool {
    self.compatible(dir, a).binary_search(&b).is_ok()
  }

  pub fn unsupported(&self) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
    Direction::iter().flat_map(move |dir| {
      (0..self.nodes).filter_map(move |node| self.compatible(dir, node).is_empty().then_some((dir, node)))
    })
  }
}

impl From<&DenseAdjacency> for Adjacency {
  fn from(dense: &DenseAdjacency) -> Self {
    dense.compress()
  }
}

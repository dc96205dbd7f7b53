use crate::{tileset::TileSet, CellIndex, Direction, NodeId};
use strum::{EnumCount, VariantArray};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entropy {
  possible: usize,
  weight_sum: f64,
  weight_log_weight_sum: f64,
  value: f64,
}

impl Entropy {
  pub fn new(possible: usize, weight_sum: f64, weight_log_weight_sum: f64) -> Self {
    let mut this = Self {
      possible,
      weight_sum,
      weight_log_weight_sum,
      value: 0.0,
    };
    this.recompute();
    this
  }

  pub fn possible(&self) -> usize {
    self.possible
  }

  pub fn weight_sum(&self) -> f64 {
    self.weight_sum
  }

  pub fn weight_log_weight_sum(&self) -> f64 {
    self.weight_log_weight_sum
  }

  pub fn value(&self) -> f64 {
    self.value
  }

  fn remove(&mut self, weight: f64, weight_log_weight: f64) {
    self.possible -= 1;
    self.weight_sum -= weight;
    self.weight_log_weight_sum -= weight_log_weight;
    self.recompute();
  }

  fn recompute(&mut self) {
    if self.possible == 0 {
      // nothing left, the sums only hold rounding noise
      self.weight_sum = 0.0;
      self.weight_log_weight_sum = 0.0;
      self.value = 0.0;
    } else {
      self.value = self.weight_sum.ln() - self.weight_log_weight_sum / self.weight_sum;
    }
  }
}

#[derive(Debug, Clone)]
pub struct Cells {
  nodes: usize,
  wave: Vec<bool>,
  compatible: Vec<[usize; Direction::COUNT]>,
  entropies: Vec<Entropy>,
  stack: Vec<(CellIndex, NodeId)>,
  pushes: usize,
}

impl Cells {
  #[profiling::function]
  pub fn new(len: usize, tileset: &TileSet) -> Self {
    let nodes = tileset.len();
    let mut this = Self {
      nodes,
      wave: vec![true; len * nodes],
      compatible: vec![[0; Direction::COUNT]; len * nodes],
      entropies: vec![tileset.initial_entropy(); len],
      stack: Vec::with_capacity(len * nodes),
      pushes: 0,
    };
    this.clear(tileset);
    this
  }

  /// Makes every node possible everywhere again. A node's counter for a
  /// direction starts at the number of nodes that can support it from the
  /// neighbor on that side, which is its list toward the opposite direction.
  #[profiling::function]
  pub fn clear(&mut self, tileset: &TileSet) {
    let adjacency = tileset.adjacency();
    let support = (0..self.nodes)
      .map(|node| {
        std::array::from_fn(|d| {
          let dir = Direction::VARIANTS[d];
          adjacency.compatible(dir.opposite(), node).len()
        })
      })
      .collect::<Vec<[usize; Direction::COUNT]>>();

    self.wave.fill(true);
    for cell in self.compatible.chunks_mut(self.nodes) {
      cell.copy_from_slice(&support);
    }
    self.entropies.fill(tileset.initial_entropy());
    self.stack.clear();
    self.pushes = 0;
  }

  pub fn len(&self) -> usize {
    self.entropies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entropies.is_empty()
  }

  pub fn nodes(&self) -> usize {
    self.nodes
  }

  pub fn is_possible(&self, cell: CellIndex, node: NodeId) -> bool {
    self.wave[cell * self.nodes + node]
  }

  pub fn possibilities(&self, cell: CellIndex) -> impl Iterator<Item = NodeId> + '_ {
    let row = &self.wave[cell * self.nodes..(cell + 1) * self.nodes];
    row
      .iter()
      .enumerate()
      .filter_map(|(node, possible)| possible.then_some(node))
  }

  pub fn compatible(&self, cell: CellIndex, node: NodeId, dir: Direction) -> usize {
    self.compatible[cell * self.nodes + node][dir.index()]
  }

  pub fn entropy(&self, cell: CellIndex) -> &Entropy {
    &self.entropies[cell]
  }

  pub fn selected(&self, cell: CellIndex) -> Option<NodeId> {
    (self.entropies[cell].possible == 1)
      .then(|| self.possibilities(cell).next())
      .flatten()
  }

  pub fn pushes(&self) -> usize {
    self.pushes
  }

  pub(crate) fn prune(&mut self, cell: CellIndex, node: NodeId, tileset: &TileSet) {
    let slot = cell * self.nodes + node;
    debug_assert!(self.wave[slot], "node {node} pruned twice from cell {cell}");

    self.wave[slot] = false;
    self.compatible[slot] = [0; Direction::COUNT];
    self.entropies[cell].remove(tileset.weight(node), tileset.weight_log_weight(node));
    self.stack.push((cell, node));
    self.pushes += 1;
  }

  pub(crate) fn pop(&mut self) -> Option<(CellIndex, NodeId)> {
    self.stack.pop()
  }

  /// Drops one unit of support for `node` at `cell` from direction `dir`.
  /// True when that was the last support and the node has to go.
  pub(crate) fn weaken(&mut self, cell: CellIndex, node: NodeId, dir: Direction) -> bool {
    let slot = cell * self.nodes + node;
    if !self.wave[slot] {
      return false;
    }

    let counter = &mut self.compatible[slot][dir.index()];
    *counter = counter.saturating_sub(1);
    *counter == 0
  }
}

use crate::{
  cells::Cells,
  err::{Error, Result},
  prebuilt::exclusions::NoExclusion,
  render,
  tileset::TileSet,
  util::{Size, UPos},
  CellIndex, Direction, Exclusion, NodeId, Observation,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use strum::IntoEnumIterator;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
  #[default]
  Uninitialized,
  Ready,
  Running,
  Collapsed,
  Contradiction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
  Collapsed,
  Contradiction,
  LimitReached,
}

impl Outcome {
  pub fn success(&self) -> bool {
    !matches!(self, Self::Contradiction)
  }

  pub fn is_complete(&self) -> bool {
    matches!(self, Self::Collapsed)
  }
}

#[derive(Debug, Clone)]
pub struct SolverBuilder {
  tileset: Arc<TileSet>,
  size: Size,
  periodic: bool,
  presets: Vec<(UPos, NodeId)>,
}

impl SolverBuilder {
  pub fn new(tileset: impl Into<Arc<TileSet>>, size: impl Into<Size>) -> Self {
    Self {
      tileset: tileset.into(),
      size: size.into(),
      periodic: false,
      presets: Vec::new(),
    }
  }

  pub fn periodic(&mut self, periodic: bool) -> &mut Self {
    self.periodic = periodic;
    self
  }

  pub fn with_periodic(mut self, periodic: bool) -> Self {
    self.periodic = periodic;
    self
  }

  pub fn insert(&mut self, pos: impl Into<UPos>, node: NodeId) -> &mut Self {
    self.presets.push((pos.into(), node));
    self
  }

  pub fn size(&self) -> &Size {
    &self.size
  }

  pub fn build(self) -> Result<Solver> {
    if self.size.is_empty() {
      return Err(Error::EmptyGrid {
        width: self.size.width(),
        height: self.size.height(),
      });
    }

    let presets = self
      .presets
      .iter()
      .map(|(pos, node)| {
        if pos.x >= self.size.width() || pos.y >= self.size.height() {
          return Err(Error::PresetOutOfBounds {
            position: [pos.x, pos.y],
            width: self.size.width(),
            height: self.size.height(),
          });
        }
        if *node >= self.tileset.len() {
          return Err(Error::UnknownNode {
            node: *node,
            nodes: self.tileset.len(),
          });
        }
        Ok((pos.index(self.size), *node))
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Solver {
      tileset: self.tileset,
      size: self.size,
      periodic: self.periodic,
      presets,
      cells: None,
      rng: ChaCha20Rng::seed_from_u64(0),
      observed: None,
      status: Status::Uninitialized,
    })
  }
}

#[derive(Debug)]
pub struct Solver {
  tileset: Arc<TileSet>,
  size: Size,
  periodic: bool,
  presets: Vec<(CellIndex, NodeId)>,
  cells: Option<Cells>,
  rng: ChaCha20Rng,
  observed: Option<Vec<NodeId>>,
  status: Status,
}

impl Solver {
  pub fn run(&mut self, seed: u64, limit: usize) -> Outcome {
    self.run_with(seed, limit, &NoExclusion)
  }

  /// Clears the grid and alternates observing and propagating until the
  /// grid collapses, contradicts, or `limit` iterations pass. A `limit` of 0
  /// never stops early.
  #[profiling::function]
  pub fn run_with<E: Exclusion + ?Sized>(&mut self, seed: u64, limit: usize, excluded: &E) -> Outcome {
    self.clear();
    self.rng = ChaCha20Rng::seed_from_u64(seed);
    self.status = Status::Running;

    self.restrict(excluded);
    self.propagate(excluded);

    let mut iteration = 0;
    while limit == 0 || iteration < limit {
      match self.observe(excluded) {
        Observation::Complete => {
          tracing::debug!("Collapsed {seed} after {iteration} observations");
          self.status = Status::Collapsed;
          return Outcome::Collapsed;
        }
        Observation::Contradiction(cell) => {
          tracing::debug!("Contradiction in cell {cell} with seed {seed}");
          self.status = Status::Contradiction;
          return Outcome::Contradiction;
        }
        Observation::Continue(_) => self.propagate(excluded),
      }
      iteration += 1;
    }

    tracing::debug!("Gave up on seed {seed} after {limit} iterations");
    Outcome::LimitReached
  }

  pub fn clear(&mut self) {
    match self.cells.as_mut() {
      Some(cells) => cells.clear(&self.tileset),
      None => self.cells = Some(Cells::new(self.size.len(), &self.tileset)),
    }
    self.observed = None;
    self.status = Status::Ready;
  }

  #[profiling::function]
  pub fn observe<E: Exclusion + ?Sized>(&mut self, excluded: &E) -> Observation {
    let tileset = &self.tileset;
    let cells = self
      .cells
      .get_or_insert_with(|| Cells::new(self.size.len(), tileset));

    let mut min = f64::INFINITY;
    let mut argmin = None;
    for cell in (0..cells.len()).filter(|cell| !excluded.excluded(*cell)) {
      let entropy = cells.entropy(cell);
      if entropy.possible() == 0 {
        return Observation::Contradiction(cell);
      }

      let value = entropy.value();
      if entropy.possible() > 1 && value <= min {
        let noise = 1e-6 * self.rng.random::<f64>();
        if value + noise < min {
          min = value + noise;
          argmin = Some(cell);
        }
      }
    }

    let Some(cell) = argmin else {
      self.observed = Some(
        (0..cells.len())
          .map(|cell| cells.possibilities(cell).next().unwrap_or_default())
          .collect(),
      );
      return Observation::Complete;
    };

    let draw = self.rng.random::<f64>();
    let Some(chosen) = Self::sample(cells, tileset, cell, draw) else {
      return Observation::Contradiction(cell);
    };
    tracing::trace!("Observed {} at {cell}", tileset.name(chosen));

    let others = cells
      .possibilities(cell)
      .filter(|node| *node != chosen)
      .collect::<Vec<_>>();
    for node in others {
      cells.prune(cell, node, tileset);
    }

    Observation::Continue(cell)
  }

  #[profiling::function]
  pub fn propagate<E: Exclusion + ?Sized>(&mut self, excluded: &E) {
    let Some(cells) = self.cells.as_mut() else {
      return;
    };
    let tileset = &self.tileset;
    let adjacency = tileset.adjacency();

    while let Some((cell, node)) = cells.pop() {
      for dir in Direction::iter() {
        let Some(neighbor) = self.size.neighbor(cell, dir, self.periodic) else {
          continue;
        };
        if excluded.excluded(neighbor) {
          continue;
        }

        for &other in adjacency.compatible(dir, node) {
          if cells.weaken(neighbor, other, dir) {
            cells.prune(neighbor, other, tileset);
          }
        }
      }
    }
  }

  /// Applies presets and drops every node that has no possible support from
  /// a neighbor that exists
  fn restrict<E: Exclusion + ?Sized>(&mut self, excluded: &E) {
    let Some(cells) = self.cells.as_mut() else {
      return;
    };
    let tileset = &self.tileset;

    for &(cell, node) in self.presets.iter() {
      let others = cells
        .possibilities(cell)
        .filter(|other| *other != node)
        .collect::<Vec<_>>();
      for other in others {
        cells.prune(cell, other, tileset);
      }
    }

    for cell in (0..cells.len()).filter(|cell| !excluded.excluded(*cell)) {
      for dir in Direction::iter() {
        let supported_from = self.size.neighbor(cell, dir.opposite(), self.periodic);
        if supported_from.is_none_or(|source| excluded.excluded(source)) {
          continue;
        }

        let unsupported = cells
          .possibilities(cell)
          .filter(|node| cells.compatible(cell, *node, dir) == 0)
          .collect::<Vec<_>>();
        for node in unsupported {
          cells.prune(cell, node, tileset);
        }
      }
    }
  }

  fn sample(cells: &Cells, tileset: &TileSet, cell: CellIndex, draw: f64) -> Option<NodeId> {
    let total = cells
      .possibilities(cell)
      .map(|node| tileset.weight(node))
      .sum::<f64>();
    let threshold = draw * total;

    cells
      .possibilities(cell)
      .scan(0.0, |partial, node| {
        *partial += tileset.weight(node);
        Some((node, *partial))
      })
      .find(|(_, partial)| *partial >= threshold)
      .map(|(node, _)| node)
      .or_else(|| cells.possibilities(cell).last())
  }

  pub fn observed(&self) -> Option<&[NodeId]> {
    self.observed.as_deref()
  }

  pub fn status(&self) -> Status {
    self.status
  }

  pub fn cells(&self) -> Option<&Cells> {
    self.cells.as_ref()
  }

  pub fn tileset(&self) -> &Arc<TileSet> {
    &self.tileset
  }

  pub fn size(&self) -> &Size {
    &self.size
  }

  pub fn periodic(&self) -> bool {
    self.periodic
  }

  pub fn text(&self) -> Option<String> {
    self
      .observed
      .as_deref()
      .map(|observed| render::text(&self.tileset, self.size, observed))
  }
}

#[cfg(test)]
mod tests {
  use super::{Outcome, SolverBuilder, Status};
  use crate::{
    err::Error,
    prebuilt::{exclusions::Margin, tilesets},
    rules::{RuleBuilder, Rules, TileDecl},
    symmetry::SymmetryClass,
    tileset::TileSet,
    util::Size,
    CellIndex, Direction, Exclusion, Observation,
  };
  use std::sync::Arc;
  use strum::IntoEnumIterator;

  const SEED: u64 = 123;

  fn lines() -> Arc<TileSet> {
    Arc::new(tilesets::lines().compile(None).unwrap())
  }

  fn assert_valid(tiles: &TileSet, size: Size, periodic: bool, observed: &[usize]) {
    for (cell, node) in observed.iter().enumerate() {
      for dir in Direction::iter() {
        if let Some(neighbor) = size.neighbor(cell, dir, periodic) {
          assert!(
            tiles.adjacency().allowed(dir, *node, observed[neighbor]),
            "{} next to {} toward {dir:?}",
            tiles.name(*node),
            tiles.name(observed[neighbor])
          );
        }
      }
    }
  }

  #[test]
  fn single_symmetric_tile_fills_the_grid() {
    let rules: Rules = RuleBuilder::default()
      .with_tile(TileDecl::new("grass", SymmetryClass::X))
      .with_neighbor("grass", "grass")
      .into();
    let mut solver = SolverBuilder::new(rules.compile(None).unwrap(), [3, 3])
      .with_periodic(true)
      .build()
      .unwrap();

    for seed in 0..5 {
      assert_eq!(solver.run(seed, 0), Outcome::Collapsed);
      assert_eq!(solver.observed(), Some(&[0; 9][..]));
      assert_eq!(solver.status(), Status::Collapsed);
    }
  }

  #[test]
  fn tiles_without_adjacency_contradict() {
    let rules: Rules = RuleBuilder::default()
      .with_tile(TileDecl::new("a", SymmetryClass::X))
      .with_tile(TileDecl::new("b", SymmetryClass::X))
      .into();
    let mut solver = SolverBuilder::new(rules.compile(None).unwrap(), [2, 2])
      .build()
      .unwrap();

    for seed in 0..5 {
      assert_eq!(solver.run(seed, 0), Outcome::Contradiction);
      assert_eq!(solver.observed(), None);
      assert_eq!(solver.status(), Status::Contradiction);
    }
  }

  #[test]
  fn same_seed_produces_same_grid() {
    let tiles = lines();
    let mut a = SolverBuilder::new(tiles.clone(), [8, 6]).build().unwrap();
    let mut b = SolverBuilder::new(tiles.clone(), [8, 6]).build().unwrap();

    assert_eq!(a.run(SEED, 0), Outcome::Collapsed);
    assert_eq!(b.run(SEED, 0), Outcome::Collapsed);
    assert_eq!(a.observed(), b.observed());

    let first = a.observed().map(<[usize]>::to_vec);
    assert_eq!(a.run(SEED, 0), Outcome::Collapsed);
    assert_eq!(a.observed().map(<[usize]>::to_vec), first);
  }

  #[test]
  fn collapsed_grids_respect_adjacency() {
    let tiles = lines();
    for periodic in [false, true] {
      let mut solver = SolverBuilder::new(tiles.clone(), [7, 5])
        .with_periodic(periodic)
        .build()
        .unwrap();

      for seed in 0..10 {
        assert_eq!(solver.run(seed, 0), Outcome::Collapsed);
        let observed = solver.observed().unwrap();
        assert_eq!(observed.len(), 35);
        assert_valid(&tiles, *solver.size(), periodic, observed);
      }
    }
  }

  #[test]
  fn presets_are_kept() {
    let tiles = lines();
    let cross = tiles.legend().first_node("cross").unwrap();

    let mut builder = SolverBuilder::new(tiles.clone(), [5, 5]);
    builder.insert([2, 3], cross).insert([0, 0], cross);
    let mut solver = builder.build().unwrap();

    for seed in 0..5 {
      assert_eq!(solver.run(seed, 0), Outcome::Collapsed);
      let observed = solver.observed().unwrap();
      assert_eq!(observed[2 + 3 * 5], cross);
      assert_eq!(observed[0], cross);
      assert_valid(&tiles, Size::new(5, 5), false, observed);
    }
  }

  #[test]
  fn limit_stops_without_a_result() {
    let mut solver = SolverBuilder::new(lines(), [10, 10]).build().unwrap();

    let outcome = solver.run(SEED, 1);
    assert_eq!(outcome, Outcome::LimitReached);
    assert!(outcome.success());
    assert!(!outcome.is_complete());
    assert_eq!(solver.observed(), None);
    assert_eq!(solver.text(), None);
    assert_eq!(solver.status(), Status::Running);
  }

  #[test]
  fn clear_resets_every_cell() {
    let tiles = lines();
    let mut solver = SolverBuilder::new(tiles.clone(), [4, 4]).build().unwrap();
    assert_eq!(solver.status(), Status::Uninitialized);
    assert!(solver.cells().is_none());

    assert_eq!(solver.run(SEED, 0), Outcome::Collapsed);
    solver.clear();
    assert_eq!(solver.status(), Status::Ready);
    assert_eq!(solver.observed(), None);

    let cells = solver.cells().unwrap();
    for cell in 0..cells.len() {
      assert_eq!(cells.entropy(cell).possible(), tiles.len());
      assert_eq!(cells.entropy(cell).value(), tiles.initial_entropy().value());
    }
  }

  #[test]
  fn every_pair_is_pruned_at_most_once() {
    let tiles = lines();
    let mut solver = SolverBuilder::new(tiles.clone(), [9, 9]).build().unwrap();

    for seed in 0..10 {
      solver.run(seed, 0);
      let cells = solver.cells().unwrap();
      assert!(cells.pushes() <= cells.len() * tiles.len());

      // a fully resolved grid pruned all but one node everywhere, each exactly once
      assert_eq!(cells.pushes(), cells.len() * (tiles.len() - 1));
    }
  }

  #[test]
  fn single_possibility_is_observed_as_itself() {
    let tiles = lines();
    let mut solver = SolverBuilder::new(tiles.clone(), [3, 3]).build().unwrap();
    solver.clear();

    // resolve everything by hand, the observation has nothing left to choose
    let line = tiles.legend().first_node("line").unwrap();
    let grid = [0, 0, 0, line, line, line, 0, 0, 0];
    for (cell, keep) in grid.iter().enumerate() {
      for node in (0..tiles.len()).filter(|node| node != keep) {
        solver.cells.as_mut().unwrap().prune(cell, node, &tiles);
      }
    }

    assert_eq!(solver.observe(&|_: CellIndex| false), Observation::Complete);
    assert_eq!(solver.observed(), Some(&grid[..]));
  }

  #[test]
  fn excluded_cells_are_left_alone() {
    let tiles = lines();
    let size = Size::new(6, 6);
    let margin = Margin::new(size, 2);
    let mut solver = SolverBuilder::new(tiles.clone(), size).build().unwrap();

    assert_eq!(solver.run_with(SEED, 0, &margin), Outcome::Collapsed);
    let cells = solver.cells().unwrap();
    for cell in 0..cells.len() {
      let possible = cells.entropy(cell).possible();
      if margin.excluded(cell) {
        assert_eq!(possible, tiles.len(), "cell {cell}");
      } else {
        assert_eq!(possible, 1, "cell {cell}");
      }
    }
  }

  #[test]
  fn text_lists_node_names_per_row() {
    let rules: Rules = RuleBuilder::default()
      .with_tile(TileDecl::new("grass", SymmetryClass::X))
      .with_neighbor("grass", "grass")
      .into();
    let mut solver = SolverBuilder::new(rules.compile(None).unwrap(), [2, 2])
      .build()
      .unwrap();
    solver.run(SEED, 0);

    assert_eq!(
      solver.text().as_deref(),
      Some("grass 0, grass 0, \ngrass 0, grass 0, \n")
    );
  }

  #[test]
  fn invalid_configurations() {
    let tiles = lines();

    assert_eq!(
      SolverBuilder::new(tiles.clone(), [0, 4]).build().unwrap_err(),
      Error::EmptyGrid {
        width: 0,
        height: 4
      }
    );

    let mut builder = SolverBuilder::new(tiles.clone(), [3, 3]);
    builder.insert([3, 0], 0);
    assert_eq!(
      builder.build().unwrap_err(),
      Error::PresetOutOfBounds {
        position: [3, 0],
        width: 3,
        height: 3
      }
    );

    let mut builder = SolverBuilder::new(tiles.clone(), [3, 3]);
    builder.insert([1, 1], tiles.len());
    assert_eq!(
      builder.build().unwrap_err(),
      Error::UnknownNode {
        node: tiles.len(),
        nodes: tiles.len()
      }
    );
  }
}

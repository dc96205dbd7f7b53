//! Ready made pipe style rule sets. Each tile lists which of its edges carry a
//! pipe in its first orientation; two tiles may sit side by side when the
//! touching edges agree.

use crate::{
  rules::{RuleBuilder, Rules, TileDecl},
  symmetry::SymmetryClass,
  Direction,
};
use strum::EnumCount;

type Edges = [bool; Direction::COUNT];

const NONE: Edges = [false; Direction::COUNT];
const ALL: Edges = [true; Direction::COUNT];
const VERTICAL: Edges = [false, true, false, true];
const LEFT_UP: Edges = [true, true, false, false];
const LEFT_UP_RIGHT: Edges = [true, true, true, false];

struct Pipe {
  name: &'static str,
  symmetry: SymmetryClass,
  weight: f64,
  edges: Edges,
}

const fn pipe(name: &'static str, symmetry: SymmetryClass, weight: f64, edges: Edges) -> Pipe {
  Pipe {
    name,
    symmetry,
    weight,
    edges,
  }
}

/// Straight lines that cross. Rows and columns each either carry a line or
/// not, so every grid size has a solution.
pub fn lines() -> Rules {
  pipes(
    &[
      pipe("empty", SymmetryClass::X, 1.0, NONE),
      pipe("line", SymmetryClass::I, 1.0, VERTICAL),
      pipe("cross", SymmetryClass::X, 1.0, ALL),
    ],
    &[("straight", &["empty", "line"][..])],
  )
}

pub fn knots() -> Rules {
  pipes(
    &[
      pipe("empty", SymmetryClass::X, 1.0, NONE),
      pipe("line", SymmetryClass::I, 1.0, VERTICAL),
      pipe("corner", SymmetryClass::L, 1.0, LEFT_UP),
      pipe("t", SymmetryClass::T, 0.5, LEFT_UP_RIGHT),
      pipe("cross", SymmetryClass::X, 0.25, ALL),
    ],
    &[
      ("straight", &["empty", "line", "cross"][..]),
      ("bends", &["empty", "corner"][..]),
    ],
  )
}

/// Edges after `turns` quarter turns, each turn carries an edge from one
/// direction to the next
fn rotated(edges: Edges, turns: usize) -> Edges {
  std::array::from_fn(|i| edges[(i + Direction::COUNT * 4 - turns) % Direction::COUNT])
}

fn pipes(tiles: &[Pipe], subsets: &[(&str, &[&str])]) -> Rules {
  let mut builder = RuleBuilder::default();
  for tile in tiles {
    builder.add_tile(TileDecl::new(tile.name, tile.symmetry).with_weight(tile.weight));
  }

  let oriented = tiles
    .iter()
    .flat_map(|tile| {
      (0..tile.symmetry.cardinality()).map(move |o| (tile.name, o, rotated(tile.edges, o)))
    })
    .collect::<Vec<_>>();

  for (left, lo, left_edges) in &oriented {
    for (right, ro, right_edges) in &oriented {
      if left_edges[Direction::Right.index()] == right_edges[Direction::Left.index()] {
        builder.add_neighbor((*left, *lo), (*right, *ro));
      }
    }
  }

  for (name, members) in subsets {
    builder.add_subset(*name, members.iter().copied());
  }

  builder.into()
}

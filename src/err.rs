use crate::{Direction, NodeId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
  #[error("Tile {tile:?} is declared more than once")]
  DuplicateTile { tile: String },
  #[error("Tile {tile:?} has weight {weight}, weights must be positive and finite")]
  InvalidWeight { tile: String, weight: f64 },
  #[error("Neighbor declaration references tile {tile:?} which was never declared")]
  UnknownTile { tile: String },
  #[error("Orientation {orientation} of tile {tile:?} is out of range, expected 0 to 7")]
  InvalidOrientation { tile: String, orientation: usize },
  #[error("Subset {subset:?} is not defined")]
  UnknownSubset { subset: String },
  #[error("Could not parse tile reference {reference:?}")]
  MalformedReference { reference: String },
  #[error("Unknown symmetry class {code:?}")]
  UnknownSymmetry { code: String },
  #[error("No tiles left to build a tile set from")]
  EmptyTileSet,
  #[error("Adjacency covers {adjacency} nodes but {nodes} nodes were supplied")]
  NodeCountMismatch { nodes: usize, adjacency: usize },
  #[error("Grid size {width}x{height} has no cells")]
  EmptyGrid { width: usize, height: usize },
  #[error("Preset at {position:?} is outside of the {width}x{height} grid")]
  PresetOutOfBounds {
    position: [usize; 2],
    width: usize,
    height: usize,
  },
  #[error("Node {node} does not exist, the tile set has {nodes} nodes")]
  UnknownNode { node: NodeId, nodes: usize },
  #[error("No pixel block supplied for {name:?}")]
  MissingBlock { name: String },
  #[error("Pixel block for {name:?} holds {len} pixels which is not {size}x{size}")]
  BlockSize { name: String, len: usize, size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Tile {name} has no neighbors in direction {direction:?}")]
pub struct AdjacencyWarning {
  pub node: NodeId,
  pub name: String,
  pub direction: Direction,
}

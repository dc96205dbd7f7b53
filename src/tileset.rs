use crate::{
  adjacency::{Adjacency, DenseAdjacency},
  cells::Entropy,
  err::{AdjacencyWarning, Error, Result},
  rules::{Rules, TileDecl, TileRef},
  symmetry::SymmetryClass,
  NodeId,
};
use bimap::BiHashMap;
use derive_more::derive::Deref;
use ordermap::OrderSet;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
  pub tile: usize,
  pub orientation: usize,
  pub weight: f64,
}

#[derive(Debug, Clone, Default, Deref, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Legend(BiHashMap<String, NodeId>);

impl Legend {
  pub fn first_node(&self, tile: &str) -> Option<NodeId> {
    self.0.get_by_left(tile).copied()
  }

  pub fn tile_at(&self, first_node: NodeId) -> Option<&str> {
    self.0.get_by_right(&first_node).map(String::as_str)
  }
}

#[derive(Debug, Clone)]
pub struct TileSet {
  tiles: Vec<TileDecl>,
  nodes: Vec<Node>,
  names: Vec<String>,
  legend: Legend,
  weight_log_weights: Vec<f64>,
  initial: Entropy,
  adjacency: Adjacency,
  warnings: Vec<AdjacencyWarning>,
}

impl TileSet {
  #[profiling::function]
  pub fn compile(rules: &Rules, subset: Option<&str>) -> Result<Self> {
    let filter = subset
      .map(|name| {
        rules
          .subset(name)
          .map(|tiles| tiles.iter().map(String::as_str).collect::<OrderSet<&str>>())
          .ok_or_else(|| Error::UnknownSubset {
            subset: name.to_string(),
          })
      })
      .transpose()?;
    let keep = |name: &str| filter.as_ref().is_none_or(|filter| filter.contains(name));

    let mut tiles = Vec::new();
    let mut nodes = Vec::new();
    let mut legend = BiHashMap::new();
    let mut actions: Vec<[NodeId; 8]> = Vec::new();

    for decl in rules.tiles().iter().filter(|decl| keep(&decl.name)) {
      if !(decl.weight.is_finite() && decl.weight > 0.0) {
        return Err(Error::InvalidWeight {
          tile: decl.name.clone(),
          weight: decl.weight,
        });
      }

      let first = nodes.len();
      if legend.insert_no_overwrite(decl.name.clone(), first).is_err() {
        return Err(Error::DuplicateTile {
          tile: decl.name.clone(),
        });
      }

      let symmetry = decl.symmetry.symmetry();
      for orientation in 0..symmetry.cardinality {
        actions.push(symmetry.action(orientation).map(|image| image + first));
        nodes.push(Node {
          tile: tiles.len(),
          orientation,
          weight: decl.weight,
        });
      }
      tiles.push(decl.clone());
    }

    if nodes.is_empty() {
      return Err(Error::EmptyTileSet);
    }

    let legend = Legend(legend);
    let resolve = |tile: &TileRef| -> Result<NodeId> {
      let first = legend
        .first_node(&tile.name)
        .ok_or_else(|| Error::UnknownTile {
          tile: tile.name.clone(),
        })?;
      actions[first]
        .get(tile.orientation)
        .copied()
        .ok_or_else(|| Error::InvalidOrientation {
          tile: tile.name.clone(),
          orientation: tile.orientation,
        })
    };

    let mut dense = DenseAdjacency::new(nodes.len());
    for neighbor in rules
      .neighbors()
      .iter()
      .filter(|neighbor| keep(&neighbor.left.name) && keep(&neighbor.right.name))
    {
      let left = resolve(&neighbor.left)?;
      let right = resolve(&neighbor.right)?;
      dense.declare(left, right, &actions);
    }
    dense.mirror();

    Ok(Self::assemble(tiles, nodes, legend, dense.compress()))
  }

  /// Builds a tile set from already oriented nodes, each its own tile, and an
  /// adjacency computed elsewhere
  pub fn from_nodes(
    nodes: impl IntoIterator<Item = (String, f64)>,
    adjacency: Adjacency,
  ) -> Result<Self> {
    let mut tiles = Vec::new();
    let mut legend = BiHashMap::new();

    for (name, weight) in nodes {
      if !(weight.is_finite() && weight > 0.0) {
        return Err(Error::InvalidWeight { tile: name, weight });
      }
      if legend.insert_no_overwrite(name.clone(), tiles.len()).is_err() {
        return Err(Error::DuplicateTile { tile: name });
      }
      tiles.push(TileDecl::new(name, SymmetryClass::X).with_weight(weight));
    }

    if tiles.is_empty() {
      return Err(Error::EmptyTileSet);
    }

    if tiles.len() != adjacency.nodes() {
      return Err(Error::NodeCountMismatch {
        nodes: tiles.len(),
        adjacency: adjacency.nodes(),
      });
    }

    let nodes = tiles
      .iter()
      .enumerate()
      .map(|(tile, decl)| Node {
        tile,
        orientation: 0,
        weight: decl.weight,
      })
      .collect();

    Ok(Self::assemble(tiles, nodes, Legend(legend), adjacency))
  }

  fn assemble(tiles: Vec<TileDecl>, nodes: Vec<Node>, legend: Legend, adjacency: Adjacency) -> Self {
    let names = nodes
      .iter()
      .map(|node: &Node| format!("{} {}", tiles[node.tile].name, node.orientation))
      .collect::<Vec<_>>();

    let weight_log_weights = nodes
      .iter()
      .map(|node| node.weight * node.weight.ln())
      .collect::<Vec<_>>();

    let initial = Entropy::new(
      nodes.len(),
      nodes.iter().map(|node| node.weight).sum(),
      weight_log_weights.iter().sum(),
    );

    let warnings = adjacency
      .unsupported()
      .map(|(direction, node)| {
        let warning = AdjacencyWarning {
          node,
          name: names[node].clone(),
          direction,
        };
        tracing::warn!("{warning}");
        warning
      })
      .collect();

    Self {
      tiles,
      nodes,
      names,
      legend,
      weight_log_weights,
      initial,
      adjacency,
      warnings,
    }
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn tiles(&self) -> &[TileDecl] {
    &self.tiles
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id]
  }

  pub fn name(&self, id: NodeId) -> &str {
    &self.names[id]
  }

  pub fn legend(&self) -> &Legend {
    &self.legend
  }

  pub fn weight(&self, id: NodeId) -> f64 {
    self.nodes[id].weight
  }

  pub fn weight_log_weight(&self, id: NodeId) -> f64 {
    self.weight_log_weights[id]
  }

  pub fn initial_entropy(&self) -> Entropy {
    self.initial
  }

  pub fn adjacency(&self) -> &Adjacency {
    &self.adjacency
  }

  pub fn warnings(&self) -> &[AdjacencyWarning] {
    &self.warnings
  }
}

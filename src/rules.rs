use crate::{
  err::{Error, Result},
  symmetry::SymmetryClass,
  tileset::TileSet,
};
use derive_more::derive::{Deref, DerefMut};
use derive_new::new;
use std::{collections::HashMap, fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileDecl {
  pub name: String,
  pub symmetry: SymmetryClass,
  pub weight: f64,
}

impl TileDecl {
  pub fn new(name: impl Into<String>, symmetry: SymmetryClass) -> Self {
    Self {
      name: name.into(),
      symmetry,
      weight: 1.0,
    }
  }

  pub fn with_weight(mut self, weight: f64) -> Self {
    self.weight = weight;
    self
  }

  pub fn parse(name: impl Into<String>, symmetry: Option<&str>, weight: Option<f64>) -> Result<Self> {
    let symmetry = symmetry
      .map(|code| {
        SymmetryClass::from_str(code).map_err(|_| Error::UnknownSymmetry {
          code: code.to_string(),
        })
      })
      .transpose()?
      .unwrap_or_default();

    Ok(Self::new(name, symmetry).with_weight(weight.unwrap_or(1.0)))
  }
}

/// `name` or `name orientation`, the orientation indexes the eight
/// rotation / reflection images of the tile's first orientation
#[derive(new, Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileRef {
  pub name: String,
  #[new(default)]
  pub orientation: usize,
}

impl TileRef {
  pub fn oriented(name: impl Into<String>, orientation: usize) -> Self {
    Self {
      name: name.into(),
      orientation,
    }
  }
}

impl FromStr for TileRef {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let malformed = || Error::MalformedReference {
      reference: s.to_string(),
    };

    let mut parts = s.split_whitespace();
    let name = parts.next().ok_or_else(malformed)?;
    let orientation = parts
      .next()
      .map(|o| o.parse::<usize>().map_err(|_| malformed()))
      .transpose()?
      .unwrap_or_default();

    if parts.next().is_some() {
      return Err(malformed());
    }

    Ok(Self::oriented(name, orientation))
  }
}

impl From<&str> for TileRef {
  fn from(name: &str) -> Self {
    Self::new(name.to_string())
  }
}

impl From<(&str, usize)> for TileRef {
  fn from((name, orientation): (&str, usize)) -> Self {
    Self::oriented(name, orientation)
  }
}

impl fmt::Display for TileRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.name, self.orientation)
  }
}

#[derive(new, Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborDecl {
  pub left: TileRef,
  pub right: TileRef,
}

impl NeighborDecl {
  pub fn parse(left: &str, right: &str) -> Result<Self> {
    Ok(Self::new(left.parse()?, right.parse()?))
  }
}

#[derive(Default, Debug, Clone, Deref, DerefMut)]
pub struct RuleBuilder {
  #[deref]
  #[deref_mut]
  rules: Rules,
}

impl RuleBuilder {
  pub fn add_tile(&mut self, tile: TileDecl) -> &mut Self {
    self.rules.tiles.push(tile);
    self
  }

  pub fn with_tile(mut self, tile: TileDecl) -> Self {
    self.add_tile(tile);
    self
  }

  pub fn add_neighbor(&mut self, left: impl Into<TileRef>, right: impl Into<TileRef>) -> &mut Self {
    self
      .rules
      .neighbors
      .push(NeighborDecl::new(left.into(), right.into()));
    self
  }

  pub fn with_neighbor(mut self, left: impl Into<TileRef>, right: impl Into<TileRef>) -> Self {
    self.add_neighbor(left, right);
    self
  }

  pub fn add_subset<S: Into<String>>(
    &mut self,
    name: impl Into<String>,
    tiles: impl IntoIterator<Item = S>,
  ) -> &mut Self {
    self
      .rules
      .subsets
      .insert(name.into(), tiles.into_iter().map(Into::into).collect());
    self
  }

  pub fn with_subset<S: Into<String>>(
    mut self,
    name: impl Into<String>,
    tiles: impl IntoIterator<Item = S>,
  ) -> Self {
    self.add_subset(name, tiles);
    self
  }
}

#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rules {
  tiles: Vec<TileDecl>,
  neighbors: Vec<NeighborDecl>,
  subsets: HashMap<String, Vec<String>>,
}

impl Rules {
  pub fn new(
    tiles: impl Into<Vec<TileDecl>>,
    neighbors: impl Into<Vec<NeighborDecl>>,
    subsets: impl Into<HashMap<String, Vec<String>>>,
  ) -> Self {
    Self {
      tiles: tiles.into(),
      neighbors: neighbors.into(),
      subsets: subsets.into(),
    }
  }

  pub fn tiles(&self) -> &[TileDecl] {
    &self.tiles
  }

  pub fn neighbors(&self) -> &[NeighborDecl] {
    &self.neighbors
  }

  pub fn subset(&self, name: &str) -> Option<&[String]> {
    self.subsets.get(name).map(Vec::as_slice)
  }

  pub fn compile(&self, subset: Option<&str>) -> Result<TileSet> {
    TileSet::compile(self, subset)
  }
}

impl From<RuleBuilder> for Rules {
  fn from(builder: RuleBuilder) -> Self {
    builder.rules
  }
}

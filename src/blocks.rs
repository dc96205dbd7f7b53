use crate::{
  err::{Error, Result},
  tileset::TileSet,
  util::Size,
  NodeId,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block<P> {
  size: usize,
  pixels: Vec<P>,
}

impl<P> Block<P> {
  pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> P) -> Self {
    let pixels = (0..size * size).map(|i| f(i % size, i / size)).collect();
    Self { size, pixels }
  }

  pub fn size(&self) -> usize {
    self.size
  }

  pub fn pixels(&self) -> &[P] {
    &self.pixels
  }

  pub fn get(&self, x: usize, y: usize) -> &P {
    &self.pixels[x + y * self.size]
  }
}

impl<P: Clone> Block<P> {
  pub fn rotate(&self) -> Self {
    let n = self.size;
    Self::from_fn(n, |x, y| self.get(n - 1 - y, x).clone())
  }

  pub fn reflect(&self) -> Self {
    let n = self.size;
    Self::from_fn(n, |x, y| self.get(n - 1 - x, y).clone())
  }

  /// This block followed by its images for orientations `1..cardinality`.
  /// Orientations 1 to 3 each rotate the one before, 4 to 7 reflect the
  /// orientation four below.
  pub fn orientations(&self, cardinality: usize) -> Vec<Self> {
    let mut list: Vec<Self> = Vec::with_capacity(cardinality);
    list.push(self.clone());
    for d in 1..cardinality {
      let next = if d <= 3 {
        list[d - 1].rotate()
      } else {
        list[d - 4].reflect()
      };
      list.push(next);
    }
    list
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocks<P> {
  size: usize,
  blocks: Vec<Block<P>>,
}

impl<P: Clone> Blocks<P> {
  pub fn derive(tileset: &TileSet, size: usize, sources: &HashMap<String, Vec<P>>) -> Result<Self> {
    let mut blocks = Vec::with_capacity(tileset.len());
    for tile in tileset.tiles() {
      let base = Self::load(&tile.name, size, sources)?;
      blocks.extend(base.orientations(tile.symmetry.cardinality()));
    }
    Ok(Self { size, blocks })
  }

  pub fn unique(tileset: &TileSet, size: usize, sources: &HashMap<String, Vec<P>>) -> Result<Self> {
    let blocks = (0..tileset.len())
      .map(|node| Self::load(tileset.name(node), size, sources))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { size, blocks })
  }

  fn load(name: &str, size: usize, sources: &HashMap<String, Vec<P>>) -> Result<Block<P>> {
    let pixels = sources.get(name).ok_or_else(|| Error::MissingBlock {
      name: name.to_string(),
    })?;

    if pixels.len() != size * size {
      return Err(Error::BlockSize {
        name: name.to_string(),
        len: pixels.len(),
        size,
      });
    }

    Ok(Block {
      size,
      pixels: pixels.clone(),
    })
  }

  pub fn block_size(&self) -> usize {
    self.size
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  pub fn block(&self, node: NodeId) -> &Block<P> {
    &self.blocks[node]
  }

  /// Lays out the block of every observed cell into one image of
  /// `width * block_size` by `height * block_size` pixels, row by row
  #[profiling::function]
  pub fn compose(&self, size: Size, observed: &[NodeId]) -> Vec<P> {
    let n = self.size;
    let width = size.width() * n;

    (0..width * size.height() * n)
      .map(|i| {
        let (px, py) = (i % width, i / width);
        let node = observed[px / n + (py / n) * size.width()];
        self.blocks[node].get(px % n, py % n).clone()
      })
      .collect()
  }
}

use crate::{CellIndex, Direction};
use derive_more::derive::{Deref, DerefMut};
use nalgebra::SVector;
use std::ops::{Add, Rem};

#[derive(Debug, Clone, Copy, Deref, DerefMut, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size(SVector<usize, 2>);

impl Default for Size {
  fn default() -> Self {
    Self(SVector::zeros())
  }
}

impl Size {
  pub fn new(width: usize, height: usize) -> Self {
    Self(SVector::from([width, height]))
  }

  pub fn width(&self) -> usize {
    self.x
  }

  pub fn height(&self) -> usize {
    self.y
  }

  pub fn len(&self) -> usize {
    self.0.iter().product()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn contains(&self, pos: &IPos) -> bool {
    pos
      .iter()
      .enumerate()
      .all(|(i, d)| *d >= 0 && *d < self[i] as isize)
  }

  /// The cell one step from `index` in `dir`, wrapping around the edges when
  /// `periodic` and `None` when the step leaves a bounded grid
  pub fn neighbor(&self, index: CellIndex, dir: Direction, periodic: bool) -> Option<CellIndex> {
    let pos = IPos::from_index(index, *self) + dir;
    if self.contains(&pos) {
      Some(pos.index(*self))
    } else {
      periodic.then(|| pos.index_in(*self))
    }
  }
}

impl From<[usize; 2]> for Size {
  fn from([width, height]: [usize; 2]) -> Self {
    Self::new(width, height)
  }
}

impl From<(usize, usize)> for Size {
  fn from((width, height): (usize, usize)) -> Self {
    Self::new(width, height)
  }
}

#[derive(Debug, Clone, Copy, Deref, DerefMut, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IPos(pub SVector<isize, 2>);

impl Default for IPos {
  fn default() -> Self {
    Self(SVector::zeros())
  }
}

impl IPos {
  pub fn new(x: isize, y: isize) -> Self {
    Self(SVector::from([x, y]))
  }

  pub fn from_index(index: CellIndex, size: Size) -> Self {
    let [x, y] = from_index(index, size);
    Self::new(x as isize, y as isize)
  }

  pub fn index(&self, size: Size) -> CellIndex {
    to_index(self.x as usize, self.y as usize, size)
  }

  pub fn wrap(&self, size: Size) -> Self {
    Self::new(
      wrap(self.x, size.width() as isize),
      wrap(self.y, size.height() as isize),
    )
  }

  pub fn index_in(&self, size: Size) -> CellIndex {
    self.wrap(size).index(size)
  }
}

impl From<[isize; 2]> for IPos {
  fn from([x, y]: [isize; 2]) -> Self {
    Self::new(x, y)
  }
}

impl Add<Direction> for IPos {
  type Output = Self;

  fn add(self, rhs: Direction) -> Self::Output {
    Self(self.0 + rhs.offset())
  }
}

#[derive(Debug, Clone, Copy, Deref, DerefMut, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UPos(pub SVector<usize, 2>);

impl Default for UPos {
  fn default() -> Self {
    Self(SVector::zeros())
  }
}

impl UPos {
  pub fn new(x: usize, y: usize) -> Self {
    Self(SVector::from([x, y]))
  }

  pub fn from_index(index: CellIndex, size: Size) -> Self {
    Self(SVector::from(from_index(index, size)))
  }

  pub fn index(&self, size: Size) -> CellIndex {
    to_index(self.x, self.y, size)
  }
}

impl From<[usize; 2]> for UPos {
  fn from([x, y]: [usize; 2]) -> Self {
    Self::new(x, y)
  }
}

impl From<(usize, usize)> for UPos {
  fn from((x, y): (usize, usize)) -> Self {
    Self::new(x, y)
  }
}

pub fn to_index(x: usize, y: usize, size: Size) -> CellIndex {
  x + y * size.width()
}

pub fn from_index(index: CellIndex, size: Size) -> [usize; 2] {
  [index % size.width(), index / size.width()]
}

pub fn wrap<T>(i: T, s: T) -> T
where
  T: Clone + Copy + Add<T, Output = T> + Rem<T, Output = T>,
{
  ((i % s) + s) % s
}

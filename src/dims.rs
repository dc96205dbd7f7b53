use nalgebra::SVector;
use strum_macros::{EnumCount, EnumIter, FromRepr, VariantArray};

#[derive(
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  EnumCount,
  EnumIter,
  VariantArray,
  FromRepr,
  Clone,
  Copy,
  Debug,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(usize)]
pub enum Direction {
  Left,
  Up,
  Right,
  Down,
}

const OPPOSITES: [Direction; 4] = [
  Direction::Right,
  Direction::Down,
  Direction::Left,
  Direction::Up,
];

// up is toward the next row
const OFFSETS: [[isize; 2]; 4] = [[-1, 0], [0, 1], [1, 0], [0, -1]];

impl Direction {
  pub fn index(self) -> usize {
    self as usize
  }

  pub fn opposite(self) -> Self {
    OPPOSITES[self.index()]
  }

  pub fn offset(self) -> SVector<isize, 2> {
    SVector::from(OFFSETS[self.index()])
  }
}

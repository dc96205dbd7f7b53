//! Symmetry classes describe how many distinct orientations a tile has and how
//! rotating or mirroring one orientation maps onto another.

use strum_macros::{Display, EnumIter, EnumString};

#[derive(
  Default, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display, Clone, Copy, Debug,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymmetryClass {
  #[strum(serialize = "F")]
  Asymmetric,
  #[strum(serialize = "L")]
  L,
  #[strum(serialize = "T")]
  T,
  #[strum(serialize = "I")]
  I,
  #[strum(serialize = "\\")]
  Diagonal,
  #[default]
  #[strum(serialize = "X")]
  X,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symmetry {
  pub cardinality: usize,
  pub rotate: &'static [usize],
  pub reflect: &'static [usize],
}

const fn symmetry(rotate: &'static [usize], reflect: &'static [usize]) -> Symmetry {
  Symmetry {
    cardinality: rotate.len(),
    rotate,
    reflect,
  }
}

const ASYMMETRIC: Symmetry = symmetry(&[1, 2, 3, 0, 7, 4, 5, 6], &[4, 5, 6, 7, 0, 1, 2, 3]);
const L: Symmetry = symmetry(&[1, 2, 3, 0], &[1, 0, 3, 2]);
const T: Symmetry = symmetry(&[1, 2, 3, 0], &[0, 3, 2, 1]);
const I: Symmetry = symmetry(&[1, 0], &[0, 1]);
const DIAGONAL: Symmetry = symmetry(&[1, 0], &[1, 0]);
const X: Symmetry = symmetry(&[0], &[0]);

impl SymmetryClass {
  pub fn symmetry(self) -> Symmetry {
    match self {
      Self::Asymmetric => ASYMMETRIC,
      Self::L => L,
      Self::T => T,
      Self::I => I,
      Self::Diagonal => DIAGONAL,
      Self::X => X,
    }
  }

  pub fn cardinality(self) -> usize {
    self.symmetry().cardinality
  }
}

impl Symmetry {
  /// Images of orientation `t` under the dihedral group, in the order
  /// `t, a(t), a²(t), a³(t), b(t), b(a(t)), b(a²(t)), b(a³(t))`
  pub fn action(&self, t: usize) -> [usize; 8] {
    let a = |i: usize| self.rotate[i];
    let b = |i: usize| self.reflect[i];
    [
      t,
      a(t),
      a(a(t)),
      a(a(a(t))),
      b(t),
      b(a(t)),
      b(a(a(t))),
      b(a(a(a(t)))),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::SymmetryClass;
  use std::str::FromStr;
  use strum::IntoEnumIterator;

  fn apply(perm: &[usize], times: usize, t: usize) -> usize {
    (0..times).fold(t, |t, _| perm[t])
  }

  #[test]
  fn rotations_and_reflections_are_group_actions() {
    for class in SymmetryClass::iter() {
      let sym = class.symmetry();
      assert_eq!(sym.rotate.len(), sym.cardinality, "{class:?}");
      assert_eq!(sym.reflect.len(), sym.cardinality, "{class:?}");
      for t in 0..sym.cardinality {
        assert_eq!(apply(sym.rotate, 4, t), t, "rotate^4 for {class:?}");
        assert_eq!(apply(sym.reflect, 2, t), t, "reflect^2 for {class:?}");
      }
    }
  }

  #[test]
  fn cardinalities() {
    let cards = SymmetryClass::iter()
      .map(|class| (class, class.cardinality()))
      .collect::<Vec<_>>();

    assert_eq!(
      cards,
      vec![
        (SymmetryClass::Asymmetric, 8),
        (SymmetryClass::L, 4),
        (SymmetryClass::T, 4),
        (SymmetryClass::I, 2),
        (SymmetryClass::Diagonal, 2),
        (SymmetryClass::X, 1),
      ]
    );
  }

  #[test]
  fn parses_single_character_codes() {
    assert_eq!(SymmetryClass::from_str("L"), Ok(SymmetryClass::L));
    assert_eq!(SymmetryClass::from_str("\\"), Ok(SymmetryClass::Diagonal));
    assert_eq!(SymmetryClass::from_str("F"), Ok(SymmetryClass::Asymmetric));
    assert!(SymmetryClass::from_str("Q").is_err());
    assert_eq!(SymmetryClass::default(), SymmetryClass::X);
    assert_eq!(SymmetryClass::I.to_string(), "I");
  }

  #[test]
  fn action_rows() {
    let l = SymmetryClass::L.symmetry();
    assert_eq!(l.action(0), [0, 1, 2, 3, 1, 0, 3, 2]);

    let t = SymmetryClass::T.symmetry();
    assert_eq!(t.action(1), [1, 2, 3, 0, 3, 2, 1, 0]);

    let f = SymmetryClass::Asymmetric.symmetry();
    assert_eq!(f.action(5), [5, 4, 7, 6, 1, 0, 3, 2]);
  }
}

use crate::{
  util::{self, Size},
  CellIndex, Exclusion,
};
use derive_new::new;

#[derive(Default, Debug, Clone, Copy)]
pub struct NoExclusion;

impl Exclusion for NoExclusion {
  fn excluded(&self, _cell: CellIndex) -> bool {
    false
  }
}

/// Leaves out the last `margin` columns and rows of a grid
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margin {
  size: Size,
  margin: usize,
}

impl Margin {
  pub fn for_pattern(size: Size, pattern: usize) -> Self {
    Self::new(size, pattern.saturating_sub(1))
  }
}

impl Exclusion for Margin {
  fn excluded(&self, cell: CellIndex) -> bool {
    let [x, y] = util::from_index(cell, self.size);
    x + self.margin >= self.size.width() || y + self.margin >= self.size.height()
  }
}

#[cfg(test)]
mod tests {
  use super::{Margin, NoExclusion};
  use crate::{util::Size, Exclusion};

  #[test]
  fn margin_covers_trailing_rows_and_columns() {
    let size = Size::new(4, 3);
    let margin = Margin::new(size, 1);

    let excluded = (0..size.len())
      .filter(|cell| margin.excluded(*cell))
      .collect::<Vec<_>>();
    assert_eq!(excluded, [3, 7, 8, 9, 10, 11]);

    assert!((0..size.len()).all(|cell| !Margin::new(size, 0).excluded(cell)));
    assert_eq!(Margin::for_pattern(size, 2), margin);
    assert!(!NoExclusion.excluded(0));
  }
}

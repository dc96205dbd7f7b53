use crate::{tileset::TileSet, util::Size, NodeId};
use itertools::Itertools;

/// Node names of an observed grid, one line per row starting at row 0. Every
/// name is followed by `", "` and every row ends with a newline.
pub fn text(tileset: &TileSet, size: Size, observed: &[NodeId]) -> String {
  observed
    .chunks(size.width())
    .take(size.height())
    .map(|row| {
      row
        .iter()
        .map(|node| format!("{}, ", tileset.name(*node)))
        .collect::<String>()
        + "\n"
    })
    .collect()
}

pub fn glyphs<F>(size: Size, observed: &[NodeId], glyph: F) -> String
where
  F: Fn(NodeId) -> Option<char>,
{
  observed
    .chunks(size.width())
    .take(size.height())
    .map(|row| {
      row
        .iter()
        .map(|node| glyph(*node).unwrap_or('?'))
        .collect::<String>()
    })
    .join("\n")
}

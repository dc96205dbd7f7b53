use std::error::Error;
use tiled_wfc::{prebuilt::tilesets, prelude::*, render};

const COLS: usize = 32;
const ROWS: usize = 16;

const STEP_BY_STEP: bool = false;

/// Box drawing glyph for a pipe node, keyed by tile name and orientation
fn glyph(tiles: &TileSet, node: NodeId) -> Option<char> {
  let node = tiles.node(node);
  let glyphs: &[char] = match tiles.tiles()[node.tile].name.as_str() {
    "empty" => &[' '],
    "line" => &['║', '═'],
    // rows are printed bottom up below, so "up" is toward the top of the screen
    "corner" => &['╝', '╚', '╔', '╗'],
    "t" => &['╩', '╠', '╦', '╣'],
    "cross" => &['╬'],
    _ => &[],
  };
  glyphs.get(node.orientation).copied()
}

fn main() -> Result<(), Box<dyn Error>> {
  #[cfg(feature = "profiling")]
  let _guards = tiled_wfc::perf::enable_profiling()?;

  let args = std::env::args().collect::<Vec<_>>();
  let seed = args.get(1).map(|arg| arg.parse::<u64>()).transpose()?;

  let tiles = knots()?;
  let size = Size::new(COLS, ROWS);
  let mut solver = SolverBuilder::new(tiles.clone(), size)
    .with_periodic(true)
    .build()?;

  let mut generator = Generator::new(seed);
  println!("Seed: {}", generator.seed());

  if STEP_BY_STEP {
    step_by_step(&mut solver, generator.seed());
  }

  match generator.generate(&mut solver) {
    Generation::Complete { seed, observed } => {
      println!("Collapsed with run seed {seed}\n");
      print_grid(&tiles, size, &observed);
    }
    Generation::Incomplete { seed } => println!("Run seed {seed} ran out of iterations"),
    Generation::Failed { attempts } => println!("No luck after {attempts} attempts"),
  }

  Ok(())
}

fn knots() -> Result<std::sync::Arc<TileSet>, Box<dyn Error>> {
  Ok(std::sync::Arc::new(tilesets::knots().compile(None)?))
}

fn step_by_step(solver: &mut Solver, seed: u64) {
  let mut observations = 0;
  while solver.run(seed, observations + 1) == Outcome::LimitReached {
    observations += 1;
  }
  println!("{observations} observations needed for seed {seed}");
}

fn print_grid(tiles: &TileSet, size: Size, observed: &[NodeId]) {
  let text = render::glyphs(size, observed, |node| glyph(tiles, node));

  let mut rows = text.lines().collect::<Vec<_>>();
  rows.reverse();

  println!("{}", rows.join("\n"));
}

//! Wraparound traversal over a nested listing such as source → book → title
//! or sura → ruku.
//!
//! A position is one index per level. Stepping past the last child of a
//! container carries into the next container and lands on its first child.
//! Stepping back borrows from the previous container and lands on its last
//! child. Both directions wrap around at the top level, and containers with
//! no children are skipped.

use rand::Rng;

/// Anything that can report how many children sit under a path prefix. The
/// empty prefix asks for the number of top-level entries.
pub trait Hierarchy {
    type Error;

    fn count(&mut self, path: &[usize]) -> Result<usize, Self::Error>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Direction {
    Forward,
    Backward,
}

/// The leaf that follows `pos`, wrapping to the very first leaf after the
/// last one. `None` when the hierarchy holds no leaf at all.
pub fn next<H: Hierarchy>(h: &mut H, pos: &[usize]) -> Result<Option<Vec<usize>>, H::Error> {
    step(h, pos, Direction::Forward)
}

/// The leaf before `pos`, wrapping to the very last leaf before the first.
pub fn prev<H: Hierarchy>(h: &mut H, pos: &[usize]) -> Result<Option<Vec<usize>>, H::Error> {
    step(h, pos, Direction::Backward)
}

pub fn first<H: Hierarchy>(h: &mut H, depth: usize) -> Result<Option<Vec<usize>>, H::Error> {
    descend(h, Vec::with_capacity(depth), depth, Direction::Forward)
}

pub fn last<H: Hierarchy>(h: &mut H, depth: usize) -> Result<Option<Vec<usize>>, H::Error> {
    descend(h, Vec::with_capacity(depth), depth, Direction::Backward)
}

/// Pick an index uniformly at each level in turn, top level first. When the
/// chosen container turns out to be empty the first leaf is returned.
pub fn random<H: Hierarchy, R: Rng>(
    h: &mut H,
    depth: usize,
    rng: &mut R,
) -> Result<Option<Vec<usize>>, H::Error> {
    let mut path = Vec::with_capacity(depth);
    while path.len() < depth {
        let count = h.count(&path)?;
        if count == 0 {
            return first(h, depth);
        }
        path.push(rng.gen_range(0..count));
    }
    Ok(Some(path))
}

fn step<H: Hierarchy>(
    h: &mut H,
    pos: &[usize],
    dir: Direction,
) -> Result<Option<Vec<usize>>, H::Error> {
    let depth = pos.len();
    if depth == 0 {
        return Ok(None);
    }

    for level in (0..depth).rev() {
        let count = h.count(&pos[..level])?;
        let current = pos[level];
        let siblings: Box<dyn Iterator<Item = usize>> = match dir {
            Direction::Forward => Box::new(current.saturating_add(1)..count),
            Direction::Backward => Box::new((0..current.min(count)).rev()),
        };
        for idx in siblings {
            let mut prefix = pos[..level].to_vec();
            prefix.push(idx);
            if let Some(leaf) = descend(h, prefix, depth, dir)? {
                return Ok(Some(leaf));
            }
        }
    }

    descend(h, Vec::with_capacity(depth), depth, dir)
}

/// First (forward) or last (backward) leaf beneath `prefix`.
fn descend<H: Hierarchy>(
    h: &mut H,
    prefix: Vec<usize>,
    depth: usize,
    dir: Direction,
) -> Result<Option<Vec<usize>>, H::Error> {
    if prefix.len() >= depth {
        return Ok(Some(prefix));
    }
    let count = h.count(&prefix)?;
    let children: Box<dyn Iterator<Item = usize>> = match dir {
        Direction::Forward => Box::new(0..count),
        Direction::Backward => Box::new((0..count).rev()),
    };
    for idx in children {
        let mut path = prefix.clone();
        path.push(idx);
        if let Some(leaf) = descend(h, path, depth, dir)? {
            return Ok(Some(leaf));
        }
    }
    Ok(None)
}

use rand::Rng;

use crate::board::Cell;

/// Draw-without-replacement bag over the three base ranks.
///
/// Flag `i` records whether rank `i + 1` has been dealt in the current cycle.
/// Once all three are dealt the cycle resets, so the flags are never all set
/// at rest.
///
/// The bag is `Copy`; the solver threads it by value through its recursion
/// instead of marking and unmarking a shared instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileBag([bool; 3]);

impl TileBag {
    /// A bag at the start of a cycle.
    pub const FULL: TileBag = TileBag([false; 3]);

    /// Mark rank index `idx` as dealt, resetting the cycle once all are dealt.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.0[idx] = true;
        if self.0.iter().all(|&used| used) {
            self.0 = [false; 3];
        }
    }

    /// Inverse of [`TileBag::set`].
    ///
    /// If no rank is marked, the preceding `set` must have completed a cycle,
    /// so the full cycle is restored before clearing `idx`.
    #[inline]
    pub fn unset(&mut self, idx: usize) {
        if self.0.iter().all(|&used| !used) {
            self.0 = [true; 3];
        }
        self.0[idx] = false;
    }

    /// True if rank index `idx` has already been dealt this cycle.
    #[inline]
    pub fn get(&self, idx: usize) -> bool { self.0[idx] }

    #[inline]
    pub fn reset(&mut self) { self.0 = [false; 3]; }

    /// Copy of this bag with rank `tile` marked as dealt.
    #[inline]
    pub fn with(mut self, tile: Cell) -> Self {
        self.set(tile_index(tile));
        self
    }

    /// Ranks (1..=3) that may still be dealt this cycle, in ascending order.
    pub fn available(self) -> impl Iterator<Item = Cell> {
        (1..=3).filter(move |&tile| !self.get(tile_index(tile)))
    }

    /// Pick a uniformly random rank still in the bag without marking it.
    pub fn peek<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        let mut choices = [0; 3];
        let mut len = 0;
        for tile in self.available() {
            choices[len] = tile;
            len += 1;
        }
        debug_assert!(len > 0, "tile bag has no ranks left");
        choices[rng.gen_range(0..len)]
    }

    /// Deal a uniformly random rank still in the bag and mark it.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Cell {
        let tile = self.peek(rng);
        self.set(tile_index(tile));
        tile
    }
}

/// Flag index of a base rank.
#[inline]
pub fn tile_index(tile: Cell) -> usize {
    debug_assert!((1..=3).contains(&tile), "not a base tile: {tile}");
    tile as usize - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_cycle_resets() {
        let mut bag = TileBag::FULL;
        bag.set(1);
        bag.set(0);
        assert!(bag.get(0) && bag.get(1) && !bag.get(2));
        bag.set(2);
        assert_eq!(bag, TileBag::FULL);
    }

    #[test]
    fn test_unset_restores() {
        for idx in 0..3 {
            let mut bag = TileBag::FULL;
            bag.set(idx);
            bag.unset(idx);
            assert_eq!(bag, TileBag::FULL);
        }
        let mut bag = TileBag::FULL;
        bag.set(0);
        bag.set(2);
        let before = bag;
        bag.set(1);
        assert_eq!(bag, TileBag::FULL);
        bag.unset(1);
        assert_eq!(bag, before);
    }

    #[test]
    fn test_available_and_with() {
        let bag = TileBag::FULL.with(2);
        assert_eq!(bag.available().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(bag.with(1).available().collect::<Vec<_>>(), vec![3]);
        assert_eq!(bag.with(1).with(3).available().count(), 3);
    }

    #[test]
    fn test_draw_deals_each_rank_once_per_cycle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bag = TileBag::FULL;
        for _ in 0..50 {
            let mut dealt: Vec<Cell> = (0..3).map(|_| bag.draw(&mut rng)).collect();
            dealt.sort_unstable();
            assert_eq!(dealt, vec![1, 2, 3]);
            assert_eq!(bag, TileBag::FULL);
        }
    }

    #[test]
    fn test_peek_does_not_mark() {
        let mut rng = StdRng::seed_from_u64(3);
        let bag = TileBag::FULL.with(1).with(3);
        for _ in 0..10 {
            assert_eq!(bag.peek(&mut rng), 2);
        }
        assert!(!bag.get(1));
    }
}

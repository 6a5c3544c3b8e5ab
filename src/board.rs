use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A direction to slide tiles. Discriminants match the wire opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Move {
    /// All moves in opcode order. Search and lookups scan in this order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Decode an opcode; only the low two bits are significant.
    #[inline]
    pub fn from_opcode(op: u8) -> Move { Move::ALL[(op & 0b11) as usize] }
}

/// Tile rank. 0 is empty, 1 and 2 are the base tiles, 3 is the tile "3",
/// and every rank above doubles the face value.
pub type Cell = u8;
/// Reward earned by a single slide.
pub type Reward = u32;

pub const ROWS: usize = 2;
pub const COLUMNS: usize = 3;
pub const CELLS: usize = ROWS * COLUMNS;
/// Exclusive upper bound on a representable rank.
pub const MAX_RANK: Cell = 9;
/// Radix of the packed board encoding.
pub const RADIX: u32 = 10;

type Grid = [[Cell; COLUMNS]; ROWS];

/// A 2x3 board of tile ranks plus one side-channel cell (`info`) that carries
/// the pending hint tile. `info` never takes part in sliding, equality or
/// ordering.
///
/// Cells are addressed row-major:
/// ```text
///  (0) (1) (2)
///  (3) (4) (5)
/// ```
#[derive(Clone, Copy, Default)]
pub struct Board {
    tiles: Grid,
    info: Cell,
}

impl Board {
    /// A constant empty board with no hint attached.
    pub const EMPTY: Board = Board { tiles: [[0; COLUMNS]; ROWS], info: 0 };

    /// Build a board from six ranks in row-major order.
    pub fn from_cells(cells: [Cell; CELLS]) -> Self {
        let mut board = Board::EMPTY;
        for (idx, &rank) in cells.iter().enumerate() {
            board.tiles[idx / COLUMNS][idx % COLUMNS] = rank;
        }
        board
    }

    /// The six ranks in row-major order.
    #[inline]
    pub fn cells(&self) -> [Cell; CELLS] {
        let mut out = [0; CELLS];
        for (idx, slot) in out.iter_mut().enumerate() {
            *slot = self.cell(idx);
        }
        out
    }

    #[inline]
    pub fn cell(&self, pos: usize) -> Cell { self.tiles[pos / COLUMNS][pos % COLUMNS] }

    #[inline]
    pub fn info(&self) -> Cell { self.info }

    /// Replace the side-channel value, returning the previous one.
    #[inline]
    pub fn set_info(&mut self, value: Cell) -> Cell { std::mem::replace(&mut self.info, value) }

    /// Write a base tile (rank 1, 2 or 3) into `pos`.
    ///
    /// Returns false and leaves the board untouched when `pos` is off the
    /// board or `tile` is not a base rank.
    ///
    /// ```
    /// use threes_2x3::board::Board;
    /// let mut b = Board::EMPTY;
    /// assert!(b.place(0, 1));
    /// assert!(!b.place(6, 1));
    /// assert!(!b.place(1, 4));
    /// ```
    pub fn place(&mut self, pos: usize, tile: Cell) -> bool {
        if pos >= CELLS || !(1..=3).contains(&tile) {
            return false;
        }
        self.tiles[pos / COLUMNS][pos % COLUMNS] = tile;
        true
    }

    /// Slide in `dir`, returning the reward, or `None` if nothing moved.
    ///
    /// Every tile moves at most one cell. A 1 and a 2 merge into a 3; two equal
    /// tiles of rank 3 or above merge into the next rank. Each merge earns
    /// `2^(new rank)`.
    ///
    /// ```
    /// use threes_2x3::board::{Board, Move};
    /// let mut b = Board::from_cells([1, 2, 0, 0, 0, 0]);
    /// assert_eq!(b.slide(Move::Left), Some(8));
    /// assert_eq!(b.cells(), [3, 0, 0, 0, 0, 0]);
    /// assert_eq!(b.slide(Move::Left), None);
    /// ```
    pub fn slide(&mut self, dir: Move) -> Option<Reward> {
        let prev = *self;
        let reward = match dir {
            Move::Up => self.slide_up(),
            Move::Right => {
                self.reflect_horizontal();
                let r = self.slide_left();
                self.reflect_horizontal();
                r
            }
            Move::Down => {
                self.reflect_vertical();
                let r = self.slide_up();
                self.reflect_vertical();
                r
            }
            Move::Left => self.slide_left(),
        };
        if *self != prev { Some(reward) } else { None }
    }

    /// Non-mutating form of [`Board::slide`].
    #[inline]
    pub fn shift(self, dir: Move) -> Option<(Board, Reward)> {
        let mut next = self;
        next.slide(dir).map(|reward| (next, reward))
    }

    /// True if no slide in any direction changes the board.
    pub fn is_terminal(&self) -> bool { Move::ALL.iter().all(|&dir| self.shift(dir).is_none()) }

    /// The edge cells vacated by a slide in `dir`, where the next tile may land.
    #[inline]
    pub fn placement_cells(dir: Move) -> &'static [usize] {
        match dir {
            Move::Up => &[3, 4, 5],
            Move::Right => &[0, 3],
            Move::Down => &[0, 1, 2],
            Move::Left => &[2, 5],
        }
    }

    #[inline]
    pub fn count_empty(&self) -> usize { self.tiles.iter().flatten().filter(|&&t| t == 0).count() }

    /// True if every cell holds a representable rank.
    #[inline]
    pub fn is_valid(&self) -> bool { self.tiles.iter().flatten().all(|&t| t < MAX_RANK) }

    /// Mixed-radix packing of the six cells, most significant cell first.
    ///
    /// Only injective while every cell is below [`RADIX`].
    #[inline]
    pub fn encode(&self) -> u32 {
        self.tiles.iter().flatten().fold(0, |acc, &t| acc * RADIX + t as u32)
    }

    pub fn reflect_horizontal(&mut self) {
        for row in self.tiles.iter_mut() {
            row.swap(0, COLUMNS - 1);
        }
    }

    pub fn reflect_vertical(&mut self) { self.tiles.swap(0, 1); }

    fn slide_left(&mut self) -> Reward {
        let mut reward = 0;
        for row in self.tiles.iter_mut() {
            let mut combine = true;
            for c in 0..COLUMNS - 1 {
                let (base, next) = (row[c], row[c + 1]);
                if base == 0 {
                    if next != 0 {
                        row[c] = next;
                        row[c + 1] = 0;
                    }
                    combine = false;
                } else if combine && next != 0 {
                    if let Some(merged) = merge(base, next) {
                        row[c] = merged;
                        row[c + 1] = 0;
                        reward += 1 << merged;
                        combine = false;
                    }
                }
            }
        }
        reward
    }

    fn slide_up(&mut self) -> Reward {
        let mut reward = 0;
        let [top, bottom] = &mut self.tiles;
        for (upper, lower) in top.iter_mut().zip(bottom.iter_mut()) {
            if *upper == 0 {
                *upper = *lower;
                *lower = 0;
            } else if *lower != 0 {
                if let Some(merged) = merge(*upper, *lower) {
                    *upper = merged;
                    *lower = 0;
                    reward += 1 << merged;
                }
            }
        }
        reward
    }
}

/// Rank produced by merging two non-empty tiles, if they merge.
#[inline]
fn merge(a: Cell, b: Cell) -> Option<Cell> {
    if a + b == 3 {
        Some(3)
    } else if a >= 3 && a == b {
        Some(a + 1)
    } else {
        None
    }
}

/// Face value of a rank: 0, 1, 2, 3, 6, 12, 24, ...
#[inline]
pub fn rank_to_face(rank: Cell) -> u32 {
    if rank <= 3 { rank as u32 } else { 3 << (rank - 3) }
}

/// Rank of a face value, or `None` if no tile shows that face.
///
/// ```
/// use threes_2x3::board::face_to_rank;
/// assert_eq!(face_to_rank(2), Some(2));
/// assert_eq!(face_to_rank(24), Some(6));
/// assert_eq!(face_to_rank(9), None);
/// ```
pub fn face_to_rank(face: u32) -> Option<Cell> {
    if face <= 3 {
        return Some(face as Cell);
    }
    if face % 3 != 0 || !(face / 3).is_power_of_two() {
        return None;
    }
    Cell::try_from((face / 3).trailing_zeros() + 3).ok()
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool { self.tiles == other.tiles }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) { self.tiles.hash(state) }
}

impl PartialOrd for Board {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Board {
    fn cmp(&self, other: &Self) -> Ordering { self.tiles.cmp(&other.tiles) }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?}, info={})", self.tiles, self.info)
    }
}

/// Space-separated face values, the textual wire form.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, rank) in self.cells().iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", rank_to_face(*rank))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slid(cells: [Cell; CELLS], dir: Move) -> Option<([Cell; CELLS], Reward)> {
        Board::from_cells(cells).shift(dir).map(|(b, r)| (b.cells(), r))
    }

    #[test]
    fn test_slide_left() {
        assert_eq!(slid([1, 0, 0, 0, 0, 0], Move::Left), None);
        assert_eq!(slid([1, 2, 0, 0, 0, 0], Move::Left), Some(([3, 0, 0, 0, 0, 0], 8)));
        assert_eq!(slid([0, 0, 1, 0, 0, 0], Move::Left), Some(([0, 1, 0, 0, 0, 0], 0)));
        assert_eq!(slid([1, 2, 3, 0, 0, 0], Move::Left), Some(([3, 3, 0, 0, 0, 0], 8)));
        assert_eq!(slid([3, 3, 3, 0, 0, 0], Move::Left), Some(([4, 3, 0, 0, 0, 0], 16)));
        assert_eq!(slid([1, 1, 2, 0, 0, 0], Move::Left), Some(([1, 3, 0, 0, 0, 0], 8)));
        assert_eq!(slid([1, 1, 1, 2, 2, 2], Move::Left), None);
        assert_eq!(slid([3, 0, 0, 0, 0, 0], Move::Left), None);
    }

    #[test]
    fn test_slide_right() {
        assert_eq!(slid([0, 0, 1, 0, 0, 0], Move::Right), None);
        assert_eq!(slid([1, 0, 0, 0, 0, 0], Move::Right), Some(([0, 1, 0, 0, 0, 0], 0)));
        assert_eq!(slid([0, 2, 1, 0, 4, 4], Move::Right), Some(([0, 0, 3, 0, 0, 5], 8 + 32)));
    }

    #[test]
    fn test_slide_up_down() {
        assert_eq!(slid([0, 0, 0, 1, 2, 3], Move::Up), Some(([1, 2, 3, 0, 0, 0], 0)));
        assert_eq!(slid([1, 3, 6, 2, 3, 6], Move::Up), Some(([3, 4, 7, 0, 0, 0], 8 + 16 + 128)));
        assert_eq!(slid([1, 2, 3, 0, 0, 0], Move::Down), Some(([0, 0, 0, 1, 2, 3], 0)));
        assert_eq!(slid([1, 1, 3, 1, 1, 4], Move::Down), None);
    }

    #[test]
    fn test_terminal_board() {
        let b = Board::from_cells([1, 3, 1, 3, 1, 3]);
        assert!(b.is_terminal());
        assert!(!Board::from_cells([1, 2, 0, 0, 0, 0]).is_terminal());
    }

    #[test]
    fn test_info_ignored_by_equality() {
        let mut a = Board::from_cells([1, 0, 0, 0, 0, 0]);
        let b = a;
        assert_eq!(a.set_info(2), 0);
        assert_eq!(a, b);
        assert_eq!(a.info(), 2);
        assert_eq!(a.shift(Move::Right).map(|(n, _)| n.info()), Some(2));
    }

    #[test]
    fn test_encode() {
        assert_eq!(Board::EMPTY.encode(), 0);
        assert_eq!(Board::from_cells([1, 2, 3, 4, 5, 6]).encode(), 123_456);
        assert_eq!(Board::from_cells([0, 0, 0, 0, 0, 8]).encode(), 8);
    }

    #[test]
    fn test_faces() {
        for rank in 0..MAX_RANK {
            assert_eq!(face_to_rank(rank_to_face(rank)), Some(rank));
        }
        assert_eq!(rank_to_face(4), 6);
        assert_eq!(face_to_rank(5), None);
        assert_eq!(face_to_rank(18), None);
        assert_eq!(Board::from_cells([0, 1, 2, 3, 4, 5]).to_string(), "0 1 2 3 6 12");
    }

    #[test]
    fn test_validity() {
        assert!(Board::from_cells([8, 0, 0, 0, 0, 0]).is_valid());
        assert!(!Board::from_cells([9, 0, 0, 0, 0, 0]).is_valid());
    }
}

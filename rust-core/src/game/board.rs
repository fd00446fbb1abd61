use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::state::IntegrityError;

/// 棋盘的行列数。
pub const BOARD_SIZE: i8 = 8;
/// 每方开局棋子数。
pub const PIECES_PER_TEAM: usize = 12;

const STARTING_RANKS: i8 = 3;

static STANDARD_LAYOUT: Lazy<Board> = Lazy::new(|| {
    let mut board = Board::empty();
    for team in [Team::White, Team::Black] {
        let ranks = match team {
            Team::White => 0..STARTING_RANKS,
            Team::Black => BOARD_SIZE - STARTING_RANKS..BOARD_SIZE,
        };
        for rank in ranks {
            for file in 0..BOARD_SIZE {
                let square = Square::new(file, rank);
                if square.is_dark() {
                    board.place(square, Piece::man(team));
                }
            }
        }
    }
    board
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Team {
    White,
    Black,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// 兵不吃子时前进的方向。
    pub fn forward(self) -> i8 {
        match self {
            Team::White => 1,
            Team::Black => -1,
        }
    }

    /// 本方兵升变为王的底线。
    pub fn promotion_rank(self) -> i8 {
        match self {
            Team::White => BOARD_SIZE - 1,
            Team::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rank {
    Man,
    King,
}

impl Default for Rank {
    fn default() -> Self {
        Rank::Man
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Piece {
    pub team: Team,
    #[serde(default)]
    pub rank: Rank,
}

impl Piece {
    pub fn man(team: Team) -> Self {
        Self {
            team,
            rank: Rank::Man,
        }
    }

    pub fn king(team: Team) -> Self {
        Self {
            team,
            rank: Rank::King,
        }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }
}

/// 棋盘坐标。允许表示 `0..8` 之外的值，以便越界输入返回拒绝而不是构造失败。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

impl Square {
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    pub fn is_on_board(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.file) && (0..BOARD_SIZE).contains(&self.rank)
    }

    /// 标准布局中可落子的深色格。
    pub fn is_dark(&self) -> bool {
        (self.file + self.rank) % 2 == 0
    }

    pub fn offset(&self, file_delta: i8, rank_delta: i8) -> Square {
        Square::new(
            self.file.saturating_add(file_delta),
            self.rank.saturating_add(rank_delta),
        )
    }

    pub fn midpoint(&self, other: Square) -> Square {
        Square::new((self.file + other.file) / 2, (self.rank + other.rank) / 2)
    }

    /// 到 `other` 的列、行绝对距离。
    pub fn distance(&self, other: Square) -> (i8, i8) {
        (
            (other.file - self.file).abs(),
            (other.rank - self.rank).abs(),
        )
    }

    /// 同一斜线上 `self` 与 `other` 之间的格子（不含两端）。不在同一斜线时为空。
    pub fn diagonal_path(&self, other: Square) -> Vec<Square> {
        let (dx, dy) = self.distance(other);
        if dx != dy || dx == 0 {
            return Vec::new();
        }
        let step_file = (other.file - self.file).signum();
        let step_rank = (other.rank - self.rank).signum();
        (1..dx)
            .map(|step| self.offset(step_file * step, step_rank * step))
            .collect()
    }

    fn index(&self) -> Option<(usize, usize)> {
        if self.is_on_board() {
            Some((self.file as usize, self.rank as usize))
        } else {
            None
        }
    }

    /// 按列优先遍历所有格子。
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|file| (0..BOARD_SIZE).map(move |rank| Square::new(file, rank)))
    }
}

/// 占位网格，按 `[file][rank]` 索引。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// 白方占前三行，黑方占后三行，只放在深色格。
    pub fn standard() -> Self {
        (*STANDARD_LAYOUT).clone()
    }

    pub fn occupant_at(&self, square: Square) -> Option<Piece> {
        square
            .index()
            .and_then(|(file, rank)| self.squares[file][rank])
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        square.is_on_board() && self.occupant_at(square).is_none()
    }

    /// 覆盖写入，越界坐标直接忽略。
    pub fn place(&mut self, square: Square, piece: Piece) {
        if let Some((file, rank)) = square.index() {
            self.squares[file][rank] = Some(piece);
        }
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let (file, rank) = square.index()?;
        self.squares[file][rank].take()
    }

    pub fn move_occupant(
        &mut self,
        origin: Square,
        destination: Square,
    ) -> Result<Piece, IntegrityError> {
        if !destination.is_on_board() {
            return Err(IntegrityError::SquareOffBoard {
                square: destination,
            });
        }
        if self.occupant_at(destination).is_some() {
            return Err(IntegrityError::SquareOccupied {
                square: destination,
            });
        }
        let piece = self
            .remove(origin)
            .ok_or(IntegrityError::SquareEmpty { square: origin })?;
        self.place(destination, piece);
        Ok(piece)
    }

    /// 只有兵实际升变时返回 true。
    pub fn promote(&mut self, square: Square) -> bool {
        let Some((file, rank)) = square.index() else {
            return false;
        };
        match self.squares[file][rank].as_mut() {
            Some(piece) if piece.rank == Rank::Man => {
                piece.rank = Rank::King;
                true
            }
            _ => false,
        }
    }

    pub fn count_by_team(&self, team: Team) -> usize {
        self.pieces().filter(|(_, piece)| piece.team == team).count()
    }

    pub fn total_pieces(&self) -> usize {
        self.pieces().count()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.occupant_at(square).map(|piece| (square, piece)))
    }

    pub fn team_pieces(&self, team: Team) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.team == team)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

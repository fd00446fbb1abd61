use serde::{Deserialize, Serialize};

use super::board::{Board, Piece, Rank, Square, Team};

const JUMP_OFFSETS: [(i8, i8); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];

/// 单次走子吃掉的棋子，按路径顺序排列。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub squares: Vec<Square>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pieces: Vec<Piece>,
}

impl CaptureOutcome {
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    fn push(&mut self, square: Square, piece: Piece) {
        self.squares.push(square);
        self.pieces.push(piece);
    }
}

pub struct CaptureResolver;

impl CaptureResolver {
    /// `square` 上的棋子能否跳过相邻的对方棋子落到空格。不区分兵与王。
    pub fn can_capture_from(board: &Board, square: Square) -> bool {
        let Some(piece) = board.occupant_at(square) else {
            return false;
        };
        JUMP_OFFSETS.iter().any(|&(df, dr)| {
            let landing = square.offset(df, dr);
            board.is_empty_at(landing)
                && Self::is_opponent(board, square.midpoint(landing), piece.team)
        })
    }

    /// `team` 是否有任意棋子可以原地起跳吃子。
    pub fn team_can_capture(board: &Board, team: Team) -> bool {
        board
            .team_pieces(team)
            .any(|(square, _)| Self::can_capture_from(board, square))
    }

    pub fn is_opponent(board: &Board, square: Square, team: Team) -> bool {
        board
            .occupant_at(square)
            .map(|piece| piece.team != team)
            .unwrap_or(false)
    }

    /// 飞王扫吃只移除对方的兵。
    pub fn is_opposing_man(board: &Board, square: Square, team: Team) -> bool {
        matches!(
            board.occupant_at(square),
            Some(piece) if piece.team != team && !piece.is_king()
        )
    }

    /// 兵跳两格后移除被跳过的棋子。
    pub fn resolve_man_capture(
        board: &mut Board,
        origin: Square,
        destination: Square,
    ) -> CaptureOutcome {
        let mut outcome = CaptureOutcome::default();
        if origin.distance(destination) != (2, 2) {
            return outcome;
        }
        let Some(mover) = board.occupant_at(destination) else {
            return outcome;
        };
        let middle = origin.midpoint(destination);
        if Self::is_opponent(board, middle, mover.team) {
            if let Some(piece) = board.remove(middle) {
                outcome.push(middle, piece);
            }
        }
        outcome
    }

    /// 飞王吃子：移除 `origin` 与 `destination` 之间斜线上所有对方的兵，
    /// 路径上的对方王保留。
    pub fn resolve_king_capture(
        board: &mut Board,
        origin: Square,
        destination: Square,
    ) -> CaptureOutcome {
        let mut outcome = CaptureOutcome::default();
        let Some(mover) = board.occupant_at(destination) else {
            return outcome;
        };
        for square in origin.diagonal_path(destination) {
            if Self::is_opposing_man(board, square, mover.team) {
                if let Some(piece) = board.remove(square) {
                    outcome.push(square, piece);
                }
            }
        }
        outcome
    }

    /// 按棋子等级分派。调用前棋子必须已经落在 `destination`。
    pub fn resolve(
        board: &mut Board,
        rank: Rank,
        origin: Square,
        destination: Square,
    ) -> CaptureOutcome {
        match rank {
            Rank::Man => Self::resolve_man_capture(board, origin, destination),
            Rank::King => Self::resolve_king_capture(board, origin, destination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(pieces: &[(i8, i8, Piece)]) -> Board {
        let mut board = Board::empty();
        for &(file, rank, piece) in pieces {
            board.place(Square::new(file, rank), piece);
        }
        board
    }

    #[test]
    fn can_capture_from_needs_opponent_and_empty_landing() {
        let board = board_with(&[
            (2, 2, Piece::man(Team::White)),
            (3, 3, Piece::man(Team::Black)),
        ]);
        assert!(CaptureResolver::can_capture_from(&board, Square::new(2, 2)));
        assert!(CaptureResolver::can_capture_from(&board, Square::new(3, 3)));

        let blocked = board_with(&[
            (2, 2, Piece::man(Team::White)),
            (3, 3, Piece::man(Team::Black)),
            (4, 4, Piece::man(Team::Black)),
        ]);
        assert!(!CaptureResolver::can_capture_from(&blocked, Square::new(2, 2)));

        let friendly = board_with(&[
            (2, 2, Piece::man(Team::White)),
            (3, 3, Piece::man(Team::White)),
        ]);
        assert!(!CaptureResolver::can_capture_from(&friendly, Square::new(2, 2)));
        assert!(!CaptureResolver::can_capture_from(&friendly, Square::new(5, 5)));
    }

    #[test]
    fn can_capture_from_ignores_landing_off_board() {
        let board = board_with(&[
            (1, 1, Piece::man(Team::White)),
            (0, 0, Piece::man(Team::Black)),
        ]);
        assert!(!CaptureResolver::can_capture_from(&board, Square::new(1, 1)));
    }

    #[test]
    fn can_capture_from_includes_backward_jumps() {
        let board = board_with(&[
            (4, 4, Piece::man(Team::White)),
            (3, 3, Piece::man(Team::Black)),
        ]);
        assert!(CaptureResolver::can_capture_from(&board, Square::new(4, 4)));
        assert!(CaptureResolver::team_can_capture(&board, Team::White));
    }

    #[test]
    fn man_capture_removes_midpoint() {
        let mut board = board_with(&[
            (2, 4, Piece::man(Team::White)),
            (1, 3, Piece::man(Team::Black)),
        ]);
        let outcome =
            CaptureResolver::resolve_man_capture(&mut board, Square::new(0, 2), Square::new(2, 4));
        assert_eq!(outcome.squares, vec![Square::new(1, 3)]);
        assert_eq!(board.count_by_team(Team::Black), 0);

        let outcome =
            CaptureResolver::resolve_man_capture(&mut board, Square::new(1, 3), Square::new(2, 4));
        assert!(outcome.is_empty(), "single steps capture nothing");
    }

    #[test]
    fn king_sweeps_every_opposing_man_on_its_path() {
        let mut board = board_with(&[
            (6, 6, Piece::king(Team::White)),
            (1, 1, Piece::man(Team::Black)),
            (3, 3, Piece::man(Team::Black)),
            (5, 5, Piece::man(Team::Black)),
        ]);
        let outcome =
            CaptureResolver::resolve_king_capture(&mut board, Square::new(0, 0), Square::new(6, 6));
        assert_eq!(
            outcome.squares,
            vec![Square::new(1, 1), Square::new(3, 3), Square::new(5, 5)]
        );
        assert_eq!(outcome.len(), 3);
        assert_eq!(board.count_by_team(Team::Black), 0);
    }

    #[test]
    fn king_sweep_spares_kings_and_friendly_men() {
        let mut board = board_with(&[
            (4, 4, Piece::king(Team::White)),
            (1, 1, Piece::king(Team::Black)),
            (2, 2, Piece::man(Team::White)),
            (3, 3, Piece::man(Team::Black)),
        ]);
        let outcome =
            CaptureResolver::resolve_king_capture(&mut board, Square::new(0, 0), Square::new(4, 4));
        assert_eq!(outcome.squares, vec![Square::new(3, 3)]);
        assert_eq!(board.occupant_at(Square::new(1, 1)), Some(Piece::king(Team::Black)));
        assert_eq!(board.occupant_at(Square::new(2, 2)), Some(Piece::man(Team::White)));
    }

    #[test]
    fn only_opposing_men_are_sweep_targets() {
        let board = board_with(&[
            (1, 1, Piece::king(Team::Black)),
            (2, 2, Piece::man(Team::Black)),
            (3, 3, Piece::man(Team::White)),
        ]);
        assert!(!CaptureResolver::is_opposing_man(&board, Square::new(1, 1), Team::White));
        assert!(CaptureResolver::is_opposing_man(&board, Square::new(2, 2), Team::White));
        assert!(!CaptureResolver::is_opposing_man(&board, Square::new(3, 3), Team::White));
        assert!(!CaptureResolver::is_opposing_man(&board, Square::new(4, 4), Team::White));
        assert!(CaptureResolver::is_opponent(&board, Square::new(1, 1), Team::White));
    }
}

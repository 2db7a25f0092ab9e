/// Board query facade used by the tactical detectors.
///
/// The detectors never touch a rules engine directly: they ask a
/// [`BoardQuery`] for pieces, attacks, checks and pins. `chess::Board`
/// is the production implementation.

use chess::{
    BitBoard, Board, BoardStatus, ChessMove, Color, File, MoveGen, Piece, Rank, Square, EMPTY,
};

/// Every square. The pin ray reported for a piece that is not pinned.
pub const BB_ALL: BitBoard = BitBoard(0xFFFF_FFFF_FFFF_FFFF);

/// Read-only position queries needed for motif detection.
pub trait BoardQuery: Clone {
    /// Piece type and color on a square
    fn piece_at(&self, square: Square) -> Option<(Piece, Color)>;

    /// All occupied squares
    fn occupied(&self) -> BitBoard;

    fn side_to_move(&self) -> Color;

    /// Squares attacked by the piece on `square` (empty if none).
    /// Pawn attacks are the two diagonals, whether occupied or not.
    fn attacks(&self, square: Square) -> BitBoard;

    /// Pieces of `color` attacking `square`
    fn attackers(&self, color: Color, square: Square) -> BitBoard;

    /// Pieces of `color` attacking `square` once the piece on `removed`
    /// is lifted off the board.
    fn attackers_without(&self, color: Color, square: Square, removed: Square) -> BitBoard;

    /// Pieces giving check to the side to move
    fn checkers(&self) -> BitBoard;

    fn is_checkmate(&self) -> bool;

    /// Line a pinned piece of `color` on `square` may still move along,
    /// or [`BB_ALL`] if it is not pinned to its king.
    fn pin_ray(&self, color: Color, square: Square) -> BitBoard;

    fn king_square(&self, color: Color) -> Square;

    fn legal_move_count(&self) -> usize;

    /// Legal moves of the piece on `square`, each with the position it leads to
    fn legal_moves_from(&self, square: Square) -> Vec<(ChessMove, Self)>;

    fn is_check(&self) -> bool {
        self.checkers() != EMPTY
    }

    fn is_pinned(&self, color: Color, square: Square) -> bool {
        self.pin_ray(color, square) != BB_ALL
    }

    fn piece_type_at(&self, square: Square) -> Option<Piece> {
        self.piece_at(square).map(|(piece, _)| piece)
    }
}

/// Squares strictly between two aligned squares (empty if not aligned)
pub fn between(s1: Square, s2: Square) -> BitBoard {
    chess::between(s1, s2)
}

/// Is `square` a member of `bb`?
pub fn contains(bb: BitBoard, square: Square) -> bool {
    (bb & BitBoard::from_square(square)) != EMPTY
}

/// Pawn attack squares (just the diagonal attacks, not pushes)
pub fn pawn_attacks(square: Square, color: Color) -> BitBoard {
    let file = square.get_file().to_index();
    let rank = square.get_rank().to_index();

    let target_rank = match color {
        Color::White if rank < 7 => rank + 1,
        Color::Black if rank > 0 => rank - 1,
        _ => return EMPTY,
    };

    let mut result = EMPTY;
    if file > 0 {
        result |= BitBoard::from_square(Square::make_square(
            Rank::from_index(target_rank),
            File::from_index(file - 1),
        ));
    }
    if file < 7 {
        result |= BitBoard::from_square(Square::make_square(
            Rank::from_index(target_rank),
            File::from_index(file + 1),
        ));
    }
    result
}

/// Attackers of `square` by `color`, sliding pieces blocked by `occupied` only.
/// Pieces outside `occupied` are ignored.
fn attackers_with_occupancy(board: &Board, color: Color, square: Square, occupied: BitBoard) -> BitBoard {
    let ours = *board.color_combined(color) & occupied;
    let diagonal = *board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen);
    let straight = *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);

    // Pawns: reverse lookup from the target square with the opposite color
    let candidates = (pawn_attacks(square, !color) & *board.pieces(Piece::Pawn))
        | (chess::get_knight_moves(square) & *board.pieces(Piece::Knight))
        | (chess::get_king_moves(square) & *board.pieces(Piece::King))
        | (chess::get_bishop_moves(square, occupied) & diagonal)
        | (chess::get_rook_moves(square, occupied) & straight);

    candidates & ours
}

impl BoardQuery for Board {
    fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        match (self.piece_on(square), self.color_on(square)) {
            (Some(piece), Some(color)) => Some((piece, color)),
            _ => None,
        }
    }

    fn occupied(&self) -> BitBoard {
        *self.combined()
    }

    fn side_to_move(&self) -> Color {
        Board::side_to_move(self)
    }

    fn attacks(&self, square: Square) -> BitBoard {
        let (piece, color) = match BoardQuery::piece_at(self, square) {
            Some(pc) => pc,
            None => return EMPTY,
        };
        let occupied = *self.combined();

        match piece {
            Piece::Pawn => pawn_attacks(square, color),
            Piece::Knight => chess::get_knight_moves(square),
            Piece::King => chess::get_king_moves(square),
            Piece::Bishop => chess::get_bishop_moves(square, occupied),
            Piece::Rook => chess::get_rook_moves(square, occupied),
            Piece::Queen => {
                chess::get_bishop_moves(square, occupied) | chess::get_rook_moves(square, occupied)
            }
        }
    }

    fn attackers(&self, color: Color, square: Square) -> BitBoard {
        attackers_with_occupancy(self, color, square, *self.combined())
    }

    fn attackers_without(&self, color: Color, square: Square, removed: Square) -> BitBoard {
        let occupied = *self.combined() & !BitBoard::from_square(removed);
        attackers_with_occupancy(self, color, square, occupied)
    }

    fn checkers(&self) -> BitBoard {
        *Board::checkers(self)
    }

    fn is_checkmate(&self) -> bool {
        self.status() == BoardStatus::Checkmate
    }

    fn pin_ray(&self, color: Color, square: Square) -> BitBoard {
        let king = BoardQuery::king_square(self, color);
        let line = chess::line(king, square);
        if line == EMPTY {
            return BB_ALL;
        }

        let diagonal =
            king.get_file() != square.get_file() && king.get_rank() != square.get_rank();
        let sliders = if diagonal {
            *self.pieces(Piece::Bishop) | *self.pieces(Piece::Queen)
        } else {
            *self.pieces(Piece::Rook) | *self.pieces(Piece::Queen)
        };
        let snipers = sliders & *self.color_combined(!color) & line;

        for sniper in snipers {
            // Exactly our piece between the king and the sniper
            let blockers = chess::between(king, sniper) & *self.combined();
            if blockers == BitBoard::from_square(square) {
                return line;
            }
        }
        BB_ALL
    }

    fn king_square(&self, color: Color) -> Square {
        Board::king_square(self, color)
    }

    fn legal_move_count(&self) -> usize {
        MoveGen::new_legal(self).len()
    }

    fn legal_moves_from(&self, square: Square) -> Vec<(ChessMove, Self)> {
        MoveGen::new_legal(self)
            .filter(|m| m.get_source() == square)
            .map(|m| (m, self.make_move_new(m)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_attackers_starting_position() {
        let board = Board::default();
        // f3 is covered by the e2 and g2 pawns and the g1 knight
        let attackers = BoardQuery::attackers(&board, Color::White, Square::F3);
        assert_eq!(attackers.popcnt(), 3);
        assert!(contains(attackers, Square::G1));
        assert!(contains(attackers, Square::E2));
        assert!(contains(attackers, Square::G2));
        assert_eq!(BoardQuery::attackers(&board, Color::Black, Square::F3), EMPTY);
    }

    #[test]
    fn test_attacks_pawn_diagonals() {
        let board = Board::default();
        let atk = BoardQuery::attacks(&board, Square::E2);
        assert!(contains(atk, Square::D3));
        assert!(contains(atk, Square::F3));
        assert_eq!(atk.popcnt(), 2);
        assert_eq!(BoardQuery::attacks(&board, Square::E4), EMPTY);
    }

    #[test]
    fn test_attackers_without_reveals_xray() {
        // Rook d2 in front of the queen on d1
        let board = Board::from_str("4k3/8/8/8/8/8/3R4/3QK3 w - - 0 1").unwrap();
        let direct = BoardQuery::attackers(&board, Color::White, Square::D5);
        assert_eq!(direct, BitBoard::from_square(Square::D2));

        let xray = board.attackers_without(Color::White, Square::D5, Square::D2);
        assert_eq!(xray, BitBoard::from_square(Square::D1));
    }

    #[test]
    fn test_pin_ray() {
        // Knight e2 pinned by the rook on e8
        let board = Board::from_str("4r2k/8/8/8/8/8/3PN3/4K3 w - - 0 1").unwrap();
        let ray = board.pin_ray(Color::White, Square::E2);
        assert_ne!(ray, BB_ALL);
        assert!(contains(ray, Square::E8));
        assert!(contains(ray, Square::E5));
        assert!(!contains(ray, Square::D2));
        assert!(board.is_pinned(Color::White, Square::E2));
        assert!(!board.is_pinned(Color::White, Square::D2));
    }

    #[test]
    fn test_king_square_and_checks() {
        let board = Board::default();
        assert_eq!(BoardQuery::king_square(&board, Color::White), Square::E1);
        assert_eq!(BoardQuery::king_square(&board, Color::Black), Square::E8);
        assert!(!board.is_check());
        assert!(!BoardQuery::is_checkmate(&board));
        assert_eq!(board.legal_move_count(), 20);
    }

    #[test]
    fn test_legal_moves_from() {
        let board = Board::default();
        let knight_moves = board.legal_moves_from(Square::G1);
        assert_eq!(knight_moves.len(), 2);
        for (m, after) in &knight_moves {
            assert_eq!(BoardQuery::piece_type_at(after, m.get_dest()), Some(Piece::Knight));
        }
    }

    #[test]
    fn test_between() {
        assert!(contains(between(Square::A1, Square::D4), Square::B2));
        assert!(contains(between(Square::A1, Square::D4), Square::C3));
        assert!(!contains(between(Square::A1, Square::D4), Square::D4));
        assert_eq!(between(Square::A1, Square::B3), EMPTY);
    }
}

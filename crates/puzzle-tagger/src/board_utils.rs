/// Tactical predicates shared by the detectors: piece values, material,
/// hanging and trapped pieces, advanced pawn pushes.

use chess::{Color, Piece, Square, EMPTY};

use crate::board::BoardQuery;
use crate::puzzle::PuzzleNode;

// Piece values for material calculation
pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;
/// Stand-in value for the king in comparisons, one above the queen
pub const KING_VALUE: i32 = 10;

/// Piece value (no king)
pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => 0,
    }
}

/// Piece value including king
pub fn king_value(piece: Piece) -> i32 {
    match piece {
        Piece::King => KING_VALUE,
        other => piece_value(other),
    }
}

/// Is this a ray (sliding) piece type?
pub fn is_ray_piece(piece: Piece) -> bool {
    matches!(piece, Piece::Queen | Piece::Rook | Piece::Bishop)
}

/// Count material for one side
pub fn material_count<B: BoardQuery>(board: &B, color: Color) -> i32 {
    board
        .occupied()
        .into_iter()
        .filter_map(|sq| board.piece_at(sq))
        .filter(|&(_, c)| c == color)
        .map(|(piece, _)| piece_value(piece))
        .sum()
}

/// Material difference (positive = side has more)
pub fn material_diff<B: BoardQuery>(board: &B, side: Color) -> i32 {
    material_count(board, side) - material_count(board, !side)
}

/// What piece type moved? Looks at the destination after the move,
/// so a promotion reports the promoted piece.
pub fn moved_piece_type<B: BoardQuery>(node: &PuzzleNode<B>) -> Option<Piece> {
    node.board_after.piece_type_at(node.chess_move.get_dest())
}

/// Was the node's move a capture? Includes en passant.
pub fn is_capture<B: BoardQuery>(node: &PuzzleNode<B>) -> bool {
    let from = node.chess_move.get_source();
    let to = node.chess_move.get_dest();
    if node.board_before.piece_at(to).is_some() {
        return true;
    }
    node.board_before.piece_type_at(from) == Some(Piece::Pawn) && from.get_file() != to.get_file()
}

/// Is this move an advanced pawn move? A promotion, or a pawn landing on
/// one of the opponent's three back ranks.
pub fn is_advanced_pawn_move<B: BoardQuery>(node: &PuzzleNode<B>) -> bool {
    if node.chess_move.get_promotion().is_some() {
        return true;
    }
    if moved_piece_type(node) != Some(Piece::Pawn) {
        return false;
    }
    let to_rank = node.chess_move.get_dest().get_rank().to_index();
    match node.turn() {
        Color::White => to_rank >= 5, // rank 6, 7, 8
        Color::Black => to_rank <= 2, // rank 1, 2, 3
    }
}

/// Is a piece of `color` on `square` defended?
/// Checks direct defenders, then ray defense: a friendly piece behind one of
/// the enemy's sliding attackers.
pub fn is_defended<B: BoardQuery>(board: &B, color: Color, square: Square) -> bool {
    if board.attackers(color, square) != EMPTY {
        return true;
    }

    board.attackers(!color, square).into_iter().any(|att_sq| {
        matches!(board.piece_type_at(att_sq), Some(p) if is_ray_piece(p))
            && board.attackers_without(color, square, att_sq) != EMPTY
    })
}

/// Is a piece hanging (not defended)?
pub fn is_hanging<B: BoardQuery>(board: &B, color: Color, square: Square) -> bool {
    !is_defended(board, color, square)
}

/// Can a piece be taken by a lower-value piece?
pub fn can_be_taken_by_lower_piece<B: BoardQuery>(
    board: &B,
    piece: Piece,
    color: Color,
    square: Square,
) -> bool {
    board.attackers(!color, square).into_iter().any(|att_sq| {
        matches!(
            board.piece_type_at(att_sq),
            Some(att) if att != Piece::King && piece_value(att) < piece_value(piece)
        )
    })
}

/// Is a piece in a bad spot (attacked, and hanging or takeable by lower piece)?
pub fn is_in_bad_spot<B: BoardQuery>(board: &B, square: Square) -> bool {
    let (piece, color) = match board.piece_at(square) {
        Some(pc) => pc,
        None => return false,
    };

    if board.attackers(!color, square) == EMPTY {
        return false;
    }

    is_hanging(board, color, square) || can_be_taken_by_lower_piece(board, piece, color, square)
}

/// Is a piece trapped? (in a bad spot and every escape is bad too)
pub fn is_trapped<B: BoardQuery>(board: &B, square: Square) -> bool {
    // Can't be trapped if in check or pinned
    if board.is_check() || board.is_pinned(board.side_to_move(), square) {
        return false;
    }

    let piece = match board.piece_type_at(square) {
        Some(p) => p,
        None => return false,
    };

    // Pawns and kings can't be "trapped" in the tactical sense
    if piece == Piece::Pawn || piece == Piece::King {
        return false;
    }

    if !is_in_bad_spot(board, square) {
        return false;
    }

    for (escape, after) in board.legal_moves_from(square) {
        // Can capture a piece of equal or greater value
        if let Some(captured) = board.piece_type_at(escape.get_dest()) {
            if piece_value(captured) >= piece_value(piece) {
                return false;
            }
        }
        if !is_in_bad_spot(&after, escape.get_dest()) {
            return false;
        }
    }

    true
}

/// Opponent pieces attacked from a square
pub fn attacked_opponent_squares<B: BoardQuery>(
    board: &B,
    from_square: Square,
    pov: Color,
) -> Vec<(Piece, Square)> {
    board
        .attacks(from_square)
        .into_iter()
        .filter_map(|sq| match board.piece_at(sq) {
            Some((piece, color)) if color != pov => Some((piece, sq)),
            _ => None,
        })
        .collect()
}

/// Opponent pieces attacked from a square (just the pieces, no squares)
pub fn attacked_opponent_pieces<B: BoardQuery>(
    board: &B,
    from_square: Square,
    pov: Color,
) -> Vec<Piece> {
    attacked_opponent_squares(board, from_square, pov)
        .into_iter()
        .map(|(piece, _)| piece)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{Board, ChessMove};
    use std::str::FromStr;

    fn node(fen: &str, from: Square, to: Square, promotion: Option<Piece>) -> PuzzleNode {
        let board_before = Board::from_str(fen).unwrap();
        let chess_move = ChessMove::new(from, to, promotion);
        PuzzleNode {
            board_before,
            board_after: board_before.make_move_new(chess_move),
            chess_move,
            ply: 0,
        }
    }

    #[test]
    fn test_material_count_starting() {
        let board = Board::default();
        // 8 pawns + 2 knights + 2 bishops + 2 rooks + 1 queen = 8+6+6+10+9 = 39
        assert_eq!(material_count(&board, Color::White), 39);
        assert_eq!(material_count(&board, Color::Black), 39);
        assert_eq!(material_diff(&board, Color::White), 0);
    }

    #[test]
    fn test_material_diff_signed() {
        // White is a rook up
        let board = Board::from_str("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(material_diff(&board, Color::White), 5);
        assert_eq!(material_diff(&board, Color::Black), -5);
    }

    #[test]
    fn test_king_value_above_queen() {
        assert_eq!(piece_value(Piece::King), 0);
        assert!(king_value(Piece::King) > king_value(Piece::Queen));
        assert!(is_ray_piece(Piece::Bishop));
        assert!(!is_ray_piece(Piece::Knight));
    }

    #[test]
    fn test_hanging_knight() {
        // Black knight on d5 with no defenders
        let board = Board::from_str("4k3/8/8/3n4/8/8/8/3RK3 w - - 0 1").unwrap();
        assert!(is_hanging(&board, Color::Black, Square::D5));
        assert!(is_in_bad_spot(&board, Square::D5));
    }

    #[test]
    fn test_defended_by_pawn() {
        let board = Board::from_str("4k3/8/4p3/3n4/8/8/8/3RK3 w - - 0 1").unwrap();
        assert!(!is_hanging(&board, Color::Black, Square::D5));
        // Attacked by a rook, worth more than the knight: not a bad spot
        assert!(!is_in_bad_spot(&board, Square::D5));
    }

    #[test]
    fn test_ray_defense() {
        let board = Board::from_str("4r1k1/8/8/4N3/8/4r3/8/4R1K1 w - - 0 1").unwrap();
        // No direct defender, but the e1 rook stands behind the attacking e3 rook
        assert_eq!(board.attackers(Color::White, Square::E5), EMPTY);
        assert!(is_defended(&board, Color::White, Square::E5));
    }

    #[test]
    fn test_can_be_taken_by_lower_piece() {
        let board = Board::from_str("7k/8/3n4/8/4R3/8/8/4K3 w - - 0 1").unwrap();
        assert!(can_be_taken_by_lower_piece(&board, Piece::Rook, Color::White, Square::E4));
        assert!(is_in_bad_spot(&board, Square::E4));
    }

    #[test]
    fn test_trapped_bishop() {
        // Bishop a2 attacked by the a8 rook; b1 and b3 are both covered by the king
        let board = Board::from_str("R7/7k/8/8/8/1P6/b1K5/8 b - - 0 1").unwrap();
        assert!(is_trapped(&board, Square::A2));
    }

    #[test]
    fn test_not_trapped_with_escape() {
        let board = Board::from_str("4k3/8/8/8/3b4/8/8/R3K3 b - - 0 1").unwrap();
        assert!(!is_trapped(&board, Square::D4));
    }

    #[test]
    fn test_advanced_pawn_moves() {
        let push = node("4k3/8/8/4P3/8/8/8/4K3 w - - 0 1", Square::E5, Square::E6, None);
        assert!(is_advanced_pawn_move(&push));

        let deep = node("8/4P3/8/8/8/8/8/k3K3 w - - 0 1", Square::E7, Square::E8, Some(Piece::Queen));
        assert!(is_advanced_pawn_move(&deep));

        let black = node("4k3/8/8/8/4p3/8/8/K7 b - - 0 1", Square::E4, Square::E3, None);
        assert!(is_advanced_pawn_move(&black));

        let early = node("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Square::E2, Square::E4, None);
        assert!(!is_advanced_pawn_move(&early));
    }

    #[test]
    fn test_en_passant_is_capture() {
        let ep = node(
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2",
            Square::E5,
            Square::D6,
            None,
        );
        assert!(is_capture(&ep));
        assert_eq!(moved_piece_type(&ep), Some(Piece::Pawn));

        let quiet = node("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Square::E2, Square::E3, None);
        assert!(!is_capture(&quiet));
    }

    #[test]
    fn test_attacked_opponent_squares() {
        // Knight e5 attacks the rook d7 and queen f7; the own pawn on d3 is ignored
        let board = Board::from_str("4k3/3r1q2/8/4N3/8/3P4/8/4K3 b - - 0 1").unwrap();
        let attacked = attacked_opponent_squares(&board, Square::E5, Color::White);
        assert_eq!(attacked.len(), 2);
        assert!(attacked.contains(&(Piece::Rook, Square::D7)));
        assert!(attacked.contains(&(Piece::Queen, Square::F7)));
        assert_eq!(attacked_opponent_pieces(&board, Square::E5, Color::White).len(), 2);
    }
}

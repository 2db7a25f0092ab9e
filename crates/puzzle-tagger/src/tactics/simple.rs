/// Simple tactical detectors: double_check, en_passant, promotion,
/// mate_in, advanced_pawn, attacking_f2_f7

use chess::{Piece, Square};

use crate::board::BoardQuery;
use crate::board_utils::{is_advanced_pawn_move, moved_piece_type};
use crate::puzzle::{Puzzle, TagKind};

/// Is there a double check in any solver move?
pub fn double_check<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    puzzle
        .solver_moves()
        .iter()
        .any(|node| node.board_after.checkers().popcnt() > 1)
}

/// Is there an en passant in any solver move?
pub fn en_passant<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves() {
        if moved_piece_type(node) == Some(Piece::Pawn) {
            let from_file = node.chess_move.get_source().get_file();
            let to_file = node.chess_move.get_dest().get_file();
            // Pawn moved diagonally but target square was empty before
            if from_file != to_file && node.board_before.piece_at(node.chess_move.get_dest()).is_none() {
                return true;
            }
        }
    }
    false
}

/// Is there a promotion in any solver move?
pub fn promotion<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    puzzle
        .solver_moves()
        .iter()
        .any(|node| node.chess_move.get_promotion().is_some())
}

/// Detect mate-in-N and return the appropriate tag
pub fn mate_in<B: BoardQuery>(puzzle: &Puzzle<B>) -> Option<TagKind> {
    if !puzzle.end_board()?.is_checkmate() {
        return None;
    }

    match puzzle.mainline.len() / 2 {
        0 => None,
        1 => Some(TagKind::MateIn1),
        2 => Some(TagKind::MateIn2),
        3 => Some(TagKind::MateIn3),
        4 => Some(TagKind::MateIn4),
        _ => Some(TagKind::MateIn5),
    }
}

/// Advanced pawn: either side pushes a pawn into the opponent's half
/// (ranks 6-8 for white, 1-3 for black) or promotes
pub fn advanced_pawn<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    puzzle.mainline.iter().any(is_advanced_pawn_move)
}

/// Attacking f2/f7: the first solver capture on f2 or f7 decides, and
/// counts only with the enemy king still on its home square next to it.
pub fn attacking_f2_f7<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves() {
        let square = node.chess_move.get_dest();
        if node.board_before.piece_at(square).is_none() {
            continue;
        }
        let king_square = if square == Square::F7 {
            Square::E8
        } else if square == Square::F2 {
            Square::E1
        } else {
            continue;
        };
        return matches!(
            node.board_after.piece_at(king_square),
            Some((Piece::King, color)) if color != puzzle.pov
        );
    }
    false
}

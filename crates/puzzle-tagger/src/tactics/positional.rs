/// Positional detectors: quiet_move, defensive_move, attraction, deflection,
/// self_interference, interference, clearance

use chess::{Color, Piece, Square};

use crate::board::{between, contains, BoardQuery};
use crate::board_utils::{
    attacked_opponent_pieces, is_advanced_pawn_move, is_capture, is_hanging, is_in_bad_spot,
    is_ray_piece, king_value, moved_piece_type,
};
use crate::puzzle::Puzzle;

/// Quiet move: the first solver move that neither checks, escapes check nor
/// captures decides; it is quiet if it attacks nothing either.
pub fn quiet_move<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in &puzzle.mainline {
        // Solver's move, not the last move of the puzzle
        if node.turn() != puzzle.pov || puzzle.is_end(node) {
            continue;
        }

        // No check given or escaped
        if node.board_after.is_check() || node.board_before.is_check() {
            continue;
        }

        if is_capture(node) {
            continue;
        }

        return attacked_opponent_pieces(&node.board_after, node.chess_move.get_dest(), puzzle.pov)
            .is_empty();
    }
    false
}

/// Defensive move: like a quiet move, but on the last move, with real alternatives
pub fn defensive_move<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    let last_node = match puzzle.mainline.last() {
        Some(node) => node,
        None => return false,
    };

    // At least 3 legal moves before the last move
    if last_node.board_before.legal_move_count() < 3 {
        return false;
    }

    // No check given, no capture
    if last_node.board_after.is_check() || is_capture(last_node) {
        return false;
    }

    // No piece attacked
    if !attacked_opponent_pieces(&last_node.board_after, last_node.chess_move.get_dest(), puzzle.pov)
        .is_empty()
    {
        return false;
    }

    !is_advanced_pawn_move(last_node)
}

/// Attraction: lure a king, queen or rook to a square where it can be exploited
pub fn attraction<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.mainline.iter().skip(1) {
        if node.turn() != puzzle.pov {
            continue;
        }

        // 1. Solver moves to a square, 2. the opponent takes on it
        let first_move_to = node.chess_move.get_dest();
        let opponent_reply = match puzzle.next_node(node) {
            Some(reply) if reply.chess_move.get_dest() == first_move_to => reply,
            _ => continue,
        };

        let attracted_piece = match moved_piece_type(opponent_reply) {
            Some(p @ (Piece::King | Piece::Queen | Piece::Rook)) => p,
            _ => continue,
        };

        // 3. Solver's next move attacks that square
        let next_node = match puzzle.next_node(opponent_reply) {
            Some(n) => n,
            None => continue,
        };
        let attackers = next_node.board_after.attackers(puzzle.pov, first_move_to);
        if !contains(attackers, next_node.chess_move.get_dest()) {
            continue;
        }

        // 4. It is a check on the lured king, or the solver later captures there
        if attracted_piece == Piece::King {
            return true;
        }
        if let Some(n3) = puzzle.next_next_node(next_node) {
            if n3.chess_move.get_dest() == first_move_to {
                return true;
            }
        }
    }
    false
}

/// Deflection: a defender is forced to recapture elsewhere and stops guarding
/// the square the solver then takes or promotes on
pub fn deflection<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let square = node.chess_move.get_dest();
        let capture = node.board_before.piece_type_at(square);
        if capture.is_none() && node.chess_move.get_promotion().is_none() {
            continue;
        }

        // Winning a bigger piece with a smaller one is not a deflection
        if let (Some(captured), Some(mover)) = (capture, moved_piece_type(node)) {
            if mover != Piece::King && king_value(captured) > king_value(mover) {
                continue;
            }
        }

        let prev_op = &puzzle.mainline[node.ply - 1];
        let prev_player = &puzzle.mainline[node.ply - 2];
        let prev_op_move = prev_op.chess_move;
        let prev_player_move = prev_player.chess_move;

        let prev_player_capture = prev_player.board_before.piece_type_at(prev_player_move.get_dest());
        let cheap_or_no_capture = match (prev_player_capture, moved_piece_type(prev_player)) {
            (None, _) => true,
            (Some(captured), Some(mover)) => king_value(captured) < king_value(mover),
            (Some(_), None) => false,
        };
        if !cheap_or_no_capture {
            continue;
        }

        if square == prev_op_move.get_dest() || square == prev_player_move.get_dest() {
            continue;
        }

        // The opponent recaptured on the solver's previous square
        if prev_op_move.get_dest() != prev_player_move.get_dest() {
            continue;
        }

        // It guarded the square from where it stood, and no longer does
        let guarded_before = contains(prev_player.board_after.attacks(prev_op_move.get_source()), square);
        let guards_now = contains(prev_op.board_after.attacks(prev_op_move.get_dest()), square);
        if guarded_before && !guards_now {
            return true;
        }
    }
    false
}

/// Lowest-square defender of `square` by `color`, if it is a ray piece
fn ray_defender<B: BoardQuery>(board: &B, color: Color, square: Square) -> Option<Square> {
    let defender = board.attackers(color, square).into_iter().next()?;
    match board.piece_type_at(defender) {
        Some(p) if is_ray_piece(p) => Some(defender),
        _ => None,
    }
}

/// Self-interference: the opponent blocks their own defender's line
pub fn self_interference<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let prev_board = &node.board_before;
        let square = node.chess_move.get_dest();
        let cap_color = match prev_board.piece_at(square) {
            Some((_, color)) => color,
            None => continue,
        };
        if !is_hanging(prev_board, cap_color, square) {
            continue;
        }

        // Defender in the position before the opponent's move
        let init_board = &puzzle.mainline[node.ply - 2].board_after;
        if let Some(defender) = ray_defender(init_board, cap_color, square) {
            let prev_op = &puzzle.mainline[node.ply - 1];
            if contains(between(square, defender), prev_op.chess_move.get_dest()) {
                return true;
            }
        }
    }
    false
}

/// Interference: a solver piece lands on the defender's line
pub fn interference<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let prev_board = &node.board_before;
        let square = node.chess_move.get_dest();
        let prev_op = &puzzle.mainline[node.ply - 1];

        let cap_color = match prev_board.piece_at(square) {
            Some((_, color)) if square != prev_op.chess_move.get_dest() => color,
            _ => continue,
        };
        if !is_hanging(prev_board, cap_color, square) {
            continue;
        }

        // Defender three plies back, before the interfering move
        let init_board = &puzzle.mainline[node.ply - 3].board_after;
        if let Some(defender) = ray_defender(init_board, cap_color, square) {
            let interfering = &puzzle.mainline[node.ply - 2];
            if contains(between(square, defender), interfering.chess_move.get_dest()) {
                return true;
            }
        }
    }
    false
}

/// Clearance: a piece moves away to open a line for another
pub fn clearance<B: BoardQuery>(puzzle: &Puzzle<B>) -> bool {
    for node in puzzle.solver_moves().into_iter().skip(1) {
        let board = &node.board_after;
        let from = node.chess_move.get_source();
        let to = node.chess_move.get_dest();

        // Quiet move of a ray piece
        if node.board_before.piece_at(to).is_some() {
            continue;
        }
        if !matches!(board.piece_type_at(to), Some(p) if is_ray_piece(p)) {
            continue;
        }

        let prev = &puzzle.mainline[node.ply - 2];
        let prev_op = &puzzle.mainline[node.ply - 1];
        let prev_move = prev.chess_move;

        if prev_move.get_promotion().is_some()
            || prev_move.get_dest() == from
            || prev_move.get_dest() == to
            || prev_op.board_after.is_check()
        {
            continue;
        }

        // If we give check, the opponent's previous move was not a king move
        if board.is_check() && moved_piece_type(prev_op) == Some(Piece::King) {
            continue;
        }

        // The cleared piece stood on the destination or on the line to it
        if prev_move.get_source() != to && !contains(between(from, to), prev_move.get_source()) {
            continue;
        }

        let before_clear = &puzzle.mainline[node.ply - 3].board_after;
        if before_clear.piece_at(prev_move.get_dest()).is_none()
            || is_in_bad_spot(&prev.board_after, prev_move.get_dest())
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::extraction::puzzle_from_uci;

    const START: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

    #[test]
    fn test_quiet_development() {
        let puzzle = puzzle_from_uci("quiet1", START, "e7e5 b1c3 b8c6 f1e2").unwrap();
        assert!(quiet_move(&puzzle));
        assert!(defensive_move(&puzzle));
        assert!(!attraction(&puzzle));
        assert!(!deflection(&puzzle));
        assert!(!clearance(&puzzle));
    }

    #[test]
    fn test_first_candidate_decides_quiet_move() {
        // Nf3 hits the e5 pawn, so the later quiet bishop move is never looked at
        let puzzle = puzzle_from_uci("quiet2", START, "e7e5 g1f3 b8c6 f1e2").unwrap();
        assert!(!quiet_move(&puzzle));
    }

    #[test]
    fn test_defensive_move_rejects_attack() {
        // Bc4 eyes the f7 pawn
        let puzzle = puzzle_from_uci("def1", START, "e7e5 b1c3 b8c6 f1c4").unwrap();
        assert!(!defensive_move(&puzzle));
    }

    #[test]
    fn test_attraction_of_king() {
        // Rh8+ drags the king to h8, then Qh5+ checks it there
        let puzzle = puzzle_from_uci(
            "attr1",
            "6k1/p4pp1/8/8/8/8/8/1K1Q3R b - - 0 1",
            "a7a6 h1h8 g8h8 d1h5 h8g8 h5h7",
        )
        .unwrap();
        assert!(attraction(&puzzle));
    }
}

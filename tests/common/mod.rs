use puzzle_tagger::puzzle::extraction::puzzle_from_uci;
use puzzle_tagger::{cook, Puzzle, TagKind};

/// Build a Puzzle from Lichess CSV fields: FEN and space-separated UCI moves.
///
/// In the Lichess format:
///   - FEN = position before the first move
///   - Moves[0] = opponent's last move (setup/blunder)
///   - Moves[1..] = solver's moves interleaved with opponent responses
///   - Solver POV = opposite of whose turn it is in the FEN
pub fn build_puzzle(id: &str, fen: &str, moves: &str) -> Puzzle {
    puzzle_from_uci(id, fen, moves).unwrap_or_else(|e| panic!("bad puzzle {id}: {e}"))
}

/// Build and cook in one go
#[allow(dead_code)]
pub fn cook_tags(id: &str, fen: &str, moves: &str) -> Vec<TagKind> {
    let puzzle = build_puzzle(id, fen, moves);
    cook(&puzzle).unwrap_or_else(|e| panic!("cook failed for {id}: {e}"))
}

/// Start position after 1.e4, black to play the setup move
#[allow(dead_code)]
pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

/// Puzzle construction from the Lichess puzzle format and UCI move parsing
///
/// In the Lichess format:
///   - FEN = position before the first move
///   - Moves[0] = opponent's last move (setup)
///   - Moves[1..] = solver's moves interleaved with opponent responses
///   - Solver POV = opposite of whose turn it is in the FEN

use std::str::FromStr;

use chess::{Board, ChessMove, File, Piece, Rank, Square};

use super::{Puzzle, PuzzleNode};
use crate::error::PuzzleError;

/// Minimum puzzle line length (setup move plus one solver move)
pub const MIN_PUZZLE_LENGTH: usize = 2;

/// Parse a UCI move string such as `e2e4` or `e7e8q`
pub fn parse_uci_move(uci: &str) -> Result<ChessMove, PuzzleError> {
    let invalid = || PuzzleError::InvalidUci { uci: uci.to_string() };

    let bytes = uci.as_bytes();
    if bytes.len() != 4 && bytes.len() != 5 {
        return Err(invalid());
    }

    let square = |file: u8, rank: u8| -> Option<Square> {
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Square::make_square(
            Rank::from_index((rank - b'1') as usize),
            File::from_index((file - b'a') as usize),
        ))
    };

    let from = square(bytes[0], bytes[1]).ok_or_else(invalid)?;
    let to = square(bytes[2], bytes[3]).ok_or_else(invalid)?;

    let promotion = match bytes.get(4).copied() {
        None => None,
        Some(b'q' | b'Q') => Some(Piece::Queen),
        Some(b'r' | b'R') => Some(Piece::Rook),
        Some(b'b' | b'B') => Some(Piece::Bishop),
        Some(b'n' | b'N') => Some(Piece::Knight),
        Some(_) => return Err(invalid()),
    };

    Ok(ChessMove::new(from, to, promotion))
}

/// Build a Puzzle from Lichess fields: FEN and space-separated UCI moves.
/// Every move is checked for legality while the mainline is replayed.
pub fn puzzle_from_uci(id: &str, fen: &str, moves: &str) -> Result<Puzzle, PuzzleError> {
    let initial = Board::from_str(fen).map_err(|_| PuzzleError::InvalidFen {
        fen: fen.to_string(),
    })?;

    let mut board = initial;
    let mut mainline = Vec::new();

    for (ply, uci) in moves.split_whitespace().enumerate() {
        let chess_move = parse_uci_move(uci)?;
        if !board.legal(chess_move) {
            return Err(PuzzleError::IllegalMove {
                uci: uci.to_string(),
                ply,
            });
        }
        let board_after = board.make_move_new(chess_move);
        mainline.push(PuzzleNode {
            board_before: board,
            board_after,
            chess_move,
            ply,
        });
        board = board_after;
    }

    let pov = !initial.side_to_move();
    Puzzle::new(id, pov, mainline)
}

/// A row of the Lichess puzzle CSV (`PuzzleId,FEN,Moves,...`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRecord {
    pub id: String,
    pub fen: String,
    pub moves: String,
}

impl PuzzleRecord {
    /// Parse one CSV line. Returns None for the header and blank lines.
    pub fn parse_csv_line(line: &str) -> Option<Self> {
        let mut fields = line.trim().split(',');
        let id = fields.next()?.trim();
        let fen = fields.next()?.trim();
        let moves = fields.next()?.trim();

        if id.is_empty() || id == "PuzzleId" || fen.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            fen: fen.to_string(),
            moves: moves.to_string(),
        })
    }

    pub fn to_puzzle(&self) -> Result<Puzzle, PuzzleError> {
        puzzle_from_uci(&self.id, &self.fen, &self.moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::Color;

    #[test]
    fn test_parse_uci_move() {
        let m = parse_uci_move("e2e4").unwrap();
        assert_eq!(m.get_source(), Square::E2);
        assert_eq!(m.get_dest(), Square::E4);
        assert_eq!(m.get_promotion(), None);

        let promo = parse_uci_move("a7a8n").unwrap();
        assert_eq!(promo.get_dest(), Square::A8);
        assert_eq!(promo.get_promotion(), Some(Piece::Knight));
    }

    #[test]
    fn test_parse_uci_move_rejects_garbage() {
        for bad in ["", "e2", "e2e9", "i2e4", "e2e4k", "e2e4qq", "0000"] {
            assert_eq!(
                parse_uci_move(bad).unwrap_err(),
                PuzzleError::InvalidUci { uci: bad.to_string() },
                "{bad}"
            );
        }
    }

    #[test]
    fn test_puzzle_from_uci() {
        let puzzle = puzzle_from_uci(
            "00008",
            "r6k/pp2r2p/4Rp1Q/3p4/8/1N1P2R1/PqP2bPP/7K b - - 0 24",
            "f2g3 e6e7 b2b1 b3c1 b1c1 h6c1",
        )
        .unwrap();
        assert_eq!(puzzle.pov, Color::White);
        assert_eq!(puzzle.len(), 6);
        assert_eq!(puzzle.mainline[0].board_after.get_hash(), puzzle.mainline[1].board_before.get_hash());
        assert_eq!(puzzle.mainline[5].chess_move.get_dest(), Square::C1);
    }

    #[test]
    fn test_puzzle_from_uci_errors() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(
            puzzle_from_uci("x", "not a fen", "e2e4 e7e5").unwrap_err(),
            PuzzleError::InvalidFen { fen: "not a fen".to_string() }
        );
        assert_eq!(
            puzzle_from_uci("x", start, "e2e4 e7e4").unwrap_err(),
            PuzzleError::IllegalMove { uci: "e7e4".to_string(), ply: 1 }
        );
    }

    #[test]
    fn test_parse_csv_line() {
        let header = "PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags";
        assert_eq!(PuzzleRecord::parse_csv_line(header), None);
        assert_eq!(PuzzleRecord::parse_csv_line("   "), None);

        let row = "00008,r6k/pp2r2p/4Rp1Q/3p4/8/1N1P2R1/PqP2bPP/7K b - - 0 24,f2g3 e6e7 b2b1 b3c1 b1c1 h6c1,1913,75,94,6230,crushing hangingPiece long middlegame,https://lichess.org/787zsVup/black#47,";
        let record = PuzzleRecord::parse_csv_line(row).unwrap();
        assert_eq!(record.id, "00008");
        assert_eq!(record.moves, "f2g3 e6e7 b2b1 b3c1 b1c1 h6c1");
        assert_eq!(record.to_puzzle().unwrap().len(), 6);
    }
}

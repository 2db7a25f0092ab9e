/// Puzzle data model and motif tags

pub mod cook;
pub mod extraction;

use std::fmt;

use chess::{Board, ChessMove, Color};
use serde::{Deserialize, Serialize};

use crate::board::BoardQuery;
use crate::error::PuzzleError;

/// All motif tags the classifier can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagKind {
    AdvancedPawn,
    AttackingF2F7,
    Attraction,
    CapturingDefender,
    Clearance,
    DefensiveMove,
    Deflection,
    DiscoveredAttack,
    DoubleCheck,
    EnPassant,
    ExposedKing,
    Fork,
    HangingPiece,
    Interference,
    Long,
    MateIn1,
    MateIn2,
    MateIn3,
    MateIn4,
    #[serde(rename = "mateIn5+")]
    MateIn5,
    OneMove,
    Pin,
    Promotion,
    QuietMove,
    Sacrifice,
    Short,
    Skewer,
    TrappedPiece,
    VeryLong,
}

impl TagKind {
    /// Tag identifier as stored by the puzzle database
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::AdvancedPawn => "advancedPawn",
            TagKind::AttackingF2F7 => "attackingF2F7",
            TagKind::Attraction => "attraction",
            TagKind::CapturingDefender => "capturingDefender",
            TagKind::Clearance => "clearance",
            TagKind::DefensiveMove => "defensiveMove",
            TagKind::Deflection => "deflection",
            TagKind::DiscoveredAttack => "discoveredAttack",
            TagKind::DoubleCheck => "doubleCheck",
            TagKind::EnPassant => "enPassant",
            TagKind::ExposedKing => "exposedKing",
            TagKind::Fork => "fork",
            TagKind::HangingPiece => "hangingPiece",
            TagKind::Interference => "interference",
            TagKind::Long => "long",
            TagKind::MateIn1 => "mateIn1",
            TagKind::MateIn2 => "mateIn2",
            TagKind::MateIn3 => "mateIn3",
            TagKind::MateIn4 => "mateIn4",
            TagKind::MateIn5 => "mateIn5+",
            TagKind::OneMove => "oneMove",
            TagKind::Pin => "pin",
            TagKind::Promotion => "promotion",
            TagKind::QuietMove => "quietMove",
            TagKind::Sacrifice => "sacrifice",
            TagKind::Short => "short",
            TagKind::Skewer => "skewer",
            TagKind::TrappedPiece => "trappedPiece",
            TagKind::VeryLong => "veryLong",
        }
    }

    /// Is this one of the mainline-length tags?
    pub fn is_length(&self) -> bool {
        matches!(
            self,
            TagKind::OneMove | TagKind::Short | TagKind::Long | TagKind::VeryLong
        )
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node in the puzzle mainline
#[derive(Debug, Clone)]
pub struct PuzzleNode<B = Board> {
    /// Board state BEFORE this move
    pub board_before: B,
    /// Board state AFTER this move
    pub board_after: B,
    /// The move played
    pub chess_move: ChessMove,
    /// Ply index in the puzzle (0 = opponent's setup move, 1 = first solver move, etc.)
    pub ply: usize,
}

impl<B: BoardQuery> PuzzleNode<B> {
    /// Side to move at this ply, before its move is played (the mover)
    pub fn turn(&self) -> Color {
        self.board_before.side_to_move()
    }

    /// Side to move once this ply's move is on the board
    pub fn turn_after(&self) -> Color {
        self.board_after.side_to_move()
    }
}

/// A chess puzzle with its solution line
#[derive(Debug, Clone)]
pub struct Puzzle<B = Board> {
    /// Puzzle identifier
    pub id: String,
    /// The mainline: [opponent_setup, solver_move_1, opp_response_1, solver_move_2, ...]
    pub mainline: Vec<PuzzleNode<B>>,
    /// The side solving the puzzle (the mover of ply 1)
    pub pov: Color,
}

impl<B: BoardQuery> Puzzle<B> {
    /// Build a puzzle and check the mainline invariants
    pub fn new(id: impl Into<String>, pov: Color, mainline: Vec<PuzzleNode<B>>) -> Result<Self, PuzzleError> {
        let puzzle = Self {
            id: id.into(),
            mainline,
            pov,
        };
        puzzle.validate()?;
        Ok(puzzle)
    }

    /// Check that the mainline is long enough, numbered, alternating and
    /// continuous, and that pov plays ply 1.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let len = self.mainline.len();
        if len < extraction::MIN_PUZZLE_LENGTH {
            return Err(PuzzleError::TooShort {
                id: self.id.clone(),
                len,
            });
        }

        for (i, node) in self.mainline.iter().enumerate() {
            if node.ply != i {
                return Err(PuzzleError::Discontinuous {
                    id: self.id.clone(),
                    ply: i,
                });
            }
            if node.turn() == node.turn_after() {
                return Err(PuzzleError::NotAlternating {
                    id: self.id.clone(),
                    ply: i,
                });
            }
            if i == 0 {
                continue;
            }

            let prev = &self.mainline[i - 1];
            if node.turn() == prev.turn() {
                return Err(PuzzleError::NotAlternating {
                    id: self.id.clone(),
                    ply: i,
                });
            }
            if node.board_before.occupied() != prev.board_after.occupied() {
                return Err(PuzzleError::Discontinuous {
                    id: self.id.clone(),
                    ply: i,
                });
            }
        }

        if self.mainline[1].turn() != self.pov {
            return Err(PuzzleError::PovMismatch { id: self.id.clone() });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mainline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mainline.is_empty()
    }

    /// Node at a ply index
    pub fn node(&self, index: usize) -> Result<&PuzzleNode<B>, PuzzleError> {
        self.mainline.get(index).ok_or(PuzzleError::PlyOutOfRange {
            index,
            len: self.mainline.len(),
        })
    }

    /// The ply before `node`, none for ply 0
    pub fn parent(&self, node: &PuzzleNode<B>) -> Option<&PuzzleNode<B>> {
        node.ply.checked_sub(1).and_then(|i| self.mainline.get(i))
    }

    pub fn next_node(&self, node: &PuzzleNode<B>) -> Option<&PuzzleNode<B>> {
        self.mainline.get(node.ply + 1)
    }

    pub fn next_next_node(&self, node: &PuzzleNode<B>) -> Option<&PuzzleNode<B>> {
        self.mainline.get(node.ply + 2)
    }

    /// Is `node` the final ply of the mainline?
    pub fn is_end(&self, node: &PuzzleNode<B>) -> bool {
        node.ply + 1 == self.mainline.len()
    }

    /// Get solver's moves (odd indices: 1, 3, 5, ...)
    pub fn solver_moves(&self) -> Vec<&PuzzleNode<B>> {
        self.mainline.iter().skip(1).step_by(2).collect()
    }

    /// Get opponent's moves (even indices: 0, 2, 4, ...)
    pub fn opponent_moves(&self) -> Vec<&PuzzleNode<B>> {
        self.mainline.iter().step_by(2).collect()
    }

    /// The position the solver starts from (after the setup move)
    pub fn start_board(&self) -> Option<&B> {
        self.mainline.first().map(|n| &n.board_after)
    }

    /// Get the final board position
    pub fn end_board(&self) -> Option<&B> {
        self.mainline.last().map(|n| &n.board_after)
    }

    /// Link used in logs to look the puzzle up
    pub fn trace_url(&self, base: &str) -> String {
        format!("{}{}", base, self.id)
    }
}

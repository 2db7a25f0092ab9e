/// Cook orchestrator: validates a puzzle, calls the tactical detectors in a
/// fixed order and builds the tag list

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Puzzle, TagKind};
use crate::board::BoardQuery;
use crate::config::DEFAULT_PUZZLE_URL_BASE;
use crate::error::PuzzleError;
use crate::tactics;

/// One classified puzzle, as written by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookedPuzzle {
    pub id: String,
    pub tags: Vec<TagKind>,
}

/// Analyze a puzzle and return all applicable tags
pub fn cook<B: BoardQuery>(puzzle: &Puzzle<B>) -> Result<Vec<TagKind>, PuzzleError> {
    cook_traced(puzzle, DEFAULT_PUZZLE_URL_BASE)
}

/// Same as [`cook`], logging the puzzle under `url_base`
pub fn cook_traced<B: BoardQuery>(
    puzzle: &Puzzle<B>,
    url_base: &str,
) -> Result<Vec<TagKind>, PuzzleError> {
    puzzle.validate()?;
    debug!(puzzle_id = %puzzle.id, url = %puzzle.trace_url(url_base), "Cooking puzzle");

    let mut tags = Vec::new();

    if let Some(mate_tag) = tactics::simple::mate_in(puzzle) {
        tags.push(mate_tag);
    }

    if tactics::simple::double_check(puzzle) {
        tags.push(TagKind::DoubleCheck);
    }

    if tactics::material::sacrifice(puzzle) {
        tags.push(TagKind::Sacrifice);
    }

    if tactics::attacks::fork(puzzle) {
        tags.push(TagKind::Fork);
    }

    if tactics::attacks::hanging_piece(puzzle) {
        tags.push(TagKind::HangingPiece);
    }

    if tactics::attacks::trapped_piece(puzzle) {
        tags.push(TagKind::TrappedPiece);
    }

    if tactics::line_geometry::discovered_attack(puzzle) {
        tags.push(TagKind::DiscoveredAttack);
    }

    if tactics::positional::quiet_move(puzzle) {
        tags.push(TagKind::QuietMove);
    }

    if tactics::positional::defensive_move(puzzle) {
        tags.push(TagKind::DefensiveMove);
    }

    if tactics::positional::attraction(puzzle) {
        tags.push(TagKind::Attraction);
    }

    if tactics::positional::deflection(puzzle) {
        tags.push(TagKind::Deflection);
    }

    if tactics::simple::advanced_pawn(puzzle) {
        tags.push(TagKind::AdvancedPawn);
    }

    if tactics::material::exposed_king(puzzle) {
        tags.push(TagKind::ExposedKing);
    }

    if tactics::line_geometry::skewer(puzzle) {
        tags.push(TagKind::Skewer);
    }

    if tactics::positional::self_interference(puzzle) || tactics::positional::interference(puzzle) {
        tags.push(TagKind::Interference);
    }

    if tactics::pins::pin(puzzle) {
        tags.push(TagKind::Pin);
    }

    if tactics::simple::attacking_f2_f7(puzzle) {
        tags.push(TagKind::AttackingF2F7);
    }

    if tactics::positional::clearance(puzzle) {
        tags.push(TagKind::Clearance);
    }

    if tactics::simple::en_passant(puzzle) {
        tags.push(TagKind::EnPassant);
    }

    if tactics::simple::promotion(puzzle) {
        tags.push(TagKind::Promotion);
    }

    if tactics::attacks::capturing_defender(puzzle) {
        tags.push(TagKind::CapturingDefender);
    }

    tags.push(length_tag(puzzle.len()));

    debug!(puzzle_id = %puzzle.id, tags = ?tags, "Cooked puzzle");
    Ok(tags)
}

/// Length tag for a mainline of `len` plies
pub fn length_tag(len: usize) -> TagKind {
    match len {
        2 => TagKind::OneMove,
        4 => TagKind::Short,
        n if n >= 8 => TagKind::VeryLong,
        _ => TagKind::Long,
    }
}

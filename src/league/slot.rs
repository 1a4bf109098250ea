// Player positions and lineup slots.
//
// ESPN encodes both as small integers; the mapping tables here cover the
// standard-league subset this bot understands. IDP slots are not modeled.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A player's primary NFL position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Dst,
    K,
    /// Anything this bot doesn't slot (IDP positions, long snappers, ...).
    /// Never eligible for a modeled starting slot.
    Unknown,
}

impl Position {
    /// Map ESPN's `defaultPositionId`.
    pub fn from_espn_id(id: u8) -> Self {
        match id {
            1 => Position::Qb,
            2 => Position::Rb,
            3 => Position::Wr,
            4 => Position::Te,
            5 => Position::K,
            16 => Position::Dst,
            _ => Position::Unknown,
        }
    }

    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s {
            "QB" => Some(Position::Qb),
            "RB" => Some(Position::Rb),
            "WR" => Some(Position::Wr),
            "TE" => Some(Position::Te),
            "D/ST" | "DST" => Some(Position::Dst),
            "K" => Some(Position::K),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Dst => "D/ST",
            Position::K => "K",
            Position::Unknown => "?",
        }
    }
}

// ---------------------------------------------------------------------------
// SlotId
// ---------------------------------------------------------------------------

/// A lineup slot: where a rostered player actually sits for the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotId {
    Qb,
    Rb,
    Wr,
    Te,
    /// RB/WR/TE flex.
    Flex,
    /// "Offensive Player" superflex: QB/RB/WR/TE.
    Op,
    Dst,
    K,
    Bench,
    Ir,
}

/// Display order for lineup listings: starters by position, then bench, IR.
pub const SLOT_DISPLAY_ORDER: &[SlotId] = &[
    SlotId::Qb,
    SlotId::Rb,
    SlotId::Wr,
    SlotId::Te,
    SlotId::Flex,
    SlotId::Op,
    SlotId::Dst,
    SlotId::K,
    SlotId::Bench,
    SlotId::Ir,
];

impl SlotId {
    /// Map ESPN's `lineupSlotId`.
    pub fn from_espn_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SlotId::Qb),
            2 => Some(SlotId::Rb),
            4 => Some(SlotId::Wr),
            6 => Some(SlotId::Te),
            7 => Some(SlotId::Op),
            16 => Some(SlotId::Dst),
            17 => Some(SlotId::K),
            20 => Some(SlotId::Bench),
            21 => Some(SlotId::Ir),
            23 => Some(SlotId::Flex),
            _ => None,
        }
    }

    /// True for slots whose points count toward the weekly score.
    pub fn is_starting(&self) -> bool {
        !matches!(self, SlotId::Bench | SlotId::Ir)
    }

    pub fn is_flex(&self) -> bool {
        matches!(self, SlotId::Flex | SlotId::Op)
    }

    /// Positions that may legally occupy this slot. Bench and IR accept
    /// anyone; they are never filled by the optimizer.
    pub fn eligible_positions(&self) -> &'static [Position] {
        match self {
            SlotId::Qb => &[Position::Qb],
            SlotId::Rb => &[Position::Rb],
            SlotId::Wr => &[Position::Wr],
            SlotId::Te => &[Position::Te],
            SlotId::Flex => &[Position::Rb, Position::Wr, Position::Te],
            SlotId::Op => &[Position::Qb, Position::Rb, Position::Wr, Position::Te],
            SlotId::Dst => &[Position::Dst],
            SlotId::K => &[Position::K],
            SlotId::Bench | SlotId::Ir => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotId::Qb => "QB",
            SlotId::Rb => "RB",
            SlotId::Wr => "WR",
            SlotId::Te => "TE",
            SlotId::Flex => "FLEX",
            SlotId::Op => "OP",
            SlotId::Dst => "D/ST",
            SlotId::K => "K",
            SlotId::Bench => "BE",
            SlotId::Ir => "IR",
        }
    }

    /// Index into `SLOT_DISPLAY_ORDER`, for sorting lineup listings.
    pub fn display_rank(&self) -> usize {
        SLOT_DISPLAY_ORDER
            .iter()
            .position(|s| s == self)
            .unwrap_or(SLOT_DISPLAY_ORDER.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Core data model (spec.md §3): cards, players, pots, and the session a
//! `PokerStateMachine` operates over.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::errors::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Result<Suit, EngineError> {
        match value {
            0 => Ok(Suit::Club),
            1 => Ok(Suit::Diamond),
            2 => Ok(Suit::Heart),
            3 => Ok(Suit::Spade),
            other => Err(EngineError::InvalidCard { suit: other, rank: 0 }),
        }
    }
}

/// `rank = 0` is the face-down sentinel; otherwise 1..=13 with 1 read as
/// Ace (high, except as the bottom card of a 5-4-3-2-A wheel straight).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
}

pub const FACE_DOWN: Card = Card {
    suit: Suit::Club,
    rank: 0,
};

impl Card {
    pub fn new(suit: u8, rank: u8) -> Result<Card, EngineError> {
        if suit > 3 || !(1..=13).contains(&rank) {
            return Err(EngineError::InvalidCard { suit, rank });
        }
        Ok(Card {
            suit: Suit::from_u8(suit)?,
            rank,
        })
    }

    /// Bijection to 1..=52: `suit * 13 + rank`.
    pub fn to_int(self) -> u16 {
        self.suit.as_u8() as u16 * 13 + self.rank as u16
    }

    pub fn from_int(raw: u16) -> Result<Card, EngineError> {
        if !(1..=52).contains(&raw) {
            return Err(EngineError::InvalidCard {
                suit: 0,
                rank: raw as u8,
            });
        }
        let zero_based = raw - 1;
        let suit = (zero_based / 13) as u8;
        let rank = (zero_based % 13) as u8 + 1;
        Card::new(suit, rank)
    }

    /// Ace-high numeric value (2..=14) used for straight/high-card
    /// comparisons; the raw `rank` stays 1 for Ace everywhere else.
    pub fn value(self) -> u8 {
        if self.rank == 1 {
            14
        } else {
            self.rank
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Round {
    pub fn next(self) -> Round {
        match self {
            Round::PreFlop => Round::Flop,
            Round::Flop => Round::Turn,
            Round::Turn => Round::River,
            Round::River => Round::Showdown,
            Round::Showdown => Round::PreFlop,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Bet,
    Call,
    Raise,
    AllIn,
    Fold,
    Check,
    Ban,
    Showdown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerAction {
    pub round: Round,
    pub player_id: usize,
    pub kind: ActionKind,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub hand: [Card; 2],
    pub has_folded: bool,
    pub bet: u64,
    pub bankroll: u64,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, bankroll: u64) -> Player {
        Player {
            id,
            name: name.into(),
            hand: [FACE_DOWN; 2],
            has_folded: false,
            bet: 0,
            bankroll,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.has_folded && self.bankroll > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u64,
    pub eligible: BTreeSet<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub board: [Card; 5],
    pub players: Vec<Player>,
    pub pots: Vec<Pot>,
    pub highest_bet: u64,
    pub last_to_raise: usize,
    pub dealer: usize,
    pub current_turn: usize,
    pub round: Round,
}

impl Session {
    pub fn new(players: Vec<Player>) -> Session {
        Session {
            board: [FACE_DOWN; 5],
            players,
            pots: Vec::new(),
            highest_bet: 0,
            last_to_raise: 0,
            dealer: 0,
            current_turn: 0,
            round: Round::PreFlop,
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_turn]
    }

    pub fn find_player_index(&self, player_id: usize) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn non_folded_count(&self) -> usize {
        self.players.iter().filter(|p| !p.has_folded).count()
    }
}

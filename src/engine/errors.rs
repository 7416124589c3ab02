//! Validation/application error taxonomy for the poker state machine
//! (spec.md §7 "Rules" row). Every `validate` failure becomes a Vote
//! Reject reason string one level up, in `Consensus::on_receive_proposal`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("card suit {suit} / rank {rank} out of range")]
    InvalidCard { suit: u8, rank: u8 },

    #[error("action round {action_round:?} does not match session round {session_round:?}")]
    WrongRound {
        action_round: crate::engine::types::Round,
        session_round: crate::engine::types::Round,
    },

    #[error("player {0} is not part of this session")]
    UnknownPlayer(usize),

    #[error("it is not player {0}'s turn")]
    NotPlayersTurn(usize),

    #[error("bet amount {amount} exceeds bankroll {bankroll}")]
    BetExceedsBankroll { amount: u64, bankroll: u64 },

    #[error("raise amount {amount} does not exceed highest bet {highest_bet}")]
    RaiseTooLow { amount: u64, highest_bet: u64 },

    #[error("raise amount {amount} exceeds bankroll {bankroll}")]
    RaiseExceedsBankroll { amount: u64, bankroll: u64 },

    #[error("call of {shortfall} exceeds bankroll {bankroll}")]
    CallExceedsBankroll { shortfall: u64, bankroll: u64 },

    #[error("all-in amount {amount} does not equal bankroll+bet {expected}")]
    BadAllInAmount { amount: u64, expected: u64 },

    #[error("check is illegal with an outstanding bet of {highest_bet}, player bet is {bet}")]
    CheckWithOutstandingBet { bet: u64, highest_bet: u64 },

    #[error("showdown proposed outside the Showdown round")]
    ShowdownOutOfRound,

    #[error("no hand evaluator result available for player {0}")]
    MissingEvaluation(usize),
}

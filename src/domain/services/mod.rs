//! Domain services - Pure rule computations over the game aggregate

pub mod role_assignment;
pub mod vote_tally;
pub mod win_evaluator;

pub use role_assignment::{assign_roles, build_role_list, parse_role_counts};
pub use vote_tally::{tally, TallyPolicy};
pub use win_evaluator::{check_win, evaluate_win};

//! Notices - Everything the engine tells players
//!
//! A notice only carries keys and raw values. Turning it into text is left to
//! the transport, which renders it through a `LocalizationPort`. Templates may
//! contain `{name}`-style placeholders that `render` fills in.

use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::LocalizationPort;
use crate::domain::entities::Role;
use crate::domain::value_objects::{Faction, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    // ========================================================================
    // Setup
    // ========================================================================
    /// Private: the role a player was dealt
    RoleReveal { role: Role },

    // ========================================================================
    // Night
    // ========================================================================
    NightStarted { turn: u32 },
    /// Private: sent to everyone alive at dusk once the night is over
    NightEnded,
    /// Private: the protector's choice was recorded
    GuardSet { target: String },
    /// Private: what a fortune check revealed
    FortuneResult { target: String, revealed: Faction },
    /// Private: what the medium learned about the last executed player
    MediumResult { target: String, revealed: Faction },
    /// Private: sent to every attacker, blocked or not
    AttackAttempted { target: String },

    // ========================================================================
    // Day
    // ========================================================================
    DayStarted { turn: u32, victims: Vec<String> },
    BreadDelivered,
    NoBread,
    Executed { target: String },
    NoExecution,
    /// A death caused by a role ability during the day
    AbilityDeath { target: String, status: PlayerStatus },

    // ========================================================================
    // Voting
    // ========================================================================
    /// Private: the ballot was refused; `reason` is a localization key
    BallotRejected { reason: String },

    // ========================================================================
    // End of game
    // ========================================================================
    GameOver { faction: Faction, winners: Vec<String> },
    FinalResult {
        player: String,
        status: PlayerStatus,
        role: Option<Role>,
    },
}

impl Notice {
    /// Localization key of the notice's main template
    pub fn key(&self) -> &'static str {
        match self {
            Notice::RoleReveal { .. } => "RoleReveal",
            Notice::NightStarted { .. } => "NightStarted",
            Notice::NightEnded => "NightEnded",
            Notice::GuardSet { .. } => "GuardSet",
            Notice::FortuneResult { .. } => "FortuneResult",
            Notice::MediumResult { .. } => "MediumResult",
            Notice::AttackAttempted { .. } => "AttackAttempted",
            Notice::DayStarted { .. } => "DayStarted",
            Notice::BreadDelivered => "BreadDelivered",
            Notice::NoBread => "NoBread",
            Notice::Executed { .. } => "ExecutionResult",
            Notice::NoExecution => "NoExecution",
            Notice::AbilityDeath { .. } => "AbilityDeath",
            Notice::BallotRejected { .. } => "BallotRejected",
            Notice::GameOver { .. } => "GameOver",
            Notice::FinalResult { .. } => "FinalResult",
        }
    }

    /// Render the notice as display text for `locale`
    pub fn render(&self, localization: &dyn LocalizationPort, locale: &str) -> String {
        let t = |key: &str| localization.resolve(key, locale);
        let template = t(self.key());

        match self {
            Notice::RoleReveal { role } => fill(
                &template,
                &[
                    ("role", t(role.key())),
                    ("description", t(&role.description_key())),
                    ("faction", t(role.faction().key())),
                    ("win_condition", t(role.win_condition_key())),
                ],
            ),
            Notice::NightStarted { turn } => fill(&template, &[("turn", (turn + 1).to_string())]),
            Notice::GuardSet { target }
            | Notice::AttackAttempted { target }
            | Notice::Executed { target } => fill(&template, &[("target", target.clone())]),
            Notice::FortuneResult { target, revealed } | Notice::MediumResult { target, revealed } => {
                fill(
                    &template,
                    &[("target", target.clone()), ("faction", t(revealed.key()))],
                )
            }
            Notice::DayStarted { turn, victims } => {
                let victims = if victims.is_empty() {
                    t("NoVictims")
                } else {
                    victims.join(", ")
                };
                fill(&template, &[("turn", turn.to_string()), ("victims", victims)])
            }
            Notice::AbilityDeath { target, status } => fill(
                &template,
                &[("target", target.clone()), ("status", t(status.key()))],
            ),
            Notice::BallotRejected { reason } => fill(&template, &[("reason", t(reason))]),
            Notice::GameOver { faction, winners } => fill(
                &template,
                &[("faction", t(faction.key())), ("winners", winners.join(", "))],
            ),
            Notice::FinalResult { player, status, role } => fill(
                &template,
                &[
                    ("player", player.clone()),
                    ("status", t(status.key())),
                    ("role", role.map(|r| t(r.key())).unwrap_or_default()),
                ],
            ),
            Notice::NightEnded | Notice::BreadDelivered | Notice::NoBread | Notice::NoExecution => {
                template
            }
        }
    }
}

fn fill(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedStrings(HashMap<&'static str, &'static str>);

    impl LocalizationPort for FixedStrings {
        fn resolve(&self, key: &str, _locale: &str) -> String {
            self.0.get(key).map(|s| s.to_string()).unwrap_or_else(|| key.to_string())
        }
    }

    fn strings() -> FixedStrings {
        FixedStrings(HashMap::from([
            ("FortuneResult", "{target} is {faction}"),
            ("TeamWerewolf", "a werewolf"),
            ("DayStarted", "Day {turn}. Died: {victims}"),
            ("NoVictims", "nobody"),
        ]))
    }

    #[test]
    fn test_render_fills_placeholders() {
        let notice = Notice::FortuneResult {
            target: "alice".to_string(),
            revealed: Faction::Werewolf,
        };
        assert_eq!(notice.render(&strings(), "en"), "alice is a werewolf");
    }

    #[test]
    fn test_render_empty_victim_list() {
        let quiet = Notice::DayStarted { turn: 1, victims: Vec::new() };
        assert_eq!(quiet.render(&strings(), "en"), "Day 1. Died: nobody");

        let bloody = Notice::DayStarted {
            turn: 2,
            victims: vec!["bob".to_string(), "carol".to_string()],
        };
        assert_eq!(bloody.render(&strings(), "en"), "Day 2. Died: bob, carol");
    }

    #[test]
    fn test_missing_template_falls_back_to_key() {
        assert_eq!(Notice::NoExecution.render(&strings(), "en"), "NoExecution");
    }
}

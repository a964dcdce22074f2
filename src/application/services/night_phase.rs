//! Night phase - Role abilities, then the collective attack
//!
//! Night abilities are asked for all at once and only applied after every
//! answer is in, in a fixed order: guards first so that a protection chosen
//! the same night always counts, then divinations, then the medium. The
//! attack vote follows as a second round, from the second night on.

use std::collections::HashMap;

use rand::rngs::StdRng;

use crate::application::dto::{ChoicePurpose, ChoiceRequest, Notice};
use crate::application::services::phase_messenger::PhaseMessenger;
use crate::domain::aggregates::Game;
use crate::domain::entities::{NightAction, NightReport};
use crate::domain::errors::GameError;
use crate::domain::events::DomainEvent;
use crate::domain::services::{tally, TallyPolicy};
use crate::domain::value_objects::{BallotBox, PlayerId};

pub struct NightPhase<'a> {
    game: &'a mut Game,
    messenger: &'a PhaseMessenger<'a>,
    rng: &'a mut StdRng,
}

impl<'a> NightPhase<'a> {
    pub fn new(game: &'a mut Game, messenger: &'a PhaseMessenger<'a>, rng: &'a mut StdRng) -> Self {
        Self { game, messenger, rng }
    }

    pub async fn run(mut self) -> Result<(), GameError> {
        let turn = self.game.turn();
        tracing::info!(game_id = %self.game.id(), turn, "Night started");
        self.game.record(|metadata| DomainEvent::NightStarted { metadata });
        self.messenger.channel(Notice::NightStarted { turn }).await;

        self.resolve_abilities().await?;

        if turn == 0 {
            tracing::debug!(game_id = %self.game.id(), "First night, no attack");
        } else {
            self.resolve_attack().await?;
        }

        self.game.refresh_alive_players();
        self.game.record(|metadata| DomainEvent::NightEnded { metadata });
        self.game.advance_turn();

        // Everyone who was alive at dusk hears that the night is over,
        // including tonight's victim
        for player in self.game.last_alive_player_ids().to_vec() {
            self.messenger.direct(player, Notice::NightEnded).await;
        }
        Ok(())
    }

    async fn resolve_abilities(&mut self) -> Result<(), GameError> {
        let mut actions: Vec<(PlayerId, NightAction)> = self
            .game
            .alive_players()
            .filter_map(|p| p.role().and_then(|r| r.night_action()).map(|action| (p.id, action)))
            .collect();

        let requests = actions
            .iter()
            .filter_map(|&(actor, action)| self.target_request(actor, action).map(|request| (actor, request)))
            .collect();
        let targets: HashMap<PlayerId, Option<PlayerId>> =
            self.messenger.ask_all(requests).await?.into_iter().collect();

        actions.sort_by_key(|(_, action)| *action);
        for (actor, _) in actions {
            let target = targets.get(&actor).copied().flatten();
            let Some(report) = self.game.perform_night_action(actor, target, &mut *self.rng)? else {
                continue;
            };
            let notice = self.notice_for(report)?;
            self.messenger.direct(actor, notice).await;
        }
        Ok(())
    }

    /// The choice an action asks its owner for, if it needs a target
    fn target_request(&self, actor: PlayerId, action: NightAction) -> Option<ChoiceRequest> {
        match action {
            NightAction::Guard => Some(ChoiceRequest::among_alive(self.game, ChoicePurpose::Guard, false, |_| true)),
            NightAction::Divine => Some(ChoiceRequest::among_alive(
                self.game,
                ChoicePurpose::Divine,
                false,
                |p| p.id != actor,
            )),
            NightAction::Medium => None,
        }
    }

    fn notice_for(&self, report: NightReport) -> Result<Notice, GameError> {
        Ok(match report {
            NightReport::Guarded { target } => Notice::GuardSet {
                target: self.name_of(target)?,
            },
            NightReport::Divined { target, revealed } => Notice::FortuneResult {
                target: self.name_of(target)?,
                revealed,
            },
            NightReport::MediumRead { target, revealed } => Notice::MediumResult {
                target: self.name_of(target)?,
                revealed,
            },
        })
    }

    async fn resolve_attack(&mut self) -> Result<(), GameError> {
        let attackers: Vec<PlayerId> = self.game.alive_attackers().map(|p| p.id).collect();
        if attackers.is_empty() {
            return Ok(());
        }

        let request = ChoiceRequest::among_alive(self.game, ChoicePurpose::Attack, true, |p| !p.is_attacker());
        let mut ballot_box = BallotBox::open(attackers.iter().copied(), request.candidate_ids(), true);
        self.messenger
            .collect_ballots(&request, &mut ballot_box, &attackers)
            .await?;

        let ballots = ballot_box.close();
        let Some(target) = tally(&ballots, TallyPolicy::RandomTieBreak, &mut *self.rng) else {
            tracing::info!(game_id = %self.game.id(), "No attack target chosen");
            self.game.record(|metadata| DomainEvent::NoAttack { metadata });
            return Ok(());
        };

        let killed = self.game.attack(target, &mut *self.rng)?;
        tracing::info!(game_id = %self.game.id(), player_id = %target, killed, "Attack resolved");

        let name = self.name_of(target)?;
        for attacker in &attackers {
            self.messenger
                .direct(*attacker, Notice::AttackAttempted { target: name.clone() })
                .await;
        }
        Ok(())
    }

    fn name_of(&self, id: PlayerId) -> Result<String, GameError> {
        Ok(self.game.require_player(id)?.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::game::test_support::game_with_roles;
    use crate::domain::entities::Role;
    use crate::domain::value_objects::{BallotChoice, Faction, PlayerStatus};
    use crate::infrastructure::localization::TranslationTable;
    use crate::infrastructure::messaging::BotMessenger;
    use rand::SeedableRng;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn id(n: u64) -> PlayerId {
        PlayerId::new(n)
    }

    fn bots() -> BotMessenger {
        BotMessenger::new(Arc::new(TranslationTable::builtin()), "en", Some(5))
    }

    async fn run_night(game: &mut Game, bots: &BotMessenger) -> Result<(), GameError> {
        let cancel = CancellationToken::new();
        let messenger = PhaseMessenger::new(bots, Duration::from_secs(30), &cancel);
        let mut rng = StdRng::seed_from_u64(9);
        NightPhase::new(game, &messenger, &mut rng).run().await
    }

    #[tokio::test]
    async fn test_first_night_has_no_attack_vote() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Seer, Role::Villager, Role::Villager]);
        let bots = bots();

        run_night(&mut game, &bots).await.unwrap();

        assert_eq!(game.turn(), 1);
        assert_eq!(game.alive_player_ids().len(), 4);
        let purposes: Vec<ChoicePurpose> = bots.choice_log().await.into_iter().map(|(_, p)| p).collect();
        assert_eq!(purposes, vec![ChoicePurpose::Divine]);
        assert!(!game
            .events()
            .iter()
            .any(|e| matches!(e, DomainEvent::PlayerKilled { .. } | DomainEvent::NoAttack { .. })));
    }

    #[tokio::test]
    async fn test_second_night_attacks() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Villager]);
        game.advance_turn();
        let bots = bots();
        bots.script(id(1), [BallotChoice::Target(id(3))]).await;

        run_night(&mut game, &bots).await.unwrap();

        assert_eq!(game.player(id(3)).unwrap().status(), PlayerStatus::Killed);
        assert_eq!(game.alive_player_ids(), vec![id(1), id(2), id(4)]);
        assert_eq!(game.died_since_snapshot(), vec![id(3)]);
        // The victim still hears the night close
        let closing: Vec<PlayerId> = bots
            .transcript()
            .await
            .into_iter()
            .filter(|entry| entry.notice == Notice::NightEnded)
            .filter_map(|entry| entry.recipient.player())
            .collect();
        assert_eq!(closing, vec![id(1), id(2), id(3), id(4)]);
    }

    #[tokio::test]
    async fn test_guarded_target_survives() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Hunter, Role::Villager, Role::Villager]);
        game.advance_turn();
        let bots = bots();
        bots.script(id(2), [BallotChoice::Target(id(3))]).await;
        bots.script(id(1), [BallotChoice::Target(id(3))]).await;

        run_night(&mut game, &bots).await.unwrap();

        let target = game.player(id(3)).unwrap();
        assert!(target.is_alive());
        assert_eq!(target.status(), PlayerStatus::Alive);
        assert!(game.events().iter().any(|e| matches!(e, DomainEvent::AttackBlocked { .. })));

        // Attackers only hear that the attack was attempted
        let attacker_notices: Vec<Notice> = bots
            .transcript()
            .await
            .into_iter()
            .filter(|entry| entry.recipient.player() == Some(id(1)))
            .map(|entry| entry.notice)
            .collect();
        assert!(attacker_notices.contains(&Notice::AttackAttempted {
            target: "player3".to_string()
        }));
    }

    #[tokio::test]
    async fn test_seer_learns_and_curses_fox() {
        let mut game = game_with_roles(&[Role::Seer, Role::Fox, Role::Werewolf, Role::Villager]);
        let bots = bots();
        bots.script(id(1), [BallotChoice::Target(id(2))]).await;

        run_night(&mut game, &bots).await.unwrap();

        assert_eq!(game.player(id(2)).unwrap().status(), PlayerStatus::Cursed);
        let seer_notices: Vec<Notice> = bots
            .transcript()
            .await
            .into_iter()
            .filter(|entry| entry.recipient.player() == Some(id(1)))
            .map(|entry| entry.notice)
            .collect();
        assert!(seer_notices.contains(&Notice::FortuneResult {
            target: "player2".to_string(),
            revealed: Faction::Villager,
        }));
    }

    #[tokio::test]
    async fn test_medium_reads_last_executed() {
        let mut game = game_with_roles(&[Role::Medium, Role::Werewolf, Role::Werewolf, Role::Villager, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);
        game.execute(id(2), &mut rng).unwrap();
        game.snapshot_last_alive();
        game.advance_turn();
        let bots = bots();

        run_night(&mut game, &bots).await.unwrap();

        assert!(game.events().iter().any(|e| matches!(
            e,
            DomainEvent::MediumRevealed { revealed: Faction::Werewolf, .. }
        )));
    }

    #[tokio::test]
    async fn test_invalid_ability_target_is_asked_again() {
        let mut game = game_with_roles(&[Role::Seer, Role::Werewolf, Role::Villager, Role::Villager]);
        let bots = bots();
        // Divining yourself is not on offer
        bots.script(id(1), [BallotChoice::Target(id(1)), BallotChoice::Target(id(2))]).await;

        run_night(&mut game, &bots).await.unwrap();

        let checked: Vec<PlayerId> = game
            .events()
            .iter()
            .filter_map(|e| match e {
                DomainEvent::FortuneChecked { target_id, .. } => Some(*target_id),
                _ => None,
            })
            .collect();
        assert_eq!(checked, vec![id(2)]);
        assert_eq!(bots.choice_log().await.len(), 2);
        let rejected = bots
            .transcript()
            .await
            .into_iter()
            .any(|entry| matches!(entry.notice, Notice::BallotRejected { .. }));
        assert!(rejected);
    }
}

//! Day phase - Morning announcement and the execution vote

use rand::rngs::StdRng;

use crate::application::dto::{ChoicePurpose, ChoiceRequest, Notice};
use crate::application::services::phase_messenger::PhaseMessenger;
use crate::domain::aggregates::Game;
use crate::domain::entities::Role;
use crate::domain::errors::GameError;
use crate::domain::services::{tally, TallyPolicy};
use crate::domain::value_objects::{BallotBox, PlayerId};

pub struct DayPhase<'a> {
    game: &'a mut Game,
    messenger: &'a PhaseMessenger<'a>,
    rng: &'a mut StdRng,
}

impl<'a> DayPhase<'a> {
    pub fn new(game: &'a mut Game, messenger: &'a PhaseMessenger<'a>, rng: &'a mut StdRng) -> Self {
        Self { game, messenger, rng }
    }

    pub async fn run(mut self) -> Result<(), GameError> {
        self.announce_morning().await?;
        self.resolve_execution().await?;

        // Protections only last one cycle
        self.game.reset_protections();
        self.game.snapshot_last_alive();
        Ok(())
    }

    async fn announce_morning(&mut self) -> Result<(), GameError> {
        let turn = self.game.turn();
        let victims = self
            .game
            .died_since_snapshot()
            .into_iter()
            .map(|id| self.game.require_player(id).map(|p| p.name.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(game_id = %self.game.id(), turn, victims = ?victims, "Day started");
        self.messenger.channel(Notice::DayStarted { turn, victims }).await;

        let bakery_alive = self.game.alive_players().any(|p| p.role() == Some(Role::Bakery));
        if bakery_alive {
            self.messenger.channel(Notice::BreadDelivered).await;
        } else if self.game.has_assigned(Role::Bakery) {
            self.messenger.channel(Notice::NoBread).await;
        }
        Ok(())
    }

    async fn resolve_execution(&mut self) -> Result<(), GameError> {
        let voters = self.game.alive_player_ids();
        let request = ChoiceRequest::among_alive(self.game, ChoicePurpose::Execute, true, |_| true);
        let mut ballot_box = BallotBox::open(voters.iter().copied(), request.candidate_ids(), true);
        self.messenger
            .collect_ballots(&request, &mut ballot_box, &voters)
            .await?;

        let ballots = ballot_box.close();
        let Some(target) = tally(&ballots, TallyPolicy::NoResultOnSkipOrTie, &mut *self.rng) else {
            tracing::info!(game_id = %self.game.id(), ballots = ballots.len(), "Nobody was executed");
            self.game.record_no_execution();
            self.messenger.channel(Notice::NoExecution).await;
            return Ok(());
        };

        self.game.execute(target, &mut *self.rng)?;
        tracing::info!(game_id = %self.game.id(), player_id = %target, "Player executed");

        let name = self.game.require_player(target)?.name.clone();
        self.messenger.channel(Notice::Executed { target: name }).await;

        // Anyone else who fell with the executed player
        let collateral: Vec<PlayerId> = voters
            .into_iter()
            .filter(|id| *id != target && !self.game.alive_player_ids().contains(id))
            .collect();
        for id in collateral {
            let player = self.game.require_player(id)?;
            let notice = Notice::AbilityDeath {
                target: player.name.clone(),
                status: player.status(),
            };
            self.messenger.channel(notice).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::game::test_support::game_with_roles;
    use crate::domain::events::DomainEvent;
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

    async fn run_day(game: &mut Game, bots: &BotMessenger) -> Result<(), GameError> {
        let cancel = CancellationToken::new();
        let messenger = PhaseMessenger::new(bots, Duration::from_secs(30), &cancel);
        let mut rng = StdRng::seed_from_u64(9);
        DayPhase::new(game, &messenger, &mut rng).run().await
    }

    async fn script_all(bots: &BotMessenger, votes: &[(u64, BallotChoice)]) {
        for (voter, choice) in votes {
            bots.script(id(*voter), [*choice]).await;
        }
    }

    async fn channel_notices(bots: &BotMessenger) -> Vec<Notice> {
        bots.transcript()
            .await
            .into_iter()
            .filter(|entry| entry.recipient.player().is_none())
            .map(|entry| entry.notice)
            .collect()
    }

    #[tokio::test]
    async fn test_plurality_executes() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Villager]);
        let bots = bots();
        let vote = |n| BallotChoice::Target(id(n));
        script_all(&bots, &[(1, vote(2)), (2, vote(1)), (3, vote(1)), (4, vote(1))]).await;

        run_day(&mut game, &bots).await.unwrap();

        assert_eq!(game.player(id(1)).unwrap().status(), PlayerStatus::Executed);
        assert_eq!(game.last_executed(), Some(id(1)));
        assert_eq!(game.last_alive_player_ids(), &[id(2), id(3), id(4)]);
        assert!(channel_notices(&bots).await.contains(&Notice::Executed {
            target: "player1".to_string()
        }));
    }

    #[tokio::test]
    async fn test_tie_executes_nobody() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Villager]);
        let bots = bots();
        let vote = |n| BallotChoice::Target(id(n));
        script_all(&bots, &[(1, vote(2)), (2, vote(1)), (3, vote(1)), (4, vote(2))]).await;

        run_day(&mut game, &bots).await.unwrap();

        assert_eq!(game.alive_player_ids().len(), 4);
        assert_eq!(game.last_executed(), None);
        assert!(matches!(game.events().last(), Some(DomainEvent::NoExecution { .. })));
    }

    #[tokio::test]
    async fn test_half_skipping_blocks_execution() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Villager]);
        let bots = bots();
        script_all(
            &bots,
            &[
                (1, BallotChoice::Skip),
                (2, BallotChoice::Skip),
                (3, BallotChoice::Target(id(1))),
                (4, BallotChoice::Target(id(1))),
            ],
        )
        .await;

        run_day(&mut game, &bots).await.unwrap();

        assert!(game.player(id(1)).unwrap().is_alive());
        assert!(channel_notices(&bots).await.contains(&Notice::NoExecution));
    }

    #[tokio::test]
    async fn test_unreachable_voter_abstains() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Villager]);
        let bots = bots();
        bots.mark_unreachable(id(2)).await;
        bots.mark_unreachable(id(3)).await;
        let vote = |n| BallotChoice::Target(id(n));
        script_all(&bots, &[(1, vote(4)), (4, vote(1))]).await;

        run_day(&mut game, &bots).await.unwrap();

        // Two implicit abstains out of four ballots is enough to block
        assert_eq!(game.alive_player_ids().len(), 4);
    }

    #[tokio::test]
    async fn test_morning_lists_overnight_deaths_and_bread() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Bakery, Role::Villager, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);
        game.attack(id(3), &mut rng).unwrap();
        let bots = bots();

        run_day(&mut game, &bots).await.unwrap();

        let notices = channel_notices(&bots).await;
        assert_eq!(
            notices[0],
            Notice::DayStarted {
                turn: 0,
                victims: vec!["player3".to_string()]
            }
        );
        assert_eq!(notices[1], Notice::BreadDelivered);
    }

    #[tokio::test]
    async fn test_no_bread_once_bakery_is_dead() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Bakery, Role::Villager, Role::Villager]);
        let mut rng = StdRng::seed_from_u64(1);
        game.attack(id(2), &mut rng).unwrap();
        let bots = bots();

        run_day(&mut game, &bots).await.unwrap();

        assert!(channel_notices(&bots).await.contains(&Notice::NoBread));
    }

    #[tokio::test]
    async fn test_protection_reset_at_dusk() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Hunter, Role::Villager, Role::Villager]);
        game.protect(id(2), id(3)).unwrap();
        let bots = bots();
        script_all(&bots, &[(1, BallotChoice::Skip), (2, BallotChoice::Skip)]).await;

        run_day(&mut game, &bots).await.unwrap();

        assert!(!game.player(id(3)).unwrap().is_kill_protected());
    }

    #[tokio::test]
    async fn test_executed_teruteru_wins_outright() {
        let mut game = game_with_roles(&[Role::Teruteru, Role::Werewolf, Role::Villager, Role::Villager]);
        let bots = bots();
        let vote = |n| BallotChoice::Target(id(n));
        script_all(&bots, &[(1, vote(1)), (2, vote(1)), (3, vote(1)), (4, vote(2))]).await;

        run_day(&mut game, &bots).await.unwrap();

        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.faction, Faction::Teruteru);
        assert_eq!(outcome.winners, vec![id(1)]);
    }

    #[tokio::test]
    async fn test_revenge_death_is_announced() {
        let mut game = game_with_roles(&[Role::Nekomata, Role::Werewolf, Role::Villager, Role::Villager]);
        let bots = bots();
        let vote = |n| BallotChoice::Target(id(n));
        script_all(&bots, &[(1, vote(2)), (2, vote(1)), (3, vote(1)), (4, vote(1))]).await;

        run_day(&mut game, &bots).await.unwrap();

        assert_eq!(game.alive_player_ids().len(), 2);
        let revenge_notices = channel_notices(&bots)
            .await
            .into_iter()
            .filter(|n| matches!(n, Notice::AbilityDeath { status: PlayerStatus::Revenged, .. }))
            .count();
        assert_eq!(revenge_notices, 1);
    }

    #[tokio::test]
    async fn test_refused_ballot_is_asked_again() {
        let mut game = game_with_roles(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Villager]);
        let bots = bots();
        let vote = |n| BallotChoice::Target(id(n));
        bots.script(id(1), [vote(99), vote(2)]).await;
        bots.script(id(4), [vote(99), vote(1)]).await;
        script_all(&bots, &[(2, vote(1)), (3, vote(1))]).await;

        run_day(&mut game, &bots).await.unwrap();

        // The refused answers neither count as skips nor block the vote
        assert_eq!(game.player(id(1)).unwrap().status(), PlayerStatus::Executed);

        let asked = bots.choice_log().await;
        assert_eq!(asked.len(), 6);
        assert!(asked.iter().all(|(_, purpose)| *purpose == ChoicePurpose::Execute));

        let rejected: Vec<PlayerId> = bots
            .transcript()
            .await
            .into_iter()
            .filter(|entry| matches!(entry.notice, Notice::BallotRejected { .. }))
            .filter_map(|entry| entry.recipient.player())
            .collect();
        assert_eq!(rejected, vec![id(1), id(4)]);
    }
}

//! Phase messenger - Messaging helpers shared by the night and day phases
//!
//! Wraps the messaging port with the per-game deadline and cancellation
//! token. Refused answers are re-asked within the same deadline. Delivery
//! failures are logged and swallowed here so phase code never has to care
//! about them; only cancellation is surfaced as an error.

use std::time::Duration;

use futures_util::future::try_join_all;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{ChoiceRequest, Notice};
use crate::application::ports::outbound::MessagingPort;
use crate::domain::errors::GameError;
use crate::domain::value_objects::{BallotBox, BallotChoice, BallotError, PlayerId};

pub struct PhaseMessenger<'a> {
    messenger: &'a dyn MessagingPort,
    timeout: Duration,
    cancel: &'a CancellationToken,
}

impl<'a> PhaseMessenger<'a> {
    pub fn new(messenger: &'a dyn MessagingPort, timeout: Duration, cancel: &'a CancellationToken) -> Self {
        Self {
            messenger,
            timeout,
            cancel,
        }
    }

    pub async fn direct(&self, player: PlayerId, notice: Notice) {
        let key = notice.key();
        if let Err(e) = self.messenger.send_direct(player, notice).await {
            tracing::warn!(player_id = %player, notice = key, error = %e, "Failed to deliver notice");
        }
    }

    pub async fn channel(&self, notice: Notice) {
        let key = notice.key();
        if let Err(e) = self.messenger.send_channel(notice).await {
            tracing::warn!(notice = key, error = %e, "Failed to deliver channel notice");
        }
    }

    /// Present one choice and wait up to `timeout` for the answer.
    ///
    /// Returns `Ok(None)` when the player did not answer in time or could not
    /// be reached.
    async fn ask_within(
        &self,
        player: PlayerId,
        request: ChoiceRequest,
        timeout: Duration,
    ) -> Result<Option<BallotChoice>, GameError> {
        let purpose = request.purpose;
        let answer = tokio::time::timeout(timeout, self.messenger.present_choice(player, request));

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(GameError::Cancelled),
            result = answer => match result {
                Ok(Ok(choice)) => Ok(Some(choice)),
                Ok(Err(e)) => {
                    tracing::warn!(player_id = %player, ?purpose, error = %e, "Choice could not be delivered");
                    Ok(None)
                }
                Err(_) => {
                    tracing::warn!(player_id = %player, ?purpose, "Choice timed out");
                    Ok(None)
                }
            },
        }
    }

    /// Ask until the player gives an answer the request allows.
    ///
    /// A refused answer is reported to the player and the choice is presented
    /// again. All attempts share one deadline; running out of it, or losing
    /// the player, comes back as `None`.
    pub async fn ask_valid(&self, player: PlayerId, request: &ChoiceRequest) -> Result<Option<BallotChoice>, GameError> {
        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                tracing::warn!(player_id = %player, purpose = ?request.purpose, "Choice timed out");
                return Ok(None);
            }

            let Some(choice) = self.ask_within(player, request.clone(), remaining).await? else {
                return Ok(None);
            };
            let mut check = BallotBox::open([player], request.candidate_ids(), request.allow_skip);
            match check.cast(player, choice) {
                Ok(()) => return Ok(Some(choice)),
                Err(reason) => self.reject(player, reason).await,
            }
        }
    }

    /// Ask every player for an individual target at once.
    pub async fn ask_all(
        &self,
        requests: Vec<(PlayerId, ChoiceRequest)>,
    ) -> Result<Vec<(PlayerId, Option<PlayerId>)>, GameError> {
        try_join_all(requests.into_iter().map(|(player, request)| async move {
            let answer = self.ask_valid(player, &request).await?;
            Ok::<_, GameError>((player, answer.and_then(|choice| choice.target())))
        }))
        .await
    }

    /// Run one vote round: every voter is asked at once and the box is filled
    /// only after the last answer is in.
    ///
    /// On cancellation nothing is cast, so a cancelled round leaves no trace.
    pub async fn collect_ballots(
        &self,
        request: &ChoiceRequest,
        ballot_box: &mut BallotBox,
        voters: &[PlayerId],
    ) -> Result<(), GameError> {
        let answers = try_join_all(voters.iter().map(|&voter| async move {
            let answer = self.ask_valid(voter, request).await?;
            Ok::<_, GameError>((voter, answer))
        }))
        .await?;

        for (voter, answer) in answers {
            let result = match answer {
                Some(choice) => ballot_box.cast(voter, choice),
                None => ballot_box.abstain(voter),
            };
            // Refused ballots leave the box untouched
            if let Err(reason) = result {
                self.reject(voter, reason).await;
            }
        }
        Ok(())
    }

    async fn reject(&self, player: PlayerId, reason: BallotError) {
        tracing::warn!(player_id = %player, reason = %reason, "Ballot rejected");
        self.direct(
            player,
            Notice::BallotRejected {
                reason: reason.key().to_string(),
            },
        )
        .await;
    }
}

//! Bot messenger - In-process `MessagingPort` adapter
//!
//! Seats every player as a bot. Bots answer choices with a uniformly random
//! candidate unless an answer has been scripted for them, and every notice
//! they receive is rendered and kept in a transcript. Used by the demo binary
//! and throughout the test suite.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::application::dto::{ChoicePurpose, ChoiceRequest, Notice};
use crate::application::ports::outbound::{LocalizationPort, MessagingError, MessagingPort};
use crate::domain::value_objects::{BallotChoice, PlayerId};

/// Where a notice was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Player(PlayerId),
    Channel,
}

impl Recipient {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Recipient::Player(id) => Some(*id),
            Recipient::Channel => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub recipient: Recipient,
    pub notice: Notice,
    /// The notice as the recipient saw it
    pub text: String,
}

struct BotState {
    rng: StdRng,
    scripted: HashMap<PlayerId, VecDeque<BallotChoice>>,
    /// Never answer choices
    unresponsive: HashSet<PlayerId>,
    /// Every delivery fails
    unreachable: HashSet<PlayerId>,
    transcript: Vec<TranscriptEntry>,
    choices: Vec<(PlayerId, ChoicePurpose)>,
    pending: usize,
}

enum Answer {
    Ready(BallotChoice),
    Never,
    Unreachable,
}

pub struct BotMessenger {
    localization: Arc<dyn LocalizationPort>,
    locale: String,
    state: Mutex<BotState>,
}

impl BotMessenger {
    pub fn new(localization: Arc<dyn LocalizationPort>, locale: impl Into<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            localization,
            locale: locale.into(),
            state: Mutex::new(BotState {
                rng,
                scripted: HashMap::new(),
                unresponsive: HashSet::new(),
                unreachable: HashSet::new(),
                transcript: Vec::new(),
                choices: Vec::new(),
                pending: 0,
            }),
        }
    }

    /// Queue answers a player gives to their next choices, in order
    pub async fn script(&self, player: PlayerId, answers: impl IntoIterator<Item = BallotChoice>) {
        self.state
            .lock()
            .await
            .scripted
            .entry(player)
            .or_default()
            .extend(answers);
    }

    pub async fn mark_unresponsive(&self, player: PlayerId) {
        self.state.lock().await.unresponsive.insert(player);
    }

    pub async fn mark_unreachable(&self, player: PlayerId) {
        self.state.lock().await.unreachable.insert(player);
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.state.lock().await.transcript.clone()
    }

    /// Every choice presented so far, in order
    pub async fn choice_log(&self) -> Vec<(PlayerId, ChoicePurpose)> {
        self.state.lock().await.choices.clone()
    }

    /// Choices an unresponsive bot is currently sitting on
    pub async fn pending_choices(&self) -> usize {
        self.state.lock().await.pending
    }

    async fn deliver(&self, recipient: Recipient, notice: Notice) -> Result<(), MessagingError> {
        let mut state = self.state.lock().await;
        if let Recipient::Player(id) = recipient {
            if state.unreachable.contains(&id) {
                return Err(MessagingError::Unreachable(id));
            }
        }

        let text = notice.render(self.localization.as_ref(), &self.locale);
        tracing::debug!(recipient = ?recipient, text = %text, "Notice delivered");
        state.transcript.push(TranscriptEntry {
            recipient,
            notice,
            text,
        });
        Ok(())
    }
}

#[async_trait]
impl MessagingPort for BotMessenger {
    async fn send_direct(&self, player: PlayerId, notice: Notice) -> Result<(), MessagingError> {
        self.deliver(Recipient::Player(player), notice).await
    }

    async fn send_channel(&self, notice: Notice) -> Result<(), MessagingError> {
        self.deliver(Recipient::Channel, notice).await
    }

    async fn present_choice(&self, player: PlayerId, request: ChoiceRequest) -> Result<BallotChoice, MessagingError> {
        let answer = {
            let mut state = self.state.lock().await;
            state.choices.push((player, request.purpose));

            if state.unreachable.contains(&player) {
                Answer::Unreachable
            } else if state.unresponsive.contains(&player) {
                state.pending += 1;
                Answer::Never
            } else if let Some(choice) = state.scripted.get_mut(&player).and_then(VecDeque::pop_front) {
                Answer::Ready(choice)
            } else {
                let picked = request.candidates.choose(&mut state.rng).map(|c| c.id);
                Answer::Ready(match picked {
                    Some(id) => BallotChoice::Target(id),
                    None => BallotChoice::Skip,
                })
            }
        };

        match answer {
            Answer::Ready(choice) => {
                tracing::debug!(player_id = %player, purpose = ?request.purpose, ?choice, "Bot answered");
                Ok(choice)
            }
            Answer::Unreachable => Err(MessagingError::Unreachable(player)),
            Answer::Never => {
                std::future::pending::<()>().await;
                Err(MessagingError::DeliveryFailed("bot stopped waiting".to_string()))
            }
        }
    }
}

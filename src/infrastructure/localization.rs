//! Translation table - In-memory `LocalizationPort` adapter
//!
//! Ships English and Japanese strings for every key the engine emits. A JSON
//! file of the shape `{ "locale": { "key": "text" } }` can be merged on top to
//! override or add strings.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::outbound::LocalizationPort;

const EN: &[(&str, &str)] = &[
    // Roles
    ("Villager", "Villager"),
    ("Werewolf", "Werewolf"),
    ("Seer", "Seer"),
    ("Hunter", "Hunter"),
    ("Medium", "Medium"),
    ("Bakery", "Baker"),
    ("Nekomata", "Nekomata"),
    ("Madmate", "Madmate"),
    ("BlackCat", "Black Cat"),
    ("Fox", "Fox"),
    ("Teruteru", "Teruteru"),
    ("VillagerDescription", "You have no ability. Find the werewolves through discussion."),
    ("WerewolfDescription", "Each night from the second on, choose a player to attack with the other werewolves."),
    ("SeerDescription", "Each night, divine a player to learn whether they are a werewolf."),
    ("HunterDescription", "Each night, choose a player to protect from the attack."),
    ("MediumDescription", "Each night, learn whether the player executed the day before was a werewolf."),
    ("BakeryDescription", "While you live, the village gets fresh bread every morning."),
    ("NekomataDescription", "If you are executed, you take one random player with you."),
    ("MadmateDescription", "You side with the werewolves but read as a villager."),
    ("BlackCatDescription", "You side with the werewolves. If you are executed, you take one random player with you."),
    ("FoxDescription", "The attack cannot kill you, but being divined will. Survive to the end."),
    ("TeruteruDescription", "Get yourself executed."),
    ("VillagerWinCondition", "Eliminate every werewolf."),
    ("WerewolfWinCondition", "Make the werewolves at least half of the survivors."),
    ("MadmateWinCondition", "Help the werewolves win."),
    ("FoxWinCondition", "Be alive when either side wins."),
    ("TeruteruWinCondition", "Be executed."),
    // Factions
    ("TeamVillager", "the villagers"),
    ("TeamWerewolf", "the werewolves"),
    ("TeamFox", "the fox"),
    ("TeamTeruteru", "the teruteru"),
    // Statuses
    ("Alive", "Alive"),
    ("Killed", "Killed"),
    ("Executed", "Executed"),
    ("Cursed", "Cursed"),
    ("Revenged", "Taken down"),
    // Notices
    ("RoleReveal", "Your role is {role}. {description}\nYou win with {faction}: {win_condition}"),
    ("NightStarted", "Night {turn} has fallen. Check your direct messages."),
    ("NightEnded", "The night is over. Return to the game channel."),
    ("GuardSet", "You will protect {target} tonight."),
    ("FortuneResult", "{target} belongs to {faction}."),
    ("MediumResult", "The executed {target} belonged to {faction}."),
    ("AttackAttempted", "The werewolves attack {target}."),
    ("DayStarted", "Morning of day {turn}. Died overnight: {victims}"),
    ("NoVictims", "nobody"),
    ("BreadDelivered", "Fresh bread has been delivered."),
    ("NoBread", "There is no bread this morning."),
    ("ExecutionResult", "{target} was executed."),
    ("NoExecution", "Nobody was executed."),
    ("AbilityDeath", "{target} died ({status})."),
    ("BallotRejected", "Your choice was not accepted: {reason}"),
    ("GameOver", "Victory for {faction}! Winners: {winners}"),
    ("FinalResult", "{player}: {status} - {role}"),
    // Ballots
    ("BallotNotEligible", "you cannot vote in this round"),
    ("BallotAlreadyVoted", "you have already voted"),
    ("BallotInvalidTarget", "that player is not a candidate"),
    ("BallotSkipNotAllowed", "you cannot skip this choice"),
    // Choices
    ("ChooseDivineTarget", "Choose a player to divine"),
    ("ChooseGuardTarget", "Choose a player to protect"),
    ("ChooseAttackTarget", "Choose a player to attack"),
    ("ChooseExecuteTarget", "Choose a player to execute"),
];

const JA: &[(&str, &str)] = &[
    // Roles
    ("Villager", "村人"),
    ("Werewolf", "人狼"),
    ("Seer", "占い師"),
    ("Hunter", "狩人"),
    ("Medium", "霊媒師"),
    ("Bakery", "パン屋"),
    ("Nekomata", "猫又"),
    ("Madmate", "狂人"),
    ("BlackCat", "黒猫"),
    ("Fox", "妖狐"),
    ("Teruteru", "てるてる"),
    ("VillagerDescription", "能力はありません。議論で人狼を見つけ出してください。"),
    ("WerewolfDescription", "2日目以降の夜、仲間と襲撃対象を選びます。"),
    ("SeerDescription", "毎晩1人を占い、人狼かどうかを知ることができます。"),
    ("HunterDescription", "毎晩1人を選び、襲撃から守ります。"),
    ("MediumDescription", "前日に処刑されたプレイヤーが人狼だったかを知ることができます。"),
    ("BakeryDescription", "生きている間、毎朝パンが届きます。"),
    ("NekomataDescription", "処刑されると、ランダムに1人を道連れにします。"),
    ("MadmateDescription", "人狼陣営ですが、占いでは村人と判定されます。"),
    ("BlackCatDescription", "人狼陣営です。処刑されると、ランダムに1人を道連れにします。"),
    ("FoxDescription", "襲撃では死にませんが、占われると死亡します。最後まで生き残ってください。"),
    ("TeruteruDescription", "処刑されることが目的です。"),
    ("VillagerWinCondition", "人狼を全員追放すること。"),
    ("WerewolfWinCondition", "人狼の数を生存者の半数以上にすること。"),
    ("MadmateWinCondition", "人狼陣営を勝利させること。"),
    ("FoxWinCondition", "どちらかの陣営が勝利した時に生存していること。"),
    ("TeruteruWinCondition", "処刑されること。"),
    // Factions
    ("TeamVillager", "村人陣営"),
    ("TeamWerewolf", "人狼陣営"),
    ("TeamFox", "妖狐"),
    ("TeamTeruteru", "てるてる"),
    // Statuses
    ("Alive", "生存"),
    ("Killed", "襲撃死"),
    ("Executed", "処刑"),
    ("Cursed", "呪殺"),
    ("Revenged", "道連れ"),
    // Notices
    ("RoleReveal", "あなたの役職は{role}です。{description}\n{faction}: {win_condition}"),
    ("NightStarted", "{turn}日目の夜になりました。DMを確認してください。"),
    ("NightEnded", "夜が明けました。ゲームチャンネルに戻ってください。"),
    ("GuardSet", "{target}を守ります。"),
    ("FortuneResult", "{target}は{faction}です。"),
    ("MediumResult", "処刑された{target}は{faction}でした。"),
    ("AttackAttempted", "{target}を襲撃します。"),
    ("DayStarted", "{turn}日目の朝になりました。本日の死亡者: {victims}"),
    ("NoVictims", "なし"),
    ("BreadDelivered", "パンが届きました。"),
    ("NoBread", "今朝はパンが届きませんでした。"),
    ("ExecutionResult", "{target}が処刑されました。"),
    ("NoExecution", "誰も処刑されませんでした。"),
    ("AbilityDeath", "{target}が死亡しました（{status}）。"),
    ("BallotRejected", "選択は受け付けられませんでした: {reason}"),
    ("GameOver", "{faction}の勝利！ 勝者: {winners}"),
    ("FinalResult", "{player} {status} - {role}"),
    // Ballots
    ("BallotNotEligible", "この投票には参加できません"),
    ("BallotAlreadyVoted", "すでに投票済みです"),
    ("BallotInvalidTarget", "そのプレイヤーは候補ではありません"),
    ("BallotSkipNotAllowed", "スキップはできません"),
    // Choices
    ("ChooseDivineTarget", "占い対象を選んでください"),
    ("ChooseGuardTarget", "護衛対象を選んでください"),
    ("ChooseAttackTarget", "襲撃対象を選んでください"),
    ("ChooseExecuteTarget", "処刑対象を選んでください"),
];

/// Locale -> key -> text
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    tables: HashMap<String, HashMap<String, String>>,
}

impl TranslationTable {
    /// Table with the bundled English and Japanese strings
    pub fn builtin() -> Self {
        let mut table = Self::default();
        table.merge("en", EN.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        table.merge("ja", JA.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        table
    }

    /// Add or override strings for `locale`
    pub fn merge(&mut self, locale: &str, entries: impl IntoIterator<Item = (String, String)>) {
        self.tables.entry(locale.to_string()).or_default().extend(entries);
    }

    /// Merge a JSON translation file over the current table
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read translations from {}", path.display()))?;
        let parsed: HashMap<String, HashMap<String, String>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid translation file {}", path.display()))?;

        for (locale, entries) in parsed {
            tracing::debug!(locale = %locale, entries = entries.len(), "Merging translations");
            self.merge(&locale, entries);
        }
        Ok(())
    }
}

impl LocalizationPort for TranslationTable {
    fn resolve(&self, key: &str, locale: &str) -> String {
        self.tables
            .get(locale)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Points needed to unlock.
    pub requirement: i64,
}

pub const ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: "burner_fist",
        title: "🔥 Burner Fist",
        description: "Burn more supply",
        requirement: 1000,
    },
    Achievement {
        id: "firegod_fist",
        title: "🌋 Firegod Fist",
        description: "Burn more supply",
        requirement: 3000,
    },
    Achievement {
        id: "hellfire_fist",
        title: "👹 Hellfire Fist",
        description: "Burn a more supply",
        requirement: 10000,
    },
    Achievement {
        id: "clasher",
        title: "⚔️ Clasher",
        description: "Get 50 Booster",
        requirement: 8000,
    },
    Achievement {
        id: "mad_clasher",
        title: "🗡️ Mad Clasher",
        description: "Get 300 Booster",
        requirement: 9000,
    },
];

/// Row of the `global_stats` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub total_games: i64,
}

/// Row of the `players` table. Columns other than these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Help,
    Progress,
    Global,
    Leaderboard,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Start,
        Command::Help,
        Command::Progress,
        Command::Global,
        Command::Leaderboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Progress => "progress",
            Command::Global => "global",
            Command::Leaderboard => "leaderboard",
        }
    }
}

// Telegram Bot API wire types, only the fields the bot reads.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Unix timestamp.
    #[serde(default)]
    pub date: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

impl Message {
    pub fn sent_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.date, 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// Result of `getMe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

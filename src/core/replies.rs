use crate::core::achievements::AchievementProgress;
use crate::domain::model::{Command, GlobalStats, Player};

pub const PROGRESS_ERROR: &str = "❌ Error fetching progress. Please try again later.";
pub const GLOBAL_STATS_ERROR: &str = "❌ Error fetching global stats. Please try again later.";
pub const LEADERBOARD_ERROR: &str = "❌ Error fetching leaderboard. Please try again later.";
pub const GENERIC_ERROR: &str =
    "❌ An error occurred while processing your request. Please try again later.";

/// Bot API limit for `sendMessage` text, counted in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// The command-specific error text sent when the normal reply cannot be delivered.
pub fn error_reply(command: Command) -> Option<&'static str> {
    match command {
        Command::Progress => Some(PROGRESS_ERROR),
        Command::Global => Some(GLOBAL_STATS_ERROR),
        Command::Leaderboard => Some(LEADERBOARD_ERROR),
        Command::Start | Command::Help => None,
    }
}

fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

pub fn welcome_message() -> &'static str {
    "🎮 Welcome to BurnTheDev Bot!\n\n\
     I'm here to track your achievements and progress. Here are my commands:\n\
     /progress - View your achievement progress\n\
     /global - Show global game statistics\n\
     /leaderboard - View top players\n\
     /help - Show this help message"
}

pub fn help_message() -> &'static str {
    "🤖 BurnTheDev Bot Commands:\n\n\
     /progress - Check your achievement progress\n\
     /global - View global game statistics\n\
     /leaderboard - See top players\n\
     /help - Show this help message"
}

pub fn progress_message(progress: &AchievementProgress) -> String {
    let mut message = String::from("🏆 Achievement Progress\n\n");

    for status in &progress.statuses {
        let marker = if status.completed { "✅" } else { "🔒" };
        let achievement = &status.achievement;
        message.push_str(&format!("{} {}\n", marker, achievement.title));
        message.push_str(&format!(
            "└ {} ({} points)\n\n",
            achievement.description, achievement.requirement
        ));
    }

    message.push_str(&format!(
        "\nTotal Progress: {}/{} achievements",
        progress.completed(),
        progress.total()
    ));
    message
}

pub fn global_stats_message(stats: &GlobalStats) -> String {
    format!(
        "🌍 Global Statistics\n\nTotal Points: {} 💎\nGames Played: {} 🎮",
        group_thousands(stats.total_points),
        group_thousands(stats.total_games)
    )
}

pub fn medal(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        _ => "👑",
    }
}

/// Rows that would push the text past [`MAX_MESSAGE_LEN`] are left out.
pub fn leaderboard_message(players: &[Player]) -> String {
    let mut message = String::from("🏆 Top Players\n\n");
    let mut len = message_len(&message);

    for (index, player) in players.iter().enumerate() {
        let rank = index + 1;
        let row = format!(
            "{} {}. {}: {} points\n",
            medal(rank),
            rank,
            player.name,
            group_thousands(player.points)
        );
        let row_len = message_len(&row);
        if len + row_len > MAX_MESSAGE_LEN {
            tracing::warn!(
                "Leaderboard truncated to {} of {} players to fit one message",
                index,
                players.len()
            );
            break;
        }
        len += row_len;
        message.push_str(&row);
    }
    message
}

/// Formats an integer with `,` between every group of three digits.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

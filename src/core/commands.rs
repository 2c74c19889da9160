use crate::domain::model::Command;

impl Command {
    /// Parses the leading `/command` (or `/command@bot_username`) of a message.
    ///
    /// Addressed commands are only accepted when the mention matches this bot,
    /// so in group chats the bot ignores commands meant for other bots.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Command> {
        let token = text.split_whitespace().next()?;
        let body = token.strip_prefix('/')?;

        let name = match body.split_once('@') {
            Some((name, mention)) => {
                let ours = bot_username
                    .map(|username| username.trim_start_matches('@'))
                    .is_some_and(|username| username.eq_ignore_ascii_case(mention));
                if !ours {
                    return None;
                }
                name
            }
            None => body,
        };

        Command::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(Command::parse("/start", None), Some(Command::Start));
        assert_eq!(Command::parse("/help", None), Some(Command::Help));
        assert_eq!(Command::parse("/progress", None), Some(Command::Progress));
        assert_eq!(Command::parse("/global", None), Some(Command::Global));
        assert_eq!(
            Command::parse("/leaderboard", None),
            Some(Command::Leaderboard)
        );
    }

    #[test]
    fn test_parse_ignores_trailing_arguments() {
        assert_eq!(
            Command::parse("  /leaderboard top please", None),
            Some(Command::Leaderboard)
        );
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert_eq!(Command::parse("hello", None), None);
        assert_eq!(Command::parse("", None), None);
        assert_eq!(Command::parse("start", None), None);
        assert_eq!(Command::parse("/unknown", None), None);
        assert_eq!(Command::parse("please /start", None), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse("/Start", None), Some(Command::Start));
        assert_eq!(Command::parse("/HELP", None), Some(Command::Help));
        assert_eq!(
            Command::parse("/LeaderBoard@burnthedevbot", Some("BurnTheDevBot")),
            Some(Command::Leaderboard)
        );
    }

    #[test]
    fn test_parse_mentions() {
        let me = Some("BurnTheDevBot");
        assert_eq!(Command::parse("/global@BurnTheDevBot", me), Some(Command::Global));
        assert_eq!(Command::parse("/global@burnthedevbot", me), Some(Command::Global));
        assert_eq!(Command::parse("/global@OtherBot", me), None);
        // without knowing our own name, addressed commands cannot be verified
        assert_eq!(Command::parse("/global@BurnTheDevBot", None), None);
    }
}

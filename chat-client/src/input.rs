use chat_common::Command;

pub const USAGE: &str = "@<name> <text> | #<group> <text> | /group <group> <user>... | /leave <group> | /quit";

/// A nickname travels as a single `LOGIN` field, so it cannot hold spaces.
pub fn valid_nickname(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

/// Maps one line typed by the user to the command it stands for.
///
/// Messages with an empty body are rejected.
pub fn parse_input(line: &str) -> Option<Command> {
    let line = line.trim_end();

    if let Some(rest) = line.strip_prefix('@') {
        let (name, data) = rest.split_once(' ')?;
        return (!name.is_empty()).then(|| Command::Send {
            name: name.to_string(),
            data: data.to_string(),
        });
    }

    if let Some(rest) = line.strip_prefix('#') {
        let (group, data) = rest.split_once(' ')?;
        return (!group.is_empty()).then(|| Command::Broadcast {
            group: group.to_string(),
            data: data.to_string(),
        });
    }

    let mut words = line.split_whitespace();
    match words.next()? {
        "/group" => {
            let group = words.next()?.to_string();
            let usernames: Vec<String> = words.map(str::to_string).collect();
            (!usernames.is_empty()).then_some(Command::Group { group, usernames })
        }
        "/leave" => {
            let group = words.next()?.to_string();
            words.next().is_none().then_some(Command::Leave { group })
        }
        "/quit" => Some(Command::Logout),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("@bob hello there", Some(Command::Send { name: "bob".into(), data: "hello there".into() }))]
    #[case("#g1 hi  all", Some(Command::Broadcast { group: "g1".into(), data: "hi  all".into() }))]
    #[case("/group g1 alice bob", Some(Command::Group { group: "g1".into(), usernames: vec!["alice".into(), "bob".into()] }))]
    #[case("/leave g1", Some(Command::Leave { group: "g1".into() }))]
    #[case("/quit", Some(Command::Logout))]
    #[case("@bob", None)]
    #[case("@ hello", None)]
    #[case("#g1", None)]
    #[case("@bob   ", None)]
    #[case("#g1 ", None)]
    #[case("/group g1", None)]
    #[case("/leave", None)]
    #[case("/leave g1 g2", None)]
    #[case("just chatting", None)]
    #[case("", None)]
    fn maps_input_lines(#[case] line: &str, #[case] expected: Option<Command>) {
        assert_eq!(parse_input(line), expected);
    }

    #[rstest]
    #[case("zhenghe", true)]
    #[case("john doe", false)]
    #[case("tab\there", false)]
    #[case("", false)]
    fn checks_nicknames(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(valid_nickname(name), expected);
    }
}

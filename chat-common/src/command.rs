use std::fmt;

pub type ClientName = String;
pub type GroupName = String;

pub const PROTOCOL_NAME: &str = "CHAT";
pub const PROTOCOL_VERSION: &str = "1.0";

pub(crate) const SEP: char = ' ';

pub(crate) const CMD_SEND: &str = "SEND";
pub(crate) const CMD_BROADCAST: &str = "BROADCAST";
pub(crate) const CMD_LOGIN: &str = "LOGIN";
pub(crate) const CMD_LOGOUT: &str = "LOGOUT";
pub(crate) const CMD_RECEIVE: &str = "RECEIVE";
pub(crate) const CMD_GROUP: &str = "GROUP";
pub(crate) const CMD_LEAVE: &str = "LEAVE";

/// One protocol frame.
///
/// The `CHAT/1.0` tag is implicit: every value of this type is written with
/// it, and the decoder refuses any line carrying another tag, so a `Command`
/// always belongs to the current protocol version.
///
/// Free-text fields (`data`, and the member list of `Group`) are the last
/// field on the line and are written verbatim, spaces included. They must not
/// contain a newline. An empty `data` still gets its separator, so the line
/// ends in a space; that space is what keeps the field present on decode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Direct message to every session logged in as `name`.
    Send { name: ClientName, data: String },
    /// Message to every member of `group` except the sender.
    Broadcast { group: GroupName, data: String },
    /// Claims a display name for the session.
    Login { username: ClientName },
    /// Ends the session.
    Logout,
    /// Server-to-client delivery.
    Receive { from: ClientName, data: String },
    /// Declares a group with its initial members.
    Group {
        group: GroupName,
        usernames: Vec<ClientName>,
    },
    /// Removes the sender's name from `group`.
    Leave { group: GroupName },
}

impl Command {
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Send { .. } => CMD_SEND,
            Command::Broadcast { .. } => CMD_BROADCAST,
            Command::Login { .. } => CMD_LOGIN,
            Command::Logout => CMD_LOGOUT,
            Command::Receive { .. } => CMD_RECEIVE,
            Command::Group { .. } => CMD_GROUP,
            Command::Leave { .. } => CMD_LEAVE,
        }
    }

    /// Canonical wire form, terminated by a single `\n`.
    pub fn encode(&self) -> String {
        format!("{self}\n")
    }
}

/// Writes the frame without its line terminator.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PROTOCOL_NAME}/{PROTOCOL_VERSION}{SEP}{}", self.keyword())?;

        match self {
            Command::Send { name, data } => write!(f, "{SEP}{name}{SEP}{data}"),
            Command::Broadcast { group, data } => write!(f, "{SEP}{group}{SEP}{data}"),
            Command::Login { username } => write!(f, "{SEP}{username}"),
            Command::Logout => Ok(()),
            Command::Receive { from, data } => write!(f, "{SEP}{from}{SEP}{data}"),
            Command::Group { group, usernames } => {
                write!(f, "{SEP}{group}")?;
                for username in usernames {
                    write!(f, "{SEP}{username}")?;
                }
                Ok(())
            }
            Command::Leave { group } => write!(f, "{SEP}{group}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_send() {
        let cmd = Command::Send {
            name: "zhenghe".into(),
            data: "hello world".into(),
        };
        assert_eq!(cmd.encode(), "CHAT/1.0 SEND zhenghe hello world\n");
    }

    #[test]
    fn encodes_broadcast() {
        let cmd = Command::Broadcast {
            group: "g1".into(),
            data: "hello world".into(),
        };
        assert_eq!(cmd.encode(), "CHAT/1.0 BROADCAST g1 hello world\n");
    }

    #[test]
    fn encodes_login_and_logout() {
        let login = Command::Login {
            username: "xixi".into(),
        };
        assert_eq!(login.encode(), "CHAT/1.0 LOGIN xixi\n");
        assert_eq!(Command::Logout.encode(), "CHAT/1.0 LOGOUT\n");
    }

    #[test]
    fn encodes_receive() {
        let cmd = Command::Receive {
            from: "zhenghe".into(),
            data: "hi  there".into(),
        };
        assert_eq!(cmd.encode(), "CHAT/1.0 RECEIVE zhenghe hi  there\n");
    }

    #[test]
    fn encodes_group_members_space_separated() {
        let cmd = Command::Group {
            group: "g1".into(),
            usernames: vec!["zhenghe".into(), "xixi".into()],
        };
        assert_eq!(cmd.encode(), "CHAT/1.0 GROUP g1 zhenghe xixi\n");
    }

    #[test]
    fn encodes_leave() {
        let cmd = Command::Leave { group: "g1".into() };
        assert_eq!(cmd.encode(), "CHAT/1.0 LEAVE g1\n");
    }

    #[test]
    fn empty_body_keeps_its_separator() {
        let cmd = Command::Send {
            name: "b".into(),
            data: String::new(),
        };
        let line = cmd.encode();
        assert_eq!(line, "CHAT/1.0 SEND b \n");
        assert_eq!(line.trim_end_matches('\n').parse::<Command>(), Ok(cmd));
    }

    #[test]
    fn display_omits_terminator() {
        assert_eq!(Command::Logout.to_string(), "CHAT/1.0 LOGOUT");
    }
}

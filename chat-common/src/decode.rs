use std::str::FromStr;

use crate::command::{
    Command, CMD_BROADCAST, CMD_GROUP, CMD_LEAVE, CMD_LOGIN, CMD_LOGOUT, CMD_RECEIVE, CMD_SEND,
    PROTOCOL_NAME, PROTOCOL_VERSION, SEP,
};
use crate::error::DecodeError;

/// Parses one line, already stripped of its terminator.
///
/// Identifier fields are trimmed. Free-text fields take every remaining
/// token, re-joined with single spaces exactly as they appeared.
impl FromStr for Command {
    type Err = DecodeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split(SEP).collect();
        if parts.len() < 2 {
            return Err(DecodeError::MalformedFrame("missing command keyword"));
        }

        check_tag(parts[0])?;

        let cmd = match parts[1].trim() {
            CMD_SEND => {
                at_least(&parts, 4)?;
                Command::Send {
                    name: ident(parts[2]),
                    data: body(&parts[3..]),
                }
            }
            CMD_BROADCAST => {
                at_least(&parts, 4)?;
                Command::Broadcast {
                    group: ident(parts[2]),
                    data: body(&parts[3..]),
                }
            }
            CMD_LOGIN => {
                exactly(&parts, 3)?;
                Command::Login {
                    username: ident(parts[2]),
                }
            }
            CMD_LOGOUT => {
                exactly(&parts, 2)?;
                Command::Logout
            }
            CMD_RECEIVE => {
                at_least(&parts, 4)?;
                Command::Receive {
                    from: ident(parts[2]),
                    data: body(&parts[3..]),
                }
            }
            CMD_GROUP => {
                at_least(&parts, 4)?;
                let usernames: Vec<String> = parts[3..]
                    .iter()
                    .copied()
                    .map(ident)
                    .filter(|u| !u.is_empty())
                    .collect();
                if usernames.is_empty() {
                    return Err(DecodeError::MalformedFrame("group needs at least one member"));
                }
                Command::Group {
                    group: ident(parts[2]),
                    usernames,
                }
            }
            CMD_LEAVE => {
                at_least(&parts, 3)?;
                Command::Leave {
                    group: ident(parts[2]),
                }
            }
            other => return Err(DecodeError::UnsupportedCommand(other.to_string())),
        };

        Ok(cmd)
    }
}

fn check_tag(token: &str) -> Result<(), DecodeError> {
    let tag = token.trim();
    let (name, version) = tag
        .split_once('/')
        .ok_or(DecodeError::MalformedFrame("protocol tag must be <name>/<version>"))?;
    if version.contains('/') {
        return Err(DecodeError::MalformedFrame(
            "protocol tag must be <name>/<version>",
        ));
    }

    if name != PROTOCOL_NAME || version != PROTOCOL_VERSION {
        return Err(DecodeError::ProtocolMismatch {
            expected: format!("{PROTOCOL_NAME}/{PROTOCOL_VERSION}"),
            found: tag.to_string(),
        });
    }
    Ok(())
}

fn at_least(parts: &[&str], n: usize) -> Result<(), DecodeError> {
    if parts.len() < n {
        return Err(DecodeError::MalformedFrame("too few fields"));
    }
    Ok(())
}

fn exactly(parts: &[&str], n: usize) -> Result<(), DecodeError> {
    if parts.len() != n {
        return Err(DecodeError::MalformedFrame("unexpected field count"));
    }
    Ok(())
}

fn ident(token: &str) -> String {
    token.trim().to_string()
}

fn body(tokens: &[&str]) -> String {
    tokens.join(&SEP.to_string())
}

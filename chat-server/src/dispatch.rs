use std::collections::HashSet;
use std::sync::Arc;

use chat_common::Command;
use futures::future::join_all;
use log::{error, info, trace, warn};

use crate::error::{DeliveryFailure, DispatchError};
use crate::registry::Registry;
use crate::session::Session;

/// What the read loop should do after a command has been handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Outcome of routing one command: registry changes are already applied,
/// `deliveries` still have to be written.
#[derive(Debug)]
pub struct Routing {
    pub deliveries: Vec<(Arc<Session>, Command)>,
    pub flow: Flow,
}

impl Routing {
    fn none() -> Self {
        Self {
            deliveries: Vec::new(),
            flow: Flow::Continue,
        }
    }
}

/// Applies `command` from `session` to the registry and works out who
/// receives what.
///
/// Unnamed sessions may send; their messages carry an empty `from`.
pub fn route(registry: &Registry, session: &Arc<Session>, command: Command) -> Routing {
    match command {
        Command::Send { name, data } => {
            let from = session.name();
            let deliveries = registry
                .snapshot_sessions()
                .into_iter()
                .filter(|target| target.name() == name)
                .map(|target| {
                    let receive = Command::Receive {
                        from: from.clone(),
                        data: data.clone(),
                    };
                    (target, receive)
                })
                .collect();
            Routing {
                deliveries,
                flow: Flow::Continue,
            }
        }
        Command::Broadcast { group, data } => {
            let Some(members) = registry.group_members(&group) else {
                info!("group:{group} doesn't exist");
                return Routing::none();
            };
            let members: HashSet<_> = members.into_iter().collect();
            let from = session.name();
            let deliveries = registry
                .snapshot_sessions()
                .into_iter()
                .filter(|target| target.id() != session.id() && members.contains(&target.name()))
                .map(|target| {
                    let receive = Command::Receive {
                        from: from.clone(),
                        data: data.clone(),
                    };
                    (target, receive)
                })
                .collect();
            Routing {
                deliveries,
                flow: Flow::Continue,
            }
        }
        Command::Login { username } => {
            info!("session {} set username:{username}", session.id());
            registry.set_name(session, username);
            Routing::none()
        }
        Command::Logout => {
            session.mark_closed();
            registry.deregister(session.id());
            info!("user:{} logged out", session.name());
            Routing {
                deliveries: Vec::new(),
                flow: Flow::Close,
            }
        }
        Command::Group { group, usernames } => {
            if registry.create_group_if_absent(group.clone(), usernames) {
                info!("create group:{group}");
            } else {
                info!("group:{group} exists");
            }
            Routing::none()
        }
        Command::Leave { group } => {
            let name = session.name();
            if registry.remove_member(&group, &name) {
                info!("{name} leave group:{group}");
            } else {
                info!("group:{group} doesn't exist");
            }
            Routing::none()
        }
        Command::Receive { .. } => {
            warn!("session {} sent RECEIVE, which only the server may send", session.id());
            Routing::none()
        }
    }
}

/// Writes every delivery, continuing past failures, and reports all of them.
pub async fn deliver(deliveries: Vec<(Arc<Session>, Command)>) -> Result<(), DispatchError> {
    let attempts = deliveries.into_iter().map(|(target, command)| async move {
        trace!("Sending message to {} : {:?}", target.id(), command);
        target
            .deliver(&command)
            .await
            .map_err(|source| DeliveryFailure {
                session: target.id(),
                name: target.name(),
                source,
            })
    });

    let failures: Vec<DeliveryFailure> = join_all(attempts)
        .await
        .into_iter()
        .filter_map(Result::err)
        .inspect(|failure| error!("{failure}"))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DispatchError::Delivery(failures))
    }
}

/// Routes, delivers, and on `LOGOUT` closes the session's transport.
pub async fn dispatch(
    registry: &Registry,
    session: &Arc<Session>,
    command: Command,
) -> Result<Flow, DispatchError> {
    let Routing { deliveries, flow } = route(registry, session, command);
    deliver(deliveries).await?;

    if flow == Flow::Close {
        session.close().await.map_err(DispatchError::Close)?;
    }
    Ok(flow)
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chat_common::{ClientName, GroupName};
use parking_lot::RwLock;
use tokio::io::AsyncWrite;

use crate::session::{Session, SessionId};

#[derive(Default)]
struct State {
    sessions: HashMap<SessionId, Arc<Session>>,
    groups: HashMap<GroupName, Vec<ClientName>>,
}

/// Live sessions and group membership.
///
/// Both collections sit behind one reader/writer lock. Readers get owned
/// snapshots, so fan-out never iterates a collection another task is
/// mutating. The lock is never held across an `.await`.
///
/// Groups hold usernames, not session ids: a name stays listed after its
/// session disconnects and matches whichever session logs in with it next.
#[derive(Default)]
pub struct Registry {
    next_id: AtomicU64,
    state: RwLock<State>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session around `writer` with a fresh id and registers it.
    pub fn open_session<W>(&self, writer: W) -> Arc<Session>
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Arc::new(Session::new(id, writer));
        self.register(Arc::clone(&session));
        session
    }

    /// Returns `false` if a session with the same id was already live.
    pub fn register(&self, session: Arc<Session>) -> bool {
        let mut state = self.state.write();
        if state.sessions.contains_key(&session.id()) {
            return false;
        }
        state.sessions.insert(session.id(), session);
        true
    }

    /// Removes the session from the live set. Group lists are left alone.
    pub fn deregister(&self, id: SessionId) -> Option<Arc<Session>> {
        self.state.write().sessions.remove(&id)
    }

    pub fn set_name(&self, session: &Session, username: ClientName) {
        session.set_name(username);
    }

    /// First writer wins; an existing group is never updated or merged.
    pub fn create_group_if_absent(&self, group: GroupName, usernames: Vec<ClientName>) -> bool {
        let mut state = self.state.write();
        if state.groups.contains_key(&group) {
            return false;
        }
        state.groups.insert(group, usernames);
        true
    }

    /// Returns `false` if the group does not exist.
    pub fn remove_member(&self, group: &str, username: &str) -> bool {
        let mut state = self.state.write();
        match state.groups.get_mut(group) {
            Some(members) => {
                members.retain(|member| member != username);
                true
            }
            None => false,
        }
    }

    pub fn snapshot_sessions(&self) -> Vec<Arc<Session>> {
        self.state.read().sessions.values().cloned().collect()
    }

    pub fn group_members(&self, group: &str) -> Option<Vec<ClientName>> {
        self.state.read().groups.get(group).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.state.read().sessions.len()
    }

    pub fn group_count(&self) -> usize {
        self.state.read().groups.len()
    }
}

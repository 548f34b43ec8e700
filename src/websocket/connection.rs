use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::{Audience, ServerEvent};

pub type WsSender = mpsc::UnboundedSender<ServerEvent>;

struct Session {
    user_id: Uuid,
    sender: WsSender,
}

/// Registry of live realtime sessions. Each session is keyed by its own
/// connection id and bound to one authenticated user; publishing resolves an
/// `Audience` to the matching senders. Sends are best-effort: a closed
/// channel just drops the event.
#[derive(Clone)]
pub struct ConnectionManager {
    sessions: Arc<DashMap<Uuid, Session>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn join(&self, connection_id: Uuid, user_id: Uuid, sender: WsSender) {
        self.sessions.insert(connection_id, Session { user_id, sender });
        tracing::info!("User {} connected via WebSocket", user_id);
    }

    pub fn leave(&self, connection_id: &Uuid) {
        if let Some((_, session)) = self.sessions.remove(connection_id) {
            tracing::info!("User {} disconnected from WebSocket", session.user_id);
        }
    }

    pub fn publish(&self, audience: Audience, event: ServerEvent) {
        match audience {
            Audience::User(user_id) => {
                for entry in self.sessions.iter() {
                    if entry.value().user_id == user_id {
                        let _ = entry.value().sender.send(event.clone());
                    }
                }
            }
            Audience::Global => {
                for entry in self.sessions.iter() {
                    let _ = entry.value().sender.send(event.clone());
                }
            }
        }
    }

    pub fn is_user_online(&self, user_id: &Uuid) -> bool {
        self.sessions.iter().any(|entry| entry.value().user_id == *user_id)
    }

    pub fn online_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn connect(manager: &ConnectionManager, user_id: Uuid) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        manager.join(Uuid::new_v4(), user_id, tx);
        rx
    }

    #[test]
    fn test_private_event_reaches_only_the_owner() {
        let manager = ConnectionManager::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let mut owner_rx = connect(&manager, owner);
        let mut stranger_rx = connect(&manager, stranger);

        manager.publish(
            Audience::User(owner),
            ServerEvent::JournalDeleted { journal_id: Uuid::new_v4() },
        );

        assert!(owner_rx.try_recv().is_ok());
        assert!(stranger_rx.try_recv().is_err());
    }

    #[test]
    fn test_global_event_reaches_everyone() {
        let manager = ConnectionManager::new();
        let mut rx_a = connect(&manager, Uuid::new_v4());
        let mut rx_b = connect(&manager, Uuid::new_v4());

        manager.publish(
            Audience::Global,
            ServerEvent::PostDeleted { post_id: Uuid::new_v4() },
        );

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_user_with_two_sessions_gets_both_copies() {
        let manager = ConnectionManager::new();
        let user = Uuid::new_v4();
        let mut rx_a = connect(&manager, user);
        let mut rx_b = connect(&manager, user);

        manager.publish(
            Audience::User(user),
            ServerEvent::ReminderDeleted { reminder_id: Uuid::new_v4() },
        );

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_leave_removes_session() {
        let manager = ConnectionManager::new();
        let user = Uuid::new_v4();
        let connection_id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.join(connection_id, user, tx);
        assert!(manager.is_user_online(&user));

        manager.leave(&connection_id);
        assert!(!manager.is_user_online(&user));
        assert_eq!(manager.online_count(), 0);

        manager.publish(
            Audience::User(user),
            ServerEvent::JournalDeleted { journal_id: Uuid::new_v4() },
        );
        assert!(rx.try_recv().is_err());
    }
}

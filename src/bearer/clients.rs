//! The ordered set of clients attached to a bearer.
//!
//! 附着在承载上的有序客户端集合。

use super::request::ClientRef;

/// Distinct clients in attach order. Its length is the bearer's reference count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSet {
    clients: Vec<ClientRef>,
}

impl ClientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `client`. Returns `false` if it was already attached.
    pub fn attach(&mut self, client: ClientRef) -> bool {
        if self.contains(&client) {
            return false;
        }
        self.clients.push(client);
        true
    }

    /// Detaches `client`. Returns `false` if it was not attached.
    pub fn detach(&mut self, client: &ClientRef) -> bool {
        let before = self.clients.len();
        self.clients.retain(|c| c != client);
        self.clients.len() != before
    }

    pub fn contains(&self, client: &ClientRef) -> bool {
        self.clients.contains(client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Detaches every client, returning them in attach order.
    pub fn clear(&mut self) -> Vec<ClientRef> {
        std::mem::take(&mut self.clients)
    }

    pub fn snapshot(&self) -> Vec<ClientRef> {
        self.clients.clone()
    }
}

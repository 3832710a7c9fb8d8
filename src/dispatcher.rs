//! Role-scoped notification inboxes.
//!
//! Each role has a newest-first list and a transient "pulse" used by the UI
//! to animate the bell. The pulse is stored as a deadline and evaluated
//! against the clock, so it switches itself off after the window even if
//! nobody ever clears it.
//!
//! The manager inbox is shared by every manager. In the consultant inbox a
//! notification addressed to one member (`to`) is only visible to that
//! member; the `*_for` methods apply that rule for a given reader.

use crate::engine::clock::Clock;
use crate::model::{MemberId, Notification, NotificationPayload, Role};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

fn visible(role: Role, reader: MemberId, n: &Notification) -> bool {
    role == Role::Manager || n.to.is_none_or(|to| to == reader)
}

pub struct Dispatcher {
    inboxes: BTreeMap<Role, Vec<Notification>>,
    pulses: BTreeMap<Role, DateTime<Utc>>,
    next_id: u64,
    window: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new(window: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inboxes: BTreeMap::new(),
            pulses: BTreeMap::new(),
            next_id: 1,
            window,
            clock,
        }
    }

    /// Prepends a notification to the role's inbox and starts its pulse.
    /// Ids increase with every call, which keeps insertion order as the
    /// tie-break for notifications created at the same instant.
    pub fn notify(&mut self, role: Role, payload: NotificationPayload) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let now = self.clock.now();

        let notification = Notification {
            id,
            kind: payload.kind,
            title: payload.title,
            message: payload.message,
            read: false,
            created_at: now,
            link: payload.link,
            from: payload.from,
            to: payload.to,
        };
        tracing::debug!(%role, id, kind = %notification.kind, "notification dispatched");

        self.inboxes.entry(role).or_default().insert(0, notification);
        self.pulses.insert(role, now + self.window);
        id
    }

    /// Returns whether the notification changed. Unknown ids and already
    /// read notifications are no-ops.
    pub fn mark_read(&mut self, role: Role, id: u64) -> bool {
        match self
            .inboxes
            .get_mut(&role)
            .and_then(|inbox| inbox.iter_mut().find(|n| n.id == id))
        {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    /// Returns how many notifications flipped to read.
    pub fn mark_all_read(&mut self, role: Role) -> usize {
        let Some(inbox) = self.inboxes.get_mut(&role) else {
            return 0;
        };
        let mut changed = 0;
        for n in inbox.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }

    /// Newest first.
    pub fn notifications(&self, role: Role) -> &[Notification] {
        self.inboxes.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn unread_count(&self, role: Role) -> usize {
        self.notifications(role).iter().filter(|n| !n.read).count()
    }

    /// The part of the role's inbox `reader` may see, newest first.
    pub fn notifications_for(
        &self,
        role: Role,
        reader: MemberId,
    ) -> impl Iterator<Item = &Notification> {
        self.notifications(role)
            .iter()
            .filter(move |n| visible(role, reader, n))
    }

    pub fn unread_count_for(&self, role: Role, reader: MemberId) -> usize {
        self.notifications_for(role, reader).filter(|n| !n.read).count()
    }

    /// Like [`Dispatcher::mark_read`], but ids `reader` cannot see are
    /// left alone.
    pub fn mark_read_for(&mut self, role: Role, reader: MemberId, id: u64) -> bool {
        match self
            .inboxes
            .get_mut(&role)
            .and_then(|inbox| inbox.iter_mut().find(|n| n.id == id))
        {
            Some(n) if !n.read && visible(role, reader, n) => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    pub fn mark_all_read_for(&mut self, role: Role, reader: MemberId) -> usize {
        let Some(inbox) = self.inboxes.get_mut(&role) else {
            return 0;
        };
        let mut changed = 0;
        for n in inbox
            .iter_mut()
            .filter(|n| !n.read && visible(role, reader, n))
        {
            n.read = true;
            changed += 1;
        }
        changed
    }

    pub fn is_pulsing(&self, role: Role) -> bool {
        self.pulses
            .get(&role)
            .is_some_and(|until| self.clock.now() < *until)
    }

    pub fn clear_pulse(&mut self, role: Role) {
        self.pulses.remove(&role);
    }
}

//! Ordering of overlapping backend responses
//!
//! Every request that may overwrite part of the active game takes a
//! [`Ticket`] when it is issued. When its response arrives it has to
//! [`Claims::claim`] each part it wants to write; a claim succeeds only if
//! no request issued later has already written that part. Responses that
//! lose every claim are discarded, so the view always reflects the most
//! recently issued request that completed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::config::SequencingPolicy;

/// Part of the active game a response may overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The game record itself (id, status)
    Status,
    /// The player list
    Players,
}

/// Issuance order of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Watermarks {
    issued: u64,
    applied: HashMap<Resource, u64>,
}

#[derive(Debug)]
pub struct RequestSequencer {
    policy: SequencingPolicy,
    marks: Mutex<Watermarks>,
}

impl RequestSequencer {
    pub fn new(policy: SequencingPolicy) -> Self {
        Self {
            policy,
            marks: Mutex::new(Watermarks::default()),
        }
    }

    /// Take the next ticket; call at the moment the request is issued
    pub fn issue(&self) -> Ticket {
        let mut marks = self.lock();
        marks.issued += 1;
        Ticket(marks.issued)
    }

    /// Run `apply` with exclusive access to the watermarks
    ///
    /// Dispatch from inside `apply` so that checking a claim and reducing
    /// the response happen as one step.
    pub fn commit<R>(&self, ticket: Ticket, apply: impl FnOnce(&mut Claims<'_>) -> R) -> R {
        let mut marks = self.lock();
        let mut claims = Claims {
            ticket,
            policy: self.policy,
            applied: &mut marks.applied,
        };
        apply(&mut claims)
    }

    /// Highest ticket whose response wrote `resource`
    pub fn applied(&self, resource: Resource) -> u64 {
        self.lock().applied.get(&resource).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Watermarks> {
        self.marks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new(SequencingPolicy::default())
    }
}

/// Claims on behalf of one ticket
pub struct Claims<'a> {
    ticket: Ticket,
    policy: SequencingPolicy,
    applied: &'a mut HashMap<Resource, u64>,
}

impl Claims<'_> {
    /// Try to write `resource`; false if a later request already did
    pub fn claim(&mut self, resource: Resource) -> bool {
        if self.policy == SequencingPolicy::Unordered {
            return true;
        }
        let mark = self.applied.entry(resource).or_insert(0);
        if self.ticket.0 > *mark {
            *mark = self.ticket.0;
            true
        } else {
            false
        }
    }

    /// Write `resource` unconditionally, still fencing off older tickets
    pub fn force(&mut self, resource: Resource) {
        let mark = self.applied.entry(resource).or_insert(0);
        *mark = (*mark).max(self.ticket.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let sequencer = RequestSequencer::default();
        let a = sequencer.issue();
        let b = sequencer.issue();
        assert!(b > a);
        assert_eq!(a.seq() + 1, b.seq());
    }

    #[test]
    fn test_in_order_responses_all_apply() {
        let sequencer = RequestSequencer::default();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(sequencer.commit(first, |c| c.claim(Resource::Players)));
        assert!(sequencer.commit(second, |c| c.claim(Resource::Players)));
        assert_eq!(sequencer.applied(Resource::Players), second.seq());
    }

    #[test]
    fn test_stale_response_is_rejected() {
        let sequencer = RequestSequencer::new(SequencingPolicy::LatestIssued);
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(sequencer.commit(second, |c| c.claim(Resource::Players)));
        assert!(!sequencer.commit(first, |c| c.claim(Resource::Players)));
        assert_eq!(sequencer.applied(Resource::Players), second.seq());
    }

    #[test]
    fn test_resources_are_independent() {
        let sequencer = RequestSequencer::default();
        let status = sequencer.issue();
        let players = sequencer.issue();

        assert!(sequencer.commit(players, |c| c.claim(Resource::Players)));
        let (status_ok, players_ok) = sequencer.commit(status, |c| {
            (c.claim(Resource::Status), c.claim(Resource::Players))
        });
        assert!(status_ok);
        assert!(!players_ok);
    }

    #[test]
    fn test_unordered_policy_accepts_everything() {
        let sequencer = RequestSequencer::new(SequencingPolicy::Unordered);
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(sequencer.commit(second, |c| c.claim(Resource::Players)));
        assert!(sequencer.commit(first, |c| c.claim(Resource::Players)));
    }

    #[test]
    fn test_force_fences_older_tickets() {
        let sequencer = RequestSequencer::default();
        let older = sequencer.issue();
        let forced = sequencer.issue();

        sequencer.commit(forced, |c| c.force(Resource::Players));
        assert!(!sequencer.commit(older, |c| c.claim(Resource::Players)));

        // Forcing with an old ticket never moves the watermark back
        let newest = sequencer.issue();
        sequencer.commit(newest, |c| c.force(Resource::Status));
        sequencer.commit(older, |c| c.force(Resource::Status));
        assert_eq!(sequencer.applied(Resource::Status), newest.seq());
    }
}

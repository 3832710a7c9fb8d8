//! Workflow engine: the single writer of timesheet entries, leave
//! requests, the approval queue, leave balances and gamification counters.
//!
//! Operations are synchronous. Each one validates its input against the
//! current store first and only then mutates, so an `Err` always leaves the
//! store and the dispatcher untouched. Successful operations return an
//! [`Outcome`] listing what happened instead of reaching into presentation
//! concerns.

pub mod calendar;
pub mod clock;
pub mod error;
pub mod store;
pub mod transitions;

mod approval;
mod leave;
mod timesheet;

use crate::dispatcher::Dispatcher;
use crate::model::{
    EntryStatus, LeaveType, MemberId, NotificationKind, NotificationPayload, Role, TeamMember,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub use approval::ApprovalResult;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, WorkflowError};
pub use store::Store;

/// Tunable constants of the workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    /// Granted on the first save of a previously empty day.
    pub xp_first_save: u32,
    pub xp_week_submit: u32,
    /// Granted per day copied from the previous week.
    pub xp_copy_per_day: u32,
    /// A member at level `n` reaches `n + 1` at `n * xp_per_level` xp.
    pub xp_per_level: u32,
    /// How long a role's "new notification" pulse stays on.
    pub pulse_window: chrono::Duration,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            xp_first_save: 10,
            xp_week_submit: 50,
            xp_copy_per_day: 5,
            xp_per_level: 200,
            pulse_window: chrono::Duration::milliseconds(3000),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

/// Something the engine did while handling an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    EntrySaved {
        member: MemberId,
        date: NaiveDate,
        previous: EntryStatus,
    },
    /// An approved day was edited and is back in draft.
    AmendedAfterApproval { member: MemberId, date: NaiveDate },
    /// A submitted day was edited and left its pending queue item.
    EntryWithdrawn {
        member: MemberId,
        date: NaiveDate,
        approval_id: Uuid,
    },
    EntriesCopied {
        member: MemberId,
        dates: Vec<NaiveDate>,
    },
    WeekSubmitted {
        member: MemberId,
        week_label: String,
        dates: Vec<NaiveDate>,
        hours: f64,
    },
    LeaveRequested { request_id: Uuid, days: f64 },
    LeaveCancelled { request_id: Uuid },
    ApprovalQueued { approval_id: Uuid },
    ApprovalUpdated { approval_id: Uuid },
    ApprovalDropped { approval_id: Uuid },
    ApprovalResolved {
        approval_id: Uuid,
        decision: Decision,
    },
    BalanceDebited {
        member: MemberId,
        leave_type: LeaveType,
        days: f64,
        remaining: f64,
    },
    XpGranted {
        member: MemberId,
        amount: u32,
        total: u32,
    },
    LevelReached { member: MemberId, level: u32 },
    NotificationEmitted { role: Role, notification_id: u64 },
}

/// Events produced by one successful operation, in the order they
/// happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outcome {
    pub events: Vec<WorkflowEvent>,
}

impl Outcome {
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }

    pub fn xp_granted(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                WorkflowEvent::XpGranted { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }

    /// Notifications emitted as `(role, id)` pairs.
    pub fn notifications(&self) -> Vec<(Role, u64)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::NotificationEmitted {
                    role,
                    notification_id,
                } => Some((*role, *notification_id)),
                _ => None,
            })
            .collect()
    }

    /// Queue item created by the operation, if any.
    pub fn queued_approval(&self) -> Option<Uuid> {
        self.events.iter().find_map(|e| match e {
            WorkflowEvent::ApprovalQueued { approval_id } => Some(*approval_id),
            _ => None,
        })
    }

    fn push(&mut self, event: WorkflowEvent) {
        self.events.push(event);
    }
}

pub struct Workflow {
    store: Store,
    dispatcher: Dispatcher,
    rules: Rules,
    clock: Arc<dyn Clock>,
}

impl Workflow {
    pub fn new(store: Store, rules: Rules, clock: Arc<dyn Clock>) -> Self {
        let dispatcher = Dispatcher::new(rules.pulse_window, clock.clone());
        Self {
            store,
            dispatcher,
            rules,
            clock,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn mark_read(&mut self, role: Role, id: u64) -> bool {
        self.dispatcher.mark_read(role, id)
    }

    pub fn mark_all_read(&mut self, role: Role) -> usize {
        self.dispatcher.mark_all_read(role)
    }

    /// Marks one notification read on behalf of `reader`; see
    /// [`Dispatcher::mark_read_for`].
    pub fn mark_read_for(&mut self, role: Role, reader: MemberId, id: u64) -> bool {
        self.dispatcher.mark_read_for(role, reader, id)
    }

    pub fn mark_all_read_for(&mut self, role: Role, reader: MemberId) -> usize {
        self.dispatcher.mark_all_read_for(role, reader)
    }

    /// Stops the role's pulse before its window runs out (the inbox was
    /// opened).
    pub fn acknowledge_pulse(&mut self, role: Role) {
        self.dispatcher.clear_pulse(role);
    }

    /// Manager nudge for a member who is behind on their timesheet.
    pub fn send_reminder(&mut self, manager: MemberId, member: MemberId) -> Result<Outcome> {
        let sender = self.require_member(manager)?.name.clone();
        let target = self.require_member(member)?.name.clone();

        let mut outcome = Outcome::default();
        self.emit(
            Role::Consultant,
            NotificationPayload::new(
                NotificationKind::Warning,
                "Reminder",
                format!("{sender} asks you to complete your timesheet"),
            )
            .link("/app/consultant/timesheet")
            .sent_by(manager)
            .about(member),
            &mut outcome,
        );
        tracing::info!(%manager, %member, target = %target, "reminder sent");
        Ok(outcome)
    }

    fn require_member(&self, id: MemberId) -> Result<&TeamMember> {
        self.store
            .member(id)
            .ok_or_else(|| WorkflowError::NotFound(format!("member {id}")))
    }

    fn emit(&mut self, role: Role, payload: NotificationPayload, outcome: &mut Outcome) {
        let notification_id = self.dispatcher.notify(role, payload);
        outcome.push(WorkflowEvent::NotificationEmitted {
            role,
            notification_id,
        });
    }

    /// Adds xp and levels the member up as many times as the new total
    /// allows. The member must exist; callers check before mutating.
    fn grant_xp(&mut self, member: MemberId, amount: u32, outcome: &mut Outcome) {
        if amount == 0 {
            return;
        }
        let per_level = self.rules.xp_per_level.max(1);
        let Some(m) = self.store.member_mut(member) else {
            return;
        };

        m.xp = m.xp.saturating_add(amount);
        outcome.push(WorkflowEvent::XpGranted {
            member,
            amount,
            total: m.xp,
        });
        // A threshold past u32::MAX can never be reached.
        while let Some(threshold) = m.level.checked_mul(per_level) {
            if m.xp < threshold {
                break;
            }
            m.level += 1;
            outcome.push(WorkflowEvent::LevelReached {
                member,
                level: m.level,
            });
            tracing::info!(%member, level = m.level, "level reached");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::{LeaveBalance, Project, Role, TeamMember};
    use chrono::TimeZone;

    pub const MANAGER: MemberId = MemberId(1);
    pub const PAUL: MemberId = MemberId(2);

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn workflow() -> (Workflow, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
        ));
        let mut paul = TeamMember::new(2, "Paul Martin", "paul.martin@kokbif.com", Role::Consultant);
        paul.title = "Consultant Senior".to_string();
        paul.level = 12;
        paul.xp = 2350;
        paul.streak = 12;

        let store = Store::new()
            .with_member(
                TeamMember::new(1, "Korian Dupont", "korian.dupont@kokbif.com", Role::Manager),
                LeaveBalance::full(26.0, 10.0),
            )
            .with_member(
                paul,
                LeaveBalance {
                    paid: 18.0,
                    paid_total: 26.0,
                    rtt: 5.0,
                    rtt_total: 10.0,
                },
            )
            .with_project(Project::new("bgl-sprint", "BGL - Sprint 12", "BGL BNP Paribas"));

        (Workflow::new(store, Rules::default(), clock.clone()), clock)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn xp_crossing_a_threshold_levels_up() {
        let (mut wf, _) = workflow();
        let mut outcome = Outcome::default();
        // level 12 needs 2400
        wf.grant_xp(PAUL, 50, &mut outcome);

        let paul = wf.store().member(PAUL).unwrap();
        assert_eq!(paul.xp, 2400);
        assert_eq!(paul.level, 13);
        assert_eq!(outcome.xp_granted(), 50);
        assert!(outcome
            .events
            .contains(&WorkflowEvent::LevelReached { member: PAUL, level: 13 }));
    }

    #[test]
    fn huge_level_thresholds_do_not_overflow() {
        let (mut wf, _) = workflow();
        wf.rules.xp_per_level = u32::MAX;
        wf.store.member_mut(PAUL).unwrap().xp = u32::MAX - 5;
        let mut outcome = Outcome::default();

        wf.grant_xp(PAUL, 10, &mut outcome);

        let paul = wf.store().member(PAUL).unwrap();
        assert_eq!(paul.xp, u32::MAX);
        assert_eq!(paul.level, 12);
    }

    #[test]
    fn reminder_reaches_consultants() {
        let (mut wf, _) = workflow();
        let outcome = wf.send_reminder(MANAGER, PAUL).unwrap();

        assert_eq!(outcome.notifications().len(), 1);
        let inbox = wf.dispatcher().notifications(Role::Consultant);
        assert_eq!(inbox[0].title, "Reminder");
        assert_eq!(inbox[0].to, Some(PAUL));
    }

    #[test]
    fn reminder_for_unknown_member_fails() {
        let (mut wf, _) = workflow();
        let err = wf.send_reminder(MANAGER, MemberId(99)).unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert!(wf.dispatcher().notifications(Role::Consultant).is_empty());
    }
}

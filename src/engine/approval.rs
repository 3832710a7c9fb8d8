use super::transitions::{EntryAction, LeaveAction, entry_next, leave_next};
use super::{Decision, Outcome, Result, Workflow, WorkflowError, WorkflowEvent};
use crate::model::{
    ApprovalItem, ApprovalKind, ApprovalSubject, EntryStatus, LeaveStatus, LeaveType, MemberId,
    NotificationKind, NotificationPayload, Role,
};
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-item report of a bulk approval.
#[derive(Debug)]
pub struct ApprovalResult {
    pub id: Uuid,
    /// `Ok(None)` when the item had already left the queue.
    pub result: Result<Option<Outcome>>,
}

#[derive(Debug)]
struct BalanceDebit {
    member: MemberId,
    leave_type: LeaveType,
    days: f64,
}

fn link_for(kind: ApprovalKind) -> &'static str {
    match kind {
        ApprovalKind::Timesheet => "/app/consultant/timesheet",
        ApprovalKind::Leave => "/app/consultant/leave",
    }
}

impl Workflow {
    /// Approves a queued item. Resolving an id that is no longer queued
    /// is a no-op so double clicks are harmless.
    pub fn approve_item(&mut self, approver: MemberId, id: Uuid) -> Result<Option<Outcome>> {
        let Some(item) = self.store.approval(id).cloned() else {
            debug!(%approver, approval = %id, "approval already resolved");
            return Ok(None);
        };
        let approver_name = self.require_member(approver)?.name.clone();
        let debit = self.check_resolvable(&item, Decision::Approved)?;

        let mut outcome = Outcome::default();
        let requester = item.requester.id;
        match &item.subject {
            ApprovalSubject::Timesheet { dates, .. } => {
                self.resolve_entries(requester, dates, EntryAction::Approve, None);
                if let Some(m) = self.store.member_mut(requester) {
                    m.timesheet_status = EntryStatus::Approved;
                }
            }
            ApprovalSubject::Leave { request_id, .. } => {
                if let Some(request) = self.store.leave_request_mut(*request_id) {
                    request.status = LeaveStatus::Approved;
                }
            }
        }
        if let Some(debit) = debit {
            self.debit_balance(debit, &mut outcome);
        }

        self.store.remove_approval(id);
        outcome.push(WorkflowEvent::ApprovalResolved {
            approval_id: id,
            decision: Decision::Approved,
        });
        self.emit(
            Role::Consultant,
            NotificationPayload::new(
                NotificationKind::Success,
                "Approved",
                format!("{approver_name} approved {}", item.period),
            )
            .link(link_for(item.kind()))
            .sent_by(approver)
            .about(requester),
            &mut outcome,
        );
        info!(%approver, %requester, approval = %id, kind = %item.kind(), "item approved");
        Ok(Some(outcome))
    }

    /// Rejects a queued item; the reason is kept on the entries or the
    /// leave request and sent to the requester.
    pub fn reject_item(
        &mut self,
        approver: MemberId,
        id: Uuid,
        reason: &str,
    ) -> Result<Option<Outcome>> {
        let reason = reason.trim();
        if reason.is_empty() {
            debug!(%approver, approval = %id, "rejection without reason refused");
            return Err(WorkflowError::MissingReason);
        }
        let Some(item) = self.store.approval(id).cloned() else {
            debug!(%approver, approval = %id, "approval already resolved");
            return Ok(None);
        };
        self.require_member(approver)?;
        self.check_resolvable(&item, Decision::Rejected)?;

        let mut outcome = Outcome::default();
        let requester = item.requester.id;
        match &item.subject {
            ApprovalSubject::Timesheet { dates, .. } => {
                self.resolve_entries(requester, dates, EntryAction::Reject, Some(reason));
                if let Some(m) = self.store.member_mut(requester) {
                    m.timesheet_status = EntryStatus::Rejected;
                }
            }
            ApprovalSubject::Leave { request_id, .. } => {
                if let Some(request) = self.store.leave_request_mut(*request_id) {
                    request.status = LeaveStatus::Rejected;
                    request.reject_reason = Some(reason.to_string());
                }
            }
        }

        self.store.remove_approval(id);
        outcome.push(WorkflowEvent::ApprovalResolved {
            approval_id: id,
            decision: Decision::Rejected,
        });
        self.emit(
            Role::Consultant,
            NotificationPayload::new(NotificationKind::Error, "Rejected", reason)
                .link(link_for(item.kind()))
                .sent_by(approver)
                .about(requester),
            &mut outcome,
        );
        info!(%approver, %requester, approval = %id, reason, "item rejected");
        Ok(Some(outcome))
    }

    /// Approves each id independently; one failure never blocks the
    /// others.
    pub fn approve_all(&mut self, approver: MemberId, ids: &[Uuid]) -> Vec<ApprovalResult> {
        ids.iter()
            .map(|id| {
                let result = self.approve_item(approver, *id);
                if let Err(e) = &result {
                    warn!(%approver, approval = %id, error = %e, "bulk approval skipped item");
                }
                ApprovalResult { id: *id, result }
            })
            .collect()
    }

    /// Validates that the item can be resolved and, for an approval, works
    /// out which balance it will draw from. Nothing is written here.
    fn check_resolvable(
        &self,
        item: &ApprovalItem,
        decision: Decision,
    ) -> Result<Option<BalanceDebit>> {
        let ApprovalSubject::Leave {
            request_id,
            leave_type,
        } = &item.subject
        else {
            return Ok(None);
        };

        let request = self
            .store
            .leave_request(*request_id)
            .ok_or_else(|| WorkflowError::NotFound(format!("leave request {request_id}")))?;
        let action = match decision {
            Decision::Approved => LeaveAction::Approve,
            Decision::Rejected => LeaveAction::Reject,
        };
        leave_next(request.status, action)?;

        if decision == Decision::Rejected || !leave_type.draws_balance() {
            return Ok(None);
        }
        if self.store.balance(request.requester).is_none() {
            return Err(WorkflowError::NotFound(format!(
                "leave balance of member {}",
                request.requester
            )));
        }
        Ok(Some(BalanceDebit {
            member: request.requester,
            leave_type: *leave_type,
            days: request.days,
        }))
    }

    fn resolve_entries(
        &mut self,
        requester: MemberId,
        dates: &[NaiveDate],
        action: EntryAction,
        reason: Option<&str>,
    ) {
        for date in dates {
            let Some(entry) = self.store.entry_mut(requester, *date) else {
                continue;
            };
            // days edited after submission were withdrawn already
            let Ok(next) = entry_next(entry.status, action) else {
                continue;
            };
            entry.status = next;
            entry.reject_reason = reason.map(str::to_string);
        }
    }

    fn debit_balance(&mut self, debit: BalanceDebit, outcome: &mut Outcome) {
        let Some(balance) = self.store.balance_mut(debit.member) else {
            return;
        };
        let remaining = match debit.leave_type {
            LeaveType::Paid => {
                balance.paid -= debit.days;
                balance.paid
            }
            LeaveType::Rtt => {
                balance.rtt -= debit.days;
                balance.rtt
            }
            _ => return,
        };
        if remaining < 0.0 {
            warn!(member = %debit.member, leave_type = %debit.leave_type, remaining, "leave balance overdrawn");
        }
        outcome.push(WorkflowEvent::BalanceDebited {
            member: debit.member,
            leave_type: debit.leave_type,
            days: debit.days,
            remaining,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::model::{Allocation, LeaveDraft};

    fn queue_week(wf: &mut Workflow) -> Uuid {
        let monday = date(2026, 1, 5);
        wf.save_entry(PAUL, monday, vec![Allocation::new("bgl-sprint", 8.0)], None)
            .unwrap();
        wf.submit_week(PAUL, &[monday], "S02")
            .unwrap()
            .queued_approval()
            .unwrap()
    }

    fn queue_leave(wf: &mut Workflow, leave_type: LeaveType) -> Uuid {
        wf.request_leave(
            PAUL,
            LeaveDraft {
                leave_type,
                start_date: date(2026, 2, 10),
                end_date: date(2026, 2, 12),
                half_day: None,
                reason: None,
            },
        )
        .unwrap()
        .queued_approval()
        .unwrap()
    }

    #[test]
    fn approving_paid_leave_draws_only_the_paid_balance() {
        let (mut wf, _) = workflow();
        let id = queue_leave(&mut wf, LeaveType::Paid);

        let outcome = wf.approve_item(MANAGER, id).unwrap().unwrap();

        let balance = wf.store().balance(PAUL).unwrap();
        assert_eq!(balance.paid, 15.0);
        assert_eq!(balance.rtt, 5.0);
        assert!(outcome.events.contains(&WorkflowEvent::BalanceDebited {
            member: PAUL,
            leave_type: LeaveType::Paid,
            days: 3.0,
            remaining: 15.0,
        }));
        assert_eq!(wf.store().leave_requests()[0].status, LeaveStatus::Approved);
    }

    #[test]
    fn sick_leave_does_not_touch_balances() {
        let (mut wf, _) = workflow();
        let id = queue_leave(&mut wf, LeaveType::Sick);
        let before = *wf.store().balance(PAUL).unwrap();

        wf.approve_item(MANAGER, id).unwrap();
        assert_eq!(*wf.store().balance(PAUL).unwrap(), before);
    }

    #[test]
    fn second_approval_is_a_noop() {
        let (mut wf, _) = workflow();
        let id = queue_leave(&mut wf, LeaveType::Rtt);

        assert!(wf.approve_item(MANAGER, id).unwrap().is_some());
        let consultant_inbox = wf.dispatcher().notifications(Role::Consultant).len();

        assert!(wf.approve_item(MANAGER, id).unwrap().is_none());
        assert_eq!(wf.store().balance(PAUL).unwrap().rtt, 2.0);
        assert_eq!(
            wf.dispatcher().notifications(Role::Consultant).len(),
            consultant_inbox
        );
    }

    #[test]
    fn rejection_needs_a_reason() {
        let (mut wf, _) = workflow();
        let id = queue_week(&mut wf);

        let err = wf.reject_item(MANAGER, id, "  ").unwrap_err();
        assert_eq!(err, WorkflowError::MissingReason);
        assert_eq!(wf.store().approvals().len(), 1);
        assert_eq!(
            wf.store().entry(PAUL, date(2026, 1, 5)).unwrap().status,
            EntryStatus::Submitted
        );
    }

    #[test]
    fn rejected_week_keeps_reason_and_can_be_edited_again() {
        let (mut wf, _) = workflow();
        let id = queue_week(&mut wf);
        let monday = date(2026, 1, 5);

        wf.reject_item(MANAGER, id, "Wrong project").unwrap();
        let entry = wf.store().entry(PAUL, monday).unwrap();
        assert_eq!(entry.status, EntryStatus::Rejected);
        assert_eq!(entry.reject_reason.as_deref(), Some("Wrong project"));
        assert_eq!(
            wf.store().member(PAUL).unwrap().timesheet_status,
            EntryStatus::Rejected
        );

        wf.save_entry(PAUL, monday, vec![Allocation::new("bgl-support", 8.0)], None)
            .unwrap();
        let entry = wf.store().entry(PAUL, monday).unwrap();
        assert_eq!(entry.status, EntryStatus::Draft);
        assert_eq!(entry.reject_reason, None);
        assert!(wf.submit_week(PAUL, &[monday], "S02").is_ok());
    }

    #[test]
    fn editing_an_approved_day_warns_the_manager() {
        let (mut wf, _) = workflow();
        let id = queue_week(&mut wf);
        wf.approve_item(MANAGER, id).unwrap();
        let monday = date(2026, 1, 5);

        let outcome = wf
            .save_entry(PAUL, monday, vec![Allocation::new("bgl-sprint", 7.0)], None)
            .unwrap();

        assert!(outcome.events.contains(&WorkflowEvent::AmendedAfterApproval {
            member: PAUL,
            date: monday
        }));
        assert_eq!(wf.store().entry(PAUL, monday).unwrap().status, EntryStatus::Draft);
        let latest = &wf.dispatcher().notifications(Role::Manager)[0];
        assert_eq!(latest.kind, NotificationKind::Warning);
    }

    #[test]
    fn bulk_approval_reports_each_item() {
        let (mut wf, _) = workflow();
        let week = queue_week(&mut wf);
        let leave = queue_leave(&mut wf, LeaveType::Paid);
        let gone = Uuid::new_v4();

        let results = wf.approve_all(MANAGER, &[week, gone, leave]);

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0].result, Ok(Some(_))));
        assert!(matches!(results[1].result, Ok(None)));
        assert!(matches!(results[2].result, Ok(Some(_))));
        assert!(wf.store().approvals().is_empty());
    }

    #[test]
    fn unknown_approver_changes_nothing() {
        let (mut wf, _) = workflow();
        let id = queue_leave(&mut wf, LeaveType::Paid);

        let err = wf.approve_item(MemberId(77), id).unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(wf.store().approvals().len(), 1);
        assert_eq!(wf.store().balance(PAUL).unwrap().paid, 18.0);
    }
}

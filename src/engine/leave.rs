use super::calendar;
use super::transitions::{LeaveAction, leave_next};
use super::{Outcome, Result, Workflow, WorkflowError, WorkflowEvent};
use crate::model::{
    ApprovalItem, ApprovalSubject, LeaveDraft, LeaveRequest, LeaveStatus, MemberId,
    NotificationKind, NotificationPayload, RequesterSnapshot, Role,
};
use tracing::{debug, info};
use uuid::Uuid;

impl Workflow {
    /// Files a pending leave request and queues it for the manager.
    pub fn request_leave(&mut self, requester: MemberId, draft: LeaveDraft) -> Result<Outcome> {
        let member = self.require_member(requester)?;
        let snapshot = RequesterSnapshot {
            id: member.id,
            name: member.name.clone(),
            title: member.title.clone(),
        };
        let days = calendar::leave_days(draft.start_date, draft.end_date, draft.half_day)
            .inspect_err(|e| debug!(%requester, error = %e, "leave request rejected"))?;

        let now = self.clock.now();
        let request = LeaveRequest {
            id: Uuid::new_v4(),
            requester,
            leave_type: draft.leave_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
            half_day: draft.half_day,
            days,
            reason: draft
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            status: LeaveStatus::Pending,
            reject_reason: None,
            created_at: now,
        };

        let period = match request.half_day {
            Some(half) => format!("{} ({half})", request.start_date),
            None if request.start_date == request.end_date => request.start_date.to_string(),
            None => format!("{} - {}", request.start_date, request.end_date),
        };
        let item = ApprovalItem {
            id: Uuid::new_v4(),
            requester: snapshot.clone(),
            subject: ApprovalSubject::Leave {
                request_id: request.id,
                leave_type: request.leave_type,
            },
            period,
            hours: None,
            days: Some(days),
            note: request.reason.clone(),
            submitted_at: now,
        };

        let mut outcome = Outcome::default();
        let (request_id, approval_id, leave_type) = (request.id, item.id, request.leave_type);
        self.store.push_leave_request(request);
        self.store.push_approval(item);
        outcome.push(WorkflowEvent::LeaveRequested { request_id, days });
        outcome.push(WorkflowEvent::ApprovalQueued { approval_id });

        self.emit(
            Role::Manager,
            NotificationPayload::new(
                NotificationKind::Info,
                "Leave request",
                format!("{}: {days}d {}", snapshot.name, leave_type.label()),
            )
            .link("/app/manager/approvals")
            .sent_by(requester),
            &mut outcome,
        );
        info!(%requester, %request_id, %leave_type, days, "leave requested");
        Ok(outcome)
    }

    /// Withdraws a pending request together with its queue item. Only the
    /// member who filed it can cancel; anyone else gets `NotFound`.
    pub fn cancel_leave_request(&mut self, requester: MemberId, id: Uuid) -> Result<Outcome> {
        let request = self
            .store
            .leave_request(id)
            .filter(|r| r.requester == requester)
            .ok_or_else(|| {
                debug!(%requester, request_id = %id, "cancel of unknown or foreign request");
                WorkflowError::NotFound(format!("leave request {id}"))
            })?;
        leave_next(request.status, LeaveAction::Cancel)?;

        let mut outcome = Outcome::default();
        self.store.remove_leave_request(id);
        let queued = self
            .store
            .approvals()
            .iter()
            .find(|a| a.is_leave(id))
            .map(|a| a.id);
        if let Some(approval_id) = queued {
            self.store.remove_approval(approval_id);
            outcome.push(WorkflowEvent::ApprovalDropped { approval_id });
        }
        outcome.push(WorkflowEvent::LeaveCancelled { request_id: id });
        info!(%requester, request_id = %id, "leave request cancelled");
        Ok(outcome)
    }
}

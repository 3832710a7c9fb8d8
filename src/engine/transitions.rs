//! Status transition tables.
//!
//! ```text
//! empty ──save──> draft ──submit──> submitted ──approve──> approved
//!                   ^ │                  │                     │
//!                   │ └──save (noop)     └──reject──> rejected │
//!                   │                                    │     │
//!                   └────────────save────────────────────┴─────┘
//! ```
//!
//! Saving over a submitted entry is also allowed and pulls it back to
//! draft; the engine takes care of withdrawing it from its queue item.

use crate::engine::error::{Result, WorkflowError};
use crate::model::{EntryStatus, LeaveStatus};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EntryAction {
    Save,
    Submit,
    Approve,
    Reject,
}

pub fn entry_next(from: EntryStatus, action: EntryAction) -> Result<EntryStatus> {
    use EntryAction::*;
    use EntryStatus::*;

    match (from, action) {
        (_, Save) => Ok(Draft),
        (Draft, Submit) => Ok(Submitted),
        (Submitted, Approve) => Ok(Approved),
        (Submitted, Reject) => Ok(Rejected),
        (Empty | Submitted | Approved | Rejected, Submit)
        | (Empty | Draft | Approved | Rejected, Approve | Reject) => Err(
            WorkflowError::InvalidState(format!("cannot {action:?} an entry that is {from}")),
        ),
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LeaveAction {
    Approve,
    Reject,
    Cancel,
}

/// `None` means the request leaves the store (cancellation).
pub fn leave_next(from: LeaveStatus, action: LeaveAction) -> Result<Option<LeaveStatus>> {
    match (from, action) {
        (LeaveStatus::Pending, LeaveAction::Approve) => Ok(Some(LeaveStatus::Approved)),
        (LeaveStatus::Pending, LeaveAction::Reject) => Ok(Some(LeaveStatus::Rejected)),
        (LeaveStatus::Pending, LeaveAction::Cancel) => Ok(None),
        (LeaveStatus::Approved | LeaveStatus::Rejected, _) => Err(WorkflowError::InvalidState(
            format!("cannot {action:?} a leave request that is {from}"),
        )),
    }
}

pub mod approval;
pub mod leave_balance;
pub mod leave_request;
pub mod notification;
pub mod project;
pub mod role;
pub mod team_member;
pub mod timesheet;

pub use approval::{ApprovalItem, ApprovalKind, ApprovalSubject, RequesterSnapshot};
pub use leave_balance::LeaveBalance;
pub use leave_request::{HalfDayPeriod, LeaveDraft, LeaveRequest, LeaveStatus, LeaveType};
pub use notification::{Notification, NotificationKind, NotificationPayload};
pub use project::Project;
pub use role::Role;
pub use team_member::{MemberId, MemberStatus, TeamMember};
pub use timesheet::{Allocation, EntryStatus, TimesheetEntry};

use crate::api::approvals::{ApproveAllPayload, BulkResult, RejectPayload};
use crate::api::timesheet::{CopyWeek, SaveEntry, SubmitWeek};
use crate::model::{
    Allocation, ApprovalItem, ApprovalKind, ApprovalSubject, EntryStatus, HalfDayPeriod,
    LeaveBalance, LeaveDraft, LeaveRequest, LeaveStatus, LeaveType, MemberId, MemberStatus,
    Notification, NotificationKind, Project, RequesterSnapshot, Role, TeamMember, TimesheetEntry,
};
use crate::query::{
    ActivityReport, PendingSummary, ProjectTotal, ReportDay, TeamLeave, TeamStats, WeekCompletion,
};
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Timesheet & Leave API",
        version = "1.0.0",
        description = r#"
## Timesheet and leave workflow

Consultants record daily hours, submit them week by week and request
leave. Managers approve or reject the resulting queue items.

### Key Features
- **Timesheet**
  - Save a day, submit a week, copy the previous week, export an activity report
- **Leave**
  - Request and cancel leave, view balances
- **Approvals**
  - Approve, reject (with a reason) or approve everything at once
- **Notifications**
  - Role inboxes with unread counts and a short "new" pulse

### Identity
The service sits behind an auth gateway which forwards `X-User-Id` and
`X-User-Role` (`consultant` or `manager`).
"#,
    ),
    paths(
        crate::api::timesheet::save_entry,
        crate::api::timesheet::list_entries,
        crate::api::timesheet::submit_week,
        crate::api::timesheet::copy_previous_week,
        crate::api::timesheet::export_report,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::leave_balance,

        crate::api::approvals::list_approvals,
        crate::api::approvals::approve,
        crate::api::approvals::reject,
        crate::api::approvals::approve_all,

        crate::api::notifications::list_notifications,
        crate::api::notifications::mark_read,
        crate::api::notifications::mark_all_read,

        crate::api::reports::team_stats,
        crate::api::reports::leaderboard,
        crate::api::reports::pending_summary,
        crate::api::reports::week_completion,
        crate::api::reports::team_leaves,

        crate::api::team::list_team,
        crate::api::team::list_projects,
        crate::api::team::send_reminder
    ),
    components(
        schemas(
            SaveEntry,
            SubmitWeek,
            CopyWeek,
            RejectPayload,
            ApproveAllPayload,
            BulkResult,
            Allocation,
            TimesheetEntry,
            EntryStatus,
            LeaveDraft,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            HalfDayPeriod,
            LeaveBalance,
            ApprovalItem,
            ApprovalKind,
            ApprovalSubject,
            RequesterSnapshot,
            Notification,
            NotificationKind,
            TeamMember,
            MemberId,
            MemberStatus,
            Role,
            Project,
            TeamStats,
            PendingSummary,
            WeekCompletion,
            ActivityReport,
            ReportDay,
            ProjectTotal,
            TeamLeave
        )
    ),
    modifiers(&GatewayIdentity),
    security(
        ("user_id" = []),
        ("user_role" = [])
    ),
    tags(
        (name = "Timesheet", description = "Daily entries and weekly submission"),
        (name = "Leave", description = "Leave requests and balances"),
        (name = "Approvals", description = "Manager approval queue"),
        (name = "Notifications", description = "Role inboxes"),
        (name = "Reports", description = "Dashboards and rankings"),
        (name = "Team", description = "Team members and reminders"),
    )
)]
pub struct ApiDoc;

/// Documents the gateway identity headers as API keys.
pub struct GatewayIdentity;

impl Modify for GatewayIdentity {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "user_id",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                crate::auth::auth::USER_ID_HEADER,
            ))),
        );
        components.add_security_scheme(
            "user_role",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                crate::auth::auth::USER_ROLE_HEADER,
            ))),
        );
    }
}

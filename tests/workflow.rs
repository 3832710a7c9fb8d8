use chrono::{NaiveDate, TimeZone, Utc};
use hrm_timesheet::engine::{ManualClock, Rules, Store, Workflow, WorkflowError};
use hrm_timesheet::model::{
    Allocation, ApprovalKind, EntryStatus, LeaveBalance, LeaveDraft, LeaveStatus, LeaveType,
    MemberId, NotificationKind, NotificationPayload, Project, Role, TeamMember,
};
use std::sync::Arc;

const MANAGER: MemberId = MemberId(1);
const PAUL: MemberId = MemberId(2);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (Workflow, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
    ));
    let store = Store::new()
        .with_member(
            TeamMember::new(1, "Korian Dupont", "korian.dupont@kokbif.com", Role::Manager),
            LeaveBalance::full(26.0, 10.0),
        )
        .with_member(
            TeamMember::new(2, "Paul Martin", "paul.martin@kokbif.com", Role::Consultant),
            LeaveBalance {
                paid: 18.0,
                paid_total: 26.0,
                rtt: 5.0,
                rtt_total: 10.0,
            },
        )
        .with_project(Project::new("bgl-sprint", "BGL - Sprint 12", "BGL BNP Paribas"))
        .with_project(Project::new("internal", "Internal", "Kokbif"));
    (Workflow::new(store, Rules::default(), clock.clone()), clock)
}

fn bgl(hours: f64) -> Vec<Allocation> {
    vec![Allocation::new("bgl-sprint", hours)]
}

fn leave(leave_type: LeaveType, start: NaiveDate, end: NaiveDate) -> LeaveDraft {
    LeaveDraft {
        leave_type,
        start_date: start,
        end_date: end,
        half_day: None,
        reason: None,
    }
}

#[test]
fn timesheet_week_goes_from_draft_to_approved() {
    let (mut wf, _) = setup();
    let monday = date(2026, 1, 5);
    let xp_before = wf.store().member(PAUL).unwrap().xp;

    wf.save_entry(PAUL, monday, bgl(8.0), None).unwrap();
    assert_eq!(wf.store().entry(PAUL, monday).unwrap().status, EntryStatus::Draft);
    assert_eq!(
        wf.store().member(PAUL).unwrap().xp,
        xp_before + wf.rules().xp_first_save
    );

    wf.submit_week(PAUL, &[monday], "S02").unwrap();
    assert_eq!(wf.store().entry(PAUL, monday).unwrap().status, EntryStatus::Submitted);
    assert_eq!(wf.store().approvals().len(), 1);
    let item = wf.store().approvals()[0].clone();
    assert_eq!(item.hours, Some(8.0));
    assert_eq!(item.kind(), ApprovalKind::Timesheet);
    assert_eq!(wf.dispatcher().notifications(Role::Manager).len(), 1);

    let outcome = wf.approve_item(MANAGER, item.id).unwrap();
    assert!(outcome.is_some());
    assert_eq!(wf.store().entry(PAUL, monday).unwrap().status, EntryStatus::Approved);
    assert!(wf.store().approvals().is_empty());
    let inbox = wf.dispatcher().notifications(Role::Consultant);
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Success);
}

#[test]
fn rejected_leave_keeps_balance_and_reason() {
    let (mut wf, _) = setup();
    wf.request_leave(PAUL, leave(LeaveType::Paid, date(2026, 2, 9), date(2026, 2, 11)))
        .unwrap();
    let request = wf.store().leave_requests()[0].clone();
    assert_eq!(request.days, 3.0);
    let item = wf.store().approvals()[0].id;

    wf.reject_item(MANAGER, item, "Coverage conflict").unwrap();

    let request = wf.store().leave_request(request.id).unwrap();
    assert_eq!(request.status, LeaveStatus::Rejected);
    assert_eq!(request.reject_reason.as_deref(), Some("Coverage conflict"));
    assert_eq!(wf.store().balance(PAUL).unwrap().paid, 18.0);
    let latest = &wf.dispatcher().notifications(Role::Consultant)[0];
    assert_eq!(latest.kind, NotificationKind::Error);
    assert!(latest.message.contains("Coverage conflict"));
}

#[test]
fn saving_always_lands_in_draft() {
    let (mut wf, _) = setup();
    let monday = date(2026, 1, 5);
    wf.save_entry(PAUL, monday, bgl(8.0), None).unwrap();
    wf.submit_week(PAUL, &[monday], "S02").unwrap();
    let id = wf.store().approvals()[0].id;
    wf.approve_item(MANAGER, id).unwrap();

    let edited = vec![
        Allocation::new("bgl-sprint", 6.0),
        Allocation::new("internal", 2.0),
    ];
    wf.save_entry(PAUL, monday, edited.clone(), None).unwrap();

    let entry = wf.store().entry(PAUL, monday).unwrap();
    assert_eq!(entry.status, EntryStatus::Draft);
    assert_eq!(entry.allocations, edited);
}

#[test]
fn empty_week_leaves_queue_untouched() {
    let (mut wf, _) = setup();
    assert!(matches!(
        wf.submit_week(PAUL, &[], "S02"),
        Err(WorkflowError::EmptyWeek(_))
    ));
    assert!(matches!(
        wf.submit_week(PAUL, &[date(2026, 1, 5), date(2026, 1, 6)], "S02"),
        Err(WorkflowError::EmptyWeek(_))
    ));
    assert!(wf.store().approvals().is_empty());
    assert!(wf.dispatcher().notifications(Role::Manager).is_empty());
}

#[test]
fn leave_day_counts() {
    let (mut wf, _) = setup();
    wf.request_leave(PAUL, leave(LeaveType::Rtt, date(2026, 2, 9), date(2026, 2, 13)))
        .unwrap();
    assert_eq!(wf.store().leave_requests()[0].days, 5.0);

    let err = wf
        .request_leave(PAUL, leave(LeaveType::Paid, date(2026, 2, 7), date(2026, 2, 8)))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ZeroDays { .. }));
    assert_eq!(wf.store().leave_requests().len(), 1);
}

#[test]
fn paid_approval_debits_only_paid_balance() {
    let (mut wf, _) = setup();
    wf.request_leave(PAUL, leave(LeaveType::Paid, date(2026, 2, 9), date(2026, 2, 11)))
        .unwrap();
    let id = wf.store().approvals()[0].id;

    wf.approve_item(MANAGER, id).unwrap();

    let balance = wf.store().balance(PAUL).unwrap();
    assert_eq!(balance.paid, 15.0);
    assert_eq!(balance.rtt, 5.0);
}

#[test]
fn second_approval_is_a_noop() {
    let (mut wf, _) = setup();
    wf.request_leave(PAUL, leave(LeaveType::Paid, date(2026, 2, 9), date(2026, 2, 9)))
        .unwrap();
    let id = wf.store().approvals()[0].id;

    assert!(wf.approve_item(MANAGER, id).unwrap().is_some());
    let inbox_len = wf.dispatcher().notifications(Role::Consultant).len();

    assert_eq!(wf.approve_item(MANAGER, id), Ok(None));
    assert_eq!(wf.store().balance(PAUL).unwrap().paid, 17.0);
    assert_eq!(wf.dispatcher().notifications(Role::Consultant).len(), inbox_len);
}

#[test]
fn rejection_needs_a_reason() {
    let (mut wf, _) = setup();
    let monday = date(2026, 1, 5);
    wf.save_entry(PAUL, monday, bgl(8.0), None).unwrap();
    wf.submit_week(PAUL, &[monday], "S02").unwrap();
    let id = wf.store().approvals()[0].id;

    assert_eq!(wf.reject_item(MANAGER, id, ""), Err(WorkflowError::MissingReason));
    assert_eq!(wf.reject_item(MANAGER, id, "   "), Err(WorkflowError::MissingReason));
    assert_eq!(wf.store().entry(PAUL, monday).unwrap().status, EntryStatus::Submitted);
    assert_eq!(wf.store().approvals().len(), 1);
}

#[test]
fn inbox_lists_newest_first() {
    let (mut wf, clock) = setup();
    // Notifications are emitted by operations; reminders are the simplest.
    for _ in 0..3 {
        wf.send_reminder(MANAGER, PAUL).unwrap();
        clock.advance(chrono::Duration::seconds(1));
    }
    let ids: Vec<u64> = wf
        .dispatcher()
        .notifications(Role::Consultant)
        .iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn pulse_expires_after_window() {
    let (mut wf, clock) = setup();
    wf.send_reminder(MANAGER, PAUL).unwrap();
    assert!(wf.dispatcher().is_pulsing(Role::Consultant));
    assert!(!wf.dispatcher().is_pulsing(Role::Manager));

    clock.advance(chrono::Duration::milliseconds(3000));
    assert!(!wf.dispatcher().is_pulsing(Role::Consultant));
}

#[test]
fn read_flags_and_unread_counts() {
    let (mut wf, _) = setup();
    wf.send_reminder(MANAGER, PAUL).unwrap();
    wf.send_reminder(MANAGER, PAUL).unwrap();
    assert_eq!(wf.dispatcher().unread_count(Role::Consultant), 2);

    assert!(wf.mark_read(Role::Consultant, 1));
    assert!(!wf.mark_read(Role::Manager, 2));
    assert_eq!(wf.dispatcher().unread_count(Role::Consultant), 1);

    assert_eq!(wf.mark_all_read(Role::Consultant), 1);
    assert_eq!(wf.dispatcher().unread_count(Role::Consultant), 0);
}

#[test]
fn approve_all_reports_each_item() {
    let (mut wf, _) = setup();
    wf.request_leave(PAUL, leave(LeaveType::Rtt, date(2026, 2, 9), date(2026, 2, 9)))
        .unwrap();
    let monday = date(2026, 1, 5);
    wf.save_entry(PAUL, monday, bgl(8.0), None).unwrap();
    wf.submit_week(PAUL, &[monday], "S02").unwrap();

    let mut ids: Vec<_> = wf.store().approvals().iter().map(|i| i.id).collect();
    ids.push(uuid::Uuid::new_v4());
    let results = wf.approve_all(MANAGER, &ids);

    assert_eq!(results.len(), 3);
    assert!(results[0].result.as_ref().unwrap().is_some());
    assert!(results[1].result.as_ref().unwrap().is_some());
    assert!(results[2].result.as_ref().unwrap().is_none());
    assert!(wf.store().approvals().is_empty());
    assert_eq!(wf.store().balance(PAUL).unwrap().rtt, 4.0);
}

#[test]
fn cancelled_leave_leaves_the_queue() {
    let (mut wf, _) = setup();
    wf.request_leave(PAUL, leave(LeaveType::Sick, date(2026, 2, 9), date(2026, 2, 10)))
        .unwrap();
    let id = wf.store().leave_requests()[0].id;

    wf.cancel_leave_request(PAUL, id).unwrap();

    assert!(wf.store().leave_requests().is_empty());
    assert!(wf.store().approvals().is_empty());
    assert!(matches!(
        wf.cancel_leave_request(PAUL, id),
        Err(WorkflowError::NotFound(_))
    ));
}

#[test]
fn notification_payload_builder_sets_routing() {
    let payload = NotificationPayload::new(NotificationKind::Info, "Title", "Body")
        .link("/app")
        .sent_by(MANAGER)
        .about(PAUL);
    assert_eq!(payload.from, Some(MANAGER));
    assert_eq!(payload.to, Some(PAUL));
    assert_eq!(payload.link.as_deref(), Some("/app"));
}

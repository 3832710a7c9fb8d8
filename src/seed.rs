//! Demo data loaded at startup when `SEED_DEMO` is on: one manager, the
//! consulting team and the project catalog. [`demo_workflow`] then plays
//! recent activity through the engine so the queue, the entries and the
//! leave calendar agree with the seeded profiles.

use crate::config::Config;
use crate::engine::{Clock, Result, Store, Workflow, calendar};
use crate::model::{
    Allocation, EntryStatus, LeaveBalance, LeaveDraft, LeaveType, MemberId, MemberStatus,
    Project, Role, TeamMember,
};
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use tracing::info;

struct Seed {
    id: u64,
    name: &'static str,
    title: &'static str,
    level: u32,
    xp: u32,
    streak: u32,
    project: &'static str,
    status: MemberStatus,
    timesheet: EntryStatus,
}

const TEAM: &[Seed] = &[
    Seed { id: 2, name: "Paul Martin", title: "Consultant Senior", level: 12, xp: 2350, streak: 12, project: "BGL - Sprint 12", status: MemberStatus::Active, timesheet: EntryStatus::Submitted },
    Seed { id: 3, name: "Marie Dupont", title: "Senior Consultant", level: 14, xp: 2890, streak: 8, project: "POST - Migration", status: MemberStatus::Active, timesheet: EntryStatus::Submitted },
    Seed { id: 4, name: "Julie Martin", title: "Project Lead", level: 16, xp: 3450, streak: 22, project: "Clearstream - SI", status: MemberStatus::Active, timesheet: EntryStatus::Approved },
    Seed { id: 5, name: "Lucas Bernard", title: "Full Stack Developer", level: 10, xp: 1950, streak: 0, project: "BGL - Sprint 12", status: MemberStatus::Late, timesheet: EntryStatus::Draft },
    Seed { id: 6, name: "Emma Wilson", title: "Business Analyst", level: 11, xp: 2150, streak: 3, project: "SES - Analytics", status: MemberStatus::Late, timesheet: EntryStatus::Draft },
    Seed { id: 7, name: "Thomas Weber", title: "DevOps Engineer", level: 13, xp: 2650, streak: 15, project: "Internal - Infra", status: MemberStatus::Active, timesheet: EntryStatus::Approved },
    Seed { id: 8, name: "Sophie Chen", title: "UX Designer", level: 9, xp: 1720, streak: 5, project: "POST - Mobile", status: MemberStatus::OnLeave, timesheet: EntryStatus::Approved },
    Seed { id: 9, name: "Pierre Durand", title: "SAP Consultant", level: 17, xp: 3890, streak: 45, project: "Deloitte - SAP", status: MemberStatus::Active, timesheet: EntryStatus::Submitted },
    Seed { id: 10, name: "Clara Martinez", title: "Data Scientist", level: 8, xp: 1450, streak: 7, project: "SES - ML", status: MemberStatus::Active, timesheet: EntryStatus::Submitted },
    Seed { id: 11, name: "Antoine Leroy", title: "Architect", level: 18, xp: 4200, streak: 60, project: "Clearstream - Archi", status: MemberStatus::Active, timesheet: EntryStatus::Approved },
    Seed { id: 12, name: "Léa Petit", title: "Scrum Master", level: 14, xp: 2980, streak: 18, project: "BGL - Agile", status: MemberStatus::Active, timesheet: EntryStatus::Submitted },
    Seed { id: 13, name: "Hugo Moreau", title: "Security", level: 15, xp: 3150, streak: 25, project: "BCEE - Security", status: MemberStatus::Active, timesheet: EntryStatus::Approved },
];

const PROJECTS: &[(&str, &str, &str)] = &[
    ("bgl-sprint", "BGL - Sprint 12", "BGL BNP Paribas"),
    ("bgl-support", "BGL - Support", "BGL BNP Paribas"),
    ("post-migration", "POST - Migration", "POST Luxembourg"),
    ("post-mobile", "POST - Mobile", "POST Luxembourg"),
    ("ses-analytics", "SES - Analytics", "SES"),
    ("clearstream-si", "Clearstream - SI", "Clearstream"),
    ("bcee-security", "BCEE - Security", "Spuerkeess"),
    ("deloitte-sap", "Deloitte - SAP", "Deloitte"),
    ("ses-ml", "SES - ML", "SES"),
    ("bgl-agile", "BGL - Agile", "BGL BNP Paribas"),
    ("internal-formation", "Internal - Formation", "Kokbif"),
    ("internal-meeting", "Internal - Meeting", "Kokbif"),
];

fn email(name: &str) -> String {
    let local = name
        .to_lowercase()
        .replace(' ', ".")
        .replace('é', "e");
    format!("{local}@kokbif.com")
}

pub fn demo_store(config: &Config) -> Store {
    let full = LeaveBalance::full(config.paid_leave_days, config.rtt_days);

    let mut manager = TeamMember::new(1, "Korian Dupont", email("Korian Dupont"), Role::Manager);
    manager.title = "Manager".to_string();
    manager.level = 15;
    manager.xp = 3200;

    let mut store = Store::new().with_member(manager, full);
    for seed in TEAM {
        let mut member = TeamMember::new(seed.id, seed.name, email(seed.name), Role::Consultant);
        member.title = seed.title.to_string();
        member.level = seed.level;
        member.xp = seed.xp;
        member.streak = seed.streak;
        member.project = Some(seed.project.to_string());
        member.status = seed.status;
        member.timesheet_status = seed.timesheet;

        // the demo consultant has already used part of the allowance
        let balance = if seed.id == 2 {
            LeaveBalance {
                paid: full.paid_total - 8.0,
                rtt: full.rtt_total - 5.0,
                ..full
            }
        } else {
            full
        };
        store.add_member(member, balance);
    }

    PROJECTS
        .iter()
        .fold(store, |store, (id, name, client)| {
            store.with_project(Project::new(id, name, client))
        })
}

const MANAGER: MemberId = MemberId(1);
const PAUL: MemberId = MemberId(2);

/// Project booked by each member with a week waiting for approval.
const SUBMITTED_PROJECT: &[(u64, &str)] = &[
    (3, "post-migration"),
    (9, "deloitte-sap"),
    (10, "ses-ml"),
    (12, "bgl-agile"),
];

/// Settled leave: member, type, offset of the first day from today in
/// business days, length in business days.
const APPROVED_LEAVE: &[(u64, LeaveType, i64, u32)] = &[
    (2, LeaveType::Paid, 30, 5),
    (8, LeaveType::Paid, -1, 4),
    (3, LeaveType::Paid, 7, 5),
    (11, LeaveType::Paid, 14, 5),
    (9, LeaveType::Rtt, 3, 1),
];

/// Open leave requests, same layout plus the reason.
const PENDING_LEAVE: &[(u64, LeaveType, i64, u32, &str)] = &[
    (2, LeaveType::Rtt, 10, 1, "Medical appointment"),
    (4, LeaveType::Rtt, 5, 3, "Long weekend"),
    (10, LeaveType::Paid, 20, 5, "Holidays"),
];

fn shift_business_days(mut date: NaiveDate, offset: i64) -> NaiveDate {
    for _ in 0..offset.unsigned_abs() {
        date = if offset > 0 {
            calendar::next_business_day(date)
        } else {
            let mut prev = date - Days::new(1);
            while !calendar::is_business_day(prev) {
                prev = prev - Days::new(1);
            }
            prev
        };
    }
    date
}

/// First and last business day of a `days` long span starting `offset`
/// business days from `today`.
fn business_span(today: NaiveDate, offset: i64, days: u32) -> (NaiveDate, NaiveDate) {
    let mut start = today;
    if !calendar::is_business_day(start) {
        start = calendar::next_business_day(start);
    }
    let start = shift_business_days(start, offset);
    let end = shift_business_days(start, i64::from(days.saturating_sub(1)));
    (start, end)
}

/// Paul's usual week rotates between these splits.
fn paul_day(weeks_back: u64, day: usize) -> Vec<Allocation> {
    let split: &[(&str, f64)] = match (weeks_back as usize + day) % 4 {
        0 => &[("bgl-sprint", 8.0)],
        1 => &[("bgl-sprint", 6.0), ("internal-meeting", 2.0)],
        2 => &[("bgl-sprint", 4.0), ("bgl-support", 4.0)],
        _ => &[("bgl-sprint", 7.0), ("internal-formation", 1.0)],
    };
    split
        .iter()
        .map(|(project, hours)| Allocation {
            project_id: project.to_string(),
            hours: *hours,
        })
        .collect()
}

fn full_day(project: &str) -> Vec<Allocation> {
    vec![Allocation {
        project_id: project.to_string(),
        hours: 8.0,
    }]
}

fn leave(
    leave_type: LeaveType,
    (start_date, end_date): (NaiveDate, NaiveDate),
    reason: Option<&str>,
) -> LeaveDraft {
    LeaveDraft {
        leave_type,
        start_date,
        end_date,
        half_day: None,
        reason: reason.map(str::to_string),
    }
}

/// Saves a full week of `allocations` for `member` and submits it.
fn submit_week_of(
    wf: &mut Workflow,
    member: MemberId,
    monday: NaiveDate,
    allocations: impl Fn(usize) -> Vec<Allocation>,
) -> Result<Option<uuid::Uuid>> {
    let dates = calendar::week_dates(monday);
    for (day, date) in dates.iter().enumerate() {
        wf.save_entry(member, *date, allocations(day), None)?;
    }
    let outcome = wf.submit_week(member, &dates, &calendar::week_label(monday))?;
    Ok(outcome.queued_approval())
}

/// Demo store with its history and open work replayed through the
/// engine. Profiles and balances keep their seeded values; the history
/// notifications are already read.
pub fn demo_workflow(config: &Config, clock: Arc<dyn Clock>) -> Result<Workflow> {
    let base = demo_store(config);
    let mut wf = Workflow::new(base.clone(), config.rules(), clock);
    let today = wf.today();
    let this_monday = calendar::week_start(today);

    // Paul's approved history
    for weeks_back in (2..=5u64).rev() {
        let monday = this_monday - Days::new(7 * weeks_back);
        let queued = submit_week_of(&mut wf, PAUL, monday, |day| paul_day(weeks_back, day))?;
        if let Some(item) = queued {
            wf.approve_item(MANAGER, item)?;
        }
    }
    for (member, leave_type, offset, days) in APPROVED_LEAVE {
        let draft = leave(*leave_type, business_span(today, *offset, *days), None);
        if let Some(item) = wf.request_leave(MemberId(*member), draft)?.queued_approval() {
            wf.approve_item(MANAGER, item)?;
        }
    }
    wf.mark_all_read(Role::Manager);
    wf.mark_all_read(Role::Consultant);

    // Last week waiting for approval
    let last_monday = this_monday - Days::new(7);
    submit_week_of(&mut wf, PAUL, last_monday, |day| paul_day(1, day))?;
    for (member, project) in SUBMITTED_PROJECT {
        submit_week_of(&mut wf, MemberId(*member), last_monday, |_| full_day(project))?;
    }

    // Current week in progress
    for (day, date) in calendar::week_dates(this_monday).into_iter().enumerate() {
        if date > today {
            break;
        }
        let note = (day == 2).then(|| "Client meeting".to_string());
        wf.save_entry(PAUL, date, paul_day(0, day), note)?;
    }

    for (member, leave_type, offset, days, reason) in PENDING_LEAVE {
        let draft = leave(*leave_type, business_span(today, *offset, *days), Some(*reason));
        wf.request_leave(MemberId(*member), draft)?;
    }
    wf.send_reminder(MANAGER, MemberId(5))?;

    for member in base.team() {
        if let Some(balance) = base.balance(member.id) {
            wf.store_mut().add_member(member.clone(), *balance);
        }
    }
    info!(
        queued = wf.store().approvals().len(),
        leave_requests = wf.store().leave_requests().len(),
        "demo activity replayed"
    );
    Ok(wf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ManualClock;
    use crate::model::{ApprovalSubject, LeaveStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn demo_has_manager_team_and_projects() {
        let store = demo_store(&Config::default());
        assert_eq!(store.team().len(), 13);
        assert_eq!(store.member(MemberId(1)).unwrap().role, Role::Manager);
        assert_eq!(store.member(MemberId(12)).unwrap().email, "lea.petit@kokbif.com");
        assert_eq!(store.projects().len(), 12);

        let paul = store.balance(MemberId(2)).unwrap();
        assert_eq!((paul.paid, paul.paid_total, paul.rtt), (18.0, 26.0, 5.0));
    }

    #[test]
    fn replayed_activity_matches_seeded_profiles() {
        // Wednesday
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap(),
        ));
        let config = Config::default();
        let wf = demo_workflow(&config, clock).unwrap();
        let store = wf.store();
        let base = demo_store(&config);

        for member in store.team() {
            let queued = store.approvals().iter().any(|a| {
                a.requester.id == member.id
                    && matches!(a.subject, ApprovalSubject::Timesheet { .. })
            });
            assert_eq!(
                queued,
                member.timesheet_status == EntryStatus::Submitted,
                "{}",
                member.name
            );
        }
        assert_eq!(store.team(), base.team());
        assert_eq!(store.balance(PAUL), base.balance(PAUL));

        let paul_approved = store
            .entries(PAUL)
            .filter(|e| e.status == EntryStatus::Approved)
            .count();
        assert_eq!(paul_approved, 20);
        // Monday to Wednesday of the current week
        let drafts = store
            .entries(PAUL)
            .filter(|e| e.status == EntryStatus::Draft)
            .count();
        assert_eq!(drafts, 3);

        let sophie_on_leave = store.leave_requests_of(MemberId(8)).any(|r| {
            r.status == LeaveStatus::Approved
                && r.start_date <= wf.today()
                && r.end_date >= wf.today()
        });
        assert!(sophie_on_leave);
        let pending = store
            .leave_requests()
            .iter()
            .filter(|r| r.status == LeaveStatus::Pending)
            .count();
        assert_eq!(pending, PENDING_LEAVE.len());

        assert!(wf.dispatcher().unread_count(Role::Manager) > 0);
    }

    #[test]
    fn spans_skip_weekends() {
        let friday = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();
        let (start, end) = business_span(friday, 1, 3);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 3, 18).unwrap());

        let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let (start, _) = business_span(monday, -1, 4);
        assert_eq!(start, friday);
    }
}

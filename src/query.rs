//! Read-only projections over the store. Nothing here mutates or keeps
//! state; every function can be called on any snapshot.

use crate::engine::Store;
use crate::engine::calendar::{self, WORK_DAYS_PER_WEEK};
use crate::model::{
    ApprovalKind, EntryStatus, LeaveStatus, LeaveType, MemberId, MemberStatus, TeamMember,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct WeekCompletion {
    pub completed: usize,
    pub total: usize,
}

impl WeekCompletion {
    pub fn ratio(&self) -> f64 {
        self.completed as f64 / self.total as f64
    }
}

/// Weekdays of the week containing `week_start` with recorded hours.
pub fn week_completion(store: &Store, member: MemberId, week_start: NaiveDate) -> WeekCompletion {
    let completed = calendar::week_dates(week_start)
        .iter()
        .filter(|d| {
            store
                .entry(member, **d)
                .is_some_and(|e| e.total_hours() > 0.0)
        })
        .count();
    WeekCompletion {
        completed,
        total: WORK_DAYS_PER_WEEK,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PendingSummary {
    pub total: usize,
    pub timesheets: usize,
    pub leaves: usize,
}

pub fn pending_summary(store: &Store) -> PendingSummary {
    store
        .approvals()
        .iter()
        .fold(PendingSummary::default(), |mut acc, item| {
            acc.total += 1;
            match item.kind() {
                ApprovalKind::Timesheet => acc.timesheets += 1,
                ApprovalKind::Leave => acc.leaves += 1,
            }
            acc
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamStats {
    pub total: usize,
    /// Members not on leave.
    pub active: usize,
    pub late: Vec<MemberId>,
    pub on_leave: Vec<MemberId>,
    /// Share of members whose latest timesheet is approved, in percent.
    pub approval_rate: u32,
}

/// A member counts as late when flagged so, or when more than
/// `late_after_days` business days passed since their last entry.
pub fn team_stats(team: &[TeamMember], today: NaiveDate, late_after_days: u32) -> TeamStats {
    let is_late = |m: &TeamMember| match m.status {
        MemberStatus::Late => true,
        MemberStatus::OnLeave => false,
        MemberStatus::Active => m.last_entry.is_some_and(|last| {
            let since = last.succ_opt().unwrap_or(last);
            last < today && calendar::business_days(since, today) > late_after_days
        }),
    };

    let on_leave: Vec<MemberId> = team
        .iter()
        .filter(|m| m.status == MemberStatus::OnLeave)
        .map(|m| m.id)
        .collect();
    let late = team.iter().filter(|m| is_late(*m)).map(|m| m.id).collect();
    let approved = team
        .iter()
        .filter(|m| m.timesheet_status == EntryStatus::Approved)
        .count();
    let approval_rate = if team.is_empty() {
        0
    } else {
        (approved as f64 * 100.0 / team.len() as f64).round() as u32
    };

    TeamStats {
        total: team.len(),
        active: team.len() - on_leave.len(),
        late,
        on_leave,
        approval_rate,
    }
}

/// Streak, then level, then xp, all descending. `sort_by` is stable so
/// ties keep the team's order.
pub fn leaderboard(team: &[TeamMember]) -> Vec<&TeamMember> {
    let mut ranked: Vec<&TeamMember> = team.iter().collect();
    ranked.sort_by(|a, b| {
        b.streak
            .cmp(&a.streak)
            .then(b.level.cmp(&a.level))
            .then(b.xp.cmp(&a.xp))
    });
    ranked
}

/// Days of leave still awaiting a decision.
pub fn pending_leave_days(store: &Store, member: MemberId) -> f64 {
    store
        .leave_requests_of(member)
        .filter(|r| r.status == LeaveStatus::Pending)
        .map(|r| r.days)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportDay {
    pub date: NaiveDate,
    pub hours: f64,
    pub projects: Vec<String>,
    pub note: Option<String>,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProjectTotal {
    pub project_id: String,
    pub name: String,
    pub client: Option<String>,
    pub hours: f64,
}

/// Snapshot handed to the activity report (CRA) generator.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ActivityReport {
    pub member: MemberId,
    pub name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<ReportDay>,
    pub projects: Vec<ProjectTotal>,
    pub total_hours: f64,
}

pub fn activity_report(
    store: &Store,
    member: MemberId,
    from: NaiveDate,
    to: NaiveDate,
) -> Option<ActivityReport> {
    let name = store.member(member)?.name.clone();
    let project_name = |id: &str| {
        store
            .project(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut days = Vec::new();
    for entry in store.entries_between(member, from, to) {
        for a in &entry.allocations {
            *totals.entry(a.project_id.as_str()).or_default() += a.hours;
        }
        days.push(ReportDay {
            date: entry.date,
            hours: entry.total_hours(),
            projects: entry
                .allocations
                .iter()
                .map(|a| project_name(&a.project_id))
                .collect(),
            note: entry.note.clone(),
            status: entry.status,
        });
    }

    let projects: Vec<ProjectTotal> = totals
        .into_iter()
        .map(|(id, hours)| ProjectTotal {
            project_id: id.to_string(),
            name: project_name(id),
            client: store.project(id).map(|p| p.client.clone()),
            hours,
        })
        .collect();
    let total_hours = days.iter().map(|d| d.hours).sum();

    Some(ActivityReport {
        member,
        name,
        from,
        to,
        days,
        projects,
        total_hours,
    })
}

/// One row of the team leave calendar.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamLeave {
    pub request_id: Uuid,
    pub member: MemberId,
    pub name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub status: LeaveStatus,
}

/// Approved and pending leave overlapping `from..=to`, ordered by start
/// date. Rejected requests never show on the calendar.
pub fn team_leaves(store: &Store, from: NaiveDate, to: NaiveDate) -> Vec<TeamLeave> {
    let mut leaves: Vec<TeamLeave> = store
        .leave_requests()
        .iter()
        .filter(|r| r.status != LeaveStatus::Rejected)
        .filter(|r| r.start_date <= to && r.end_date >= from)
        .map(|r| TeamLeave {
            request_id: r.id,
            member: r.requester,
            name: store
                .member(r.requester)
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            leave_type: r.leave_type,
            start_date: r.start_date,
            end_date: r.end_date,
            days: r.days,
            status: r.status,
        })
        .collect();
    leaves.sort_by_key(|l| (l.start_date, l.member));
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::model::{Allocation, Role};

    fn member(id: u64, streak: u32, level: u32, xp: u32) -> TeamMember {
        let mut m = TeamMember::new(id, format!("m{id}"), "", Role::Consultant);
        m.streak = streak;
        m.level = level;
        m.xp = xp;
        m
    }

    #[test]
    fn completion_counts_weekdays_with_hours() {
        let (mut wf, _) = workflow();
        wf.save_entry(PAUL, date(2026, 1, 5), vec![Allocation::new("bgl-sprint", 8.0)], None)
            .unwrap();
        wf.save_entry(PAUL, date(2026, 1, 7), vec![Allocation::new("bgl-sprint", 4.0)], None)
            .unwrap();

        let c = week_completion(wf.store(), PAUL, date(2026, 1, 8));
        assert_eq!(c, WeekCompletion { completed: 2, total: 5 });
        assert_eq!(c.ratio(), 0.4);
    }

    #[test]
    fn leaderboard_is_deterministic() {
        let team = vec![
            member(1, 5, 10, 100),
            member(2, 8, 9, 50),
            member(3, 5, 12, 10),
            member(4, 5, 10, 300),
            member(5, 5, 10, 100),
        ];
        let order: Vec<u64> = leaderboard(&team).iter().map(|m| m.id.0).collect();
        assert_eq!(order, [2, 3, 4, 1, 5]);
    }

    #[test]
    fn team_stats_from_status_and_inactivity() {
        let mut fresh = member(1, 0, 1, 0);
        fresh.last_entry = Some(date(2026, 1, 9));
        let mut idle = member(2, 0, 1, 0);
        idle.last_entry = Some(date(2026, 1, 5));
        let mut flagged = member(3, 0, 1, 0);
        flagged.status = MemberStatus::Late;
        let mut away = member(4, 0, 1, 0);
        away.status = MemberStatus::OnLeave;
        away.timesheet_status = EntryStatus::Approved;

        // monday 12th: fresh has 1 business day gap, idle has 5
        let stats = team_stats(&[fresh, idle, flagged, away], date(2026, 1, 12), 2);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.late, vec![MemberId(2), MemberId(3)]);
        assert_eq!(stats.on_leave, vec![MemberId(4)]);
        assert_eq!(stats.approval_rate, 25);
    }

    #[test]
    fn pending_breakdown_and_leave_days() {
        let (mut wf, _) = workflow();
        wf.save_entry(PAUL, date(2026, 1, 5), vec![Allocation::new("bgl-sprint", 8.0)], None)
            .unwrap();
        wf.submit_week(PAUL, &[date(2026, 1, 5)], "S02").unwrap();
        wf.request_leave(
            PAUL,
            crate::model::LeaveDraft {
                leave_type: crate::model::LeaveType::Paid,
                start_date: date(2026, 2, 9),
                end_date: date(2026, 2, 10),
                half_day: None,
                reason: None,
            },
        )
        .unwrap();

        assert_eq!(
            pending_summary(wf.store()),
            PendingSummary { total: 2, timesheets: 1, leaves: 1 }
        );
        assert_eq!(pending_leave_days(wf.store(), PAUL), 2.0);
    }

    #[test]
    fn report_totals_hours_per_project() {
        let (mut wf, _) = workflow();
        wf.save_entry(
            PAUL,
            date(2026, 1, 5),
            vec![
                Allocation::new("bgl-sprint", 6.0),
                Allocation::new("internal-meeting", 2.0),
            ],
            Some("Client meeting".into()),
        )
        .unwrap();
        wf.save_entry(PAUL, date(2026, 1, 6), vec![Allocation::new("bgl-sprint", 8.0)], None)
            .unwrap();
        wf.save_entry(PAUL, date(2026, 1, 13), vec![Allocation::new("bgl-sprint", 8.0)], None)
            .unwrap();

        let report = activity_report(wf.store(), PAUL, date(2026, 1, 5), date(2026, 1, 9)).unwrap();
        assert_eq!(report.name, "Paul Martin");
        assert_eq!(report.days.len(), 2);
        assert_eq!(report.total_hours, 16.0);
        assert_eq!(report.days[0].projects, ["BGL - Sprint 12", "internal-meeting"]);

        let sprint = &report.projects[0];
        assert_eq!(sprint.project_id, "bgl-sprint");
        assert_eq!(sprint.hours, 14.0);
        assert_eq!(sprint.client.as_deref(), Some("BGL BNP Paribas"));
        assert_eq!(report.projects[1].client, None);

        assert!(activity_report(wf.store(), MemberId(99), date(2026, 1, 5), date(2026, 1, 9)).is_none());
    }

    #[test]
    fn calendar_shows_open_and_approved_leave_in_range() {
        let (mut wf, _) = workflow();
        let draft = |start: u32, end: u32| crate::model::LeaveDraft {
            leave_type: LeaveType::Paid,
            start_date: date(2026, 2, start),
            end_date: date(2026, 2, end),
            half_day: None,
            reason: None,
        };
        let approved = wf.request_leave(PAUL, draft(16, 18)).unwrap();
        wf.approve_item(MANAGER, approved.queued_approval().unwrap())
            .unwrap();
        let rejected = wf.request_leave(PAUL, draft(23, 24)).unwrap();
        wf.reject_item(MANAGER, rejected.queued_approval().unwrap(), "Busy week")
            .unwrap();
        wf.request_leave(PAUL, draft(9, 10)).unwrap();
        wf.request_leave(PAUL, draft(2, 3)).unwrap();

        let leaves = team_leaves(wf.store(), date(2026, 2, 5), date(2026, 2, 28));
        let spans: Vec<_> = leaves
            .iter()
            .map(|l| (l.start_date.format("%d").to_string(), l.status))
            .collect();
        assert_eq!(
            spans,
            [
                ("09".to_string(), LeaveStatus::Pending),
                ("16".to_string(), LeaveStatus::Approved),
            ]
        );
        assert_eq!(leaves[0].name, "Paul Martin");
    }
}

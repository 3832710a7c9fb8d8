//! Session-scoped state container.
//!
//! The store is plain data with read accessors. Only the workflow engine
//! writes to it (through the `pub(crate)` mutators below); projections and
//! the HTTP layer read a shared reference.

use crate::model::{
    ApprovalItem, LeaveBalance, LeaveRequest, MemberId, Project, TeamMember, TimesheetEntry,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct Store {
    entries: BTreeMap<MemberId, BTreeMap<NaiveDate, TimesheetEntry>>,
    leave_requests: Vec<LeaveRequest>,
    approvals: Vec<ApprovalItem>,
    balances: BTreeMap<MemberId, LeaveBalance>,
    team: Vec<TeamMember>,
    projects: Vec<Project>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member together with their leave allowance.
    pub fn with_member(mut self, member: TeamMember, balance: LeaveBalance) -> Self {
        self.add_member(member, balance);
        self
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    pub fn add_member(&mut self, member: TeamMember, balance: LeaveBalance) {
        self.balances.insert(member.id, balance);
        match self.team.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member,
            None => self.team.push(member),
        }
    }

    pub fn entry(&self, member: MemberId, date: NaiveDate) -> Option<&TimesheetEntry> {
        self.entries.get(&member).and_then(|days| days.get(&date))
    }

    /// Entries of a member ordered by date.
    pub fn entries(&self, member: MemberId) -> impl Iterator<Item = &TimesheetEntry> {
        self.entries.get(&member).into_iter().flat_map(|days| days.values())
    }

    pub fn entries_between(
        &self,
        member: MemberId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &TimesheetEntry> {
        self.entries(member)
            .filter(move |e| e.date >= from && e.date <= to)
    }

    /// Newest first.
    pub fn leave_requests(&self) -> &[LeaveRequest] {
        &self.leave_requests
    }

    pub fn leave_requests_of(&self, member: MemberId) -> impl Iterator<Item = &LeaveRequest> {
        self.leave_requests.iter().filter(move |r| r.requester == member)
    }

    pub fn leave_request(&self, id: Uuid) -> Option<&LeaveRequest> {
        self.leave_requests.iter().find(|r| r.id == id)
    }

    /// Pending queue, newest first.
    pub fn approvals(&self) -> &[ApprovalItem] {
        &self.approvals
    }

    pub fn approval(&self, id: Uuid) -> Option<&ApprovalItem> {
        self.approvals.iter().find(|a| a.id == id)
    }

    pub fn balance(&self, member: MemberId) -> Option<&LeaveBalance> {
        self.balances.get(&member)
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    pub fn member(&self, id: MemberId) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub(crate) fn put_entry(&mut self, member: MemberId, entry: TimesheetEntry) {
        self.entries
            .entry(member)
            .or_default()
            .insert(entry.date, entry);
    }

    pub(crate) fn entry_mut(
        &mut self,
        member: MemberId,
        date: NaiveDate,
    ) -> Option<&mut TimesheetEntry> {
        self.entries.get_mut(&member).and_then(|days| days.get_mut(&date))
    }

    pub(crate) fn member_mut(&mut self, id: MemberId) -> Option<&mut TeamMember> {
        self.team.iter_mut().find(|m| m.id == id)
    }

    pub(crate) fn balance_mut(&mut self, member: MemberId) -> Option<&mut LeaveBalance> {
        self.balances.get_mut(&member)
    }

    pub(crate) fn push_leave_request(&mut self, request: LeaveRequest) {
        self.leave_requests.insert(0, request);
    }

    pub(crate) fn leave_request_mut(&mut self, id: Uuid) -> Option<&mut LeaveRequest> {
        self.leave_requests.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn remove_leave_request(&mut self, id: Uuid) -> Option<LeaveRequest> {
        let index = self.leave_requests.iter().position(|r| r.id == id)?;
        Some(self.leave_requests.remove(index))
    }

    pub(crate) fn push_approval(&mut self, item: ApprovalItem) {
        self.approvals.insert(0, item);
    }

    pub(crate) fn approval_mut(&mut self, id: Uuid) -> Option<&mut ApprovalItem> {
        self.approvals.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn remove_approval(&mut self, id: Uuid) -> Option<ApprovalItem> {
        let index = self.approvals.iter().position(|a| a.id == id)?;
        Some(self.approvals.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Allocation, EntryStatus, Role};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn entry(day: u32, hours: f64) -> TimesheetEntry {
        TimesheetEntry {
            date: d(day),
            allocations: vec![Allocation::new("bgl-sprint", hours)],
            note: None,
            status: EntryStatus::Draft,
            reject_reason: None,
        }
    }

    #[test]
    fn one_entry_per_date_per_member() {
        let mut store = Store::new();
        let paul = MemberId(2);
        store.put_entry(paul, entry(5, 8.0));
        store.put_entry(paul, entry(5, 6.0));
        store.put_entry(MemberId(3), entry(5, 4.0));

        assert_eq!(store.entries(paul).count(), 1);
        assert_eq!(store.entry(paul, d(5)).unwrap().total_hours(), 6.0);
        assert_eq!(store.entry(MemberId(3), d(5)).unwrap().total_hours(), 4.0);
    }

    #[test]
    fn range_filter_is_inclusive() {
        let mut store = Store::new();
        let paul = MemberId(2);
        for day in 5..=9 {
            store.put_entry(paul, entry(day, 8.0));
        }
        assert_eq!(store.entries_between(paul, d(6), d(8)).count(), 3);
    }

    #[test]
    fn re_adding_a_member_replaces_it() {
        let store = Store::new()
            .with_member(
                TeamMember::new(2, "Paul Martin", "paul@kokbif.com", Role::Consultant),
                LeaveBalance::full(26.0, 10.0),
            )
            .with_member(
                TeamMember::new(2, "Paul M.", "paul@kokbif.com", Role::Consultant),
                LeaveBalance::full(20.0, 10.0),
            );
        assert_eq!(store.team().len(), 1);
        assert_eq!(store.member(MemberId(2)).unwrap().name, "Paul M.");
        assert_eq!(store.balance(MemberId(2)).unwrap().paid, 20.0);
    }
}

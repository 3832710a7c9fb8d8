use super::calendar;
use super::transitions::{EntryAction, entry_next};
use super::{Outcome, Result, Workflow, WorkflowError, WorkflowEvent};
use crate::model::{
    Allocation, ApprovalItem, ApprovalSubject, EntryStatus, MemberId, MemberStatus,
    NotificationKind, NotificationPayload, RequesterSnapshot, Role, TimesheetEntry,
};
use chrono::{Days, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

fn validate_allocations(allocations: &[Allocation]) -> Result<()> {
    if allocations.is_empty() {
        return Err(WorkflowError::InvalidEntry(
            "at least one allocation is required".to_string(),
        ));
    }
    for a in allocations {
        if a.project_id.trim().is_empty() {
            return Err(WorkflowError::InvalidEntry("project id is required".to_string()));
        }
        if !a.hours.is_finite() || a.hours <= 0.0 {
            return Err(WorkflowError::InvalidEntry(format!(
                "hours for {} must be positive",
                a.project_id
            )));
        }
    }
    Ok(())
}

impl Workflow {
    /// Records (or overwrites) the hours of one day. The entry always ends
    /// up in draft, whatever it was before.
    pub fn save_entry(
        &mut self,
        requester: MemberId,
        date: NaiveDate,
        allocations: Vec<Allocation>,
        note: Option<String>,
    ) -> Result<Outcome> {
        validate_allocations(&allocations).inspect_err(|e| {
            debug!(%requester, %date, error = %e, "save rejected");
        })?;
        self.require_member(requester)?;

        let mut outcome = Outcome::default();
        let previous = self.write_entry(requester, date, allocations, note, &mut outcome)?;

        if previous == EntryStatus::Empty {
            self.grant_xp(requester, self.rules.xp_first_save, &mut outcome);
        }
        info!(%requester, %date, %previous, "entry saved");
        Ok(outcome)
    }

    /// Moves every draft among `dates` to submitted and queues one approval
    /// item for the `(requester, week_label)` pair.
    pub fn submit_week(
        &mut self,
        requester: MemberId,
        dates: &[NaiveDate],
        week_label: &str,
    ) -> Result<Outcome> {
        let week_label = week_label.trim();
        let member = self.require_member(requester)?;
        let snapshot = RequesterSnapshot {
            id: member.id,
            name: member.name.clone(),
            title: member.title.clone(),
        };

        let mut dates = dates.to_vec();
        dates.sort();
        dates.dedup();

        let total: f64 = dates
            .iter()
            .filter_map(|d| self.store.entry(requester, *d))
            .map(TimesheetEntry::total_hours)
            .sum();
        let week_start = match dates.first() {
            Some(first) if total > 0.0 => calendar::week_start(*first),
            _ => {
                debug!(%requester, week = week_label, "empty week submission rejected");
                return Err(WorkflowError::EmptyWeek(week_label.to_string()));
            }
        };
        if week_label.is_empty() {
            return Err(WorkflowError::InvalidEntry("week label is required".to_string()));
        }

        let drafts: Vec<NaiveDate> = dates
            .iter()
            .copied()
            .filter(|d| {
                self.store
                    .entry(requester, *d)
                    .is_some_and(|e| e.status == EntryStatus::Draft)
            })
            .collect();
        let existing = self
            .store
            .approvals()
            .iter()
            .find(|a| a.is_week(requester, week_label, week_start))
            .map(|a| a.id);

        if drafts.is_empty() {
            return match existing {
                Some(id) => {
                    debug!(%requester, week = week_label, approval = %id, "week already pending");
                    Ok(Outcome::default())
                }
                None => Err(WorkflowError::InvalidState(format!(
                    "week {week_label} has no draft entries to submit"
                ))),
            };
        }

        let mut outcome = Outcome::default();
        let mut hours = 0.0;
        for date in &drafts {
            if let Some(entry) = self.store.entry_mut(requester, *date) {
                entry.status = entry_next(entry.status, EntryAction::Submit)?;
                hours += entry.total_hours();
            }
        }
        if let Some(m) = self.store.member_mut(requester) {
            m.timesheet_status = EntryStatus::Submitted;
        }
        outcome.push(WorkflowEvent::WeekSubmitted {
            member: requester,
            week_label: week_label.to_string(),
            dates: drafts.clone(),
            hours,
        });

        if let Some(id) = existing {
            self.fold_into_week(id, requester, &drafts);
            outcome.push(WorkflowEvent::ApprovalUpdated { approval_id: id });
            info!(%requester, week = week_label, approval = %id, "late days added to pending week");
            return Ok(outcome);
        }

        let item = ApprovalItem {
            id: Uuid::new_v4(),
            requester: snapshot.clone(),
            subject: ApprovalSubject::Timesheet {
                week_label: week_label.to_string(),
                week_start,
                dates: drafts,
            },
            period: week_label.to_string(),
            hours: Some(hours),
            days: None,
            note: None,
            submitted_at: self.clock.now(),
        };
        let approval_id = item.id;
        self.store.push_approval(item);
        outcome.push(WorkflowEvent::ApprovalQueued { approval_id });

        self.grant_xp(requester, self.rules.xp_week_submit, &mut outcome);
        self.emit(
            Role::Manager,
            NotificationPayload::new(
                NotificationKind::Info,
                "New timesheet",
                format!("{} - {week_label} ({hours}h)", snapshot.name),
            )
            .link("/app/manager/approvals")
            .sent_by(requester),
            &mut outcome,
        );
        info!(%requester, week = week_label, %approval_id, hours, "week submitted");
        Ok(outcome)
    }

    /// Copies last week's days onto the week starting at `week_start`,
    /// skipping days that are already submitted or resolved.
    pub fn copy_previous_week(
        &mut self,
        requester: MemberId,
        week_start: NaiveDate,
    ) -> Result<Outcome> {
        self.require_member(requester)?;

        let current = calendar::week_dates(week_start);
        let previous = calendar::week_dates(calendar::week_start(week_start) - Days::new(7));

        let copies: Vec<(NaiveDate, Vec<Allocation>)> = previous
            .iter()
            .zip(current.iter())
            .filter_map(|(prev, cur)| {
                let source = self.store.entry(requester, *prev)?;
                let target = self
                    .store
                    .entry(requester, *cur)
                    .map(|e| e.status)
                    .unwrap_or_default();
                let writable = matches!(target, EntryStatus::Empty | EntryStatus::Draft);
                (writable && source.total_hours() > 0.0)
                    .then(|| (*cur, source.allocations.clone()))
            })
            .collect();

        if copies.is_empty() {
            return Err(WorkflowError::InvalidState(
                "nothing to copy from the previous week".to_string(),
            ));
        }

        let mut outcome = Outcome::default();
        let dates: Vec<NaiveDate> = copies.iter().map(|(d, _)| *d).collect();
        for (date, allocations) in copies {
            self.write_entry(requester, date, allocations, None, &mut outcome)?;
        }
        outcome.push(WorkflowEvent::EntriesCopied {
            member: requester,
            dates: dates.clone(),
        });
        self.grant_xp(
            requester,
            self.rules.xp_copy_per_day * dates.len() as u32,
            &mut outcome,
        );
        info!(%requester, copied = dates.len(), "previous week copied");
        Ok(outcome)
    }

    /// Shared write path of `save_entry` and `copy_previous_week`. Returns
    /// the status the day had before.
    fn write_entry(
        &mut self,
        requester: MemberId,
        date: NaiveDate,
        allocations: Vec<Allocation>,
        note: Option<String>,
        outcome: &mut Outcome,
    ) -> Result<EntryStatus> {
        let previous = self
            .store
            .entry(requester, date)
            .map(|e| e.status)
            .unwrap_or_default();
        let status = entry_next(previous, EntryAction::Save)?;

        match previous {
            EntryStatus::Submitted => self.withdraw_from_queue(requester, date, outcome),
            EntryStatus::Approved => {
                outcome.push(WorkflowEvent::AmendedAfterApproval {
                    member: requester,
                    date,
                });
                let name = self
                    .store
                    .member(requester)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                self.emit(
                    Role::Manager,
                    NotificationPayload::new(
                        NotificationKind::Warning,
                        "Approved timesheet amended",
                        format!("{name} edited {date} after approval"),
                    )
                    .link("/app/manager/approvals")
                    .sent_by(requester),
                    outcome,
                );
            }
            EntryStatus::Empty | EntryStatus::Draft | EntryStatus::Rejected => {}
        }

        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.store.put_entry(
            requester,
            TimesheetEntry {
                date,
                allocations,
                note,
                status,
                reject_reason: None,
            },
        );
        outcome.push(WorkflowEvent::EntrySaved {
            member: requester,
            date,
            previous,
        });

        if previous == EntryStatus::Empty {
            self.track_streak(requester, date);
        }
        if let Some(m) = self.store.member_mut(requester) {
            m.timesheet_status = EntryStatus::Draft;
            if m.status == MemberStatus::Late {
                m.status = MemberStatus::Active;
            }
        }
        Ok(previous)
    }

    /// Takes an edited day out of the pending week that contains it. The
    /// queue item goes away once it no longer covers any day.
    fn withdraw_from_queue(&mut self, requester: MemberId, date: NaiveDate, outcome: &mut Outcome) {
        let Some(approval_id) = self
            .store
            .approvals()
            .iter()
            .find(|a| {
                a.requester.id == requester
                    && matches!(&a.subject, ApprovalSubject::Timesheet { dates, .. } if dates.contains(&date))
            })
            .map(|a| a.id)
        else {
            return;
        };

        outcome.push(WorkflowEvent::EntryWithdrawn {
            member: requester,
            date,
            approval_id,
        });

        let mut emptied = false;
        if let Some(item) = self.store.approval_mut(approval_id) {
            if let ApprovalSubject::Timesheet { dates, .. } = &mut item.subject {
                dates.retain(|d| *d != date);
                emptied = dates.is_empty();
            }
        }
        if emptied {
            self.store.remove_approval(approval_id);
            outcome.push(WorkflowEvent::ApprovalDropped { approval_id });
            debug!(%requester, %approval_id, "pending week emptied by edits");
        } else {
            self.refresh_week_hours(approval_id, requester);
        }
    }

    fn fold_into_week(&mut self, approval_id: Uuid, requester: MemberId, added: &[NaiveDate]) {
        if let Some(item) = self.store.approval_mut(approval_id) {
            if let ApprovalSubject::Timesheet { dates, .. } = &mut item.subject {
                dates.extend_from_slice(added);
                dates.sort();
                dates.dedup();
            }
        }
        self.refresh_week_hours(approval_id, requester);
    }

    /// Recomputes the denormalized hours of a pending week from the
    /// entries it still covers.
    fn refresh_week_hours(&mut self, approval_id: Uuid, requester: MemberId) {
        let Some(ApprovalSubject::Timesheet { dates, .. }) =
            self.store.approval(approval_id).map(|a| a.subject.clone())
        else {
            return;
        };
        let hours: f64 = dates
            .iter()
            .filter_map(|d| self.store.entry(requester, *d))
            .map(TimesheetEntry::total_hours)
            .sum();
        if let Some(item) = self.store.approval_mut(approval_id) {
            item.hours = Some(hours);
        }
    }

    fn track_streak(&mut self, requester: MemberId, date: NaiveDate) {
        let Some(m) = self.store.member_mut(requester) else {
            return;
        };
        match m.last_entry {
            Some(last) if date <= last => return,
            Some(last) if calendar::next_business_day(last) != date => m.streak = 1,
            // consecutive day, or no history yet and the carried-over streak stands
            _ => m.streak += 1,
        }
        m.last_entry = Some(date);
    }
}

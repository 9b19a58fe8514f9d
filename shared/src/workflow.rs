//! Preview / validate / commit state machine of the movement screens
//!
//! ```text
//! Draft -> Previewing -> ValidationFailed | ReadyToCommit
//! ReadyToCommit -> Committing -> Committed | CommitFailed
//! ```
//!
//! Requests are never cancelled. Each one is issued with a [`Ticket`] that
//! records the form revision it was built from; a result whose ticket is
//! stale (the form was edited meanwhile) is dropped instead of applied.

use serde::{Deserialize, Serialize};

use crate::cart::{CartTotals, LineCandidate, LineItem, LineKey, LineStore, SubmissionShape};
use crate::error::{DomainError, DomainResult};
use crate::models::PreviewReport;

/// Phase of a movement form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Draft,
    Previewing,
    ValidationFailed,
    ReadyToCommit,
    Committing,
    Committed { receipt: String },
    CommitFailed { message: String },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Draft => "draft",
            Phase::Previewing => "previewing",
            Phase::ValidationFailed => "validation_failed",
            Phase::ReadyToCommit => "ready_to_commit",
            Phase::Committing => "committing",
            Phase::Committed { .. } => "committed",
            Phase::CommitFailed { .. } => "commit_failed",
        }
    }

    /// A request is in flight; the triggering controls stay disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Previewing | Phase::Committing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Preview,
    Commit,
}

/// Handle for one in-flight preview or commit request
#[derive(Debug, Clone)]
pub struct Ticket<P> {
    revision: u64,
    stage: Stage,
    /// Request body to send
    pub payload: P,
}

impl<P> Ticket<P> {
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// A movement form driven through preview and commit
#[derive(Debug, Clone)]
pub struct MovementWorkflow<S: SubmissionShape> {
    header: S::Header,
    lines: LineStore<S>,
    phase: Phase,
    revision: u64,
    report: Option<PreviewReport>,
}

impl<S: SubmissionShape> Default for MovementWorkflow<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SubmissionShape> MovementWorkflow<S> {
    pub fn new() -> Self {
        Self {
            header: S::Header::default(),
            lines: LineStore::new(),
            phase: Phase::Draft,
            revision: 0,
            report: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn header(&self) -> &S::Header {
        &self.header
    }

    pub fn lines(&self) -> &[LineItem] {
        self.lines.lines()
    }

    pub fn store(&self) -> &LineStore<S> {
        &self.lines
    }

    pub fn totals(&self) -> CartTotals {
        self.lines.total()
    }

    /// Report of the last applied preview, if still current
    pub fn report(&self) -> Option<&PreviewReport> {
        self.report.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_preview(&self) -> bool {
        !self.phase.is_busy() && !self.lines.is_empty()
    }

    pub fn can_commit(&self) -> bool {
        matches!(self.phase, Phase::ReadyToCommit | Phase::CommitFailed { .. })
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    fn begin_edit(&mut self, action: &str) -> DomainResult<()> {
        if self.phase == Phase::Committing {
            return Err(self.invalid(action));
        }
        Ok(())
    }

    fn finish_edit(&mut self) {
        self.phase = Phase::Draft;
        self.report = None;
        self.revision += 1;
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut S::Header)) -> DomainResult<()> {
        self.begin_edit("edit header")?;
        edit(&mut self.header);
        self.finish_edit();
        Ok(())
    }

    pub fn add_line(&mut self, candidate: LineCandidate) -> DomainResult<()> {
        self.begin_edit("add line")?;
        self.lines.add_line(candidate)?;
        self.finish_edit();
        Ok(())
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> DomainResult<()> {
        self.begin_edit("update quantity")?;
        self.lines.update_quantity(key, quantity)?;
        self.finish_edit();
        Ok(())
    }

    pub fn remove_line(&mut self, key: &LineKey) -> DomainResult<()> {
        self.begin_edit("remove line")?;
        self.lines.remove_line(key);
        self.finish_edit();
        Ok(())
    }

    /// Discard the form and start over
    pub fn start_new(&mut self) -> DomainResult<()> {
        self.begin_edit("start new")?;
        self.header = S::Header::default();
        self.lines.clear();
        self.finish_edit();
        Ok(())
    }

    /// Leave `ValidationFailed` (or a failed commit) to fix the form
    pub fn back_to_draft(&mut self) -> DomainResult<()> {
        match self.phase {
            Phase::ValidationFailed | Phase::CommitFailed { .. } | Phase::ReadyToCommit => {
                self.phase = Phase::Draft;
                Ok(())
            }
            Phase::Draft => Ok(()),
            _ => Err(self.invalid("return to draft")),
        }
    }

    // ------------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------------

    /// Enter `Previewing` and hand out the request to send
    pub fn begin_preview(&mut self) -> DomainResult<Ticket<S::Payload>> {
        if self.phase.is_busy() || matches!(self.phase, Phase::Committed { .. }) {
            return Err(self.invalid("preview"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("lines", "Add at least one line"));
        }
        S::validate_header(&self.header)
            .map_err(|errors| DomainError::from_validation("header", &errors))?;

        self.phase = Phase::Previewing;
        self.report = None;
        Ok(Ticket {
            revision: self.revision,
            stage: Stage::Preview,
            payload: self.lines.assemble(&self.header),
        })
    }

    fn is_current<P>(&self, ticket: &Ticket<P>, stage: Stage, phase: &Phase) -> bool {
        ticket.stage == stage && ticket.revision == self.revision && &self.phase == phase
    }

    /// Apply a preview result; returns `false` when the ticket is stale
    pub fn apply_preview(&mut self, ticket: &Ticket<S::Payload>, report: PreviewReport) -> bool {
        if !self.is_current(ticket, Stage::Preview, &Phase::Previewing) {
            return false;
        }
        self.phase = if report.is_committable() {
            Phase::ReadyToCommit
        } else {
            Phase::ValidationFailed
        };
        self.report = Some(report);
        true
    }

    /// The preview request itself failed; back to `Draft` with every line kept
    pub fn preview_failed(&mut self, ticket: &Ticket<S::Payload>) -> bool {
        if !self.is_current(ticket, Stage::Preview, &Phase::Previewing) {
            return false;
        }
        self.phase = Phase::Draft;
        true
    }

    // ------------------------------------------------------------------------
    // Commit
    // ------------------------------------------------------------------------

    pub fn begin_commit(&mut self) -> DomainResult<Ticket<S::Payload>> {
        if !self.can_commit() {
            return Err(self.invalid("commit"));
        }
        self.phase = Phase::Committing;
        Ok(Ticket {
            revision: self.revision,
            stage: Stage::Commit,
            payload: self.lines.assemble(&self.header),
        })
    }

    /// Commit succeeded: reset to an empty form holding the receipt code
    pub fn complete_commit(&mut self, ticket: &Ticket<S::Payload>, receipt: String) -> bool {
        if !self.is_current(ticket, Stage::Commit, &Phase::Committing) {
            return false;
        }
        self.header = S::Header::default();
        self.lines.clear();
        self.report = None;
        self.revision += 1;
        self.phase = Phase::Committed { receipt };
        true
    }

    /// Commit failed: keep every line and header field, re-enable commit
    pub fn commit_failed(&mut self, ticket: &Ticket<S::Payload>, message: String) -> bool {
        if !self.is_current(ticket, Stage::Commit, &Phase::Committing) {
            return false;
        }
        self.phase = Phase::CommitFailed { message };
        true
    }

    /// Dismiss a commit error; the form goes back to `ReadyToCommit`
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.phase, Phase::CommitFailed { .. }) {
            self.phase = Phase::ReadyToCommit;
        }
    }

    fn invalid(&self, action: &str) -> DomainError {
        DomainError::InvalidTransition {
            phase: self.phase.name().to_string(),
            action: action.to_string(),
        }
    }
}

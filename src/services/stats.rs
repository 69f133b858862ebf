//! Per-phase counters and the run summary.

use std::collections::BTreeMap;

use serde::Serialize;

use domain::ShiftCategory;

/// Outcome counts of one natural-key upsert phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub inserted: u64,
    pub updated: u64,
    pub unchanged: u64,
    pub skipped: u64,
}

impl PhaseStats {
    /// Rows that exist in the target after the phase
    pub fn resolved(&self) -> u64 {
        self.inserted + self.updated + self.unchanged
    }
}

/// Outcome counts of the roster phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    pub source_rows: u64,
    pub periods_created: u64,
    pub inserted: u64,
    pub updated: u64,
    pub unchanged: u64,
    pub skipped_unmapped_team: u64,
    pub skipped_unmapped_employee: u64,
    pub skipped_unclassified: u64,
}

impl RosterStats {
    pub fn skipped(&self) -> u64 {
        self.skipped_unmapped_team + self.skipped_unmapped_employee + self.skipped_unclassified
    }
}

/// Everything a run did, phase by phase
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationSummary {
    pub overwrite: bool,
    pub positions: PhaseStats,
    pub locations: PhaseStats,
    pub departments: PhaseStats,
    pub teams: PhaseStats,
    pub employees: PhaseStats,
    /// Employees migrated without a team
    pub teamless_employees: u64,
    pub shift_bases: PhaseStats,
    /// Vocabulary size per category
    pub shift_categories: BTreeMap<ShiftCategory, u64>,
    pub aliases: PhaseStats,
    pub holidays: PhaseStats,
    pub calendar_days_inserted: u64,
    pub roster: RosterStats,
}

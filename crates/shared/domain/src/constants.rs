//! Domain-level constants.
//!
//! These constants define the natural keys and fixed vocabularies of the
//! roster schema.

// =============================================================================
// Organisation structure
// =============================================================================

/// Prefix of a location code derived from a legacy store id ("S12")
pub const LOCATION_CODE_PREFIX: &str = "S";

/// Code of the single synthetic department created per location
pub const DEPARTMENT_CODE_MAIN: &str = "MAIN";

/// Fallback department name when the store has no usable name
pub const DEFAULT_DEPARTMENT_NAME: &str = "Main";

/// Code of the single synthetic team created per department
pub const TEAM_CODE_DEFAULT: &str = "DEFAULT";

/// Fallback team name when the department name is unknown
pub const DEFAULT_TEAM_NAME: &str = "Default Team";

// =============================================================================
// Positions
// =============================================================================

/// Position code for regular staff
pub const POSITION_EMP: &str = "EMP";

/// Position code for leads and managers
pub const POSITION_LEAD: &str = "LEAD";

/// Display name of the EMP position
pub const POSITION_EMP_NAME: &str = "Employee";

/// Display name of the LEAD position
pub const POSITION_LEAD_NAME: &str = "Team Lead/Manager";

/// Role-name fragments (lowercase) that promote an employee to LEAD
pub const LEAD_ROLE_MARKERS: &[&str] = &["lead", "leader", "manager"];

// =============================================================================
// Employee status
// =============================================================================

pub const STATUS_ACTIVE: &str = "Active";

pub const STATUS_INACTIVE: &str = "Inactive";

// =============================================================================
// Shift categories
// =============================================================================

pub const CATEGORY_WORK: &str = "WORK";

pub const CATEGORY_OFF: &str = "OFF";

pub const CATEGORY_LEAVE: &str = "LEAVE";

// =============================================================================
// Roster periods
// =============================================================================

/// Period type of generated roster periods
pub const PERIOD_TYPE_MONTH: &str = "Month";

/// Initial status of generated roster periods
pub const PERIOD_STATUS_DRAFT: &str = "Draft";

/// Recorded author of generated roster periods
pub const PERIOD_CREATED_BY: &str = "Migrator";

/// Separator used when joining the codes collapsed into one roster entry
pub const NOTE_CODE_SEPARATOR: &str = ",";

// =============================================================================
// Holidays
// =============================================================================

/// Holiday name used when the legacy description is blank
pub const DEFAULT_HOLIDAY_NAME: &str = "Holiday";

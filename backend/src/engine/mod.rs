//! # Outreach Draft Engine
//!
//! The pure core of the application: everything in this module is synchronous,
//! deterministic and free of I/O. Services load rows, templates and overrides,
//! then call in here.
//!
//! ## Pipeline:
//!
//! 1.  **Header roles** (`headers`): the ordered header list of a data source
//!     is scanned against declarative rule chains to decide which column (if
//!     any) supplies each semantic role: full name, firm, school, email,
//!     prefix. Pure function of the header set.
//!
//! 2.  **Row resolution** (`resolver`): for one row, the detected roles are
//!     turned into derived values (first/last/full name, firm, school) and a
//!     `{token}` substitution function over arbitrary template text. Derived
//!     values win over raw columns; unresolved tokens become empty strings.
//!
//! 3.  **Template selection** (`select`): a manual per-recipient override wins
//!     outright; otherwise non-manual templates rotate round-robin per firm,
//!     tracked by a counters object that lives for exactly one pass.
//!
//! 4.  **Preview** (`preview`): one linear traversal of the rows producing the
//!     assignment table shown to the user, with eligibility filtering.
//!
//! 5.  **Generation** (`generate`): re-runs the preview so that what the user
//!     saw is exactly what gets created, re-resolves subject and body per
//!     recipient, and hands finished drafts to a `DraftSink`.
//!
//! Rotation counters carry a strict row-order dependency, so a pass is never
//! parallelized and counters are never reused across passes: preview and
//! generation each restart from a fresh counters object and therefore always
//! agree.

pub mod conventions;
pub mod generate;
pub mod headers;
pub mod preview;
pub mod resolver;
pub mod select;

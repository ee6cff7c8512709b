//! # oucount core
//!
//! The discover → count → group pipeline and its adapters:
//!
//! * **[`discovery`]**: runs the node searches through the directory port.
//! * **[`aggregate`]**: dedup, per-node counts and per-location totals.
//! * **[`location`]**: reads the location label out of a distinguished name.
//! * **[`ldap`]**: the `ldap3` implementation of the directory port.
//! * **[`report`]**: the persisted text report.
//! * **[`pipeline`]**: one full pass, deciding whether a report gets written.

pub mod aggregate;
pub mod discovery;
pub mod ldap;
pub mod location;
pub mod pipeline;
pub mod report;

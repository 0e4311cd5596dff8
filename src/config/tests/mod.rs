//! Config module tests
//!
//! Contains test suites for file handling:
//! - Compose file loading and backups
//! - Atomic rewrites and rollback
//! - File-level validation runs and exit codes

//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! Resolution and comparison outcomes never change the exit code: a VIN that
//! fails to decode, or a batch full of mismatches, still exits 0. Only
//! failures to run at all are reported here.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args)               |
//! | 3       | Universal | Terminal IO (stdin/stdout)               |
//! | 10-19   | config    | Settings file                            |
//! | 20-29   | batch     | Reference dataset                        |
//! | 30-39   | remote    | Remote decode client setup               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments (clap exits with this code too).
pub const EXIT_USAGE: u8 = 2;

/// Reading stdin or writing stdout failed.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Config (10-19)
// =============================================================================

/// `--config` / `$VINCHECK_CONFIG` points at a file that does not exist.
pub const EXIT_CONFIG_NOT_FOUND: u8 = 10;

/// Settings file unreadable, unparseable or failing validation.
pub const EXIT_CONFIG_INVALID: u8 = 11;

// =============================================================================
// Batch (20-29)
// =============================================================================

/// Reference dataset file cannot be read.
pub const EXIT_DATASET_READ: u8 = 20;

/// Reference dataset is not a JSON object keyed by VIN.
pub const EXIT_DATASET_INVALID: u8 = 21;

/// Reference dataset has no usable records.
pub const EXIT_DATASET_EMPTY: u8 = 22;

/// Output directory cannot be created.
pub const EXIT_OUTPUT_DIR: u8 = 23;

// =============================================================================
// Remote (30-39)
// =============================================================================

/// HTTP client could not be constructed.
pub const EXIT_REMOTE_CLIENT: u8 = 30;

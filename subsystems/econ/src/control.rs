//! # Control Interface
//!
//! The textual protocol by which an operator drives the subsystem: a mode
//! surface ("0"/"1") and a profile surface (semicolon-separated
//! `start end benefit` triples in, one formatted line per range out).
//!
//! The original control files lived in sysfs; only the text protocol is
//! modeled here. Integers parse the way the kernel's base-0 `kstrtoull`
//! parses them: decimal, `0x`-prefixed hex, or leading-zero octal.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{EconError, EconResult, ParseFailure};
use crate::policy::{self, PolicyMode};
use crate::profile::{self, ProfileRange};

// =============================================================================
// Integer parsing
// =============================================================================

/// Parse one unsigned integer field, base-0 style.
pub fn parse_u64(field: &str) -> EconResult<u64> {
    if field.is_empty() {
        return Err(EconError::Parse {
            what: ParseFailure::EmptyField,
        });
    }

    let (digits, radix) = if let Some(hex) = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
    {
        (hex, 16)
    } else if field.len() > 1 && field.starts_with('0') {
        (&field[1..], 8)
    } else {
        (field, 10)
    };

    if digits.is_empty() {
        return Err(EconError::Parse {
            what: ParseFailure::EmptyField,
        });
    }

    u64::from_str_radix(digits, radix).map_err(|err| {
        let what = match err.kind() {
            core::num::IntErrorKind::PosOverflow => ParseFailure::Overflow,
            _ => ParseFailure::BadDigit,
        };
        log::warn!("mm-econ: bad integer field {:?}: {}", field, what);
        EconError::Parse { what }
    })
}

// =============================================================================
// Profile grammar
// =============================================================================

/// Parse a full profile write buffer into a staged batch of ranges.
///
/// Grammar: `<start> <end> <benefit>;<start> <end> <benefit>;...`, any
/// whitespace between fields, an optional trailing semicolon. The first
/// malformed triple aborts the parse; nothing is staged past it.
pub fn parse_profile(text: &str) -> EconResult<Vec<ProfileRange>> {
    let text = text.trim();
    let text = text.strip_suffix(';').unwrap_or(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut batch = Vec::new();
    batch
        .try_reserve(text.split(';').count())
        .map_err(|_| EconError::NoMemory)?;

    for segment in text.split(';') {
        let segment = segment.trim();
        let mut fields = segment.split_whitespace();
        let (start, end, benefit) = match (fields.next(), fields.next(), fields.next()) {
            (Some(start), Some(end), Some(benefit)) => (start, end, benefit),
            _ => {
                let found = segment.split_whitespace().count();
                log::warn!("mm-econ: malformed triple {:?}: {} fields", segment, found);
                return Err(EconError::Parse {
                    what: ParseFailure::FieldCount { found },
                });
            },
        };
        let extra = fields.count();
        if extra != 0 {
            let found = 3 + extra;
            log::warn!("mm-econ: malformed triple {:?}: {} fields", segment, found);
            return Err(EconError::Parse {
                what: ParseFailure::FieldCount { found },
            });
        }

        let range = ProfileRange::new(parse_u64(start)?, parse_u64(end)?, parse_u64(benefit)?)?;
        batch.push(range);
    }

    Ok(batch)
}

// =============================================================================
// Control surfaces
// =============================================================================

/// Handle a write to the profile surface: full replacement.
///
/// The batch is staged before the store is touched, so a malformed buffer
/// leaves the previous profile in place. Returns the number of ranges
/// retained (overlapping batch members are dropped, see
/// [`profile::ProfileStore::bulk_load`]).
pub fn write_profile(text: &str) -> EconResult<usize> {
    let batch = parse_profile(text)?;
    let retained = profile::profile().bulk_load(batch);
    log::info!("mm-econ: profile loaded, {} ranges", retained);
    Ok(retained)
}

/// Handle a read of the profile surface.
pub fn read_profile() -> String {
    profile::profile().dump()
}

/// Handle a write to the mode surface.
///
/// Anything but an integer in `{0, 1}` resets the mode to `Disabled` and
/// reports the error, so a bad write can never leave a stale policy armed.
pub fn write_mode(input: &str) -> EconResult<()> {
    let parsed = parse_u64(input.trim()).and_then(PolicyMode::from_raw);
    match parsed {
        Ok(mode) => {
            policy::set_mode(mode);
            log::info!("mm-econ: policy mode set to {:?}", mode);
            Ok(())
        },
        Err(err) => {
            policy::set_mode(PolicyMode::Disabled);
            log::warn!("mm-econ: rejecting mode write {:?}: {}", input, err);
            Err(err)
        },
    }
}

/// Handle a read of the mode surface: `"0\n"` or `"1\n"`.
pub fn read_mode() -> String {
    let mut out = String::new();
    out.push((b'0' + policy::mode().as_raw()) as char);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::string::ToString;

    use super::*;
    use crate::profile::ProfileStore;

    #[test]
    fn test_parse_u64_bases() {
        assert_eq!(parse_u64("0"), Ok(0));
        assert_eq!(parse_u64("100"), Ok(100));
        assert_eq!(parse_u64("0x100"), Ok(256));
        assert_eq!(parse_u64("0X1f"), Ok(31));
        assert_eq!(parse_u64("0755"), Ok(493));
        assert_eq!(parse_u64("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn test_parse_u64_rejects_garbage() {
        assert!(parse_u64("").is_err());
        assert!(parse_u64("0x").is_err());
        assert!(parse_u64("abc").is_err());
        assert!(parse_u64("-1").is_err());
        assert!(parse_u64("12z").is_err());
        assert_eq!(
            parse_u64("18446744073709551616"),
            Err(EconError::Parse {
                what: ParseFailure::Overflow
            })
        );
        assert_eq!(
            parse_u64("0778"),
            Err(EconError::Parse {
                what: ParseFailure::BadDigit
            })
        );
    }

    #[test]
    fn test_parse_profile_grammar() {
        let batch = parse_profile("100 200 50;200 300 75;").unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!((batch[0].start, batch[0].end, batch[0].benefit), (100, 200, 50));
        assert_eq!((batch[1].start, batch[1].end, batch[1].benefit), (200, 300, 75));

        // No trailing semicolon, mixed bases, sloppy whitespace.
        let batch = parse_profile(" 0x100  0x200\t7 ; 0x200 02000 8\n").unwrap();
        assert_eq!((batch[0].start, batch[0].end), (256, 512));
        assert_eq!((batch[1].start, batch[1].end, batch[1].benefit), (512, 1024, 8));

        assert!(parse_profile("").unwrap().is_empty());
        assert!(parse_profile(";").unwrap().is_empty());
    }

    #[test]
    fn test_parse_profile_rejects_malformed_triples() {
        assert!(matches!(
            parse_profile("100 200;"),
            Err(EconError::Parse {
                what: ParseFailure::FieldCount { found: 2 }
            })
        ));
        assert!(matches!(
            parse_profile("100 200 50 60;"),
            Err(EconError::Parse {
                what: ParseFailure::FieldCount { found: 4 }
            })
        ));
        assert!(matches!(
            parse_profile("100 2o0 50;"),
            Err(EconError::Parse { .. })
        ));
        // Empty segment in the middle is not a trailing semicolon.
        assert!(parse_profile("100 200 50;;200 300 75;").is_err());
        // Inverted range.
        assert_eq!(
            parse_profile("200 100 50;"),
            Err(EconError::EmptyRange { start: 200, end: 100 })
        );
    }

    #[test]
    fn test_round_trip_through_store() {
        let store = ProfileStore::new();
        let batch = parse_profile("0x100 0x200 50;1024 2048 75;").unwrap();
        assert_eq!(store.bulk_load(batch), 2);
        let dumped = store.dump();
        assert_eq!(
            dumped,
            "[256, 512) (256 bytes) misses=0\n[1024, 2048) (1024 bytes) misses=0\n"
        );
        // Loading the dump back (normalized to the write grammar) is a fixpoint.
        let mut rewrite = String::new();
        for range in store.snapshot() {
            rewrite.push_str(&range.start.to_string());
            rewrite.push(' ');
            rewrite.push_str(&range.end.to_string());
            rewrite.push(' ');
            rewrite.push_str(&range.benefit.to_string());
            rewrite.push(';');
        }
        let store2 = ProfileStore::new();
        store2.bulk_load(parse_profile(&rewrite).unwrap());
        assert_eq!(store2.dump(), dumped);
    }

    // The global-store flow lives in one test fn: the harness runs tests in
    // parallel and the profile store is process-wide.
    #[test]
    fn test_global_profile_surface() {
        assert_eq!(write_profile("100 200 50;200 300 75;"), Ok(2));
        let hit = profile::profile().lookup(150).unwrap();
        assert_eq!((hit.start, hit.end, hit.benefit), (100, 200, 50));
        let hit = profile::profile().lookup(250).unwrap();
        assert_eq!((hit.start, hit.end, hit.benefit), (200, 300, 75));
        assert!(profile::profile().lookup(500).is_none());

        // A malformed buffer leaves the loaded profile untouched.
        assert!(write_profile("1 2 3;bogus;").is_err());
        assert_eq!(profile::profile().len(), 2);
        assert_eq!(
            read_profile(),
            "[100, 200) (100 bytes) misses=0\n[200, 300) (100 bytes) misses=0\n"
        );

        // Reload replaces wholesale, overlap with the old profile is moot.
        assert_eq!(write_profile("150 250 10;"), Ok(1));
        let only = profile::profile().snapshot();
        assert_eq!(only.len(), 1);
        assert_eq!(
            (only[0].start, only[0].end, only[0].benefit),
            (150, 250, 10)
        );

        profile::profile().clear();
    }

    // Same constraint for the global mode word.
    #[test]
    fn test_global_mode_surface() {
        assert_eq!(read_mode(), "0\n");

        write_mode("1").unwrap();
        assert_eq!(policy::mode(), PolicyMode::CostBenefit);
        assert_eq!(read_mode(), "1\n");

        // Idempotent under repetition.
        write_mode("1").unwrap();
        assert_eq!(read_mode(), "1\n");

        // Garbage resets to the safe default and errors.
        assert!(write_mode("garbage").is_err());
        assert_eq!(policy::mode(), PolicyMode::Disabled);
        assert_eq!(
            write_mode("2"),
            Err(EconError::InvalidMode { value: 2 })
        );
        assert_eq!(read_mode(), "0\n");

        write_mode("0").unwrap();
        write_mode("1\n").unwrap();
        assert_eq!(policy::mode(), PolicyMode::CostBenefit);
        write_mode("0").unwrap();
    }
}

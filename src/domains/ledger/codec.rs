//! Wire codec for ledger messages.
//!
//! Layout (7 signed integers):
//! `[salt, category+salt, x+salt, y+salt, round+salt, reserved+salt, parity]`
//! where `parity` counts the odd values among the first six fields as transmitted.
//! Only a remainder of 1 counts as odd, so negative fields never do.
//! The parity is a self-consistency check that filters corrupted and foreign
//! entries; it authenticates nothing.

use super::category::Category;
use crate::common::Cell;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MESSAGE_LEN: usize = 7;
const PAYLOAD_LEN: usize = MESSAGE_LEN - 1;

/// Exclusive upper bound of the per-message salt.
pub const DEFAULT_SALT_BOUND: i32 = 500;

pub type RawMessage = [i32; MESSAGE_LEN];

/// A decoded ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub category: Category,
    pub location: Cell,
    /// Round in which the sender encoded the message.
    pub round: i32,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected 7 fields, got {0}")]
    WrongLength(usize),

    #[error("parity mismatch: transmitted {transmitted}, computed {computed}")]
    ParityMismatch { transmitted: i32, computed: i32 },

    #[error("unknown category code {0}")]
    UnknownCategory(i32),
}

/// Truncated remainder, so negative values never count as odd. Teammates built
/// independently compute parity this way; changing it breaks interop.
fn is_odd(value: i32) -> bool {
    value % 2 == 1
}

fn parity(fields: &[i32]) -> i32 {
    fields.iter().filter(|value| is_odd(**value)).count() as i32
}

/// Encodes a fact with a salt drawn from `0..salt_bound`.
pub fn encode<R: Rng + ?Sized>(
    category: Category,
    location: Cell,
    round: i32,
    salt_bound: i32,
    rng: &mut R,
) -> RawMessage {
    let salt = rng.gen_range(0..salt_bound.max(1));
    encode_with_salt(category, location, round, salt)
}

pub fn encode_with_salt(category: Category, location: Cell, round: i32, salt: i32) -> RawMessage {
    let mut message = [
        salt,
        category.code().wrapping_add(salt),
        location.x.wrapping_add(salt),
        location.y.wrapping_add(salt),
        round.wrapping_add(salt),
        salt, // reserved field, always 0 before salting
        0,
    ];
    message[PAYLOAD_LEN] = parity(&message[..PAYLOAD_LEN]);
    message
}

/// Decodes a raw ledger entry. Total: malformed input yields an error, never a panic.
pub fn decode(raw: &[i32]) -> Result<Fact, DecodeError> {
    if raw.len() != MESSAGE_LEN {
        return Err(DecodeError::WrongLength(raw.len()));
    }
    let transmitted = raw[PAYLOAD_LEN];
    let computed = parity(&raw[..PAYLOAD_LEN]);
    if transmitted != computed {
        return Err(DecodeError::ParityMismatch { transmitted, computed });
    }

    let salt = raw[0];
    let code = raw[1].wrapping_sub(salt);
    let category = Category::from_code(code).ok_or(DecodeError::UnknownCategory(code))?;
    Ok(Fact {
        category,
        location: Cell::new(raw[2].wrapping_sub(salt), raw[3].wrapping_sub(salt)),
        round: raw[4].wrapping_sub(salt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn layout_matches_wire_format() {
        let message = encode_with_salt(Category::FriendlyHqAtLocation, Cell::new(10, 20), 1, 3);
        assert_eq!(message, [3, 12, 13, 23, 4, 3, 4]);
    }

    #[test]
    fn negative_fields_never_count_as_odd() {
        let message = encode_with_salt(Category::SosAtLocation, Cell::new(-7, -2), 5, 0);
        // fields: 0, -104, -7, -2, 5, 0 -> only 5 counts
        assert_eq!(message[6], 1);
        assert!(decode(&message).is_ok());

        let message = encode_with_salt(Category::SosAtLocation, Cell::new(0, 0), 1, 3);
        assert_eq!(message, [3, -101, 3, 3, 4, 3, 4]);
    }

    #[test]
    fn parity_computed_with_negative_odd_counted_is_rejected() {
        let mut message = encode_with_salt(Category::SosAtLocation, Cell::new(0, 0), 1, 3);
        message[6] = 5;
        assert_eq!(
            decode(&message),
            Err(DecodeError::ParityMismatch { transmitted: 5, computed: 4 })
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(decode(&[1, 2, 3]), Err(DecodeError::WrongLength(3)));
        assert_eq!(decode(&[]), Err(DecodeError::WrongLength(0)));
    }

    #[test]
    fn foreign_codes_are_rejected() {
        // well-formed parity, but 1234 is not one of ours
        let mut message = [0, 1234, 5, 5, 9, 0, 0];
        message[6] = parity(&message[..6]);
        assert_eq!(decode(&message), Err(DecodeError::UnknownCategory(1234)));
    }

    #[test]
    fn seeded_salt_is_deterministic() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first = encode(Category::KillOrder, Cell::new(1, 1), 40, DEFAULT_SALT_BOUND, &mut a);
        let second = encode(Category::KillOrder, Cell::new(1, 1), 40, DEFAULT_SALT_BOUND, &mut b);
        assert_eq!(first, second);
        assert!((0..DEFAULT_SALT_BOUND).contains(&first[0]));
    }

    fn category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn round_trip_for_any_salt(
            category in category(),
            x in any::<i32>(),
            y in any::<i32>(),
            round in any::<i32>(),
            salt in any::<i32>(),
        ) {
            let message = encode_with_salt(category, Cell::new(x, y), round, salt);
            let fact = decode(&message).expect("genuine message decodes");
            prop_assert_eq!(fact.category, category);
            prop_assert_eq!(fact.location, Cell::new(x, y));
            prop_assert_eq!(fact.round, round);
        }

        #[test]
        fn flipping_a_field_parity_is_rejected(
            category in category(),
            x in 0i32..10_000,
            y in 0i32..10_000,
            round in 0i32..3000,
            salt in 0i32..DEFAULT_SALT_BOUND,
            field in 0usize..6,
        ) {
            let mut message = encode_with_salt(category, Cell::new(x, y), round, salt);
            // flipping the low bit of a negative value keeps it uncounted
            prop_assume!(message[field] >= 0);
            message[field] ^= 1;
            let is_parity_mismatch = matches!(decode(&message), Err(DecodeError::ParityMismatch { .. }));
            prop_assert!(is_parity_mismatch);
        }

        #[test]
        fn decode_never_panics(raw in prop::collection::vec(any::<i32>(), 0..10)) {
            let _ = decode(&raw);
        }
    }
}

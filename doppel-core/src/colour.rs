//! Opaque colour tags for vertices and edges.
//!
//! A [`ColourKey`] is a fixed-width flag set used as the unit of statistical
//! matching. Equality and hashing go by bit pattern, so two keys built
//! independently from the same flags behave as one key in every map and set.

use std::fmt;

/// An immutable, hashable category tag: a 128-bit flag set.
///
/// Keys are compared and hashed by their bit pattern only; no total order is
/// part of the public contract. Components that need a stable iteration
/// order sort internally by [`ColourKey::bits`].
///
/// # Examples
/// ```
/// use doppel_core::ColourKey;
///
/// let person = ColourKey::from_flag(3);
/// let same = ColourKey::from_flags(&[3]);
/// assert_eq!(person, same);
/// assert!(person.contains_flag(3));
/// assert!(!person.contains_flag(4));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColourKey(u128);

impl ColourKey {
    /// The key with no flags set. Usable as a neutral placeholder colour.
    pub const EMPTY: Self = Self(0);

    /// Creates a key with the single flag `index` set.
    ///
    /// Flag indices wrap at the 128-bit width; callers are expected to stay
    /// below 128.
    #[must_use]
    pub const fn from_flag(index: u32) -> Self {
        Self(1u128 << (index % 128))
    }

    /// Creates a key with every flag in `indices` set.
    #[must_use]
    pub fn from_flags(indices: &[u32]) -> Self {
        let mut bits = 0u128;
        for &index in indices {
            bits |= 1u128 << (index % 128);
        }
        Self(bits)
    }

    /// Returns the union of the two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` when flag `index` is set.
    #[must_use]
    pub const fn contains_flag(self, index: u32) -> bool {
        self.0 & (1u128 << (index % 128)) != 0
    }

    /// Returns the raw bit pattern.
    ///
    /// Exposed for deterministic internal ordering, not as a public order.
    #[must_use]
    pub const fn bits(self) -> u128 {
        self.0
    }

    /// Returns `true` when no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ColourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColourKey{self}")
    }
}

impl fmt::Display for ColourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut first = true;
        for index in 0..128u32 {
            if self.contains_flag(index) {
                if !first {
                    f.write_str(",")?;
                }
                write!(f, "{index}")?;
                first = false;
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::ColourKey;

    #[test]
    fn independently_built_keys_are_identical() {
        let left = ColourKey::from_flags(&[1, 5, 9]);
        let right = ColourKey::from_flag(9)
            .union(ColourKey::from_flag(1))
            .union(ColourKey::from_flag(5));
        assert_eq!(left, right);

        let mut set = HashSet::new();
        set.insert(left);
        assert!(set.contains(&right));
    }

    #[test]
    fn display_lists_set_flags() {
        let key = ColourKey::from_flags(&[2, 7]);
        assert_eq!(key.to_string(), "{2,7}");
        assert_eq!(ColourKey::EMPTY.to_string(), "{}");
    }

    #[test]
    fn empty_key_has_no_flags() {
        assert!(ColourKey::EMPTY.is_empty());
        assert!(!ColourKey::from_flag(0).is_empty());
    }
}

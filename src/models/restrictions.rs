//! Facet and cardinality restrictions carried by attributes and extensions

use serde::{Deserialize, Serialize};

/// maxOccurs="unbounded"
pub const UNBOUNDED: u32 = u32::MAX;

/// Restrictions on an attribute or extension.
///
/// Every facet is optional. Merging overrides the facets the other side
/// sets and keeps the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    /// Minimum occurrences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_occurs: Option<u32>,
    /// Maximum occurrences, [`UNBOUNDED`] for no limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_occurs: Option<u32>,
    /// minExclusive facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<String>,
    /// minInclusive facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<String>,
    /// minLength facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    /// maxExclusive facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<String>,
    /// maxInclusive facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<String>,
    /// maxLength facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// totalDigits facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_digits: Option<u32>,
    /// fractionDigits facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<u32>,
    /// length facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// whiteSpace facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_space: Option<String>,
    /// pattern facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// explicitTimezone facet (XSD 1.1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_timezone: Option<String>,
    /// Whether the element is nillable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nillable: Option<bool>,
    /// Whether the field takes part in an order-significant content model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequential: Option<bool>,
    /// Whether the value is a whitespace separated token list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<bool>,
    /// Value format hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Restrictions {
    /// Create empty restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrictions with fixed occurrence bounds
    pub fn with_occurs(min: u32, max: u32) -> Self {
        Self {
            min_occurs: Some(min),
            max_occurs: Some(max),
            ..Self::default()
        }
    }

    /// Mark as part of a sequence
    pub fn sequential() -> Self {
        Self {
            sequential: Some(true),
            ..Self::default()
        }
    }

    /// Check the sequential flag
    pub fn is_sequential(&self) -> bool {
        self.sequential.unwrap_or(false)
    }

    /// Check whether occurrences are fixed to exactly one
    pub fn is_single(&self) -> bool {
        self.min_occurs == Some(1) && self.max_occurs == Some(1)
    }

    /// Check whether maxOccurs allows more than one value
    pub fn is_list(&self) -> bool {
        self.max_occurs.map_or(false, |max| max > 1)
    }

    /// Check if no facet is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Override every facet that `other` sets, keep the rest
    pub fn merge(&mut self, other: &Restrictions) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        take(&mut self.min_occurs, &other.min_occurs);
        take(&mut self.max_occurs, &other.max_occurs);
        take(&mut self.min_exclusive, &other.min_exclusive);
        take(&mut self.min_inclusive, &other.min_inclusive);
        take(&mut self.min_length, &other.min_length);
        take(&mut self.max_exclusive, &other.max_exclusive);
        take(&mut self.max_inclusive, &other.max_inclusive);
        take(&mut self.max_length, &other.max_length);
        take(&mut self.total_digits, &other.total_digits);
        take(&mut self.fraction_digits, &other.fraction_digits);
        take(&mut self.length, &other.length);
        take(&mut self.white_space, &other.white_space);
        take(&mut self.pattern, &other.pattern);
        take(&mut self.explicit_timezone, &other.explicit_timezone);
        take(&mut self.nillable, &other.nillable);
        take(&mut self.sequential, &other.sequential);
        take(&mut self.tokens, &other.tokens);
        take(&mut self.format, &other.format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_merge_overrides_and_keeps() {
        let mut target = Restrictions {
            min_occurs: Some(0),
            pattern: Some("[a-z]+".into()),
            ..Restrictions::default()
        };
        let source = Restrictions {
            min_occurs: Some(1),
            max_length: Some(10),
            ..Restrictions::default()
        };

        target.merge(&source);

        assert_eq!(target.min_occurs, Some(1));
        assert_eq!(target.max_length, Some(10));
        assert_eq!(target.pattern.as_deref(), Some("[a-z]+"));
    }

    #[test]
    fn test_occurs_helpers() {
        assert!(Restrictions::with_occurs(1, 1).is_single());
        assert!(!Restrictions::with_occurs(0, 1).is_single());
        assert!(Restrictions::with_occurs(0, UNBOUNDED).is_list());
        assert!(Restrictions::sequential().is_sequential());
        assert!(Restrictions::new().is_empty());
    }

    #[test]
    fn test_serde_skips_unset_facets() {
        let json = serde_json::to_string(&Restrictions::with_occurs(1, 1)).unwrap();
        assert_eq!(json, r#"{"min_occurs":1,"max_occurs":1}"#);

        let back: Restrictions = serde_json::from_str("{}").unwrap();
        assert!(back.is_empty());
    }

    fn restrictions() -> impl Strategy<Value = Restrictions> {
        (
            proptest::option::of(0u32..5),
            proptest::option::of(0u32..5),
            proptest::option::of("[a-z]{1,4}"),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(min, max, pattern, sequential)| Restrictions {
                min_occurs: min,
                max_occurs: max,
                pattern,
                sequential,
                ..Restrictions::default()
            })
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(base in restrictions(), other in restrictions()) {
            let mut once = base.clone();
            once.merge(&other);
            let mut twice = once.clone();
            twice.merge(&other);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_merge_with_empty_is_identity(base in restrictions()) {
            let mut merged = base.clone();
            merged.merge(&Restrictions::default());
            prop_assert_eq!(merged, base);
        }

        #[test]
        fn prop_merge_prefers_other(base in restrictions(), other in restrictions()) {
            let mut merged = base.clone();
            merged.merge(&other);
            prop_assert_eq!(merged.min_occurs, other.min_occurs.or(base.min_occurs));
            prop_assert_eq!(merged.pattern, other.pattern.or(base.pattern));
        }
    }
}

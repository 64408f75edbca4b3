//! Declarative collection catalog for the Quantify database
//!
//! The catalog is a compile-time constant: an ordered list of [`CollectionSpec`]s, each
//! carrying a kind-specific policy (a `$jsonSchema`-style validation rule, a time-series
//! layout, or nothing). Nothing here talks to a database; storage backends translate
//! these descriptors into their own collection options.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Database provisioned when no other name is configured
pub const DEFAULT_DATABASE: &str = "quantify";

const MAX_DATABASE_NAME_BYTES: usize = 63;

const FORBIDDEN_DATABASE_CHARS: &[char] = &[
    '/', '\\', '.', '"', '$', '*', '<', '>', ':', '|', '?', ' ', '\0',
];

/// Name of the database the catalog is applied to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DatabaseTarget(String);

impl DatabaseTarget {
    /// Validate and wrap a database name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_database_name(&name)?;
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a database name against the rules MongoDB enforces
pub fn validate_database_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_input("database name must not be empty"));
    }
    if name.len() > MAX_DATABASE_NAME_BYTES {
        return Err(Error::invalid_input(format!(
            "database name '{name}' is {} bytes, maximum is {MAX_DATABASE_NAME_BYTES}",
            name.len()
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_DATABASE_CHARS.contains(c)) {
        return Err(Error::invalid_input(format!(
            "database name '{name}' contains forbidden character {c:?}"
        )));
    }
    Ok(())
}

/// What to do with existing state before the catalog is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Drop the database unconditionally
    #[default]
    Drop,
    /// Stop without creating anything if the database is already present
    AbortIfExists,
    /// Create collections into whatever state exists
    Proceed,
}

impl ResetPolicy {
    /// Map the boolean "delete database" switch onto a policy
    pub fn from_delete_flag(delete: bool) -> Self {
        if delete {
            Self::Drop
        } else {
            Self::AbortIfExists
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::AbortIfExists => "abort_if_exists",
            Self::Proceed => "proceed",
        }
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BSON type names usable in a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BsonType {
    String,
    Double,
    Int,
    Long,
    Bool,
    Date,
    Object,
}

impl BsonType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Double => "double",
            Self::Int => "int",
            Self::Long => "long",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Object => "object",
        }
    }
}

/// One property in a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub name: &'static str,
    pub bson_type: BsonType,
    pub description: &'static str,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(
        name: &'static str,
        bson_type: BsonType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            bson_type,
            description,
            required: true,
        }
    }

    pub const fn optional(
        name: &'static str,
        bson_type: BsonType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            bson_type,
            description,
            required: false,
        }
    }
}

/// Structural constraints enforced by the storage engine on every write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationRule {
    pub title: &'static str,
    pub fields: &'static [FieldRule],
}

impl ValidationRule {
    /// Names of required fields, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

/// Bucket sizing hint for a time-series collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Minutes,
    Hours,
}

impl Granularity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        }
    }
}

/// Time-keyed storage layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPolicy {
    /// Field holding the document timestamp
    pub time_field: &'static str,
    /// Field documents are grouped by
    pub meta_field: &'static str,
    pub granularity: Granularity,
}

impl TimeSeriesPolicy {
    pub const fn new(
        time_field: &'static str,
        meta_field: &'static str,
        granularity: Granularity,
    ) -> Self {
        Self {
            time_field,
            meta_field,
            granularity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "policy", rename_all = "snake_case")]
pub enum CollectionKind {
    ValidatedDocument(ValidationRule),
    TimeSeries(TimeSeriesPolicy),
    Plain,
}

impl CollectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ValidatedDocument(_) => "validated-document",
            Self::TimeSeries(_) => "time-series",
            Self::Plain => "plain",
        }
    }
}

/// A collection to be created, with its kind-specific configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: CollectionKind,
}

impl CollectionSpec {
    pub const fn validated(name: &'static str, rule: ValidationRule) -> Self {
        Self {
            name,
            kind: CollectionKind::ValidatedDocument(rule),
        }
    }

    pub const fn time_series(name: &'static str, policy: TimeSeriesPolicy) -> Self {
        Self {
            name,
            kind: CollectionKind::TimeSeries(policy),
        }
    }

    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            kind: CollectionKind::Plain,
        }
    }
}

const TICKER_FIELDS: &[FieldRule] = &[
    FieldRule::required(
        "ticker",
        BsonType::String,
        "The ticker name for this asset",
    ),
    FieldRule::optional(
        "company",
        BsonType::String,
        "The company name for this asset",
    ),
    FieldRule::required(
        "exchange",
        BsonType::String,
        "The exchange on which the ticker is traded",
    ),
];

/// Collections of the Quantify database, in creation order
pub const CATALOG: &[CollectionSpec] = &[
    // Ticker metadata
    CollectionSpec::validated(
        "tickers",
        ValidationRule {
            title: "Ticker Object Validation",
            fields: TICKER_FIELDS,
        },
    ),
    // Candle data
    CollectionSpec::time_series(
        "minute_candle",
        TimeSeriesPolicy::new("timestamp", "ticker", Granularity::Minutes),
    ),
    CollectionSpec::time_series(
        "hour_candle",
        TimeSeriesPolicy::new("timestamp", "ticker", Granularity::Hours),
    ),
    CollectionSpec::plain("day_candle"),
    CollectionSpec::plain("fundamentals"),
];

pub fn catalog() -> &'static [CollectionSpec] {
    CATALOG
}

/// Check the structural invariants of a catalog before anything touches a database
pub fn validate_catalog(catalog: &[CollectionSpec]) -> Result<()> {
    if catalog.is_empty() {
        return Err(Error::invalid_input("catalog must contain at least one collection"));
    }

    let mut seen = HashSet::new();
    for spec in catalog {
        validate_collection_name(spec.name)?;
        if !seen.insert(spec.name) {
            return Err(Error::invalid_input(format!(
                "collection '{}' appears more than once in the catalog",
                spec.name
            )));
        }

        match &spec.kind {
            CollectionKind::ValidatedDocument(rule) => validate_rule(spec.name, rule)?,
            CollectionKind::TimeSeries(policy) => validate_time_series(spec.name, policy)?,
            CollectionKind::Plain => {}
        }
    }

    Ok(())
}

fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_input("collection name must not be empty"));
    }
    if name.contains('$') || name.contains('\0') {
        return Err(Error::invalid_input(format!(
            "collection name '{name}' must not contain '$' or NUL"
        )));
    }
    if name.starts_with("system.") {
        return Err(Error::invalid_input(format!(
            "collection name '{name}' uses the reserved 'system.' prefix"
        )));
    }
    Ok(())
}

fn validate_rule(collection: &str, rule: &ValidationRule) -> Result<()> {
    if rule.fields.is_empty() {
        return Err(Error::invalid_input(format!(
            "validation rule for '{collection}' declares no fields"
        )));
    }
    let mut seen = HashSet::new();
    for field in rule.fields {
        if field.name.is_empty() || !seen.insert(field.name) {
            return Err(Error::invalid_input(format!(
                "validation rule for '{collection}' has an empty or duplicate field '{}'",
                field.name
            )));
        }
    }
    Ok(())
}

fn validate_time_series(collection: &str, policy: &TimeSeriesPolicy) -> Result<()> {
    if policy.time_field.is_empty() || policy.meta_field.is_empty() {
        return Err(Error::invalid_input(format!(
            "time-series collection '{collection}' needs both a time field and a meta field"
        )));
    }
    if policy.time_field == policy.meta_field {
        return Err(Error::invalid_input(format!(
            "time-series collection '{collection}' uses '{}' as both time and meta field",
            policy.time_field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_order_is_fixed() {
        let names: Vec<&str> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "tickers",
                "minute_candle",
                "hour_candle",
                "day_candle",
                "fundamentals"
            ]
        );
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert!(validate_catalog(catalog()).is_ok());
    }

    #[test]
    fn test_tickers_requires_ticker_and_exchange() {
        let CollectionKind::ValidatedDocument(rule) = catalog()[0].kind else {
            panic!("tickers should be a validated collection");
        };
        let required: Vec<&str> = rule.required_fields().collect();
        assert_eq!(required, vec!["ticker", "exchange"]);
        assert!(rule
            .fields
            .iter()
            .all(|f| f.bson_type == BsonType::String));
    }

    #[test]
    fn test_candle_collections_are_time_series() {
        let expected = [
            ("minute_candle", Granularity::Minutes),
            ("hour_candle", Granularity::Hours),
        ];
        for (name, granularity) in expected {
            let spec = catalog()
                .iter()
                .find(|s| s.name == name)
                .expect("candle collection missing");
            assert_eq!(
                spec.kind,
                CollectionKind::TimeSeries(TimeSeriesPolicy::new(
                    "timestamp",
                    "ticker",
                    granularity
                ))
            );
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        const DUPLICATED: &[CollectionSpec] = &[
            CollectionSpec::plain("day_candle"),
            CollectionSpec::plain("day_candle"),
        ];
        let err = validate_catalog(DUPLICATED).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(validate_catalog(&[]).is_err());
    }

    #[test]
    fn test_reserved_collection_name_rejected() {
        let specs = [CollectionSpec::plain("system.views")];
        assert!(validate_catalog(&specs).is_err());
    }

    #[test]
    fn test_time_series_fields_must_differ() {
        let specs = [CollectionSpec::time_series(
            "bad_candle",
            TimeSeriesPolicy::new("ticker", "ticker", Granularity::Minutes),
        )];
        let err = validate_catalog(&specs).unwrap_err();
        assert!(err.to_string().contains("both time and meta field"));
    }

    #[test]
    fn test_database_target_rules() {
        assert_eq!(DatabaseTarget::new("quantify").unwrap().name(), "quantify");
        assert!(DatabaseTarget::new("").is_err());
        assert!(DatabaseTarget::new("quant.ify").is_err());
        assert!(DatabaseTarget::new("quant ify").is_err());
        assert!(DatabaseTarget::new("a".repeat(64)).is_err());
        assert!(DatabaseTarget::new("a".repeat(63)).is_ok());
    }

    #[test]
    fn test_reset_policy_deserialization() {
        for policy in [
            ResetPolicy::Drop,
            ResetPolicy::AbortIfExists,
            ResetPolicy::Proceed,
        ] {
            let parsed: ResetPolicy =
                serde_json::from_value(serde_json::json!(policy.as_str())).unwrap();
            assert_eq!(parsed, policy);
        }
        assert!(serde_json::from_str::<ResetPolicy>("\"abort-if-exists\"").is_err());
        assert!(serde_json::from_str::<ResetPolicy>("\"truncate\"").is_err());
    }

    #[test]
    fn test_reset_policy_from_delete_flag() {
        assert_eq!(ResetPolicy::from_delete_flag(true), ResetPolicy::Drop);
        assert_eq!(
            ResetPolicy::from_delete_flag(false),
            ResetPolicy::AbortIfExists
        );
    }

    #[test]
    fn test_catalog_serializes_with_kind_tags() {
        let value = serde_json::to_value(catalog()).unwrap();
        assert_eq!(value[0]["name"], "tickers");
        assert_eq!(value[0]["kind"], "validated_document");
        assert_eq!(value[0]["policy"]["fields"][0]["bson_type"], "string");
        assert_eq!(value[1]["kind"], "time_series");
        assert_eq!(value[1]["policy"]["granularity"], "minutes");
        assert_eq!(value[3]["kind"], "plain");
    }
}

//! Translation of collection specs into MongoDB `create` options

use mongodb::bson::{doc, Document};
use mongodb::options::{CreateCollectionOptions, TimeseriesGranularity, TimeseriesOptions};
use quantify_core::{CollectionKind, CollectionSpec, Granularity, TimeSeriesPolicy, ValidationRule};

/// Options for creating the collection, or `None` for a plain collection
pub(crate) fn collection_options(spec: &CollectionSpec) -> Option<CreateCollectionOptions> {
    match &spec.kind {
        CollectionKind::ValidatedDocument(rule) => Some(
            CreateCollectionOptions::builder()
                .validator(validator_document(rule))
                .build(),
        ),
        CollectionKind::TimeSeries(policy) => Some(
            CreateCollectionOptions::builder()
                .timeseries(timeseries_options(policy))
                .build(),
        ),
        CollectionKind::Plain => None,
    }
}

/// `$jsonSchema` validator for a validation rule
pub(crate) fn validator_document(rule: &ValidationRule) -> Document {
    let mut properties = Document::new();
    for field in rule.fields {
        properties.insert(
            field.name,
            doc! {
                "bsonType": field.bson_type.as_str(),
                "description": field.description,
            },
        );
    }
    let required: Vec<&str> = rule.required_fields().collect();

    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "title": rule.title,
            "required": required,
            "properties": properties,
        }
    }
}

fn timeseries_options(policy: &TimeSeriesPolicy) -> TimeseriesOptions {
    TimeseriesOptions::builder()
        .time_field(policy.time_field.to_string())
        .meta_field(Some(policy.meta_field.to_string()))
        .granularity(Some(granularity(policy.granularity)))
        .build()
}

fn granularity(granularity: Granularity) -> TimeseriesGranularity {
    match granularity {
        Granularity::Minutes => TimeseriesGranularity::Minutes,
        Granularity::Hours => TimeseriesGranularity::Hours,
    }
}

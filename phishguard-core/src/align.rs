// Schema alignment: reorder, pad and cast a raw row into the model's layout

use crate::schema::FeatureSchema;
use phishguard_model::{FeatureValue, FeatureVector, TLD_COLUMN};

/// Produce a vector with exactly the schema's columns, in schema order.
///
/// Columns the row lacks become 0.0, columns the schema lacks are dropped,
/// numeric columns are coerced to finite floats, and the TLD column is
/// lowercased and mapped into the schema's closed category set.
pub fn align_features(schema: &FeatureSchema, row: &[(&str, FeatureValue)]) -> FeatureVector {
    let lookup = |column: &str| {
        row.iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    };

    let mut vector = FeatureVector::with_capacity(schema.feature_columns().len());
    for column in schema.feature_columns() {
        let value = lookup(column);
        if column == TLD_COLUMN {
            let raw = value.map(FeatureValue::as_label).unwrap_or_default();
            vector.push(column.as_str(), schema.map_tld(&raw));
        } else {
            vector.push(column.as_str(), value.map(FeatureValue::as_f64).unwrap_or(0.0));
        }
    }
    vector
}

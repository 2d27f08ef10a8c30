use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use study604_core::store::Collection;

// Characters that are kept as-is in filter values
const FILTER_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

pub fn auth_header_value(api_key: &str) -> String {
    format!("Bearer {api_key}")
}

pub fn table_url(base_url: &str, collection: Collection) -> String {
    format!("{}/rest/v1/{collection}", base_url.trim_end_matches('/'))
}

/// The column that defines the insertion order of a collection.
pub const fn order_column(collection: Collection) -> &'static str {
    match collection {
        Collection::Spots => "id",
        Collection::Saved => "created_at",
        Collection::Reviews => "timestamp",
    }
}

pub fn eq_filter(field: &str, value: &str) -> String {
    let field = utf8_percent_encode(field, FILTER_VALUE);
    let value = utf8_percent_encode(value, FILTER_VALUE);
    format!("{field}=eq.{value}")
}

//! Request builder shorthands, for `perform(get("/hotels"))`.

use mockmvc_core::domain::MockRequestBuilder;

pub fn get(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::get(uri_template)
}

pub fn post(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::post(uri_template)
}

pub fn put(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::put(uri_template)
}

pub fn patch(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::patch(uri_template)
}

pub fn delete(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::delete(uri_template)
}

pub fn head(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::head(uri_template)
}

pub fn options(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::options(uri_template)
}

/// A multipart POST; add parts with `part` or `file`.
pub fn multipart(uri_template: impl Into<String>) -> MockRequestBuilder {
    MockRequestBuilder::multipart(uri_template)
}

//! Tests for form field extraction.

use super::*;
use actix_web::error::PayloadError;
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use futures_util::stream;
use rstest::{fixture, rstest};

use crate::inbound::http::test_utils::{
    FormPart as Part, multipart_body, multipart_content_type,
};

const NAME: FieldName = FieldName::new("name");
const AGE: FieldName = FieldName::new("age");
const AVATAR: FieldName = FieldName::new("avatar");

#[fixture]
fn spec() -> FormSpec {
    FormSpec {
        fields: &[ID, NAME, AGE],
        file: Some(AVATAR),
        max_file_bytes: 8,
    }
}

async fn decode(parts: &[Part<'_>], spec: &FormSpec) -> Result<FormPayload, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&multipart_content_type()).expect("header value"),
    );
    let chunks = vec![Ok::<_, PayloadError>(web::Bytes::from(multipart_body(parts)))];
    FormPayload::from_multipart(&headers, stream::iter(chunks), spec).await
}

fn detail_code(error: &Error) -> &str {
    error.details().expect("details")["code"]
        .as_str()
        .expect("code string")
}

#[rstest]
fn urlencoded_keeps_first_value_and_drops_unknown(spec: FormSpec) {
    let form = FormPayload::from_urlencoded(b"name=Rex&name=Max&colour=brown&age=3", &spec);

    assert_eq!(form.text(NAME), Some("Rex"));
    assert_eq!(form.text(AGE), Some("3"));
    assert!(form.fields.get("colour").is_none());
}

#[rstest]
fn urlencoded_decodes_escapes(spec: FormSpec) {
    let form = FormPayload::from_urlencoded(b"name=Sir+Barks%21", &spec);
    assert_eq!(form.text(NAME), Some("Sir Barks!"));
}

#[rstest]
#[actix_web::test]
async fn multipart_captures_text_and_avatar(spec: FormSpec) {
    let mut form = decode(
        &[
            Part::Text("name", "Rex"),
            Part::File("avatar", "rex.png", b"\x89PNG"),
            Part::Text("age", "4"),
        ],
        &spec,
    )
    .await
    .expect("decodes");

    assert_eq!(form.text(NAME), Some("Rex"));
    assert_eq!(form.text(AGE), Some("4"));
    let avatar = form.take_file().expect("avatar captured");
    assert_eq!(avatar.bytes(), b"\x89PNG");
    assert_eq!(avatar.content_type(), "image/png");
    assert_eq!(avatar.file_name(), Some("rex.png"));
}

#[rstest]
#[actix_web::test]
async fn empty_file_part_means_no_avatar(spec: FormSpec) {
    let mut form = decode(&[Part::File("avatar", "", b"")], &spec)
        .await
        .expect("decodes");
    assert!(form.take_file().is_none());
}

#[rstest]
#[actix_web::test]
async fn oversized_avatar_is_rejected(spec: FormSpec) {
    let error = decode(&[Part::File("avatar", "big.png", b"0123456789")], &spec)
        .await
        .expect_err("too large");
    assert_eq!(detail_code(&error), "too_large");
    assert_eq!(error.details().expect("details")["field"], "avatar");
}

#[rstest]
#[actix_web::test]
async fn file_part_for_text_field_is_skipped(spec: FormSpec) {
    let form = decode(
        &[Part::File("name", "name.txt", b"Rex"), Part::Text("name", "Max")],
        &spec,
    )
    .await
    .expect("decodes");
    assert_eq!(form.text(NAME), Some("Max"));
}

#[rstest]
#[actix_web::test]
async fn repeated_multipart_field_keeps_first(spec: FormSpec) {
    let form = decode(&[Part::Text("age", "2"), Part::Text("age", "9")], &spec)
        .await
        .expect("decodes");
    assert_eq!(form.text(AGE), Some("2"));
}

#[rstest]
fn blank_required_value_is_missing(spec: FormSpec) {
    let form = FormPayload::from_urlencoded(b"name=++", &spec);
    let error = form.require(NAME).expect_err("blank");
    assert_eq!(detail_code(&error), "missing_field");
    assert!(form.optional(NAME).is_none());
}

#[rstest]
fn update_requires_id(spec: FormSpec) {
    let form = FormPayload::from_urlencoded(b"name=Rex", &spec);
    let error = form
        .into_mutation(MutationVerb::Update, |form| Ok(form.require(NAME)?.to_owned()))
        .expect_err("id missing");
    assert_eq!(detail_code(&error), "missing_field");
    assert_eq!(error.details().expect("details")["field"], "id");
}

#[rstest]
fn delete_rejects_malformed_id(spec: FormSpec) {
    let form = FormPayload::from_urlencoded(b"id=p1", &spec);
    let error = form
        .into_mutation(MutationVerb::Delete, |_| Ok(()))
        .expect_err("bad id");
    assert_eq!(detail_code(&error), "invalid_uuid");
}

#[rstest]
fn delete_never_builds_a_draft(spec: FormSpec) {
    let id = Uuid::new_v4();
    let body = format!("id={id}");
    let form = FormPayload::from_urlencoded(body.as_bytes(), &spec);
    let mutation = form
        .into_mutation::<String>(MutationVerb::Delete, |_| {
            Err(Error::internal("draft built for delete"))
        })
        .expect("delete decodes");
    assert_eq!(mutation, Mutation::Delete { id });
}

#[rstest]
fn create_ignores_id(spec: FormSpec) {
    let form = FormPayload::from_urlencoded(b"id=not-a-uuid&name=Rex", &spec);
    let mutation = form
        .into_mutation(MutationVerb::Create, |form| Ok(form.require(NAME)?.to_owned()))
        .expect("create decodes");
    assert_eq!(mutation, Mutation::Create("Rex".to_owned()));
}

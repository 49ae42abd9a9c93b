//! Field extraction for form-encoded mutation requests.
//!
//! Both `multipart/form-data` and `application/x-www-form-urlencoded` bodies
//! reduce to a [`FormPayload`]: the first text value of each recognised field
//! plus at most one file part. Unknown fields are ignored, and a file sent
//! for a text field is skipped.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use actix_web::http::header::HeaderMap;
use actix_web::{HttpMessage, HttpRequest, web};
use futures_util::{Stream, TryStreamExt};
use serde_json::json;
use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

use crate::domain::{AvatarUpload, Error, Mutation, MutationVerb};
use crate::inbound::http::validation::{
    FieldName, invalid_text_error, missing_field_error, parse_uuid, too_large_error,
};

/// Record identifier, required for `PUT` and `DELETE`.
pub(crate) const ID: FieldName = FieldName::new("id");

/// Cap on a single text value.
const MAX_TEXT_BYTES: usize = 16 * 1024;
/// Cap on a whole url-encoded body.
const MAX_URLENCODED_BYTES: usize = 64 * 1024;
const BODY: FieldName = FieldName::new("body");

/// Which fields an endpoint reads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FormSpec {
    /// Text fields in the order they are validated.
    pub fields: &'static [FieldName],
    /// File field, if the endpoint accepts one.
    pub file: Option<FieldName>,
    /// Largest file part accepted.
    pub max_file_bytes: usize,
}

impl FormSpec {
    fn recognise(&self, name: &str) -> Option<FieldName> {
        self.fields
            .iter()
            .copied()
            .find(|field| field.as_str() == name)
    }

    fn is_file_field(&self, name: &str) -> bool {
        self.file.is_some_and(|field| field.as_str() == name)
    }
}

/// Partial record decoded from a request body.
#[derive(Debug, Default)]
pub(crate) struct FormPayload {
    fields: HashMap<&'static str, String>,
    file: Option<AvatarUpload>,
}

impl FormPayload {
    /// Raw text for `field`, when present.
    pub(crate) fn text(&self, field: FieldName) -> Option<&str> {
        self.fields.get(field.as_str()).map(String::as_str)
    }

    /// Text for a required field. Blank values count as missing.
    pub(crate) fn require(&self, field: FieldName) -> Result<&str, Error> {
        self.text(field)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| missing_field_error(field))
    }

    /// Text for an optional field. Blank values count as absent.
    pub(crate) fn optional(&self, field: FieldName) -> Option<&str> {
        self.text(field).filter(|value| !value.trim().is_empty())
    }

    /// Take the captured file part, if any.
    pub(crate) fn take_file(&mut self) -> Option<AvatarUpload> {
        self.file.take()
    }

    fn required_id(&self) -> Result<Uuid, Error> {
        parse_uuid(self.require(ID)?, ID)
    }

    /// Promote the partial record into a typed mutation for `verb`.
    ///
    /// `id` is checked before the draft for `PUT` and `DELETE`; `DELETE`
    /// never builds a draft.
    pub(crate) fn into_mutation<D>(
        mut self,
        verb: MutationVerb,
        draft: impl FnOnce(&mut Self) -> Result<D, Error>,
    ) -> Result<Mutation<D>, Error> {
        match verb {
            MutationVerb::Create => Ok(Mutation::Create(draft(&mut self)?)),
            MutationVerb::Update => {
                let id = self.required_id()?;
                Ok(Mutation::Update {
                    id,
                    draft: draft(&mut self)?,
                })
            }
            MutationVerb::Delete => Ok(Mutation::Delete {
                id: self.required_id()?,
            }),
        }
    }

    /// Decode a url-encoded body. The first value of a repeated field wins.
    pub(crate) fn from_urlencoded(body: &[u8], spec: &FormSpec) -> Self {
        let mut form = Self::default();
        for (name, value) in form_urlencoded::parse(body) {
            if let Some(field) = spec.recognise(&name) {
                form.fields
                    .entry(field.as_str())
                    .or_insert_with(|| value.into_owned());
            }
        }
        form
    }

    /// Decode a multipart body.
    pub(crate) async fn from_multipart<S, E>(
        headers: &HeaderMap,
        stream: S,
        spec: &FormSpec,
    ) -> Result<Self, Error>
    where
        S: Stream<Item = Result<web::Bytes, E>> + 'static,
        E: Into<actix_web::error::PayloadError> + 'static,
    {
        let mut multipart = Multipart::new(headers, stream.map_err(Into::into));
        let mut form = Self::default();
        while let Some(mut field) = multipart.try_next().await.map_err(malformed_body)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|disposition| disposition.get_filename())
                .map(str::to_owned);

            if spec.is_file_field(&name) {
                if file_name.is_some() && form.file.is_none() {
                    form.file = read_file(&mut field, spec, file_name).await?;
                }
                continue;
            }

            let Some(known) = spec.recognise(&name) else {
                debug!(field = %name, "ignoring unrecognised form field");
                continue;
            };
            if file_name.is_some() {
                debug!(field = %name, "ignoring file part for text field");
                continue;
            }
            if form.fields.contains_key(known.as_str()) {
                continue;
            }
            let bytes = read_limited(&mut field, known, MAX_TEXT_BYTES).await?;
            let text = String::from_utf8(bytes).map_err(|_| invalid_text_error(known))?;
            form.fields.insert(known.as_str(), text);
        }
        Ok(form)
    }
}

/// Read the request body as a form, dispatching on its content type.
///
/// A body without a content type is read as url-encoded so that a bare
/// `DELETE` with an `id` still decodes.
pub(crate) async fn read_form(
    req: &HttpRequest,
    mut payload: web::Payload,
    spec: &FormSpec,
) -> Result<FormPayload, Error> {
    let mime = req
        .mime_type()
        .map_err(|_| unsupported_content_type("unparseable"))?;
    match mime {
        Some(mime) if mime.essence_str() == "multipart/form-data" => {
            FormPayload::from_multipart(req.headers(), payload, spec).await
        }
        Some(mime) if mime.essence_str() != "application/x-www-form-urlencoded" => {
            Err(unsupported_content_type(mime.essence_str()))
        }
        _ => {
            let mut body = web::BytesMut::new();
            while let Some(chunk) = payload.try_next().await.map_err(malformed_body)? {
                if body.len() + chunk.len() > MAX_URLENCODED_BYTES {
                    return Err(too_large_error(BODY, MAX_URLENCODED_BYTES));
                }
                body.extend_from_slice(&chunk);
            }
            Ok(FormPayload::from_urlencoded(&body, spec))
        }
    }
}

async fn read_limited(
    field: &mut Field,
    name: FieldName,
    limit: usize,
) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed_body)? {
        if buf.len() + chunk.len() > limit {
            return Err(too_large_error(name, limit));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Read a file part. Browsers send an empty part when no file was chosen,
/// which reads as no attachment.
async fn read_file(
    field: &mut Field,
    spec: &FormSpec,
    file_name: Option<String>,
) -> Result<Option<AvatarUpload>, Error> {
    let Some(name) = spec.file else {
        return Ok(None);
    };
    let content_type = field.content_type().map(ToString::to_string);
    let bytes = read_limited(field, name, spec.max_file_bytes).await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    AvatarUpload::new(bytes, content_type, file_name.filter(|value| !value.is_empty()))
        .map(Some)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

fn malformed_body(err: impl std::fmt::Display) -> Error {
    Error::invalid_request("request body could not be read").with_details(json!({
        "code": "malformed_body",
        "reason": err.to_string(),
    }))
}

fn unsupported_content_type(found: &str) -> Error {
    Error::invalid_request("body must be multipart/form-data or url-encoded").with_details(
        json!({
            "code": "unsupported_content_type",
            "value": found,
        }),
    )
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;

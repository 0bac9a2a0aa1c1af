//! WASM API for the organizer document core
//!
//! This module provides the JavaScript-facing API: session management,
//! structural edit requests, projection retrieval, clipboard operations
//! and find/replace. The active session is WASM-owned; the view only ever
//! sees handles, labels and notifications.

use lazy_static::lazy_static;
use std::sync::Mutex;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, serialize, validation_error};
use crate::api::types::{ClipboardInfo, InvalidSelector, LoadResult};
use crate::edit::{self, EditRequest, Notification, Placement};
use crate::models::{
    ClipboardBatch, CollectionKind, Document, EntryRef, FieldValue, PartSlot, RecordKind, Session,
};
use crate::projection;
use crate::resolver;
use crate::search;
use crate::{wasm_error, wasm_info};

// WASM-owned session storage (canonical source of truth)
lazy_static! {
    static ref SESSION: Mutex<Option<Session>> = Mutex::new(None);
}

/// Run a closure against the active session
fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, JsValue>) -> Result<T, JsValue> {
    let mut guard = SESSION
        .lock()
        .map_err(|_| JsValue::from_str("Session lock poisoned"))?;
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err(validation_error("No document loaded")),
    }
}

fn apply_request(request: EditRequest) -> Result<JsValue, JsValue> {
    with_session(|session| {
        let notifications = edit::apply(session, request);
        serialize(&notifications, "Serialization error")
    })
}

/// Start a session over an empty document
#[wasm_bindgen(js_name = newDocument)]
pub fn new_document() -> Result<(), JsValue> {
    wasm_info!("newDocument called");
    let mut guard = SESSION
        .lock()
        .map_err(|_| JsValue::from_str("Session lock poisoned"))?;
    *guard = Some(Session::new(Document::new()));
    Ok(())
}

/// Load a document produced by the external codec
///
/// Takes the document as JSON, replaces the session document (the
/// clipboard survives so batches can cross documents) and reports the
/// selectors that do not resolve against the loaded palettes.
#[wasm_bindgen(js_name = loadDocument)]
pub fn load_document(json: &str) -> Result<JsValue, JsValue> {
    wasm_info!("loadDocument called: {} bytes", json.len());

    let document: Document = serde_json::from_str(json).map_err(|e| {
        wasm_error!("Document parse error: {}", e);
        JsValue::from_str(&format!("Document parse error: {}", e))
    })?;

    let mut guard = SESSION
        .lock()
        .map_err(|_| JsValue::from_str("Session lock poisoned"))?;
    let session = guard.get_or_insert_with(|| Session::new(Document::new()));
    session.replace_document(document);

    let invalid_selectors: Vec<InvalidSelector> =
        resolver::validate_references(&session.document)
            .into_iter()
            .map(|(entry, (palette_index, color_index))| InvalidSelector {
                entry,
                palette_index,
                color_index,
            })
            .collect();
    if !invalid_selectors.is_empty() {
        wasm_error!(
            "{} color selector(s) reference invalid part colors",
            invalid_selectors.len()
        );
    }

    let result = LoadResult {
        notifications: vec![
            Notification::Reindexed(CollectionKind::PartColors),
            Notification::Reindexed(CollectionKind::PartSets),
            Notification::Reindexed(CollectionKind::Bodies),
            Notification::Reindexed(CollectionKind::Skeletons),
            Notification::StatusMessage("Loaded document".to_string()),
        ],
        invalid_selectors,
    };
    serialize(&result, "Serialization error")
}

/// Serialize the session document back for the external codec, shape
/// unchanged
#[wasm_bindgen(js_name = saveDocument)]
pub fn save_document() -> Result<String, JsValue> {
    wasm_info!("saveDocument called");
    with_session(|session| {
        serde_json::to_string(&session.document).map_err(|e| {
            wasm_error!("Document serialize error: {}", e);
            JsValue::from_str(&format!("Document serialize error: {}", e))
        })
    })
}

/// Header accessor: gender and race selections
#[wasm_bindgen(js_name = getHeader)]
pub fn get_header() -> Result<JsValue, JsValue> {
    with_session(|session| serialize(&session.document.header, "Serialization error"))
}

#[wasm_bindgen(js_name = setHeader)]
pub fn set_header(gender: u8, race: u8) -> Result<(), JsValue> {
    crate::api::helpers::validate_gender(gender).map_err(validation_error)?;
    crate::api::helpers::validate_race(race).map_err(validation_error)?;
    with_session(|session| {
        session.document.header.gender = gender;
        session.document.header.race = race;
        Ok(())
    })
}

/// Relabel one collection tree
///
/// Returns the flat pre-order node list (handle, depth, label, image,
/// preview) the view renders from.
#[wasm_bindgen(js_name = getProjection)]
pub fn get_projection(kind: JsValue) -> Result<JsValue, JsValue> {
    let kind: CollectionKind = deserialize(kind, "Invalid collection kind")?;
    with_session(|session| {
        let nodes = projection::project(&session.document, &session.render_cache, kind);
        serialize(&nodes, "Serialization error")
    })
}

/// Add a zero-valued record of `kind` at the placement-computed position
#[wasm_bindgen(js_name = requestAdd)]
pub fn request_add(
    kind: JsValue,
    placement: JsValue,
    anchor: JsValue,
) -> Result<JsValue, JsValue> {
    let kind: RecordKind = deserialize(kind, "Invalid record kind")?;
    let placement: Placement = deserialize(placement, "Invalid placement")?;
    let anchor: Option<EntryRef> = if anchor.is_null() || anchor.is_undefined() {
        None
    } else {
        Some(deserialize(anchor, "Invalid anchor handle")?)
    };
    wasm_info!("requestAdd called: {:?} {:?}", kind, placement);
    apply_request(EditRequest::Add {
        kind,
        placement,
        anchor,
    })
}

/// Add a part into a named slot of the anchored part set
#[wasm_bindgen(js_name = requestAddPart)]
pub fn request_add_part(anchor: JsValue, slot: JsValue) -> Result<JsValue, JsValue> {
    let anchor: EntryRef = deserialize(anchor, "Invalid anchor handle")?;
    let slot: PartSlot = deserialize(slot, "Invalid part slot")?;
    wasm_info!("requestAddPart called: {:?}", slot);
    apply_request(EditRequest::AddPart { anchor, slot })
}

/// Delete the topmost records of a multi-selection, best-effort
#[wasm_bindgen(js_name = requestDeleteBatch)]
pub fn request_delete_batch(handles: JsValue) -> Result<JsValue, JsValue> {
    let handles: Vec<EntryRef> = deserialize(handles, "Invalid selection handles")?;
    wasm_info!("requestDeleteBatch called: {} handle(s)", handles.len());
    apply_request(EditRequest::DeleteBatch { handles })
}

/// Apply a named-field edit to one record
#[wasm_bindgen(js_name = requestFieldEdit)]
pub fn request_field_edit(
    handle: JsValue,
    field: &str,
    value: JsValue,
) -> Result<JsValue, JsValue> {
    let handle: EntryRef = deserialize(handle, "Invalid handle")?;
    let value: FieldValue = deserialize(value, "Invalid field value")?;
    apply_request(EditRequest::FieldEdit {
        handle,
        field: field.to_string(),
        value,
    })
}

/// Copy the selected records into the session clipboard
#[wasm_bindgen(js_name = requestCopy)]
pub fn request_copy(handles: JsValue) -> Result<JsValue, JsValue> {
    let handles: Vec<EntryRef> = deserialize(handles, "Invalid selection handles")?;
    wasm_info!("requestCopy called: {} handle(s)", handles.len());
    apply_request(EditRequest::Copy { handles })
}

/// Paste the session clipboard over the selected records
#[wasm_bindgen(js_name = requestPaste)]
pub fn request_paste(handles: JsValue) -> Result<JsValue, JsValue> {
    let handles: Vec<EntryRef> = deserialize(handles, "Invalid selection handles")?;
    wasm_info!("requestPaste called: {} handle(s)", handles.len());
    apply_request(EditRequest::Paste { handles })
}

/// Load one record for the detail form
#[wasm_bindgen(js_name = requestSelect)]
pub fn request_select(handle: JsValue) -> Result<JsValue, JsValue> {
    let handle: EntryRef = deserialize(handle, "Invalid handle")?;
    apply_request(EditRequest::Select { handle })
}

/// What the clipboard currently holds, for enabling paste affordances
#[wasm_bindgen(js_name = clipboardInfo)]
pub fn clipboard_info() -> Result<JsValue, JsValue> {
    with_session(|session| {
        let info = session.clipboard.as_ref().map(|batch| ClipboardInfo {
            kind: batch.kind(),
            count: batch.len(),
            is_list_batch: matches!(batch, ClipboardBatch::Lists { .. }),
        });
        serialize(&info, "Serialization error")
    })
}

/// DYT option vocabulary for the detail form, as (label, value) pairs
///
/// Parts and physics objects carry slightly different vocabularies; the
/// values are fixed bit patterns of the format.
#[wasm_bindgen(js_name = dytOptions)]
pub fn dyt_options(kind: JsValue) -> Result<JsValue, JsValue> {
    let kind: RecordKind = deserialize(kind, "Invalid record kind")?;
    match kind {
        RecordKind::Part => serialize(&crate::models::PART_DYT_OPTIONS, "Serialization error"),
        RecordKind::Physics => {
            serialize(&crate::models::PHYSICS_DYT_OPTIONS, "Serialization error")
        }
        other => Err(validation_error(format!(
            "{} records have no DYT options",
            other.readable_name()
        ))),
    }
}

/// Part-hiding flag vocabulary, as (label, bit) pairs
#[wasm_bindgen(js_name = partHidingFlags)]
pub fn part_hiding_flags() -> Result<JsValue, JsValue> {
    serialize(&crate::models::PART_HIDING_FLAGS, "Serialization error")
}

/// Searchable field names for a record kind, in dialog order
#[wasm_bindgen(js_name = searchableFields)]
pub fn searchable_fields(kind: JsValue) -> Result<js_sys::Array, JsValue> {
    let kind: RecordKind = deserialize(kind, "Invalid record kind")?;
    let result = js_sys::Array::new();
    for field in search::searchable_fields(kind) {
        result.push(&JsValue::from_str(field));
    }
    Ok(result)
}

/// Find the next record matching a field value, wrapping around
#[wasm_bindgen(js_name = findNext)]
pub fn find_next(
    after: JsValue,
    kind: JsValue,
    field: &str,
    value: JsValue,
) -> Result<JsValue, JsValue> {
    let kind: RecordKind = deserialize(kind, "Invalid record kind")?;
    let after: Option<EntryRef> = if after.is_null() || after.is_undefined() {
        None
    } else {
        Some(deserialize(after, "Invalid anchor handle")?)
    };
    let value: Option<FieldValue> = if value.is_null() || value.is_undefined() {
        None
    } else {
        Some(deserialize(value, "Invalid search value")?)
    };
    with_session(|session| {
        let found = search::find_next(&session.document, after, kind, field, value.as_ref());
        serialize(&found, "Serialization error")
    })
}

/// Replace a field value across every record of a kind
///
/// Returns the replace report (replaced count, skipped count, skipped
/// selector pairs for the part-color warning).
#[wasm_bindgen(js_name = replaceAll)]
pub fn replace_all(
    kind: JsValue,
    field: &str,
    find: JsValue,
    replace: JsValue,
) -> Result<JsValue, JsValue> {
    let kind: RecordKind = deserialize(kind, "Invalid record kind")?;
    let find: FieldValue = deserialize(find, "Invalid find value")?;
    let replace: FieldValue = deserialize(replace, "Invalid replace value")?;
    wasm_info!("replaceAll called: {:?}.{}", kind, field);
    with_session(|session| {
        let report = search::replace_all(
            &mut session.document,
            &session.render_cache,
            kind,
            field,
            &find,
            &replace,
        );
        serialize(&report, "Serialization error")
    })
}

//! Save/load of the durable conversation state.
//!
//! Only the conversation partner, the state flags and the important-topic
//! memory are saved. Choices, the spoken line and a queued end are transient.
//! Reading is forgiving: every field that is missing or malformed falls back
//! to its default on its own.

use std::collections::BTreeSet;

use pv_core::{ActorId, SlotIndex, TopicId};
use pv_save::{SaveSlots, Storage};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DialogResult;
use crate::manager::DialogManager;

/// Version written into new conversation documents.
pub const FORMAT_VERSION: u32 = 1;

/// The conversation state as stored in `dialogmanager.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogDocument {
    /// Format version, see [`FORMAT_VERSION`].
    pub version: u32,
    /// Conversation partner, if any.
    pub target: Option<ActorId>,
    /// Menu or automatic flow engaged when saved.
    pub dialog_active: bool,
    /// Line being spoken when saved.
    pub talking: bool,
    /// Sub-menu open when saved.
    pub sub_dialog_active: bool,
    /// Important topics already played.
    pub important_known: BTreeSet<TopicId>,
}

impl Default for DialogDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            target: None,
            dialog_active: false,
            talking: false,
            sub_dialog_active: false,
            important_known: BTreeSet::new(),
        }
    }
}

impl DialogDocument {
    /// Read a document, recovering field by field.
    ///
    /// A document without a version is taken as current. A document from
    /// another version keeps its partner and flags but loses the important
    /// topics, since topic names may have changed with the content.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            tracing::warn!("Conversation document is not an object, using defaults");
            return Self::default();
        };

        let version = field(map, "version", |v| {
            v.as_u64().and_then(|n| u32::try_from(n).ok())
        })
        .unwrap_or(FORMAT_VERSION);
        let target = field(map, "target", |v| match v {
            Value::Null => Some(None),
            other => serde_json::from_value::<ActorId>(other.clone()).ok().map(Some),
        })
        .flatten();
        let mut important_known = field(map, "importantKnown", |v| {
            v.as_array().map(|items| topic_set(items))
        })
        .unwrap_or_default();

        if version != FORMAT_VERSION && !important_known.is_empty() {
            tracing::warn!(
                version,
                expected = FORMAT_VERSION,
                dropped = important_known.len(),
                "Conversation document version mismatch, forgetting important topics"
            );
            important_known.clear();
        }

        Self {
            version,
            target,
            dialog_active: flag(map, "dialogActive"),
            talking: flag(map, "talking"),
            sub_dialog_active: flag(map, "subDialogActive"),
            important_known,
        }
    }

    /// Encode as a JSON value.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

fn field<T>(map: &Map<String, Value>, key: &str, parse: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
    let Some(value) = map.get(key) else {
        tracing::debug!(field = key, "Conversation document field missing");
        return None;
    };
    let parsed = parse(value);
    if parsed.is_none() {
        tracing::warn!(field = key, value = %value, "Malformed conversation document field");
    }
    parsed
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    field(map, key, Value::as_bool).unwrap_or(false)
}

fn topic_set(items: &[Value]) -> BTreeSet<TopicId> {
    items
        .iter()
        .filter_map(|item| match item.as_str() {
            Some(name) => Some(TopicId::new(name)),
            None => {
                tracing::warn!(value = %item, "Skipping malformed important topic");
                None
            }
        })
        .collect()
}

impl DialogManager {
    /// Write the conversation document into `slot`.
    pub fn store_in_slot<S: Storage>(&self, slots: &mut SaveSlots<S>, slot: SlotIndex) -> DialogResult<()> {
        let doc = self.export_document().to_value()?;
        slots.write_dialog_manager(slot, &doc)?;
        Ok(())
    }

    /// Restore the conversation document from `slot`.
    ///
    /// Returns `false`, leaving the manager untouched, when the slot holds no
    /// readable document.
    pub fn restore_from_slot<S: Storage>(&mut self, slots: &SaveSlots<S>, slot: SlotIndex) -> bool {
        match slots.read_dialog_manager(slot) {
            Some(value) => {
                self.import_document(&DialogDocument::from_value(&value));
                true
            }
            None => {
                tracing::debug!(slot = %slot, "No conversation document in slot");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessUi;
    use pv_save::MemoryStorage;
    use serde_json::json;

    fn document() -> DialogDocument {
        DialogDocument {
            target: Some(ActorId::from_u128(7)),
            sub_dialog_active: true,
            important_known: [TopicId::new("DIA_Diego_Hello"), TopicId::new("DIA_Diego_Gold")]
                .into_iter()
                .collect(),
            ..DialogDocument::default()
        }
    }

    fn manager() -> DialogManager {
        DialogManager::new(ActorId::from_u128(100), Box::new(HeadlessUi::new()))
    }

    #[test]
    fn document_layout() {
        let json = serde_json::to_string_pretty(&document()).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "version": 1,
          "target": "00000000-0000-0000-0000-000000000007",
          "dialogActive": false,
          "talking": false,
          "subDialogActive": true,
          "importantKnown": [
            "DIA_Diego_Gold",
            "DIA_Diego_Hello"
          ]
        }
        "#);
    }

    #[test]
    fn read_back_written_document() {
        let doc = document();
        assert_eq!(DialogDocument::from_value(&doc.to_value().unwrap()), doc);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let doc = DialogDocument::from_value(&json!({ "talking": true }));
        assert_eq!(doc.version, FORMAT_VERSION);
        assert_eq!(doc.target, None);
        assert!(doc.talking);
        assert!(!doc.dialog_active);
        assert!(doc.important_known.is_empty());
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let doc = DialogDocument::from_value(&json!({
            "target": "not-a-uuid",
            "dialogActive": "yes",
            "subDialogActive": true,
            "importantKnown": ["DIA_Diego_Hello", 42, null],
        }));
        assert_eq!(doc.target, None);
        assert!(!doc.dialog_active);
        assert!(doc.sub_dialog_active);
        assert_eq!(
            doc.important_known.into_iter().collect::<Vec<_>>(),
            vec![TopicId::new("DIA_Diego_Hello")]
        );
    }

    #[test]
    fn non_object_document_is_default() {
        assert_eq!(DialogDocument::from_value(&json!([1, 2])), DialogDocument::default());
        assert_eq!(DialogDocument::from_value(&Value::Null), DialogDocument::default());
    }

    #[test]
    fn version_mismatch_forgets_topics() {
        let doc = DialogDocument::from_value(&json!({
            "version": 0,
            "target": "00000000-0000-0000-0000-000000000007",
            "subDialogActive": true,
            "importantKnown": ["DIA_Diego_Hello"],
        }));
        assert_eq!(doc.version, 0);
        assert_eq!(doc.target, Some(ActorId::from_u128(7)));
        assert!(doc.sub_dialog_active);
        assert!(doc.important_known.is_empty());
    }

    #[test]
    fn slot_round_trip() {
        let mut slots = SaveSlots::new(MemoryStorage::new(), 4);
        let slot = SlotIndex(1);

        let mut dialog = manager();
        dialog.import_document(&document());
        dialog.store_in_slot(&mut slots, slot).unwrap();

        let mut restored = manager();
        assert!(restored.restore_from_slot(&slots, slot));
        assert_eq!(restored.export_document(), document());
        assert_eq!(restored.important_known().owner(), Some(ActorId::from_u128(7)));
    }

    #[test]
    fn restore_forces_idle() {
        let mut slots = SaveSlots::new(MemoryStorage::new(), 4);
        let slot = SlotIndex(0);
        slots
            .write_dialog_manager(slot, &json!({ "dialogActive": true, "talking": true }))
            .unwrap();

        let mut dialog = manager();
        assert!(dialog.restore_from_slot(&slots, slot));
        assert!(!dialog.is_dialog_active());
        assert!(!dialog.is_talking());
    }

    #[test]
    fn restore_from_empty_slot() {
        let slots = SaveSlots::new(MemoryStorage::new(), 4);
        let mut dialog = manager();
        assert!(!dialog.restore_from_slot(&slots, SlotIndex(0)));
    }

    #[test]
    fn store_reports_write_failure() {
        let mut storage = MemoryStorage::new();
        storage.set_read_only(true);
        let mut slots = SaveSlots::new(storage, 4);

        let err = manager().store_in_slot(&mut slots, SlotIndex(0)).unwrap_err();
        assert!(matches!(err, crate::DialogError::Save(_)));
    }
}

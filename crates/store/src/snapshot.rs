//! Draft snapshots
//!
//! A snapshot is the text-only form of a draft: the same fields, with every
//! photo payload base64-encoded next to its file name. Both directions
//! tolerate bad photos: an unreadable photo is left out of the snapshot, and
//! an undecodable entry is left out of the restored draft, each with a
//! warning, so one broken attachment never costs the whole report.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use report_model::{Draft, Participant, Photo, Section};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Snapshot layout version written by this crate
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Calendar format of `visit_date`
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors decoding a snapshot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Invalid visit date {0:?}")]
    InvalidDate(String),
}

/// Serialized draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSnapshot {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_version"
    )]
    pub format_version: Option<u32>,
    #[serde(deserialize_with = "lenient_string")]
    pub client_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(deserialize_with = "lenient_string")]
    pub technician: String,
    /// ISO 8601 calendar date
    #[serde(deserialize_with = "lenient_string")]
    pub visit_date: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub participants: Vec<ParticipantSnapshot>,
    #[serde(deserialize_with = "null_as_empty")]
    pub sections: Vec<SectionSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantSnapshot {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSnapshot {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub photos: Vec<PhotoSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSnapshot {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    /// Base64 (standard alphabet) payload
    #[serde(deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub media_type: Option<String>,
}

/// Strings that are null or of another type read as empty. Numbers keep
/// their digits so a numeric date still reaches the date policy.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Value::deserialize(deserializer)?
        .as_u64()
        .and_then(|v| u32::try_from(v).ok()))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A photo left out while encoding or decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAttachment {
    pub section: usize,
    pub photo: usize,
    pub name: String,
    pub reason: String,
}

/// What to do with a visit date that does not parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// Use today's date and report it in [`Decoded::date_defaulted`]
    #[default]
    FallbackToToday,
    /// Fail the decode
    Strict,
}

/// Result of [`encode`]
#[derive(Debug, Clone)]
pub struct Encoded {
    pub snapshot: DraftSnapshot,
    pub skipped: Vec<SkippedAttachment>,
}

/// Result of [`decode`]
#[derive(Debug, Clone)]
pub struct Decoded {
    pub draft: Draft,
    pub skipped: Vec<SkippedAttachment>,
    /// The stored date was missing or invalid and today's date was used
    pub date_defaulted: bool,
}

/// Build the snapshot of `draft`. The draft itself is not modified.
pub fn encode(draft: &Draft) -> Encoded {
    let mut skipped = Vec::new();

    let sections = draft
        .sections()
        .iter()
        .enumerate()
        .map(|(section_index, section)| SectionSnapshot {
            title: section.title.clone(),
            description: section.description.clone(),
            photos: section
                .photos
                .iter()
                .enumerate()
                .filter_map(|(photo_index, photo)| match photo.read_bytes() {
                    Ok(bytes) => Some(PhotoSnapshot {
                        name: photo.name.clone(),
                        content: STANDARD.encode(&bytes),
                        media_type: Some(photo.media_type.clone()),
                    }),
                    Err(e) => {
                        tracing::warn!("Leaving photo {} out of the snapshot: {}", photo.name, e);
                        skipped.push(SkippedAttachment {
                            section: section_index,
                            photo: photo_index,
                            name: photo.name.clone(),
                            reason: e.to_string(),
                        });
                        None
                    }
                })
                .collect(),
        })
        .collect();

    let snapshot = DraftSnapshot {
        format_version: Some(SNAPSHOT_FORMAT_VERSION),
        client_name: draft.client_name.clone(),
        address: draft.site_address.clone(),
        technician: draft.technician.clone(),
        visit_date: draft.visit_date.format(DATE_FORMAT).to_string(),
        participants: draft
            .participants()
            .iter()
            .map(|p| ParticipantSnapshot {
                name: p.name.clone(),
                phone: p.phone.clone(),
                email: p.email.clone(),
            })
            .collect(),
        sections,
    };

    Encoded { snapshot, skipped }
}

/// Rebuild a draft from `snapshot`.
///
/// `today` is used when the visit date is missing or invalid and the policy
/// allows it. Undecodable photo entries are skipped.
pub fn decode(
    snapshot: &DraftSnapshot,
    policy: DatePolicy,
    today: NaiveDate,
) -> Result<Decoded, SnapshotError> {
    let (visit_date, date_defaulted) = match parse_date(&snapshot.visit_date) {
        Some(date) => (date, false),
        None if policy == DatePolicy::Strict => {
            return Err(SnapshotError::InvalidDate(snapshot.visit_date.clone()));
        }
        None => {
            tracing::warn!(
                "Visit date {:?} could not be read, using {}",
                snapshot.visit_date,
                today
            );
            (today, true)
        }
    };

    let mut draft = Draft::new(visit_date);
    draft.client_name = snapshot.client_name.clone();
    draft.site_address = snapshot.address.clone();
    draft.technician = snapshot.technician.clone();

    for p in &snapshot.participants {
        draft.push_participant(Participant::new(&p.name, &p.phone, &p.email));
    }

    let mut skipped = Vec::new();
    for (section_index, s) in snapshot.sections.iter().enumerate() {
        let mut section = Section::new(&s.title, &s.description);
        for (photo_index, entry) in s.photos.iter().enumerate() {
            match decode_photo(entry) {
                Ok(photo) => section.photos.push(photo),
                Err(reason) => {
                    tracing::warn!("Skipping photo {} while restoring: {}", entry.name, reason);
                    skipped.push(SkippedAttachment {
                        section: section_index,
                        photo: photo_index,
                        name: entry.name.clone(),
                        reason,
                    });
                }
            }
        }
        draft.push_section(section);
    }

    Ok(Decoded {
        draft,
        skipped,
        date_defaulted,
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

fn decode_photo(entry: &PhotoSnapshot) -> Result<Photo, String> {
    // Some encoders wrap long base64 lines
    let compact: String = entry.content.split_whitespace().collect();
    let bytes = STANDARD.decode(compact).map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("empty payload".to_string());
    }
    let photo = Photo::from_bytes(&entry.name, bytes);
    Ok(match &entry.media_type {
        Some(media_type) if !media_type.trim().is_empty() => photo.with_media_type(media_type),
        _ => photo,
    })
}

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// The json document carried by the status response packet
///
/// Conformance varies wildly between server implementations so every field is optional and any field
/// holding an unexpected type degrades to its default rather than failing the whole document.
/// The document itself must be an object, anything else is a protocol violation.
#[derive(Deserialize, Debug, Default)]
#[serde(try_from = "Map<String, Value>")]
pub struct StatusResponse {
    pub version: VersionInfo,
    pub players: PlayerInfo,
    pub description: Value,
}

impl TryFrom<Map<String, Value>> for StatusResponse {
    type Error = serde_json::Error;

    fn try_from(mut doc: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(StatusResponse {
            version: doc
                .remove("version")
                .and_then(|version| serde_json::from_value(version).ok())
                .unwrap_or_default(),
            players: doc
                .remove("players")
                .and_then(|players| serde_json::from_value(players).ok())
                .unwrap_or_default(),
            description: doc.remove("description").unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct VersionInfo {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct PlayerInfo {
    #[serde(deserialize_with = "lenient_count")]
    pub online: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub max: u32,
    #[serde(deserialize_with = "lenient_sample")]
    pub sample: Vec<PlayerSample>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct PlayerSample {
    pub name: String,
    #[serde(default)]
    pub id: String,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .map(|n| n.min(u32::MAX as u64) as u32)
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.min(u32::MAX as f64) as u32)
            })
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn lenient_sample<'de, D>(deserializer: D) -> Result<Vec<PlayerSample>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Flattens a `description` into plain text
///
/// A bare string is used as is. An object contributes its `text` followed by every entry of its `extra`
/// array in order, entries may themselves be strings, scalars or nested objects. Any other shape is `""`.
pub fn motd_from_description(description: &Value) -> String {
    let mut motd = String::new();
    match description {
        Value::String(text) => motd.push_str(text),
        Value::Object(_) => push_component(description, &mut motd),
        _ => (),
    }
    motd
}

fn push_component(component: &Value, out: &mut String) {
    match component {
        Value::String(text) => out.push_str(text),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Object(map) => {
            if let Some(text) = map.get("text").filter(|text| !text.is_object()) {
                push_component(text, out);
            }
            if let Some(Value::Array(extra)) = map.get("extra") {
                extra.iter().for_each(|child| push_component(child, out));
            }
        }
        Value::Null | Value::Array(_) => (),
    }
}

/// Summary of one probe, this is what the launcher front end consumes
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub online: bool,
    pub players: u32,
    pub max: u32,
    pub motd: String,
    pub version: String,
    pub sample: Vec<PlayerSample>,
}

impl ServerStatus {
    /// Result of every failed probe
    #[inline]
    pub fn offline() -> Self {
        Self::default()
    }
}

impl From<StatusResponse> for ServerStatus {
    fn from(response: StatusResponse) -> Self {
        ServerStatus {
            online: true,
            players: response.players.online,
            max: response.players.max,
            motd: motd_from_description(&response.description),
            version: response.version.name,
            sample: response.players.sample,
        }
    }
}

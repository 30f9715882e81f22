//! Wire message model for delve query streams
//!
//! Parses newline-delimited `[kind, payload]` JSON messages from a query
//! execution into the closed [`Message`] sum type consumed by the renderer.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// One message from a query execution stream.
///
/// The set of kinds is closed: anything else on the wire is dropped at the
/// decode boundary and never reaches the render loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A result node with its properties and tags.
    Node(NodeData),
    /// A batch of node edits, rendered as progress marks.
    NodeEdits(EditSummary),
    /// Execution statistics for a finished query.
    Fini(Stats),
    /// Free-form text emitted by the query itself.
    Print(PrintInfo),
    /// A non-fatal warning from the server.
    Warn(WarnInfo),
    /// An error report; `BadSyntax` errors carry source position info.
    Err(ErrInfo),
}

/// A single result node: typed identity plus properties and tags.
///
/// All values are display-ready strings; the server renders them when the
/// request carries `repr: true`. Missing wire fields decode to empty
/// collections so rendering never has to special-case absence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    /// Form (type) name, e.g. `inet:ipv4`.
    pub form: String,
    /// Rendered primary value.
    pub valu: String,
    /// Property name to rendered value; iteration order is lexicographic.
    pub props: BTreeMap<String, String>,
    /// Tag name to optional rendered value; iteration order is lexicographic.
    pub tags: BTreeMap<String, Option<String>>,
    /// Tag name to (property, value) pairs, in wire order.
    pub tagprops: BTreeMap<String, Vec<(String, String)>>,
}

/// Summary of a batch of node edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSummary {
    /// Edit groups; the rendered progress count sums their change lists.
    pub edits: Vec<EditGroup>,
}

impl EditSummary {
    /// Total number of individual changes across all groups.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.edits.iter().map(|group| group.changes.len()).sum()
    }
}

/// One group of edits applied to a single node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditGroup {
    /// Individual changes; opaque to the client, only their count matters.
    pub changes: Vec<Value>,
}

/// Execution statistics carried by a `fini` message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Elapsed wall time in milliseconds.
    pub took: u64,
    /// Number of nodes produced.
    pub count: u64,
}

/// Payload of a `print` message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintInfo {
    /// The text to print.
    pub mesg: String,
}

/// Payload of a `warn` message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarnInfo {
    /// Human-readable warning text.
    pub mesg: String,
    /// Any remaining payload fields, rendered as `key=value` after the text.
    pub extra: BTreeMap<String, Value>,
}

/// Payload of an `err` message.
///
/// The recognized positional fields are extracted at decode time; a
/// `BadSyntax` error with all three present gets the caret display and ends
/// the render loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrInfo {
    /// Error kind, e.g. `BadSyntax`.
    pub kind: String,
    /// Human-readable message, when the server provided one.
    pub mesg: Option<String>,
    /// Character offset of the problem within `text`.
    pub at: Option<usize>,
    /// The query text the error refers to.
    pub text: Option<String>,
}

/// A pull-based source of protocol messages.
///
/// `Ok(Some)` yields the next message in generation order, `Ok(None)` is the
/// normal end of the stream, and `Err` is a transport fault: the stream
/// failed underneath the client and can produce no further messages.
#[allow(async_fn_in_trait)]
pub trait MessageSource {
    /// Pull the next message, suspending until one is available.
    async fn next_message(&mut self) -> Result<Option<Message>>;
}

/// Parse one wire line into a [`Message`].
///
/// Returns `Ok(None)` for blank lines and for message kinds this client does
/// not render (dropped with a debug log). Returns an error when the line is
/// not a well-formed `[kind, payload]` JSON array — garbage on the stream
/// means the transport can no longer be trusted.
pub fn parse_message(line: &str) -> Result<Option<Message>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(line).context("Failed to parse message line as JSON")?;
    let Some(parts) = value.as_array() else {
        bail!("Malformed message: expected a [kind, payload] array");
    };
    let Some(kind) = parts.first().and_then(Value::as_str) else {
        bail!("Malformed message: missing kind tag");
    };
    let null = Value::Null;
    let payload = parts.get(1).unwrap_or(&null);

    let mesg = match kind {
        "node" => Message::Node(parse_node(payload)),
        "node:edits" => Message::NodeEdits(parse_edits(payload)),
        "fini" => Message::Fini(parse_fini(payload)),
        "print" => Message::Print(parse_print(payload)),
        "warn" => Message::Warn(parse_warn(payload)),
        "err" => Message::Err(parse_err(payload)?),
        other => {
            log::debug!("dropping unhandled message kind: {other}");
            return Ok(None);
        }
    };

    Ok(Some(mesg))
}

/// Render a JSON value for display: strings bare, everything else as
/// compact JSON.
#[must_use]
pub(crate) fn value_repr(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn string_field(payload: &Value, name: &str) -> String {
    payload
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn count_field(payload: &Value, name: &str) -> u64 {
    payload.get(name).and_then(Value::as_u64).unwrap_or(0)
}

fn parse_node(payload: &Value) -> NodeData {
    let props = payload
        .get("props")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, valu)| (name.clone(), value_repr(valu)))
                .collect()
        })
        .unwrap_or_default();

    // A null or empty tag value means the tag is present without a value.
    let tags = payload
        .get("tags")
        .and_then(Value::as_object)
        .map(|tags| {
            tags.iter()
                .map(|(tag, valu)| {
                    let valu = match valu {
                        Value::Null => None,
                        Value::String(text) if text.is_empty() => None,
                        other => Some(value_repr(other)),
                    };
                    (tag.clone(), valu)
                })
                .collect()
        })
        .unwrap_or_default();

    let tagprops = payload
        .get("tagprops")
        .and_then(Value::as_object)
        .map(|tagprops| {
            tagprops
                .iter()
                .map(|(tag, pairs)| (tag.clone(), parse_tagprop_pairs(pairs)))
                .collect()
        })
        .unwrap_or_default();

    NodeData {
        form: string_field(payload, "form"),
        valu: string_field(payload, "valu"),
        props,
        tags,
        tagprops,
    }
}

fn parse_tagprop_pairs(pairs: &Value) -> Vec<(String, String)> {
    pairs
        .as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| {
                    let pair = pair.as_array()?;
                    let prop = pair.first()?.as_str()?.to_string();
                    let valu = value_repr(pair.get(1)?);
                    Some((prop, valu))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_edits(payload: &Value) -> EditSummary {
    let edits = payload
        .get("edits")
        .and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .map(|group| EditGroup {
                    changes: group
                        .get("changes")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    EditSummary { edits }
}

fn parse_fini(payload: &Value) -> Stats {
    Stats {
        took: count_field(payload, "took"),
        count: count_field(payload, "count"),
    }
}

fn parse_print(payload: &Value) -> PrintInfo {
    PrintInfo {
        mesg: string_field(payload, "mesg"),
    }
}

fn parse_warn(payload: &Value) -> WarnInfo {
    let extra = payload
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter(|(name, _)| name.as_str() != "mesg")
                .map(|(name, valu)| (name.clone(), valu.clone()))
                .collect()
        })
        .unwrap_or_default();

    WarnInfo {
        mesg: string_field(payload, "mesg"),
        extra,
    }
}

fn parse_err(payload: &Value) -> Result<ErrInfo> {
    let Some(parts) = payload.as_array() else {
        bail!("Malformed err message: expected a [kind, fields] pair");
    };
    let Some(kind) = parts.first().and_then(Value::as_str) else {
        bail!("Malformed err message: missing error kind");
    };
    let fields = parts.get(1).unwrap_or(&Value::Null);

    Ok(ErrInfo {
        kind: kind.to_string(),
        mesg: fields
            .get("mesg")
            .and_then(Value::as_str)
            .map(String::from),
        at: fields
            .get("at")
            .and_then(Value::as_u64)
            .and_then(|at| usize::try_from(at).ok()),
        text: fields
            .get("text")
            .and_then(Value::as_str)
            .map(String::from),
    })
}

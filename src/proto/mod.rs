//! Query protocol: wire messages and the TCP client
//!
//! A query execution is a newline-delimited stream of JSON arrays, each of
//! the form `[kind, payload]`. [`message`] decodes single lines into the
//! [`Message`] sum type and [`client`] drives a real server connection;
//! everything downstream consumes the [`MessageSource`] trait, so the
//! renderer never sees bytes.

pub mod client;
pub mod message;

pub use client::{Client, QueryRequest, QueryStream};
pub use message::{
    parse_message, EditGroup, EditSummary, ErrInfo, Message, MessageSource, NodeData, PrintInfo,
    Stats, WarnInfo,
};

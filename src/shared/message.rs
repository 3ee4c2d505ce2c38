/**
 * Socket Message Codec
 *
 * This module defines the text frames exchanged over the notification
 * socket. A frame is a method token and a body separated by a blank line:
 *
 * ```text
 * SUBSCRIBE\n\n/api/instance
 * ```
 *
 * Clients send `SUBSCRIBE` and `DESUB`. The server answers with `OK`,
 * `BAD` (echoing the offending payload) and pushes `UPDATE` frames whose
 * body names the topic that changed.
 *
 * The codec is shared between server and test clients, so it has no
 * dependency on the web framework.
 */
use std::fmt;
use thiserror::Error;

/// Separator between the method token and the body
pub const SEPARATOR: &str = "\n\n";

/// A method token that can appear at the start of a frame
///
/// Each direction of the protocol has its own closed set of methods.
/// Matching is case-sensitive.
pub trait Method: Sized + Copy {
    /// Wire token for this method
    fn as_str(&self) -> &'static str;

    /// Parse a wire token, returning `None` for anything unknown
    fn parse(token: &str) -> Option<Self>;
}

/// Methods a client may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientMethod {
    /// Add the body topic to the session's subscriptions
    Subscribe,
    /// Remove the body topic from the session's subscriptions
    Unsubscribe,
}

impl Method for ClientMethod {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "DESUB",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "SUBSCRIBE" => Some(Self::Subscribe),
            "DESUB" => Some(Self::Unsubscribe),
            _ => None,
        }
    }
}

/// Methods the server may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerMethod {
    /// The previous client frame was applied
    Ok,
    /// The previous client frame was rejected; body is the original payload
    Bad,
    /// The topic in the body changed and should be re-fetched
    Update,
}

impl Method for ServerMethod {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Bad => "BAD",
            Self::Update => "UPDATE",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "OK" => Some(Self::Ok),
            "BAD" => Some(Self::Bad),
            "UPDATE" => Some(Self::Update),
            _ => None,
        }
    }
}

/// Reasons a frame cannot be decoded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty payload")]
    Empty,

    #[error("missing method separator")]
    MissingSeparator,

    #[error("unknown method '{0}'")]
    UnknownMethod(String),
}

/// One decoded socket frame
///
/// # Example
///
/// ```rust
/// use yamba_management::shared::message::{ClientMessage, ClientMethod};
///
/// let message = ClientMessage::decode("SUBSCRIBE\n\n/api/user").unwrap();
/// assert_eq!(message.method, ClientMethod::Subscribe);
/// assert_eq!(message.body, "/api/user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketMessage<M> {
    pub method: M,
    pub body: String,
}

/// Frame sent by a client
pub type ClientMessage = SocketMessage<ClientMethod>;

/// Frame sent by the server
pub type ServerMessage = SocketMessage<ServerMethod>;

impl<M: Method> SocketMessage<M> {
    pub fn new(method: M, body: impl Into<String>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }

    /// Decode a raw text payload
    ///
    /// Only the first separator splits the frame, so the body may itself
    /// contain blank lines. An absent body decodes as the empty string.
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::Empty);
        }

        let (token, body) = payload
            .split_once(SEPARATOR)
            .ok_or(DecodeError::MissingSeparator)?;

        let method =
            M::parse(token).ok_or_else(|| DecodeError::UnknownMethod(token.to_string()))?;

        Ok(Self {
            method,
            body: body.to_string(),
        })
    }

    /// Encode as `METHOD\n\nbody`
    pub fn encode(&self) -> String {
        let method = self.method.as_str();
        let mut frame = String::with_capacity(method.len() + SEPARATOR.len() + self.body.len());
        frame.push_str(method);
        frame.push_str(SEPARATOR);
        frame.push_str(&self.body);
        frame
    }
}

impl<M: Method> fmt::Display for SocketMessage<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl ClientMessage {
    pub fn subscribe(topic: impl Into<String>) -> Self {
        Self::new(ClientMethod::Subscribe, topic)
    }

    pub fn unsubscribe(topic: impl Into<String>) -> Self {
        Self::new(ClientMethod::Unsubscribe, topic)
    }
}

impl ServerMessage {
    pub fn ok() -> Self {
        Self::new(ServerMethod::Ok, "")
    }

    /// Rejection echoing the payload that could not be handled
    pub fn bad(payload: impl Into<String>) -> Self {
        Self::new(ServerMethod::Bad, payload)
    }

    pub fn update(topic: impl Into<String>) -> Self {
        Self::new(ServerMethod::Update, topic)
    }
}

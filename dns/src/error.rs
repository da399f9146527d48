use std::io;
use thiserror::Error;

/// A query name that cannot be put on the wire.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum EncodeError {
    #[error("label '{label}' is {len} octets long, at most 63 are allowed")]
    LabelTooLong { label: String, len: usize },
    #[error("domain name '{0}' contains an empty label")]
    EmptyLabel(String),
    #[error("domain name '{name}' takes {len} octets on the wire, at most 255 are allowed")]
    NameTooLong { name: String, len: usize },
}

/// The response is malformed or does not answer the request.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("the server does not support recursive queries")]
    UnsupportedRecursion,
    #[error("response id {found:#06x} does not match request id {expected:#06x}")]
    IdMismatch { expected: u16, found: u16 },
    #[error("response carries {0} questions, expected exactly 1")]
    UnexpectedQuestionCount(u16),
    #[error("unexpected record class {0}, only IN (1) is accepted")]
    UnexpectedClass(u16),
    #[error("unsupported record type {0}")]
    UnsupportedRecordType(u16),
    #[error("malformed name compression pointer at offset {offset}")]
    MalformedCompression { offset: usize },
    #[error("reserved label type at offset {offset}")]
    BadLabelType { offset: usize },
    #[error("record of type {rtype} has an invalid RDATA length {len}")]
    BadRdataLength { rtype: u16, len: u16 },
    #[error("response ended unexpectedly")]
    Truncated(#[from] io::Error),
}

impl ProtocolError {
    pub(crate) fn truncated() -> Self {
        ProtocolError::Truncated(io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

/// Fault codes reported by the server in RCODE.
///
/// NameError (RCODE 3) is deliberately absent: a missing domain is a regular
/// negative answer, see [`crate::ResponseMessage::is_not_found`].
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum ServerError {
    #[error("format error: the name server was unable to interpret the query")]
    FormatError,
    #[error("server failure: the name server was unable to process this query due to a problem with the name server")]
    ServerFailure,
    #[error("not implemented: the name server does not support the requested kind of query")]
    NotImplemented,
    #[error("refused: the name server refuses to perform the requested operation for policy reasons")]
    Refused,
    #[error("the name server answered with reserved response code {0}")]
    Other(u8),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

// DNS wire format, RFC 1035 §4: queries out, responses in.

mod error;
mod header;
mod name;
mod question;
mod request_message;
mod resource_record;
mod response_message;

pub use error::{DecodeError, EncodeError, ProtocolError, ServerError};
pub use header::{Flags, Header, ResponseCode, HEADER_SIZE};
pub use question::{Question, CLASS_IN};
pub use resource_record::{RecordData, RecordType, ResourceRecord};
pub use response_message::ResponseMessage;

use domain_name_query_types::QType;

/// Builds the datagram for a recursive query of `domain`.
///
/// The transaction id is an input so that retransmissions of one query can
/// reuse it.
pub fn encode_query(domain: &str, qtype: QType, id: u16) -> Result<Vec<u8>, EncodeError> {
    let question = Question::new(domain, qtype)?;

    Ok(encode_request(&question, id))
}

pub fn encode_request(question: &Question, id: u16) -> Vec<u8> {
    let request_msg = request_message::RequestMessage::new(id, question);
    let mut request_bytes: Vec<u8> = Vec::with_capacity(HEADER_SIZE + question.size_in_packet());
    request_msg.to_bytes(&mut request_bytes);

    request_bytes
}

pub fn decode_response(
    response_bytes: &[u8],
    question: &Question,
    request_id: u16,
) -> Result<ResponseMessage, DecodeError> {
    ResponseMessage::parse_response(response_bytes, question, request_id)
}

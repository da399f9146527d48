use crate::error::{DecodeError, ProtocolError, ServerError};
use crate::header::{Header, ResponseCode, HEADER_SIZE};
use crate::question::Question;
use crate::resource_record::{RecordData, ResourceRecord};
use std::io::Cursor;
use std::net::Ipv4Addr;

#[derive(Debug)]
pub struct ResponseMessage {
    header: Header,
    answer_records: Vec<ResourceRecord>,
    additional_records: Vec<ResourceRecord>,
}

impl ResponseMessage {
    // Parses a response, checked against the question and id that were sent
    pub fn parse_response(
        response: &[u8],
        question: &Question,
        request_id: u16,
    ) -> Result<Self, DecodeError> {
        let mut reader = Cursor::new(response);

        let header = Header::parse_from_reader(&mut reader).map_err(ProtocolError::from)?;

        if !header.flags().ra {
            return Err(ProtocolError::UnsupportedRecursion.into());
        }

        let rcode = header.response_code();
        match rcode {
            ResponseCode::NoError | ResponseCode::NameError => {}
            ResponseCode::FormatError => return Err(ServerError::FormatError.into()),
            ResponseCode::ServerFailure => return Err(ServerError::ServerFailure.into()),
            ResponseCode::NotImplemented => return Err(ServerError::NotImplemented.into()),
            ResponseCode::Refused => return Err(ServerError::Refused.into()),
            ResponseCode::Reserved(code) => return Err(ServerError::Other(code).into()),
        }

        if header.id() != request_id {
            return Err(ProtocolError::IdMismatch {
                expected: request_id,
                found: header.id(),
            }
            .into());
        }

        if header.qd_count() != 1 {
            return Err(ProtocolError::UnexpectedQuestionCount(header.qd_count()).into());
        }

        if rcode == ResponseCode::NameError {
            return Ok(Self {
                header,
                answer_records: vec![],
                additional_records: vec![],
            });
        }

        // The echoed question is the one we sent, only its length matters.
        let question_end = HEADER_SIZE + question.size_in_packet();
        if question_end > response.len() {
            return Err(ProtocolError::truncated().into());
        }
        reader.set_position(question_end as u64);

        let mut answer_records: Vec<ResourceRecord> = Vec::new();
        for _ in 0..header.answer_count() {
            answer_records.push(ResourceRecord::parse_from_reader(&mut reader)?);
        }

        for _ in 0..header.authority_count() {
            ResourceRecord::skip_from_reader(&mut reader)?;
        }

        let mut additional_records: Vec<ResourceRecord> = Vec::new();
        for _ in 0..header.additional_count() {
            if let Some(record) = ResourceRecord::parse_advisory(&mut reader)? {
                additional_records.push(record);
            }
        }

        let msg = Self {
            header,
            answer_records,
            additional_records,
        };

        Ok(msg)
    }

    /// AA bit: the answering server is an authority for the name.
    pub fn authoritative(&self) -> bool {
        self.header.flags().aa
    }

    pub fn is_truncated(&self) -> bool {
        self.header.flags().tc
    }

    /// The server answered NameError: the domain does not exist.
    pub fn is_not_found(&self) -> bool {
        self.header.response_code() == ResponseCode::NameError
    }

    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answer_records
    }

    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional_records
    }

    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        self.answer_records
            .iter()
            .filter_map(|r| match r.data() {
                RecordData::A(addr) => Some(*addr),
                _ => None,
            })
            .collect()
    }
}

use crate::error::{EncodeError, ProtocolError};
use crate::name::{domain_to_qname, read_name};
use byteorder::{ReadBytesExt, BE};
use bytes::BufMut;
use domain_name_query_types::QType;
use std::io::Cursor;

pub const CLASS_IN: u16 = 1;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    domain: String,
    qname: Vec<u8>,
    qtype: u16,
    qclass: u16,
}

impl Question {
    pub fn new(domain: &str, qtype: QType) -> Result<Self, EncodeError> {
        let qname = domain_to_qname(domain)?;

        Ok(Self {
            domain: domain.trim_end_matches('.').to_string(),
            qname,
            qtype: qtype.code(),
            qclass: CLASS_IN,
        })
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.qname);
        bytes.put_u16(self.qtype);
        bytes.put_u16(self.qclass);
    }

    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<Self, ProtocolError> {
        let start = rdr.position() as usize;
        let domain = read_name(rdr)?;
        let end = rdr.position() as usize;
        let qname = rdr.get_ref()[start..end].to_vec();

        let qtype = rdr.read_u16::<BE>()?;
        let qclass = rdr.read_u16::<BE>()?;

        let q = Self {
            domain,
            qname,
            qtype,
            qclass,
        };

        Ok(q)
    }

    /// Octets this question occupies in a message.
    pub fn size_in_packet(&self) -> usize {
        self.qname.len() + 4
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn qtype(&self) -> u16 {
        self.qtype
    }

    pub fn qclass(&self) -> u16 {
        self.qclass
    }
}

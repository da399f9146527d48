use crate::error::ProtocolError;
use crate::name::read_name;
use crate::question::CLASS_IN;
use byteorder::{ReadBytesExt, BE};
use std::fmt;
use std::io::{Cursor, Read};
use std::net::Ipv4Addr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordType {
    A,
    Ns,
    Cname,
    Mx,
    Unsupported(u16),
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::Ns,
            5 => RecordType::Cname,
            15 => RecordType::Mx,
            other => RecordType::Unsupported(other),
        }
    }
}

impl RecordType {
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Cname => 5,
            RecordType::Mx => 15,
            RecordType::Unsupported(code) => *code,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordData {
    A(Ipv4Addr),
    Ns(String),
    Cname(String),
    Mx { preference: u16, exchange: String },
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Ns(_) => RecordType::Ns,
            RecordData::Cname(_) => RecordType::Cname,
            RecordData::Mx { .. } => RecordType::Mx,
        }
    }
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordData::A(addr) => write!(f, "{}", addr),
            RecordData::Ns(name) | RecordData::Cname(name) => write!(f, "{}", name),
            RecordData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
        }
    }
}

// NAME, TYPE, CLASS, TTL and RDLENGTH of a record, cursor at the RDATA
struct Preamble {
    name: String,
    rtype: RecordType,
    rclass: u16,
    ttl: u32,
    rdlength: u16,
    rdata_end: u64,
}

impl Preamble {
    fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<Self, ProtocolError> {
        let name = read_name(rdr)?;
        let rtype = RecordType::from(rdr.read_u16::<BE>()?);
        let rclass = rdr.read_u16::<BE>()?;
        let ttl = rdr.read_u32::<BE>()?;
        let rdlength = rdr.read_u16::<BE>()?;

        let rdata_end = rdr.position() + u64::from(rdlength);
        if rdata_end > rdr.get_ref().len() as u64 {
            return Err(ProtocolError::truncated());
        }

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata_end,
        })
    }
}

/// One answer or additional record. Built once by the decoder, never mutated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceRecord {
    name: String,
    ttl: u32,
    rdlength: u16,
    data: RecordData,
}

impl ResourceRecord {
    /// Decodes the record at the cursor and leaves the cursor at the next
    /// record, as given by RDLENGTH.
    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<Self, ProtocolError> {
        let preamble = Preamble::parse_from_reader(rdr)?;
        if preamble.rclass != CLASS_IN {
            return Err(ProtocolError::UnexpectedClass(preamble.rclass));
        }

        Self::from_preamble(rdr, preamble)
    }

    /// Like `parse_from_reader`, but a record of another class or of an
    /// unsupported type is stepped over and yields `None`.
    pub fn parse_advisory(rdr: &mut Cursor<&[u8]>) -> Result<Option<Self>, ProtocolError> {
        let preamble = Preamble::parse_from_reader(rdr)?;

        if preamble.rclass != CLASS_IN || matches!(preamble.rtype, RecordType::Unsupported(_)) {
            tracing::trace!(
                "skipping record {} of type {} class {}",
                preamble.name,
                preamble.rtype.code(),
                preamble.rclass
            );
            rdr.set_position(preamble.rdata_end);
            return Ok(None);
        }

        Self::from_preamble(rdr, preamble).map(Some)
    }

    /// Steps over a record without looking at its type or class.
    pub fn skip_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<(), ProtocolError> {
        let preamble = Preamble::parse_from_reader(rdr)?;
        rdr.set_position(preamble.rdata_end);

        Ok(())
    }

    fn from_preamble(rdr: &mut Cursor<&[u8]>, preamble: Preamble) -> Result<Self, ProtocolError> {
        let bad_length = || ProtocolError::BadRdataLength {
            rtype: preamble.rtype.code(),
            len: preamble.rdlength,
        };

        let data = match preamble.rtype {
            RecordType::A => {
                if preamble.rdlength != 4 {
                    return Err(bad_length());
                }
                let mut octets = [0u8; 4];
                rdr.read_exact(&mut octets)?;
                RecordData::A(Ipv4Addr::from(octets))
            }
            RecordType::Ns => RecordData::Ns(read_name(rdr)?),
            RecordType::Cname => RecordData::Cname(read_name(rdr)?),
            RecordType::Mx => {
                let preference = rdr.read_u16::<BE>()?;
                let exchange = read_name(rdr)?;
                RecordData::Mx {
                    preference,
                    exchange,
                }
            }
            RecordType::Unsupported(code) => {
                return Err(ProtocolError::UnsupportedRecordType(code));
            }
        };

        if rdr.position() > preamble.rdata_end {
            return Err(bad_length());
        }
        rdr.set_position(preamble.rdata_end);

        Ok(Self {
            name: preamble.name,
            ttl: preamble.ttl,
            rdlength: preamble.rdlength,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Seconds the record may be cached.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn rdlength(&self) -> u16 {
        self.rdlength
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }
}

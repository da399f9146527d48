use byteorder::{ReadBytesExt, BE};
use bytes::BufMut;
use std::io::Cursor;

pub const HEADER_SIZE: usize = 12;

// QR | OPCODE(4) | AA | TC | RD | RA | Z(3) | RCODE(4)
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: u8,
    pub rcode: u8,
}

impl Flags {
    /// Standard query with recursion desired.
    pub fn query() -> Self {
        Self {
            rd: true,
            ..Self::default()
        }
    }

    pub fn to_u16(&self) -> u16 {
        let mut flags: u16 = 0;

        if self.qr {
            flags |= 1 << 15;
        }
        flags |= (u16::from(self.opcode) & 0xF) << 11;
        if self.aa {
            flags |= 1 << 10;
        }
        if self.tc {
            flags |= 1 << 9;
        }
        if self.rd {
            flags |= 1 << 8;
        }
        if self.ra {
            flags |= 1 << 7;
        }
        flags |= (u16::from(self.z) & 0x7) << 4;
        flags |= u16::from(self.rcode) & 0xF;

        flags
    }

    pub fn from_u16(flags: u16) -> Self {
        Self {
            qr: flags & (1 << 15) != 0,
            opcode: ((flags >> 11) & 0xF) as u8,
            aa: flags & (1 << 10) != 0,
            tc: flags & (1 << 9) != 0,
            rd: flags & (1 << 8) != 0,
            ra: flags & (1 << 7) != 0,
            z: ((flags >> 4) & 0x7) as u8,
            rcode: (flags & 0xF) as u8,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(rcode: u8) -> Self {
        match rcode {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            other => ResponseCode::Reserved(other),
        }
    }
}

// 12 bytes
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    id: u16,
    flags: Flags,
    qdcount: u16,
    ancount: u16,
    nscount: u16,
    arcount: u16,
}

impl Header {
    pub fn new(id: u16, flags: Flags, qdcount: u16, ancount: u16, nscount: u16, arcount: u16) -> Self {
        Self {
            id,
            flags,
            qdcount,
            ancount,
            nscount,
            arcount,
        }
    }

    /// Header of an outgoing query: one question, nothing else, RD set.
    pub fn query(id: u16) -> Self {
        Self::new(id, Flags::query(), 1, 0, 0, 0)
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.put_u16(self.id);
        bytes.put_u16(self.flags.to_u16());
        bytes.put_u16(self.qdcount);
        bytes.put_u16(self.ancount);
        bytes.put_u16(self.nscount);
        bytes.put_u16(self.arcount);
    }

    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        let id = rdr.read_u16::<BE>()?;
        let flags = Flags::from_u16(rdr.read_u16::<BE>()?);
        let qdcount = rdr.read_u16::<BE>()?;
        let ancount = rdr.read_u16::<BE>()?;
        let nscount = rdr.read_u16::<BE>()?;
        let arcount = rdr.read_u16::<BE>()?;

        Ok(Self::new(id, flags, qdcount, ancount, nscount, arcount))
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(self.flags.rcode)
    }

    pub fn qd_count(&self) -> u16 {
        self.qdcount
    }

    pub fn answer_count(&self) -> u16 {
        self.ancount
    }

    pub fn authority_count(&self) -> u16 {
        self.nscount
    }

    pub fn additional_count(&self) -> u16 {
        self.arcount
    }
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Record types a query may ask for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum QType {
    A,
    Ns,
    Mx,
}

impl QType {
    /// TYPE code on the wire, RFC 1035 §3.2.2
    pub fn code(&self) -> u16 {
        match self {
            QType::A => 1,
            QType::Ns => 2,
            QType::Mx => 15,
        }
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            QType::A => {
                "A"
            }
            QType::Ns => {
                "NS"
            }
            QType::Mx => {
                "MX"
            }
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown query type: '{0}'")]
pub struct UnknownQType(String);

impl FromStr for QType {
    type Err = UnknownQType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(QType::A),
            "NS" => Ok(QType::Ns),
            "MX" => Ok(QType::Mx),
            _ => Err(UnknownQType(s.to_string())),
        }
    }
}

pub type Name = String;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NameQuery {
    pub name: Name,
    pub q_type: QType,
}

impl NameQuery {
    pub fn new(name_str: &str, q_type: QType) -> Self {
        Self {
            name: Name::from(name_str),
            q_type,
        }
    }

    pub fn a_record(name_str: &str) -> Self {
        Self::new(name_str, QType::A)
    }

    pub fn ns_record(name_str: &str) -> Self {
        Self::new(name_str, QType::Ns)
    }

    pub fn mx_record(name_str: &str) -> Self {
        Self::new(name_str, QType::Mx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes() {
        assert_eq!(QType::A.code(), 1);
        assert_eq!(QType::Ns.code(), 2);
        assert_eq!(QType::Mx.code(), 15);
    }

    #[test]
    fn display_and_parse() {
        for q_type in [QType::A, QType::Ns, QType::Mx] {
            let s = q_type.to_string();
            assert_eq!(s.parse::<QType>().unwrap(), q_type);
        }
        assert_eq!("mx".parse::<QType>().unwrap(), QType::Mx);
        assert!("AAAA".parse::<QType>().is_err());
    }

    #[test]
    fn constructors() {
        let q = NameQuery::mx_record("mcgill.ca");
        assert_eq!(q.name, "mcgill.ca");
        assert_eq!(q.q_type, QType::Mx);
        assert_eq!(NameQuery::a_record("z.cn").q_type, QType::A);
        assert_eq!(NameQuery::ns_record("z.cn").q_type, QType::Ns);
    }
}

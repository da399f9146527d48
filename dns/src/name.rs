use crate::error::{EncodeError, ProtocolError};
use std::io::Cursor;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
const POINTER_TAG: u8 = 0b1100_0000;

// Domain name to length-prefixed labels: "www.mcgill.ca" -> 3www6mcgill2ca0
//
// A single trailing dot is accepted, "" and "." are the root name.
pub fn domain_to_qname(domain: &str) -> Result<Vec<u8>, EncodeError> {
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    let mut qname: Vec<u8> = Vec::with_capacity(trimmed.len() + 2);

    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(EncodeError::EmptyLabel(domain.to_string()));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(EncodeError::LabelTooLong {
                    label: label.to_string(),
                    len: label.len(),
                });
            }

            qname.push(label.len() as u8);
            qname.extend_from_slice(label.as_bytes());
        }
    }

    qname.push(0);

    if qname.len() > MAX_NAME_LEN {
        return Err(EncodeError::NameTooLong {
            name: domain.to_string(),
            len: qname.len(),
        });
    }

    Ok(qname)
}

/// Reads a domain name at the cursor, following compression pointers.
///
/// The cursor is left just past the name field as it is laid out at the
/// starting position: after the zero terminator, or after the first
/// two-octet pointer.
///
/// Every pointer has to jump strictly before the run of labels it ends, so
/// the targets keep decreasing and the number of hops is bounded by the
/// message length. Anything else is rejected as `MalformedCompression`.
pub fn read_name(rdr: &mut Cursor<&[u8]>) -> Result<String, ProtocolError> {
    let message: &[u8] = *rdr.get_ref();
    let mut labels: Vec<String> = Vec::new();

    let mut index = rdr.position() as usize;
    let mut run_start = index;
    let mut field_end: Option<usize> = None;

    loop {
        let len_byte = *message.get(index).ok_or_else(ProtocolError::truncated)?;

        match len_byte & POINTER_TAG {
            POINTER_TAG => {
                let low = *message.get(index + 1).ok_or_else(ProtocolError::truncated)?;
                let target = (usize::from(len_byte & !POINTER_TAG) << 8) | usize::from(low);

                if target >= run_start {
                    return Err(ProtocolError::MalformedCompression { offset: index });
                }

                if field_end.is_none() {
                    field_end = Some(index + 2);
                }
                index = target;
                run_start = target;
            }
            0 => {
                let label_len = usize::from(len_byte);
                if label_len == 0 {
                    index += 1;
                    break;
                }

                let label_begin_index = index + 1;
                let next_index = label_begin_index + label_len;
                let label_bytes = message
                    .get(label_begin_index..next_index)
                    .ok_or_else(ProtocolError::truncated)?;

                labels.push(String::from_utf8_lossy(label_bytes).to_string());
                index = next_index;
            }
            // 0b01 and 0b10 prefixes are reserved, RFC 1035 §4.1.4
            _ => return Err(ProtocolError::BadLabelType { offset: index }),
        }
    }

    rdr.set_position(field_end.unwrap_or(index) as u64);

    Ok(labels.join("."))
}

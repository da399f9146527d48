use crate::header::Header;
use crate::question::Question;

pub struct RequestMessage<'a> {
    header: Header,
    question: &'a Question,
}

impl<'a> RequestMessage<'a> {
    pub fn new(id: u16, question: &'a Question) -> Self {
        let header = Header::query(id);

        Self { header, question }
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) {
        self.header.to_bytes(bytes);
        self.question.to_bytes(bytes);
    }
}

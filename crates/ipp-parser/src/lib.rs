mod lexical;
mod program;
mod xml;

pub use program::{parse_program_xml, LANGUAGE};
pub use xml::{parse_xml_document, XmlDocument, XmlElementNode};

use std::{collections::HashMap, io::BufRead};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

/// an owned view of the markup events the tag-structured readers act on.
/// converting eagerly releases the borrow on the reader's event buffer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum XmlEvent {
    Start {
        name: String,
        attributes: HashMap<String, String>,
    },
    Empty {
        name: String,
        attributes: HashMap<String, String>,
    },
    End {
        name: String,
    },
    Text(String),
    Eof,
    Skip,
}

/// builds a quick-xml reader over a buffered source with whitespace-only text
/// events suppressed.
pub(crate) fn xml_reader<R: BufRead>(source: R) -> Reader<R> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);
    reader
}

/// reads the next event into `buf`. errors are rendered to strings with the
/// byte position so callers can wrap them with the file path.
pub(crate) fn next_event<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<XmlEvent, String> {
    buf.clear();
    let event = reader
        .read_event_into(buf)
        .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
    let owned = match event {
        Event::Start(e) => XmlEvent::Start {
            name: local_name(&e),
            attributes: attributes(&e)?,
        },
        Event::Empty(e) => XmlEvent::Empty {
            name: local_name(&e),
            attributes: attributes(&e)?,
        },
        Event::End(e) => XmlEvent::End {
            name: String::from_utf8_lossy(e.local_name().as_ref()).to_string(),
        },
        Event::Text(t) => {
            let text = t
                .unescape()
                .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
            XmlEvent::Text(text.to_string())
        }
        Event::CData(c) => XmlEvent::Text(String::from_utf8_lossy(&c.into_inner()).to_string()),
        Event::Eof => XmlEvent::Eof,
        _ => XmlEvent::Skip,
    };
    Ok(owned)
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

fn attributes(e: &BytesStart) -> Result<HashMap<String, String>, String> {
    let mut result = HashMap::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| format!("invalid attribute: {e}"))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("invalid value for attribute '{key}': {e}"))?;
        result.insert(key, value.to_string());
    }
    Ok(result)
}

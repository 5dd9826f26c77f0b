//! Package discovery from the index sitemap.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Extracts every `<loc>` URL containing `marker`, in document order.
///
/// # Errors
///
/// Returns the XML error if the sitemap is malformed.
pub fn package_pages(sitemap: &str, marker: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(sitemap);
    let mut buf = Vec::new();
    let mut pages = Vec::new();
    let mut loc: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"loc" => loc = Some(String::new()),
            Event::Text(e) => {
                if let Some(current) = loc.as_mut() {
                    current.push_str(&e.decode().unwrap_or_default());
                }
            }
            Event::CData(e) => {
                if let Some(current) = loc.as_mut() {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(current) = loc.as_mut() {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        current.push(ch);
                    } else {
                        let name = e.decode().unwrap_or_default();
                        current.push_str(resolve_predefined_entity(&name).unwrap_or_default());
                    }
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                if let Some(url) = loc.take() {
                    let url = url.trim();
                    if url.contains(marker) {
                        pages.push(url.to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(pages)
}

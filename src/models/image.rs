/// Raw image bytes plus their declared media type. Immutable once captured;
/// each model call reads the same bytes.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImageAttachment {
    pub fn png(data: Vec<u8>) -> Self {
        ImageAttachment {
            data,
            mime_type: "image/png".to_string(),
        }
    }
}

//! Format conversion.

use crate::dictionary::StringDictionary;
use crate::error::Result;
use crate::format::SerializationFormat;
use crate::reader::Reader;
use crate::writer::{create_writer, WriterOptions};

/// Re-encodes `bytes` (either format, detected from the first byte) as
/// `target`.
///
/// The same dictionary resolves user strings in a binary source and
/// receives new property names for a binary target. Binary sources are
/// tokenized completely before writing starts, since reading and writing
/// would otherwise borrow the dictionary at the same time.
pub fn transcode(
    bytes: &[u8],
    target: SerializationFormat,
    options: WriterOptions,
    mut dict: Option<&mut StringDictionary>,
) -> Result<Vec<u8>> {
    let source = SerializationFormat::detect(bytes);
    tracing::debug!(?source, ?target, len = bytes.len(), "transcoding payload");
    let result = match source {
        SerializationFormat::Text => {
            let mut reader = Reader::text(bytes);
            let mut writer = create_writer(target, options, dict);
            writer.write_all(&mut reader)?;
            writer.get_result()?.to_vec()
        }
        SerializationFormat::Binary => {
            let mut tokens = Vec::new();
            {
                let mut reader = Reader::binary(bytes, dict.as_deref())?;
                while let Some(token) = reader.read_token()? {
                    tokens.push(token.into_owned());
                }
            }
            let mut writer = create_writer(target, options, dict.as_deref_mut());
            for token in &tokens {
                writer.write_token(token)?;
            }
            writer.get_result()?.to_vec()
        }
    };
    tracing::debug!(?target, len = result.len(), "transcoded payload");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_to_binary_and_back() {
        let text =
            br#"{"name":"x","values":[1,-2,3.5,"ED7E38AA-074E-4A74-BAB0-2A4F41079BAA"],"flag":I7}"#;
        let mut dict = StringDictionary::new();
        let binary = transcode(
            text,
            SerializationFormat::Binary,
            WriterOptions::default(),
            Some(&mut dict),
        )
        .unwrap();
        assert_eq!(binary[0], 0x80);
        assert_eq!(dict.index_of("values"), Some(0));
        let back = transcode(
            &binary,
            SerializationFormat::Text,
            WriterOptions::default(),
            Some(&mut dict),
        )
        .unwrap();
        assert_eq!(back, text.to_vec());
    }

    #[test]
    fn malformed_source_fails() {
        let result = transcode(b"[1,", SerializationFormat::Binary, WriterOptions::default(), None);
        assert!(result.is_err());
    }
}

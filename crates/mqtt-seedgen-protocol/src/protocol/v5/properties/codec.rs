use super::{Properties, PropertyValue};
use crate::encoding::{
    binary_len, encode_binary, encode_string, encode_variable_int, remaining_length, string_len,
    variable_int_len,
};
use crate::error::Result;
use bytes::{BufMut, Bytes, BytesMut};

impl Properties {
    /// Writes the Properties Length followed by every property.
    ///
    /// # Errors
    /// Returns error if a string/binary value is too long or the block
    /// exceeds the variable byte integer range.
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let body = self.encode_body()?;
        encode_variable_int(buf, remaining_length(body.len())?)?;
        buf.put_slice(&body);
        Ok(())
    }

    /// Encodes the properties without their length prefix.
    ///
    /// # Errors
    /// Returns error if a string or binary value exceeds 65535 bytes.
    pub fn encode_body(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.body_len());
        for (id, value) in &self.entries {
            encode_variable_int(&mut buf, u32::from(*id as u8))?;

            match value {
                PropertyValue::Byte(v) => buf.put_u8(*v),
                PropertyValue::TwoByteInteger(v) => buf.put_u16(*v),
                PropertyValue::FourByteInteger(v) => buf.put_u32(*v),
                PropertyValue::VariableByteInteger(v) => encode_variable_int(&mut buf, *v)?,
                PropertyValue::BinaryData(v) => encode_binary(&mut buf, v)?,
                PropertyValue::Utf8String(v) => encode_string(&mut buf, v)?,
                PropertyValue::Utf8StringPair(k, v) => {
                    encode_string(&mut buf, k)?;
                    encode_string(&mut buf, v)?;
                }
            }
        }
        Ok(buf.freeze())
    }

    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let body_len = self.body_len();
        variable_int_len(u32::try_from(body_len).unwrap_or(u32::MAX)) + body_len
    }

    fn body_len(&self) -> usize {
        self.entries
            .iter()
            .map(|(id, value)| {
                variable_int_len(u32::from(*id as u8))
                    + match value {
                        PropertyValue::Byte(_) => 1,
                        PropertyValue::TwoByteInteger(_) => 2,
                        PropertyValue::FourByteInteger(_) => 4,
                        PropertyValue::VariableByteInteger(v) => variable_int_len(*v),
                        PropertyValue::BinaryData(v) => binary_len(v),
                        PropertyValue::Utf8String(v) => string_len(v),
                        PropertyValue::Utf8StringPair(k, v) => string_len(k) + string_len(v),
                    }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::super::PropertyId;
    use super::*;

    #[test]
    fn test_empty_properties_encode_to_zero_length() {
        let props = Properties::new();
        let mut buf = BytesMut::new();
        props.encode(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x00]);
        assert_eq!(props.encoded_len(), 1);
        assert!(props.encode_body().unwrap().is_empty());
    }

    #[test]
    fn test_encode_preserves_insertion_order() {
        let props = Properties::new()
            .with(PropertyId::ReceiveMaximum, PropertyValue::TwoByteInteger(20))
            .unwrap()
            .with(PropertyId::MaximumQoS, PropertyValue::Byte(1))
            .unwrap()
            .with(
                PropertyId::AssignedClientIdentifier,
                PropertyValue::Utf8String("c1".into()),
            )
            .unwrap();

        let mut buf = BytesMut::new();
        props.encode(&mut buf).unwrap();
        assert_eq!(
            &buf[..],
            &[
                0x0A, // properties length
                0x21, 0x00, 0x14, // receive maximum
                0x24, 0x01, // maximum qos
                0x12, 0x00, 0x02, b'c', b'1', // assigned client id
            ]
        );
        assert_eq!(props.encoded_len(), buf.len());
    }

    #[test]
    fn test_encode_all_value_shapes() {
        let props = Properties::new()
            .with(
                PropertyId::MessageExpiryInterval,
                PropertyValue::FourByteInteger(60),
            )
            .unwrap()
            .with(
                PropertyId::SubscriptionIdentifier,
                PropertyValue::VariableByteInteger(200),
            )
            .unwrap()
            .with(
                PropertyId::CorrelationData,
                PropertyValue::BinaryData(Bytes::from_static(&[0xAB])),
            )
            .unwrap()
            .with(
                PropertyId::UserProperty,
                PropertyValue::Utf8StringPair("k".into(), "v".into()),
            )
            .unwrap();

        let body = props.encode_body().unwrap();
        assert_eq!(
            &body[..],
            &[
                0x02, 0x00, 0x00, 0x00, 0x3C, // message expiry
                0x0B, 0xC8, 0x01, // subscription identifier 200
                0x09, 0x00, 0x01, 0xAB, // correlation data
                0x26, 0x00, 0x01, b'k', 0x00, 0x01, b'v', // user property
            ]
        );
        assert_eq!(props.encoded_len(), body.len() + 1);
    }

    #[test]
    fn test_oversized_string_property_fails() {
        let props = Properties::new()
            .with(
                PropertyId::ReasonString,
                PropertyValue::Utf8String("x".repeat(70_000)),
            )
            .unwrap();
        assert!(props.encode_body().is_err());
    }
}

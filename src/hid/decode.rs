//! Field extraction from raw input reports.
//!
//! HID packs fields little-endian at bit granularity: bit `n` of the report
//! is bit `n % 8` of byte `n / 8`, and a field's least significant bit comes
//! first. Fields may start and end anywhere.

use heapless::Vec;

use super::discovery::ReportFieldDescriptor;
use crate::config::MAX_FIELD_VALUES;
use crate::error::DecodeError;

/// Raw values of one field, in report order.
pub type DecodedFields = Vec<u32, MAX_FIELD_VALUES>;

/// Read `bit_length` bits starting at `bit_offset`.
///
/// Returns `None` when the field runs past the end of `report`.
pub fn extract_bits(report: &[u8], bit_offset: usize, bit_length: u8) -> Option<u32> {
    let end = bit_offset.checked_add(usize::from(bit_length))?;
    if bit_length > 32 || end > report.len() * 8 {
        return None;
    }

    let mut value: u32 = 0;
    for i in 0..usize::from(bit_length) {
        let bit = bit_offset + i;
        let set = (report[bit / 8] >> (bit % 8)) & 1;
        value |= u32::from(set) << i;
    }
    Some(value)
}

/// Interpret the low `bit_length` bits of `raw` as two's complement.
pub fn sign_extend(raw: u32, bit_length: u8) -> i32 {
    match bit_length {
        0 => 0,
        32..=u8::MAX => raw as i32,
        n => {
            let shift = 32 - u32::from(n);
            ((raw << shift) as i32) >> shift
        }
    }
}

/// Extract every value of `field` from `report`.
pub fn decode_field(
    report: &[u8],
    field: &ReportFieldDescriptor,
) -> Result<DecodedFields, DecodeError> {
    if field.bit_length == 0 || field.bit_length > 32 {
        return Err(DecodeError::InvalidBitLength(field.bit_length));
    }
    if usize::from(field.field_count) > MAX_FIELD_VALUES {
        return Err(DecodeError::TooManyFields(field.field_count));
    }

    let mut values = DecodedFields::new();
    for n in 0..usize::from(field.field_count) {
        let offset = usize::from(field.bit_offset) + n * usize::from(field.bit_length);
        let value =
            extract_bits(report, offset, field.bit_length).ok_or(DecodeError::OutOfBounds)?;
        // Capacity was checked against field_count above.
        let _ = values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(bit_offset: u16, bit_length: u8, field_count: u8) -> ReportFieldDescriptor {
        ReportFieldDescriptor {
            report_id: 0,
            bit_offset,
            bit_length,
            field_count,
            report_byte_length: 4,
            interface: 0,
        }
    }

    #[test]
    fn byte_aligned_fields() {
        let report = [0x01, 0x05, 0xFB];
        assert_eq!(extract_bits(&report, 0, 8), Some(0x01));
        assert_eq!(extract_bits(&report, 8, 8), Some(0x05));
        assert_eq!(extract_bits(&report, 16, 8), Some(0xFB));
    }

    #[test]
    fn single_bits() {
        let report = [0b0000_0101];
        assert_eq!(extract_bits(&report, 0, 1), Some(1));
        assert_eq!(extract_bits(&report, 1, 1), Some(0));
        assert_eq!(extract_bits(&report, 2, 1), Some(1));
    }

    #[test]
    fn unaligned_field_spans_bytes() {
        // 12-bit fields packed back to back: 0xABC then 0x123.
        let report = [0xBC, 0x3A, 0x12];
        assert_eq!(extract_bits(&report, 0, 12), Some(0xABC));
        assert_eq!(extract_bits(&report, 12, 12), Some(0x123));
    }

    #[test]
    fn field_past_end_is_rejected() {
        let report = [0xFF, 0xFF];
        assert_eq!(extract_bits(&report, 9, 8), None);
        assert_eq!(extract_bits(&report, 16, 1), None);
        assert_eq!(extract_bits(&report, 0, 16), Some(0xFFFF));
    }

    #[test]
    fn zero_width_reads_nothing() {
        assert_eq!(extract_bits(&[], 0, 0), Some(0));
    }

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend(0xFB, 8), -5);
        assert_eq!(sign_extend(0x05, 8), 5);
        assert_eq!(sign_extend(0x800, 12), -2048);
        assert_eq!(sign_extend(0x7FF, 12), 2047);
        assert_eq!(sign_extend(0xFFFF_FFFF, 32), -1);
        assert_eq!(sign_extend(1, 1), -1);
    }

    #[test]
    fn decode_repeated_field() {
        let report = [0x00, 0x05, 0xFB];
        let values = decode_field(&report, &field(8, 8, 2)).unwrap();
        assert_eq!(values.as_slice(), &[0x05, 0xFB]);
    }

    #[test]
    fn decode_button_bits() {
        let report = [0b0000_0110];
        let values = decode_field(&report, &field(0, 1, 3)).unwrap();
        assert_eq!(values.as_slice(), &[0, 1, 1]);
    }

    #[test]
    fn decode_rejects_bad_descriptors() {
        let report = [0u8; 4];
        assert_eq!(
            decode_field(&report, &field(0, 0, 1)),
            Err(DecodeError::InvalidBitLength(0))
        );
        assert_eq!(
            decode_field(&report, &field(0, 33, 1)),
            Err(DecodeError::InvalidBitLength(33))
        );
        assert_eq!(
            decode_field(&report, &field(0, 1, 17)),
            Err(DecodeError::TooManyFields(17))
        );
        assert_eq!(
            decode_field(&report, &field(24, 8, 2)),
            Err(DecodeError::OutOfBounds)
        );
    }
}

//! Property tests for cursor clamping, field extraction and link packing.

use mouse2spi::forward::{pack_position, unpack_position};
use mouse2spi::hid::{decode_field, extract_bits, sign_extend, ReportFieldDescriptor};
use mouse2spi::motion::integrate;
use mouse2spi::{CursorPosition, Viewport};
use proptest::prelude::*;

/// Write `value` into `buf` LSB-first at `bit_offset`, HID style.
fn put_bits(buf: &mut [u8], bit_offset: usize, bit_length: u8, value: u32) {
    for i in 0..usize::from(bit_length) {
        let bit = bit_offset + i;
        if (value >> i) & 1 == 1 {
            buf[bit / 8] |= 1 << (bit % 8);
        } else {
            buf[bit / 8] &= !(1 << (bit % 8));
        }
    }
}

fn mask(bit_length: u8) -> u32 {
    if bit_length >= 32 {
        u32::MAX
    } else {
        (1u32 << bit_length) - 1
    }
}

fn position() -> impl Strategy<Value = CursorPosition> {
    (0i16..=640, 0i16..=480).prop_map(|(x, y)| CursorPosition::new(x, y))
}

proptest! {
    #[test]
    fn integrate_stays_in_viewport(p in position(), dx in -128i16..=127, dy in -128i16..=127) {
        let next = integrate(p, dx, dy);
        prop_assert!(Viewport::DEFAULT.contains(next));
        prop_assert_eq!(next.x, (p.x + dx).clamp(0, 640));
        prop_assert_eq!(next.y, (p.y + dy).clamp(0, 480));
    }

    #[test]
    fn integrate_never_overflows(x in any::<i16>(), y in any::<i16>(), dx in any::<i16>(), dy in any::<i16>()) {
        let next = integrate(CursorPosition::new(x, y), dx, dy);
        prop_assert!(Viewport::DEFAULT.contains(next));
    }

    #[test]
    fn extract_reads_back_written_field(
        bit_length in 1u8..=16,
        bit_offset in 0usize..64,
        raw in any::<u32>(),
        noise in any::<[u8; 12]>(),
    ) {
        let value = raw & mask(bit_length);
        let mut report = noise;
        put_bits(&mut report, bit_offset, bit_length, value);
        prop_assert_eq!(extract_bits(&report, bit_offset, bit_length), Some(value));
    }

    #[test]
    fn decode_field_reproduces_every_value(
        bit_length in 1u8..=16,
        bit_offset in 0u16..16,
        values in proptest::collection::vec(any::<u32>(), 1..=4),
    ) {
        let mut report = [0u8; 16];
        let values: Vec<u32> = values.into_iter().map(|v| v & mask(bit_length)).collect();
        for (n, v) in values.iter().enumerate() {
            let offset = usize::from(bit_offset) + n * usize::from(bit_length);
            put_bits(&mut report, offset, bit_length, *v);
        }

        let field = ReportFieldDescriptor {
            report_id: 0,
            bit_offset,
            bit_length,
            field_count: values.len() as u8,
            report_byte_length: report.len() as u16,
            interface: 0,
        };
        let decoded = decode_field(&report, &field).unwrap();
        prop_assert_eq!(decoded.as_slice(), values.as_slice());
    }

    #[test]
    fn signed_byte_deltas(delta in any::<i8>()) {
        prop_assert_eq!(sign_extend(u32::from(delta as u8), 8), i32::from(delta));
    }

    #[test]
    fn packed_word_keeps_both_halves(p in position()) {
        let word = pack_position(p);
        prop_assert_eq!(word >> 16, p.x as u32);
        prop_assert_eq!(word & 0xFFFF, p.y as u32);
        prop_assert_eq!(unpack_position(word), p);
    }
}

#[test]
fn edge_cases() {
    assert_eq!(integrate(CursorPosition::new(640, 0), 1, 0).x, 640);
    assert_eq!(integrate(CursorPosition::new(0, 0), -1, 0).x, 0);
}

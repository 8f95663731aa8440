//! Wide String Tests

use super::*;
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;

/// Strings made only of braille-pattern characters
#[derive(Debug, Clone)]
struct BrailleText(String);

impl Arbitrary for BrailleText {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 64;
        let text = (0..len)
            .map(|_| char::from_u32(0x2800 + u32::from(u8::arbitrary(g))).unwrap_or('\u{2800}'))
            .collect();
        BrailleText(text)
    }
}

fn native_units(text: &str) -> usize {
    registry()
        .encoding(EncodingFamily::NativeText)
        .units_for(text)
}

#[test]
fn test_with_capacity_is_lazy() {
    let buffer = WideString::with_capacity(8);
    assert_eq!(buffer.len(), 8);
    assert!(!buffer.is_allocated());
    assert_eq!(buffer.byte_len(), 8 * buffer.width().bytes());

    buffer.pointer().unwrap();
    assert!(buffer.is_allocated());
}

#[test]
fn test_zero_length_operations_do_not_allocate() {
    let buffer = WideString::with_capacity(4);
    assert_eq!(buffer.read(0).unwrap(), "");
    assert_eq!(buffer.read_dots(0).unwrap(), "");
    buffer.write("").unwrap();
    buffer.write_dots("").unwrap();
    assert!(!buffer.is_allocated());
}

#[test]
fn test_empty_buffer() {
    let buffer = WideString::with_capacity(0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.to_text().unwrap(), "");
    assert!(buffer.to_bytes().unwrap().is_empty());
    buffer.pointer().unwrap();
    assert!(!buffer.is_allocated());
}

#[test]
fn test_from_text_round_trip() {
    let text = "Hello, wörld \u{1F600}";
    let buffer = WideString::from_text(text).unwrap();
    assert_eq!(buffer.len(), native_units(text));
    assert_eq!(buffer.to_text().unwrap(), text);

    let parsed: WideString = "abc".parse().unwrap();
    assert_eq!(parsed.to_text().unwrap(), "abc");
}

#[test]
fn test_fresh_memory_reads_as_nul() {
    let buffer = WideString::with_capacity(3);
    assert_eq!(buffer.read(3).unwrap(), "\0\0\0");
}

#[test]
fn test_write_leaves_tail_untouched() {
    let buffer = WideString::with_capacity(6);
    buffer.write("abcdef").unwrap();
    buffer.write("XY").unwrap();
    assert_eq!(buffer.to_text().unwrap(), "XYcdef");
}

#[test]
fn test_write_chains() {
    let buffer = WideString::with_capacity(4);
    let text = buffer.write("zzzz").unwrap().write("ab").unwrap().read(4).unwrap();
    assert_eq!(text, "abzz");
}

#[test]
fn test_capacity_enforced() {
    let buffer = WideString::with_capacity(3);
    assert_eq!(
        buffer.write("abcd").unwrap_err(),
        MarshalError::CapacityExceeded {
            requested: 4,
            capacity: 3
        }
    );
    assert_eq!(
        buffer.read(4).unwrap_err(),
        MarshalError::CapacityExceeded {
            requested: 4,
            capacity: 3
        }
    );
    assert!(matches!(
        buffer.write_dots("\u{2801}\u{2802}\u{2803}\u{2804}"),
        Err(MarshalError::CapacityExceeded { .. })
    ));
    assert!(!buffer.is_allocated());
}

#[test]
fn test_dots_round_trip() {
    let cells = "\u{2800}\u{2801}\u{2855}\u{28FF}";
    let buffer = WideString::with_capacity(4);
    buffer.write_dots(cells).unwrap();
    assert_eq!(buffer.read_dots(4).unwrap(), cells);
}

#[test]
fn test_dots_layout() {
    let buffer = WideString::with_capacity(2);
    buffer.write_dots("\u{2801}\u{28C0}").unwrap();

    let bytes = buffer.to_bytes().unwrap();
    let expected: Vec<u8> = match buffer.width() {
        WideCharWidth::Two => vec![0x01, 0x80, 0xC0, 0x80],
        WideCharWidth::Four => vec![0x01, 0x80, 0, 0, 0xC0, 0x80, 0, 0],
    };
    assert_eq!(bytes, expected);
}

#[test]
fn test_native_text_layout() {
    let buffer = WideString::from_text("A\u{E9}").unwrap();
    let expected: Vec<u8> = match buffer.width() {
        WideCharWidth::Two => vec![0x41, 0x00, 0xE9, 0x00],
        WideCharWidth::Four => vec![0x41, 0, 0, 0, 0xE9, 0, 0, 0],
    };
    assert_eq!(buffer.to_bytes().unwrap(), expected);
}

#[test]
fn test_dots_rejects_non_braille() {
    let buffer = WideString::with_capacity(4);
    let err = buffer.write_dots("\u{2801}a").unwrap_err();
    let coding = err.as_coding().unwrap();
    assert!(coding.is_unmappable());
    assert_eq!(coding.encoding(), Encoding::dots(buffer.width()));
    assert!(!err.is_defect());
}

#[test]
fn test_read_dots_rejects_plain_text() {
    let buffer = WideString::from_text("ab").unwrap();
    let err = buffer.read_dots(2).unwrap_err();
    assert!(err.as_coding().unwrap().is_unmappable());
}

#[test]
fn test_read_malformed_native_text() {
    let buffer = WideString::with_capacity(1);
    let bad: &[u8] = match buffer.width() {
        WideCharWidth::Two => &[0x00, 0xD8],
        WideCharWidth::Four => &[0x00, 0x00, 0x11, 0x00],
    };
    let ptr = buffer.pointer().unwrap();
    unsafe { std::ptr::copy_nonoverlapping(bad.as_ptr(), ptr.as_ptr(), bad.len()) };

    let err = buffer.read(1).unwrap_err();
    assert!(err.as_coding().unwrap().is_malformed());
}

#[test]
fn test_subview_reads_slice() {
    let text = "hello world";
    let buffer = WideString::from_text(text).unwrap();
    for begin in 0..=text.len() {
        for end in begin..=text.len() {
            let view = buffer.subview(begin, end).unwrap();
            assert_eq!(view.len(), end - begin);
            assert_eq!(view.to_text().unwrap(), &text[begin..end]);
        }
    }
}

#[test]
fn test_subview_shares_memory() {
    let buffer = WideString::from_text("hello world").unwrap();
    let view = buffer.subview(6, 11).unwrap();
    assert_eq!(view.offset(), 6);
    assert_eq!(view.to_text().unwrap(), "world");

    buffer.write("HELLO WORLD").unwrap();
    assert_eq!(view.to_text().unwrap(), "WORLD");

    view.write("there").unwrap();
    assert_eq!(buffer.to_text().unwrap(), "HELLO there");
}

#[test]
fn test_subview_allocates_parent_lazily() {
    let buffer = WideString::with_capacity(10);
    let view = buffer.subview_from(4).unwrap();
    assert_eq!(view.len(), 6);
    assert!(!view.is_allocated());

    view.write("abc").unwrap();
    assert!(buffer.is_allocated());
    assert_eq!(buffer.read(7).unwrap(), "\0\0\0\0abc");
}

#[test]
fn test_nested_subviews() {
    let buffer = WideString::from_text("0123456789").unwrap();
    let outer = buffer.subview(2, 9).unwrap();
    let inner = outer.subview(3, 5).unwrap();
    assert_eq!(inner.to_text().unwrap(), "56");

    inner.write("xy").unwrap();
    assert_eq!(buffer.to_text().unwrap(), "01234xy789");
}

#[test]
fn test_subview_pointer_offset() {
    let buffer = WideString::with_capacity(8);
    let view = buffer.subview(3, 8).unwrap();
    let base = buffer.pointer().unwrap().as_ptr() as usize;
    let at = view.pointer().unwrap().as_ptr() as usize;
    assert_eq!(at - base, 3 * buffer.width().bytes());
}

#[test]
fn test_subview_bounds() {
    let buffer = WideString::with_capacity(5);
    assert_eq!(
        buffer.subview(3, 2).unwrap_err(),
        MarshalError::OutOfRange {
            begin: 3,
            end: 2,
            capacity: 5
        }
    );
    assert!(matches!(
        buffer.subview(0, 6),
        Err(MarshalError::OutOfRange { .. })
    ));
    assert!(matches!(
        buffer.subview_from(6),
        Err(MarshalError::OutOfRange { .. })
    ));
    assert!(buffer.subview(5, 5).unwrap().is_empty());
    assert!(buffer.subview(0, 5).is_ok());
}

#[test]
fn test_subview_capacity_is_its_own() {
    let buffer = WideString::with_capacity(10);
    let view = buffer.subview(0, 3).unwrap();
    assert!(matches!(
        view.write("abcd"),
        Err(MarshalError::CapacityExceeded {
            requested: 4,
            capacity: 3
        })
    ));
}

#[test]
fn test_buffers_on_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                for round in 0..100 {
                    let text = format!("worker {} round {}", i, round);
                    let buffer = WideString::from_text(&text).unwrap();
                    assert_eq!(buffer.to_text().unwrap(), text);

                    let cells = WideString::with_capacity(3);
                    cells.write_dots("\u{2807}\u{2815}\u{281E}").unwrap();
                    assert_eq!(cells.read_dots(3).unwrap(), "\u{2807}\u{2815}\u{281E}");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_owned_buffer_moves_to_worker() {
    let buffer = WideString::from_text("abc").unwrap();
    buffer.pointer().unwrap();

    let handle = std::thread::spawn(move || {
        buffer.write_dots("\u{2801}").unwrap();
        (buffer.read_dots(1).unwrap(), buffer.read(3).unwrap())
    });
    let (cell, text) = handle.join().unwrap();
    assert_eq!(cell, "\u{2801}");
    assert!(text.ends_with("bc"));
}

#[quickcheck]
fn prop_native_text_round_trip(text: String) -> TestResult {
    let units = native_units(&text);
    let buffer = WideString::with_capacity(units + 2);
    if buffer.write(&text).is_err() {
        return TestResult::failed();
    }
    TestResult::from_bool(buffer.read(units).ok() == Some(text))
}

#[quickcheck]
fn prop_dots_round_trip(cells: BrailleText) -> bool {
    let len = cells.0.chars().count();
    let buffer = WideString::with_capacity(len);
    buffer.write_dots(&cells.0).is_ok() && buffer.read_dots(len).ok() == Some(cells.0)
}

#[quickcheck]
fn prop_dots_rejects_outside_block(text: String) -> TestResult {
    let outside = text
        .chars()
        .any(|c| !('\u{2800}'..='\u{28FF}').contains(&c));
    if !outside {
        return TestResult::discard();
    }
    let buffer = WideString::with_capacity(text.chars().count());
    match buffer.write_dots(&text) {
        Err(MarshalError::Coding(e)) => TestResult::from_bool(e.is_unmappable()),
        _ => TestResult::failed(),
    }
}

#[quickcheck]
fn prop_ascii_subview_matches_substring(text: String, a: usize, b: usize) -> TestResult {
    let text: String = text.chars().filter(char::is_ascii).collect();
    if text.is_empty() {
        return TestResult::discard();
    }
    let (begin, end) = {
        let a = a % (text.len() + 1);
        let b = b % (text.len() + 1);
        (a.min(b), a.max(b))
    };
    let buffer = WideString::from_text(&text).unwrap();
    let view = buffer.subview(begin, end).unwrap();
    TestResult::from_bool(view.to_text().unwrap() == text[begin..end])
}

//! Integration tests for the document writer, covering the universal properties and concrete
//! scenarios its design is tested against.

use tagjson::allocator::{GlobalAllocator, PoolAllocator};
use tagjson::writer::{write, write_bounded, WriteFlags};
use tagjson::{parse, ScanFlags, StringArena, Value};

fn write_compact(value: &Value<'_>) -> String {
  let mut allocator = GlobalAllocator::new();
  let buffer = write(value, WriteFlags::compact(), &mut allocator).unwrap();
  String::from_utf8(buffer.to_vec()).unwrap()
}

fn write_pretty(value: &Value<'_>) -> String {
  let mut allocator = GlobalAllocator::new();
  let buffer = write(value, WriteFlags::compact().with_pretty(), &mut allocator).unwrap();
  String::from_utf8(buffer.to_vec()).unwrap()
}

#[test]
fn scenario_non_finite_real_with_flag() {
  let mut allocator = GlobalAllocator::new();
  let flags = WriteFlags::compact().with_allow_inf_and_nan();
  let nan = write(&Value::Real(f64::NAN), flags, &mut allocator).unwrap();
  assert_eq!(&*nan, b"NaN");

  let inf = write(&Value::Real(f64::INFINITY), flags, &mut allocator).unwrap();
  assert_eq!(&*inf, b"Infinity");

  let neg_inf = write(&Value::Real(f64::NEG_INFINITY), flags, &mut allocator).unwrap();
  assert_eq!(&*neg_inf, b"-Infinity");
}

#[test]
fn scenario_non_finite_real_without_flag_fails() {
  let mut allocator = GlobalAllocator::new();
  let err = write(&Value::Real(f64::NAN), WriteFlags::compact(), &mut allocator).unwrap_err();
  assert_eq!(err, tagjson::Error::NanOrInf);
}

#[test]
fn scenario_pretty_array() {
  let value = Value::array([Value::Uint(1), Value::Uint(2)]);
  assert_eq!(write_pretty(&value), "[\n    1,\n    2\n]");
}

#[test]
fn scenario_compact_mixed_object() {
  let value = Value::object([
    (b"a".as_slice(), Value::Uint(1)),
    (b"b".as_slice(), Value::Str(b"two")),
    (b"c".as_slice(), Value::Bool(true)),
    (b"d".as_slice(), Value::Null),
  ]);
  assert_eq!(write_compact(&value), r#"{"a":1,"b":"two","c":true,"d":null}"#);
}

#[test]
fn scenario_duplicate_keys_preserved() {
  let value =
    Value::object([(b"x".as_slice(), Value::Uint(1)), (b"x".as_slice(), Value::Uint(2))]);
  assert_eq!(write_compact(&value), r#"{"x":1,"x":2}"#);
}

#[test]
fn scenario_empty_nested_array_inline_in_pretty_mode() {
  let value = Value::array([Value::array([]), Value::Bool(true)]);
  assert_eq!(write_pretty(&value), "[\n    [],\n    true\n]");
}

#[test]
fn scenario_compact_real() {
  assert_eq!(write_compact(&Value::Real(-1.5)), "-1.5");
}

#[test]
fn scenario_invalid_tag_fails_with_no_output() {
  let mut allocator = GlobalAllocator::new();
  let err =
    write(&Value::invalid_for_testing(), WriteFlags::compact(), &mut allocator).unwrap_err();
  assert_eq!(err, tagjson::Error::InvalidValueType);
}

#[test]
fn scenario_allocator_pressure() {
  let value = Value::array([Value::Uint(1), Value::Uint(2), Value::Uint(3)]);

  let mut tiny_backing = [0u8; 4];
  let mut tiny = PoolAllocator::new(&mut tiny_backing);
  assert!(write(&value, WriteFlags::compact(), &mut tiny).is_err());

  let mut big_backing = [0u8; 256];
  let mut big = PoolAllocator::new(&mut big_backing);
  let buffer = write(&value, WriteFlags::compact(), &mut big).unwrap();
  assert_eq!(&*buffer, b"[1,2,3]");
}

#[test]
fn mutable_and_parsed_writer_output_are_equivalent() {
  let built = Value::object([
    (b"name".as_slice(), Value::Str(b"line 1\nline 2")),
    (b"values".as_slice(), Value::array([Value::Uint(1), Value::Sint(-2), Value::Real(1.5)])),
  ]);
  let built_output = write_compact(&built);

  let arena = StringArena::new();
  let parsed = parse(built_output.as_bytes(), &arena, ScanFlags::empty()).unwrap();
  let parsed_output = write_compact(&parsed);

  assert_eq!(built_output, parsed_output);
}

#[test]
fn write_bounded_matches_unbounded_output() {
  let value = Value::object([(
    b"nested".as_slice(),
    Value::array([Value::Uint(1), Value::Uint(2)]),
  )]);

  let mut allocator_a = GlobalAllocator::new();
  let unbounded = write(&value, WriteFlags::compact(), &mut allocator_a).unwrap();

  let mut allocator_b = GlobalAllocator::new();
  let bounded =
    write_bounded::<_, 8>(&value, WriteFlags::compact(), &mut allocator_b).unwrap();

  assert_eq!(&*unbounded, &*bounded);
}

#[test]
fn file_output_matches_in_memory_output() {
  use tagjson::writer::write_to_file;

  let value = Value::object([
    (b"a".as_slice(), Value::Uint(1)),
    (b"b".as_slice(), Value::array([Value::Real(-1.5), Value::Str(b"line\nbreak")])),
  ]);

  let path = std::env::temp_dir()
    .join(format!("tagjson-test-{}-{:?}.json", std::process::id(), std::thread::current().id()));

  let mut allocator = GlobalAllocator::new();
  write_to_file(&path, &value, WriteFlags::compact().with_pretty(), &mut allocator).unwrap();

  let from_file = std::fs::read(&path).unwrap();
  std::fs::remove_file(&path).unwrap();

  assert_eq!(from_file, write_pretty(&value).into_bytes());
}

#[test]
fn write_bounded_overflows_past_its_depth() {
  let mut value = Value::Uint(0);
  for _ in 0 .. 64 {
    value = Value::array([value]);
  }

  let mut allocator = GlobalAllocator::new();
  let err = write_bounded::<_, 1>(&value, WriteFlags::compact(), &mut allocator).unwrap_err();
  assert_eq!(err, tagjson::Error::MemoryAllocation);
}

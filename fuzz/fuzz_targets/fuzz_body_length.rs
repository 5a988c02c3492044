#![no_main]

use std::io::{Cursor, Read};

use formstream::FormStream;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (value, content) = data.split_at(data.len() / 2);

    let mut form = FormStream::new();
    form.add_field("note", &String::from_utf8_lossy(value)).unwrap();
    form.add_reader("file", "fuzz.bin", content.len() as u64, Cursor::new(content.to_vec()))
        .unwrap();

    let boundary = form.boundary().to_owned();
    let content_length = form.content_length();

    let mut body = Vec::new();
    form.into_reader().read_to_end(&mut body).unwrap();

    assert_eq!(body.len() as u64, content_length);
    assert!(body.starts_with(format!("--{}\r\n", boundary).as_bytes()));
    assert!(body.ends_with(format!("\r\n--{}--\r\n", boundary).as_bytes()));
});

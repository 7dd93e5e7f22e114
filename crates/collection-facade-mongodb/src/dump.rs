//! Debug dumping of operation arguments

use serde::Serialize;
use std::fmt::Debug;
use std::io::{self, Write};
use tracing::debug;

/// Pretty-printed JSON for `value`; falls back to the `Debug` rendering when
/// the value cannot be serialized.
pub fn render<T: Serialize + Debug + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{:#?}", value))
}

/// Write `label` followed by the pretty-printed `value` to `out`
pub fn write_dump<W, T>(out: &mut W, label: &str, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize + Debug + ?Sized,
{
    writeln!(out, "{}", label)?;
    writeln!(out, "{}", render(value))
}

/// Write `label` and `value` to standard output.
///
/// Output errors are ignored; a dump never fails the operation it describes.
pub fn dump<T: Serialize + Debug + ?Sized>(label: &str, value: &T) {
    debug!(label, "dumping operation arguments");
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = write_dump(&mut handle, label, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::ser::{Error as _, Serializer};

    #[test]
    fn test_write_dump_pretty_prints_document() {
        let mut out = Vec::new();
        write_dump(&mut out, "MongoDB Fetch Args", &doc! { "a": 1 }).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "MongoDB Fetch Args\n{\n  \"a\": 1\n}\n");
    }

    #[derive(Debug)]
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("nope"))
        }
    }

    #[test]
    fn test_render_falls_back_to_debug() {
        assert_eq!(render(&Unserializable), "Unserializable");
    }
}

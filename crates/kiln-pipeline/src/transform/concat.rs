use crate::asset::Asset;
use crate::transform::Concatenator;

/// Joins files in order with a newline between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewlineConcatenator;

impl Concatenator for NewlineConcatenator {
    fn concat(&self, parts: &[Asset], name: &str) -> Asset {
        let total = parts.iter().map(Asset::len).sum::<usize>() + parts.len();
        let mut contents = Vec::with_capacity(total);

        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                contents.push(b'\n');
            }
            contents.extend_from_slice(&part.contents);
        }

        Asset::new(name, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn joins_in_input_order() {
        let out = NewlineConcatenator.concat(
            &[Asset::new("b.js", "var b;"), Asset::new("a/a.js", "var a;")],
            "weel.js",
        );
        assert_eq!(out.path(), Path::new("weel.js"));
        assert_eq!(out.text().unwrap(), "var b;\nvar a;");
    }
}

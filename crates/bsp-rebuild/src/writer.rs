//! Keyed block output.
//!
//! Reconstructed geometry is written as nested blocks of key/value pairs,
//! the shape of the editor's map format:
//!
//! ```text
//! solid
//! {
//!     "id" "1"
//!     side
//!     {
//!         "id" "1"
//!         "plane" "(0 0 64) (64 0 64) (64 64 64)"
//!         ...
//!     }
//! }
//! ```

use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::Triangle;

/// A value written under a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Vector(Vector3<f64>),
    /// Three plane points, written as `(x y z) (x y z) (x y z)`.
    Plane([Point3<f64>; 3]),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Vector(v) => write!(f, "{} {} {}", v.x, v.y, v.z),
            Value::Plane(points) => {
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "({} {} {})", p.x, p.y, p.z)?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vector3<f64>> for Value {
    fn from(v: Vector3<f64>) -> Self {
        Value::Vector(v)
    }
}

impl From<&Triangle> for Value {
    fn from(t: &Triangle) -> Self {
        Value::Plane(*t.vertices())
    }
}

/// Sink for nested keyed blocks.
pub trait BlockWriter {
    /// Opens a block named `tag`.
    fn start(&mut self, tag: &str);

    /// Writes a key/value pair into the innermost open block.
    fn put(&mut self, key: &str, value: Value);

    /// Closes the innermost open block, which must be named `tag`.
    fn end(&mut self, tag: &str);
}

impl<W: BlockWriter + ?Sized> BlockWriter for &mut W {
    fn start(&mut self, tag: &str) {
        (**self).start(tag);
    }

    fn put(&mut self, key: &str, value: Value) {
        (**self).put(key, value);
    }

    fn end(&mut self, tag: &str) {
        (**self).end(tag);
    }
}

/// One entry of a [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Pair(String, Value),
    Block(Block),
}

/// A named block of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub tag: String,
    pub entries: Vec<Entry>,
}

impl Block {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            entries: Vec::new(),
        }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Pair(k, v) if k == key => Some(v),
            _ => None,
        })
    }

    /// Child blocks named `tag`, in order.
    pub fn children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.entries.iter().filter_map(move |entry| match entry {
            Entry::Block(b) if b.tag == tag => Some(b),
            _ => None,
        })
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "\t".repeat(depth);
        writeln!(f, "{indent}{}", self.tag)?;
        writeln!(f, "{indent}{{")?;
        for entry in &self.entries {
            match entry {
                Entry::Pair(k, v) => writeln!(f, "{indent}\t\"{k}\" \"{v}\"")?,
                Entry::Block(b) => b.write_indented(f, depth + 1)?,
            }
        }
        writeln!(f, "{indent}}}")
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// A [`BlockWriter`] collecting everything into an in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    roots: Vec<Block>,
    open: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed top-level blocks.
    pub fn roots(&self) -> &[Block] {
        &self.roots
    }

    /// Consumes the tree, returning its completed top-level blocks.
    pub fn into_roots(self) -> Vec<Block> {
        self.roots
    }
}

impl BlockWriter for BlockTree {
    fn start(&mut self, tag: &str) {
        self.open.push(Block::new(tag));
    }

    fn put(&mut self, key: &str, value: Value) {
        if let Some(block) = self.open.last_mut() {
            block.entries.push(Entry::Pair(key.to_owned(), value));
        }
    }

    fn end(&mut self, tag: &str) {
        let Some(block) = self.open.pop() else {
            return;
        };
        debug_assert_eq!(block.tag, tag, "mismatched block end");
        match self.open.last_mut() {
            Some(parent) => parent.entries.push(Entry::Block(block)),
            None => self.roots.push(block),
        }
    }
}

impl fmt::Display for BlockTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.roots {
            block.write_indented(f, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_are_collected() {
        let mut tree = BlockTree::new();
        tree.start("solid");
        tree.put("id", 3u32.into());
        tree.start("side");
        tree.put("id", 7u32.into());
        tree.end("side");
        tree.end("solid");

        let roots = tree.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].get("id"), Some(&Value::Int(3)));
        let side = roots[0].children("side").next().unwrap();
        assert_eq!(side.get("id"), Some(&Value::Int(7)));
    }

    #[test]
    fn plane_value_formatting() {
        let value = Value::Plane([
            Point3::new(0.0, 0.0, 64.0),
            Point3::new(64.0, 0.0, 64.0),
            Point3::new(64.0, -64.5, 64.0),
        ]);
        assert_eq!(value.to_string(), "(0 0 64) (64 0 64) (64 -64.5 64)");
    }

    #[test]
    fn renders_editor_text() {
        let mut tree = BlockTree::new();
        tree.start("solid");
        tree.put("id", 1u32.into());
        tree.start("side");
        tree.put("material", "TOOLS/TOOLSNODRAW".into());
        tree.end("side");
        tree.end("solid");

        let expected = "solid\n{\n\t\"id\" \"1\"\n\tside\n\t{\n\t\t\"material\" \"TOOLS/TOOLSNODRAW\"\n\t}\n}\n";
        assert_eq!(tree.to_string(), expected);
    }
}

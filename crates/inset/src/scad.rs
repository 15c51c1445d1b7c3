//! OpenSCAD trace of the inset pipeline.
//!
//! Purely diagnostic: each recorded stage becomes an OpenSCAD module, and
//! closing the dump emits `draw_*` helpers that render any range of
//! iterations. Loading the file in OpenSCAD shows the outline, bisector
//! rays and inset rings of every call stacked in z.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use toolpath_core::{Result, Segment2};

const SEGMENT_RADIUS: f64 = 0.05;
const STAGE_SPACING: f64 = 0.1;

/// A buffered OpenSCAD writer; see the module docs.
///
/// Call [`close`](Self::close) to emit the draw helpers and flush. Dropping
/// an unclosed dump discards the helpers but keeps the stage modules
/// already written.
#[derive(Debug)]
pub struct ScadDump {
    out: BufWriter<File>,
    families: BTreeMap<String, usize>,
    z: f64,
}

impl ScadDump {
    /// Creates the file and writes the rendering preamble.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "// toolpath-inset pipeline trace")?;
        writeln!(out, "module seg(a, b) {{")?;
        writeln!(out, "    hull() {{")?;
        writeln!(
            out,
            "        translate(a) sphere(r = {SEGMENT_RADIUS}, $fn = 8);"
        )?;
        writeln!(
            out,
            "        translate(b) sphere(r = {SEGMENT_RADIUS}, $fn = 8);"
        )?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out, "module segments(list) {{")?;
        writeln!(out, "    for (s = list) seg(s[0], s[1]);")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        Ok(Self {
            out,
            families: BTreeMap::new(),
            z: 0.0,
        })
    }

    /// Records one pipeline stage as the module `<family>_<n>`, where `n`
    /// counts previous stages of the same family.
    pub fn write_segments(
        &mut self,
        family: &str,
        color: [f64; 3],
        segments: &[Segment2],
    ) -> Result<()> {
        let index = self.families.entry(family.to_string()).or_insert(0);
        writeln!(self.out, "module {family}_{index}() {{")?;
        write!(
            self.out,
            "    color([{}, {}, {}, 1]) segments([",
            color[0], color[1], color[2]
        )?;
        for (i, seg) in segments.iter().enumerate() {
            if i > 0 {
                write!(self.out, ", ")?;
            }
            write!(
                self.out,
                "[[{}, {}, {z}], [{}, {}, {z}]]",
                seg.a.x,
                seg.a.y,
                seg.b.x,
                seg.b.y,
                z = self.z
            )?;
        }
        writeln!(self.out, "]);")?;
        writeln!(self.out, "}}")?;
        *index += 1;
        self.z += STAGE_SPACING;
        Ok(())
    }

    /// Emits a `draw_<family>(min, max)` helper per recorded family plus
    /// top-level calls rendering everything, then flushes and closes the
    /// file.
    pub fn close(mut self) -> Result<()> {
        writeln!(self.out)?;
        for (family, count) in &self.families {
            writeln!(self.out, "module draw_{family}(min, max) {{")?;
            for i in 0..*count {
                writeln!(
                    self.out,
                    "    if (min <= {i} && {i} <= max) {family}_{i}();"
                )?;
            }
            writeln!(self.out, "}}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "min = 0;")?;
        let max = self.families.values().copied().max().unwrap_or(1) - 1;
        writeln!(self.out, "max = {max};")?;
        for family in self.families.keys() {
            writeln!(self.out, "draw_{family}(min, max);")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
